use super::config::{Config, EmptyCentroid};
use super::{DegenerateCentroidSnafu, KmeansError};
use crate::types::{Centroid, Point3, Sample};
use tracing::{debug, warn};

/// Index of the centroid nearest to `point` and its squared distance.
/// Ties go to the lowest index.
#[inline]
pub fn nearest(point: Point3, centroids: &[Centroid]) -> (usize, f64) {
    let mut min = f64::INFINITY;
    let mut min_idx = 0;
    for (j, centroid) in centroids.iter().enumerate() {
        let d = point.squared_distance(centroid.point);
        if d < min {
            min = d;
            min_idx = j;
        }
    }
    (min_idx, min)
}

/// Move every sample to its nearest centroid and refresh the centroid
/// counts. Returns how many samples changed centroid.
#[inline]
pub fn assign_points(samples: &mut [Sample], centroids: &mut [Centroid]) -> usize {
    let mut deltas = 0;
    for centroid in centroids.iter_mut() {
        centroid.count = 0;
    }
    for sample in samples.iter_mut() {
        let (n, _) = nearest(sample.point, centroids);
        if n != sample.cluster {
            deltas += 1;
            sample.cluster = n;
        }
        centroids[n].count += 1;
    }
    deltas
}

#[derive(Debug)]
pub struct UpdateResult {
    pub shift_squared: f64,
    /// Centroids left where they were because nothing was assigned to them.
    pub frozen: usize,
}

/// Replace every centroid with the (weighted) mean of its samples.
///
/// Under [`EmptyCentroid::Fail`] an empty centroid is reported before any
/// centroid is written.
#[inline]
pub fn update_centroids(
    samples: &[Sample],
    centroids: &mut [Centroid],
    policy: EmptyCentroid,
) -> Result<UpdateResult, KmeansError> {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    let mut weights = vec![0f64; k];
    let mut sums = vec![Point3::ORIGIN; k];

    for sample in samples {
        let c = sample.cluster;
        assert!(c < k);

        let w = sample.weight;
        counts[c] += 1;
        weights[c] += w;
        sums[c].x = sample.point.x.mul_add(w, sums[c].x);
        sums[c].y = sample.point.y.mul_add(w, sums[c].y);
        sums[c].z = sample.point.z.mul_add(w, sums[c].z);
    }

    if policy == EmptyCentroid::Fail
        && let Some(index) = counts.iter().position(|&count| count == 0)
    {
        return DegenerateCentroidSnafu { index }.fail();
    }

    let mut shift_squared = 0f64;
    let mut frozen = 0;

    for (i, centroid) in centroids.iter_mut().enumerate() {
        centroid.count = counts[i];
        if counts[i] == 0 {
            frozen += 1;
            continue;
        }

        let w = weights[i];
        let new = Point3::new(sums[i].x / w, sums[i].y / w, sums[i].z / w);
        shift_squared += centroid.point.squared_distance(new);
        centroid.point = new;
    }

    Ok(UpdateResult {
        shift_squared,
        frozen,
    })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub deltas: usize,
}

/// One refinement iteration: recompute the centroids, then reassign.
///
/// Samples must already carry a valid assignment.
pub fn iterate(
    samples: &mut [Sample],
    centroids: &mut [Centroid],
    policy: EmptyCentroid,
) -> Result<Iteration, KmeansError> {
    let update = update_centroids(samples, centroids, policy)?;
    let deltas = assign_points(samples, centroids);
    debug!(
        deltas,
        frozen = update.frozen,
        shift_squared = update.shift_squared,
        "lloyd iteration"
    );
    Ok(Iteration { deltas })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LloydsLoopResult {
    pub iterations: usize,
    pub converged: bool,
}

/// Iterate until no sample changes centroid, or until the configured
/// iteration cap.
pub fn lloyds_loop(
    samples: &mut [Sample],
    centroids: &mut [Centroid],
    config: &Config,
) -> Result<LloydsLoopResult, KmeansError> {
    let mut iterations = 0;

    loop {
        if config.max_iterations.is_some_and(|max| iterations >= max) {
            warn!(iterations, "k-means stopped at the iteration cap");
            return Ok(LloydsLoopResult {
                iterations,
                converged: false,
            });
        }

        let step = iterate(samples, centroids, config.empty_centroid)?;
        iterations += 1;

        if step.deltas == 0 {
            return Ok(LloydsLoopResult {
                iterations,
                converged: true,
            });
        }
    }
}
