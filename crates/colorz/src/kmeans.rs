use crate::source::PointSource;
use crate::types::{Centroid, Point3, Sample};
use rand::RngExt;
use snafu::prelude::*;
use tracing::debug;

pub mod config;
pub mod lloyds;
pub mod plus_plus_init;

pub use config::{Config, DEFAULT_MAX_ITERATIONS, EmptyCentroid, Weighting};

// References:
// - k-means++: The Advantages of Careful Seeding (D. Arthur, S. Vassilvitskii)
// - https://scikit-learn.org/stable/modules/generated/sklearn.cluster.KMeans.html
// - Noisy, Greedy and Not so Greedy k-Means++ (A. Bhattacharya et al)
//   https://drops.dagstuhl.de/storage/00lipics/lipics-vol173-esa2020/LIPIcs.ESA.2020.18/LIPIcs.ESA.2020.18.pdf

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum KmeansError {
    #[snafu(display("invalid configuration: {reason}"))]
    InvalidConfiguration { reason: String },

    #[snafu(display("centroid {index} has no samples assigned"))]
    DegenerateCentroid { index: usize },

    #[snafu(display("point source has no coordinates at index {index} (declared length {len})"))]
    SourceExhausted { index: usize, len: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Recompute/reassign iterations after the initial assignment.
    pub iterations: usize,
    /// `false` if the iteration cap stopped the run first.
    pub converged: bool,
}

/// The clustering engine.
///
/// Owns a copy of the samples and, once seeded, exactly `k` centroids. After
/// every public operation each sample's `cluster` indexes a valid centroid.
#[derive(Debug, Clone)]
pub struct Kmeans {
    config: Config,
    samples: Vec<Sample>,
    centroids: Vec<Centroid>,
}

impl Kmeans {
    pub fn new<S: PointSource + ?Sized>(source: &S) -> Result<Self, KmeansError> {
        Self::with_config(source, Config::default())
    }

    pub fn with_config<S: PointSource + ?Sized>(
        source: &S,
        config: Config,
    ) -> Result<Self, KmeansError> {
        let len = source.len();
        let mut samples = Vec::with_capacity(len);

        for index in 0..len {
            let coordinates = source
                .coordinates_at(index)
                .context(SourceExhaustedSnafu { index, len })?;

            let weight = match config.weighting {
                Weighting::Distinct => 1.0,
                Weighting::Frequency => {
                    let weight = source.weight_at(index);
                    ensure!(
                        weight.is_finite() && weight > 0.0,
                        InvalidConfigurationSnafu {
                            reason: format!("sample {index} has weight {weight}"),
                        }
                    );
                    weight
                }
            };

            samples.push(Sample::new(Point3::from(coordinates), weight));
        }

        Ok(Self {
            config,
            samples,
            centroids: Vec::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Choose `k` starting centroids with distance-weighted sampling and
    /// assign every sample to its nearest one.
    ///
    /// Replaces any previous centroid set.
    pub fn seed(&mut self, rng: &mut impl RngExt, k: usize) -> Result<(), KmeansError> {
        ensure!(
            k > 0,
            InvalidConfigurationSnafu {
                reason: "k must be at least 1",
            }
        );
        ensure!(
            !self.samples.is_empty(),
            InvalidConfigurationSnafu {
                reason: format!("cannot seed {k} centroids from an empty point source"),
            }
        );
        ensure!(
            self.config.seeding_candidates > 0,
            InvalidConfigurationSnafu {
                reason: "seeding needs at least one candidate per step",
            }
        );

        let seeds = plus_plus_init::find_initial(
            rng,
            &self.samples,
            k,
            self.config.seeding_candidates,
        );
        self.centroids = seeds
            .into_iter()
            .map(|i| Centroid::at(self.samples[i].point))
            .collect();

        for sample in self.samples.iter_mut() {
            sample.cluster = 0;
        }
        lloyds::assign_points(&mut self.samples, &mut self.centroids);

        debug!(k, samples = self.samples.len(), "seeded centroids");
        Ok(())
    }

    /// A single refinement iteration. Returns the number of samples that
    /// changed centroid.
    pub fn step(&mut self) -> Result<usize, KmeansError> {
        self.ensure_seeded()?;
        let iteration = lloyds::iterate(
            &mut self.samples,
            &mut self.centroids,
            self.config.empty_centroid,
        )?;
        Ok(iteration.deltas)
    }

    /// Refine until no sample changes centroid.
    pub fn cluster(&mut self) -> Result<RunStats, KmeansError> {
        self.ensure_seeded()?;
        let result = lloyds::lloyds_loop(&mut self.samples, &mut self.centroids, &self.config)?;
        debug!(
            iterations = result.iterations,
            converged = result.converged,
            "k-means finished"
        );
        Ok(RunStats {
            iterations: result.iterations,
            converged: result.converged,
        })
    }

    /// [`seed`](Self::seed) followed by [`cluster`](Self::cluster).
    pub fn run(&mut self, rng: &mut impl RngExt, k: usize) -> Result<RunStats, KmeansError> {
        self.seed(rng, k)?;
        self.cluster()
    }

    /// Current centroids; empty before seeding.
    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample indices assigned to each centroid, in sample order. Empty
    /// before seeding.
    pub fn membership(&self) -> Vec<Vec<usize>> {
        let mut clusters: Vec<Vec<usize>> = self
            .centroids
            .iter()
            .map(|c| Vec::with_capacity(c.count))
            .collect();
        if clusters.is_empty() {
            return clusters;
        }

        for (i, sample) in self.samples.iter().enumerate() {
            clusters[sample.cluster].push(i);
        }
        clusters
    }

    fn ensure_seeded(&self) -> Result<(), KmeansError> {
        ensure!(
            !self.centroids.is_empty(),
            InvalidConfigurationSnafu {
                reason: "centroids must be seeded before refinement",
            }
        );
        Ok(())
    }
}
