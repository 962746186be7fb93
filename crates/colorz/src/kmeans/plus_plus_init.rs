use crate::types::{Point3, Sample};
use rand::RngExt;
use tracing::trace;

/// First index whose running weight reaches or exceeds `threshold`. Falls
/// back to the last index if rounding leaves the running sum short.
#[inline(always)]
fn pick_by_threshold(weights: &[f64], threshold: f64) -> usize {
    let mut cumsum = 0.0;

    for (i, &weight) in weights.iter().enumerate() {
        cumsum += weight;
        if cumsum >= threshold {
            return i;
        }
    }

    weights.len() - 1
}

/// Pick an index with probability proportional to its weight, using a
/// threshold drawn uniformly from `[0, sum)`. With nothing left to weigh, the
/// last index.
#[inline(always)]
fn sample_by_distance(rng: &mut impl RngExt, weights: &[f64], sum: f64) -> usize {
    if sum.is_nan() || sum <= 0.0 {
        return weights.len() - 1;
    }

    pick_by_threshold(weights, rng.random::<f64>() * sum)
}

/// Squared distance scaled by the sample's frequency weight.
#[inline(always)]
fn weighted_distance(sample: &Sample, position: Point3) -> f64 {
    sample.point.squared_distance(position) * sample.weight
}

/// Choose `k` sample indices to seed the centroids with.
///
/// Each step after the first draws `candidates` samples with probability
/// proportional to their weighted squared distance from the nearest centroid
/// chosen so far, and keeps the one that minimises the total of those
/// distances. Indices may repeat when there are fewer distinct positions than
/// `k`.
pub fn find_initial(
    rng: &mut impl RngExt,
    samples: &[Sample],
    k: usize,
    candidates: usize,
) -> Vec<usize> {
    let n = samples.len();
    assert!(n > 0);
    assert!(k > 0);
    assert!(candidates > 0);

    let mut init_points = Vec::<usize>::with_capacity(k);
    let c0 = rng.random_range(0..n);
    init_points.push(c0);
    trace!(centroid = 0, sample = c0, "seeded first centroid");

    let first = samples[c0].point;
    let mut min_distances: Vec<f64> = samples
        .iter()
        .map(|s| weighted_distance(s, first))
        .collect();
    let mut min_distances_sum: f64 = min_distances.iter().sum();

    let mut candidate_min_distances = vec![vec![0.0f64; n]; candidates];
    let mut drawn = vec![0usize; candidates];

    for centroid in 1..k {
        for candidate in drawn.iter_mut() {
            *candidate = sample_by_distance(rng, &min_distances, min_distances_sum);
        }

        let mut best_potential = f64::INFINITY;
        let mut best = 0;
        for (j, &candidate) in drawn.iter().enumerate() {
            let position = samples[candidate].point;
            let slot = &mut candidate_min_distances[j];
            let mut potential = 0.0;
            for (i, sample) in samples.iter().enumerate() {
                let d = weighted_distance(sample, position).min(min_distances[i]);
                slot[i] = d;
                potential += d;
            }
            if potential < best_potential {
                best_potential = potential;
                best = j;
            }
        }

        std::mem::swap(&mut min_distances, &mut candidate_min_distances[best]);
        min_distances_sum = best_potential;
        init_points.push(drawn[best]);
        trace!(
            centroid,
            sample = drawn[best],
            potential = best_potential,
            "seeded centroid"
        );
    }

    init_points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use pretty_assertions::{assert_eq, assert_ne};

    fn samples(points: &[[f64; 3]]) -> Vec<Sample> {
        points
            .iter()
            .map(|&p| Sample::new(Point3::from(p), 1.0))
            .collect()
    }

    fn diagonal(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .map(|&v| Sample::new(Point3::new(v, v, v), 1.0))
            .collect()
    }

    #[test]
    fn basic_invariants() {
        let mut rng = rng::new();
        let data = diagonal(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        for k in 1..=4 {
            let result = find_initial(&mut rng, &data, k, 1);
            assert_eq!(result.len(), k, "must return exactly k indices");

            for &idx in &result {
                assert!(idx < data.len(), "index must be valid");
            }

            let mut sorted = result.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), k, "indices must be distinct");
        }
    }

    #[test]
    fn k_equals_one() {
        let mut rng = rng::new();
        let data = diagonal(&[0.0, 1.0, 2.0]);

        let result = find_initial(&mut rng, &data, 1, 1);
        assert_eq!(result.len(), 1);
        assert!(result[0] < 3);
    }

    #[test]
    fn k_equals_n() {
        let mut rng = rng::new();
        let data = diagonal(&[0.0, 10.0, 20.0, 30.0]);

        let result = find_initial(&mut rng, &data, 4, 1);
        let mut sorted = result.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn k_greater_than_n_repeats_last_sample() {
        let mut rng = rng::new();
        let data = diagonal(&[0.0, 10.0, 20.0]);

        // Once every position is taken all weights are zero
        let result = find_initial(&mut rng, &data, 5, 1);
        assert_eq!(result.len(), 5);

        let mut first_three = result[..3].to_vec();
        first_three.sort();
        assert_eq!(first_three, vec![0, 1, 2]);
        assert_eq!(&result[3..], &[2, 2]);
    }

    #[test]
    fn all_zero_weights_pick_last() {
        let mut rng = rng::new();
        assert_eq!(sample_by_distance(&mut rng, &[0.0, 0.0, 0.0], 0.0), 2);
    }

    #[test]
    fn zero_weight_samples_are_skipped() {
        let mut rng = rng::new();
        for _ in 0..100 {
            assert_eq!(
                sample_by_distance(&mut rng, &[0.0, 0.0, 5.0, 0.0], 5.0),
                2
            );
        }
    }

    #[test]
    fn unequal_cluster_sizes() {
        let mut rng = rng::new();

        // Dense cluster near origin (indices 0..10) + two distant outliers (10, 11)
        let mut values: Vec<f64> = (0..10).map(|i| i as f64 * 0.01).collect();
        values.push(100.0);
        values.push(-100.0);
        let data = diagonal(&values);

        let result = find_initial(&mut rng, &data, 3, 1);
        assert!(
            result.contains(&10),
            "outlier at index 10 should be selected"
        );
        assert!(
            result.contains(&11),
            "outlier at index 11 should be selected"
        );
    }

    #[test]
    fn duplicate_coordinates() {
        let mut rng = rng::new();

        // Two points at the same location + one elsewhere
        let data = diagonal(&[0.0, 0.0, 10.0]);

        let result = find_initial(&mut rng, &data, 2, 1);
        assert_eq!(result.len(), 2);

        let coords: Vec<Point3> = result.iter().map(|&i| data[i].point).collect();
        assert_ne!(
            coords[0], coords[1],
            "selected centroids should have distinct coordinates"
        );
    }

    #[test]
    fn greedy_candidates_cover_three_clusters() {
        let mut rng = rng::new();

        // Indices:     0    1     2    3    4     5
        // Clusters:    0    1     2    0    1     2
        let data = diagonal(&[0.0, 1.0, -1.0, 0.1, 1.1, -1.1]);

        let result = find_initial(&mut rng, &data, 3, 3);
        assert!(
            result.contains(&0) || result.contains(&3),
            "The result contains the first cluster"
        );
        assert!(
            result.contains(&1) || result.contains(&4),
            "The result contains the second cluster"
        );
        assert!(
            result.contains(&2) || result.contains(&5),
            "The result contains the third cluster"
        );
    }

    #[test]
    fn threshold_reached_exactly_is_selected() {
        // A zero threshold is reached by the very first running sum
        assert_eq!(pick_by_threshold(&[0.0, 0.0, 5.0], 0.0), 0);
        assert_eq!(pick_by_threshold(&[2.0, 3.0, 4.0], 2.0), 0);
        assert_eq!(pick_by_threshold(&[2.0, 3.0, 4.0], 5.0), 1);
        assert_eq!(pick_by_threshold(&[2.0, 3.0, 4.0], 5.5), 2);
    }

    #[test]
    fn threshold_past_the_sum_picks_last() {
        assert_eq!(pick_by_threshold(&[1.0, 1.0], 2.5), 1);
    }

    #[test]
    fn frequency_weight_steers_seeding() {
        let mut rng = rng::new();

        // Origin, a heavy sample at x=1 and a light one at x=3. From a first
        // seed at the origin the heavy sample weighs 1 * 1000 against 9 * 1.
        let mut data = samples(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        data[1].weight = 1000.0;

        let mut from_origin = 0;
        let mut heavy = 0;
        for _ in 0..3000 {
            let seeds = find_initial(&mut rng, &data, 2, 1);
            if seeds[0] == 0 {
                from_origin += 1;
                if seeds[1] == 1 {
                    heavy += 1;
                }
            }
        }

        assert!(from_origin > 500, "origin seeded first {from_origin} times");
        // Unweighted, the light sample would win 9 draws out of 10
        assert!(
            heavy * 10 > from_origin * 9,
            "heavy sample picked {heavy} times out of {from_origin}"
        );
    }

    #[test]
    fn frequency_weight_steers_greedy_potential() {
        let mut rng = rng::new();

        // Same layout through the greedy path, where the candidate's own
        // weighted distances decide the kept potential
        let mut data = samples(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        data[1].weight = 1000.0;

        let mut from_origin = 0;
        let mut heavy = 0;
        for _ in 0..3000 {
            let seeds = find_initial(&mut rng, &data, 2, 3);
            if seeds[0] == 0 {
                from_origin += 1;
                if seeds[1] == 1 {
                    heavy += 1;
                }
            }
        }

        assert!(from_origin > 500, "origin seeded first {from_origin} times");
        assert!(
            heavy * 10 > from_origin * 9,
            "heavy sample kept {heavy} times out of {from_origin}"
        );
    }

    #[test]
    fn weighted_seeding_separates_blobs_more_often_than_uniform() {
        let mut rng = rng::new();

        // 18 points around the origin, 2 points around 100
        let mut values: Vec<f64> = (0..18).map(|i| i as f64 * 0.01).collect();
        values.extend([100.0, 100.05]);
        let data = diagonal(&values);
        let in_far_blob = |i: usize| i >= 18;

        let trials = 1000;
        let separated = (0..trials)
            .filter(|_| {
                let seeds = find_initial(&mut rng, &data, 2, 1);
                in_far_blob(seeds[0]) != in_far_blob(seeds[1])
            })
            .count();

        // Two uniform draws land in different blobs with p = 2 * 0.9 * 0.1 = 0.18
        let uniform = 0.18 * trials as f64;
        assert!(
            separated as f64 > uniform,
            "separated {separated} times, uniform expectation {uniform}"
        );
        assert!(separated > 950, "separated {separated} times");
    }
}
