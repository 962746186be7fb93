// sklearn KMeans default
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// How much each distinct sample counts towards seeding and centroid means.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Weighting {
    /// Every distinct sample counts once, whatever its frequency.
    #[default]
    Distinct,
    /// Each sample counts as many times as the source reports in
    /// [`PointSource::weight_at`](crate::PointSource::weight_at).
    Frequency,
}

/// What to do with a centroid that ends up with no samples assigned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EmptyCentroid {
    /// Keep the centroid at its previous position for the iteration.
    #[default]
    Freeze,
    /// Abort the run with [`KmeansError::DegenerateCentroid`](super::KmeansError::DegenerateCentroid).
    Fail,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    pub weighting: Weighting,
    pub empty_centroid: EmptyCentroid,
    /// Upper bound on refinement iterations. `None` runs until assignments
    /// stop changing.
    pub max_iterations: Option<usize>,
    /// Candidates drawn per seeding step (greedy k-means++). 1 is plain
    /// k-means++.
    pub seeding_candidates: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weighting: Weighting::default(),
            empty_centroid: EmptyCentroid::default(),
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            seeding_candidates: 1,
        }
    }
}

impl Config {
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_empty_centroid(mut self, policy: EmptyCentroid) -> Self {
        self.empty_centroid = policy;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seeding_candidates(mut self, candidates: usize) -> Self {
        self.seeding_candidates = candidates;
        self
    }
}
