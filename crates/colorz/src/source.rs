use crate::types::Point3;

/// An ordered, already materialized collection of samples.
///
/// The engine copies every sample at construction and never calls back into
/// the source afterwards.
pub trait PointSource {
    fn len(&self) -> usize;

    /// Coordinates of the sample at `index`, or `None` if the source cannot
    /// provide them.
    fn coordinates_at(&self, index: usize) -> Option<[f64; 3]>;

    /// How many times the sample occurs in the original data. Only consulted
    /// when frequency weighting is enabled.
    fn weight_at(&self, _index: usize) -> f64 {
        1.0
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PointSource for [[f64; 3]] {
    fn len(&self) -> usize {
        <[[f64; 3]]>::len(self)
    }

    fn coordinates_at(&self, index: usize) -> Option<[f64; 3]> {
        self.get(index).copied()
    }
}

impl PointSource for Vec<[f64; 3]> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn coordinates_at(&self, index: usize) -> Option<[f64; 3]> {
        self.as_slice().coordinates_at(index)
    }
}

impl PointSource for [Point3] {
    fn len(&self) -> usize {
        <[Point3]>::len(self)
    }

    fn coordinates_at(&self, index: usize) -> Option<[f64; 3]> {
        self.get(index).map(|&p| p.into())
    }
}
