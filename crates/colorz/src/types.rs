use rgb::RGB8;

/// A position in the 3-coordinate space being clustered.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline(always)]
    pub fn squared_distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx.mul_add(dx, dy.mul_add(dy, dz * dz))
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

/// One entry of the engine's working copy of the input.
///
/// `weight` is 1.0 unless frequency weighting is enabled, in which case it is
/// the frequency reported by the source.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample {
    pub point: Point3,
    pub weight: f64,
    pub cluster: usize,
}

impl Sample {
    pub(crate) fn new(point: Point3, weight: f64) -> Self {
        Self {
            point,
            weight,
            cluster: 0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Centroid {
    pub point: Point3,
    /// Number of samples currently assigned to this centroid.
    pub count: usize,
}

impl Centroid {
    pub(crate) fn at(point: Point3) -> Self {
        Self { point, count: 0 }
    }

    /// Swatch color of this centroid, with each coordinate clamped to 0..=255
    /// and truncated.
    pub fn to_rgb8(&self) -> RGB8 {
        fn channel(v: f64) -> u8 {
            v.clamp(0.0, 255.0) as u8
        }
        RGB8::new(
            channel(self.point.x),
            channel(self.point.y),
            channel(self.point.z),
        )
    }
}
