//! Organized point cloud container.
//!
//! An organized cloud stores one point per sensor pixel in row-major order, so the
//! point for pixel `(row, col)` lives at `row * width + col`. Pixels without a valid
//! measurement carry a point with non-finite coordinates (conventionally NaN) and
//! are ignored by every query.

/// A 3D point in sensor coordinates (Z points away from the sensor).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Depth.
    pub z: f64,
}

impl Point3 {
    /// Creates a point from its coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// A point marking a pixel with no measurement.
    #[inline]
    pub const fn invalid() -> Self {
        Point3::new(f64::NAN, f64::NAN, f64::NAN)
    }

    /// Returns true if all three coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn sqr_distance(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

impl From<(f64, f64, f64)> for Point3 {
    #[inline]
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Point3::new(x, y, z)
    }
}

impl From<[f64; 3]> for Point3 {
    #[inline]
    fn from([x, y, z]: [f64; 3]) -> Self {
        Point3::new(x, y, z)
    }
}

/// Row-major grid of points produced by a depth sensor.
///
/// The fields are public so a cloud can be assembled directly from sensor buffers.
/// The `width * height == points.len()` invariant is checked when the cloud is
/// bound to a search engine, see
/// [`OrganizedNeighborSearch::set_input_cloud`](crate::OrganizedNeighborSearch::set_input_cloud).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrganizedCloud {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Points in row-major order.
    pub points: Vec<Point3>,
}

impl OrganizedCloud {
    /// Creates a cloud from its dimensions and row-major points.
    pub fn new(width: usize, height: usize, points: Vec<Point3>) -> Self {
        OrganizedCloud { width, height, points }
    }

    /// Creates a `width` x `height` cloud with every pixel invalid.
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        OrganizedCloud {
            width,
            height,
            points: vec![Point3::invalid(); width.saturating_mul(height)],
        }
    }

    /// Number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns true if the point count matches the grid dimensions.
    pub fn is_organized(&self) -> bool {
        self.width
            .checked_mul(self.height)
            .is_some_and(|n| n == self.points.len())
    }

    /// Flat index of the pixel at `(row, col)`.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Point stored at `(row, col)`, or `None` outside the grid.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> Option<&Point3> {
        if row < self.height && col < self.width {
            self.points.get(self.index_of(row, col))
        } else {
            None
        }
    }

    /// Iterator over `(index, point)` pairs of pixels holding a finite point.
    pub fn valid_points(&self) -> impl Iterator<Item = (usize, &Point3)> + '_ {
        self.points.iter().enumerate().filter(|(_, p)| p.is_finite())
    }
}
