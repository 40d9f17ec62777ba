use geo::Point;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A position in the sensing area with x, y and a height coordinate z.
///
/// The planar part is stored as a `geo::Point` so it can be handed to `geo`
/// algorithms directly. The gas map itself only looks at x and y; z is
/// carried along so sensor positions keep their mounting height.
///
/// # Examples
///
/// ```
/// use odormap_types::point::Point3d;
///
/// let sensor = Point3d::new(3.5, 1.2, 0.1);
/// assert_eq!(sensor.z(), 0.1);
///
/// let other = Point3d::new(6.5, 5.2, 12.1);
/// assert_eq!(sensor.distance_3d(&other), 13.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    /// The planar x/y point
    pub point: Point<f64>,
    /// Height above the floor
    pub z: f64,
}

impl Point3d {
    /// Create a new point from x, y and z coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            point: Point::new(x, y),
            z,
        }
    }

    /// Create a point on the floor plane (z = 0).
    pub fn planar(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    /// Create a 3D point from a 2D point and a height.
    pub fn from_point_and_height(point: Point<f64>, z: f64) -> Self {
        Self { point, z }
    }

    /// The origin.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Project onto the floor plane by discarding z.
    pub fn to_2d(&self) -> Point<f64> {
        self.point
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite() && self.z.is_finite()
    }

    /// Straight-line Euclidean distance in 3D.
    pub fn distance_3d(&self, other: &Point3d) -> f64 {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Euclidean distance in the x/y plane, ignoring height.
    #[inline]
    pub fn distance_2d(&self, other: &Point3d) -> f64 {
        (self.x() - other.x()).hypot(self.y() - other.y())
    }
}

impl Default for Point3d {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Point3d {
    type Output = Point3d;

    fn add(self, rhs: Point3d) -> Point3d {
        Point3d::new(self.x() + rhs.x(), self.y() + rhs.y(), self.z + rhs.z)
    }
}

impl From<(f64, f64, f64)> for Point3d {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(f64, f64)> for Point3d {
    fn from((x, y): (f64, f64)) -> Self {
        Self::planar(x, y)
    }
}
