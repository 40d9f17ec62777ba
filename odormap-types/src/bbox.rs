use crate::point::Point3d;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in the x/y plane.
///
/// This is a wrapper around `geo::Rect`. Containment is strict: a point lying
/// exactly on an edge is outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAlignedRect {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl AxisAlignedRect {
    /// Create a rectangle from its x range and y range.
    ///
    /// # Examples
    ///
    /// ```
    /// use odormap_types::bbox::AxisAlignedRect;
    /// use odormap_types::point::Point3d;
    ///
    /// let wall = AxisAlignedRect::new(5.0, 5.5, 0.0, 2.5);
    /// assert!(wall.contains(&Point3d::planar(5.2, 1.0)));
    /// assert!(!wall.contains(&Point3d::planar(5.0, 1.0)));
    /// ```
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: x_min, y: y_min },
                geo::coord! { x: x_max, y: y_max },
            ),
        }
    }

    /// Create a rectangle from its lower-left and upper-right corners, the
    /// order used by obstacle list files.
    pub fn from_corners(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self::new(x_min, x_max, y_min, y_max)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn x_min(&self) -> f64 {
        self.rect.min().x
    }

    pub fn x_max(&self) -> f64 {
        self.rect.max().x
    }

    pub fn y_min(&self) -> f64 {
        self.rect.min().y
    }

    pub fn y_max(&self) -> f64 {
        self.rect.max().y
    }

    pub fn width(&self) -> f64 {
        self.x_max() - self.x_min()
    }

    pub fn height(&self) -> f64 {
        self.y_max() - self.y_min()
    }

    /// Check whether the point lies strictly inside the rectangle.
    ///
    /// The z coordinate is ignored.
    pub fn contains(&self, point: &Point3d) -> bool {
        point.x() > self.x_min()
            && point.x() < self.x_max()
            && point.y() > self.y_min()
            && point.y() < self.y_max()
    }
}

/// An ordered list of obstacle rectangles.
///
/// Rectangles may overlap. Lookups report the first match, so insertion order
/// is significant and is never changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSet {
    rects: Vec<AxisAlignedRect>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rect: AxisAlignedRect) {
        self.rects.push(rect);
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AxisAlignedRect> {
        self.rects.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AxisAlignedRect> {
        self.rects.iter()
    }

    /// Index of the first rectangle containing `point`, if any.
    pub fn find(&self, point: &Point3d) -> Option<usize> {
        self.rects.iter().position(|rect| rect.contains(point))
    }

    /// True when any rectangle contains `point`.
    pub fn contains(&self, point: &Point3d) -> bool {
        self.find(point).is_some()
    }
}

impl FromIterator<AxisAlignedRect> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = AxisAlignedRect>>(iter: I) -> Self {
        Self {
            rects: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ObstacleSet {
    type Item = &'a AxisAlignedRect;
    type IntoIter = std::slice::Iter<'a, AxisAlignedRect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}
