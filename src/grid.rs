//! Discretisation of the mapped rectangle into cells.

use crate::config::DomainConfig;
use crate::error::{GasMapError, Result};
use geo::Rect;
use odormap_types::point::Point3d;

/// Grid axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Immutable description of the gridded domain.
///
/// Cell `i` along an axis is centred on `min + i * resolution`, so cell 0 sits
/// on the lower bound and the last cell sits half a resolution below the
/// upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialGrid {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    nx: usize,
    ny: usize,
    resol_x: f64,
    resol_y: f64,
}

impl SpatialGrid {
    pub fn new(domain: &DomainConfig) -> Result<Self> {
        domain.validate()?;

        let resol_x = (domain.x_max - domain.x_min) / domain.x_bins as f64;
        let resol_y = (domain.y_max - domain.y_min) / domain.y_bins as f64;
        if !(resol_x > 0.0 && resol_y > 0.0) {
            return Err(GasMapError::InvalidConfig(format!(
                "Grid resolution must be positive, got ({}, {})",
                resol_x, resol_y
            )));
        }

        Ok(Self {
            x_min: domain.x_min,
            x_max: domain.x_max,
            y_min: domain.y_min,
            y_max: domain.y_max,
            nx: domain.x_bins,
            ny: domain.y_bins,
            resol_x,
            resol_y,
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bins(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.nx,
            Axis::Y => self.ny,
        }
    }

    pub fn min(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x_min,
            Axis::Y => self.y_min,
        }
    }

    pub fn max(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x_max,
            Axis::Y => self.y_max,
        }
    }

    pub fn resolution(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.resol_x,
            Axis::Y => self.resol_y,
        }
    }

    /// Physical extent of the domain.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.x_min, y: self.y_min },
            geo::coord! { x: self.x_max, y: self.y_max },
        )
    }

    /// Nearest cell index for a coordinate. Not bounds-checked: coordinates
    /// outside the domain give indices outside `0..bins(axis)`.
    #[inline]
    pub fn to_index(&self, coord: f64, axis: Axis) -> i64 {
        ((coord - self.min(axis)) / self.resolution(axis)).round() as i64
    }

    /// Coordinate of the centre of cell `index`.
    #[inline]
    pub fn cell_center(&self, index: i64, axis: Axis) -> f64 {
        index as f64 * self.resolution(axis) + self.min(axis)
    }

    /// Clamp a raw index into `0..bins(axis)`.
    #[inline]
    pub fn clamp_index(&self, index: i64, axis: Axis) -> usize {
        let last = self.bins(axis) as i64 - 1;
        index.clamp(0, last) as usize
    }

    /// True when the point lies within the physical bounds (edges included).
    pub fn contains(&self, point: &Point3d) -> bool {
        (self.x_min..=self.x_max).contains(&point.x())
            && (self.y_min..=self.y_max).contains(&point.y())
    }

    /// Cell holding `point`, or `None` when the point is outside the domain.
    ///
    /// Points on the upper strip of the domain round to one past the last
    /// cell and are clamped back onto it.
    pub fn cell_of(&self, point: &Point3d) -> Option<(usize, usize)> {
        if !self.contains(point) {
            return None;
        }
        Some((
            self.clamp_index(self.to_index(point.x(), Axis::X), Axis::X),
            self.clamp_index(self.to_index(point.y(), Axis::Y), Axis::Y),
        ))
    }

    /// Centre of cell `(i, j)` as a floor-level point.
    pub fn center_of(&self, i: usize, j: usize) -> Point3d {
        Point3d::planar(
            self.cell_center(i as i64, Axis::X),
            self.cell_center(j as i64, Axis::Y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid() -> SpatialGrid {
        SpatialGrid::new(&DomainConfig::new(0.0, 4.0, 0.0, 4.0).with_bins(4, 4)).unwrap()
    }

    #[test]
    fn test_resolution() {
        let grid = unit_grid();
        assert_eq!(grid.resolution(Axis::X), 1.0);
        assert_eq!(grid.resolution(Axis::Y), 1.0);
        assert_eq!(grid.len(), 16);

        let reference = SpatialGrid::new(&DomainConfig::default()).unwrap();
        assert!((reference.resolution(Axis::X) - 0.156_121_875).abs() < 1e-12);
        assert!((reference.resolution(Axis::Y) - 0.062_212_5).abs() < 1e-12);
    }

    #[test]
    fn test_to_index_rounds() {
        let grid = unit_grid();
        assert_eq!(grid.to_index(2.0, Axis::X), 2);
        assert_eq!(grid.to_index(2.4, Axis::X), 2);
        assert_eq!(grid.to_index(2.6, Axis::Y), 3);
        assert_eq!(grid.to_index(-3.0, Axis::X), -3);
        assert_eq!(grid.to_index(9.0, Axis::Y), 9);
    }

    #[test]
    fn test_cell_center_inverts_index() {
        let grid = SpatialGrid::new(&DomainConfig::default()).unwrap();
        for i in 0..64 {
            let x = grid.cell_center(i, Axis::X);
            assert_eq!(grid.to_index(x, Axis::X), i);
            let y = grid.cell_center(i, Axis::Y);
            assert_eq!(grid.to_index(y, Axis::Y), i);
        }
    }

    #[test]
    fn test_clamp_index() {
        let grid = unit_grid();
        assert_eq!(grid.clamp_index(-5, Axis::X), 0);
        assert_eq!(grid.clamp_index(2, Axis::X), 2);
        assert_eq!(grid.clamp_index(4, Axis::Y), 3);
    }

    #[test]
    fn test_cell_of() {
        let grid = unit_grid();
        assert_eq!(grid.cell_of(&Point3d::planar(2.0, 1.0)), Some((2, 1)));
        assert_eq!(grid.cell_of(&Point3d::planar(4.0, 4.0)), Some((3, 3)));
        assert_eq!(grid.cell_of(&Point3d::planar(0.0, 0.0)), Some((0, 0)));
        assert_eq!(grid.cell_of(&Point3d::planar(4.01, 1.0)), None);
        assert_eq!(grid.cell_of(&Point3d::planar(1.0, -0.01)), None);
    }

    #[test]
    fn test_bounds_and_center() {
        let grid = unit_grid();
        let bounds = grid.bounds();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.max().y, 4.0);
        assert_eq!(grid.center_of(3, 1), Point3d::planar(3.0, 1.0));
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let result = SpatialGrid::new(&DomainConfig::new(1.0, 1.0, 0.0, 1.0));
        assert!(matches!(result, Err(GasMapError::InvalidConfig(_))));
    }
}
