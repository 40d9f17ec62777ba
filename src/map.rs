//! Incremental kernel DM+V gas distribution map.
//!
//! Every sample is spread over the cells within the cut-off radius using the
//! wind-stretched Gaussian kernel. Each cell keeps the accumulated kernel
//! weight and weight-times-concentration, from which the mean concentration
//! and a confidence value are derived immediately after every update.
//!
//! ```rust
//! use odormap::{Config, DomainConfig, GasMap, KernelParams, Point3d};
//!
//! let config = Config::new(
//!     DomainConfig::new(0.0, 4.0, 0.0, 4.0).with_bins(4, 4),
//!     KernelParams::isotropic(1.0, 2.0),
//! );
//! let mut map = GasMap::new(&config)?;
//! map.ingest(Point3d::planar(2.0, 2.0), 10.0)?;
//!
//! assert!((map.query(&Point3d::planar(2.0, 2.0))? - 10.0).abs() < 1e-12);
//! assert_eq!(map.dump().split(", ").count(), 16);
//! # Ok::<(), odormap::GasMapError>(())
//! ```

use crate::config::{Config, KernelParams};
use crate::error::{GasMapError, Result};
use crate::grid::{Axis, SpatialGrid};
use crate::kernel::AnisotropicKernel;
use odormap_types::point::Point3d;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

const DUMP_SEPARATOR: &str = ", ";

/// Dense row-major 2-D array of cell values, indexed `[i][j]` with `i` along x.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl Layer {
    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            data: vec![0.0; nx * ny],
        }
    }

    pub fn from_vec(nx: usize, ny: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != nx * ny {
            return Err(GasMapError::InvalidInput(format!(
                "Expected {} values for a {}x{} layer, got {}",
                nx * ny,
                nx,
                ny,
                data.len()
            )));
        }
        Ok(Self { nx, ny, data })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        i * self.ny + j
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.nx && j < self.ny).then(|| self.data[self.offset(i, j)])
    }

    #[inline]
    fn cell_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        let offset = self.offset(i, j);
        &mut self.data[offset]
    }

    /// Values in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn clear(&mut self) {
        self.data.fill(0.0);
    }
}

/// A position paired with the concentration measured there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub position: Point3d,
    pub concentration: f64,
}

impl Observation {
    pub fn new(position: Point3d, concentration: f64) -> Self {
        Self {
            position,
            concentration,
        }
    }
}

/// Summary of the current map contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStats {
    pub samples_ingested: u64,
    /// Cells that have received any kernel weight
    pub touched_cells: usize,
    pub total_cells: usize,
    /// Highest mean concentration and the cell holding it
    pub peak_concentration: Option<(usize, usize, f64)>,
    /// Mean confidence over touched cells
    pub mean_confidence: f64,
}

/// Index window updated by a single sample, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateWindow {
    pub x: (usize, usize),
    pub y: (usize, usize),
}

impl UpdateWindow {
    pub fn contains(&self, i: usize, j: usize) -> bool {
        (self.x.0..=self.x.1).contains(&i) && (self.y.0..=self.y.1).contains(&j)
    }
}

/// Kernel DM+V estimator over a fixed grid.
#[derive(Debug, Clone)]
pub struct GasMap {
    grid: SpatialGrid,
    params: KernelParams,
    kernel: AnisotropicKernel,
    update_range_x: i64,
    update_range_y: i64,
    weight: Layer,
    weighted_concentration: Layer,
    average_concentration: Layer,
    confidence: Layer,
    samples_ingested: u64,
}

impl GasMap {
    /// Create an empty map for the given domain and kernel.
    pub fn new(config: &Config) -> Result<Self> {
        let grid = SpatialGrid::new(&config.domain)?;
        let kernel = AnisotropicKernel::new(&config.kernel)?;
        let (nx, ny) = (grid.nx(), grid.ny());
        let (update_range_x, update_range_y) = update_ranges(&grid, &config.kernel);

        Ok(Self {
            grid,
            params: config.kernel.clone(),
            kernel,
            update_range_x,
            update_range_y,
            weight: Layer::zeros(nx, ny),
            weighted_concentration: Layer::zeros(nx, ny),
            average_concentration: Layer::zeros(nx, ny),
            confidence: Layer::zeros(nx, ny),
            samples_ingested: 0,
        })
    }

    pub fn builder() -> crate::builder::GasMapBuilder {
        crate::builder::GasMapBuilder::new()
    }

    /// Replace the kernel parameters and reset every layer to zero.
    ///
    /// On error the map is left exactly as it was.
    pub fn configure(&mut self, params: KernelParams) -> Result<()> {
        let kernel = AnisotropicKernel::new(&params)?;
        let (update_range_x, update_range_y) = update_ranges(&self.grid, &params);

        if update_range_x == 0 || update_range_y == 0 {
            log::warn!(
                "Cut-off radius {} is below the grid resolution; samples will only update their own cell along at least one axis",
                params.rco
            );
        }

        self.kernel = kernel;
        self.params = params;
        self.update_range_x = update_range_x;
        self.update_range_y = update_range_y;
        self.weight.clear();
        self.weighted_concentration.clear();
        self.average_concentration.clear();
        self.confidence.clear();
        self.samples_ingested = 0;

        log::debug!(
            "Configured gas map: a={:.4} b={:.4} update range=({}, {})",
            self.kernel.a(),
            self.kernel.b(),
            self.update_range_x,
            self.update_range_y
        );
        Ok(())
    }

    /// Cells a sample at `position` is allowed to update, or `None` when the
    /// window falls entirely outside the grid.
    pub fn update_window(&self, position: &Point3d) -> Option<UpdateWindow> {
        let ix = self.grid.to_index(position.x(), Axis::X);
        let iy = self.grid.to_index(position.y(), Axis::Y);

        let x = clamp_span(ix, self.update_range_x, self.grid.nx())?;
        let y = clamp_span(iy, self.update_range_y, self.grid.ny())?;
        Some(UpdateWindow { x, y })
    }

    /// Fold one sample into the map.
    ///
    /// Only cells inside [`GasMap::update_window`] are touched.
    pub fn ingest(&mut self, position: Point3d, concentration: f64) -> Result<()> {
        if !position.x().is_finite() || !position.y().is_finite() {
            return Err(GasMapError::InvalidInput(format!(
                "Sample position must be finite, got ({}, {})",
                position.x(),
                position.y()
            )));
        }
        if !concentration.is_finite() {
            return Err(GasMapError::InvalidInput(format!(
                "Concentration must be finite, got: {}",
                concentration
            )));
        }

        self.samples_ingested += 1;

        let Some(window) = self.update_window(&position) else {
            log::trace!(
                "Sample at ({}, {}) is too far outside the domain to update any cell",
                position.x(),
                position.y()
            );
            return Ok(());
        };

        let scale = self.params.scaling_param * self.params.scaling_param;
        for i in window.x.0..=window.x.1 {
            let dx = self.grid.cell_center(i as i64, Axis::X) - position.x();
            for j in window.y.0..=window.y.1 {
                let dy = self.grid.cell_center(j as i64, Axis::Y) - position.y();
                let w = self.kernel.weight(dx, dy);

                let weight = self.weight.cell_mut(i, j);
                *weight += w;
                let total = *weight;

                let weighted = self.weighted_concentration.cell_mut(i, j);
                *weighted += concentration * w;
                let weighted = *weighted;

                *self.confidence.cell_mut(i, j) = 1.0 - (-total / scale).exp();
                if total > 0.0 {
                    *self.average_concentration.cell_mut(i, j) = weighted / total;
                }
            }
        }

        log::trace!(
            "Sample #{} ({}, {}) = {} updated cells x {:?} y {:?}",
            self.samples_ingested,
            position.x(),
            position.y(),
            concentration,
            window.x,
            window.y
        );
        Ok(())
    }

    /// Fold paired positions and concentrations in order.
    pub fn ingest_batch(&mut self, positions: &[Point3d], concentrations: &[f64]) -> Result<()> {
        if positions.len() != concentrations.len() {
            return Err(GasMapError::InvalidInput(format!(
                "Got {} positions but {} concentrations",
                positions.len(),
                concentrations.len()
            )));
        }

        for (position, &concentration) in positions.iter().zip(concentrations) {
            self.ingest(*position, concentration)?;
        }
        Ok(())
    }

    /// Fold a stream of observations in order.
    pub fn ingest_observations<I>(&mut self, observations: I) -> Result<()>
    where
        I: IntoIterator<Item = Observation>,
    {
        for observation in observations {
            self.ingest(observation.position, observation.concentration)?;
        }
        Ok(())
    }

    /// Mean concentration of the cell nearest to `position`.
    ///
    /// Positions outside the domain bounds are rejected; positions inside are
    /// snapped to the nearest cell.
    pub fn query(&self, position: &Point3d) -> Result<f64> {
        let (i, j) = self
            .grid
            .cell_of(position)
            .ok_or(GasMapError::OutOfDomain {
                x: position.x(),
                y: position.y(),
            })?;
        Ok(self.average_concentration.data[self.average_concentration.offset(i, j)])
    }

    /// [`GasMap::query`] for every position, failing on the first one outside
    /// the domain.
    pub fn query_many(&self, positions: &[Point3d]) -> Result<Vec<f64>> {
        positions.iter().map(|p| self.query(p)).collect()
    }

    /// Mean concentrations as text: row-major, `", "` separated, newline
    /// terminated. Values use shortest round-trip formatting so
    /// [`parse_dump`] restores them exactly.
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity(self.grid.len() * 12);
        for (n, value) in self.average_concentration.as_slice().iter().enumerate() {
            if n > 0 {
                out.push_str(DUMP_SEPARATOR);
            }
            out.push_str(&value.to_string());
        }
        out.push('\n');
        out
    }

    /// Stream [`GasMap::dump`] into `writer`.
    pub fn write_dump<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.dump().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    pub fn kernel(&self) -> &AnisotropicKernel {
        &self.kernel
    }

    /// Update ranges in cells along x and y.
    pub fn update_ranges(&self) -> (i64, i64) {
        (self.update_range_x, self.update_range_y)
    }

    pub fn samples_ingested(&self) -> u64 {
        self.samples_ingested
    }

    pub fn weights(&self) -> &Layer {
        &self.weight
    }

    pub fn weighted_concentrations(&self) -> &Layer {
        &self.weighted_concentration
    }

    pub fn average_concentrations(&self) -> &Layer {
        &self.average_concentration
    }

    pub fn confidences(&self) -> &Layer {
        &self.confidence
    }

    pub fn weight_at(&self, i: usize, j: usize) -> Option<f64> {
        self.weight.get(i, j)
    }

    pub fn weighted_concentration_at(&self, i: usize, j: usize) -> Option<f64> {
        self.weighted_concentration.get(i, j)
    }

    pub fn average_at(&self, i: usize, j: usize) -> Option<f64> {
        self.average_concentration.get(i, j)
    }

    pub fn confidence_at(&self, i: usize, j: usize) -> Option<f64> {
        self.confidence.get(i, j)
    }

    pub fn stats(&self) -> MapStats {
        let mut touched_cells = 0;
        let mut confidence_sum = 0.0;
        let mut peak: Option<(usize, usize, f64)> = None;

        for i in 0..self.grid.nx() {
            for j in 0..self.grid.ny() {
                let offset = self.weight.offset(i, j);
                if self.weight.data[offset] <= 0.0 {
                    continue;
                }
                touched_cells += 1;
                confidence_sum += self.confidence.data[offset];

                let average = self.average_concentration.data[offset];
                if peak.is_none_or(|(_, _, best)| average > best) {
                    peak = Some((i, j, average));
                }
            }
        }

        MapStats {
            samples_ingested: self.samples_ingested,
            touched_cells,
            total_cells: self.grid.len(),
            peak_concentration: peak,
            mean_confidence: if touched_cells > 0 {
                confidence_sum / touched_cells as f64
            } else {
                0.0
            },
        }
    }
}

impl fmt::Display for GasMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gas distribution map:")?;
        f.write_str(&self.dump())
    }
}

/// Rebuild a layer from [`GasMap::dump`] output.
///
/// A trailing separator before the newline is accepted.
pub fn parse_dump(text: &str, nx: usize, ny: usize) -> Result<Layer> {
    let body = text.trim_end();
    let body = body.strip_suffix(',').unwrap_or(body);

    let mut values = Vec::with_capacity(nx * ny);
    if !body.is_empty() {
        for (n, token) in body.split(',').enumerate() {
            let token = token.trim();
            let value = token.parse::<f64>().map_err(|e| {
                GasMapError::parse(1, format!("value #{} {:?}: {}", n + 1, token, e))
            })?;
            values.push(value);
        }
    }

    Layer::from_vec(nx, ny, values)
}

/// Cells covered by the cut-off radius along each axis, never wider than the grid.
fn update_ranges(grid: &SpatialGrid, params: &KernelParams) -> (i64, i64) {
    let widest = grid.nx().max(grid.ny()) as f64;
    (
        (params.rco / grid.resolution(Axis::X)).min(widest) as i64,
        (params.rco / grid.resolution(Axis::Y)).min(widest) as i64,
    )
}

/// Clamp `[center - range, center + range]` to `0..bins`.
///
/// `center` may be far outside the grid for distant samples.
fn clamp_span(center: i64, range: i64, bins: usize) -> Option<(usize, usize)> {
    let start = center.saturating_sub(range).max(0);
    let end = center.saturating_add(range).min(bins as i64 - 1);
    (start <= end).then_some((start as usize, end as usize))
}
