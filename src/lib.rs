//! Kernel DM+V gas distribution mapping.
//!
//! Point concentration samples taken at known positions are spread over a
//! regular grid with a wind-stretched Gaussian kernel. Each cell tracks the
//! accumulated kernel weight, the weighted mean concentration, and a
//! confidence that saturates towards one as weight accumulates.
//!
//! ```rust
//! use odormap::{GasMap, KernelParams, Point3d};
//!
//! let mut map = GasMap::builder()
//!     .bounds(0.0, 10.0, 0.0, 4.0)
//!     .bins(50, 20)
//!     .kernel(KernelParams::default())
//!     .build()?;
//!
//! map.ingest(Point3d::planar(3.0, 2.0), 0.8)?;
//! map.ingest_batch(
//!     &[Point3d::planar(6.0, 1.0), Point3d::planar(6.2, 1.1)],
//!     &[0.1, 0.2],
//! )?;
//!
//! let estimate = map.query(&Point3d::planar(3.0, 2.0))?;
//! assert!((estimate - 0.8).abs() < 1e-9);
//! # Ok::<(), odormap::GasMapError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod grid;
pub mod io;
pub mod kernel;
pub mod map;
pub mod sampling;

#[cfg(feature = "sync")]
pub mod sync;

pub use builder::GasMapBuilder;
pub use config::{Config, DomainConfig, KernelParams};
pub use error::{GasMapError, Result};
pub use grid::{Axis, SpatialGrid};
pub use kernel::AnisotropicKernel;
pub use map::{GasMap, Layer, MapStats, Observation, UpdateWindow, parse_dump};
pub use sampling::{Sample, SampleBuffer, SampleSummary, WindReading};

#[cfg(feature = "sync")]
pub use sync::SyncGasMap;

pub use odormap_types::bbox::{AxisAlignedRect, ObstacleSet};
pub use odormap_types::point::Point3d;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GasMap, GasMapBuilder, GasMapError, Result};

    #[cfg(feature = "sync")]
    pub use crate::SyncGasMap;

    pub use crate::{Config, DomainConfig, KernelParams};

    pub use crate::{AxisAlignedRect, ObstacleSet, Observation, Point3d};

    pub use crate::{SampleBuffer, WindReading};
}
