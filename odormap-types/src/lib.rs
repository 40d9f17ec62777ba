//! # odormap-types
//!
//! Geometric primitives shared by the `odormap` estimator and the code that
//! feeds it samples.
//!
//! - **Point types**: `Point3d`
//! - **Rectangle types**: `AxisAlignedRect`, `ObstacleSet`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! planar primitives.
//!
//! ## Examples
//!
//! ```rust
//! use odormap_types::bbox::{AxisAlignedRect, ObstacleSet};
//! use odormap_types::point::Point3d;
//!
//! let obstacles: ObstacleSet = vec![AxisAlignedRect::new(0.0, 1.0, 0.0, 1.0)]
//!     .into_iter()
//!     .collect();
//! assert_eq!(obstacles.find(&Point3d::new(0.5, 0.5, 0.0)), Some(0));
//! ```

pub mod bbox;
pub mod point;

pub use bbox::{AxisAlignedRect, ObstacleSet};
pub use point::Point3d;
