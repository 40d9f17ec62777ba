//! Thread-safe wrapper for sharing one gas map between threads.
//!
//! `GasMap` mutates its layers in place and has no internal locking.
//! `SyncGasMap` wraps it in `Arc<RwLock<GasMap>>`: sample producers take the
//! write lock, readers (`query`, `dump`, `stats`) share the read lock and
//! never observe a half-applied sample.
//!
//! # Features
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! odormap = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use odormap::{Config, Point3d, SyncGasMap};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let map = SyncGasMap::new(&Config::default())?;
//!
//! let writer = map.clone();
//! let handle = thread::spawn(move || {
//!     writer.ingest(Point3d::planar(5.0, 2.0), 1.5).unwrap();
//! });
//! handle.join().unwrap();
//!
//! assert!(map.query(&Point3d::planar(5.0, 2.0))? > 0.0);
//! # Ok(())
//! # }
//! ```

use crate::config::{Config, KernelParams};
use crate::error::Result;
use crate::map::{GasMap, MapStats, Observation};
use odormap_types::point::Point3d;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe wrapper around `GasMap` using `Arc<RwLock<GasMap>>`.
///
/// Clones share the same map.
#[derive(Clone)]
pub struct SyncGasMap {
    inner: Arc<RwLock<GasMap>>,
}

impl SyncGasMap {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::from_map(GasMap::new(config)?))
    }

    pub fn from_map(map: GasMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    // ===== Writers =====

    pub fn configure(&self, params: KernelParams) -> Result<()> {
        self.inner.write().configure(params)
    }

    pub fn ingest(&self, position: Point3d, concentration: f64) -> Result<()> {
        self.inner.write().ingest(position, concentration)
    }

    /// Applies the whole batch under a single write lock.
    pub fn ingest_batch(&self, positions: &[Point3d], concentrations: &[f64]) -> Result<()> {
        self.inner.write().ingest_batch(positions, concentrations)
    }

    pub fn ingest_observations<I>(&self, observations: I) -> Result<()>
    where
        I: IntoIterator<Item = Observation>,
    {
        self.inner.write().ingest_observations(observations)
    }

    // ===== Readers =====

    pub fn query(&self, position: &Point3d) -> Result<f64> {
        self.inner.read().query(position)
    }

    pub fn query_many(&self, positions: &[Point3d]) -> Result<Vec<f64>> {
        self.inner.read().query_many(positions)
    }

    pub fn dump(&self) -> String {
        self.inner.read().dump()
    }

    pub fn stats(&self) -> MapStats {
        self.inner.read().stats()
    }

    /// Run `f` with shared access to the map.
    pub fn read<R>(&self, f: impl FnOnce(&GasMap) -> R) -> R {
        f(&self.inner.read())
    }

    /// Copy of the current map state.
    pub fn snapshot(&self) -> GasMap {
        self.inner.read().clone()
    }
}
