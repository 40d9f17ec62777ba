//! Builder for gas maps
//!
//! Collects the domain and kernel settings piece by piece, optionally from a
//! configuration file, before validating everything once in `build`.

use crate::config::{Config, DomainConfig, KernelParams};
use crate::error::Result;
use crate::map::GasMap;
use std::path::Path;

/// Builder for [`GasMap`] with fluent overrides on top of a base config.
#[derive(Debug, Clone, Default)]
pub struct GasMapBuilder {
    config: Config,
}

impl GasMapBuilder {
    /// Create a builder seeded with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a JSON or TOML file, picked by extension.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.config = crate::io::read_config(path)?;
        Ok(self)
    }

    pub fn domain(mut self, domain: DomainConfig) -> Self {
        self.config.domain = domain;
        self
    }

    /// Set the physical bounds, keeping the current bin counts.
    pub fn bounds(mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        self.config.domain.x_min = x_min;
        self.config.domain.x_max = x_max;
        self.config.domain.y_min = y_min;
        self.config.domain.y_max = y_max;
        self
    }

    pub fn bins(mut self, x_bins: usize, y_bins: usize) -> Self {
        self.config.domain.x_bins = x_bins;
        self.config.domain.y_bins = y_bins;
        self
    }

    pub fn kernel(mut self, kernel: KernelParams) -> Self {
        self.config.kernel = kernel;
        self
    }

    pub fn wind_speed(mut self, wind_speed: f64) -> Self {
        self.config.kernel.wind_speed = wind_speed;
        self
    }

    /// Validate and build the map.
    pub fn build(self) -> Result<GasMap> {
        self.config.validate()?;
        GasMap::new(&self.config)
    }
}
