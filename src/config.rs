//! Configuration for the mapped domain and the kernel estimator.
//!
//! Both halves are plain serde types so a deployment can be described in
//! JSON or TOML and handed to the estimator and to whatever drives it.
//! Defaults reproduce the reference wind-tunnel deployment.
//!
//! ```rust
//! use odormap::Config;
//!
//! let json = r#"{
//!     "domain": { "x_min": 0.0, "x_max": 4.0, "y_min": 0.0, "y_max": 4.0,
//!                 "x_bins": 4, "y_bins": 4 },
//!     "kernel": { "sigma": 1.0, "gamma": 0.0, "rco": 2.0, "wind_speed": 0.0 }
//! }"#;
//! let config = Config::from_json(json)?;
//! assert_eq!(config.domain.x_bins, 4);
//! assert_eq!(config.kernel.scaling_param, 1.0);
//! # Ok::<(), odormap::GasMapError>(())
//! ```

use crate::error::{GasMapError, Result};
use serde::{Deserialize, Serialize};

/// Physical bounds and bin counts of the mapped area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    #[serde(default = "DomainConfig::default_x_min")]
    pub x_min: f64,

    #[serde(default = "DomainConfig::default_x_max")]
    pub x_max: f64,

    #[serde(default = "DomainConfig::default_y_min")]
    pub y_min: f64,

    #[serde(default = "DomainConfig::default_y_max")]
    pub y_max: f64,

    /// Number of cells along x
    #[serde(default = "DomainConfig::default_bins")]
    pub x_bins: usize,

    /// Number of cells along y
    #[serde(default = "DomainConfig::default_bins")]
    pub y_bins: usize,
}

impl DomainConfig {
    const fn default_x_min() -> f64 {
        2.75
    }

    const fn default_x_max() -> f64 {
        12.7418
    }

    const fn default_y_min() -> f64 {
        0.01
    }

    const fn default_y_max() -> f64 {
        3.9916
    }

    const fn default_bins() -> usize {
        64
    }

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            ..Self::default()
        }
    }

    pub fn with_bins(mut self, x_bins: usize, y_bins: usize) -> Self {
        self.x_bins = x_bins;
        self.y_bins = y_bins;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
        ] {
            if !value.is_finite() {
                return Err(GasMapError::InvalidConfig(format!(
                    "Domain bound {} must be finite, got: {}",
                    name, value
                )));
            }
        }

        if self.x_max <= self.x_min {
            return Err(GasMapError::InvalidConfig(format!(
                "x_max ({}) must be greater than x_min ({})",
                self.x_max, self.x_min
            )));
        }

        if self.y_max <= self.y_min {
            return Err(GasMapError::InvalidConfig(format!(
                "y_max ({}) must be greater than y_min ({})",
                self.y_max, self.y_min
            )));
        }

        if self.x_bins == 0 || self.y_bins == 0 {
            return Err(GasMapError::InvalidConfig(
                "Bin counts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            x_min: Self::default_x_min(),
            x_max: Self::default_x_max(),
            y_min: Self::default_y_min(),
            y_max: Self::default_y_max(),
            x_bins: Self::default_bins(),
            y_bins: Self::default_bins(),
        }
    }
}

/// Parameters of the wind-aware Gaussian kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KernelParams {
    /// Kernel width with no wind
    #[serde(default = "KernelParams::default_sigma")]
    pub sigma: f64,

    /// How strongly wind stretches the kernel
    #[serde(default = "KernelParams::default_gamma")]
    pub gamma: f64,

    /// Weight mass at which confidence reaches 1 - 1/e
    #[serde(default = "KernelParams::default_scaling_param")]
    pub scaling_param: f64,

    #[serde(default = "KernelParams::default_wind_speed")]
    pub wind_speed: f64,

    /// Cut-off radius beyond which a sample does not update cells
    #[serde(default = "KernelParams::default_rco")]
    pub rco: f64,
}

impl KernelParams {
    const fn default_sigma() -> f64 {
        0.2
    }

    const fn default_gamma() -> f64 {
        2.0
    }

    const fn default_scaling_param() -> f64 {
        1.0
    }

    const fn default_wind_speed() -> f64 {
        0.75
    }

    const fn default_rco() -> f64 {
        0.3
    }

    pub fn new(sigma: f64, gamma: f64, scaling_param: f64, wind_speed: f64, rco: f64) -> Self {
        Self {
            sigma,
            gamma,
            scaling_param,
            wind_speed,
            rco,
        }
    }

    /// Parameters for an isotropic kernel (no wind stretching).
    pub fn isotropic(sigma: f64, rco: f64) -> Self {
        Self {
            sigma,
            gamma: 0.0,
            scaling_param: Self::default_scaling_param(),
            wind_speed: 0.0,
            rco,
        }
    }

    pub fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = wind_speed;
        self
    }

    pub fn with_scaling_param(mut self, scaling_param: f64) -> Self {
        self.scaling_param = scaling_param;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("sigma", self.sigma),
            ("gamma", self.gamma),
            ("scaling_param", self.scaling_param),
            ("wind_speed", self.wind_speed),
            ("rco", self.rco),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GasMapError::InvalidConfig(format!(
                "Kernel parameter {} must be finite, got: {}",
                name, value
            )));
        }

        if self.sigma <= 0.0 {
            return Err(GasMapError::InvalidConfig(format!(
                "sigma must be positive, got: {}",
                self.sigma
            )));
        }

        if self.scaling_param <= 0.0 {
            return Err(GasMapError::InvalidConfig(format!(
                "scaling_param must be positive, got: {}",
                self.scaling_param
            )));
        }

        if self.gamma < 0.0 || self.wind_speed < 0.0 {
            return Err(GasMapError::InvalidConfig(
                "gamma and wind_speed must not be negative".to_string(),
            ));
        }

        if self.rco < 0.0 {
            return Err(GasMapError::InvalidConfig(format!(
                "rco must not be negative, got: {}",
                self.rco
            )));
        }

        Ok(())
    }
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            sigma: Self::default_sigma(),
            gamma: Self::default_gamma(),
            scaling_param: Self::default_scaling_param(),
            wind_speed: Self::default_wind_speed(),
            rco: Self::default_rco(),
        }
    }
}

/// Complete estimator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub domain: DomainConfig,

    #[serde(default)]
    pub kernel: KernelParams,
}

impl Config {
    pub fn new(domain: DomainConfig, kernel: KernelParams) -> Self {
        Self { domain, kernel }
    }

    pub fn with_domain(mut self, domain: DomainConfig) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_kernel(mut self, kernel: KernelParams) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.domain.validate()?;
        self.kernel.validate()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| GasMapError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GasMapError::Toml(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = Config::default();
        assert_eq!(config.domain.x_min, 2.75);
        assert_eq!(config.domain.x_max, 12.7418);
        assert_eq!(config.domain.y_min, 0.01);
        assert_eq!(config.domain.y_max, 3.9916);
        assert_eq!(config.domain.x_bins, 64);
        assert_eq!(config.domain.y_bins, 64);
        assert_eq!(config.kernel, KernelParams::new(0.2, 2.0, 1.0, 0.75, 0.3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = Config::from_json(r#"{ "kernel": { "sigma": 0.5 } }"#).unwrap();
        assert_eq!(config.kernel.sigma, 0.5);
        assert_eq!(config.kernel.gamma, 2.0);
        assert_eq!(config.domain, DomainConfig::default());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = Config::from_json(r#"{ "kernel": { "sigma": 0.5, "wmin": 0.1 } }"#);
        assert!(matches!(result, Err(GasMapError::Json(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = Config::default()
            .with_kernel(KernelParams::isotropic(1.0, 2.0))
            .with_domain(DomainConfig::new(0.0, 4.0, 0.0, 4.0).with_bins(4, 4));
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[domain]"));
        assert!(text.contains("[kernel]"));
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_validation_failure() {
        let result = Config::from_toml("[kernel]\nsigma = 0.0\n");
        assert!(matches!(result, Err(GasMapError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_domain() {
        let inverted = DomainConfig::new(5.0, 1.0, 0.0, 1.0);
        assert!(inverted.validate().is_err());

        let no_bins = DomainConfig::default().with_bins(0, 64);
        assert!(no_bins.validate().is_err());

        let nan = DomainConfig::new(f64::NAN, 1.0, 0.0, 1.0);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_invalid_kernel() {
        assert!(KernelParams::isotropic(0.0, 1.0).validate().is_err());
        assert!(KernelParams::isotropic(-1.0, 1.0).validate().is_err());
        assert!(KernelParams::isotropic(1.0, -0.1).validate().is_err());
        assert!(
            KernelParams::isotropic(1.0, 1.0)
                .with_scaling_param(0.0)
                .validate()
                .is_err()
        );
        assert!(
            KernelParams::isotropic(1.0, 1.0)
                .with_wind_speed(f64::INFINITY)
                .validate()
                .is_err()
        );
        assert!(KernelParams::new(1.0, -2.0, 1.0, 0.5, 1.0).validate().is_err());
    }
}
