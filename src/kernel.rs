//! Wind-stretched Gaussian kernel used to spread a sample over nearby cells.
//!
//! The kernel is elongated along the wind (`a = sigma + gamma * wind_speed`)
//! and narrowed across it (`b = sigma / (1 + gamma * wind_speed / sigma)`).
//! Offsets are taken in grid axes, with x aligned to the wind.

use crate::config::KernelParams;
use crate::error::Result;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct AnisotropicKernel {
    sigma: f64,
    a: f64,
    b: f64,
    divisor: f64,
}

impl AnisotropicKernel {
    pub fn new(params: &KernelParams) -> Result<Self> {
        params.validate()?;

        let stretch = params.gamma * params.wind_speed;
        Ok(Self {
            sigma: params.sigma,
            a: params.sigma + stretch,
            b: params.sigma / (1.0 + stretch / params.sigma),
            divisor: 1.0 / (2.0 * PI * params.sigma * params.sigma),
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Along-wind spread.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Cross-wind spread.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Normalisation divisor, `1 / (2 pi sigma^2)`.
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    pub fn is_isotropic(&self) -> bool {
        self.a == self.b
    }

    /// Kernel weight for a cell offset `(dx, dy)` from the sample.
    #[inline]
    pub fn weight(&self, dx: f64, dy: f64) -> f64 {
        let exponent = dx * dx / (2.0 * self.a * self.a) + dy * dy / (2.0 * self.b * self.b);
        (-exponent).exp() / self.divisor
    }

    /// Weight at zero offset, the largest value the kernel produces.
    pub fn peak(&self) -> f64 {
        self.weight(0.0, 0.0)
    }
}
