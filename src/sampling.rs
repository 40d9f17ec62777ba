//! Per-sensor averaging of raw readings before they reach the map.
//!
//! A static sensor is polled many times while the plume is established; the
//! map receives one averaged concentration per sensor. `SampleBuffer` keeps the
//! most recent readings (oldest dropped first once full) and summarises them.

use crate::error::{GasMapError, Result};
use crate::map::Observation;
use odormap_types::point::Point3d;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of readings averaged per sensor by default (about ten seconds of
/// polling at a 64 ms step).
pub const DEFAULT_FILTER_LENGTH: usize = 150;

/// Wind speed and heading at a sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    pub intensity: f64,
    /// Heading in radians, measured from +x towards +y
    pub angle: f64,
}

impl WindReading {
    pub fn new(intensity: f64, angle: f64) -> Self {
        Self { intensity, angle }
    }

    /// Convert a raw 3-D wind vector. Intensity is the full 3-D norm; the
    /// heading only uses the horizontal components.
    pub fn from_vector(x: f64, y: f64, z: f64) -> Self {
        Self {
            intensity: (x * x + y * y + z * z).sqrt(),
            angle: y.atan2(x),
        }
    }

    pub fn calm() -> Self {
        Self::default()
    }
}

/// One instantaneous reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub concentration: f64,
    pub wind: WindReading,
}

impl Sample {
    pub fn new(concentration: f64, wind: WindReading) -> Self {
        Self {
            concentration,
            wind,
        }
    }
}

/// Averages over a full or partial buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean_concentration: f64,
    /// Population standard deviation of the concentration
    pub std_concentration: f64,
    pub mean_wind_intensity: f64,
    /// Circular mean of the wind heading, in radians
    pub mean_wind_angle: f64,
}

impl SampleSummary {
    /// Pair the averaged concentration with the sensor position.
    pub fn observation(&self, position: Point3d) -> Observation {
        Observation::new(position, self.mean_concentration)
    }
}

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(GasMapError::InvalidConfig(
                "Sample buffer capacity must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Add a reading, evicting the oldest one when the buffer is full.
    pub fn push(&mut self, sample: Sample) -> Result<()> {
        if !sample.concentration.is_finite()
            || !sample.wind.intensity.is_finite()
            || !sample.wind.angle.is_finite()
        {
            return Err(GasMapError::InvalidInput(format!(
                "Sample values must be finite, got {:?}",
                sample
            )));
        }

        if self.is_full() {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Averages of the buffered readings, `None` when empty.
    pub fn summary(&self) -> Option<SampleSummary> {
        if self.samples.is_empty() {
            return None;
        }
        let n = self.samples.len() as f64;

        let mean_concentration = self.samples.iter().map(|s| s.concentration).sum::<f64>() / n;
        let variance = self
            .samples
            .iter()
            .map(|s| (s.concentration - mean_concentration).powi(2))
            .sum::<f64>()
            / n;

        let mean_wind_intensity = self.samples.iter().map(|s| s.wind.intensity).sum::<f64>() / n;
        let (sin_sum, cos_sum) = self
            .samples
            .iter()
            .fold((0.0, 0.0), |(s, c), sample| {
                (s + sample.wind.angle.sin(), c + sample.wind.angle.cos())
            });

        Some(SampleSummary {
            count: self.samples.len(),
            mean_concentration,
            std_concentration: variance.sqrt(),
            mean_wind_intensity,
            mean_wind_angle: sin_sum.atan2(cos_sum),
        })
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_FILTER_LENGTH,
            samples: VecDeque::with_capacity(DEFAULT_FILTER_LENGTH),
        }
    }
}
