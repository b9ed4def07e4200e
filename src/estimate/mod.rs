//! Resource estimators
//!
//! All estimators are pure functions of their inputs. Defaulting of missing
//! fields and unrecognized quantization tags happens silently; the only
//! failure is hardware whose compute or bandwidth is not usable.

pub mod memory;
pub mod throughput;
pub mod training;

use crate::hardware::HardwareSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use memory::{compute_memory_breakdown, MemoryBreakdown, MemoryDetails};
pub use throughput::{compute_throughput, PerformanceEstimate};
pub use training::{compute_training_time, TrainingEstimate};

/// Bytes per GB (binary)
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("invalid hardware: {field} must be a positive finite number, got {value}")]
    InvalidHardware { field: &'static str, value: f64 },
}

/// Which theoretical limit is tighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    Memory,
    Compute,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Memory => write!(f, "Memory"),
            Bound::Compute => write!(f, "Compute"),
        }
    }
}

/// Peak FLOP/s and bytes/s of a device, after defaulting
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DeviceRates {
    pub flops: f64,
    pub bytes_per_sec: f64,
}

impl DeviceRates {
    pub(crate) fn of(hardware: &HardwareSpec) -> Result<Self, EstimateError> {
        let compute = require_positive("compute", hardware.compute())?;
        let bandwidth = require_positive("bandwidth", hardware.bandwidth())?;
        Ok(Self {
            flops: compute * 1e12,
            bytes_per_sec: bandwidth * 1e9,
        })
    }
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, EstimateError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EstimateError::InvalidHardware { field, value })
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// One decimal place, or two significant digits below 1.0 so a slow but
/// valid rate never rounds to zero
pub(crate) fn round_rate(value: f64) -> f64 {
    if value >= 1.0 || value <= 0.0 || !value.is_finite() {
        return round_to(value, 1);
    }
    let decimals = 1 - value.log10().floor() as i32;
    let rounded = round_to(value, decimals);
    if rounded.is_finite() && rounded > 0.0 {
        rounded
    } else {
        value
    }
}
