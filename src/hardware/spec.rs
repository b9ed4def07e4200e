use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPUTE_TFLOPS: f64 = 10.0;
pub const DEFAULT_BANDWIDTH_GBPS: f64 = 500.0;
pub const DEFAULT_MEMORY_GB: f64 = 24.0;
pub const DEFAULT_TDP_WATTS: f64 = 250.0;

/// Capability record for a GPU or CPU as supplied by a hardware catalog.
///
/// Only an absent field is defaulted. An explicit zero or negative value is
/// kept so the estimators can reject it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareSpec {
    pub display_name: Option<String>,
    pub architecture: Option<String>,
    /// Peak throughput in TFLOPS (or equivalent)
    pub compute: Option<f64>,
    /// Memory bandwidth in GB/s
    pub bandwidth: Option<f64>,
    /// Memory capacity in GB
    pub memory: Option<f64>,
    /// Thermal design power in watts
    pub tdp: Option<f64>,
    pub release_year: Option<u32>,
    pub price_range: Option<String>,
    pub notes: Option<String>,
}

impl HardwareSpec {
    pub fn new(compute: f64, bandwidth: f64, memory: f64, tdp: f64) -> Self {
        Self {
            compute: Some(compute),
            bandwidth: Some(bandwidth),
            memory: Some(memory),
            tdp: Some(tdp),
            ..Default::default()
        }
    }

    pub fn compute(&self) -> f64 {
        self.compute.unwrap_or(DEFAULT_COMPUTE_TFLOPS)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth.unwrap_or(DEFAULT_BANDWIDTH_GBPS)
    }

    pub fn memory(&self) -> f64 {
        self.memory.unwrap_or(DEFAULT_MEMORY_GB)
    }

    pub fn tdp(&self) -> f64 {
        self.tdp.unwrap_or(DEFAULT_TDP_WATTS)
    }

    /// Human-readable spec sheet, one `label: value` line per known field
    pub fn spec_lines(&self, key: &str) -> Vec<String> {
        let mut lines = vec![format!("ID: {}", key)];
        if let Some(name) = &self.display_name {
            lines.push(format!("Name: {}", name));
        }
        if let Some(arch) = &self.architecture {
            lines.push(format!("Architecture: {}", arch));
        }
        if let Some(compute) = self.compute {
            lines.push(format!("Compute (TFLOPS or equivalent): {}", compute));
        }
        if let Some(memory) = self.memory {
            lines.push(format!("Memory (GB): {}", memory));
        }
        if let Some(bandwidth) = self.bandwidth {
            lines.push(format!("Memory Bandwidth (GB/s): {}", bandwidth));
        }
        if let Some(tdp) = self.tdp {
            lines.push(format!("TDP (W): {}", tdp));
        }
        if let Some(year) = self.release_year {
            lines.push(format!("Release Year: {}", year));
        }
        if let Some(price) = &self.price_range {
            lines.push(format!("Price Range: {}", price));
        }
        if let Some(notes) = &self.notes {
            lines.push(format!("Notes: {}", notes));
        }
        lines
    }
}
