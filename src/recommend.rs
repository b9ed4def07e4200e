//! Hardware and model recommendations
//!
//! Ranking works on whole catalogs supplied by the caller and returns a
//! bounded, ordered shortlist.

use crate::catalog::Catalog;
use crate::config::WorkloadConfig;
use crate::estimate::GIB;
use crate::hardware::HardwareSpec;
use crate::model::{estimate_parameter_count, ModelConfig};
use crate::quant::resolve_quant_bytes;
use serde::Serialize;

pub const MAX_HARDWARE_RECOMMENDATIONS: usize = 10;
pub const MAX_MODEL_RECOMMENDATIONS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardwareRecommendation {
    pub name: String,
    pub spec: HardwareSpec,
    /// TFLOPS per watt
    pub efficiency: f64,
    /// GB per watt
    pub memory_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecommendation {
    pub name: String,
    pub config: ModelConfig,
    pub param_count: u64,
    pub bytes_per_param: f64,
    pub kv_bytes: f64,
    pub estimated_memory_gb: f64,
    pub can_run: bool,
}

/// Hardware with at least `memory_requirement_gb` of memory, fastest first
pub fn rank_hardware_for(
    memory_requirement_gb: f64,
    catalog: &Catalog<HardwareSpec>,
) -> Vec<HardwareRecommendation> {
    let mut ranked: Vec<HardwareRecommendation> = catalog
        .iter()
        .filter(|(_, spec)| spec.memory() >= memory_requirement_gb)
        .map(|(name, spec)| HardwareRecommendation {
            name: name.to_string(),
            efficiency: per_watt(spec.compute(), spec.tdp()),
            memory_efficiency: per_watt(spec.memory(), spec.tdp()),
            spec: spec.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| b.spec.compute().total_cmp(&a.spec.compute()));
    ranked.truncate(MAX_HARDWARE_RECOMMENDATIONS);
    ranked
}

fn per_watt(value: f64, tdp: f64) -> f64 {
    if tdp > 0.0 {
        value / tdp
    } else {
        0.0
    }
}

/// Size every catalog model for `available_memory_gb`, largest first.
///
/// Sizing is weights plus a KV cache of `context_length` tokens stored at the
/// weight width, scaled by the workload's overhead factor.
pub fn rank_models_for(
    available_memory_gb: f64,
    catalog: &Catalog<ModelConfig>,
    workload: &WorkloadConfig,
) -> Vec<ModelRecommendation> {
    let bytes_per_param = resolve_quant_bytes(&workload.quant);
    let overhead_factor = workload.effective_overhead_factor();
    let context = workload.context_length as f64;

    let mut ranked: Vec<ModelRecommendation> = catalog
        .iter()
        .map(|(name, config)| {
            let param_count = estimate_parameter_count(config);
            let params_bytes = param_count as f64 * bytes_per_param;
            let kv_bytes = context
                * config.hidden_size() as f64
                * config.num_hidden_layers() as f64
                * 2.0
                * bytes_per_param;
            let estimated_memory_gb = (params_bytes + kv_bytes) * overhead_factor / GIB;

            ModelRecommendation {
                name: name.to_string(),
                config: config.clone(),
                param_count,
                bytes_per_param,
                kv_bytes,
                estimated_memory_gb,
                can_run: estimated_memory_gb <= available_memory_gb,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.param_count.cmp(&a.param_count));
    ranked.truncate(MAX_MODEL_RECOMMENDATIONS);
    ranked
}

/// Number of devices of this kind needed to hold `total_gb`, at least one
pub fn devices_needed(total_gb: f64, hardware: &HardwareSpec) -> u64 {
    let memory = hardware.memory();
    if memory <= 0.0 || memory.is_nan() || !total_gb.is_finite() {
        return 1;
    }
    (total_gb / memory).ceil().max(1.0) as u64
}

/// Whether `num_devices` of this hardware together hold `total_gb`
pub fn fits_on_devices(total_gb: f64, hardware: &HardwareSpec, num_devices: u64) -> bool {
    devices_needed(total_gb, hardware) <= num_devices.max(1)
}

/// Memory pooled across `num_devices` of this hardware
pub fn pooled_memory_gb(hardware: &HardwareSpec, num_devices: u64) -> f64 {
    hardware.memory() * num_devices.max(1) as f64
}
