//! Decode throughput estimation
//!
//! A token needs `2 * params` FLOPs and one full read of the weights. The
//! smaller of the two theoretical rates is scaled by an empirical efficiency
//! that depends on quantization and context length.

use super::{round_rate, round_to, Bound, DeviceRates, EstimateError};
use crate::config::WorkloadConfig;
use crate::hardware::HardwareSpec;
use crate::model::{estimate_parameter_count, ModelConfig};
use crate::quant::{base_efficiency, resolve_quant_bytes};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prompt tokens are processed in parallel this many times faster than decode
const PREFILL_SPEEDUP: f64 = 10.0;
const CONTEXT_PENALTY_WINDOW: f64 = 8192.0;
const CONTEXT_PENALTY_SLOPE: f64 = 0.3;
const MIN_CONTEXT_PENALTY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEstimate {
    pub tokens_per_second: f64,
    pub ms_per_token: f64,
    /// Seconds to process a prompt of `context_length` tokens
    pub prompt_process_time_s: f64,
    pub bound: Bound,
    /// Unscaled compute-limited rate (tokens/s)
    pub compute_bound_tokens: f64,
    /// Unscaled bandwidth-limited rate (tokens/s)
    pub memory_bound_tokens: f64,
}

/// Longer contexts cost up to 50% of the decode rate
pub fn context_penalty(context_length: u64) -> f64 {
    (1.0 - (context_length as f64 / CONTEXT_PENALTY_WINDOW) * CONTEXT_PENALTY_SLOPE)
        .max(MIN_CONTEXT_PENALTY)
}

pub fn inference_efficiency(quant: &str, context_length: u64) -> f64 {
    base_efficiency(quant) * context_penalty(context_length)
}

pub fn compute_throughput(
    config: &ModelConfig,
    hardware: &HardwareSpec,
    workload: &WorkloadConfig,
) -> Result<PerformanceEstimate, EstimateError> {
    let rates = DeviceRates::of(hardware)?;
    let params = estimate_parameter_count(config) as f64;

    let flops_per_token = 2.0 * params;
    let compute_bound_tokens = rates.flops / flops_per_token;

    let model_bytes = params * resolve_quant_bytes(&workload.quant);
    let memory_bound_tokens = rates.bytes_per_sec / model_bytes;

    let raw_tokens_per_sec = compute_bound_tokens.min(memory_bound_tokens);
    let efficiency = inference_efficiency(&workload.quant, workload.context_length);
    let tokens_per_sec = raw_tokens_per_sec * efficiency;

    if !(tokens_per_sec.is_finite() && tokens_per_sec > 0.0) {
        return Err(EstimateError::InvalidHardware {
            field: "tokens_per_second",
            value: tokens_per_sec,
        });
    }

    let prompt_tokens_per_sec = tokens_per_sec * PREFILL_SPEEDUP;
    let prompt_process_time = workload.context_length as f64 / prompt_tokens_per_sec;

    let bound = if memory_bound_tokens < compute_bound_tokens {
        Bound::Memory
    } else {
        Bound::Compute
    };

    debug!(
        compute_bound_tokens,
        memory_bound_tokens,
        efficiency,
        %bound,
        "throughput estimated"
    );

    Ok(PerformanceEstimate {
        tokens_per_second: round_rate(tokens_per_sec),
        ms_per_token: round_to(1000.0 / tokens_per_sec, 1),
        prompt_process_time_s: round_to(prompt_process_time, 1),
        bound,
        compute_bound_tokens,
        memory_bound_tokens,
    })
}
