//! Per-iteration training time

use super::{Bound, DeviceRates, EstimateError};
use crate::config::WorkloadConfig;
use crate::hardware::HardwareSpec;
use crate::model::{estimate_parameter_count, ModelConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Forward + backward FLOPs per parameter per token (3x the forward pass)
const TRAINING_FLOPS_PER_PARAM_TOKEN: f64 = 6.0;
/// Weights, gradients and optimizer state moved per parameter per step
const TRAINING_BYTES_PER_PARAM: f64 = 12.0;
const UTILIZATION: f64 = 0.8;
const CHECKPOINTED_UTILIZATION: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEstimate {
    /// Forward + backward wall time per iteration
    pub ms_per_iteration: f64,
    pub bound: Bound,
    pub compute_time_ms: f64,
    pub memory_time_ms: f64,
}

pub fn compute_training_time(
    config: &ModelConfig,
    hardware: &HardwareSpec,
    workload: &WorkloadConfig,
) -> Result<TrainingEstimate, EstimateError> {
    let rates = DeviceRates::of(hardware)?;
    let params = estimate_parameter_count(config) as f64;

    let tokens = workload.effective_batch_size() as f64 * workload.context_length as f64;
    let flops_per_iteration = TRAINING_FLOPS_PER_PARAM_TOKEN * params * tokens;
    let utilization = if workload.gradient_checkpointing {
        CHECKPOINTED_UTILIZATION
    } else {
        UTILIZATION
    };
    let compute_time_ms = flops_per_iteration / (rates.flops * utilization) * 1000.0;

    let bytes_per_iteration = params * TRAINING_BYTES_PER_PARAM;
    let memory_time_ms = bytes_per_iteration / rates.bytes_per_sec * 1000.0;

    let actual_ms = compute_time_ms.max(memory_time_ms);
    let bound = if memory_time_ms > compute_time_ms {
        Bound::Memory
    } else {
        Bound::Compute
    };

    debug!(compute_time_ms, memory_time_ms, %bound, "training iteration estimated");

    Ok(TrainingEstimate {
        ms_per_iteration: actual_ms,
        bound,
        compute_time_ms,
        memory_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkloadMode;

    fn llama_7b() -> ModelConfig {
        ModelConfig::dense(32000, 4096, 32, 11008)
    }

    fn workload() -> WorkloadConfig {
        WorkloadConfig::default().with_mode(WorkloadMode::Training)
    }

    #[test]
    fn test_long_sequences_are_compute_bound() {
        let hw = HardwareSpec::new(165.0, 1008.0, 24.0, 450.0);
        let est = compute_training_time(&llama_7b(), &hw, &workload()).unwrap();
        assert_eq!(est.bound, Bound::Compute);

        let params = estimate_parameter_count(&llama_7b()) as f64;
        let expected = 6.0 * params * 2048.0 / (165e12 * 0.8) * 1000.0;
        assert!((est.ms_per_iteration - expected).abs() < 0.06);
    }

    #[test]
    fn test_checkpointing_is_slower() {
        let hw = HardwareSpec::new(165.0, 1008.0, 24.0, 450.0);
        let plain = compute_training_time(&llama_7b(), &hw, &workload()).unwrap();
        let ckpt = compute_training_time(
            &llama_7b(),
            &hw,
            &workload().with_gradient_checkpointing(true),
        )
        .unwrap();
        let ratio = ckpt.compute_time_ms / plain.compute_time_ms;
        assert!((ratio - 0.8 / 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_batches_are_memory_bound() {
        let hw = HardwareSpec::new(165.0, 1008.0, 24.0, 450.0);
        let est =
            compute_training_time(&llama_7b(), &hw, &workload().with_context_length(1)).unwrap();
        assert_eq!(est.bound, Bound::Memory);
        assert_eq!(est.ms_per_iteration, est.memory_time_ms);
    }

    #[test]
    fn test_tiny_model_iteration_is_positive() {
        let tiny = ModelConfig::dense(1000, 64, 2, 256);
        let hw = HardwareSpec::new(165.0, 1008.0, 24.0, 450.0);
        let est = compute_training_time(&tiny, &hw, &workload().with_context_length(1)).unwrap();
        assert!(est.ms_per_iteration > 0.0, "{:?}", est);
        assert!(est.ms_per_iteration < 0.01);
        assert_eq!(est.bound, Bound::Memory);
    }

    #[test]
    fn test_zero_bandwidth_is_rejected() {
        let hw = HardwareSpec {
            bandwidth: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            compute_training_time(&llama_7b(), &hw, &workload()),
            Err(EstimateError::InvalidHardware { field: "bandwidth", .. })
        ));
    }
}
