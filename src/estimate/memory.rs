//! Memory footprint breakdown for inference, full training and QLoRA

use super::{round_to, GIB};
use crate::config::{Optimizer, WorkloadConfig, WorkloadMode};
use crate::model::{estimate_parameter_count, ModelConfig};
use crate::quant::resolve_quant_bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// KV cache is stored in fp16 whatever the weight quantization
const KV_BYTES_PER_VALUE: f64 = 2.0;
/// Activations are costed at fp32
const ACTIVATION_BYTES: f64 = 4.0;
/// Gradients and optimizer state are fp32
const TRAINING_STATE_BYTES: f64 = 4.0;
/// Share of parameters trained by a QLoRA adapter
const QLORA_TRAINABLE_FRACTION: f64 = 0.01;
const CHECKPOINTED_ACTIVATION_FACTOR: f64 = 0.5;
const BASE_OVERHEAD_GB: f64 = 0.5;
const MIN_FRAMEWORK_OVERHEAD_GB: f64 = 1.0;
const FRAMEWORK_OVERHEAD_FRACTION: f64 = 0.10;

/// Inputs that produced a breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryDetails {
    pub param_count: u64,
    pub bytes_per_param: f64,
    pub mode: WorkloadMode,
    pub batch_size: u64,
    pub sequence_length: u64,
    pub gradient_checkpointing: bool,
    pub optimizer: Optimizer,
}

/// Memory footprint in GB. Every field is rounded to two decimals on its
/// own, so `total` matches the component sum only within rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryBreakdown {
    pub total: f64,
    pub model_size: f64,
    pub kv_cache: f64,
    pub activation: f64,
    pub grad_optimizer: f64,
    pub overhead: f64,
    pub details: MemoryDetails,
}

impl MemoryBreakdown {
    /// Named components in display order
    pub fn components(&self) -> [(&'static str, f64); 5] {
        [
            ("Model Size", self.model_size),
            ("KV Cache", self.kv_cache),
            ("Activation Memory", self.activation),
            ("Grad & Optimizer memory", self.grad_optimizer),
            ("Overhead", self.overhead),
        ]
    }

    pub fn component_sum(&self) -> f64 {
        self.components().iter().map(|(_, gb)| gb).sum()
    }
}

pub fn compute_memory_breakdown(
    config: &ModelConfig,
    workload: &WorkloadConfig,
) -> MemoryBreakdown {
    let bytes_per_param = resolve_quant_bytes(&workload.quant);
    let param_count = estimate_parameter_count(config);
    let params = param_count as f64;

    let hidden = config.hidden_size() as f64;
    let layers = config.num_hidden_layers() as f64;
    let batch = workload.effective_batch_size() as f64;
    let seq = workload.context_length as f64;
    let tokens = batch * seq;

    let model_size_gb = params * bytes_per_param / GIB;

    // keys + values for every layer
    let kv_cache_gb = tokens * hidden * layers * 2.0 * KV_BYTES_PER_VALUE / GIB;

    let activation_gb = match workload.mode {
        WorkloadMode::Inference => tokens * hidden * ACTIVATION_BYTES / GIB,
        WorkloadMode::Training | WorkloadMode::Qlora => {
            let full = tokens * hidden * layers * ACTIVATION_BYTES / GIB;
            if workload.gradient_checkpointing {
                full * CHECKPOINTED_ACTIVATION_FACTOR
            } else {
                full
            }
        }
    };

    let trainable = match workload.mode {
        WorkloadMode::Inference => 0.0,
        WorkloadMode::Training => params,
        WorkloadMode::Qlora => params * QLORA_TRAINABLE_FRACTION,
    };
    let gradient_gb = trainable * TRAINING_STATE_BYTES / GIB;
    let optimizer_gb = trainable * workload.optimizer.state_copies() * TRAINING_STATE_BYTES / GIB;
    let grad_optimizer_gb = gradient_gb + optimizer_gb;

    let framework_gb =
        (model_size_gb * FRAMEWORK_OVERHEAD_FRACTION).max(MIN_FRAMEWORK_OVERHEAD_GB);
    let overhead_gb = BASE_OVERHEAD_GB + framework_gb;

    let total_gb = model_size_gb + kv_cache_gb + activation_gb + grad_optimizer_gb + overhead_gb;

    debug!(
        param_count,
        bytes_per_param,
        mode = %workload.mode,
        total_gb,
        "memory breakdown computed"
    );

    MemoryBreakdown {
        total: round_to(total_gb, 2),
        model_size: round_to(model_size_gb, 2),
        kv_cache: round_to(kv_cache_gb, 2),
        activation: round_to(activation_gb, 2),
        grad_optimizer: round_to(grad_optimizer_gb, 2),
        overhead: round_to(overhead_gb, 2),
        details: MemoryDetails {
            param_count,
            bytes_per_param,
            mode: workload.mode,
            batch_size: workload.effective_batch_size(),
            sequence_length: workload.context_length,
            gradient_checkpointing: workload.gradient_checkpointing,
            optimizer: workload.optimizer,
        },
    }
}
