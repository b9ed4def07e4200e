use crate::quant::QuantScheme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the hardware is asked to do with the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadMode {
    /// Autoregressive generation only
    #[default]
    #[serde(alias = "inf", alias = "inf_vllm", alias = "inf_vLLM", alias = "inf_ggml")]
    Inference,
    /// Full fine-tune: every parameter gets gradients and optimizer state
    #[serde(alias = "train", alias = "full")]
    Training,
    /// QLoRA: frozen quantized base, small trainable adapter
    #[serde(alias = "QLoRA")]
    Qlora,
}

impl FromStr for WorkloadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inference" | "inf" | "inf_vllm" | "inf_ggml" => Ok(WorkloadMode::Inference),
            "training" | "train" | "full" => Ok(WorkloadMode::Training),
            "qlora" => Ok(WorkloadMode::Qlora),
            other => Err(format!(
                "unknown mode '{}', expected one of: inference, training, qlora",
                other
            )),
        }
    }
}

impl fmt::Display for WorkloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadMode::Inference => write!(f, "inference"),
            WorkloadMode::Training => write!(f, "training"),
            WorkloadMode::Qlora => write!(f, "qlora"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimizer {
    #[default]
    Adam,
    AdamW,
    Sgd,
}

impl Optimizer {
    /// fp32 state tensors kept per trainable parameter
    pub fn state_copies(self) -> f64 {
        match self {
            // first and second moment
            Optimizer::Adam | Optimizer::AdamW => 2.0,
            // momentum
            Optimizer::Sgd => 1.0,
        }
    }
}

impl FromStr for Optimizer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adam" => Ok(Optimizer::Adam),
            "adamw" => Ok(Optimizer::AdamW),
            "sgd" => Ok(Optimizer::Sgd),
            other => Err(format!(
                "unknown optimizer '{}', expected one of: adam, adamw, sgd",
                other
            )),
        }
    }
}

impl fmt::Display for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optimizer::Adam => write!(f, "adam"),
            Optimizer::AdamW => write!(f, "adamw"),
            Optimizer::Sgd => write!(f, "sgd"),
        }
    }
}

/// Workload options shared by every estimator.
///
/// Deserializes from camelCase or snake_case keys; absent keys take their
/// defaults and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkloadConfig {
    /// Quantization tag, empty for fp16
    pub quant: String,
    /// Tokens held in context (also the training sequence length)
    #[serde(alias = "context_length", alias = "sequenceLength", alias = "sequence_length")]
    pub context_length: u64,
    #[serde(alias = "batch_size")]
    pub batch_size: u64,
    pub mode: WorkloadMode,
    #[serde(alias = "gradient_checkpointing")]
    pub gradient_checkpointing: bool,
    pub optimizer: Optimizer,
    /// Multiplier applied to model sizing when ranking models
    #[serde(alias = "overhead_factor")]
    pub overhead_factor: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            quant: String::new(),
            context_length: 2048,
            batch_size: 1,
            mode: WorkloadMode::Inference,
            gradient_checkpointing: false,
            optimizer: Optimizer::Adam,
            overhead_factor: 1.0,
        }
    }
}

impl WorkloadConfig {
    /// Build from a loose JSON options object
    pub fn from_options(options: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(options)
    }

    pub fn with_quant(mut self, quant: impl Into<String>) -> Self {
        self.quant = quant.into();
        self
    }

    /// Use the normalized tag of a family + mode selection
    pub fn with_quant_scheme(mut self, scheme: &QuantScheme) -> Self {
        self.quant = scheme.tag();
        self
    }

    pub fn with_context_length(mut self, context_length: u64) -> Self {
        self.context_length = context_length;
        self
    }

    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_mode(mut self, mode: WorkloadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_gradient_checkpointing(mut self, enabled: bool) -> Self {
        self.gradient_checkpointing = enabled;
        self
    }

    pub fn with_optimizer(mut self, optimizer: Optimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Batch size, never below 1
    pub fn effective_batch_size(&self) -> u64 {
        self.batch_size.max(1)
    }

    /// Overhead factor, 1.0 when unset or not a positive number
    pub fn effective_overhead_factor(&self) -> f64 {
        if self.overhead_factor.is_finite() && self.overhead_factor > 0.0 {
            self.overhead_factor
        } else {
            1.0
        }
    }
}
