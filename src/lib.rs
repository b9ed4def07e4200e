//! GPU Poor: resource estimation for large language model workloads
//!
//! Given a model architecture, a quantization, a workload and a hardware
//! capability record, this crate estimates:
//!
//! - **Memory**: weights, KV cache, activations, gradients + optimizer state
//!   and framework overhead, in GB
//! - **Throughput**: decode tokens/s, ms/token and prompt processing time,
//!   plus whether decoding is memory- or compute-bound
//! - **Training time**: milliseconds per forward + backward iteration
//! - **Recommendations**: which hardware can hold a workload and which
//!   models fit in a memory budget
//!
//! ## Main Components
//!
//! - `quant`: quantization tag resolution
//! - `model`: architecture records and parameter-count estimation
//! - `hardware`: hardware capability records and built-in profiles
//! - `catalog`: read-only keyed catalogs and model search
//! - `config`: workload options
//! - `estimate`: memory, throughput and training estimators
//! - `recommend`: hardware and model ranking
//!
//! Every estimator is a pure function over borrowed, immutable inputs, so
//! independent estimates can run on any number of threads.

pub mod catalog;
pub mod config;
pub mod estimate;
pub mod hardware;
pub mod model;
pub mod quant;
pub mod recommend;

pub use catalog::{Catalog, CatalogError};
pub use config::{Config, Optimizer, WorkloadConfig, WorkloadMode};
pub use estimate::{
    compute_memory_breakdown, compute_throughput, compute_training_time, Bound, EstimateError,
    MemoryBreakdown, PerformanceEstimate, TrainingEstimate,
};
pub use hardware::HardwareSpec;
pub use model::{estimate_parameter_count, ModelConfig};
pub use quant::{resolve_quant_bytes, QuantFamily, QuantScheme};
pub use recommend::{
    devices_needed, fits_on_devices, pooled_memory_gb, rank_hardware_for, rank_models_for,
};

/// Library errors
pub use anyhow::{Error, Result};
