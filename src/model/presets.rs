//! Built-in model catalog of common open-weight architectures

use super::config::ModelConfig;
use crate::catalog::Catalog;
use once_cell::sync::Lazy;

/// Model used when the caller does not name one
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-2-7b-hf";

pub static MODEL_PRESETS: Lazy<Catalog<ModelConfig>> = Lazy::new(|| {
    Catalog::new()
        .with_entry(
            "meta-llama/Llama-2-7b-hf",
            ModelConfig::dense(32000, 4096, 32, 11008)
                .with_metadata("Llama 2", "7B", "2023-07-18"),
        )
        .with_entry(
            "meta-llama/Llama-2-13b-hf",
            ModelConfig::dense(32000, 5120, 40, 13824)
                .with_metadata("Llama 2", "13B", "2023-07-18"),
        )
        .with_entry(
            "meta-llama/Llama-2-70b-hf",
            ModelConfig::dense(32000, 8192, 80, 28672)
                .with_metadata("Llama 2", "70B", "2023-07-18"),
        )
        .with_entry(
            "meta-llama/Llama-3.1-8B",
            ModelConfig::dense(128256, 4096, 32, 14336)
                .with_metadata("Llama 3.1", "8B", "2024-07-23"),
        )
        .with_entry(
            "meta-llama/Llama-3.1-70B",
            ModelConfig::dense(128256, 8192, 80, 28672)
                .with_metadata("Llama 3.1", "70B", "2024-07-23"),
        )
        .with_entry(
            "mistralai/Mistral-7B-v0.1",
            ModelConfig::dense(32000, 4096, 32, 14336)
                .with_metadata("Mistral", "7B", "2023-09-27"),
        )
        .with_entry(
            "Qwen/Qwen2.5-7B",
            ModelConfig::dense(152064, 3584, 28, 18944)
                .with_metadata("Qwen 2.5", "7B", "2024-09-19"),
        )
        .with_entry(
            "google/gemma-2-9b",
            ModelConfig::dense(256000, 3584, 42, 14336)
                .with_metadata("Gemma 2", "9B", "2024-06-27"),
        )
        .with_entry(
            "microsoft/Phi-3-mini-4k-instruct",
            ModelConfig::dense(32064, 3072, 32, 8192)
                .with_metadata("Phi-3", "3.8B", "2024-04-23"),
        )
});

pub fn default_model_catalog() -> Catalog<ModelConfig> {
    MODEL_PRESETS.clone()
}
