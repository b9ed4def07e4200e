use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VOCAB_SIZE: u64 = 32000;
pub const DEFAULT_HIDDEN_SIZE: u64 = 4096;
pub const DEFAULT_NUM_HIDDEN_LAYERS: u64 = 32;

/// Architecture record for a model as supplied by a model catalog.
///
/// Every numeric field is optional. A missing (or zero) dimension is never an
/// error, the accessors substitute a Llama-7B-like default instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub vocab_size: Option<u64>,
    pub hidden_size: Option<u64>,
    pub num_hidden_layers: Option<u64>,
    pub intermediate_size: Option<u64>,
    pub family: Option<String>,
    pub size_category: Option<String>,
    pub release_date: Option<String>,
    pub downloads: Option<u64>,
}

impl ModelConfig {
    /// Dense architecture with the four dimensions set
    pub fn dense(
        vocab_size: u64,
        hidden_size: u64,
        num_hidden_layers: u64,
        intermediate_size: u64,
    ) -> Self {
        Self {
            vocab_size: Some(vocab_size),
            hidden_size: Some(hidden_size),
            num_hidden_layers: Some(num_hidden_layers),
            intermediate_size: Some(intermediate_size),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, family: &str, size_category: &str, release_date: &str) -> Self {
        self.family = Some(family.to_string());
        self.size_category = Some(size_category.to_string());
        self.release_date = Some(release_date.to_string());
        self
    }

    pub fn vocab_size(&self) -> u64 {
        positive_or(self.vocab_size, DEFAULT_VOCAB_SIZE)
    }

    pub fn hidden_size(&self) -> u64 {
        positive_or(self.hidden_size, DEFAULT_HIDDEN_SIZE)
    }

    pub fn num_hidden_layers(&self) -> u64 {
        positive_or(self.num_hidden_layers, DEFAULT_NUM_HIDDEN_LAYERS)
    }

    /// Feed-forward width, defaulting to 4x the (defaulted) hidden size
    pub fn intermediate_size(&self) -> u64 {
        positive_or(self.intermediate_size, self.hidden_size().saturating_mul(4))
    }

    /// Size label from the record, or parsed from the catalog key
    pub fn size_category_for(&self, name: &str) -> Option<String> {
        self.size_category
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| detect_model_size(name))
    }

    /// Release year, when the date starts with one
    pub fn release_year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.trim().parse().ok())
    }
}

fn positive_or(value: Option<u64>, default: u64) -> u64 {
    value.filter(|&v| v > 0).unwrap_or(default)
}

static MODEL_SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)[-_]?b(?:illion)?\b").expect("model size pattern is valid")
});

/// Parse a parameter-count label such as `"7B"` out of a model path
pub fn detect_model_size(model_path: &str) -> Option<String> {
    let model_name = model_path
        .rsplit('/')
        .next()
        .unwrap_or(model_path)
        .to_lowercase();

    MODEL_SIZE_PATTERN
        .captures(&model_name)
        .map(|caps| format!("{}B", &caps[1]))
}
