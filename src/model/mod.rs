pub mod config;
pub mod params;
pub mod presets;

pub use config::{detect_model_size, ModelConfig};
pub use params::estimate_parameter_count;
pub use presets::{default_model_catalog, DEFAULT_MODEL, MODEL_PRESETS};
