//! Parameter-count estimation for dense decoder-only transformers

use super::config::ModelConfig;

/// Approximate trainable parameter count.
///
/// ```text
/// params = vocab * hidden + layers * (4 * hidden^2 + 3 * intermediate * hidden)
/// ```
///
/// The first term is the embedding table, the per-layer term covers the four
/// attention projections plus a gated (three-matrix) MLP. Norms and biases are
/// ignored, so this is an estimate rather than an exact count. Saturates at
/// `u64::MAX` instead of overflowing.
pub fn estimate_parameter_count(config: &ModelConfig) -> u64 {
    let vocab = config.vocab_size() as u128;
    let hidden = config.hidden_size() as u128;
    let layers = config.num_hidden_layers() as u128;
    let intermediate = config.intermediate_size() as u128;

    let embedding = vocab.saturating_mul(hidden);
    let attention = hidden.saturating_mul(hidden).saturating_mul(4);
    let mlp = intermediate.saturating_mul(hidden).saturating_mul(3);
    let per_layer = attention.saturating_add(mlp);
    let total = embedding.saturating_add(layers.saturating_mul(per_layer));

    u64::try_from(total).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llama2_7b_shape() {
        let config = ModelConfig::dense(32000, 4096, 32, 11008);
        let params = estimate_parameter_count(&config);
        // 131_072_000 embedding + 32 * (67_108_864 + 135_266_304)
        assert_eq!(params, 6_607_077_376);
    }

    #[test]
    fn test_all_defaults() {
        let params = estimate_parameter_count(&ModelConfig::default());
        let hidden: u64 = 4096;
        let expected = 32000 * hidden + 32 * (4 * hidden * hidden + 3 * 4 * hidden * hidden);
        assert_eq!(params, expected);
    }

    #[test]
    fn test_monotonic_in_each_dimension() {
        let base = ModelConfig::dense(32000, 4096, 32, 11008);
        let base_params = estimate_parameter_count(&base);

        let bigger = [
            ModelConfig::dense(64000, 4096, 32, 11008),
            ModelConfig::dense(32000, 5120, 32, 11008),
            ModelConfig::dense(32000, 4096, 40, 11008),
            ModelConfig::dense(32000, 4096, 32, 14336),
        ];
        for config in &bigger {
            assert!(estimate_parameter_count(config) > base_params, "{:?}", config);
        }
    }

    #[test]
    fn test_huge_dimensions_saturate() {
        let config = ModelConfig::dense(u64::MAX, u64::MAX, u64::MAX, u64::MAX);
        assert_eq!(estimate_parameter_count(&config), u64::MAX);
    }
}
