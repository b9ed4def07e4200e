//! Quantization tags and their storage widths
//!
//! A quantization is identified by a free-form tag such as `"bnb_q4_0"`,
//! `"nf4"` or `"fp16"`. Tags are never rejected: they are classified by
//! case-insensitive substring patterns, evaluated in table order, and
//! anything unrecognized is treated as fp16.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Width used for empty and unrecognized tags (fp16)
pub const DEFAULT_BYTES_PER_PARAM: f64 = 2.0;

/// Inference efficiency for tags outside every efficiency class
pub const DEFAULT_EFFICIENCY: f64 = 0.3;

/// Storage class a tag resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantClass {
    Fp32,
    Fp16,
    Int8,
    Q4,
    Q2,
}

/// Substring patterns per class. First matching row wins.
const QUANT_PATTERNS: &[(QuantClass, &[&str])] = &[
    (QuantClass::Fp32, &["fp32"]),
    (QuantClass::Fp16, &["fp16", "bf16"]),
    (QuantClass::Int8, &["int8", "8bit", "bnb8"]),
    (QuantClass::Q4, &["q4", "4bit", "nf4", "int4", "awq", "ggml-q4"]),
    (QuantClass::Q2, &["q2", "2bit"]),
];

impl QuantClass {
    /// Classify a tag, or `None` when no pattern matches
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.is_empty() {
            return None;
        }
        let tag = tag.to_lowercase();
        QUANT_PATTERNS
            .iter()
            .find(|(_, needles)| needles.iter().any(|needle| tag.contains(needle)))
            .map(|(class, _)| *class)
    }

    pub fn bytes_per_param(self) -> f64 {
        match self {
            QuantClass::Fp32 => 4.0,
            QuantClass::Fp16 => 2.0,
            QuantClass::Int8 => 1.0,
            QuantClass::Q4 => 0.5,
            QuantClass::Q2 => 0.25,
        }
    }

    /// Fraction of the theoretical decode rate reached in practice.
    ///
    /// fp32 has no class of its own and shares the conservative default.
    pub fn base_efficiency(self) -> f64 {
        match self {
            QuantClass::Fp32 => DEFAULT_EFFICIENCY,
            QuantClass::Fp16 => 0.4,
            QuantClass::Int8 => 0.5,
            QuantClass::Q4 => 0.6,
            QuantClass::Q2 => 0.7,
        }
    }
}

/// Resolve a quantization tag to bytes per parameter.
///
/// Total over all strings: returns one of 4.0, 2.0, 1.0, 0.5 or 0.25.
pub fn resolve_quant_bytes(tag: &str) -> f64 {
    match QuantClass::from_tag(tag) {
        Some(class) => class.bytes_per_param(),
        None => {
            if !tag.is_empty() {
                debug!(tag, "unrecognized quantization tag, assuming fp16 width");
            }
            DEFAULT_BYTES_PER_PARAM
        }
    }
}

/// Inference efficiency for a tag (0.3 when unclassified)
pub fn base_efficiency(tag: &str) -> f64 {
    QuantClass::from_tag(tag)
        .map(QuantClass::base_efficiency)
        .unwrap_or(DEFAULT_EFFICIENCY)
}

/// Quantization toolchain family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantFamily {
    BitsAndBytes,
    Nf4,
    Awq,
    Ggml,
    Other,
}

impl FromStr for QuantFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bitsandbytes" | "bnb" => Ok(QuantFamily::BitsAndBytes),
            "nf4" | "qlora" => Ok(QuantFamily::Nf4),
            "awq" => Ok(QuantFamily::Awq),
            "ggml" | "gguf" => Ok(QuantFamily::Ggml),
            "other" => Ok(QuantFamily::Other),
            other => Err(format!(
                "unknown quantization family '{}', expected one of: bnb, nf4, awq, ggml, other",
                other
            )),
        }
    }
}

/// A quantization choice: nothing, a known family with an optional mode,
/// or a caller-supplied tag
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuantScheme {
    #[default]
    None,
    Family {
        family: QuantFamily,
        mode: Option<String>,
    },
    Custom(String),
}

impl QuantScheme {
    pub fn family(family: QuantFamily, mode: impl Into<String>) -> Self {
        let mode = mode.into();
        QuantScheme::Family {
            family,
            mode: if mode.is_empty() { None } else { Some(mode) },
        }
    }

    /// Normalized tag string understood by [`resolve_quant_bytes`]
    pub fn tag(&self) -> String {
        match self {
            QuantScheme::None => String::new(),
            QuantScheme::Family { family, mode } => match (family, mode) {
                (_, Some(mode)) => mode.clone(),
                (QuantFamily::Nf4, None) => "nf4".to_string(),
                (QuantFamily::Awq, None) => "awq".to_string(),
                (_, None) => String::new(),
            },
            QuantScheme::Custom(tag) => tag.clone(),
        }
    }

    pub fn bytes_per_param(&self) -> f64 {
        resolve_quant_bytes(&self.tag())
    }
}

impl fmt::Display for QuantScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        if tag.is_empty() {
            write!(f, "none (fp16)")
        } else {
            write!(f, "{}", tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tag_is_fp16() {
        assert_eq!(resolve_quant_bytes(""), 2.0);
    }

    #[test]
    fn test_known_tags() {
        assert_eq!(resolve_quant_bytes("fp32"), 4.0);
        assert_eq!(resolve_quant_bytes("BF16"), 2.0);
        assert_eq!(resolve_quant_bytes("bnb_int8"), 1.0);
        assert_eq!(resolve_quant_bytes("load_in_8bit"), 1.0);
        assert_eq!(resolve_quant_bytes("bnb_q4_0"), 0.5);
        assert_eq!(resolve_quant_bytes("NF4"), 0.5);
        assert_eq!(resolve_quant_bytes("awq"), 0.5);
        assert_eq!(resolve_quant_bytes("ggml_q2_k"), 0.25);
        assert_eq!(resolve_quant_bytes("2bit"), 0.25);
    }

    #[test]
    fn test_precedence_follows_table_order() {
        // both fp16 and int8 patterns present, fp16 row comes first
        assert_eq!(resolve_quant_bytes("fp16-int8-mix"), 2.0);
        // awq is in the 4-bit row, which precedes the 2-bit row
        assert_eq!(resolve_quant_bytes("awq-2bit"), 0.5);
    }

    #[test]
    fn test_unrecognized_tags_fall_back() {
        for tag in ["mystery", "   ", "😀", "exl2-6.5bpw"] {
            assert_eq!(resolve_quant_bytes(tag), DEFAULT_BYTES_PER_PARAM, "{}", tag);
        }
    }

    #[test]
    fn test_efficiency_classes() {
        assert_eq!(base_efficiency("fp16"), 0.4);
        assert_eq!(base_efficiency("int8"), 0.5);
        assert_eq!(base_efficiency("q4_k_m"), 0.6);
        assert_eq!(base_efficiency("q2"), 0.7);
        assert_eq!(base_efficiency(""), DEFAULT_EFFICIENCY);
        assert_eq!(base_efficiency("fp32"), DEFAULT_EFFICIENCY);
    }

    #[test]
    fn test_scheme_tags() {
        assert_eq!(QuantScheme::None.tag(), "");
        assert_eq!(QuantScheme::family(QuantFamily::Nf4, "").tag(), "nf4");
        assert_eq!(QuantScheme::family(QuantFamily::Awq, "").tag(), "awq");
        assert_eq!(QuantScheme::family(QuantFamily::Ggml, "").tag(), "");
        assert_eq!(
            QuantScheme::family(QuantFamily::BitsAndBytes, "bnb_q4_0").tag(),
            "bnb_q4_0"
        );
        assert_eq!(QuantScheme::Custom("int4".into()).bytes_per_param(), 0.5);
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("bnb".parse::<QuantFamily>().unwrap(), QuantFamily::BitsAndBytes);
        assert_eq!("GGUF".parse::<QuantFamily>().unwrap(), QuantFamily::Ggml);
        assert_eq!("nf4".parse::<QuantFamily>().unwrap(), QuantFamily::Nf4);
        assert!("gptq".parse::<QuantFamily>().is_err());
    }
}
