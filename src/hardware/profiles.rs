//! Built-in GPU and CPU catalogs
//!
//! Curated 2025 consumer hardware. Compute is in dense fp16 TFLOPS (or an
//! equivalent for CPUs), bandwidth in GB/s, memory in GB.

use super::spec::HardwareSpec;
use crate::catalog::Catalog;
use once_cell::sync::Lazy;

/// Key of the GPU selected when nothing else is requested
pub const DEFAULT_GPU: &str = "rtx-5090";

/// Key of the CPU selected when nothing else is requested
pub const DEFAULT_CPU: &str = "9950x";

#[allow(clippy::too_many_arguments)]
fn profile(
    display_name: &str,
    architecture: &str,
    compute: f64,
    bandwidth: f64,
    memory: f64,
    tdp: f64,
    release_year: u32,
    price_range: &str,
) -> HardwareSpec {
    HardwareSpec {
        display_name: Some(display_name.to_string()),
        architecture: Some(architecture.to_string()),
        release_year: Some(release_year),
        price_range: Some(price_range.to_string()),
        ..HardwareSpec::new(compute, bandwidth, memory, tdp)
    }
}

pub static GPU_PROFILES: Lazy<Catalog<HardwareSpec>> = Lazy::new(|| {
    Catalog::new()
        .with_entry(
            "rtx-5090",
            profile("RTX 5090", "Blackwell", 165.0, 1500.0, 32.0, 450.0, 2025, "$1600-2000"),
        )
        .with_entry(
            "rtx-5080",
            profile("RTX 5080", "Blackwell", 120.0, 900.0, 16.0, 320.0, 2025, "$1000-1200"),
        )
        .with_entry(
            "rtx-5070-ti",
            profile("RTX 5070 Ti", "Blackwell", 90.0, 700.0, 16.0, 280.0, 2025, "$700-800"),
        )
        .with_entry(
            "rtx-5070",
            profile("RTX 5070", "Blackwell", 75.0, 600.0, 12.0, 250.0, 2025, "$500-600"),
        )
        .with_entry(
            "rtx-4090",
            profile("RTX 4090", "Ada Lovelace", 165.0, 1008.0, 24.0, 450.0, 2022, "$1200-1500"),
        )
});

// CPU compute is an AVX-512 fp32 estimate, memory is a typical desktop build
pub static CPU_PROFILES: Lazy<Catalog<HardwareSpec>> = Lazy::new(|| {
    Catalog::new()
        .with_entry(
            "9950x",
            profile("Ryzen 9 9950X", "Zen 5", 2.5, 90.0, 64.0, 170.0, 2024, "$550-650"),
        )
        .with_entry(
            "14900k",
            profile("Core i9-14900K", "Raptor Lake", 1.5, 90.0, 64.0, 253.0, 2023, "$450-550"),
        )
});

pub fn default_gpu_catalog() -> Catalog<HardwareSpec> {
    GPU_PROFILES.clone()
}

pub fn default_cpu_catalog() -> Catalog<HardwareSpec> {
    CPU_PROFILES.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys_present() {
        assert!(GPU_PROFILES.contains(DEFAULT_GPU));
        assert!(CPU_PROFILES.contains(DEFAULT_CPU));
    }

    #[test]
    fn test_rtx_4090_profile() {
        let gpu = GPU_PROFILES.get("rtx-4090").unwrap();
        assert_eq!(gpu.memory(), 24.0);
        assert_eq!(gpu.bandwidth(), 1008.0);
        assert_eq!(gpu.architecture.as_deref(), Some("Ada Lovelace"));
    }
}
