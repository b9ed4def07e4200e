pub mod profiles;
pub mod spec;

pub use profiles::{
    default_cpu_catalog, default_gpu_catalog, CPU_PROFILES, DEFAULT_CPU, DEFAULT_GPU, GPU_PROFILES,
};
pub use spec::HardwareSpec;
