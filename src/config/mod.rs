pub mod workload;

use crate::hardware::{DEFAULT_CPU, DEFAULT_GPU};
use crate::model::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub use workload::{Optimizer, WorkloadConfig, WorkloadMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Gpu,
    Cpu,
}

/// A saved estimation request: which model on which hardware, doing what
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub device: DeviceKind,
    /// Hardware key, `None` for the device kind's default
    pub hardware: Option<String>,
    /// Devices of the selected hardware available to the workload
    pub num_devices: u64,
    pub workload: WorkloadConfig,
    /// Optional JSON files replacing the built-in catalogs
    pub models_catalog: Option<String>,
    pub hardware_catalog: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            device: DeviceKind::Gpu,
            hardware: None,
            num_devices: 1,
            workload: WorkloadConfig::default(),
            models_catalog: None,
            hardware_catalog: None,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Hardware key to use, falling back to the device kind's default
    pub fn hardware_key(&self) -> &str {
        match (&self.hardware, self.device) {
            (Some(key), _) => key,
            (None, DeviceKind::Gpu) => DEFAULT_GPU,
            (None, DeviceKind::Cpu) => DEFAULT_CPU,
        }
    }

    /// Device count, never below one
    pub fn effective_num_devices(&self) -> u64 {
        self.num_devices.max(1)
    }

    pub fn to_dict(&self) -> anyhow::Result<HashMap<String, serde_json::Value>> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }

    pub fn from_dict(data: HashMap<String, serde_json::Value>) -> anyhow::Result<Self> {
        let json = serde_json::to_string(&data)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hardware_key_follows_device() {
        let mut config = Config::default();
        assert_eq!(config.hardware_key(), DEFAULT_GPU);
        config.device = DeviceKind::Cpu;
        assert_eq!(config.hardware_key(), DEFAULT_CPU);
        config.hardware = Some("rtx-4090".into());
        assert_eq!(config.hardware_key(), "rtx-4090");
    }

    #[test]
    fn test_dict_round_trip_keeps_workload() {
        let mut config = Config::default();
        config.workload.mode = WorkloadMode::Training;
        let dict = config.to_dict().unwrap();
        assert!(dict.contains_key("workload"));
        assert_eq!(Config::from_dict(dict).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{"model": "Qwen/Qwen2.5-7B", "device": "cpu", "workload": {"quant": "q4_0"}}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.model, "Qwen/Qwen2.5-7B");
        assert_eq!(config.device, DeviceKind::Cpu);
        assert_eq!(config.workload.quant, "q4_0");
        assert_eq!(config.workload.context_length, 2048);
        assert_eq!(config.num_devices, 1);
    }

    #[test]
    fn test_num_devices_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pair.json");
        std::fs::write(&path, r#"{"hardware": "rtx-4090", "num_devices": 2}"#).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().effective_num_devices(), 2);

        std::fs::write(&path, r#"{"num_devices": 0}"#).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().effective_num_devices(), 1);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/no/such/request.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
