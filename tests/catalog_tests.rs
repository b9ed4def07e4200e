use gpu_poor_rs::catalog::{search_models, CatalogKind};
use gpu_poor_rs::hardware::{default_gpu_catalog, DEFAULT_GPU};
use gpu_poor_rs::model::{default_model_catalog, DEFAULT_MODEL};
use gpu_poor_rs::{
    compute_memory_breakdown, devices_needed, fits_on_devices, pooled_memory_gb,
    rank_hardware_for, rank_models_for, Catalog, CatalogError, HardwareSpec, ModelConfig,
    QuantFamily, QuantScheme, WorkloadConfig,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_catalogs_from_files() {
    let dir = TempDir::new().unwrap();
    let models_path = dir.path().join("models.json");
    let hardware_path = dir.path().join("gpus.json");

    fs::write(
        &models_path,
        r#"{
            "org/tiny-1b": {"hidden_size": 2048, "num_hidden_layers": 16, "vocab_size": 32000,
                            "family": "Tiny", "release_date": "2024-01-01", "downloads": 5000},
            "org/bare": {}
        }"#,
    )
    .unwrap();
    fs::write(
        &hardware_path,
        r#"{"card-a": {"compute": 100, "bandwidth": 900, "memory": 24, "tdp": 300}}"#,
    )
    .unwrap();

    let models = Catalog::<ModelConfig>::from_json_file(&models_path).unwrap();
    let hardware = Catalog::<HardwareSpec>::from_json_file(&hardware_path).unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(hardware.len(), 1);

    // a found-but-empty record is usable and fully defaulted
    let bare = models.get("org/bare").unwrap();
    let mem = compute_memory_breakdown(bare, &WorkloadConfig::default());
    assert!(mem.total > 0.0);

    let card = hardware.get("card-a").unwrap();
    assert_eq!(devices_needed(mem.total, card), 1);
}

#[test]
fn test_malformed_catalog_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = Catalog::<HardwareSpec>::from_json_file(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Parse { kind: CatalogKind::Hardware, .. }));
}

#[test]
fn test_unknown_keys_are_not_found() {
    let models = default_model_catalog();
    let err = models.get("nobody/does-not-exist").unwrap_err();
    assert!(matches!(err, CatalogError::UnknownKey { kind: CatalogKind::Model, .. }));
    assert!(err.to_string().contains("nobody/does-not-exist"));

    let gpus = default_gpu_catalog();
    assert!(gpus.get("voodoo-3").is_err());
}

#[test]
fn test_default_model_on_default_gpu() {
    let models = default_model_catalog();
    let gpus = default_gpu_catalog();
    let model = models.get(DEFAULT_MODEL).unwrap();
    let gpu = gpus.get(DEFAULT_GPU).unwrap();

    let mem = compute_memory_breakdown(model, &WorkloadConfig::default());
    assert_eq!(devices_needed(mem.total, gpu), 1);
}

#[test]
fn test_recommend_hardware_for_default_model() {
    let models = default_model_catalog();
    let model = models.get(DEFAULT_MODEL).unwrap();
    let mem = compute_memory_breakdown(model, &WorkloadConfig::default());

    let ranked = rank_hardware_for(mem.total, &default_gpu_catalog());
    assert!(!ranked.is_empty());
    assert!(ranked.iter().all(|r| r.spec.memory() >= mem.total));
    for pair in ranked.windows(2) {
        assert!(pair[0].spec.compute() >= pair[1].spec.compute());
    }
    // a 12 GB card cannot hold a 15 GB fp16 7B
    assert!(ranked.iter().all(|r| r.name != "rtx-5070"));
}

#[test]
fn test_recommend_models_for_24gb() {
    let workload = WorkloadConfig::default().with_quant("q4_0").with_context_length(4096);
    let ranked = rank_models_for(24.0, &default_model_catalog(), &workload);

    assert!(ranked.len() <= 15);
    for pair in ranked.windows(2) {
        assert!(pair[0].param_count >= pair[1].param_count);
    }
    for rec in &ranked {
        assert_eq!(rec.can_run, rec.estimated_memory_gb <= 24.0);
    }
    let llama_7b = ranked.iter().find(|r| r.name == DEFAULT_MODEL).unwrap();
    assert!(llama_7b.can_run);
    let llama_70b = ranked.iter().find(|r| r.name == "meta-llama/Llama-2-70b-hf").unwrap();
    assert!(!llama_70b.can_run);
}

#[test]
fn test_search_builtin_catalog() {
    let hits = search_models(&default_model_catalog(), "qwen", 10);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Qwen/Qwen2.5-7B");
    assert_eq!(hits[0].display_name, "Qwen 2.5 7B (Qwen)");
}

#[test]
fn test_device_count_pools_memory() {
    let models = default_model_catalog();
    let gpus = default_gpu_catalog();
    let llama_70b = models.get("meta-llama/Llama-2-70b-hf").unwrap();
    let gpu = gpus.get("rtx-4090").unwrap();

    let workload = WorkloadConfig::default()
        .with_quant_scheme(&QuantScheme::family(QuantFamily::Nf4, ""));
    assert_eq!(workload.quant, "nf4");

    let mem = compute_memory_breakdown(llama_70b, &workload);
    let needed = devices_needed(mem.total, gpu);
    assert!(needed > 1, "{} GB on one card", mem.total);
    assert!(!fits_on_devices(mem.total, gpu, needed - 1));
    assert!(fits_on_devices(mem.total, gpu, needed));

    let ranked = rank_models_for(pooled_memory_gb(gpu, needed), &models, &workload);
    let row = ranked.iter().find(|r| r.name == "meta-llama/Llama-2-70b-hf").unwrap();
    assert!(row.can_run);
}
