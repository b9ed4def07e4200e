//! CLI command implementations

use super::RequestArgs;
use anyhow::Result;
use gpu_poor_rs::catalog::{search_models, Catalog};
use gpu_poor_rs::config::{Config, DeviceKind};
use gpu_poor_rs::hardware::{default_cpu_catalog, default_gpu_catalog};
use gpu_poor_rs::model::default_model_catalog;
use gpu_poor_rs::{
    compute_memory_breakdown, compute_throughput, compute_training_time, devices_needed,
    fits_on_devices, pooled_memory_gb, rank_hardware_for, rank_models_for, HardwareSpec,
    ModelConfig, QuantFamily, QuantScheme,
};
use serde::Serialize;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Resolved request: effective config plus the catalogs it refers to
struct Session {
    config: Config,
    models: Catalog<ModelConfig>,
    hardware: Catalog<HardwareSpec>,
    json: bool,
}

impl Session {
    fn from_args(args: &RequestArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(model) = &args.model {
            config.model = model.clone();
        }
        if args.cpu {
            config.device = DeviceKind::Cpu;
        }
        if let Some(hardware) = &args.hardware {
            config.hardware = Some(hardware.clone());
        }
        if let Some(num_devices) = args.num_devices {
            config.num_devices = num_devices;
        }
        if let Some(quant) = &args.quant {
            config.workload.quant = quant.clone();
        }
        if let Some(scheme) = quant_scheme(args)? {
            config.workload = config.workload.with_quant_scheme(&scheme);
        }
        if let Some(context) = args.context {
            config.workload.context_length = context;
        }
        if let Some(batch_size) = args.batch_size {
            config.workload.batch_size = batch_size;
        }
        if let Some(mode) = &args.mode {
            config.workload.mode = mode.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(optimizer) = &args.optimizer {
            config.workload.optimizer = optimizer.parse().map_err(anyhow::Error::msg)?;
        }
        if args.grad_checkpoint {
            config.workload.gradient_checkpointing = true;
        }
        if let Some(path) = &args.models_catalog {
            config.models_catalog = Some(path.display().to_string());
        }
        if let Some(path) = &args.hardware_catalog {
            config.hardware_catalog = Some(path.display().to_string());
        }

        let models = match &config.models_catalog {
            Some(path) => Catalog::from_json_file(path)?,
            None => default_model_catalog(),
        };
        let hardware = match (&config.hardware_catalog, config.device) {
            (Some(path), _) => Catalog::from_json_file(path)?,
            (None, DeviceKind::Gpu) => default_gpu_catalog(),
            (None, DeviceKind::Cpu) => default_cpu_catalog(),
        };

        Ok(Self {
            config,
            models,
            hardware,
            json: args.json,
        })
    }

    fn model(&self) -> Result<&ModelConfig> {
        Ok(self.models.get(&self.config.model)?)
    }

    fn hardware_spec(&self) -> Result<&HardwareSpec> {
        Ok(self.hardware.get(self.config.hardware_key())?)
    }

    fn print_header(&self, title: &str) {
        let workload = &self.config.workload;
        println!("{}", RULE);
        println!("{}", title);
        println!("{}", RULE);
        println!("  Model:         {}", self.config.model);
        println!(
            "  Hardware:      {} x {}",
            self.config.effective_num_devices(),
            self.config.hardware_key()
        );
        println!(
            "  Quantization:  {}",
            if workload.quant.is_empty() { "none (fp16)" } else { workload.quant.as_str() }
        );
        println!("  Mode:          {}", workload.mode);
        println!("  Context:       {}", workload.context_length);
        println!("  Batch size:    {}", workload.batch_size);
        println!("{}", RULE);
    }
}

/// Family + mode selection, if either flag was given
fn quant_scheme(args: &RequestArgs) -> Result<Option<QuantScheme>> {
    let mode = args.quant_mode.clone().unwrap_or_default();
    match &args.quant_family {
        Some(family) => {
            let family: QuantFamily = family.parse().map_err(anyhow::Error::msg)?;
            Ok(Some(QuantScheme::family(family, mode)))
        }
        None if !mode.is_empty() => Ok(Some(QuantScheme::Custom(mode))),
        None => Ok(None),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn memory(args: &RequestArgs) -> Result<()> {
    let session = Session::from_args(args)?;
    let breakdown = compute_memory_breakdown(session.model()?, &session.config.workload);
    let hardware = session.hardware_spec()?;
    let needed = devices_needed(breakdown.total, hardware);
    let num_devices = session.config.effective_num_devices();
    let fits = fits_on_devices(breakdown.total, hardware, num_devices);

    if session.json {
        return print_json(&serde_json::json!({
            "breakdown": breakdown,
            "devices_needed": needed,
            "num_devices": num_devices,
            "fits": fits,
        }));
    }

    session.print_header("Memory Requirement");
    for (label, gb) in breakdown.components() {
        println!("  {:<25} {:>9.2} GB", label, gb);
    }
    println!("  {:<25} {:>9.2} GB", "Total", breakdown.total);
    println!(
        "  Devices needed:           {} x {} ({:.0} GB each)",
        needed,
        session.config.hardware_key(),
        hardware.memory()
    );
    println!(
        "  Fits on {} device(s):      {}",
        num_devices,
        if fits { "yes" } else { "no" }
    );
    println!("{}", RULE);
    Ok(())
}

pub fn throughput(args: &RequestArgs) -> Result<()> {
    let session = Session::from_args(args)?;
    let perf = compute_throughput(
        session.model()?,
        session.hardware_spec()?,
        &session.config.workload,
    )?;

    if session.json {
        return print_json(&perf);
    }

    session.print_header("Token Throughput");
    println!("  Tokens per second:        {:.1}", perf.tokens_per_second);
    println!("  ms per token:             {:.1}", perf.ms_per_token);
    println!("  Prompt process time (s):  {:.1}", perf.prompt_process_time_s);
    println!("  Memory or compute bound:  {}", perf.bound);
    println!("{}", RULE);
    Ok(())
}

pub fn train_time(args: &RequestArgs) -> Result<()> {
    let session = Session::from_args(args)?;
    let estimate = compute_training_time(
        session.model()?,
        session.hardware_spec()?,
        &session.config.workload,
    )?;

    if session.json {
        return print_json(&estimate);
    }

    session.print_header("Training Iteration Time");
    println!("  ms per iteration (fwd + bwd): {:.1}", estimate.ms_per_iteration);
    println!("  Memory or compute bound:      {}", estimate.bound);
    println!("{}", RULE);
    Ok(())
}

pub fn recommend_hardware(memory_gb: Option<f64>, args: &RequestArgs) -> Result<()> {
    let session = Session::from_args(args)?;
    let requirement = match memory_gb {
        Some(gb) => gb,
        None => compute_memory_breakdown(session.model()?, &session.config.workload).total,
    };
    let ranked = rank_hardware_for(requirement, &session.hardware);

    if session.json {
        return print_json(&ranked);
    }

    println!("{}", RULE);
    println!("Hardware with at least {:.2} GB", requirement);
    println!("{}", RULE);
    if ranked.is_empty() {
        println!("  No single device in the catalog has enough memory.");
    }
    for rec in &ranked {
        println!(
            "  {:<16} {:>7.1} TFLOPS  {:>5.0} GB  {:.3} TFLOPS/W  {:.3} GB/W",
            rec.name,
            rec.spec.compute(),
            rec.spec.memory(),
            rec.efficiency,
            rec.memory_efficiency
        );
    }
    println!("{}", RULE);
    Ok(())
}

pub fn recommend_models(memory_gb: Option<f64>, args: &RequestArgs) -> Result<()> {
    let session = Session::from_args(args)?;
    let available = match memory_gb {
        Some(gb) => gb,
        None => pooled_memory_gb(
            session.hardware_spec()?,
            session.config.effective_num_devices(),
        ),
    };
    let ranked = rank_models_for(available, &session.models, &session.config.workload);

    if session.json {
        return print_json(&ranked);
    }

    println!("{}", RULE);
    println!("Models for {:.1} GB", available);
    println!("{}", RULE);
    for rec in &ranked {
        let status = if rec.can_run { "✓" } else { "✗" };
        println!(
            "  {} {:<36} {:>6.1}B params  {:>7.2} GB",
            status,
            rec.name,
            rec.param_count as f64 / 1e9,
            rec.estimated_memory_gb
        );
    }
    println!("{}", RULE);
    Ok(())
}

pub fn search(query: &str, limit: usize, args: &RequestArgs) -> Result<()> {
    let session = Session::from_args(args)?;
    let hits = search_models(&session.models, query, limit);

    if session.json {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("No models match '{}'.", query);
        return Ok(());
    }
    for hit in &hits {
        println!("  {:<40} {} [{}]", hit.name, hit.display_name, hit.score);
    }
    Ok(())
}

pub fn specs(args: &RequestArgs) -> Result<()> {
    let session = Session::from_args(args)?;
    let key = session.config.hardware_key();
    let hardware = session.hardware_spec()?;

    if session.json {
        return print_json(hardware);
    }

    for line in hardware.spec_lines(key) {
        println!("{}", line);
    }
    let quant = &session.config.workload.quant;
    if !quant.is_empty() {
        println!("Selected quant: {}", quant);
    }
    Ok(())
}

pub fn list(args: &RequestArgs) -> Result<()> {
    let session = Session::from_args(args)?;

    if session.json {
        return print_json(&serde_json::json!({
            "models": session.models.keys().collect::<Vec<_>>(),
            "hardware": session.hardware.keys().collect::<Vec<_>>(),
        }));
    }

    println!("Models ({}):", session.models.len());
    for key in session.models.keys() {
        println!("  {}", key);
    }
    println!("Hardware ({}):", session.hardware.len());
    for key in session.hardware.keys() {
        println!("  {}", key);
    }
    Ok(())
}
