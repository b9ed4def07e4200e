pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gpu_poor_rs::catalog::DEFAULT_SEARCH_LIMIT;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gpu_poor")]
#[command(about = "Estimate memory, speed and training time of LLM workloads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Model, hardware and workload selection shared by every estimate
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// JSON request file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Model key in the model catalog
    #[arg(long)]
    pub model: Option<String>,
    /// Hardware key in the GPU (or CPU) catalog
    #[arg(long)]
    pub hardware: Option<String>,
    /// Use the CPU catalog instead of the GPU catalog
    #[arg(long)]
    pub cpu: bool,
    /// Number of devices of the selected hardware
    #[arg(long)]
    pub num_devices: Option<u64>,
    /// Quantization tag, e.g. fp16, int8, nf4, bnb_q4_0, q2_k
    #[arg(long, conflicts_with_all = ["quant_family", "quant_mode"])]
    pub quant: Option<String>,
    /// Quantization family: bnb, nf4, awq, ggml or other
    #[arg(long)]
    pub quant_family: Option<String>,
    /// Mode within the family, e.g. bnb_int8, bnb_q4_0, ggml_q2_k
    #[arg(long)]
    pub quant_mode: Option<String>,
    /// Context (sequence) length in tokens
    #[arg(long)]
    pub context: Option<u64>,
    /// Batch size
    #[arg(long)]
    pub batch_size: Option<u64>,
    /// inference, training or qlora
    #[arg(long)]
    pub mode: Option<String>,
    /// adam, adamw or sgd
    #[arg(long)]
    pub optimizer: Option<String>,
    /// Enable gradient checkpointing
    #[arg(long)]
    pub grad_checkpoint: bool,
    /// JSON model catalog replacing the built-in one
    #[arg(long)]
    pub models_catalog: Option<PathBuf>,
    /// JSON hardware catalog replacing the built-in one
    #[arg(long)]
    pub hardware_catalog: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Memory breakdown and number of devices needed
    Memory {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Decode tokens/s and prompt processing time
    Throughput {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Milliseconds per training iteration
    TrainTime {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Hardware able to hold the workload, fastest first
    RecommendHardware {
        /// Memory requirement in GB (defaults to the model's estimated total)
        #[arg(long)]
        memory_gb: Option<f64>,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Models that fit in a memory budget, largest first
    RecommendModels {
        /// Available memory in GB (defaults to the selected hardware's memory)
        #[arg(long)]
        memory_gb: Option<f64>,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Search the model catalog
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Show the spec sheet of the selected hardware
    Specs {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// List catalog keys
    List {
        #[command(flatten)]
        request: RequestArgs,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Memory { request } => commands::memory(&request),
        Commands::Throughput { request } => commands::throughput(&request),
        Commands::TrainTime { request } => commands::train_time(&request),
        Commands::RecommendHardware { memory_gb, request } => {
            commands::recommend_hardware(memory_gb, &request)
        }
        Commands::RecommendModels { memory_gb, request } => {
            commands::recommend_models(memory_gb, &request)
        }
        Commands::Search {
            query,
            limit,
            request,
        } => commands::search(&query, limit, &request),
        Commands::Specs { request } => commands::specs(&request),
        Commands::List { request } => commands::list(&request),
    }
}
