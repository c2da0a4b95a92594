// Ascension Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use ascension_engine::config::EngineConfig;
use ascension_engine::engine::EvolutionEngine;
use ascension_engine::presets;
use ascension_engine::server;
use ascension_engine::state::DashboardState;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ascension")]
#[command(about = "Configurable stochastic evolution engine", long_about = None)]
struct Cli {
    /// Worker threads for field perturbation (defaults to CPU count)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct EngineArgs {
    /// Named preset (see `ascension presets`)
    #[arg(short, long, default_value = "transcendence")]
    preset: String,

    /// JSON config file; overrides the preset entirely
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the evolution loop until Ctrl-C or a time limit
    Run {
        #[command(flatten)]
        engine: EngineArgs,

        /// Stop after this many seconds
        #[arg(short, long)]
        seconds: Option<u64>,
    },

    /// Drive loop ticks synchronously, then print stats
    Step {
        #[command(flatten)]
        engine: EngineArgs,

        #[arg(short = 'n', long, default_value_t = 10)]
        iterations: u64,
    },

    /// List available presets
    Presets,

    /// Print the stats of a freshly built engine
    Stats {
        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Run the evolution loop and serve the stats API
    Serve {
        #[command(flatten)]
        engine: EngineArgs,

        /// Port to run the server on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

fn load_config(args: &EngineArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => presets::by_name(&args.preset).ok_or_else(|| {
            anyhow!(
                "unknown preset '{}' (available: {})",
                args.preset,
                presets::names().join(", ")
            )
        })?,
    };
    config
        .apply_env_overrides()
        .context("applying ASCENSION_* overrides")?;
    Ok(config)
}

fn build_engine(args: &EngineArgs) -> anyhow::Result<EvolutionEngine> {
    let config = load_config(args)?;
    EvolutionEngine::new(config).context("building engine")
}

fn print_stats(engine: &EvolutionEngine) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&engine.get_stats())?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        eprintln!("🚨 [ASCENSION PANIC] at {}: {}", location, panic_info);
    }));

    let args = Cli::parse();

    let threads = args.threads.unwrap_or_else(num_cpus::get);
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        error!("Could not size the field worker pool: {}", e);
    }

    info!("--- ASCENSION EVOLUTION ENGINE v{} ---", env!("CARGO_PKG_VERSION"));

    match args.command {
        Commands::Presets => {
            for name in presets::names() {
                println!("{}", name);
            }
        }
        Commands::Stats { engine } => {
            let engine = build_engine(&engine)?;
            print_stats(&engine)?;
        }
        Commands::Step { engine, iterations } => {
            let engine = build_engine(&engine)?;
            for _ in 0..iterations {
                if let Err(e) = engine.run_iteration() {
                    error!("❌ Iteration failed: {}", e);
                }
            }
            print_stats(&engine)?;
        }
        Commands::Run { engine, seconds } => {
            let engine = build_engine(&engine)?;
            engine.start_evolution()?;

            match seconds {
                Some(secs) => {
                    tokio::select! {
                        _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                        _ = tokio::signal::ctrl_c() => info!("🛑 Interrupted."),
                    }
                }
                None => {
                    tokio::signal::ctrl_c().await?;
                    info!("🛑 Interrupted.");
                }
            }

            engine.stop_evolution().await;
            print_stats(&engine)?;
        }
        Commands::Serve { engine, port } => {
            let engine = Arc::new(build_engine(&engine)?);
            engine.start_evolution()?;

            let state = Arc::new(DashboardState::new(engine.clone()));
            tokio::select! {
                res = server::start_server(port, state) => {
                    if let Err(e) = res {
                        error!("Server error: {}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => info!("🛑 Interrupted."),
            }

            engine.stop_evolution().await;
            print_stats(&engine)?;
        }
    }

    Ok(())
}
