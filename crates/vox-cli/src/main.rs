//! VOX text client.
//!
//! Feeds utterances from the command line (one-shot) or stdin (line
//! loop) into the query dispatcher and prints every response.
//!
//! # Configuration
//!
//! Loaded with priority (highest first):
//!
//! 1. Environment variables (`VOX_DEBUG`, `VOX_LANG`, `VOX_WORKER_PORT`)
//! 2. Project config (`./vox.toml`)
//! 3. Global config (`~/.vox/config.toml`)
//! 4. Default values

use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufRead;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vox_nlu::{IntentEngine, ProcessLauncher, WorkerConfig, WorkerEngine};
use vox_runtime::{IntentManager, Paths, QueryDispatcher, ResponsePayload, VoxConfig};

/// VOX text client
#[derive(Parser, Debug)]
#[command(name = "vox")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Submit one query and exit instead of reading stdin
    #[arg(short, long)]
    query: Option<String>,

    /// Disable the out-of-process worker engine
    #[arg(long)]
    no_worker: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = vox_runtime::config::load(std::path::Path::new("."))
        .context("failed to load configuration")?;
    let debug = args.debug || config.debug;

    let filter = EnvFilter::try_from_env("VOX_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dispatcher = build_runtime(&config, args.no_worker).await?;

    dispatcher
        .on_response(Arc::new(print_response))
        .await;

    match args.query {
        Some(query) => {
            dispatcher.submit(query).await;
            dispatcher.join_all().await;
        }
        None => {
            info!("reading queries from stdin; empty line quits");
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("failed to read stdin")?;
                if line.trim().is_empty() {
                    break;
                }
                dispatcher.submit(line).await;
                // Serialize interactive queries so responses do not
                // interleave on the terminal.
                dispatcher.join_all().await;
            }
        }
    }

    dispatcher.join_all().await;
    Ok(())
}

/// Assemble engines, manager, and dispatcher from configuration.
async fn build_runtime(config: &VoxConfig, no_worker: bool) -> Result<Arc<QueryDispatcher>> {
    let paths = Paths::new(config);
    let mut engines: Vec<Arc<dyn IntentEngine>> = Vec::new();

    if config.worker.enabled && !no_worker {
        let exe = config
            .worker
            .exe
            .clone()
            .unwrap_or_else(|| paths.worker_exe());
        let build = vox_nlu::BuildStep {
            repo_url: config.worker.repo_url.clone(),
            branch: config.worker.branch.clone(),
            dir: paths.worker_dir(),
            script: config.worker.build_script.clone(),
        };
        let worker_config = WorkerConfig {
            host: config.worker.host.clone(),
            port: config.worker.port,
            skills_dir: paths.skills_dir(),
            lang: config.lang.clone(),
            startup_timeout: config.timeouts.startup(),
            call_timeout: config.timeouts.call(),
        };

        // Worker setup failures are fatal: there is no degraded mode
        // for a half-started adapter.
        let launcher = Arc::new(ProcessLauncher::new(exe, Some(build)));
        let engine = WorkerEngine::start(worker_config, launcher)
            .await
            .context("failed to start worker engine")?;
        engines.push(Arc::new(engine));
    } else {
        warn!("worker engine disabled; only fallbacks will answer");
    }

    let manager = Arc::new(IntentManager::new(engines));
    Ok(Arc::new(QueryDispatcher::with_lang(
        manager,
        config.lang.clone(),
    )))
}

/// Stdout observer: actions and answers as lines, silence marked.
fn print_response(payload: Option<&ResponsePayload>) {
    match payload {
        Some(payload) => println!("[{}] {}", payload.name, payload.data),
        None => println!("(no response)"),
    }
}
