// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{MirrorEngine, Reporter, Runtime, RuntimeOptions, TracingReporter};
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (fatal on any error)
/// - destination root creation and the optional startup cleanup
/// - the engine and its poll loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let base_dir = std::env::current_dir().context("resolving current directory")?;
    let cfg = load_and_validate(&args.config, &base_dir)
        .with_context(|| format!("loading config {}", args.config))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter);
    let engine = MirrorEngine::new(&cfg, fs, reporter)?;

    engine.prepare_destinations();
    if !args.no_clean {
        let stats = engine.cleanup();
        info!(removed = stats.removed, failed = stats.failed, "startup cleanup done");
    }

    // Ctrl-C → stop between cycles.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            // Keep the sender alive so the loop keeps polling.
            std::future::pending::<()>().await;
        }
        let _ = shutdown_tx.send(()).await;
    });

    let options = RuntimeOptions {
        once: args.once,
        interval: Duration::from_millis(args.tick),
    };

    info!("successfully started and running");
    let runtime = Runtime::new(engine, options, shutdown_rx);
    runtime.run().await;
    Ok(())
}

/// Simple dry-run output: print the resolved mappings and their patterns.
fn print_dry_run(cfg: &ConfigFile) {
    println!("filemirror dry-run");
    println!("mappings ({}):", cfg.mappings().len());
    for (index, mapping) in cfg.mappings().iter().enumerate() {
        println!("  [{index}] {} -> {}", mapping.src_root.display(), mapping.dst_root.display());
        if !mapping.include.is_empty() {
            println!("      files: {}", mapping.include);
        }
        if !mapping.exclude.is_empty() {
            println!("      ignored: {}", mapping.exclude);
        }
        if !mapping.cleanup_patterns.is_empty() {
            println!("      cleanupPatterns: {:?}", mapping.cleanup_patterns);
        }
    }
}
