// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::core::MirrorEngine;

/// Runtime options for the poll loop.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Run a single cycle and return (used for `--once`).
    pub once: bool,
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            once: false,
            interval: Duration::from_millis(3000),
        }
    }
}

/// Drives a [`MirrorEngine`] once or in a fixed-interval poll loop.
///
/// This is a thin IO shell: cycles run synchronously (on a blocking-capable
/// worker via `block_in_place`), so this must be used from a multi-threaded
/// tokio runtime. A shutdown request is only honoured between cycles.
pub struct Runtime {
    engine: MirrorEngine,
    options: RuntimeOptions,
    shutdown_rx: mpsc::Receiver<()>,
    shutdown_open: bool,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        engine: MirrorEngine,
        options: RuntimeOptions,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            engine,
            options,
            shutdown_rx,
            shutdown_open: true,
        }
    }

    /// Main loop. Returns the engine once the loop stops, so callers can
    /// inspect its final state.
    pub async fn run(mut self) -> MirrorEngine {
        info!(
            once = self.options.once,
            interval_ms = self.options.interval.as_millis() as u64,
            "filemirror runtime started"
        );

        loop {
            let summary = tokio::task::block_in_place(|| self.engine.run_cycle());
            if !summary.is_idle() {
                info!(
                    cycle = summary.cycle,
                    copied = summary.sync.copied,
                    deleted = summary.sweep.deleted,
                    "cycle synced changes"
                );
            }

            if self.options.once {
                debug!("single cycle requested; stopping");
                break;
            }

            if self.wait_for_next_cycle().await {
                info!("shutdown requested; stopping runtime");
                break;
            }
        }

        info!(cycles = self.engine.cycles(), "runtime exiting");
        self.engine
    }

    /// Sleep for the poll interval. Returns true if shutdown was requested
    /// in the meantime (or during the previous cycle).
    async fn wait_for_next_cycle(&mut self) -> bool {
        if !self.shutdown_open {
            tokio::time::sleep(self.options.interval).await;
            return false;
        }

        tokio::select! {
            msg = self.shutdown_rx.recv() => match msg {
                Some(()) => true,
                None => {
                    // Nobody can request shutdown any more; keep polling.
                    self.shutdown_open = false;
                    tokio::time::sleep(self.options.interval).await;
                    false
                }
            },
            _ = tokio::time::sleep(self.options.interval) => false,
        }
    }
}
