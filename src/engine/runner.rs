// Ascension Evolution Loop
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Background task that ticks the engine, sleeping between ticks. The sleep
// is raced against a shutdown channel, and stopping awaits the task, so a
// caller that awaited `stop` knows no further tick will run.

use crate::engine::shared::EngineCore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub struct LoopHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl LoopHandle {
    /// Spawn the loop on the current tokio runtime.
    pub fn spawn(core: Arc<EngineCore>) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(run_loop(core, rx));
        Self { shutdown, task }
    }

    /// Signal the loop without waiting for it.
    pub fn signal(&self) {
        let _ = self.shutdown.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop and wait until it has exited.
    pub async fn shutdown(self) {
        self.signal();
        if let Err(e) = self.task.await {
            error!("[LOOP] Evolution task ended abnormally: {}", e);
        }
    }
}

async fn run_loop(core: Arc<EngineCore>, mut shutdown: watch::Receiver<bool>) {
    let interval = Duration::from_millis(core.config.sleep_interval_ms);
    info!(
        "[LOOP] 🚀 Evolution loop started for '{}' (interval: {:?})",
        core.config.name, interval
    );

    loop {
        if *shutdown.borrow() {
            break;
        }

        let tick_core = core.clone();
        match tokio::task::spawn_blocking(move || tick_core.run_iteration()).await {
            Ok(Ok(outcome)) => {
                debug!(
                    "[LOOP] Tick #{} score {:.6}{}",
                    core.iterations(),
                    outcome.score,
                    if outcome.spawned.is_some() { " (spawned)" } else { "" }
                );
            }
            Ok(Err(e)) => error!("[LOOP] ❌ Evolution error: {}. Retrying next tick.", e),
            Err(e) => {
                core.record_panicked_tick();
                error!("[LOOP] ❌ Evolution tick panicked: {}. Retrying next tick.", e);
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = shutdown.changed() => {
                // Sender gone means the engine was dropped.
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!(
        "[LOOP] 🛑 Evolution loop for '{}' stopped after {} ticks",
        core.config.name,
        core.iterations()
    );
}
