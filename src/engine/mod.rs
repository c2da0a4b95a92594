// Ascension Engine Module
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// One configurable evolution engine: levels, entities, fields, the
// transform pipeline and the background loop that ties them together.

pub mod entity;
pub mod field;
pub mod level;
pub mod runner;
pub mod shared;
pub mod transform;

pub use self::shared::IterationOutcome;

use self::entity::Entity;
use self::field::{FieldSnapshot, FieldSummary};
use self::level::{Level, LevelCatalog};
use self::runner::LoopHandle;
use self::shared::EngineCore;
use crate::config::EngineConfig;
use crate::error::EngineError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineState {
    Inactive,
    Active,
}

/// Read-only snapshot of configuration and counters. Field arrays are
/// deliberately left out; use `field_summaries` for those.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub name: String,
    pub evolution_rate: f64,
    pub field_rates: BTreeMap<String, f64>,
    pub spawn_probability: f64,
    pub sleep_interval_ms: u64,
    pub field_shape: [usize; 3],
    pub field_count: usize,
    pub level_count: usize,
    pub entities_created: usize,
    pub active: bool,
    pub state: EngineState,
    pub iterations: u64,
    pub errors: u64,
}

pub struct EvolutionEngine {
    core: Arc<EngineCore>,
    /// The live loop is last; earlier entries are loops still winding down
    /// after `request_stop`, kept so `stop_evolution` can join them.
    runners: Mutex<Vec<LoopHandle>>,
}

impl EvolutionEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let core = EngineCore::new(config)?;
        info!(
            "[ENGINE] Initialized '{}' ({} fields of {:?}, {} levels)",
            core.config.name,
            core.config.fields.len(),
            core.config.field_shape,
            core.levels.len()
        );
        Ok(Self {
            core: Arc::new(core),
            runners: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.core.config
    }

    pub fn levels(&self) -> &LevelCatalog {
        &self.core.levels
    }

    /// Spawn an entity at `level`, register it and perturb every field.
    pub fn create_entity(&self, level: &Level) -> Entity {
        self.core.create_entity(level)
    }

    pub fn create_entity_named(&self, level_name: &str) -> Result<Entity, EngineError> {
        self.core.create_entity_named(level_name)
    }

    pub fn update_fields(&self, entity: &Entity) {
        self.core.update_fields(entity)
    }

    /// Pure: returns the transformed array and `mean(output) * evolution_rate`.
    pub fn evolve_consciousness(&self, input: &[f64]) -> Result<(Vec<f64>, f64), EngineError> {
        self.core.evolve_consciousness(input)
    }

    /// Run one loop tick on the calling thread.
    pub fn run_iteration(&self) -> Result<IterationOutcome, EngineError> {
        self.core.run_iteration()
    }

    /// Launch the background loop and return immediately. Must be called
    /// from within a tokio runtime.
    pub fn start_evolution(&self) -> Result<(), EngineError> {
        let mut runners = self.runners.lock().unwrap_or_else(PoisonError::into_inner);
        runners.retain(|handle| !handle.is_finished());
        if self.core.is_active() && !runners.is_empty() {
            info!("[ENGINE] Evolution already running.");
            return Err(EngineError::AlreadyRunning);
        }

        for handle in runners.iter() {
            handle.signal();
        }
        self.core.active.store(true, Ordering::SeqCst);
        runners.push(LoopHandle::spawn(self.core.clone()));
        info!("[ENGINE] Evolution started for '{}'", self.core.config.name);
        Ok(())
    }

    /// Ask the loop to stop without waiting for it.
    pub fn request_stop(&self) {
        self.core.active.store(false, Ordering::SeqCst);
        for handle in self
            .runners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            handle.signal();
        }
    }

    /// Stop the loop, and any loop still winding down, and wait until all
    /// of them have exited.
    pub async fn stop_evolution(&self) {
        self.core.active.store(false, Ordering::SeqCst);
        let handles = std::mem::take(
            &mut *self.runners.lock().unwrap_or_else(PoisonError::into_inner),
        );
        if handles.is_empty() {
            return;
        }
        for handle in handles {
            handle.shutdown().await;
        }
        info!("[ENGINE] Evolution stopped for '{}'", self.core.config.name);
    }

    pub fn state(&self) -> EngineState {
        if self.core.is_active() {
            EngineState::Active
        } else {
            EngineState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.core.is_active()
    }

    pub fn get_stats(&self) -> EngineStats {
        let config = &self.core.config;
        EngineStats {
            name: config.name.clone(),
            evolution_rate: config.evolution_rate,
            field_rates: config
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.rate))
                .collect(),
            spawn_probability: config.spawn_probability,
            sleep_interval_ms: config.sleep_interval_ms,
            field_shape: config.field_shape,
            field_count: config.fields.len(),
            level_count: self.core.levels.len(),
            entities_created: self.core.entity_count(),
            active: self.core.is_active(),
            state: self.state(),
            iterations: self.core.iterations(),
            errors: self.core.errors(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.core.entity_count()
    }

    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.core.entity(id)
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.core.entities()
    }

    pub fn recent_entities(&self, limit: usize) -> Vec<Entity> {
        self.core.recent_entities(limit)
    }

    pub fn field_summaries(&self) -> Vec<FieldSummary> {
        self.core.field_summaries()
    }

    pub fn field_snapshot(&self) -> FieldSnapshot {
        self.core.field_snapshot()
    }
}
