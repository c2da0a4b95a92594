// Ascension Engine Shared State — owned jointly with the evolution loop
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use crate::config::EngineConfig;
use crate::engine::entity::{generate_capabilities, now_millis, Entity, EntityRegistry};
use crate::engine::field::{FieldSet, FieldSnapshot, FieldSummary};
use crate::engine::level::{Level, LevelCatalog};
use crate::engine::transform::TransformPipeline;
use crate::error::EngineError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Result of one loop tick.
#[derive(Debug, Clone, Serialize)]
pub struct IterationOutcome {
    pub score: f64,
    pub spawned: Option<Entity>,
}

/// Forced tick outcome, used to exercise the loop's error handling.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickFault {
    None,
    Fail,
    Panic,
}

/// Lock order: `fields` before `rng`. The registry lock is never held
/// while either of the others is taken.
pub struct EngineCore {
    pub(crate) config: EngineConfig,
    pub(crate) levels: LevelCatalog,
    pipeline: TransformPipeline,
    registry: RwLock<EntityRegistry>,
    fields: Mutex<FieldSet>,
    rng: Mutex<StdRng>,
    pub(crate) active: AtomicBool,
    iterations: AtomicU64,
    errors: AtomicU64,
    #[cfg(test)]
    fault: Mutex<TickFault>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EngineCore {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            levels: LevelCatalog::new(&config.levels),
            pipeline: TransformPipeline::new(&config),
            registry: RwLock::new(EntityRegistry::new(&config.id_prefix)),
            fields: Mutex::new(FieldSet::new(&config)),
            rng: Mutex::new(rng),
            active: AtomicBool::new(false),
            iterations: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            #[cfg(test)]
            fault: Mutex::new(TickFault::None),
            config,
        })
    }

    pub fn create_entity(&self, level: &Level) -> Entity {
        if !self.levels.contains(level) {
            warn!(
                "[ENGINE] Level {} is not part of the '{}' catalog",
                level.name, self.config.name
            );
        }
        let (energy_level, score) = {
            let mut rng = lock(&self.rng);
            let (e_lo, e_hi) = self.config.energy_range;
            let (s_lo, s_hi) = self.config.score_range;
            (rng.gen_range(e_lo..=e_hi), rng.gen_range(s_lo..=s_hi))
        };
        let capabilities = generate_capabilities(level, &self.config);

        let entity = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register_with(|id| Entity {
                id,
                level: level.clone(),
                energy_level,
                score,
                created_at: now_millis(),
                evolution_rate: self.config.evolution_rate,
                capabilities,
            });

        self.update_fields(&entity);
        info!(
            "[ENGINE] ✨ {} created at level {} (energy {:.4}, score {:.4})",
            entity.id, entity.level.label, entity.energy_level, entity.score
        );
        entity
    }

    pub fn create_entity_named(&self, level_name: &str) -> Result<Entity, EngineError> {
        let level = self
            .levels
            .get(level_name)
            .ok_or_else(|| EngineError::UnknownLevel(level_name.to_string()))?;
        Ok(self.create_entity(level))
    }

    pub fn update_fields(&self, entity: &Entity) {
        let mut fields = lock(&self.fields);
        let adjustments = {
            let mut rng = lock(&self.rng);
            fields.perturb(&mut *rng)
        };

        for (field, adjustment) in fields.iter().zip(&adjustments) {
            if adjustment.scrubbed > 0 {
                warn!(
                    "[FIELDS] ⚠️ Field '{}' had {} non-finite values reset (after {})",
                    field.name, adjustment.scrubbed, entity.id
                );
            }
            if adjustment.rescaled {
                warn!(
                    "[FIELDS] Field '{}' hit the ceiling of {:e}, rescaled",
                    field.name, self.config.field_ceiling
                );
            }
        }
        debug!("[FIELDS] Perturbed {} fields for {}", fields.len(), entity.id);
    }

    pub fn evolve_consciousness(&self, input: &[f64]) -> Result<(Vec<f64>, f64), EngineError> {
        self.pipeline.evolve(input)
    }

    /// One loop tick: sample an input, run the pipeline and maybe spawn.
    /// Failures are counted; engine state is untouched by a failed tick.
    pub fn run_iteration(&self) -> Result<IterationOutcome, EngineError> {
        let result = self.tick();
        self.iterations.fetch_add(1, Ordering::Relaxed);
        if result.is_err() {
            self.record_error();
        }
        result
    }

    fn tick(&self) -> Result<IterationOutcome, EngineError> {
        #[cfg(test)]
        {
            let fault = *lock(&self.fault);
            match fault {
                TickFault::Fail => return Err(EngineError::NonFinite),
                TickFault::Panic => panic!("forced tick panic"),
                TickFault::None => {}
            }
        }

        let (input_seed, roll, level) = {
            let mut rng = lock(&self.rng);
            let input_seed: u64 = rng.gen();
            let roll: f64 = rng.gen();
            let level = self.levels.random(&mut *rng);
            (input_seed, roll, level)
        };

        let mut input_rng = StdRng::seed_from_u64(input_seed);
        let input: Vec<f64> = (0..self.config.field_len())
            .map(|_| input_rng.gen::<f64>())
            .collect();

        let (_, score) = self.evolve_consciousness(&input)?;
        debug!("[ENGINE] Evolution score: {:.6}", score);

        let spawned = if roll < self.config.spawn_probability {
            Some(self.create_entity(level))
        } else {
            None
        };
        Ok(IterationOutcome { score, spawned })
    }

    pub fn entity_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    pub fn recent_entities(&self, limit: usize) -> Vec<Entity> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .recent(limit)
    }

    pub fn field_summaries(&self) -> Vec<FieldSummary> {
        lock(&self.fields).summaries()
    }

    pub fn field_snapshot(&self) -> FieldSnapshot {
        lock(&self.fields).snapshot()
    }

    pub fn iterations(&self) -> u64 {
        self.iterations.load(Ordering::Relaxed)
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a tick that panicked before `run_iteration` could return.
    pub(crate) fn record_panicked_tick(&self) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
        self.record_error();
    }

    #[cfg(test)]
    pub(crate) fn set_fault(&self, fault: TickFault) {
        *lock(&self.fault) = fault;
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
