use crate::engine::field::FieldSummary;
use crate::engine::level::Level;
use crate::engine::{EngineStats, EvolutionEngine};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Shared between API handlers. Handlers only read from the engine.
pub struct DashboardState {
    pub engine: Arc<EvolutionEngine>,
    pub started_at: Instant,
}

impl DashboardState {
    pub fn new(engine: Arc<EvolutionEngine>) -> Self {
        Self {
            engine,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: EngineStats,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct FieldsResponse {
    pub shape: [usize; 3],
    pub fields: Vec<FieldSummary>,
}

#[derive(Serialize)]
pub struct LevelsResponse {
    pub levels: Vec<Level>,
}
