// Ascension Engine Library
// Copyright (c) 2026 Xing_The_Creator | SYNOID

pub mod config;
pub mod engine;
pub mod error;
pub mod presets;
pub mod server;
pub mod state;

pub use config::EngineConfig;
pub use engine::{EngineState, EngineStats, EvolutionEngine};
pub use error::{ConfigError, EngineError};
