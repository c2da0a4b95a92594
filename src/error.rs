// Ascension Engine Errors
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use thiserror::Error;

/// Rejected engine configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("at least one level must be declared")]
    NoLevels,
    #[error("level name '{0}' is declared more than once")]
    DuplicateLevel(String),
    #[error("at least one field must be declared")]
    NoFields,
    #[error("field name '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("field shape {0:?} has a zero-sized dimension")]
    ZeroSizedShape([usize; 3]),
    #[error("field shape {0:?} holds more elements than one field may allocate")]
    ShapeTooLarge([usize; 3]),
    #[error("spawn probability {0} must be between 0.0 and 1.0")]
    InvalidSpawnProbability(f64),
    #[error("{name} range ({low}, {high}) must be finite with low <= high and a finite width")]
    InvalidRange {
        name: &'static str,
        low: f64,
        high: f64,
    },
    #[error("{name} must be a finite positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("noise intensity {value} of field #{index} must be finite and non-negative")]
    NegativeIntensity { index: usize, value: f64 },
    #[error("field '{field}' has a non-finite rate {rate}")]
    InvalidFieldRate { field: String, rate: f64 },
    #[error("environment variable {key}='{value}' could not be parsed")]
    InvalidEnv { key: String, value: String },
    #[error("failed to read config file: {0}")]
    Io(String),
    #[error("failed to parse config file: {0}")]
    Parse(String),
}

/// Failures raised by engine operations and evolution ticks.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("unknown level '{0}'")]
    UnknownLevel(String),
    #[error("input has {actual} elements but the field shape holds {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("transform produced a non-finite score")]
    NonFinite,
    #[error("evolution loop is already running")]
    AlreadyRunning,
    #[error("evolution task failed: {0}")]
    Task(String),
}
