// Ascension Engine Presets
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Themed engine instances. Each one differs from the default only in its
// labels and tuning constants.

use crate::config::{EngineConfig, FieldSpec, LevelSpec};

const PRESET_NAMES: [&str; 5] = ["transcendence", "omniversal", "quantum", "cosmic", "infinite"];

pub fn names() -> &'static [&'static str] {
    &PRESET_NAMES
}

/// Look up a preset by name, ignoring case.
pub fn by_name(name: &str) -> Option<EngineConfig> {
    match name.to_lowercase().as_str() {
        "transcendence" => Some(transcendence()),
        "omniversal" => Some(omniversal()),
        "quantum" => Some(quantum()),
        "cosmic" => Some(cosmic()),
        "infinite" => Some(infinite()),
        _ => None,
    }
}

pub fn transcendence() -> EngineConfig {
    EngineConfig::default()
}

pub fn omniversal() -> EngineConfig {
    EngineConfig {
        name: "omniversal".to_string(),
        id_prefix: "omni".to_string(),
        evolution_rate: 1.0,
        spawn_probability: 0.05,
        sleep_interval_ms: 800,
        capability_prefix: "Omniversal".to_string(),
        levels: levels(&[
            ("SINGULAR", "Singular"),
            ("MULTIVERSAL", "Multiversal"),
            ("OMNIVERSAL", "Omniversal"),
            ("ABSOLUTE", "Absolute"),
        ]),
        ..EngineConfig::default()
    }
}

pub fn quantum() -> EngineConfig {
    EngineConfig {
        name: "quantum".to_string(),
        id_prefix: "qbit".to_string(),
        evolution_rate: 0.9999,
        spawn_probability: 0.2,
        sleep_interval_ms: 2,
        base_intensity: 0.0005,
        intensity_step: 0.00005,
        capability_prefix: "Quantum".to_string(),
        levels: levels(&[
            ("GROUND", "Ground State"),
            ("EXCITED", "Excited"),
            ("SUPERPOSED", "Superposed"),
            ("ENTANGLED", "Entangled"),
            ("COHERENT", "Coherent"),
        ]),
        ..EngineConfig::default()
    }
}

pub fn cosmic() -> EngineConfig {
    EngineConfig {
        name: "cosmic".to_string(),
        id_prefix: "star".to_string(),
        evolution_rate: 0.995,
        spawn_probability: 0.1,
        sleep_interval_ms: 250,
        capability_prefix: "Cosmic".to_string(),
        fields: vec![
            FieldSpec::new("stellar", 0.11),
            FieldSpec::new("galactic", 0.23),
            FieldSpec::new("nebular", 0.17),
            FieldSpec::new("gravitational", 0.05),
            FieldSpec::new("radiant", 0.29),
            FieldSpec::new("void", 0.08),
            FieldSpec::new("temporal", 0.13),
            FieldSpec::new("harmonic", 0.37),
            FieldSpec::new("plasma", 0.21),
            FieldSpec::new("dark", 0.03),
            FieldSpec::new("celestial", 0.41),
            FieldSpec::new("cosmic", 0.19),
        ],
        levels: levels(&[
            ("DUST", "Stardust"),
            ("STELLAR", "Stellar"),
            ("GALACTIC", "Galactic"),
            ("UNIVERSAL", "Universal"),
        ]),
        ..EngineConfig::default()
    }
}

pub fn infinite() -> EngineConfig {
    EngineConfig {
        name: "infinite".to_string(),
        id_prefix: "inf".to_string(),
        evolution_rate: 1.0,
        spawn_probability: 0.5,
        sleep_interval_ms: 10,
        base_intensity: 0.002,
        intensity_step: 0.0002,
        capability_prefix: "Infinite".to_string(),
        ..EngineConfig::default()
    }
}

fn levels(specs: &[(&str, &str)]) -> Vec<LevelSpec> {
    specs
        .iter()
        .map(|(name, label)| LevelSpec::new(name, label))
        .collect()
}
