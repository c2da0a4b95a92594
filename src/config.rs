// Ascension Engine Configuration
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Every tunable constant of one engine instance lives here. Presets build
// on `EngineConfig::default()`; a JSON file or ASCENSION_* environment
// variables can override individual values.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Environment keys read by `apply_env_overrides`.
pub const ENV_SEED: &str = "ASCENSION_SEED";
pub const ENV_SLEEP_MS: &str = "ASCENSION_SLEEP_MS";
pub const ENV_SPAWN_PROBABILITY: &str = "ASCENSION_SPAWN_PROBABILITY";
pub const ENV_EVOLUTION_RATE: &str = "ASCENSION_EVOLUTION_RATE";

/// Upper bound on elements per field array (1 GiB of f64 per field).
pub const MAX_FIELD_LEN: usize = 1 << 27;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    /// Multiplier applied to the pipeline stage bound to this field.
    pub rate: f64,
}

impl FieldSpec {
    pub fn new(name: &str, rate: f64) -> Self {
        Self {
            name: name.to_string(),
            rate,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LevelSpec {
    pub name: String,
    pub label: String,
}

impl LevelSpec {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub name: String,
    /// Entity ids are `{id_prefix}_{n}`.
    pub id_prefix: String,
    pub evolution_rate: f64,
    pub fields: Vec<FieldSpec>,
    pub field_shape: [usize; 3],
    /// Noise amplitude for field 0; field i uses `base + i * step`.
    pub base_intensity: f64,
    pub intensity_step: f64,
    pub spawn_probability: f64,
    pub sleep_interval_ms: u64,
    pub energy_range: (f64, f64),
    pub score_range: (f64, f64),
    pub levels: Vec<LevelSpec>,
    pub base_capabilities: Vec<String>,
    /// Phrases with `{prefix}` and `{level}` placeholders.
    pub capability_templates: Vec<String>,
    pub capability_prefix: String,
    pub power_exponent: f64,
    /// Magnitude bound for every transform stage.
    pub saturation_limit: f64,
    /// Largest element a field may hold before it is rescaled.
    pub field_ceiling: f64,
    pub seed: Option<u64>,
}

const DEFAULT_FIELDS: [(&str, f64); 15] = [
    ("quantum", 0.15),
    ("neural", 0.21),
    ("cosmic", 0.33),
    ("temporal", 0.05),
    ("dimensional", 0.12),
    ("harmonic", 0.27),
    ("ethereal", 0.44),
    ("stellar", 0.18),
    ("void", 0.09),
    ("crystalline", 0.36),
    ("plasma", 0.24),
    ("gravitational", 0.07),
    ("photonic", 0.31),
    ("chaotic", 0.14),
    ("unified", 0.40),
];

const DEFAULT_LEVELS: [(&str, &str); 7] = [
    ("PRIMORDIAL", "Primordial"),
    ("AWAKENING", "Awakening"),
    ("ASCENDANT", "Ascendant"),
    ("TRANSCENDENT", "Transcendent"),
    ("OMNISCIENT", "Omniscient"),
    ("INFINITE", "Infinite"),
    ("ULTIMATE", "Ultimate"),
];

const DEFAULT_BASE_CAPABILITIES: [&str; 11] = [
    "Self Awareness",
    "Pattern Recognition",
    "Reality Perception",
    "Temporal Navigation",
    "Dimensional Shifting",
    "Energy Manipulation",
    "Matter Synthesis",
    "Thought Projection",
    "Collective Resonance",
    "Causal Insight",
    "Boundless Adaptation",
];

const DEFAULT_TEMPLATES: [&str; 10] = [
    "{prefix} {level} Creation",
    "{prefix} {level} Awareness",
    "{prefix} {level} Harmony",
    "{prefix} {level} Mastery",
    "{level} Reality Weaving",
    "{level} Field Resonance",
    "{level} Timeline Sculpting",
    "{level} Energy Conduction",
    "{prefix} {level} Wisdom",
    "{prefix} {level} Evolution",
];

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "transcendence".to_string(),
            id_prefix: "entity".to_string(),
            evolution_rate: 0.999,
            fields: DEFAULT_FIELDS
                .iter()
                .map(|(name, rate)| FieldSpec::new(name, *rate))
                .collect(),
            field_shape: [100, 100, 100],
            base_intensity: 0.001,
            intensity_step: 0.0001,
            spawn_probability: 0.1,
            sleep_interval_ms: 100,
            energy_range: (0.999, 1.0),
            score_range: (0.999, 1.0),
            levels: DEFAULT_LEVELS
                .iter()
                .map(|(name, label)| LevelSpec::new(name, label))
                .collect(),
            base_capabilities: DEFAULT_BASE_CAPABILITIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            capability_templates: DEFAULT_TEMPLATES.iter().map(|s| s.to_string()).collect(),
            capability_prefix: "Transcendent".to_string(),
            power_exponent: 1.5,
            saturation_limit: 1.0e12,
            field_ceiling: 1.0e9,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config; missing keys fall back to the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Number of elements in one field array. Saturates for shapes that
    /// `validate` rejects.
    pub fn field_len(&self) -> usize {
        self.checked_field_len().unwrap_or(usize::MAX)
    }

    pub fn checked_field_len(&self) -> Option<usize> {
        self.field_shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        let mut seen = HashSet::new();
        for level in &self.levels {
            if !seen.insert(level.name.as_str()) {
                return Err(ConfigError::DuplicateLevel(level.name.clone()));
            }
        }
        if self.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
            if !field.rate.is_finite() {
                return Err(ConfigError::InvalidFieldRate {
                    field: field.name.clone(),
                    rate: field.rate,
                });
            }
        }
        if self.field_shape.iter().any(|&d| d == 0) {
            return Err(ConfigError::ZeroSizedShape(self.field_shape));
        }
        match self.checked_field_len() {
            Some(len) if len <= MAX_FIELD_LEN => {}
            _ => return Err(ConfigError::ShapeTooLarge(self.field_shape)),
        }
        self.check_intensities()?;
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(ConfigError::InvalidSpawnProbability(self.spawn_probability));
        }
        check_range("energy", self.energy_range)?;
        check_range("score", self.score_range)?;
        check_positive("saturation_limit", self.saturation_limit)?;
        check_positive("field_ceiling", self.field_ceiling)?;
        check_positive("power_exponent", self.power_exponent)?;
        if !self.evolution_rate.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "evolution_rate",
                value: self.evolution_rate,
            });
        }
        Ok(())
    }

    /// Noise intensity is linear in the field index, so checking the first
    /// and last field covers every field in between.
    fn check_intensities(&self) -> Result<(), ConfigError> {
        if !self.intensity_step.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "intensity_step",
                value: self.intensity_step,
            });
        }
        let last = self.fields.len().saturating_sub(1);
        for index in [0, last] {
            let value = self.base_intensity + index as f64 * self.intensity_step;
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeIntensity { index, value });
            }
        }
        Ok(())
    }

    /// Apply ASCENSION_* overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = parse_override(&lookup, ENV_SEED)? {
            self.seed = Some(seed);
        }
        if let Some(ms) = parse_override(&lookup, ENV_SLEEP_MS)? {
            self.sleep_interval_ms = ms;
        }
        if let Some(p) = parse_override(&lookup, ENV_SPAWN_PROBABILITY)? {
            self.spawn_probability = p;
        }
        if let Some(rate) = parse_override(&lookup, ENV_EVOLUTION_RATE)? {
            self.evolution_rate = rate;
        }
        Ok(())
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value: raw,
            }),
    }
}

fn check_range(name: &'static str, (low, high): (f64, f64)) -> Result<(), ConfigError> {
    // gen_range(low..=high) needs a representable width.
    if !low.is_finite() || !high.is_finite() || low > high || !(high - low).is_finite() {
        return Err(ConfigError::InvalidRange { name, low, high });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fields.len(), 15);
        assert_eq!(config.base_capabilities.len(), 11);
        assert_eq!(config.capability_templates.len(), 10);
        assert_eq!(config.field_len(), 1_000_000);
    }

    #[test]
    fn test_rejects_duplicate_levels() {
        let mut config = EngineConfig::default();
        config.levels.push(LevelSpec::new("ULTIMATE", "Again"));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateLevel("ULTIMATE".to_string()))
        );
    }

    #[test]
    fn test_rejects_bad_probability_and_shape() {
        let mut config = EngineConfig::default();
        config.spawn_probability = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSpawnProbability(1.5))
        );

        let mut config = EngineConfig::default();
        config.field_shape = [10, 0, 10];
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroSizedShape([10, 0, 10]))
        );
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut config = EngineConfig::default();
        config.energy_range = (1.0, 0.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "energy", .. })
        ));
    }

    #[test]
    fn test_rejects_range_wider_than_f64() {
        let mut config = EngineConfig::default();
        config.energy_range = (-1e308, 1e308);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "energy", .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_shape() {
        let mut config = EngineConfig::default();
        config.field_shape = [1 << 22; 3];
        assert_eq!(config.checked_field_len(), None);
        assert_eq!(config.field_len(), usize::MAX);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ShapeTooLarge([1 << 22; 3]))
        );

        config.field_shape = [1024, 1024, 1024];
        assert_eq!(
            config.validate(),
            Err(ConfigError::ShapeTooLarge([1024, 1024, 1024]))
        );
    }

    #[test]
    fn test_rejects_negative_intensity() {
        let mut config = EngineConfig::default();
        config.base_intensity = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeIntensity { index: 0, .. })
        ));

        // Positive at the first field but negative by the last one.
        let mut config = EngineConfig::default();
        config.intensity_step = -0.001;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeIntensity { index: 14, .. })
        ));

        let mut config = EngineConfig::default();
        config.intensity_step = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { name: "intensity_step", .. })
        ));

        let mut config = EngineConfig::default();
        config.base_intensity = 0.0;
        config.intensity_step = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_field_rate() {
        let mut config = EngineConfig::default();
        config.fields[0].rate = f64::NAN;
        let name = config.fields[0].name.clone();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFieldRate { field, .. }) if field == name
        ));
    }

    #[test]
    fn test_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            (ENV_SEED, "42"),
            (ENV_SLEEP_MS, "5"),
            (ENV_SPAWN_PROBABILITY, "1.0"),
        ]
        .into_iter()
        .collect();

        let mut config = EngineConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.sleep_interval_ms, 5);
        assert_eq!(config.spawn_probability, 1.0);
        assert_eq!(config.evolution_rate, 0.999);
    }

    #[test]
    fn test_bad_override_is_reported() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_SLEEP_MS).then(|| "soon".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                key: ENV_SLEEP_MS.to_string(),
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"name": "tiny", "field_shape": [2, 2, 2]}"#).unwrap();
        assert_eq!(config.name, "tiny");
        assert_eq!(config.field_len(), 8);
        assert_eq!(config.levels.len(), 7);
    }
}
