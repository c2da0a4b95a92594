// Ascension Entities & Capability Generation
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use crate::config::EngineConfig;
use crate::engine::level::Level;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// A spawned unit. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: String,
    pub level: Level,
    pub energy_level: f64,
    pub score: f64,
    /// Unix timestamp in milliseconds.
    pub created_at: u64,
    /// Engine rate at the moment of creation.
    pub evolution_rate: f64,
    pub capabilities: Vec<String>,
}

/// Base capabilities followed by every template rendered for `level`.
/// Pure: the same level always yields the same list.
pub fn generate_capabilities(level: &Level, config: &EngineConfig) -> Vec<String> {
    let mut capabilities = Vec::with_capacity(
        config.base_capabilities.len() + config.capability_templates.len(),
    );
    capabilities.extend(config.base_capabilities.iter().cloned());
    capabilities.extend(config.capability_templates.iter().map(|template| {
        template
            .replace("{prefix}", &config.capability_prefix)
            .replace("{level}", &level.label)
    }));
    capabilities
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Append-only entity store. Id assignment and append happen in one call,
/// so a caller holding the registry lock can never hand out a duplicate id.
#[derive(Debug)]
pub struct EntityRegistry {
    prefix: String,
    counter: u64,
    entities: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: 0,
            entities: Vec::new(),
        }
    }

    /// Assign the next id, build the entity with it and append it.
    pub fn register_with<F>(&mut self, build: F) -> Entity
    where
        F: FnOnce(String) -> Entity,
    {
        self.counter += 1;
        let entity = build(format!("{}_{}", self.prefix, self.counter));
        self.entities.push(entity.clone());
        entity
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// The last `limit` entities, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<Entity> {
        let start = self.entities.len().saturating_sub(limit);
        self.entities[start..].to_vec()
    }

    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn level(label: &str) -> Level {
        Level {
            index: 0,
            name: label.to_uppercase(),
            label: label.to_string(),
        }
    }

    fn entity_with(id: String) -> Entity {
        Entity {
            id,
            level: level("Primordial"),
            energy_level: 1.0,
            score: 1.0,
            created_at: now_millis(),
            evolution_rate: 0.999,
            capabilities: Vec::new(),
        }
    }

    #[test]
    fn test_capabilities_are_deterministic() {
        let config = EngineConfig::default();
        let lvl = level("Ascendant");
        let first = generate_capabilities(&lvl, &config);
        let second = generate_capabilities(&lvl, &config);
        assert_eq!(first, second);
        assert_eq!(first.len(), 21);
    }

    #[test]
    fn test_templates_interpolate_level_label() {
        let config = EngineConfig::default();
        let caps = generate_capabilities(&level("Ultimate"), &config);
        assert!(caps.contains(&"Transcendent Ultimate Creation".to_string()));
        assert!(caps.contains(&"Ultimate Reality Weaving".to_string()));
        assert!(caps.iter().all(|c| !c.contains('{')));
        // Base capabilities come first and do not depend on the level.
        let other = generate_capabilities(&level("Primordial"), &config);
        assert_eq!(caps[..11], other[..11]);
        assert_ne!(caps[11..], other[11..]);
    }

    #[test]
    fn test_registry_ids_are_sequential_and_unique() {
        let mut registry = EntityRegistry::new("test");
        let ids: Vec<String> = (0..100)
            .map(|_| registry.register_with(entity_with).id)
            .collect();
        assert_eq!(ids[0], "test_1");
        assert_eq!(ids[99], "test_100");
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 100);
        assert_eq!(registry.len(), 100);
        assert!(registry.get("test_42").is_some());
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut registry = EntityRegistry::new("r");
        for _ in 0..5 {
            registry.register_with(entity_with);
        }
        let tail: Vec<_> = registry.recent(2).into_iter().map(|e| e.id).collect();
        assert_eq!(tail, vec!["r_4", "r_5"]);
        assert_eq!(registry.recent(50).len(), 5);
    }
}
