// Ascension Level Catalog
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use crate::config::LevelSpec;
use rand::Rng;
use serde::Serialize;

/// One ordinal tier. Only its position in the catalog carries meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Level {
    pub index: usize,
    pub name: String,
    pub label: String,
}

/// Levels in declaration order, fixed once the engine is built.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn new(specs: &[LevelSpec]) -> Self {
        let levels = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| Level {
                index,
                name: spec.name.clone(),
                label: spec.label.clone(),
            })
            .collect();
        Self { levels }
    }

    pub fn get(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.name == name)
    }

    pub fn by_index(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Uniformly chosen level. The catalog is never empty after validation.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> &Level {
        &self.levels[rng.gen_range(0..self.levels.len())]
    }

    pub fn contains(&self, level: &Level) -> bool {
        self.levels.get(level.index) == Some(level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn first(&self) -> Option<&Level> {
        self.levels.first()
    }

    pub fn last(&self) -> Option<&Level> {
        self.levels.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> LevelCatalog {
        LevelCatalog::new(&[
            LevelSpec::new("LOW", "Low"),
            LevelSpec::new("MID", "Middle"),
            LevelSpec::new("HIGH", "High"),
        ])
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let catalog = catalog();
        let names: Vec<_> = catalog.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["LOW", "MID", "HIGH"]);
        assert_eq!(catalog.get("MID").map(|l| l.index), Some(1));
        assert_eq!(catalog.last().map(|l| l.label.as_str()), Some("High"));
    }

    #[test]
    fn test_contains_rejects_foreign_level() {
        let catalog = catalog();
        let foreign = Level {
            index: 1,
            name: "OTHER".to_string(),
            label: "Other".to_string(),
        };
        assert!(!catalog.contains(&foreign));
        assert!(catalog.contains(catalog.by_index(2).unwrap()));
    }

    #[test]
    fn test_random_stays_in_catalog() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let level = catalog.random(&mut rng);
            assert!(catalog.contains(level));
        }
    }
}
