// Ascension Fields — additive noise arrays
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Every entity creation adds uniform noise to every field. Fields never
// reset; a ceiling rescale and a NaN/inf scrub keep them finite.

use crate::config::EngineConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldShape {
    pub dims: [usize; 3],
}

impl FieldShape {
    pub fn new(dims: [usize; 3]) -> Self {
        Self { dims }
    }

    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub rate: f64,
    pub data: Vec<f64>,
}

impl Field {
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    pub fn summary(&self) -> FieldSummary {
        let (min, max) = self
            .data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        FieldSummary {
            name: self.name.clone(),
            rate: self.rate,
            mean: self.mean(),
            min,
            max,
        }
    }

    /// Add `uniform[0, 1) * intensity` to every element, then enforce the
    /// ceiling.
    fn perturb(&mut self, seed: u64, intensity: f64, ceiling: f64) -> FieldAdjustment {
        let mut rng = StdRng::seed_from_u64(seed);
        for value in self.data.iter_mut() {
            *value += rng.gen::<f64>() * intensity;
        }

        let mut adjustment = FieldAdjustment::default();
        let mut max = f64::NEG_INFINITY;
        for value in self.data.iter_mut() {
            if !value.is_finite() {
                *value = 0.0;
                adjustment.scrubbed += 1;
            } else if *value > max {
                max = *value;
            }
        }

        if max > ceiling {
            let scale = ceiling / max;
            for value in self.data.iter_mut() {
                *value *= scale;
            }
            adjustment.rescaled = true;
        }
        adjustment
    }
}

/// Cheap read-only view of one field for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub rate: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Deep copy of every field, for renderers that need the raw arrays.
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    pub shape: FieldShape,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldAdjustment {
    pub rescaled: bool,
    /// Non-finite elements reset to zero.
    pub scrubbed: usize,
}

#[derive(Debug)]
pub struct FieldSet {
    shape: FieldShape,
    base_intensity: f64,
    intensity_step: f64,
    ceiling: f64,
    fields: Vec<Field>,
}

impl FieldSet {
    pub fn new(config: &EngineConfig) -> Self {
        let shape = FieldShape::new(config.field_shape);
        let fields = config
            .fields
            .iter()
            .map(|spec| Field {
                name: spec.name.clone(),
                rate: spec.rate,
                data: vec![0.0; shape.len()],
            })
            .collect();
        Self {
            shape,
            base_intensity: config.base_intensity,
            intensity_step: config.intensity_step,
            ceiling: config.field_ceiling,
            fields,
        }
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Noise amplitude for the field at `index`.
    pub fn intensity(&self, index: usize) -> f64 {
        self.base_intensity + index as f64 * self.intensity_step
    }

    /// Perturb all fields in parallel. Per-field seeds are drawn from `rng`
    /// up front so a seeded engine stays reproducible.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<FieldAdjustment> {
        let seeds: Vec<u64> = (0..self.fields.len()).map(|_| rng.gen()).collect();
        let base = self.base_intensity;
        let step = self.intensity_step;
        let ceiling = self.ceiling;

        self.fields
            .par_iter_mut()
            .zip(seeds.into_par_iter())
            .enumerate()
            .map(|(index, (field, seed))| {
                field.perturb(seed, base + index as f64 * step, ceiling)
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<FieldSummary> {
        self.fields.iter().map(Field::summary).collect()
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            shape: self.shape,
            fields: self.fields.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self, index: usize) -> &mut Field {
        &mut self.fields[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> EngineConfig {
        EngineConfig {
            field_shape: [4, 4, 4],
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_fields_start_at_zero_with_shared_shape() {
        let set = FieldSet::new(&small_config());
        assert_eq!(set.len(), 15);
        assert!(set.iter().all(|f| f.data.len() == 64));
        assert!(set.iter().all(|f| f.mean() == 0.0));
    }

    #[test]
    fn test_intensity_grows_with_index() {
        let set = FieldSet::new(&small_config());
        assert!((set.intensity(0) - 0.001).abs() < 1e-12);
        assert!((set.intensity(10) - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_perturb_never_decreases_mean() {
        let mut set = FieldSet::new(&small_config());
        let mut rng = StdRng::seed_from_u64(1);
        let mut previous: Vec<f64> = set.iter().map(Field::mean).collect();
        for _ in 0..10 {
            set.perturb(&mut rng);
            let current: Vec<f64> = set.iter().map(Field::mean).collect();
            for (before, after) in previous.iter().zip(&current) {
                assert!(after >= before);
            }
            previous = current;
        }
        assert!(previous.iter().all(|&m| m > 0.0));
    }

    #[test]
    fn test_perturb_is_reproducible_with_seed() {
        let mut a = FieldSet::new(&small_config());
        let mut b = FieldSet::new(&small_config());
        a.perturb(&mut StdRng::seed_from_u64(99));
        b.perturb(&mut StdRng::seed_from_u64(99));
        for (fa, fb) in a.iter().zip(b.iter()) {
            assert_eq!(fa.data, fb.data);
        }
    }

    #[test]
    fn test_ceiling_rescales_field() {
        let config = EngineConfig {
            field_ceiling: 10.0,
            ..small_config()
        };
        let mut set = FieldSet::new(&config);
        set.field_mut(0).data.iter_mut().for_each(|v| *v = 50.0);
        let adjustments = set.perturb(&mut StdRng::seed_from_u64(3));
        assert!(adjustments[0].rescaled);
        assert!(!adjustments[1].rescaled);
        let summary = set.iter().next().unwrap().summary();
        assert!(summary.max <= 10.0 + 1e-9);
    }

    #[test]
    fn test_non_finite_values_are_scrubbed() {
        let mut set = FieldSet::new(&small_config());
        set.field_mut(2).data[0] = f64::NAN;
        set.field_mut(2).data[1] = f64::INFINITY;
        let adjustments = set.perturb(&mut StdRng::seed_from_u64(5));
        assert_eq!(adjustments[2].scrubbed, 2);
        assert!(set.iter().all(|f| f.data.iter().all(|v| v.is_finite())));
    }
}
