// Ascension Transform Pipeline
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Twelve elementwise nonlinear stages, each of the form
// `out += f(clip(out * rate))`. Inputs are clipped into each function's
// safe domain and the running value is clamped to ±saturation_limit, so
// exp/power blow-ups and log1p domain errors cannot occur.

use crate::config::EngineConfig;
use crate::error::EngineError;
use rayon::prelude::*;
use serde::Serialize;

/// Smallest admissible `1 + x` for the log1p stage.
const LOG1P_FLOOR: f64 = 1.0e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StageKind {
    Sin,
    Cos,
    Tanh,
    Exp,
    Log1p,
    Square,
    Power,
}

/// Stage order of the pipeline.
pub const STAGE_SEQUENCE: [StageKind; 12] = [
    StageKind::Sin,
    StageKind::Cos,
    StageKind::Tanh,
    StageKind::Exp,
    StageKind::Log1p,
    StageKind::Square,
    StageKind::Power,
    StageKind::Sin,
    StageKind::Cos,
    StageKind::Tanh,
    StageKind::Exp,
    StageKind::Log1p,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stage {
    pub kind: StageKind,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct TransformPipeline {
    stages: Vec<Stage>,
    evolution_rate: f64,
    power_exponent: f64,
    limit: f64,
    expected_len: usize,
}

impl TransformPipeline {
    /// Stage `i` takes the rate of field `i % field_count`.
    pub fn new(config: &EngineConfig) -> Self {
        let stages = STAGE_SEQUENCE
            .iter()
            .enumerate()
            .map(|(i, &kind)| Stage {
                kind,
                rate: config.fields[i % config.fields.len()].rate,
            })
            .collect();
        Self {
            stages,
            evolution_rate: config.evolution_rate,
            power_exponent: config.power_exponent,
            limit: config.saturation_limit,
            expected_len: config.field_len(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run the pipeline over `input` and return the transformed array with
    /// `mean(output) * evolution_rate`.
    pub fn evolve(&self, input: &[f64]) -> Result<(Vec<f64>, f64), EngineError> {
        if input.len() != self.expected_len {
            return Err(EngineError::ShapeMismatch {
                expected: self.expected_len,
                actual: input.len(),
            });
        }

        let output: Vec<f64> = input
            .par_iter()
            .map(|&v| self.transform_element(v * self.evolution_rate))
            .collect();

        let mean = output.par_iter().sum::<f64>() / output.len() as f64;
        let score = mean * self.evolution_rate;
        if !score.is_finite() {
            return Err(EngineError::NonFinite);
        }
        Ok((output, score))
    }

    /// All twelve stages applied to one pre-scaled element.
    pub fn transform_element(&self, mut value: f64) -> f64 {
        for stage in &self.stages {
            let x = self.clip(stage.kind, value * stage.rate);
            value = (value + self.apply(stage.kind, x)).clamp(-self.limit, self.limit);
        }
        value
    }

    fn clip(&self, kind: StageKind, x: f64) -> f64 {
        let limit = self.limit;
        match kind {
            StageKind::Sin | StageKind::Cos | StageKind::Tanh => x.clamp(-limit, limit),
            StageKind::Exp => x.min(limit.ln()),
            StageKind::Log1p => x.clamp(LOG1P_FLOOR - 1.0, limit),
            StageKind::Square => {
                let bound = limit.sqrt();
                x.clamp(-bound, bound)
            }
            StageKind::Power => {
                let bound = limit.powf(1.0 / self.power_exponent);
                x.clamp(-bound, bound)
            }
        }
    }

    fn apply(&self, kind: StageKind, x: f64) -> f64 {
        match kind {
            StageKind::Sin => x.sin(),
            StageKind::Cos => x.cos(),
            StageKind::Tanh => x.tanh(),
            StageKind::Exp => x.exp(),
            StageKind::Log1p => x.ln_1p(),
            StageKind::Square => x * x,
            StageKind::Power => x.abs().powf(self.power_exponent).copysign(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig {
            field_shape: [3, 3, 3],
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_stage_rates_follow_fields() {
        let config = config();
        let pipeline = TransformPipeline::new(&config);
        assert_eq!(pipeline.stages().len(), 12);
        assert_eq!(pipeline.stages()[4].kind, StageKind::Log1p);
        assert_eq!(pipeline.stages()[6].rate, config.fields[6].rate);
    }

    #[test]
    fn test_rates_wrap_for_few_fields() {
        let mut config = config();
        config.fields.truncate(5);
        let pipeline = TransformPipeline::new(&config);
        assert_eq!(pipeline.stages()[7].rate, config.fields[2].rate);
    }

    #[test]
    fn test_zero_input_gives_uniform_baseline() {
        let pipeline = TransformPipeline::new(&config());
        let (output, score) = pipeline.evolve(&[0.0; 27]).unwrap();
        let baseline = pipeline.transform_element(0.0);
        assert!(output.iter().all(|&v| v == baseline));
        assert!((score - baseline * 0.999).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate_scores_zero() {
        let config = EngineConfig {
            evolution_rate: 0.0,
            ..config()
        };
        let pipeline = TransformPipeline::new(&config);
        let (_, score) = pipeline.evolve(&[0.5; 27]).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_huge_inputs_stay_finite() {
        let pipeline = TransformPipeline::new(&config());
        let mut input = vec![1.0e300; 27];
        input[0] = -1.0e300;
        input[1] = -5.0;
        let (output, score) = pipeline.evolve(&input).unwrap();
        assert!(output.iter().all(|v| v.is_finite() && v.abs() <= 1.0e12));
        assert!(score.is_finite());
    }

    #[test]
    fn test_log1p_domain_is_guarded() {
        let pipeline = TransformPipeline::new(&config());
        assert!(pipeline.clip(StageKind::Log1p, -50.0) > -1.0);
        assert!(pipeline.apply(StageKind::Log1p, pipeline.clip(StageKind::Log1p, -2.0)).is_finite());
    }

    #[test]
    fn test_power_keeps_sign() {
        let pipeline = TransformPipeline::new(&config());
        assert!((pipeline.apply(StageKind::Power, -4.0) + 8.0).abs() < 1e-12);
        assert!((pipeline.apply(StageKind::Power, 4.0) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let pipeline = TransformPipeline::new(&config());
        let err = pipeline.evolve(&[1.0; 8]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ShapeMismatch {
                expected: 27,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_nan_input_reports_non_finite() {
        let pipeline = TransformPipeline::new(&config());
        let mut input = vec![0.0; 27];
        input[3] = f64::NAN;
        assert!(matches!(pipeline.evolve(&input), Err(EngineError::NonFinite)));
    }
}
