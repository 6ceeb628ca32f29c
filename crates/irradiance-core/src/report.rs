use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::sensors::SensorId;

/// Stages that can change values, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GapFill,
    Clip,
    Stagnant,
    Abrupt,
    ZeroError,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::GapFill,
        Stage::Clip,
        Stage::Stagnant,
        Stage::Abrupt,
        Stage::ZeroError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::GapFill => "gap_fill",
            Stage::Clip => "clip",
            Stage::Stagnant => "stagnant",
            Stage::Abrupt => "abrupt",
            Stage::ZeroError => "zero_error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a replacement value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstituteSource {
    Partner(SensorId),
    Previous,
    Zero,
    Bound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correction {
    pub stage: Stage,
    pub sensor: SensorId,
    pub timestamp: NaiveDateTime,
    pub original: Option<f64>,
    pub replacement: f64,
    pub source: SubstituteSource,
}

/// A point the substitution cascade could not resolve. Collected, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("no substitute for {sensor} at {timestamp} during {stage}")]
pub struct UnresolvedGap {
    pub sensor: SensorId,
    pub timestamp: NaiveDateTime,
    pub stage: Stage,
}

/// Everything one stage changed or failed to change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutcome {
    pub corrections: Vec<Correction>,
    pub unresolved: Vec<UnresolvedGap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub corrected: usize,
    pub unresolved: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
    pub corrections: Vec<Correction>,
}

impl PipelineReport {
    /// Folds a stage outcome into the report, returning its unresolved points.
    pub(crate) fn record(&mut self, stage: Stage, outcome: StageOutcome) -> Vec<UnresolvedGap> {
        self.stages.push(StageReport {
            stage,
            corrected: outcome.corrections.len(),
            unresolved: outcome.unresolved.len(),
        });
        self.corrections.extend(outcome.corrections);
        outcome.unresolved
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    pub fn corrections_for(&self, stage: Stage) -> impl Iterator<Item = &Correction> {
        self.corrections
            .iter()
            .filter(move |correction| correction.stage == stage)
    }

    pub fn total_corrected(&self) -> usize {
        self.corrections.len()
    }
}
