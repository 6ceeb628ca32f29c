use crate::config::StagnantConfig;
use crate::substitution::PartnerView;

use super::SensorRepair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    InRun { start: usize, len: usize },
}

/// Positions belonging to flat runs of at least `min_run_length` samples. Consecutive samples
/// are flat when they differ by at most `threshold`; a missing sample ends the run.
pub fn stagnant_points(
    values: &[Option<f64>],
    threshold: f64,
    min_run_length: usize,
) -> Vec<usize> {
    let mut confirmed = Vec::new();

    let last = (1..values.len()).fold(RunState::Idle, |state, t| {
        let flat = matches!(
            (values[t - 1], values[t]),
            (Some(previous), Some(current)) if (current - previous).abs() <= threshold
        );

        match (state, flat) {
            (RunState::Idle, true) => RunState::InRun { start: t - 1, len: 2 },
            (RunState::InRun { start, len }, true) => RunState::InRun { start, len: len + 1 },
            (RunState::InRun { start, len }, false) => {
                if len >= min_run_length {
                    confirmed.extend(start..t);
                }
                RunState::Idle
            }
            (RunState::Idle, false) => RunState::Idle,
        }
    });

    if let RunState::InRun { start, len } = last {
        if len >= min_run_length {
            confirmed.extend(start..values.len());
        }
    }

    confirmed
}

pub fn repair(
    values: &[Option<f64>],
    partner: Option<PartnerView<'_>>,
    config: &StagnantConfig,
) -> SensorRepair {
    let points = stagnant_points(values, config.threshold, config.frequency);
    SensorRepair::substitute_points(values, points, partner)
}
