pub mod abrupt;
pub mod stagnant;
pub mod zero;

use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::report::{Correction, Stage, StageOutcome, SubstituteSource, UnresolvedGap};
use crate::sensors::{SensorCatalog, SensorId};
use crate::series::SensorGroup;
use crate::substitution::{resolve, PartnerView};

/// One replaced value, positioned on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointFix {
    pub index: usize,
    pub original: Option<f64>,
    pub replacement: f64,
    pub source: SubstituteSource,
}

/// Fixes and unresolved positions computed for one sensor in one stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorRepair {
    pub fixes: Vec<PointFix>,
    pub unresolved: Vec<usize>,
}

impl SensorRepair {
    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty() && self.unresolved.is_empty()
    }

    /// Runs the cascade over `points` in order on a working copy of `values`, so later points
    /// can carry forward values repaired earlier in the same pass. Points left unresolved
    /// are cleared, so a following point has no predecessor to carry forward either.
    pub(crate) fn substitute_points(
        values: &[Option<f64>],
        points: impl IntoIterator<Item = usize>,
        partner: Option<PartnerView<'_>>,
    ) -> Self {
        let mut working = values.to_vec();
        let mut repair = SensorRepair::default();
        for index in points {
            repair.substitute(&mut working, index, partner);
        }
        repair
    }

    pub(crate) fn substitute(
        &mut self,
        working: &mut [Option<f64>],
        index: usize,
        partner: Option<PartnerView<'_>>,
    ) {
        let original = working[index];
        match resolve(index, working, partner) {
            Some(substitute) => {
                working[index] = Some(substitute.value);
                if original != Some(substitute.value) {
                    self.fixes.push(PointFix {
                        index,
                        original,
                        replacement: substitute.value,
                        source: substitute.source,
                    });
                }
            }
            None => {
                working[index] = None;
                self.unresolved.push(index);
            }
        }
    }
}

/// The detector-driven repair stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairKind {
    Stagnant,
    Abrupt,
    ZeroError,
}

impl RepairKind {
    pub const ALL: [RepairKind; 3] = [
        RepairKind::Stagnant,
        RepairKind::Abrupt,
        RepairKind::ZeroError,
    ];

    pub fn stage(&self) -> Stage {
        match self {
            RepairKind::Stagnant => Stage::Stagnant,
            RepairKind::Abrupt => Stage::Abrupt,
            RepairKind::ZeroError => Stage::ZeroError,
        }
    }

    /// Fixes for one sensor, read from the pre-stage group.
    pub fn repair_sensor(
        &self,
        group: &SensorGroup,
        sensor: SensorId,
        catalog: &SensorCatalog,
        config: &PipelineConfig,
    ) -> SensorRepair {
        let Some(values) = group.values(sensor) else {
            return SensorRepair::default();
        };
        let partner = PartnerView::lookup(group, catalog, sensor);

        match self {
            RepairKind::Stagnant => stagnant::repair(values, partner, &config.stagnant),
            RepairKind::Abrupt => {
                abrupt::repair(values, partner, config.abrupt_threshold_for(sensor))
            }
            RepairKind::ZeroError => zero::repair(values, partner),
        }
    }

    /// Repairs every non-reference sensor against the same pre-stage snapshot, then writes all
    /// fixes back.
    pub fn apply(
        &self,
        group: SensorGroup,
        catalog: &SensorCatalog,
        config: &PipelineConfig,
    ) -> (SensorGroup, StageOutcome) {
        let repairs: Vec<(SensorId, SensorRepair)> = group
            .sensors()
            .filter(|sensor| !catalog.is_reference(*sensor))
            .map(|sensor| (sensor, self.repair_sensor(&group, sensor, catalog, config)))
            .collect();

        apply_repairs(group, self.stage(), repairs)
    }
}

/// Writes fixes into the group, clears unresolved points and converts positions into report
/// entries.
pub(crate) fn apply_repairs(
    mut group: SensorGroup,
    stage: Stage,
    repairs: Vec<(SensorId, SensorRepair)>,
) -> (SensorGroup, StageOutcome) {
    let timeline = group.timeline().clone();
    let mut outcome = StageOutcome::default();

    for (sensor, repair) in repairs {
        let Some(series) = group.series_mut(sensor) else {
            continue;
        };

        for fix in repair.fixes {
            series.set(fix.index, Some(fix.replacement));
            let Some(timestamp) = timeline.tick(fix.index) else {
                continue;
            };
            debug!(
                stage = stage.as_str(),
                sensor = sensor.as_str(),
                %timestamp,
                original = ?fix.original,
                replacement = fix.replacement,
                "Corrected point"
            );
            outcome.corrections.push(Correction {
                stage,
                sensor,
                timestamp,
                original: fix.original,
                replacement: fix.replacement,
                source: fix.source,
            });
        }

        for index in repair.unresolved {
            series.set(index, None);
            let Some(timestamp) = timeline.tick(index) else {
                continue;
            };
            warn!(
                stage = stage.as_str(),
                sensor = sensor.as_str(),
                %timestamp,
                "No substitute available, point cleared"
            );
            outcome.unresolved.push(UnresolvedGap {
                sensor,
                timestamp,
                stage,
            });
        }
    }

    (group, outcome)
}
