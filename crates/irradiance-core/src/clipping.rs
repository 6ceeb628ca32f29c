use crate::config::PipelineConfig;
use crate::repair::{apply_repairs, PointFix, SensorRepair};
use crate::report::{Stage, StageOutcome, SubstituteSource};
use crate::sensors::SensorId;
use crate::series::SensorGroup;

/// Clamps every present value into its sensor's bounds, reference included.
pub fn clip_ranges(group: SensorGroup, config: &PipelineConfig) -> (SensorGroup, StageOutcome) {
    let repairs: Vec<(SensorId, SensorRepair)> = group
        .iter()
        .map(|(sensor, series)| {
            let bounds = config.clip_bounds_for(sensor);
            let fixes = series
                .values()
                .iter()
                .enumerate()
                .filter_map(|(index, value)| {
                    let value = (*value)?;
                    let clamped = value.max(bounds.lower).min(bounds.upper);
                    (clamped != value).then_some(PointFix {
                        index,
                        original: Some(value),
                        replacement: clamped,
                        source: SubstituteSource::Bound,
                    })
                })
                .collect();
            (
                sensor,
                SensorRepair {
                    fixes,
                    unresolved: Vec::new(),
                },
            )
        })
        .collect();

    apply_repairs(group, Stage::Clip, repairs)
}
