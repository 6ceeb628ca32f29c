use crate::repair::{apply_repairs, PointFix, SensorRepair};
use crate::report::{Stage, StageOutcome, SubstituteSource};
use crate::sensors::{SensorCatalog, SensorId};
use crate::series::SensorGroup;
use crate::substitution::PartnerView;

/// Resolves every gap. The reference sensor is zero-filled; other sensors take the partner's
/// pre-stage value or carry their own value forward, walking each series in timestamp order.
pub fn fill_gaps(group: SensorGroup, catalog: &SensorCatalog) -> (SensorGroup, StageOutcome) {
    let repairs: Vec<(SensorId, SensorRepair)> = group
        .iter()
        .map(|(sensor, series)| {
            let values = series.values();
            let gaps = values
                .iter()
                .enumerate()
                .filter(|(_, value)| value.is_none())
                .map(|(index, _)| index);

            let repair = if catalog.is_reference(sensor) {
                zero_fill(gaps)
            } else {
                let partner = PartnerView::lookup(&group, catalog, sensor);
                SensorRepair::substitute_points(values, gaps, partner)
            };
            (sensor, repair)
        })
        .collect();

    apply_repairs(group, Stage::GapFill, repairs)
}

fn zero_fill(gaps: impl Iterator<Item = usize>) -> SensorRepair {
    SensorRepair {
        fixes: gaps
            .map(|index| PointFix {
                index,
                original: None,
                replacement: 0.0,
                source: SubstituteSource::Zero,
            })
            .collect(),
        unresolved: Vec::new(),
    }
}
