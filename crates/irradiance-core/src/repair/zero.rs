use crate::substitution::PartnerView;

use super::SensorRepair;

/// Replaces zero readings the partner contradicts with a present, non-zero value. Sensors
/// without an independent partner are left alone.
pub fn repair(values: &[Option<f64>], partner: Option<PartnerView<'_>>) -> SensorRepair {
    let Some(partner) = partner else {
        return SensorRepair::default();
    };

    let points: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(index, value)| {
            **value == Some(0.0) && partner.get(*index).is_some_and(|other| other != 0.0)
        })
        .map(|(index, _)| index)
        .collect();

    SensorRepair::substitute_points(values, points, Some(partner))
}
