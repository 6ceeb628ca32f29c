use crate::substitution::PartnerView;

use super::SensorRepair;

/// Repairs single-sample spikes. A jump of at least `threshold` from the previous (possibly
/// already repaired) value is confirmed when the partner stayed steady over the same pair and
/// the following sample jumps back by at least `threshold`. Sensors without an independent
/// partner are confirmed on the following sample alone.
pub fn repair(
    values: &[Option<f64>],
    partner: Option<PartnerView<'_>>,
    threshold: f64,
) -> SensorRepair {
    let mut working = values.to_vec();
    let mut repair = SensorRepair::default();

    for t in 1..working.len() {
        let (Some(previous), Some(current)) = (working[t - 1], working[t]) else {
            continue;
        };
        if (current - previous).abs() < threshold {
            continue;
        }

        let partner_steady = partner.map_or(true, |partner| {
            matches!(
                (partner.get(t - 1), partner.get(t)),
                (Some(before), Some(after)) if (after - before).abs() < threshold
            )
        });
        let returns = working
            .get(t + 1)
            .copied()
            .flatten()
            .is_some_and(|next| (next - current).abs() >= threshold);

        if partner_steady && returns {
            repair.substitute(&mut working, t, partner);
        }
    }

    repair
}
