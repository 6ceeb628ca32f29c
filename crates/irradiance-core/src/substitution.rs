use crate::report::SubstituteSource;
use crate::sensors::{SensorCatalog, SensorId};
use crate::series::SensorGroup;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Substitute {
    pub value: f64,
    pub source: SubstituteSource,
}

/// Partner readings as they were before the current stage.
#[derive(Debug, Clone, Copy)]
pub struct PartnerView<'a> {
    pub sensor: SensorId,
    pub values: &'a [Option<f64>],
}

impl<'a> PartnerView<'a> {
    /// Independent partner of `sensor` within `group`. Self-mapped sensors have none.
    pub fn lookup(
        group: &'a SensorGroup,
        catalog: &SensorCatalog,
        sensor: SensorId,
    ) -> Option<Self> {
        let partner = catalog.partner_of(sensor)?;
        group.values(partner).map(|values| Self {
            sensor: partner,
            values,
        })
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

/// Replacement for `own[index]`: the partner's present non-zero value, else the sensor's own
/// value one tick earlier. Looks back at most one tick, so `None` means unresolved.
pub fn resolve(
    index: usize,
    own: &[Option<f64>],
    partner: Option<PartnerView<'_>>,
) -> Option<Substitute> {
    if let Some(partner) = partner {
        if let Some(value) = partner.get(index).filter(|value| *value != 0.0) {
            return Some(Substitute {
                value,
                source: SubstituteSource::Partner(partner.sensor),
            });
        }
    }

    let previous = index.checked_sub(1)?;
    own.get(previous).copied().flatten().map(|value| Substitute {
        value,
        source: SubstituteSource::Previous,
    })
}
