use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{PipelineError, Result};

/// Canonical station sensors. Ordering follows declaration order, which is also the column
/// order of the merged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum SensorId {
    Ghi,
    Ghi2,
    Pir1,
    Pir2,
    Pir5,
    Pir7,
    Temp1,
    Temp2,
    Temp3,
    Rh1,
    Rh2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Irradiance,
    Temperature,
    Humidity,
}

impl Quantity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quantity::Irradiance => "irradiance",
            Quantity::Temperature => "temperature",
            Quantity::Humidity => "humidity",
        }
    }
}

impl SensorId {
    pub const ALL: [SensorId; 11] = [
        SensorId::Ghi,
        SensorId::Ghi2,
        SensorId::Pir1,
        SensorId::Pir2,
        SensorId::Pir5,
        SensorId::Pir7,
        SensorId::Temp1,
        SensorId::Temp2,
        SensorId::Temp3,
        SensorId::Rh1,
        SensorId::Rh2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorId::Ghi => "GHI",
            SensorId::Ghi2 => "GHI2",
            SensorId::Pir1 => "PIR1",
            SensorId::Pir2 => "PIR2",
            SensorId::Pir5 => "PIR5",
            SensorId::Pir7 => "PIR7",
            SensorId::Temp1 => "Temp1",
            SensorId::Temp2 => "Temp2",
            SensorId::Temp3 => "Temp3",
            SensorId::Rh1 => "RH1",
            SensorId::Rh2 => "RH2",
        }
    }

    pub fn quantity(&self) -> Quantity {
        match self {
            SensorId::Ghi
            | SensorId::Ghi2
            | SensorId::Pir1
            | SensorId::Pir2
            | SensorId::Pir5
            | SensorId::Pir7 => Quantity::Irradiance,
            SensorId::Temp1 | SensorId::Temp2 | SensorId::Temp3 => Quantity::Temperature,
            SensorId::Rh1 | SensorId::Rh2 => Quantity::Humidity,
        }
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorId {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = value.trim();
        SensorId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown sensor '{trimmed}'"))
    }
}

impl TryFrom<String> for SensorId {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for SensorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Immutable sensor configuration: raw tag mapping, redundancy partners and the reference
/// sensor whose range defines the canonical timeline.
#[derive(Debug, Clone)]
pub struct SensorCatalog {
    reference: SensorId,
    raw_tags: HashMap<String, SensorId>,
    equivalents: BTreeMap<SensorId, SensorId>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    reference: SensorId,
    raw_tags: BTreeMap<String, SensorId>,
    equivalents: BTreeMap<SensorId, SensorId>,
}

static STANDARD_STATION: Lazy<SensorCatalog> = Lazy::new(|| {
    use SensorId::*;

    let raw_tags = [
        ("Datalogger[7].Meteo[1].MRI_IrradianceGlobal", Ghi),
        ("Datalogger[1].SensorAI[2].MRI_Value01", Pir1),
        ("Datalogger[2].SensorAI[2].MRI_Value01", Pir2),
        ("Datalogger[5].SensorAI[2].MRI_Value01", Pir5),
        ("Datalogger[7].SensorAI[2].MRI_Value01", Pir7),
        ("Datalogger[1].Meteo[1].MRI_TemperatureAmbient", Temp2),
        ("Datalogger[7].Meteo[1].MRI_Humidity", Rh2),
        ("Datalogger[7].Meteo[1].MRI_TemperatureAmbient", Temp3),
    ];

    let equivalents = [
        (Ghi, Ghi),
        (Pir1, Pir2),
        (Pir2, Pir1),
        (Pir5, Pir7),
        (Pir7, Pir5),
        (Temp2, Temp2),
        (Rh2, Rh2),
        (Temp3, Temp3),
    ];

    SensorCatalog {
        reference: Ghi,
        raw_tags: raw_tags
            .into_iter()
            .map(|(tag, id)| (tag.to_string(), id))
            .collect(),
        equivalents: equivalents.into_iter().collect(),
    }
});

impl SensorCatalog {
    /// Builds a catalog, rejecting incomplete equivalence maps, partners outside the catalog
    /// and a reference sensor without a raw tag.
    pub fn new(
        reference: SensorId,
        raw_tags: impl IntoIterator<Item = (String, SensorId)>,
        equivalents: impl IntoIterator<Item = (SensorId, SensorId)>,
    ) -> Result<Self> {
        let raw_tags: HashMap<String, SensorId> = raw_tags
            .into_iter()
            .map(|(tag, sensor)| (tag.trim().to_string(), sensor))
            .collect();
        let equivalents: BTreeMap<SensorId, SensorId> = equivalents.into_iter().collect();
        let mapped: BTreeSet<SensorId> = raw_tags.values().copied().collect();

        if !mapped.contains(&reference) {
            return Err(PipelineError::Configuration(format!(
                "reference sensor {reference} has no raw tag"
            )));
        }

        for sensor in &mapped {
            let partner = equivalents.get(sensor).ok_or_else(|| {
                PipelineError::Configuration(format!("sensor {sensor} has no equivalence entry"))
            })?;
            if !mapped.contains(partner) {
                return Err(PipelineError::Configuration(format!(
                    "sensor {sensor} names {partner} as equivalent, but {partner} has no raw tag"
                )));
            }
        }

        if let Some(orphan) = equivalents.keys().find(|sensor| !mapped.contains(*sensor)) {
            return Err(PipelineError::Configuration(format!(
                "equivalence entry for {orphan}, which has no raw tag"
            )));
        }

        Ok(Self {
            reference,
            raw_tags,
            equivalents,
        })
    }

    /// Tag map and redundancy pairs of the original irradiance station, with GHI as reference.
    pub fn standard_station() -> Self {
        STANDARD_STATION.clone()
    }

    /// Parses a catalog document:
    ///
    /// ```toml
    /// reference = "GHI"
    ///
    /// [raw_tags]
    /// "Datalogger[7].Meteo[1].MRI_IrradianceGlobal" = "GHI"
    ///
    /// [equivalents]
    /// GHI = "GHI"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.reference, file.raw_tags, file.equivalents)
    }

    pub fn reference(&self) -> SensorId {
        self.reference
    }

    pub fn is_reference(&self, sensor: SensorId) -> bool {
        self.reference == sensor
    }

    pub fn sensor_for_tag(&self, tag: &str) -> Option<SensorId> {
        self.raw_tags.get(tag.trim()).copied()
    }

    pub fn contains(&self, sensor: SensorId) -> bool {
        self.equivalents.contains_key(&sensor)
    }

    /// Configured equivalent, which may be the sensor itself.
    pub fn equivalent_of(&self, sensor: SensorId) -> Option<SensorId> {
        self.equivalents.get(&sensor).copied()
    }

    /// Independent redundancy partner. Sensors mapped to themselves have none.
    pub fn partner_of(&self, sensor: SensorId) -> Option<SensorId> {
        self.equivalent_of(sensor).filter(|partner| *partner != sensor)
    }

    /// Catalog sensors in canonical order.
    pub fn sensors(&self) -> impl Iterator<Item = SensorId> + '_ {
        self.equivalents.keys().copied()
    }
}
