use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use irradiance_parser::{split_wide_table, RawChannel};
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::sensors::{SensorCatalog, SensorId};

/// Splits the wide table into channels and keys them by canonical sensor.
pub fn ingest(
    table: &DataFrame,
    catalog: &SensorCatalog,
) -> Result<BTreeMap<SensorId, RawChannel>> {
    let channels = split_wide_table(table)?;
    let mut by_sensor = BTreeMap::new();

    for channel in channels {
        let sensor = catalog
            .sensor_for_tag(&channel.tag)
            .ok_or_else(|| PipelineError::UnknownSensor {
                tag: channel.tag.clone(),
            })?;

        match by_sensor.entry(sensor) {
            Entry::Occupied(existing) => {
                let first: &RawChannel = existing.get();
                return Err(PipelineError::DuplicateSensor {
                    sensor,
                    first_tag: first.tag.clone(),
                    second_tag: channel.tag,
                });
            }
            Entry::Vacant(slot) => {
                debug!(
                    sensor = sensor.as_str(),
                    tag = channel.tag.as_str(),
                    rows = channel.len(),
                    "Ingested channel"
                );
                slot.insert(channel);
            }
        }
    }

    Ok(by_sensor)
}
