use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use irradiance_parser::{RawChannel, RawTimestamp};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::sensors::{SensorCatalog, SensorId};
use crate::series::{floor_to_interval, naive_from_micros, SensorGroup, TimeSeries, Timeline};

/// Cleans every channel and reindexes it onto the timeline spanned by the reference sensor.
pub fn align(
    channels: &BTreeMap<SensorId, RawChannel>,
    catalog: &SensorCatalog,
    config: &PipelineConfig,
) -> Result<SensorGroup> {
    let reference = catalog.reference();
    let reference_channel = channels
        .get(&reference)
        .ok_or(PipelineError::MissingReference(reference))?;

    for sensor in channels.keys() {
        if let Some(partner) = catalog.partner_of(*sensor) {
            if !channels.contains_key(&partner) {
                return Err(PipelineError::Configuration(format!(
                    "sensor {sensor} is partnered with {partner}, which is absent from the input"
                )));
            }
        }
    }

    let interval = config.interval();
    let reference_readings = clean_readings(reference_channel, &config.timestamp_format, interval);
    let (Some((start, _)), Some((end, _))) =
        (reference_readings.first(), reference_readings.last())
    else {
        return Err(PipelineError::MissingReference(reference));
    };
    let timeline = Timeline::spanning(*start, *end, interval);

    let mut series = BTreeMap::new();
    for (sensor, channel) in channels {
        let readings = if *sensor == reference {
            reference_readings.clone()
        } else {
            clean_readings(channel, &config.timestamp_format, interval)
        };

        let mut values = vec![None; timeline.len()];
        let mut outside = 0usize;
        for (timestamp, value) in &readings {
            match timeline.index_of(*timestamp) {
                Some(index) => values[index] = Some(*value),
                None => outside += 1,
            }
        }

        let aligned = TimeSeries::new(values);
        debug!(
            sensor = sensor.as_str(),
            raw_rows = channel.len(),
            kept = readings.len(),
            outside_window = outside,
            gaps = aligned.missing_count(),
            "Aligned sensor"
        );
        series.insert(*sensor, aligned);
    }

    info!(
        reference = reference.as_str(),
        start = %timeline.start(),
        ticks = timeline.len(),
        sensors = series.len(),
        "Built canonical timeline"
    );

    SensorGroup::new(timeline, series)
}

/// Valid readings of one channel: complete rows with parseable timestamps, sorted, floored to
/// the interval and deduplicated keeping the earliest raw reading of each interval.
pub fn clean_readings(
    channel: &RawChannel,
    timestamp_format: &str,
    interval: TimeDelta,
) -> Vec<(NaiveDateTime, f64)> {
    let step_micros = interval.num_microseconds().unwrap_or(i64::MAX).max(1);

    let mut readings: Vec<(NaiveDateTime, f64)> = channel
        .complete_readings()
        .filter_map(|reading| {
            let timestamp = parse_timestamp(reading.timestamp.as_ref()?, timestamp_format)?;
            Some((timestamp, reading.value?))
        })
        .collect();
    readings.sort_by_key(|(timestamp, _)| *timestamp);

    let mut cleaned: Vec<(NaiveDateTime, f64)> = Vec::with_capacity(readings.len());
    for (timestamp, value) in readings {
        let Some(floored) = floor_to_interval(timestamp, step_micros) else {
            continue;
        };
        if cleaned.last().is_some_and(|(last, _)| *last == floored) {
            continue;
        }
        cleaned.push((floored, value));
    }
    cleaned
}

fn parse_timestamp(raw: &RawTimestamp, format: &str) -> Option<NaiveDateTime> {
    match raw {
        RawTimestamp::Text(text) => NaiveDateTime::parse_from_str(text.trim(), format).ok(),
        RawTimestamp::Micros(micros) => naive_from_micros(*micros),
    }
}
