use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;

use crate::config::HourWindow;
use crate::error::Result;
use crate::report::UnresolvedGap;
use crate::sensors::SensorId;
use crate::series::{naive_to_micros, SensorGroup};

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const QUALITY_COLUMN: &str = "quality";
pub const QUALITY_EXPLANATION_COLUMN: &str = "quality_explanation";

/// One row per kept tick: `timestamp`, one column per sensor in canonical order, then quality
/// flags for rows where some point stayed unresolved.
pub fn merge_wide(
    group: &SensorGroup,
    unresolved: &[UnresolvedGap],
    hour_window: Option<HourWindow>,
) -> Result<DataFrame> {
    let timeline = group.timeline();
    let rows: Vec<(usize, NaiveDateTime)> = timeline
        .ticks()
        .enumerate()
        .filter(|(_, tick)| keep_hour(*tick, hour_window))
        .collect();

    let mut unresolved_by_tick: BTreeMap<usize, BTreeSet<SensorId>> = BTreeMap::new();
    for gap in unresolved {
        if let Some(index) = timeline.index_of(gap.timestamp) {
            unresolved_by_tick.entry(index).or_default().insert(gap.sensor);
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(group.len() + 3);
    columns.push(timestamp_column(rows.iter().map(|(_, tick)| *tick))?);

    for (sensor, series) in group.iter() {
        let values: Vec<Option<f64>> = rows.iter().map(|(index, _)| series.get(*index)).collect();
        columns.push(Series::new(sensor.as_str().into(), values).into());
    }

    let mut quality: Vec<Option<&str>> = Vec::with_capacity(rows.len());
    let mut explanations: Vec<Option<String>> = Vec::with_capacity(rows.len());
    for (index, _) in &rows {
        match unresolved_by_tick.get(index) {
            Some(sensors) => {
                let reasons: Vec<String> = sensors
                    .iter()
                    .map(|sensor| format!("unresolved_gap:{sensor}"))
                    .collect();
                quality.push(Some("SUSPECT"));
                explanations.push(Some(reasons.join("|")));
            }
            None => {
                quality.push(None);
                explanations.push(None);
            }
        }
    }

    columns.push(Series::new(QUALITY_COLUMN.into(), quality).into());
    columns.push(
        Series::new(
            QUALITY_EXPLANATION_COLUMN.into(),
            explanations
                .iter()
                .map(|opt| opt.as_deref())
                .collect::<Vec<Option<&str>>>(),
        )
        .into(),
    );

    Ok(DataFrame::new(columns)?)
}

/// One row per calendar day (timestamp at midnight), each sensor the mean of its present
/// values that day.
pub fn daily_means(group: &SensorGroup, hour_window: Option<HourWindow>) -> Result<DataFrame> {
    let sensors: Vec<SensorId> = group.sensors().collect();
    let mut per_day: BTreeMap<NaiveDate, Vec<(f64, usize)>> = BTreeMap::new();

    for (index, tick) in group.timeline().ticks().enumerate() {
        if !keep_hour(tick, hour_window) {
            continue;
        }
        let sums = per_day
            .entry(tick.date())
            .or_insert_with(|| vec![(0.0, 0); sensors.len()]);
        for (slot, (_, series)) in sums.iter_mut().zip(group.iter()) {
            if let Some(value) = series.get(index) {
                slot.0 += value;
                slot.1 += 1;
            }
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(sensors.len() + 1);
    columns.push(timestamp_column(
        per_day.keys().filter_map(|day| day.and_hms_opt(0, 0, 0)),
    )?);

    for (position, sensor) in sensors.iter().enumerate() {
        let means: Vec<Option<f64>> = per_day
            .values()
            .map(|sums| {
                let (sum, count) = sums[position];
                (count > 0).then(|| sum / count as f64)
            })
            .collect();
        columns.push(Series::new(sensor.as_str().into(), means).into());
    }

    Ok(DataFrame::new(columns)?)
}

fn keep_hour(tick: NaiveDateTime, hour_window: Option<HourWindow>) -> bool {
    hour_window.map_or(true, |window| window.contains(tick.hour()))
}

fn timestamp_column(ticks: impl Iterator<Item = NaiveDateTime>) -> Result<Column> {
    let micros: Vec<i64> = ticks.map(naive_to_micros).collect();
    let series = Series::new(TIMESTAMP_COLUMN.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    Ok(series.into())
}
