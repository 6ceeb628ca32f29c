use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use irradiance_core::{
    config::HourWindow,
    merge::{daily_means, merge_wide},
    report::Stage,
    series::{SensorGroup, TimeSeries, Timeline},
    SensorId, UnresolvedGap,
};
use polars::prelude::*;

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid timestamp")
}

fn group(start: NaiveDateTime, series: Vec<(SensorId, Vec<Option<f64>>)>) -> SensorGroup {
    let len = series.first().map_or(0, |(_, values)| values.len());
    let series: BTreeMap<SensorId, TimeSeries> = series
        .into_iter()
        .map(|(sensor, values)| (sensor, TimeSeries::new(values)))
        .collect();
    SensorGroup::new(Timeline::new(start, TimeDelta::minutes(1), len), series)
        .expect("consistent group")
}

fn micros(column: &Column) -> Result<Vec<Option<i64>>> {
    Ok(column.cast(&DataType::Int64)?.i64()?.into_iter().collect())
}

#[test]
fn wide_table_has_timeline_index_and_canonical_column_order() -> Result<()> {
    let input = group(
        at(4, 10, 0),
        vec![
            (SensorId::Temp2, vec![Some(20.0), Some(21.0), Some(22.0)]),
            (SensorId::Ghi, vec![Some(400.0), Some(401.0), Some(402.0)]),
            (SensorId::Pir2, vec![Some(1.0), None, Some(3.0)]),
        ],
    );

    let wide = merge_wide(&input, &[], None)?;

    let names: Vec<&str> = wide.get_column_names().iter().map(|name| name.as_str()).collect();
    assert_eq!(
        names,
        vec!["timestamp", "GHI", "PIR2", "Temp2", "quality", "quality_explanation"]
    );
    assert_eq!(
        wide.column("timestamp")?.dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );
    assert_eq!(
        micros(wide.column("timestamp")?)?,
        vec![
            Some(at(4, 10, 0).and_utc().timestamp_micros()),
            Some(at(4, 10, 1).and_utc().timestamp_micros()),
            Some(at(4, 10, 2).and_utc().timestamp_micros()),
        ]
    );
    assert_eq!(wide.column("PIR2")?.f64()?.get(1), None);
    assert_eq!(wide.column("quality")?.null_count(), 3);
    Ok(())
}

#[test]
fn rows_with_unresolved_points_are_flagged_suspect() -> Result<()> {
    let input = group(
        at(4, 10, 0),
        vec![
            (SensorId::Ghi, vec![Some(400.0), Some(401.0)]),
            (SensorId::Temp2, vec![None, Some(21.0)]),
            (SensorId::Rh2, vec![None, Some(60.0)]),
        ],
    );
    let unresolved = vec![
        UnresolvedGap {
            sensor: SensorId::Rh2,
            timestamp: at(4, 10, 0),
            stage: Stage::GapFill,
        },
        UnresolvedGap {
            sensor: SensorId::Temp2,
            timestamp: at(4, 10, 0),
            stage: Stage::GapFill,
        },
        UnresolvedGap {
            sensor: SensorId::Temp2,
            timestamp: at(4, 10, 0),
            stage: Stage::Stagnant,
        },
    ];

    let wide = merge_wide(&input, &unresolved, None)?;

    let quality = wide.column("quality")?.str()?;
    let explanation = wide.column("quality_explanation")?.str()?;
    assert_eq!(quality.get(0), Some("SUSPECT"));
    assert_eq!(
        explanation.get(0),
        Some("unresolved_gap:Temp2|unresolved_gap:RH2")
    );
    assert_eq!(quality.get(1), None);
    assert_eq!(explanation.get(1), None);
    Ok(())
}

#[test]
fn daily_means_average_present_values_per_calendar_day() -> Result<()> {
    let input = group(
        at(4, 23, 58),
        vec![
            (SensorId::Ghi, vec![Some(1.0), Some(3.0), Some(10.0), None]),
            (SensorId::Temp2, vec![None, None, Some(20.0), Some(22.0)]),
        ],
    );

    let daily = daily_means(&input, None)?;

    assert_eq!(daily.height(), 2);
    assert_eq!(
        micros(daily.column("timestamp")?)?,
        vec![
            Some(at(4, 0, 0).and_utc().timestamp_micros()),
            Some(at(5, 0, 0).and_utc().timestamp_micros()),
        ]
    );
    let ghi = daily.column("GHI")?.f64()?;
    assert_eq!(ghi.get(0), Some(2.0));
    assert_eq!(ghi.get(1), Some(10.0));
    let temp = daily.column("Temp2")?.f64()?;
    assert_eq!(temp.get(0), None);
    assert_eq!(temp.get(1), Some(21.0));
    Ok(())
}

#[test]
fn hour_window_filters_both_outputs() -> Result<()> {
    let input = group(
        at(4, 9, 58),
        vec![(SensorId::Ghi, vec![Some(1.0), Some(2.0), Some(30.0), Some(40.0)])],
    );
    let window = Some(HourWindow {
        after: 9,
        before: 11,
    });

    let wide = merge_wide(&input, &[], window)?;
    let daily = daily_means(&input, window)?;

    assert_eq!(wide.height(), 2);
    assert_eq!(wide.column("GHI")?.f64()?.get(0), Some(30.0));
    assert_eq!(daily.column("GHI")?.f64()?.get(0), Some(35.0));
    Ok(())
}
