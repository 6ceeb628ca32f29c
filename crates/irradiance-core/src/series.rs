use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::error::{PipelineError, Result};
use crate::sensors::SensorId;

/// Evenly spaced canonical ticks shared by every series of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    start: NaiveDateTime,
    step_micros: i64,
    len: usize,
}

impl Timeline {
    pub fn new(start: NaiveDateTime, interval: TimeDelta, len: usize) -> Self {
        Self {
            start,
            step_micros: interval.num_microseconds().unwrap_or(i64::MAX).max(1),
            len,
        }
    }

    /// Every tick in `[start, end]`, both ends included.
    pub fn spanning(start: NaiveDateTime, end: NaiveDateTime, interval: TimeDelta) -> Self {
        let mut timeline = Self::new(start, interval, 0);
        let span = naive_to_micros(end) - naive_to_micros(start);
        if span >= 0 {
            timeline.len = (span / timeline.step_micros) as usize + 1;
        }
        timeline
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.len.checked_sub(1).and_then(|last| self.tick(last))
    }

    pub fn interval(&self) -> TimeDelta {
        TimeDelta::microseconds(self.step_micros)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn tick(&self, index: usize) -> Option<NaiveDateTime> {
        if index >= self.len {
            return None;
        }
        let offset = i64::try_from(index).ok()?.checked_mul(self.step_micros)?;
        naive_from_micros(naive_to_micros(self.start).checked_add(offset)?)
    }

    pub fn index_of(&self, timestamp: NaiveDateTime) -> Option<usize> {
        let offset = naive_to_micros(timestamp) - naive_to_micros(self.start);
        if offset < 0 || offset % self.step_micros != 0 {
            return None;
        }
        let index = usize::try_from(offset / self.step_micros).ok()?;
        (index < self.len).then_some(index)
    }

    pub fn ticks(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.len).filter_map(move |index| self.tick(index))
    }
}

/// Readings of one sensor, positioned on the group's timeline. `None` marks a gap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn missing(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn set(&mut self, index: usize, value: Option<f64>) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_none()).count()
    }
}

impl From<Vec<Option<f64>>> for TimeSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self::new(values)
    }
}

impl From<Vec<f64>> for TimeSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values.into_iter().map(Some).collect())
    }
}

/// Every sensor of one pipeline run on a single canonical timeline.
#[derive(Debug, Clone)]
pub struct SensorGroup {
    timeline: Timeline,
    series: BTreeMap<SensorId, TimeSeries>,
}

impl SensorGroup {
    pub fn new(timeline: Timeline, series: BTreeMap<SensorId, TimeSeries>) -> Result<Self> {
        for (sensor, values) in &series {
            if values.len() != timeline.len() {
                return Err(PipelineError::SeriesLength {
                    sensor: *sensor,
                    expected: timeline.len(),
                    found: values.len(),
                });
            }
        }
        Ok(Self { timeline, series })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn series(&self, sensor: SensorId) -> Option<&TimeSeries> {
        self.series.get(&sensor)
    }

    pub fn values(&self, sensor: SensorId) -> Option<&[Option<f64>]> {
        self.series.get(&sensor).map(TimeSeries::values)
    }

    pub fn contains(&self, sensor: SensorId) -> bool {
        self.series.contains_key(&sensor)
    }

    pub fn sensors(&self) -> impl Iterator<Item = SensorId> + '_ {
        self.series.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorId, &TimeSeries)> {
        self.series.iter().map(|(sensor, series)| (*sensor, series))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub(crate) fn series_mut(&mut self, sensor: SensorId) -> Option<&mut TimeSeries> {
        self.series.get_mut(&sensor)
    }
}

pub(crate) fn naive_from_micros(value: i64) -> Option<NaiveDateTime> {
    let secs = value.div_euclid(1_000_000);
    let micros = value.rem_euclid(1_000_000) as u32;
    DateTime::<Utc>::from_timestamp(secs, micros * 1_000).map(|dt| dt.naive_utc())
}

pub(crate) fn naive_to_micros(value: NaiveDateTime) -> i64 {
    let dt_utc = value.and_utc();
    dt_utc.timestamp() * 1_000_000 + i64::from(dt_utc.timestamp_subsec_nanos() / 1_000)
}

/// Floors a timestamp onto the interval grid anchored at the Unix epoch.
pub(crate) fn floor_to_interval(value: NaiveDateTime, step_micros: i64) -> Option<NaiveDateTime> {
    let micros = naive_to_micros(value);
    naive_from_micros(micros - micros.rem_euclid(step_micros))
}
