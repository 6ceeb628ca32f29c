use std::collections::BTreeMap;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::sensors::{Quantity, SensorCatalog, SensorId};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Tunables for one pipeline run. Every section falls back to the station defaults when
/// omitted from a TOML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub timestamp_format: String,
    pub interval_minutes: u32,
    pub stagnant: StagnantConfig,
    pub abrupt: AbruptConfig,
    pub clip: ClipConfig,
    pub hour_window: Option<HourWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagnantConfig {
    /// Minimum number of samples in a flat run before it is treated as stuck.
    pub frequency: usize,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbruptConfig {
    pub threshold: f64,
    pub overrides: BTreeMap<SensorId, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    pub lower: f64,
    pub upper: f64,
    pub overrides: BTreeMap<SensorId, ClipBounds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipBounds {
    pub lower: f64,
    pub upper: f64,
}

/// Rows are kept when `after < hour < before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub after: u32,
    pub before: u32,
}

impl HourWindow {
    pub fn contains(&self, hour: u32) -> bool {
        self.after < hour && hour < self.before
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            interval_minutes: 1,
            stagnant: StagnantConfig::default(),
            abrupt: AbruptConfig::default(),
            clip: ClipConfig::default(),
            hour_window: None,
        }
    }
}

impl Default for StagnantConfig {
    fn default() -> Self {
        Self {
            frequency: 6,
            threshold: 0.0001,
        }
    }
}

impl Default for AbruptConfig {
    fn default() -> Self {
        Self {
            threshold: 800.0,
            overrides: BTreeMap::new(),
        }
    }
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1500.0,
            overrides: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Defaults plus the temperature overrides used at the original station.
    pub fn standard_station(catalog: &SensorCatalog) -> Self {
        let mut config = Self::default();
        for sensor in catalog.sensors() {
            if sensor.quantity() == Quantity::Temperature {
                config.abrupt.overrides.insert(sensor, 4.0);
                config.clip.overrides.insert(
                    sensor,
                    ClipBounds {
                        lower: 0.0,
                        upper: 50.0,
                    },
                );
            }
        }
        config
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn interval(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.interval_minutes))
    }

    pub fn abrupt_threshold_for(&self, sensor: SensorId) -> f64 {
        self.abrupt
            .overrides
            .get(&sensor)
            .copied()
            .unwrap_or(self.abrupt.threshold)
    }

    pub fn clip_bounds_for(&self, sensor: SensorId) -> ClipBounds {
        self.clip
            .overrides
            .get(&sensor)
            .copied()
            .unwrap_or(ClipBounds {
                lower: self.clip.lower,
                upper: self.clip.upper,
            })
    }

    pub fn validate(&self, catalog: &SensorCatalog) -> Result<()> {
        if self.timestamp_format.trim().is_empty() {
            return Err(invalid("timestamp_format must not be empty"));
        }
        if self.interval_minutes == 0 {
            return Err(invalid("interval_minutes must be at least 1"));
        }
        if self.stagnant.frequency < 2 {
            return Err(invalid("stagnant.frequency must be at least 2"));
        }
        if !self.stagnant.threshold.is_finite() || self.stagnant.threshold < 0.0 {
            return Err(invalid("stagnant.threshold must be a finite, non-negative number"));
        }

        check_abrupt_threshold("abrupt.threshold", self.abrupt.threshold)?;
        for (sensor, threshold) in &self.abrupt.overrides {
            check_known(catalog, *sensor, "abrupt.overrides")?;
            check_abrupt_threshold(&format!("abrupt.overrides.{sensor}"), *threshold)?;
        }

        check_bounds(
            "clip",
            ClipBounds {
                lower: self.clip.lower,
                upper: self.clip.upper,
            },
        )?;
        for (sensor, bounds) in &self.clip.overrides {
            check_known(catalog, *sensor, "clip.overrides")?;
            check_bounds(&format!("clip.overrides.{sensor}"), *bounds)?;
        }

        if let Some(window) = self.hour_window {
            if window.before > 24 || window.after >= window.before {
                return Err(invalid(format!(
                    "hour_window needs after < before <= 24, got after = {}, before = {}",
                    window.after, window.before
                )));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> PipelineError {
    PipelineError::Configuration(message.into())
}

fn check_known(catalog: &SensorCatalog, sensor: SensorId, section: &str) -> Result<()> {
    if catalog.contains(sensor) {
        Ok(())
    } else {
        Err(invalid(format!(
            "{section} names {sensor}, which is not in the sensor catalog"
        )))
    }
}

fn check_abrupt_threshold(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{key} must be a positive number, got {value}")))
    }
}

fn check_bounds(key: &str, bounds: ClipBounds) -> Result<()> {
    if !bounds.lower.is_finite() || !bounds.upper.is_finite() {
        return Err(invalid(format!("{key} bounds must be finite")));
    }
    if bounds.lower > bounds.upper {
        return Err(invalid(format!(
            "{key} lower bound {} exceeds upper bound {}",
            bounds.lower, bounds.upper
        )));
    }
    Ok(())
}
