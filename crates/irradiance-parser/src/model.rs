use std::fmt;

/// Timestamp cell as it appeared in the wide table. Text cells are parsed later with the
/// configured format; native datetime columns arrive as epoch microseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTimestamp {
    Text(String),
    Micros(i64),
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawTimestamp::Text(text) => f.write_str(text),
            RawTimestamp::Micros(micros) => write!(f, "{micros}us"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub timestamp: Option<RawTimestamp>,
    pub value: Option<f64>,
}

impl RawReading {
    pub fn new(timestamp: Option<RawTimestamp>, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    pub fn is_complete(&self) -> bool {
        self.timestamp.is_some() && self.value.is_some_and(|value| !value.is_nan())
    }
}

/// One logged channel extracted from a tag/value/timestamp triple, in table order.
#[derive(Debug, Clone)]
pub struct RawChannel {
    pub tag: String,
    /// Zero-based position of the triple in the wide table.
    pub channel_index: usize,
    pub readings: Vec<RawReading>,
}

impl RawChannel {
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn complete_readings(&self) -> impl Iterator<Item = &RawReading> {
        self.readings.iter().filter(|reading| reading.is_complete())
    }
}
