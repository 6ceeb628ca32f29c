use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::RawTimestamp;

/// Reads the channel's tag from the first row; the exporter repeats it on every row.
pub(crate) fn read_tag_name(column: &Column, channel: usize) -> Result<String, ParserError> {
    let as_text = column.cast(&DataType::String)?;
    let tag = as_text
        .str()?
        .get(0)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string);

    tag.ok_or_else(|| ParserError::MissingTagName {
        channel,
        column: column.name().to_string(),
    })
}

/// Casts the value column to floats. Cells that do not cast become missing readings.
pub(crate) fn read_values(column: &Column) -> Result<Vec<Option<f64>>, ParserError> {
    let values = column.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

pub(crate) fn read_timestamps(column: &Column) -> Result<Vec<Option<RawTimestamp>>, ParserError> {
    match column.dtype() {
        DataType::String => Ok(column
            .str()?
            .into_iter()
            .map(|cell| cell.map(|text| RawTimestamp::Text(text.to_string())))
            .collect()),
        DataType::Datetime(_, _) => {
            let micros = column
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
                .cast(&DataType::Int64)?;
            Ok(micros
                .i64()?
                .into_iter()
                .map(|cell| cell.map(RawTimestamp::Micros))
                .collect())
        }
        DataType::Null => Ok(vec![None; column.len()]),
        other => Err(ParserError::UnsupportedColumnType {
            column: column.name().to_string(),
            dtype: other.to_string(),
            role: "timestamp",
        }),
    }
}
