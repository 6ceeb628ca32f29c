use polars::prelude::DataFrame;

use crate::errors::ParserError;
use crate::model::{RawChannel, RawReading};

use super::schema::{ChannelColumn, COLUMNS_PER_CHANNEL};
use super::{read_tag_name, read_timestamps, read_values};

/// Splits a wide export into one raw channel per tag/value/timestamp triple, in column order.
///
/// Only the shape is checked here. Tags are not interpreted, and readings are kept unsorted,
/// duplicated and unparsed exactly as exported.
pub fn split_wide_table(table: &DataFrame) -> Result<Vec<RawChannel>, ParserError> {
    let columns = table.get_columns();
    if columns.len() % COLUMNS_PER_CHANNEL != 0 {
        return Err(ParserError::ColumnCount {
            found: columns.len(),
        });
    }

    columns
        .chunks_exact(COLUMNS_PER_CHANNEL)
        .enumerate()
        .map(|(channel_index, triple)| {
            let tag = read_tag_name(&triple[ChannelColumn::TagName.offset()], channel_index)?;
            let values = read_values(&triple[ChannelColumn::Value.offset()])?;
            let timestamps = read_timestamps(&triple[ChannelColumn::Timestamp.offset()])?;

            let readings = timestamps
                .into_iter()
                .zip(values)
                .map(|(timestamp, value)| RawReading::new(timestamp, value))
                .collect();

            Ok(RawChannel {
                tag,
                channel_index,
                readings,
            })
        })
        .collect()
}
