mod common;
pub(crate) mod schema;
mod triples;

pub use schema::{ChannelColumn, COLUMNS_PER_CHANNEL};
pub use triples::split_wide_table;

pub(crate) use common::{read_tag_name, read_timestamps, read_values};
