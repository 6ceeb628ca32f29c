pub mod errors;
pub mod formats;
pub mod model;

pub use errors::ParserError;
pub use formats::{split_wide_table, ChannelColumn, COLUMNS_PER_CHANNEL};
pub use model::{RawChannel, RawReading, RawTimestamp};
