use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("wide table has {found} columns; expected tag/value/timestamp triples")]
    ColumnCount { found: usize },

    #[error("channel {channel} has no tag name in column '{column}' on the first row")]
    MissingTagName { channel: usize, column: String },

    #[error("column '{column}' has unsupported type {dtype} for {role}")]
    UnsupportedColumnType {
        column: String,
        dtype: String,
        role: &'static str,
    },

    #[error("polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
