/// Every logged channel occupies three adjacent columns in the wide export.
pub const COLUMNS_PER_CHANNEL: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelColumn {
    TagName,
    Value,
    Timestamp,
}

impl ChannelColumn {
    pub fn canonical_name(&self) -> &'static str {
        match self {
            ChannelColumn::TagName => "TagName",
            ChannelColumn::Value => "Value",
            ChannelColumn::Timestamp => "Timestamp",
        }
    }

    /// Position of this column inside its triple.
    pub fn offset(&self) -> usize {
        match self {
            ChannelColumn::TagName => 0,
            ChannelColumn::Value => 1,
            ChannelColumn::Timestamp => 2,
        }
    }
}
