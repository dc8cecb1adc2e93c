use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Storage strategy declared for a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelType {
    /// No preference; the default strategy applies.
    #[default]
    #[serde(rename = "")]
    Unset,
    SortedSet,
    Stream,
    Null,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChannelType::Unset => "",
            ChannelType::SortedSet => "sorted-set",
            ChannelType::Stream => "stream",
            ChannelType::Null => "null",
            ChannelType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelSetting {
    pub channel_type: ChannelType,
}

/// Per-channel settings keyed by channel name.
pub type ChannelSettings = HashMap<String, ChannelSetting>;
