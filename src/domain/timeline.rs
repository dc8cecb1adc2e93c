use serde::{Deserialize, Serialize};

use crate::domain::Item;

/// Opaque cursors bounding a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub items: Vec<Item>,
    pub paging: Paging,
}

impl Timeline {
    pub fn empty() -> Self {
        Self::default()
    }
}
