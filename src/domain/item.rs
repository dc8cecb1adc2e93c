use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Card;

/// Rendered markup and its plain-text rendition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            html: None,
            text: Some(text.into()),
        }
    }

    pub fn has_html(&self) -> bool {
        self.html.as_deref().is_some_and(|h| !h.is_empty())
    }
}

/// A normalized content unit, serialized in JF2 form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin: Option<Card>,

    #[serde(rename = "like-of", default, skip_serializing_if = "Vec::is_empty")]
    pub like_of: Vec<String>,
    #[serde(rename = "repost-of", default, skip_serializing_if = "Vec::is_empty")]
    pub repost_of: Vec<String>,
    #[serde(rename = "bookmark-of", default, skip_serializing_if = "Vec::is_empty")]
    pub bookmark_of: Vec<String>,
    #[serde(rename = "in-reply-to", default, skip_serializing_if = "Vec::is_empty")]
    pub in_reply_to: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub refs: BTreeMap<String, Item>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub video: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub featured: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,

    /// Typed child objects under properties with no dedicated field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nested: BTreeMap<String, Item>,
    /// Plain values under properties with no dedicated field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,

    #[serde(rename = "_is_read", default)]
    pub read: bool,
}

impl Item {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }
}
