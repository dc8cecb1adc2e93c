//! Parsed microformats2 documents.
//!
//! These types mirror the canonical mf2 JSON produced by microformat
//! parsers: every node has a list of `h-*` types, a bag of properties whose
//! values are untyped JSON, and optional children. Interpreting the values
//! is the normalizer's job.

pub mod html;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::app::{BrookError, Result};

pub use html::HtmlParser;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub items: Vec<Microformat>,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BrookError::Parse(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Microformat {
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Microformat>,
    /// Plain-text value of a node used as a property value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Microformat {
    pub fn new(kind: &str) -> Self {
        Self {
            types: vec![kind.to_string()],
            ..Default::default()
        }
    }

    /// The primary type, e.g. `h-entry`.
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    pub fn is(&self, kind: &str) -> bool {
        self.primary_type() == Some(kind)
    }

    /// The primary type without the `h-` prefix; `entry` when untyped.
    pub fn short_type(&self) -> String {
        match self.primary_type() {
            Some(t) => t.strip_prefix("h-").unwrap_or(t).to_string(),
            None => "entry".to_string(),
        }
    }

    /// First plain string value of a property.
    pub fn first_string(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)?
            .iter()
            .find_map(|v| v.as_str())
    }

    pub fn with_property(mut self, name: &str, value: serde_json::Value) -> Self {
        self.properties
            .entry(name.to_string())
            .or_default()
            .push(value);
        self
    }

    pub fn with_child(mut self, child: Microformat) -> Self {
        self.children.push(child);
        self
    }

    /// Serialize back into an mf2 JSON value, for nesting as a property.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
