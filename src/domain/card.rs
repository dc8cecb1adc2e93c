use serde::{Deserialize, Serialize};

/// A minimal identity record for a person or a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(rename = "country-name", default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,

    /// Set when the card carries usable attribution. An unfilled author
    /// is replaced by an inherited one.
    #[serde(skip)]
    pub filled: bool,
}

impl Default for Card {
    fn default() -> Self {
        Self {
            kind: "card".into(),
            name: None,
            url: None,
            photo: None,
            locality: None,
            country_name: None,
            latitude: None,
            longitude: None,
            filled: false,
        }
    }
}

impl Card {
    /// Recompute `filled` from the identity fields.
    pub fn refresh_filled(&mut self) {
        self.filled = [&self.name, &self.url, &self.photo]
            .iter()
            .any(|f| f.as_deref().is_some_and(|v| !v.trim().is_empty()));
    }
}
