use serde_json::Value;

use crate::mf2::Microformat;

/// A single raw mf2 property value, decoded into a closed set of shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A plain string, or an image object `{value, alt}` reduced to its URL.
    Text(String),
    /// Embedded markup with its plain-text rendition.
    Markup { html: String, text: String },
    /// A nested microformat node.
    Node(Microformat),
    Unknown(Value),
}

impl PropertyValue {
    pub fn decode(raw: &Value) -> Self {
        match raw {
            Value::String(s) => PropertyValue::Text(s.clone()),
            Value::Object(map) if map.get("type").is_some_and(Value::is_array) => {
                match serde_json::from_value::<Microformat>(raw.clone()) {
                    Ok(node) => PropertyValue::Node(node),
                    Err(_) => PropertyValue::Unknown(raw.clone()),
                }
            }
            Value::Object(map) => match (map.get("html"), map.get("value")) {
                (Some(Value::String(html)), value) => PropertyValue::Markup {
                    html: html.clone(),
                    text: value.and_then(Value::as_str).unwrap_or_default().to_string(),
                },
                (None, Some(Value::String(value))) => PropertyValue::Text(value.clone()),
                _ => PropertyValue::Unknown(raw.clone()),
            },
            other => PropertyValue::Unknown(other.clone()),
        }
    }

    /// Plain value usable where a URL or string is expected.
    pub fn plain(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s.as_str()),
            PropertyValue::Node(node) => node
                .value
                .as_deref()
                .or_else(|| node.first_string("url"))
                .or_else(|| node.first_string("name")),
            _ => None,
        }
    }
}

/// Shape of a whole property (all of its values), used by the fallback chain.
#[derive(Debug, PartialEq)]
pub enum Shape<'a> {
    String(&'a str),
    StringList(Vec<&'a str>),
    StructuredContent { html: &'a str, text: &'a str },
    NestedNode(&'a Microformat),
    Unknown,
}

impl<'a> Shape<'a> {
    pub fn of(values: &'a [PropertyValue]) -> Self {
        match values {
            [] => Shape::Unknown,
            [PropertyValue::Node(node), ..] => Shape::NestedNode(node),
            [PropertyValue::Markup { html, text }, ..] => Shape::StructuredContent { html, text },
            [PropertyValue::Text(s)] => Shape::String(s),
            _ => {
                let texts: Option<Vec<&str>> = values
                    .iter()
                    .map(|v| match v {
                        PropertyValue::Text(s) => Some(s.as_str()),
                        _ => None,
                    })
                    .collect();
                texts.map_or(Shape::Unknown, Shape::StringList)
            }
        }
    }
}
