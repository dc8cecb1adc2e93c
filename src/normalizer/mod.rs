pub mod property;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::domain::{Card, Content, Item};
use crate::mf2::{Document, Microformat};

pub use property::{PropertyValue, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    LikeOf,
    RepostOf,
    BookmarkOf,
    InReplyTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    Name,
    Url,
    Uid,
    Published,
    Updated,
    Latitude,
    Longitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum List {
    Photo,
    Video,
    Featured,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Identity {
    Author,
    Checkin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Reference(Relation),
    Content,
    Summary,
    Identity(Identity),
    Scalar(Scalar),
    List(List),
}

/// Properties with dedicated handling. Anything else goes through the
/// shape fallback in [`Normalizer::apply_fallback`].
const HANDLERS: &[(&str, Handler)] = &[
    ("like-of", Handler::Reference(Relation::LikeOf)),
    ("repost-of", Handler::Reference(Relation::RepostOf)),
    ("bookmark-of", Handler::Reference(Relation::BookmarkOf)),
    ("in-reply-to", Handler::Reference(Relation::InReplyTo)),
    ("content", Handler::Content),
    ("summary", Handler::Summary),
    ("author", Handler::Identity(Identity::Author)),
    ("checkin", Handler::Identity(Identity::Checkin)),
    ("name", Handler::Scalar(Scalar::Name)),
    ("url", Handler::Scalar(Scalar::Url)),
    ("uid", Handler::Scalar(Scalar::Uid)),
    ("published", Handler::Scalar(Scalar::Published)),
    ("updated", Handler::Scalar(Scalar::Updated)),
    ("latitude", Handler::Scalar(Scalar::Latitude)),
    ("longitude", Handler::Scalar(Scalar::Longitude)),
    ("photo", Handler::List(List::Photo)),
    ("video", Handler::List(List::Video)),
    ("featured", Handler::List(List::Featured)),
    ("category", Handler::List(List::Category)),
];

fn handler_for(name: &str) -> Option<Handler> {
    HANDLERS
        .iter()
        .find(|(prop, _)| *prop == name)
        .map(|(_, handler)| *handler)
}

/// Converts parsed microformat trees into [`Item`]s.
///
/// Malformed properties never fail an item: they are skipped, logged at
/// debug level and counted (see [`Normalizer::dropped_properties`]).
#[derive(Clone, Default)]
pub struct Normalizer {
    dropped: Arc<AtomicU64>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of property values skipped so far by this normalizer and its clones.
    pub fn dropped_properties(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Normalize a whole document. Feeds are expanded into their children,
    /// cards become candidate authors, everything else is an item.
    pub fn normalize_document(&self, doc: &Document) -> Vec<Item> {
        let page_author = Self::candidate_author(&doc.items);

        let mut items = Vec::new();
        for node in &doc.items {
            if node.is("h-feed") {
                items.extend(self.normalize_feed(node, page_author.as_ref()));
            } else if !node.is("h-card") {
                self.normalize_flattened(node, &mut items);
            }
        }

        if let Some(author) = &page_author {
            inherit_author(&mut items, author);
        }
        items
    }

    /// Normalize a single node. `published` defaults to now.
    pub fn normalize(&self, node: &Microformat) -> Item {
        let mut item = self.build(node);
        if item.published.is_none() {
            item.published = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        item
    }

    fn normalize_feed(&self, feed: &Microformat, outer: Option<&Card>) -> Vec<Item> {
        let own = match feed.properties.get("author").and_then(|v| v.first()) {
            Some(raw) => match PropertyValue::decode(raw) {
                PropertyValue::Node(node) => Some(card_from(&node)).filter(|c| c.filled),
                _ => None,
            },
            None => None,
        };
        let author = own
            .or_else(|| Self::candidate_author(&feed.children))
            .or_else(|| outer.cloned());

        let mut items = Vec::new();
        for child in &feed.children {
            if child.is("h-feed") {
                items.extend(self.normalize_feed(child, author.as_ref()));
            } else if !child.is("h-card") {
                self.normalize_flattened(child, &mut items);
            }
        }

        if let Some(author) = &author {
            inherit_author(&mut items, author);
        }
        items
    }

    /// Push the item for `node`, then the items of its children depth first.
    /// Cards among the children are not items; nested feeds are expanded.
    fn normalize_flattened(&self, node: &Microformat, items: &mut Vec<Item>) {
        items.push(self.normalize(node));
        for child in &node.children {
            if child.is("h-feed") {
                items.extend(self.normalize_feed(child, None));
            } else if !child.is("h-card") {
                self.normalize_flattened(child, items);
            }
        }
    }

    fn candidate_author(nodes: &[Microformat]) -> Option<Card> {
        nodes
            .iter()
            .filter(|n| n.is("h-card"))
            .map(card_from)
            .find(|c| c.filled)
    }

    fn build(&self, node: &Microformat) -> Item {
        let mut item = Item::new(node.short_type());
        let mut summary = None;

        for (name, raw) in &node.properties {
            let values: Vec<PropertyValue> = raw.iter().map(PropertyValue::decode).collect();

            match handler_for(name) {
                Some(Handler::Reference(relation)) => {
                    self.apply_reference(&mut item, name, relation, &values)
                }
                Some(Handler::Content) => item.content = self.content(name, &values),
                Some(Handler::Summary) => summary = self.content(name, &values),
                Some(Handler::Identity(identity)) => {
                    let card = self.card(name, &values);
                    match identity {
                        Identity::Author => item.author = card,
                        Identity::Checkin => item.checkin = card,
                    }
                }
                Some(Handler::Scalar(scalar)) => {
                    let value = self.scalar(name, &values);
                    let slot = match scalar {
                        Scalar::Name => &mut item.name,
                        Scalar::Url => &mut item.url,
                        Scalar::Uid => &mut item.uid,
                        Scalar::Published => &mut item.published,
                        Scalar::Updated => &mut item.updated,
                        Scalar::Latitude => &mut item.latitude,
                        Scalar::Longitude => &mut item.longitude,
                    };
                    *slot = value;
                }
                Some(Handler::List(list)) => {
                    let strings = self.strings(name, &values);
                    let slot = match list {
                        List::Photo => &mut item.photo,
                        List::Video => &mut item.video,
                        List::Featured => &mut item.featured,
                        List::Category => &mut item.category,
                    };
                    slot.extend(strings);
                }
                None => self.apply_fallback(&mut item, name, &values),
            }
        }

        if item.content.is_none() {
            item.content = summary;
        }
        suppress_redundant_name(&mut item);
        item
    }

    fn apply_reference(
        &self,
        item: &mut Item,
        name: &str,
        relation: Relation,
        values: &[PropertyValue],
    ) {
        for value in values {
            let target = match value {
                PropertyValue::Node(node) if node.is("h-cite") => {
                    let url = node.first_string("url").or(node.value.as_deref());
                    url.map(|u| {
                        let mut cited = self.normalize(node);
                        cited.kind = "entry".to_string();
                        item.refs.insert(u.to_string(), cited);
                        u.to_string()
                    })
                }
                other => other.plain().map(str::to_string),
            };

            match target {
                Some(url) => {
                    let list = match relation {
                        Relation::LikeOf => &mut item.like_of,
                        Relation::RepostOf => &mut item.repost_of,
                        Relation::BookmarkOf => &mut item.bookmark_of,
                        Relation::InReplyTo => &mut item.in_reply_to,
                    };
                    list.push(url);
                }
                None => self.skip(name, "reference value has no url"),
            }
        }
    }

    fn content(&self, name: &str, values: &[PropertyValue]) -> Option<Content> {
        match values.first() {
            Some(PropertyValue::Text(text)) => Some(Content::text(text.clone())),
            Some(PropertyValue::Markup { html, text }) => Some(Content {
                html: Some(html.clone()),
                text: Some(text.clone()),
            }),
            _ => {
                self.skip(name, "expected text or markup");
                None
            }
        }
    }

    fn card(&self, name: &str, values: &[PropertyValue]) -> Option<Card> {
        match values.first() {
            Some(PropertyValue::Node(node)) => Some(card_from(node)),
            other => {
                tracing::warn!("Property {} is not convertible to a card: {:?}", name, other);
                self.dropped.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn scalar(&self, name: &str, values: &[PropertyValue]) -> Option<String> {
        let value = match values.first() {
            Some(v @ (PropertyValue::Text(_) | PropertyValue::Node(_))) => v.plain(),
            _ => None,
        };
        if value.is_none() {
            self.skip(name, "expected a string");
        }
        value.map(str::to_string)
    }

    fn strings(&self, name: &str, values: &[PropertyValue]) -> Vec<String> {
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match value.plain() {
                Some(s) => out.push(s.to_string()),
                None => self.skip(name, "expected a string list"),
            }
        }
        out
    }

    /// Properties without a handler are kept by shape: nested nodes as typed
    /// items, strings and string lists as plain values, markup as an object.
    fn apply_fallback(&self, item: &mut Item, name: &str, values: &[PropertyValue]) {
        match Shape::of(values) {
            Shape::NestedNode(node) => {
                let nested = self.build(node);
                item.nested.insert(name.to_string(), nested);
            }
            Shape::String(s) => {
                item.extra.insert(name.to_string(), Value::String(s.to_string()));
            }
            Shape::StringList(list) => {
                let list = list.into_iter().map(|s| Value::String(s.to_string())).collect();
                item.extra.insert(name.to_string(), Value::Array(list));
            }
            Shape::StructuredContent { html, text } => {
                item.extra.insert(
                    name.to_string(),
                    serde_json::json!({ "html": html, "text": text }),
                );
            }
            Shape::Unknown => self.skip(name, "unrecognized value shape"),
        }
    }

    fn skip(&self, name: &str, reason: &str) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Skipping property {}: {}", name, reason);
    }
}

/// Build a card from the string properties of a node.
pub fn card_from(node: &Microformat) -> Card {
    let text = |prop: &str| -> Option<String> {
        node.properties
            .get(prop)?
            .first()
            .map(PropertyValue::decode)
            .and_then(|v| match v {
                PropertyValue::Text(s) => Some(s),
                _ => None,
            })
    };

    let mut card = Card {
        name: text("name"),
        url: text("url"),
        photo: text("photo"),
        locality: text("locality"),
        country_name: text("country-name"),
        latitude: text("latitude"),
        longitude: text("longitude"),
        ..Default::default()
    };
    card.refresh_filled();
    card
}

fn inherit_author(items: &mut [Item], author: &Card) {
    for item in items {
        if !item.author.as_ref().is_some_and(|a| a.filled) {
            item.author = Some(author.clone());
        }
    }
}

/// Clear a title that repeats the content, or that a like carries only as
/// the liked page's title.
fn suppress_redundant_name(item: &mut Item) {
    let Some(name) = item.name.as_deref() else {
        return;
    };

    let repeats_content = item
        .content
        .as_ref()
        .and_then(|c| c.text.as_deref())
        .is_some_and(|text| text.trim() == name.trim());
    let bare_like =
        !item.like_of.is_empty() && !item.content.as_ref().is_some_and(Content::has_html);

    if repeats_content || bare_like {
        item.name = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry() -> Microformat {
        Microformat::new("h-entry")
    }

    fn card(name: &str, url: &str, photo: &str) -> Microformat {
        Microformat::new("h-card")
            .with_property("name", json!(name))
            .with_property("url", json!(url))
            .with_property("photo", json!(photo))
    }

    fn cite(url: &str, name: &str) -> serde_json::Value {
        Microformat::new("h-cite")
            .with_property("url", json!(url))
            .with_property("name", json!(name))
            .with_property("content", json!("Cited body"))
            .to_value()
    }

    #[test]
    fn test_content_bare_string() {
        let node = entry().with_property("content", json!("Just text"));
        let item = Normalizer::new().normalize(&node);
        let content = item.content.unwrap();
        assert_eq!(content.text.as_deref(), Some("Just text"));
        assert_eq!(content.html, None);
    }

    #[test]
    fn test_content_structured_renames_value() {
        let node = entry().with_property("content", json!({"html": "<p>Hi</p>", "value": "Hi"}));
        let item = Normalizer::new().normalize(&node);
        assert_eq!(
            item.content,
            Some(Content {
                html: Some("<p>Hi</p>".into()),
                text: Some("Hi".into()),
            })
        );
    }

    #[test]
    fn test_summary_used_when_content_missing() {
        let node = entry().with_property("summary", json!("Short"));
        let item = Normalizer::new().normalize(&node);
        assert_eq!(item.content, Some(Content::text("Short")));

        let node = entry()
            .with_property("summary", json!("Short"))
            .with_property("content", json!("Long body"));
        let item = Normalizer::new().normalize(&node);
        assert_eq!(item.content, Some(Content::text("Long body")));
    }

    #[test]
    fn test_name_equal_to_content_is_cleared() {
        let node = entry()
            .with_property("name", json!("  Hello world "))
            .with_property("content", json!({"html": "<p>Hello world</p>", "value": "Hello world\n"}));
        let item = Normalizer::new().normalize(&node);
        assert_eq!(item.name, None);
    }

    #[test]
    fn test_distinct_name_is_kept() {
        let node = entry()
            .with_property("name", json!("A title"))
            .with_property("content", json!("A body"));
        let item = Normalizer::new().normalize(&node);
        assert_eq!(item.name.as_deref(), Some("A title"));
    }

    #[test]
    fn test_like_without_html_clears_name() {
        let node = entry()
            .with_property("name", json!("Liked: a post"))
            .with_property("like-of", json!("https://example.com/post"));
        let item = Normalizer::new().normalize(&node);
        assert_eq!(item.name, None);
        assert_eq!(item.like_of, vec!["https://example.com/post"]);

        let node = entry()
            .with_property("name", json!("Liked: a post"))
            .with_property("like-of", json!("https://example.com/post"))
            .with_property("content", json!({"html": "<p>Great</p>", "value": "Great"}));
        let item = Normalizer::new().normalize(&node);
        assert_eq!(item.name.as_deref(), Some("Liked: a post"));
    }

    #[test]
    fn test_cite_reference_populates_refs() {
        for prop in ["in-reply-to", "like-of", "bookmark-of", "repost-of"] {
            let node = entry().with_property(prop, cite("https://other.example/1", "Other post"));
            let item = Normalizer::new().normalize(&node);

            assert_eq!(item.refs.len(), 1, "{}", prop);
            let cited = &item.refs["https://other.example/1"];
            assert_eq!(cited.kind, "entry");
            assert_eq!(cited.name.as_deref(), Some("Other post"));
            assert!(cited.published.is_some());

            let list = match prop {
                "in-reply-to" => &item.in_reply_to,
                "like-of" => &item.like_of,
                "bookmark-of" => &item.bookmark_of,
                _ => &item.repost_of,
            };
            assert_eq!(list, &vec!["https://other.example/1".to_string()]);
        }
    }

    #[test]
    fn test_mixed_references_keep_source_order() {
        let node = entry()
            .with_property("in-reply-to", json!("https://a.example/"))
            .with_property("in-reply-to", cite("https://b.example/", "B"))
            .with_property(
                "in-reply-to",
                Microformat::new("h-entry")
                    .with_property("url", json!("https://c.example/"))
                    .to_value(),
            );
        let item = Normalizer::new().normalize(&node);
        assert_eq!(
            item.in_reply_to,
            vec!["https://a.example/", "https://b.example/", "https://c.example/"]
        );
        assert_eq!(item.refs.keys().collect::<Vec<_>>(), vec!["https://b.example/"]);
    }

    #[test]
    fn test_author_card() {
        let node = entry().with_property(
            "author",
            card("Alice", "https://alice.example/", "https://alice.example/me.jpg").to_value(),
        );
        let item = Normalizer::new().normalize(&node);
        let author = item.author.unwrap();
        assert_eq!(author.kind, "card");
        assert_eq!(author.name.as_deref(), Some("Alice"));
        assert!(author.filled);
    }

    #[test]
    fn test_author_string_is_skipped_not_fatal() {
        let normalizer = Normalizer::new();
        let node = entry()
            .with_property("author", json!("https://alice.example/"))
            .with_property("name", json!("Still here"));
        let item = normalizer.normalize(&node);
        assert!(item.author.is_none());
        assert_eq!(item.name.as_deref(), Some("Still here"));
        assert_eq!(normalizer.dropped_properties(), 1);
    }

    #[test]
    fn test_checkin_card() {
        let place = Microformat::new("h-card")
            .with_property("name", json!("Cafe"))
            .with_property("locality", json!("Amsterdam"))
            .with_property("country-name", json!("NL"));
        let node = entry().with_property("checkin", place.to_value());
        let item = Normalizer::new().normalize(&node);
        let checkin = item.checkin.unwrap();
        assert_eq!(checkin.locality.as_deref(), Some("Amsterdam"));
        assert_eq!(checkin.country_name.as_deref(), Some("NL"));
    }

    #[test]
    fn test_mismatched_scalar_is_skipped() {
        let normalizer = Normalizer::new();
        let node = entry()
            .with_property("published", json!({"html": "<time>x</time>", "value": "x"}))
            .with_property("url", json!("https://example.com/1"));
        let item = normalizer.normalize(&node);
        assert_eq!(item.url.as_deref(), Some("https://example.com/1"));
        // falls back to the normalization time
        assert!(item.published.is_some());
        assert_eq!(normalizer.dropped_properties(), 1);
    }

    #[test]
    fn test_published_defaults_to_now() {
        let item = Normalizer::new().normalize(&entry());
        let published = item.published.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&published).is_ok());
    }

    #[test]
    fn test_photo_and_category_lists() {
        let node = entry()
            .with_property("photo", json!("https://example.com/1.jpg"))
            .with_property("photo", json!({"value": "https://example.com/2.jpg", "alt": "two"}))
            .with_property("category", json!("rust"))
            .with_property(
                "category",
                card("Bob", "https://bob.example/", "https://bob.example/b.jpg").to_value(),
            );
        let item = Normalizer::new().normalize(&node);
        assert_eq!(
            item.photo,
            vec!["https://example.com/1.jpg", "https://example.com/2.jpg"]
        );
        assert_eq!(item.category, vec!["rust", "https://bob.example/"]);
    }

    #[test]
    fn test_unlisted_properties_fall_back_by_shape() {
        let normalizer = Normalizer::new();
        let location = Microformat::new("h-adr").with_property("locality", json!("Berlin"));
        let node = entry()
            .with_property("location", location.to_value())
            .with_property("rsvp", json!("yes"))
            .with_property("syndication", json!("https://a.example/"))
            .with_property("syndication", json!("https://b.example/"))
            .with_property("note", json!({"html": "<i>n</i>", "value": "n"}))
            .with_property("weight", json!(42));
        let item = normalizer.normalize(&node);

        let nested = &item.nested["location"];
        assert_eq!(nested.kind, "adr");
        assert_eq!(nested.extra["locality"], json!("Berlin"));
        assert_eq!(item.extra["rsvp"], json!("yes"));
        assert_eq!(
            item.extra["syndication"],
            json!(["https://a.example/", "https://b.example/"])
        );
        assert_eq!(item.extra["note"], json!({"html": "<i>n</i>", "text": "n"}));
        assert!(!item.extra.contains_key("weight"));
        assert_eq!(normalizer.dropped_properties(), 1);
    }

    #[test]
    fn test_feed_children_become_items() {
        let feed = Microformat::new("h-feed")
            .with_property("name", json!("My feed"))
            .with_child(entry().with_property("name", json!("One")))
            .with_child(entry().with_property("name", json!("Two")))
            .with_child(entry().with_property("name", json!("Three")));
        let doc = Document { items: vec![feed] };
        let items = Normalizer::new().normalize_document(&doc);
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.kind == "entry"));
        assert_eq!(items[2].name.as_deref(), Some("Three"));
    }

    #[test]
    fn test_entry_children_are_flattened() {
        let reply = entry()
            .with_property("name", json!("Reply"))
            .with_child(entry().with_property("name", json!("Nested reply")));
        let parent = entry()
            .with_property("name", json!("Parent"))
            .with_child(reply)
            .with_child(card("Bob", "https://bob.example/", "https://bob.example/b.jpg"));
        let doc = Document {
            items: vec![
                parent,
                card("Alice", "https://alice.example/", "https://alice.example/a.jpg"),
            ],
        };

        let items = Normalizer::new().normalize_document(&doc);
        let names: Vec<_> = items.iter().map(|i| i.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![Some("Parent"), Some("Reply"), Some("Nested reply")]
        );
        assert!(items
            .iter()
            .all(|i| i.author.as_ref().unwrap().name.as_deref() == Some("Alice")));
    }

    #[test]
    fn test_feed_entry_children_are_flattened() {
        let feed = Microformat::new("h-feed").with_child(
            entry()
                .with_property("name", json!("Post"))
                .with_child(Microformat::new("h-event").with_property("name", json!("Talk"))),
        );
        let items = Normalizer::new().normalize_document(&Document { items: vec![feed] });
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].kind, "event");
        assert_eq!(items[1].name.as_deref(), Some("Talk"));
    }

    #[test]
    fn test_author_inherited_from_sibling_card() {
        let own = card("Carol", "https://carol.example/", "https://carol.example/c.jpg");
        let feed = Microformat::new("h-feed")
            .with_child(entry().with_property("content", json!("first")))
            .with_child(entry().with_property("content", json!("second")))
            .with_child(
                entry()
                    .with_property("content", json!("third"))
                    .with_property("author", own.to_value()),
            );
        let doc = Document {
            items: vec![
                card("Alice", "https://alice.example/", "https://alice.example/a.jpg"),
                feed,
            ],
        };
        let items = Normalizer::new().normalize_document(&doc);
        assert_eq!(items.len(), 3);

        for item in &items[..2] {
            let author = item.author.as_ref().unwrap();
            assert_eq!(author.name.as_deref(), Some("Alice"));
            assert_eq!(author.url.as_deref(), Some("https://alice.example/"));
            assert_eq!(author.photo.as_deref(), Some("https://alice.example/a.jpg"));
        }
        assert_eq!(items[2].author.as_ref().unwrap().name.as_deref(), Some("Carol"));
    }

    #[test]
    fn test_unfilled_author_still_inherits() {
        let empty = Microformat::new("h-card").with_property("locality", json!("Nowhere"));
        let feed = Microformat::new("h-feed")
            .with_child(card("Dana", "https://dana.example/", "https://dana.example/d.jpg"))
            .with_child(entry().with_property("author", empty.to_value()));
        let items = Normalizer::new().normalize_document(&Document { items: vec![feed] });
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].author.as_ref().unwrap().name.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_feed_author_property_preferred() {
        let feed = Microformat::new("h-feed")
            .with_property(
                "author",
                card("Erin", "https://erin.example/", "https://erin.example/e.jpg").to_value(),
            )
            .with_child(entry());
        let doc = Document {
            items: vec![
                card("Page", "https://page.example/", "https://page.example/p.jpg"),
                feed,
            ],
        };
        let items = Normalizer::new().normalize_document(&doc);
        assert_eq!(items[0].author.as_ref().unwrap().name.as_deref(), Some("Erin"));
    }

    #[test]
    fn test_top_level_entries_without_feed() {
        let doc = Document {
            items: vec![
                entry().with_property("name", json!("Solo")),
                card("Alice", "https://alice.example/", "https://alice.example/a.jpg"),
                Microformat::new("h-event").with_property("name", json!("Meetup")),
            ],
        };
        let items = Normalizer::new().normalize_document(&doc);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, "entry");
        assert_eq!(items[1].kind, "event");
        assert!(items.iter().all(|i| i.author.as_ref().unwrap().filled));
    }
}
