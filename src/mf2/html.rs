//! Microformats2 extraction from HTML.
//!
//! Covers the parts of the mf2 parsing rules the normalizer consumes:
//! root classes, `p-`/`u-`/`dt-`/`e-` properties, nested items (as property
//! values or children) and implied `name`, `photo` and `url`. The
//! value-class pattern and backcompat classes are not supported.

use scraper::{ElementRef, Html};
use serde_json::{json, Value};
use url::Url;

use crate::app::Result;
use crate::fetcher::MicroformatParser;
use crate::mf2::{Document, Microformat};

/// Parses HTML pages into mf2 documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl MicroformatParser for HtmlParser {
    fn parse(&self, html: &str, base: &Url) -> Result<Document> {
        let page = Html::parse_document(html);
        let mut items = Vec::new();
        find_roots(page.root_element(), base, &mut items);
        Ok(Document { items })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Plain,
    Url,
    Date,
    Embedded,
}

fn root_types(el: &ElementRef) -> Vec<String> {
    let mut types: Vec<String> = el
        .value()
        .classes()
        .filter(|c| c.strip_prefix("h-").is_some_and(valid_name))
        .map(str::to_string)
        .collect();
    types.sort();
    types
}

fn property_classes(el: &ElementRef) -> Vec<(Prefix, String)> {
    el.value()
        .classes()
        .filter_map(|class| {
            let (prefix, name) = if let Some(n) = class.strip_prefix("p-") {
                (Prefix::Plain, n)
            } else if let Some(n) = class.strip_prefix("u-") {
                (Prefix::Url, n)
            } else if let Some(n) = class.strip_prefix("dt-") {
                (Prefix::Date, n)
            } else if let Some(n) = class.strip_prefix("e-") {
                (Prefix::Embedded, n)
            } else {
                return None;
            };
            valid_name(name).then(|| (prefix, name.to_string()))
        })
        .collect()
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn find_roots(el: ElementRef, base: &Url, out: &mut Vec<Microformat>) {
    for child in el.child_elements() {
        if root_types(&child).is_empty() {
            find_roots(child, base, out);
        } else {
            out.push(parse_item(child, base));
        }
    }
}

/// Which kinds of explicit properties an item has; drives implication.
#[derive(Debug, Default)]
struct Seen {
    nested: bool,
    text: bool,
    url: bool,
}

impl Seen {
    fn mark(&mut self, prefix: Prefix) {
        match prefix {
            Prefix::Plain | Prefix::Embedded => self.text = true,
            Prefix::Url => self.url = true,
            Prefix::Date => {}
        }
    }
}

fn parse_item(el: ElementRef, base: &Url) -> Microformat {
    let mut item = Microformat {
        types: root_types(&el),
        ..Default::default()
    };
    let mut seen = Seen::default();
    collect_properties(el, base, &mut item, &mut seen);
    imply_properties(el, base, &mut item, &seen);
    item
}

fn collect_properties(el: ElementRef, base: &Url, item: &mut Microformat, seen: &mut Seen) {
    for child in el.child_elements() {
        let props = property_classes(&child);
        for (prefix, _) in &props {
            seen.mark(*prefix);
        }

        if !root_types(&child).is_empty() {
            seen.nested = true;
            let nested = parse_item(child, base);
            if props.is_empty() {
                item.children.push(nested);
                continue;
            }
            for (prefix, name) in props {
                let mut value = nested.clone();
                value.value = match prefix {
                    Prefix::Url => nested.first_string("url").map(str::to_string),
                    _ => nested.first_string("name").map(str::to_string),
                }
                .or_else(|| Some(text_content(&child)));
                push(item, &name, value.to_value());
            }
            continue;
        }

        for (prefix, name) in props {
            let value = match prefix {
                Prefix::Plain => Value::String(plain_value(&child)),
                Prefix::Url => Value::String(url_value(&child, base)),
                Prefix::Date => Value::String(date_value(&child)),
                Prefix::Embedded => json!({
                    "html": child.inner_html().trim(),
                    "value": text_content(&child),
                }),
            };
            push(item, &name, value);
        }
        collect_properties(child, base, item, seen);
    }
}

fn push(item: &mut Microformat, name: &str, value: Value) {
    item.properties
        .entry(name.to_string())
        .or_default()
        .push(value);
}

fn imply_properties(el: ElementRef, base: &Url, item: &mut Microformat, seen: &Seen) {
    if !item.properties.contains_key("name") && !seen.text && !seen.nested {
        let name = attr_of(el, "img", "alt")
            .or_else(|| attr_of(el, "area", "alt"))
            .or_else(|| attr_of(el, "abbr", "title"))
            .or_else(|| only_child_attr(el, "img", "alt"))
            .unwrap_or_else(|| text_content(&el));
        if !name.is_empty() {
            push(item, "name", Value::String(name));
        }
    }

    if seen.url || seen.nested {
        return;
    }

    if !item.properties.contains_key("photo") {
        if let Some(src) = attr_of(el, "img", "src").or_else(|| only_child_attr(el, "img", "src")) {
            push(item, "photo", Value::String(resolve(base, &src)));
        }
    }

    if !item.properties.contains_key("url") {
        if let Some(href) = attr_of(el, "a", "href").or_else(|| only_child_attr(el, "a", "href")) {
            push(item, "url", Value::String(resolve(base, &href)));
        }
    }
}

/// `attr` of `el` itself when it is a `tag` element.
fn attr_of(el: ElementRef, tag: &str, attr: &str) -> Option<String> {
    (el.value().name() == tag)
        .then(|| el.value().attr(attr))
        .flatten()
        .map(str::to_string)
}

/// `attr` of the only child element when it is a `tag` element.
fn only_child_attr(el: ElementRef, tag: &str, attr: &str) -> Option<String> {
    let mut children = el.child_elements();
    match (children.next(), children.next()) {
        (Some(child), None) if root_types(&child).is_empty() => attr_of(child, tag, attr),
        _ => None,
    }
}

fn text_content(el: &ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn plain_value(el: &ElementRef) -> String {
    let element = el.value();
    let attr = match element.name() {
        "abbr" | "link" => element.attr("title"),
        "data" | "input" => element.attr("value"),
        "img" | "area" => element.attr("alt"),
        _ => None,
    };
    attr.map(str::to_string)
        .unwrap_or_else(|| text_content(el))
}

fn url_value(el: &ElementRef, base: &Url) -> String {
    let element = el.value();
    let attr = match element.name() {
        "a" | "area" | "link" => element.attr("href"),
        "img" | "audio" | "video" | "source" | "iframe" => element.attr("src"),
        "object" => element.attr("data"),
        _ => None,
    };
    match attr {
        Some(raw) => resolve(base, raw),
        None => plain_value(el),
    }
}

fn date_value(el: &ElementRef) -> String {
    let element = el.value();
    let attr = match element.name() {
        "time" | "ins" | "del" => element.attr("datetime"),
        "abbr" => element.attr("title"),
        "data" | "input" => element.attr("value"),
        _ => None,
    };
    attr.map(str::to_string)
        .unwrap_or_else(|| text_content(el))
}

fn resolve(base: &Url, raw: &str) -> String {
    base.join(raw.trim())
        .map(String::from)
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Normalizer;

    fn parse(html: &str) -> Document {
        let base = Url::parse("https://example.org/blog/").unwrap();
        HtmlParser.parse(html, &base).unwrap()
    }

    const PAGE: &str = r#"<!doctype html>
<html><body>
  <div class="h-card"><a class="p-name u-url" href="/">Alice</a>
    <img class="u-photo" src="/alice.jpg" alt=""></div>
  <main class="h-feed">
    <h1 class="p-name">Notes</h1>
    <article class="h-entry">
      <a class="u-url" href="posts/1">#</a>
      <time class="dt-published" datetime="2024-05-01T10:00:00Z">May 1</time>
      <div class="e-content"><p>Hello <b>world</b></p></div>
      <a class="u-category" href="/tags/rust">rust</a>
    </article>
    <article class="h-entry">
      <p class="p-name">Second</p>
      <div class="u-like-of h-cite">
        <a class="u-url" href="https://bob.example/2">liked</a>
        <span class="p-name">Bob's post</span>
      </div>
    </article>
  </main>
</body></html>"#;

    #[test]
    fn test_finds_roots_and_children() {
        let doc = parse(PAGE);
        assert_eq!(doc.items.len(), 2);
        assert!(doc.items[0].is("h-card"));
        assert!(doc.items[1].is("h-feed"));
        assert_eq!(doc.items[1].children.len(), 2);
        assert_eq!(doc.items[1].first_string("name"), Some("Notes"));
    }

    #[test]
    fn test_property_prefixes() {
        let doc = parse(PAGE);
        let entry = &doc.items[1].children[0];
        assert_eq!(entry.first_string("url"), Some("https://example.org/blog/posts/1"));
        assert_eq!(entry.first_string("published"), Some("2024-05-01T10:00:00Z"));
        assert_eq!(entry.first_string("category"), Some("https://example.org/tags/rust"));

        let content = &entry.properties["content"][0];
        assert_eq!(content["html"], "<p>Hello <b>world</b></p>");
        assert_eq!(content["value"], "Hello world");
        assert!(!entry.properties.contains_key("name"));
    }

    #[test]
    fn test_nested_property_item() {
        let doc = parse(PAGE);
        let like = &doc.items[1].children[1].properties["like-of"][0];
        assert_eq!(like["type"][0], "h-cite");
        assert_eq!(like["value"], "https://bob.example/2");
        assert_eq!(like["properties"]["name"][0], "Bob's post");
    }

    #[test]
    fn test_implied_properties() {
        let doc = parse(
            r#"<a class="h-card" href="https://carol.example/">Carol</a>
               <span class="h-card"><img src="c.png" alt="Carol pic"></span>"#,
        );
        let link = &doc.items[0];
        assert_eq!(link.first_string("name"), Some("Carol"));
        assert_eq!(link.first_string("url"), Some("https://carol.example/"));

        let pic = &doc.items[1];
        assert_eq!(pic.first_string("photo"), Some("https://example.org/blog/c.png"));
        assert_eq!(pic.first_string("name"), Some("Carol pic"));
    }

    #[test]
    fn test_page_without_microformats() {
        let doc = parse("<p class=\"intro p-name\">Nothing here</p>");
        assert!(doc.items.is_empty());
    }

    #[test]
    fn test_parsed_page_normalizes() {
        let items = Normalizer::new().normalize_document(&parse(PAGE));
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.content.as_ref().unwrap().text.as_deref(), Some("Hello world"));
        assert_eq!(first.author.as_ref().unwrap().name.as_deref(), Some("Alice"));

        let second = &items[1];
        assert_eq!(second.like_of, vec!["https://bob.example/2".to_string()]);
        assert_eq!(
            second.refs["https://bob.example/2"].name.as_deref(),
            Some("Bob's post")
        );
    }
}
