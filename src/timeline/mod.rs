//! Per-channel timeline storage strategies.
//!
//! Every strategy implements [`TimelineBackend`]. Pages are newest first;
//! `after` walks towards older items and `before` towards newer ones, both
//! bounds exclusive.

pub mod null;
pub mod selector;
pub mod sorted_set;
pub mod stream;

use std::collections::HashSet;

use crate::app::Result;
use crate::domain::{Item, Paging, Timeline};
use crate::store::{FlagSet, Order};

pub use null::NullTimeline;
pub use selector::{resolve_channel_type, select_backend, NOTIFICATIONS_CHANNEL};
pub use sorted_set::SortedSetTimeline;
pub use stream::StreamTimeline;

pub const PAGE_SIZE: usize = 20;

pub trait TimelineBackend: Send + Sync {
    /// A page of items bounded by the given cursors. Empty cursors are unbounded.
    fn items(&self, before: Option<&str>, after: Option<&str>) -> Result<Timeline>;
    fn count(&self) -> Result<usize>;
    /// Assign the item a fresh id and persist it. Returns the id, or `None`
    /// when the strategy keeps nothing.
    fn add_item(&self, item: Item) -> Result<Option<String>>;
    /// Flag the given ids as read. Ids not in the channel are ignored.
    fn mark_read(&self, ids: &[String]) -> Result<()>;
}

pub(crate) fn cursor(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|c| !c.is_empty())
}

pub(crate) fn read_key(channel: &str) -> String {
    format!("{}:read", channel)
}

/// Fetch one newest-first page through a range primitive.
///
/// `range(lower, upper, order, limit)` must return entries strictly between
/// the bounds. Returns the page and whether older entries exist beyond it.
pub(crate) fn fetch_page<K, T, R, F>(
    before: Option<K>,
    after: Option<K>,
    mut range: R,
    key_of: F,
) -> Result<(Vec<T>, bool)>
where
    K: Copy,
    R: FnMut(Option<K>, Option<K>, Order, usize) -> Result<Vec<T>>,
    F: Fn(&T) -> K,
{
    let entries = match (before, after) {
        (Some(_), None) => {
            let mut newer = range(before, None, Order::Ascending, PAGE_SIZE)?;
            newer.reverse();
            newer
        }
        _ => range(before, after, Order::Descending, PAGE_SIZE)?,
    };

    let has_older = match entries.last() {
        Some(last) => !range(None, Some(key_of(last)), Order::Descending, 1)?.is_empty(),
        None => false,
    };

    Ok((entries, has_older))
}

/// Turn stored `(id, payload)` pairs into a [`Timeline`], applying read state.
pub(crate) fn build_timeline<S: FlagSet + ?Sized>(
    store: &S,
    channel: &str,
    entries: Vec<(String, String)>,
    has_older: bool,
    before: Option<&str>,
) -> Result<Timeline> {
    let ids: Vec<String> = entries.iter().map(|(id, _)| id.clone()).collect();
    let read: HashSet<String> = store.flagged(&read_key(channel), &ids)?.into_iter().collect();

    let mut items = Vec::with_capacity(entries.len());
    for (id, payload) in entries {
        let mut item: Item = serde_json::from_str(&payload)?;
        item.read = read.contains(&id);
        item.id = Some(id);
        items.push(item);
    }

    let paging = Paging {
        before: items
            .first()
            .and_then(|i| i.id.clone())
            .or_else(|| before.map(str::to_string)),
        after: if has_older {
            items.last().and_then(|i| i.id.clone())
        } else {
            None
        },
    };

    Ok(Timeline { items, paging })
}
