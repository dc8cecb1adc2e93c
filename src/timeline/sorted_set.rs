use std::sync::Arc;

use crate::app::{BrookError, Result};
use crate::domain::{Item, Timeline};
use crate::store::{FlagSet, RankedSet};
use crate::timeline::{build_timeline, cursor, fetch_page, read_key, TimelineBackend};

/// Ranked timeline: one collection per channel, scored by a per-channel
/// counter. The item id is its score.
pub struct SortedSetTimeline<S> {
    channel: String,
    store: Arc<S>,
}

impl<S: RankedSet + FlagSet> SortedSetTimeline<S> {
    pub fn init(channel: &str, store: Arc<S>) -> Result<Self> {
        store.ping()?;
        Ok(Self {
            channel: channel.to_string(),
            store,
        })
    }

    fn parse_score(raw: Option<&str>) -> Result<Option<i64>> {
        cursor(raw)
            .map(|c| {
                c.parse::<i64>()
                    .map_err(|_| BrookError::InvalidCursor(c.to_string()))
            })
            .transpose()
    }
}

impl<S> TimelineBackend for SortedSetTimeline<S>
where
    S: RankedSet + FlagSet + Send + Sync,
{
    fn items(&self, before: Option<&str>, after: Option<&str>) -> Result<Timeline> {
        let lower = Self::parse_score(before)?;
        let upper = Self::parse_score(after)?;

        let (members, has_older) = fetch_page(
            lower,
            upper,
            |lower, upper, order, limit| {
                self.store
                    .range_ranked(&self.channel, lower, upper, order, limit)
            },
            |m| m.score,
        )?;

        let entries = members.into_iter().map(|m| (m.member, m.payload)).collect();
        build_timeline(
            self.store.as_ref(),
            &self.channel,
            entries,
            has_older,
            cursor(before),
        )
    }

    fn count(&self) -> Result<usize> {
        self.store.count_ranked(&self.channel)
    }

    fn add_item(&self, mut item: Item) -> Result<Option<String>> {
        item.id = None;
        item.read = false;
        let payload = serde_json::to_string(&item)?;

        let id = self.store.insert_next(&self.channel, &payload)?.to_string();
        tracing::debug!("Added item {} to sorted-set timeline {}", id, self.channel);
        Ok(Some(id))
    }

    fn mark_read(&self, ids: &[String]) -> Result<()> {
        let mut known = Vec::with_capacity(ids.len());
        for id in ids {
            if self.store.has_ranked(&self.channel, id)? {
                known.push(id.clone());
            }
        }

        if !known.is_empty() {
            self.store.set_flags(&read_key(&self.channel), &known)?;
        }
        Ok(())
    }
}
