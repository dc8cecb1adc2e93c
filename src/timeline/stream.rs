use std::sync::Arc;

use crate::app::Result;
use crate::domain::{Item, Timeline};
use crate::store::{AppendLog, EntryId, FlagSet};
use crate::timeline::{build_timeline, cursor, fetch_page, read_key, TimelineBackend};

/// Append-only chronological timeline. Ids are assigned by the log.
pub struct StreamTimeline<S> {
    channel: String,
    store: Arc<S>,
}

impl<S: AppendLog + FlagSet> StreamTimeline<S> {
    pub fn init(channel: &str, store: Arc<S>) -> Result<Self> {
        store.ping()?;
        Ok(Self {
            channel: channel.to_string(),
            store,
        })
    }

    fn parse_id(raw: Option<&str>) -> Result<Option<EntryId>> {
        cursor(raw).map(str::parse::<EntryId>).transpose()
    }
}

impl<S> TimelineBackend for StreamTimeline<S>
where
    S: AppendLog + FlagSet + Send + Sync,
{
    fn items(&self, before: Option<&str>, after: Option<&str>) -> Result<Timeline> {
        let lower = Self::parse_id(before)?;
        let upper = Self::parse_id(after)?;

        let (entries, has_older) = fetch_page(
            lower,
            upper,
            |lower, upper, order, limit| {
                self.store
                    .range_log(&self.channel, lower, upper, order, limit)
            },
            |e| e.id,
        )?;

        let entries = entries
            .into_iter()
            .map(|e| (e.id.to_string(), e.payload))
            .collect();
        build_timeline(
            self.store.as_ref(),
            &self.channel,
            entries,
            has_older,
            cursor(before),
        )
    }

    fn count(&self) -> Result<usize> {
        self.store.count_log(&self.channel)
    }

    fn add_item(&self, mut item: Item) -> Result<Option<String>> {
        item.id = None;
        item.read = false;
        let payload = serde_json::to_string(&item)?;

        let id = self.store.append(&self.channel, &payload)?;
        tracing::debug!("Added item {} to stream timeline {}", id, self.channel);
        Ok(Some(id.to_string()))
    }

    fn mark_read(&self, ids: &[String]) -> Result<()> {
        let mut known = Vec::with_capacity(ids.len());
        for raw in ids {
            let Ok(id) = raw.parse::<EntryId>() else {
                continue;
            };
            if self.store.has_entry(&self.channel, id)? {
                known.push(id.to_string());
            }
        }

        if !known.is_empty() {
            self.store.set_flags(&read_key(&self.channel), &known)?;
        }
        Ok(())
    }
}
