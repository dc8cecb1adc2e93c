use crate::app::Result;
use crate::domain::{Item, Timeline};
use crate::timeline::TimelineBackend;

/// Timeline for channels with retention turned off: appends are dropped.
pub struct NullTimeline {
    channel: String,
}

impl NullTimeline {
    pub fn init(channel: &str) -> Result<Self> {
        Ok(Self {
            channel: channel.to_string(),
        })
    }
}

impl TimelineBackend for NullTimeline {
    fn items(&self, _before: Option<&str>, _after: Option<&str>) -> Result<Timeline> {
        Ok(Timeline::empty())
    }

    fn count(&self) -> Result<usize> {
        Ok(0)
    }

    fn add_item(&self, _item: Item) -> Result<Option<String>> {
        tracing::trace!("Discarding item for channel {}", self.channel);
        Ok(None)
    }

    fn mark_read(&self, _ids: &[String]) -> Result<()> {
        Ok(())
    }
}
