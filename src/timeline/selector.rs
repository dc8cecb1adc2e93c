use std::sync::Arc;

use crate::domain::{ChannelSettings, ChannelType};
use crate::store::{AppendLog, FlagSet, RankedSet};
use crate::timeline::{NullTimeline, SortedSetTimeline, StreamTimeline, TimelineBackend};

/// Channel that always uses the stream strategy, whatever its settings say.
pub const NOTIFICATIONS_CHANNEL: &str = "notifications";

/// The strategy a channel resolves to.
pub fn resolve_channel_type(channel: &str, settings: &ChannelSettings) -> ChannelType {
    if channel == NOTIFICATIONS_CHANNEL {
        return ChannelType::Stream;
    }

    match settings.get(channel).map(|s| s.channel_type) {
        None | Some(ChannelType::Unset) => ChannelType::SortedSet,
        Some(declared) => declared,
    }
}

/// Pick and initialize the timeline backend for a channel.
///
/// Returns `None` when the declared type is unknown or the backend fails to
/// initialize; callers treat the channel as temporarily unusable.
pub fn select_backend<S>(
    channel: &str,
    settings: &ChannelSettings,
    store: &Arc<S>,
) -> Option<Box<dyn TimelineBackend>>
where
    S: RankedSet + AppendLog + FlagSet + Send + Sync + 'static,
{
    let channel_type = resolve_channel_type(channel, settings);

    let backend: crate::app::Result<Box<dyn TimelineBackend>> = match channel_type {
        ChannelType::SortedSet => SortedSetTimeline::init(channel, store.clone())
            .map(|t| Box::new(t) as Box<dyn TimelineBackend>),
        ChannelType::Stream => StreamTimeline::init(channel, store.clone())
            .map(|t| Box::new(t) as Box<dyn TimelineBackend>),
        ChannelType::Null => {
            NullTimeline::init(channel).map(|t| Box::new(t) as Box<dyn TimelineBackend>)
        }
        ChannelType::Unset | ChannelType::Unknown => {
            tracing::warn!("Unknown timeline type for channel {}", channel);
            return None;
        }
    };

    match backend {
        Ok(backend) => {
            tracing::debug!("Channel {} uses {} timeline", channel, channel_type);
            Some(backend)
        }
        Err(e) => {
            tracing::warn!("Timeline for channel {} failed to initialize: {}", channel, e);
            None
        }
    }
}
