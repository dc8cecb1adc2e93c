use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::app::{AppContext, BrookError, Result};
use crate::mf2::{Document, HtmlParser};
use crate::timeline::{resolve_channel_type, TimelineBackend, NOTIFICATIONS_CHANNEL};

fn timeline(ctx: &AppContext, channel: &str) -> Result<Box<dyn TimelineBackend>> {
    ctx.timeline(channel)
        .ok_or_else(|| BrookError::NoBackend(channel.to_string()))
}

pub fn ingest(ctx: &AppContext, channel: &str, path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)?;
    let document = Document::from_json(&json)?;

    let count = ctx.ingest(channel, &document)?;
    println!("Added {} items to {}", count, channel);
    Ok(())
}

pub async fn fetch(ctx: &AppContext, channel: &str, urls: Vec<String>) -> Result<()> {
    let fetcher = Arc::new(ctx.http_fetcher(Arc::new(HtmlParser))?);

    println!("Fetching {} pages into {}...", urls.len(), channel);
    let results = ctx.fetch_into(channel, urls, fetcher).await?;

    let mut total = 0;
    let mut errors = 0;
    for (url, result) in results {
        match result {
            Ok(count) => {
                total += count;
                println!("  {} items from {}", count, url);
            }
            Err(e) => {
                errors += 1;
                eprintln!("  Error fetching {}: {}", url, e);
            }
        }
    }

    println!("Fetch complete: {} items, {} errors", total, errors);
    Ok(())
}

pub fn show_timeline(
    ctx: &AppContext,
    channel: &str,
    before: Option<&str>,
    after: Option<&str>,
) -> Result<()> {
    let page = timeline(ctx, channel)?.items(before, after)?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

pub fn count(ctx: &AppContext, channel: &str) -> Result<()> {
    let count = timeline(ctx, channel)?.count()?;
    println!("{}", count);
    Ok(())
}

pub fn mark_read(ctx: &AppContext, channel: &str, ids: &[String]) -> Result<()> {
    timeline(ctx, channel)?.mark_read(ids)?;
    println!("Marked {} items as read in {}", ids.len(), channel);
    Ok(())
}

pub fn list_channels(ctx: &AppContext) {
    let mut channels: BTreeSet<&str> = ctx.settings.keys().map(String::as_str).collect();
    channels.insert(NOTIFICATIONS_CHANNEL);

    for channel in channels {
        println!(
            "{:<24} {}",
            channel,
            resolve_channel_type(channel, &ctx.settings)
        );
    }
}
