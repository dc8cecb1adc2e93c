use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::app::{BrookError, Result};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::timeline::TimelineBackend;

pub const DEFAULT_WORKERS: usize = 10;

/// Fetches many pages concurrently and appends their items to one timeline.
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Returns the number of items added per URL.
    pub async fn fetch_all(
        &self,
        urls: Vec<String>,
        timeline: Arc<dyn TimelineBackend>,
        normalizer: &Normalizer,
    ) -> Vec<(String, Result<usize>)> {
        let handles: Vec<_> = urls
            .into_iter()
            .map(|url| {
                let fetcher = self.fetcher.clone();
                let semaphore = self.semaphore.clone();
                let timeline = timeline.clone();
                let normalizer = normalizer.clone();

                tokio::spawn(async move {
                    let result = match semaphore.acquire().await {
                        Ok(_permit) => {
                            fetch_into(&fetcher, &url, timeline, &normalizer).await
                        }
                        Err(e) => Err(BrookError::Other(e.to_string())),
                    };
                    (url, result)
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in join_all(handles).await {
            match handle {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        results
    }
}

async fn fetch_into(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    url: &str,
    timeline: Arc<dyn TimelineBackend>,
    normalizer: &Normalizer,
) -> Result<usize> {
    let document = fetcher.fetch(url).await?;
    let items = normalizer.normalize_document(&document);
    let count = items.len();

    // Store writes block on SQLite; keep them off the async workers.
    tokio::task::spawn_blocking(move || {
        for item in items {
            timeline.add_item(item)?;
        }
        Ok::<_, BrookError>(())
    })
    .await
    .map_err(|e| BrookError::Other(e.to_string()))??;

    tracing::info!("Added {} items from {}", count, url);
    Ok(count)
}
