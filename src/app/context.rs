use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{BrookError, Result};
use crate::config::{Config, FetchConfig};
use crate::domain::ChannelSettings;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::{FetchCache, Fetcher, HttpFetcher, MicroformatParser};
use crate::mf2::Document;
use crate::normalizer::Normalizer;
use crate::store::sqlite::SqliteStore;
use crate::timeline::{select_backend, TimelineBackend};

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub settings: ChannelSettings,
    pub normalizer: Normalizer,
    pub cache: Arc<FetchCache>,
    fetch: FetchConfig,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self> {
        let db_path = match &config.store.path {
            Some(p) => p.clone(),
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Ok(Self::with_store(store, config))
    }

    pub fn in_memory(config: &Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Ok(Self::with_store(store, config))
    }

    fn with_store(store: Arc<SqliteStore>, config: &Config) -> Self {
        Self {
            store,
            settings: config.channels.clone(),
            normalizer: Normalizer::new(),
            cache: Arc::new(FetchCache::new(config.cache.ttl(), config.cache.capacity)),
            fetch: config.fetch.clone(),
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| BrookError::Config("Could not find data directory".into()))?;
        let brook_dir = data_dir.join("brook");
        std::fs::create_dir_all(&brook_dir)?;
        Ok(brook_dir.join("brook.db"))
    }

    /// The backend for a channel, or `None` while the channel is unusable.
    pub fn timeline(&self, channel: &str) -> Option<Box<dyn TimelineBackend>> {
        select_backend(channel, &self.settings, &self.store)
    }

    fn require_timeline(&self, channel: &str) -> Result<Box<dyn TimelineBackend>> {
        self.timeline(channel)
            .ok_or_else(|| BrookError::NoBackend(channel.to_string()))
    }

    /// Normalize a parsed document and append its items to a channel.
    pub fn ingest(&self, channel: &str, document: &Document) -> Result<usize> {
        let timeline = self.require_timeline(channel)?;
        let items = self.normalizer.normalize_document(document);

        let count = items.len();
        for item in items {
            timeline.add_item(item)?;
        }

        tracing::info!("Ingested {} items into {}", count, channel);
        Ok(count)
    }

    /// An HTTP fetcher sharing this context's page cache.
    pub fn http_fetcher(
        &self,
        parser: Arc<dyn MicroformatParser + Send + Sync>,
    ) -> Result<HttpFetcher> {
        HttpFetcher::with_timeout(parser, self.cache.clone(), self.fetch.timeout())
    }

    /// Fetch pages concurrently and append their items to a channel.
    pub async fn fetch_into(
        &self,
        channel: &str,
        urls: Vec<String>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Result<Vec<(String, Result<usize>)>> {
        let timeline: Arc<dyn TimelineBackend> = Arc::from(self.require_timeline(channel)?);
        let parallel = ParallelFetcher::with_workers(fetcher, self.fetch.workers);
        Ok(parallel.fetch_all(urls, timeline, &self.normalizer).await)
    }
}
