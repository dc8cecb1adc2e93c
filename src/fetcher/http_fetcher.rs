use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::app::{BrookError, Result};
use crate::fetcher::{FetchCache, Fetcher, MicroformatParser};
use crate::mf2::Document;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("brook/", env!("CARGO_PKG_VERSION"));

pub struct HttpFetcher {
    client: Client,
    cache: Arc<FetchCache>,
    parser: Arc<dyn MicroformatParser + Send + Sync>,
}

impl HttpFetcher {
    pub fn new(
        parser: Arc<dyn MicroformatParser + Send + Sync>,
        cache: Arc<FetchCache>,
    ) -> Result<Self> {
        Self::with_timeout(parser, cache, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        parser: Arc<dyn MicroformatParser + Send + Sync>,
        cache: Arc<FetchCache>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            cache,
            parser,
        })
    }
}

/// Parse a fetch target, accepting only `http` and `https`.
pub fn normalize_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(BrookError::UnsupportedScheme(raw.to_string())),
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Arc<Document>> {
        let url = normalize_url(url)?;
        let key = url.to_string();

        if let Some(document) = self.cache.get(&key) {
            return Ok(document);
        }

        let response = self.client.get(url.clone()).send().await?;
        response.error_for_status_ref()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("text/html") {
            return Err(BrookError::ContentType {
                url: key,
                content_type,
            });
        }

        let body = response.text().await?;
        let document = Arc::new(self.parser.parse(&body, &url)?);
        self.cache.insert(&key, document.clone());

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mf2::Microformat;

    fn fetcher(cache: Arc<FetchCache>) -> HttpFetcher {
        let parser = |_: &str, _: &Url| -> Result<Document> { Ok(Document::default()) };
        HttpFetcher::new(Arc::new(parser), cache).unwrap()
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://example.com").unwrap().as_str(),
            "https://example.com/"
        );
        assert!(matches!(
            normalize_url("ftp://example.com/feed"),
            Err(BrookError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            normalize_url("example.com"),
            Err(BrookError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let fetcher = fetcher(Arc::new(FetchCache::default()));
        let result = fetcher.fetch("file:///etc/passwd").await;
        assert!(matches!(result, Err(BrookError::UnsupportedScheme(_))));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let cache = Arc::new(FetchCache::default());
        let cached = Arc::new(Document {
            items: vec![Microformat::new("h-feed")],
        });
        cache.insert("https://unreachable.invalid/", cached.clone());

        let fetcher = fetcher(cache);
        let document = fetcher.fetch("https://unreachable.invalid").await.unwrap();
        assert!(Arc::ptr_eq(&document, &cached));
    }
}
