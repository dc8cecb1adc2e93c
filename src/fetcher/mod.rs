pub mod cache;
pub mod http_fetcher;
pub mod parallel;

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;
use crate::mf2::Document;

pub use cache::FetchCache;
pub use http_fetcher::HttpFetcher;
pub use parallel::ParallelFetcher;

/// Turns an HTML page into a microformats document.
pub trait MicroformatParser {
    fn parse(&self, html: &str, base: &Url) -> Result<Document>;
}

impl<F> MicroformatParser for F
where
    F: Fn(&str, &Url) -> Result<Document>,
{
    fn parse(&self, html: &str, base: &Url) -> Result<Document> {
        self(html, base)
    }
}

#[async_trait]
pub trait Fetcher {
    /// Fetch a page and return its parsed microformats.
    async fn fetch(&self, url: &str) -> Result<Arc<Document>>;
}
