//! Stream service plugin contract
//!
//! Every supported streaming platform implements [`StreamService`]. The
//! aggregator calls each operation unconditionally: failures come back as
//! `None` or an empty list, never as an error.

use async_trait::async_trait;

use crate::animelab::AnimeLabService;
use crate::client::ServiceClient;
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::season::Season;
use crate::types::{Episode, Stream, UnprocessedStream};

/// Unified stream service trait
#[async_trait]
pub trait StreamService: Send + Sync {
    /// Stable service key (e.g. "animelab")
    fn key(&self) -> &'static str;

    /// Human-readable service name
    fn name(&self) -> &'static str;

    /// Whether the service needs per-user authentication
    fn is_authenticated(&self) -> bool;

    /// Most recent episode of a stream, if the service can find one
    async fn get_latest_episode(&self, stream: &Stream) -> Option<Episode>;

    /// Refreshed metadata for a stream, or `None` when nothing changed
    async fn get_stream_info(&self, stream: &Stream) -> Option<Stream>;

    /// Shows listed by the service, optionally limited to one season
    async fn get_seasonal_streams(
        &self,
        year: Option<i32>,
        season: Option<Season>,
    ) -> Vec<UnprocessedStream>;

    /// Canonical show page URL for a stream
    fn get_stream_link(&self, stream: &Stream) -> String;

    /// Show key found in a URL, if the URL points at this service
    fn extract_show_key(&self, url: &str) -> Option<String>;
}

/// Build every registered stream service
///
/// # Errors
/// Returns an error if the HTTP client cannot be created.
pub fn service_handlers(config: &ServiceConfig) -> Result<Vec<Box<dyn StreamService>>> {
    let client = ServiceClient::new()?;
    let animelab = AnimeLabService::new(client, config.clone())?;
    let services: Vec<Box<dyn StreamService>> = vec![Box::new(animelab)];
    Ok(services)
}

/// Build the stream service registered under `key`
///
/// # Errors
/// Returns an error if the HTTP client cannot be created.
pub fn service_handler(key: &str, config: &ServiceConfig) -> Result<Option<Box<dyn StreamService>>> {
    Ok(service_handlers(config)?
        .into_iter()
        .find(|service| service.key() == key))
}
