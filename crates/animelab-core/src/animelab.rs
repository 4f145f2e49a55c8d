//! AnimeLab stream service
//!
//! AnimeLab publishes simulcasts through undocumented JSON endpoints and only
//! answers requests coming from Australia or New Zealand. Requests are routed
//! through the configured proxy when there is one; otherwise a warning is
//! logged and the request goes out directly.

use async_trait::async_trait;
use chrono::Utc;
use regex_lite::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::api::{LatestEpisode, LatestEpisodePage, SimulcastPage, SimulcastShow};
use crate::client::{ResponseBody, ResponseKind, ServiceClient};
use crate::config::{ProxyAddress, ServiceConfig};
use crate::error::{Result, StreamServiceError};
use crate::season::{is_airing_during_season, Season};
use crate::service::StreamService;
use crate::types::{Episode, Stream, UnprocessedStream};

/// Service key used in stream records
pub const SERVICE_KEY: &str = "animelab";

/// Display name of the service
pub const SERVICE_NAME: &str = "AnimeLab";

const SITE_URL: &str = "http://www.animelab.com";
const API_URL: &str = "http://www.animelab.com/api";

/// Matches show page URLs with or without a scheme
///
/// regex-lite's `\w` is ASCII-only, so a slug is captured up to its first
/// non-ASCII character.
const SHOW_KEY_PATTERN: &str = r"(?i)animelab.com/shows/([\w-]+)";

/// Page sizes fixed by the API endpoints
const SEASONAL_PAGE_SIZE: u32 = 100;
const SHOW_EPISODES_PAGE_SIZE: u32 = 30;
const LATEST_EPISODES_PAGE_SIZE: u32 = 10;

/// URL templates for the AnimeLab site and API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base for public pages (show pages, player)
    pub site: String,
    /// Base for JSON endpoints
    pub api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            site: SITE_URL.to_string(),
            api: API_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Default site pages with a different API base
    pub fn with_api_base(api: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            ..Self::default()
        }
    }

    /// Show page: `{site}/shows/{key}`
    pub fn show_page(&self, key: &str) -> String {
        format!("{}/shows/{}", self.site, key)
    }

    /// Episode player page: `{site}/player/{episode}`
    pub fn player(&self, episode: &str) -> String {
        format!("{}/player/{}", self.site, episode)
    }

    /// Seasonal simulcast listing
    pub fn seasonal_listing(&self, page: u32) -> String {
        format!("{}/simulcasts?limit={}&page={}", self.api, SEASONAL_PAGE_SIZE, page)
    }

    /// Episode listing of a single show
    pub fn show_episodes(&self, id: u64, page: u32) -> String {
        format!(
            "{}/videoentries/show/{}?limit={}&page={}",
            self.api, id, SHOW_EPISODES_PAGE_SIZE, page
        )
    }

    /// Latest aired episodes across all shows, most recent first
    pub fn latest_episodes(&self, page: u32) -> String {
        format!(
            "{}/simulcasts/episodes/latest?limit={}&page={}",
            self.api, LATEST_EPISODES_PAGE_SIZE, page
        )
    }
}

/// Stream service for AnimeLab
///
/// # Example
/// ```no_run
/// use animelab_core::{AnimeLabService, ServiceClient, ServiceConfig, Season, StreamService};
///
/// # async fn example() -> Result<(), animelab_core::StreamServiceError> {
/// let config = ServiceConfig::new().with_setting("proxy", "au-proxy.example:3128");
/// let service = AnimeLabService::new(ServiceClient::new()?, config)?;
///
/// for stream in service.get_seasonal_streams(Some(2021), Some(Season::Winter)).await {
///     println!("{}: {}", stream.show_key, stream.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AnimeLabService {
    client: ServiceClient,
    config: ServiceConfig,
    endpoints: Endpoints,
    show_key_re: Regex,
}

impl AnimeLabService {
    /// Create the service with the public AnimeLab endpoints
    ///
    /// # Errors
    /// Returns an error if the show key pattern cannot be compiled
    pub fn new(client: ServiceClient, config: ServiceConfig) -> Result<Self> {
        Self::with_endpoints(client, config, Endpoints::default())
    }

    /// Create the service with custom endpoints
    ///
    /// Useful for testing against a local server.
    ///
    /// # Errors
    /// Returns an error if the show key pattern cannot be compiled
    pub fn with_endpoints(
        client: ServiceClient,
        config: ServiceConfig,
        endpoints: Endpoints,
    ) -> Result<Self> {
        let show_key_re = Regex::new(SHOW_KEY_PATTERN)
            .map_err(|e| StreamServiceError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            endpoints,
            show_key_re,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Perform a request, routed through the configured proxy if any
    ///
    /// A proxy from the `proxy` setting always wins over the one passed in.
    pub async fn request(
        &self,
        url: &str,
        proxy: Option<ProxyAddress>,
        kind: ResponseKind,
    ) -> Option<ResponseBody> {
        let proxy = self.config.proxy().or(proxy);

        let in_oceania = self
            .config
            .region_hint()
            .is_some_and(|region| region.is_oceania());
        if proxy.is_none() && !in_oceania {
            warn!("AnimeLab requires an AU/NZ IP, but no proxy was supplied");
        }

        self.client.request(url, proxy.as_ref(), kind).await
    }

    /// Fetch a JSON endpoint and decode it into `T`
    async fn request_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let value = self.request(url, None, ResponseKind::Json).await?.into_json()?;

        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                error!(url, error = %e, "Unexpected response from AnimeLab");
                None
            }
        }
    }

    /// Decode a single page entry, skipping it with a warning if it is malformed
    fn decode_entry<T: DeserializeOwned>(entry: &Value, kind: &str) -> Option<T> {
        match serde_json::from_value(entry.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed {} entry", kind);
                None
            }
        }
    }

    /// Translate a latest-feed entry into an episode
    ///
    /// The feed's release date is unreliable, so the episode is stamped with
    /// the current time instead.
    fn episode_from_entry(&self, entry: &LatestEpisode) -> Option<Episode> {
        let number = match u32::try_from(entry.episode_number) {
            Ok(number) if number > 0 => number,
            _ => {
                warn!(number = entry.episode_number, slug = %entry.slug, "Ignoring episode with invalid number");
                return None;
            }
        };

        if entry.slug.is_empty() {
            warn!(number, "Ignoring episode without a slug");
            return None;
        }

        Some(Episode {
            number,
            name: entry.name.clone(),
            link: self.endpoints.player(&entry.slug),
            date: Utc::now(),
        })
    }

    /// Translate a simulcast listing entry into an unprocessed stream
    fn stream_from_show(&self, show: &SimulcastShow) -> UnprocessedStream {
        debug!("Found show {}: \"{}\"", show.slug, show.name);

        UnprocessedStream::new(SERVICE_KEY, show.slug.as_str(), None, show.name.as_str(), 0, 0)
    }
}

#[async_trait]
impl StreamService for AnimeLabService {
    fn key(&self) -> &'static str {
        SERVICE_KEY
    }

    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    fn is_authenticated(&self) -> bool {
        false
    }

    /// Look the show up in the first page of the latest aired feed
    ///
    /// Episodes usually show up in the feed several hours after airing, and
    /// only the ten most recent are checked. `None` means "not among the
    /// latest episodes", not "the show has no episodes".
    async fn get_latest_episode(&self, stream: &Stream) -> Option<Episode> {
        let url = self.endpoints.latest_episodes(0);

        let Some(page) = self.request_json::<LatestEpisodePage>(&url).await else {
            error!("Failed to get recently aired shows list");
            return None;
        };

        let matching = page
            .list
            .iter()
            .find(|entry| entry.get("showSlug").and_then(Value::as_str) == Some(stream.show_key.as_str()));

        if let Some(entry) = matching {
            let entry = Self::decode_entry::<LatestEpisode>(entry, "episode")?;
            return self.episode_from_entry(&entry);
        }

        // TODO: fall back to `Endpoints::show_episodes` once show IDs are known for AnimeLab streams
        warn!(show_key = %stream.show_key, "Skipped checking show-specific episode list");
        None
    }

    async fn get_stream_info(&self, _stream: &Stream) -> Option<Stream> {
        None
    }

    /// List simulcasts from the first page of the seasonal listing
    ///
    /// Later pages are not fetched; a warning reports how many were skipped.
    async fn get_seasonal_streams(
        &self,
        year: Option<i32>,
        season: Option<Season>,
    ) -> Vec<UnprocessedStream> {
        let url = self.endpoints.seasonal_listing(0);

        let Some(page) = self.request_json::<SimulcastPage>(&url).await else {
            error!("Failed to get seasonal shows list");
            return Vec::new();
        };

        let streams = page
            .list
            .iter()
            .filter_map(|entry| Self::decode_entry::<SimulcastShow>(entry, "show"))
            .filter(|show| {
                is_airing_during_season(
                    show.simulcast_start_date,
                    show.simulcast_end_date,
                    year,
                    season,
                )
            })
            .map(|show| self.stream_from_show(&show))
            .collect();

        let remaining_page_count = page.total_page_count.saturating_sub(1);
        if remaining_page_count > 0 {
            warn!("Skipped {} pages of results", remaining_page_count);
        }

        streams
    }

    fn get_stream_link(&self, stream: &Stream) -> String {
        self.endpoints.show_page(&stream.show_key)
    }

    fn extract_show_key(&self, url: &str) -> Option<String> {
        self.show_key_re
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
