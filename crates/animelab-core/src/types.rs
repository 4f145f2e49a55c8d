//! Data types shared with the aggregator
//!
//! Streams and episodes are built fresh for every API response and handed
//! over by value; services keep no references to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A show discovered on a service but not yet matched to a known show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnprocessedStream {
    /// Key of the service that listed the show (e.g. "animelab")
    pub service_key: String,
    /// Service-specific show identifier, usually a URL slug
    pub show_key: String,
    /// Numeric show ID, for services that have one
    pub show_id: Option<u64>,
    /// Display name as listed by the service
    pub name: String,
    /// Offset between the service's episode numbers and the canonical ones
    pub remote_offset: i32,
    /// Offset applied when displaying episode numbers
    pub display_offset: i32,
}

impl UnprocessedStream {
    pub fn new(
        service_key: impl Into<String>,
        show_key: impl Into<String>,
        show_id: Option<u64>,
        name: impl Into<String>,
        remote_offset: i32,
        display_offset: i32,
    ) -> Self {
        Self {
            service_key: service_key.into(),
            show_key: show_key.into(),
            show_id,
            name: name.into(),
            remote_offset,
            display_offset,
        }
    }
}

/// The aggregator's record of a show available on a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    /// Key of the service hosting the stream
    pub service_key: String,
    /// Service-specific show identifier
    pub show_key: String,
    /// Numeric show ID, for services that have one
    pub show_id: Option<u64>,
    /// Display name
    pub name: String,
    pub remote_offset: i32,
    pub display_offset: i32,
    /// Whether the stream is still being tracked
    pub active: bool,
}

impl Stream {
    /// Create an active stream with only a show key set
    pub fn with_key(service_key: impl Into<String>, show_key: impl Into<String>) -> Self {
        Self {
            service_key: service_key.into(),
            show_key: show_key.into(),
            show_id: None,
            name: String::new(),
            remote_offset: 0,
            display_offset: 0,
            active: true,
        }
    }
}

impl From<UnprocessedStream> for Stream {
    fn from(stream: UnprocessedStream) -> Self {
        Self {
            service_key: stream.service_key,
            show_key: stream.show_key,
            show_id: stream.show_id,
            name: stream.name,
            remote_offset: stream.remote_offset,
            display_offset: stream.display_offset,
            active: true,
        }
    }
}

/// A single episode as reported by a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode number (1-based, as numbered by the service)
    pub number: u32,
    /// Episode title
    pub name: String,
    /// Playback URL
    pub link: String,
    /// When the episode was seen
    pub date: DateTime<Utc>,
}
