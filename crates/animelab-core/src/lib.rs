//! AnimeLab Stream Service Library
//!
//! This crate provides the AnimeLab plugin for a stream aggregator: it reads
//! AnimeLab's simulcast endpoints and translates them into streams and
//! episodes the aggregator understands.
//!
//! # Features
//! - List the simulcasts airing in a given season
//! - Find the latest episode of a known show
//! - Build show page links and extract show keys from URLs
//! - Route requests through a configured AU/NZ proxy

pub mod animelab;
mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod season;
pub mod service;
pub mod types;

// Re-export main types for convenience
pub use animelab::{AnimeLabService, Endpoints};
pub use client::{ClientConfig, ResponseBody, ResponseKind, ServiceClient};
pub use config::{ProxyAddress, RegionHint, ServiceConfig};
pub use error::{Result, StreamServiceError};
pub use season::Season;
pub use service::{service_handler, service_handlers, StreamService};
pub use types::{Episode, Stream, UnprocessedStream};
