//! AnimeLab API response types for deserialization.
//!
//! These structures mirror the JSON returned by the simulcast endpoints.
//! Fields the adapter does not read are left out. Page entries are kept as
//! raw JSON and decoded one at a time, so a single odd entry never spoils
//! the rest of the page.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One page of the seasonal simulcast listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimulcastPage {
    /// Shows on this page, decoded individually as `SimulcastShow`
    pub list: Vec<Value>,
    /// Total number of pages in the listing
    pub total_page_count: u32,
}

/// A show in the simulcast listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimulcastShow {
    /// URL slug, used as the show key
    pub slug: String,
    /// Display name
    pub name: String,
    /// Name in the original language (unused)
    #[allow(dead_code)]
    #[serde(default)]
    pub original_name: Option<String>,
    /// Simulcast start, epoch milliseconds
    #[serde(default)]
    pub simulcast_start_date: Option<i64>,
    /// Simulcast end, epoch milliseconds (null while a show is still running)
    #[serde(default)]
    pub simulcast_end_date: Option<i64>,
}

/// One page of the latest aired episodes feed
#[derive(Debug, Deserialize)]
pub(crate) struct LatestEpisodePage {
    /// Episodes, most recent first, decoded individually as `LatestEpisode`
    pub list: Vec<Value>,
}

/// An episode in the latest aired feed
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LatestEpisode {
    /// Slug of the show this episode belongs to
    #[serde(default)]
    pub show_slug: String,
    /// Episode number, sent as an integer, a whole float or a numeric string
    #[serde(deserialize_with = "deserialize_episode_number")]
    pub episode_number: i64,
    /// Episode title
    pub name: String,
    /// Episode slug, used to build the player URL
    pub slug: String,
    /// Release date in epoch milliseconds (unreliable, not used)
    #[allow(dead_code)]
    #[serde(default)]
    pub release_date: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn deserialize_episode_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Integer(number) => Ok(number),
        NumberOrString::Float(number) if number.fract() == 0.0 && number.abs() < i64::MAX as f64 => {
            Ok(number as i64)
        }
        NumberOrString::Float(number) => Err(serde::de::Error::custom(format!(
            "invalid episode number: {}",
            number
        ))),
        NumberOrString::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid episode number: {:?}", text))),
    }
}
