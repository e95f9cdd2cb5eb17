// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::{format_date, format_duration};

/// `kind` value the lookup endpoint uses for episode entries
pub const EPISODE_KIND: &str = "podcast-episode";

/// Envelope shared by the search and lookup endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A podcast returned by the search endpoint
///
/// Attributes the API returns beyond the typed ones are kept in `extra`.
/// Typed fields that are absent or `null` are left out when serializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An entry returned by the lookup endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_time_millis: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PodcastResult {
    /// Podcast name, or "Unknown Podcast"
    pub fn name(&self) -> &str {
        self.collection_name.as_deref().unwrap_or("Unknown Podcast")
    }
}

impl EpisodeResult {
    /// True for episode entries, false for the podcast entry the lookup
    /// endpoint puts first
    pub fn is_episode(&self) -> bool {
        self.kind.as_deref() == Some(EPISODE_KIND)
    }

    /// Episode title, or "Unknown Episode"
    pub fn title(&self) -> &str {
        self.track_name.as_deref().unwrap_or("Unknown Episode")
    }

    /// Name of the podcast this episode belongs to, or "Unknown Podcast"
    pub fn podcast_name(&self) -> &str {
        self.collection_name.as_deref().unwrap_or("Unknown Podcast")
    }

    /// Direct audio URL, if the API provided a non-empty one
    pub fn audio_url(&self) -> Option<&str> {
        self.episode_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Human-readable duration ("1h 1m", "12m 5s" or "Unknown")
    pub fn duration(&self) -> String {
        format_duration(self.track_time_millis)
    }

    /// Release day as YYYY-MM-DD, or "Unknown"
    pub fn release_day(&self) -> String {
        format_date(self.release_date.as_deref())
    }
}
