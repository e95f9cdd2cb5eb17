// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;
use crate::http::HttpClient;

use super::types::{EpisodeResult, PodcastResult, ResultsEnvelope};

/// Public iTunes API endpoint
pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com";

/// Number of results requested when the caller gives no limit
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size the API honours
pub const MAX_LIMIT: u32 = 200;

/// Read-only client for the iTunes search and lookup endpoints
#[derive(Clone)]
pub struct ItunesClient<C> {
    http: C,
    base_url: Url,
}

impl<C: HttpClient> ItunesClient<C> {
    /// Create a client for the public API
    pub fn new(http: C) -> Self {
        Self {
            http,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"),
        }
    }

    /// Create a client for an alternative API host (mirror or mock server)
    pub fn with_base_url(http: C, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { http, base_url })
    }

    /// The underlying HTTP client
    pub fn http(&self) -> &C {
        &self.http
    }

    /// Build the search URL for a keyword
    pub fn search_url(&self, term: &str, limit: u32) -> Url {
        let mut url = self.endpoint("search");
        url.query_pairs_mut()
            .append_pair("term", term)
            .append_pair("entity", "podcast")
            .append_pair("limit", &effective_limit(limit).to_string());
        url
    }

    /// Build the episode lookup URL for a collection
    pub fn lookup_url(&self, collection_id: u64, limit: u32) -> Url {
        let mut url = self.endpoint("lookup");
        url.query_pairs_mut()
            .append_pair("id", &collection_id.to_string())
            .append_pair("entity", "podcastEpisode")
            .append_pair("limit", &effective_limit(limit).to_string());
        url
    }

    /// Search podcasts by keyword
    ///
    /// Returns at most `limit` results (capped at [`MAX_LIMIT`]); an absent
    /// `results` key yields an empty list.
    pub async fn search_podcasts(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<PodcastResult>, ApiError> {
        let url = self.search_url(term, limit);
        let mut results: Vec<PodcastResult> = self.fetch_results(url).await?;
        results.truncate(effective_limit(limit) as usize);
        Ok(results)
    }

    /// Fetch the most recent episodes of a podcast
    ///
    /// The podcast entry the lookup endpoint returns alongside its episodes
    /// is filtered out.
    pub async fn get_episodes(
        &self,
        collection_id: u64,
        limit: u32,
    ) -> Result<Vec<EpisodeResult>, ApiError> {
        let url = self.lookup_url(collection_id, limit);
        let results: Vec<EpisodeResult> = self.fetch_results(url).await?;

        let mut episodes: Vec<_> = results.into_iter().filter(|r| r.is_episode()).collect();
        episodes.truncate(effective_limit(limit) as usize);
        Ok(episodes)
    }

    fn endpoint(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        url
    }

    async fn fetch_results<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ApiError> {
        debug!(url = %url, "Querying podcast API");

        let bytes = self.http.get_bytes(url.as_str()).await.map_err(|e| {
            warn!(url = %url, error = %e, "API request failed");
            ApiError::Network {
                url: url.to_string(),
                source: e,
            }
        })?;

        let envelope: ResultsEnvelope<T> = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(url = %url, error = %e, "API returned invalid JSON");
            ApiError::InvalidJson {
                url: url.to_string(),
                source: e,
            }
        })?;

        debug!(count = envelope.results.len(), "API returned results");
        Ok(envelope.results)
    }
}

fn effective_limit(limit: u32) -> u32 {
    limit.min(MAX_LIMIT)
}
