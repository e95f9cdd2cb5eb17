// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Display;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::api::{EpisodeResult, ItunesClient, PodcastResult};
use crate::episode::{download_episode, episode_output_path};
use crate::error::CommandError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Default directory downloads are saved under
pub const DEFAULT_OUTPUT_DIR: &str = "downloads/podcasts";

/// Parameters of the `download` command
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub collection_id: u64,
    /// Zero-based position in the most-recent-episodes listing
    pub episode_index: usize,
    pub output_dir: PathBuf,
}

/// Result of a download attempt, printed as JSON
///
/// Successful outcomes carry `path`, `episode` and `podcast`; failed ones
/// carry only `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podcast: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DownloadOutcome {
    pub fn succeeded(path: String, episode: &str, podcast: &str) -> Self {
        Self {
            success: true,
            path: Some(path),
            episode: Some(episode.to_string()),
            podcast: Some(podcast.to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl Display) -> Self {
        Self {
            success: false,
            path: None,
            episode: None,
            podcast: None,
            error: Some(error.to_string()),
        }
    }
}

/// Search podcasts by keyword
///
/// An empty result set is an error, so callers can exit non-zero.
pub async fn search<C: HttpClient>(
    api: &ItunesClient<C>,
    keyword: &str,
    limit: u32,
    reporter: &SharedProgressReporter,
) -> Result<Vec<PodcastResult>, CommandError> {
    validate_limit(limit)?;
    if keyword.trim().is_empty() {
        return Err(CommandError::InvalidArgument(
            "search keyword must not be empty".to_string(),
        ));
    }

    reporter.report(ProgressEvent::Searching {
        term: keyword.to_string(),
    });

    let results = api.search_podcasts(keyword, limit).await?;
    if results.is_empty() {
        return Err(CommandError::NoResults("podcasts"));
    }

    reporter.report(ProgressEvent::ResultsFound {
        count: results.len(),
        noun: "podcasts",
    });

    Ok(results)
}

/// List the most recent episodes of a podcast
pub async fn episodes<C: HttpClient>(
    api: &ItunesClient<C>,
    collection_id: u64,
    limit: u32,
    reporter: &SharedProgressReporter,
) -> Result<Vec<EpisodeResult>, CommandError> {
    validate_limit(limit)?;

    reporter.report(ProgressEvent::FetchingEpisodes { collection_id });

    let episodes = api.get_episodes(collection_id, limit).await?;
    if episodes.is_empty() {
        return Err(CommandError::NoResults("episodes"));
    }

    reporter.report(ProgressEvent::ResultsFound {
        count: episodes.len(),
        noun: "episodes",
    });

    Ok(episodes)
}

/// Download one episode of a podcast
///
/// Fetches just enough episodes to cover `episode_index`, then streams the
/// selected episode's audio to
/// `<output_dir>/<podcast>/<podcast - episode>.mp3`.
pub async fn download<C: HttpClient>(
    api: &ItunesClient<C>,
    request: &DownloadRequest,
    reporter: &SharedProgressReporter,
) -> Result<DownloadOutcome, CommandError> {
    reporter.report(ProgressEvent::FetchingEpisodes {
        collection_id: request.collection_id,
    });

    let limit = u32::try_from(request.episode_index.saturating_add(1)).unwrap_or(u32::MAX);
    let episodes = api.get_episodes(request.collection_id, limit).await?;

    let episode = episodes
        .get(request.episode_index)
        .ok_or(CommandError::EpisodeNotFound {
            index: request.episode_index,
            available: episodes.len(),
        })?;

    let url = episode.audio_url().ok_or(CommandError::MissingEpisodeUrl)?;
    let output_path =
        episode_output_path(&request.output_dir, episode.podcast_name(), episode.title());

    debug!(url, path = %output_path.display(), "Selected episode");

    reporter.report(ProgressEvent::EpisodeSelected {
        episode_title: episode.title().to_string(),
        output_path: output_path.clone(),
    });

    let path = download_episode(api.http(), url, &output_path, reporter).await?;

    Ok(DownloadOutcome::succeeded(
        path.display().to_string(),
        episode.title(),
        episode.podcast_name(),
    ))
}

fn validate_limit(limit: u32) -> Result<(), CommandError> {
    if limit == 0 {
        return Err(CommandError::InvalidArgument(
            "limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
