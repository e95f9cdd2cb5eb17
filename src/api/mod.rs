mod client;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_LIMIT, ItunesClient, MAX_LIMIT};
pub use types::{EPISODE_KIND, EpisodeResult, PodcastResult, ResultsEnvelope};
