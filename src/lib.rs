pub mod api;
pub mod commands;
pub mod episode;
pub mod error;
pub mod format;
pub mod http;
pub mod progress;

// Re-export main types for convenience
pub use api::{EpisodeResult, ItunesClient, PodcastResult};
pub use commands::{DownloadOutcome, DownloadRequest};
pub use episode::{download_episode, episode_output_path, safe_filename};
pub use error::{ApiError, CommandError, DownloadError};
pub use format::{format_date, format_duration};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
