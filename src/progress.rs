use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted while running a command, for diagnostics and progress
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A podcast search is being sent
    Searching { term: String },

    /// Episodes of a podcast are being looked up
    FetchingEpisodes { collection_id: u64 },

    /// A query returned results
    ResultsFound {
        count: usize,
        /// What was found ("podcasts" or "episodes")
        noun: &'static str,
    },

    /// An episode was picked for download
    EpisodeSelected {
        episode_title: String,
        output_path: PathBuf,
    },

    /// A download is starting
    DownloadStarting {
        output_path: PathBuf,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    /// Download progress update, sent after every chunk
    DownloadProgress {
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
        /// `bytes_downloaded / total_bytes * 100`, when the total is known
        percent: Option<f64>,
    },

    /// A download completed successfully
    DownloadCompleted {
        output_path: PathBuf,
        bytes_downloaded: u64,
    },

    /// A download failed
    DownloadFailed { error: String },
}

/// Trait for reporting progress events.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect events in tests.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
