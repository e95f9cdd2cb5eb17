use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use itunes_podcast::api::{DEFAULT_BASE_URL, DEFAULT_LIMIT};
use itunes_podcast::commands::{self, DEFAULT_OUTPUT_DIR};
use itunes_podcast::format::format_megabytes;
use itunes_podcast::{
    CommandError, DownloadOutcome, DownloadRequest, EpisodeResult, ItunesClient, PodcastResult,
    ProgressEvent, ProgressReporter, ReqwestClient, SharedProgressReporter,
};

/// Environment variable overriding the API host
const BASE_URL_ENV: &str = "ITUNES_API_BASE_URL";

// Emoji with fallback for terminals without Unicode support
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static RADIO: Emoji<'_, '_> = Emoji("📻 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static HOURGLASS: Emoji<'_, '_> = Emoji("⏳ ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");

/// Search the iTunes podcast directory and download episodes
///
/// Results are printed as JSON on stdout; diagnostics and progress go to stderr.
#[derive(Parser, Debug)]
#[command(name = "itunes-podcast")]
#[command(about = "Search the iTunes podcast directory and download episodes")]
#[command(version, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for podcasts by keyword
    Search {
        /// Search keyword
        keyword: String,

        /// Maximum number of results (the API caps this at 200)
        #[arg(default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// List the most recent episodes of a podcast
    Episodes {
        /// Podcast collection ID
        collection_id: u64,

        /// Maximum number of episodes
        #[arg(default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Download an episode's audio file
    Download {
        /// Podcast collection ID
        collection_id: u64,

        /// Zero-based index into the most recent episodes
        episode_index: usize,

        /// Directory to save downloads under
        #[arg(default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
    },
}

/// Reports progress on stderr, with an in-place progress line for downloads
struct TerminalReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalReporter {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, total: u64) {
        let style = ProgressStyle::default_bar()
            .template("{msg}")
            .expect("valid progress template");

        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        bar.set_style(style);
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().unwrap().take()
    }
}

impl ProgressReporter for TerminalReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Searching { term } => {
                eprintln!("{SEARCH}Searching for: '{}'", term.cyan());
            }

            ProgressEvent::FetchingEpisodes { collection_id } => {
                eprintln!(
                    "{RADIO}Fetching episodes for podcast ID: {}",
                    collection_id.to_string().cyan()
                );
            }

            ProgressEvent::ResultsFound { count, noun } => {
                eprintln!("{SUCCESS}Found {} {}", count.to_string().green().bold(), noun);
            }

            ProgressEvent::EpisodeSelected {
                episode_title,
                output_path,
            } => {
                eprintln!("{HEADPHONES}Episode: {}", episode_title.bold());
                eprintln!(
                    "{FOLDER}Saving to: {}",
                    output_path.display().to_string().cyan()
                );
            }

            ProgressEvent::DownloadStarting {
                output_path,
                content_length,
            } => {
                eprintln!(
                    "{DOWNLOAD}Downloading to: {}",
                    output_path.display().to_string().cyan()
                );
                if let Some(total) = content_length.filter(|&total| total > 0) {
                    self.start_bar(total);
                }
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
                percent,
            } => {
                let guard = self.bar.lock().unwrap();
                if let (Some(bar), Some(total), Some(percent)) =
                    (guard.as_ref(), total_bytes, percent)
                {
                    bar.set_position(bytes_downloaded);
                    bar.set_message(format!(
                        "{HOURGLASS}Progress: {:.1}% ({}/{} MB)",
                        percent,
                        format_megabytes(bytes_downloaded),
                        format_megabytes(total)
                    ));
                }
            }

            ProgressEvent::DownloadCompleted { output_path, .. } => {
                if let Some(bar) = self.take_bar() {
                    bar.finish();
                }
                eprintln!(
                    "{SUCCESS}Download complete: {}",
                    output_path.display().to_string().green()
                );
            }

            ProgressEvent::DownloadFailed { error } => {
                if let Some(bar) = self.take_bar() {
                    bar.abandon();
                }
                eprintln!("{FAILURE}Download failed: {}", error.red());
            }
        }
    }
}

fn list_podcasts(podcasts: &[PodcastResult]) {
    for podcast in podcasts {
        eprintln!(
            "  {} {} {}",
            podcast
                .collection_id
                .map(|id| id.to_string())
                .unwrap_or_default()
                .cyan(),
            podcast.name().bold(),
            podcast.artist_name.as_deref().unwrap_or_default().dimmed()
        );
    }
    eprintln!();
}

fn list_episodes(episodes: &[EpisodeResult]) {
    for (index, episode) in episodes.iter().enumerate() {
        eprintln!(
            "  [{}] {} {} {}",
            index.to_string().cyan(),
            episode.release_day().dimmed(),
            episode.duration().yellow(),
            episode.title().bold()
        );
    }
    eprintln!();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{json}");
    Ok(())
}

fn report_error(error: &CommandError) -> ExitCode {
    eprintln!("{FAILURE}{}", error.to_string().red());
    ExitCode::FAILURE
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let api = ItunesClient::with_base_url(ReqwestClient::new(), &base_url)
        .with_context(|| format!("Invalid API base URL: {base_url}"))?;

    let reporter: SharedProgressReporter = Arc::new(TerminalReporter::new());

    match cli.command {
        Command::Search { keyword, limit } => {
            match commands::search(&api, &keyword, limit, &reporter).await {
                Ok(results) => {
                    list_podcasts(&results);
                    print_json(&results)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report_error(&e)),
            }
        }

        Command::Episodes {
            collection_id,
            limit,
        } => match commands::episodes(&api, collection_id, limit, &reporter).await {
            Ok(episodes) => {
                list_episodes(&episodes);
                print_json(&episodes)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(report_error(&e)),
        },

        Command::Download {
            collection_id,
            episode_index,
            output_dir,
        } => {
            let request = DownloadRequest {
                collection_id,
                episode_index,
                output_dir,
            };

            match commands::download(&api, &request, &reporter).await {
                Ok(outcome) => {
                    print_json(&outcome)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) if e.is_download_failure() => {
                    // Download errors were already shown by the reporter
                    if !matches!(e, CommandError::Download(_)) {
                        eprintln!("{FAILURE}{}", e.to_string().red());
                    }
                    print_json(&DownloadOutcome::failed(&e))?;
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Ok(report_error(&e)),
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version requests are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{FAILURE}{:#}", e);
            ExitCode::FAILURE
        }
    }
}
