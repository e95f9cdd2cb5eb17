mod download;
mod filename;

pub use download::{CHUNK_SIZE, download_episode, progress_percent};
pub use filename::{AUDIO_EXTENSION, MAX_FILENAME_LENGTH, episode_output_path, safe_filename};
