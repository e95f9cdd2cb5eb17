use std::path::{Path, PathBuf};

use sanitize_filename::Options;

/// Default maximum length, in characters, of a sanitized name
pub const MAX_FILENAME_LENGTH: usize = 100;

/// Extension given to downloaded episodes
pub const AUDIO_EXTENSION: &str = "mp3";

/// Used when sanitizing leaves nothing behind
const FALLBACK_NAME: &str = "untitled";

/// Make a string safe to use as a file or directory name
///
/// Strips characters that are illegal in file names (`< > : " / \ | ? *`
/// and control characters), collapses whitespace runs to a single space and
/// repeated dashes to a single dash, truncates to `max_length` characters
/// and trims surrounding whitespace.
pub fn safe_filename(name: &str, max_length: usize) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let stripped = sanitize_filename::sanitize_with_options(
        spaced,
        Options {
            windows: false,
            truncate: false,
            replacement: "",
        },
    );

    let collapsed = collapse_runs(&collapse_runs(&stripped, ' '), '-');
    let truncated: String = collapsed.chars().take(max_length).collect();

    truncated.trim().to_string()
}

/// Build the destination path for an episode download
///
/// Layout: `<output_dir>/<podcast>/<podcast - episode>.mp3`, both names
/// sanitized with [`safe_filename`].
pub fn episode_output_path(output_dir: &Path, podcast_name: &str, episode_title: &str) -> PathBuf {
    let folder = non_empty(safe_filename(podcast_name, MAX_FILENAME_LENGTH));
    let stem = non_empty(safe_filename(
        &format!("{} - {}", podcast_name, episode_title),
        MAX_FILENAME_LENGTH,
    ));

    output_dir
        .join(folder)
        .join(format!("{}.{}", stem, AUDIO_EXTENSION))
}

/// Collapse consecutive occurrences of `separator` into one
fn collapse_runs(s: &str, separator: char) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_separator = false;

    for c in s.chars() {
        if c == separator {
            if !last_was_separator {
                result.push(c);
            }
            last_was_separator = true;
        } else {
            result.push(c);
            last_was_separator = false;
        }
    }

    result
}

fn non_empty(name: String) -> String {
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}
