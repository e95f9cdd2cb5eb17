use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::DownloadError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Size of the blocks the response body is written in
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Percentage of `total` covered by `downloaded`, if the total is known
pub fn progress_percent(downloaded: u64, total: Option<u64>) -> Option<f64> {
    match total {
        Some(total) if total > 0 => Some(downloaded as f64 / total as f64 * 100.0),
        _ => None,
    }
}

/// Download an episode's audio file to `output_path`
///
/// Parent directories are created as needed and the body is written in
/// [`CHUNK_SIZE`] blocks, reporting progress after each one. On failure the
/// partially written file is left in place. Returns the final path.
pub async fn download_episode<C: HttpClient>(
    client: &C,
    url: &str,
    output_path: &Path,
    reporter: &SharedProgressReporter,
) -> Result<PathBuf, DownloadError> {
    let result = stream_to_file(client, url, output_path, reporter).await;

    if let Err(ref e) = result {
        warn!(url, path = %output_path.display(), error = %e, "Download failed");
        reporter.report(ProgressEvent::DownloadFailed {
            error: e.to_string(),
        });
    }

    result
}

async fn stream_to_file<C: HttpClient>(
    client: &C,
    url: &str,
    output_path: &Path,
    reporter: &SharedProgressReporter,
) -> Result<PathBuf, DownloadError> {
    let response = client
        .get_stream(url)
        .await
        .map_err(|e| DownloadError::HttpFailed {
            url: url.to_string(),
            source: e,
        })?;

    if response.status >= 400 {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DownloadError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    reporter.report(ProgressEvent::DownloadStarting {
        output_path: output_path.to_path_buf(),
        content_length: response.content_length,
    });

    let mut file =
        File::create(output_path)
            .await
            .map_err(|e| DownloadError::FileCreateFailed {
                path: output_path.to_path_buf(),
                source: e,
            })?;

    let total_bytes = response.content_length;
    let mut bytes_downloaded: u64 = 0;
    let mut stream = response.body;

    while let Some(chunk_result) = stream.next().await {
        let bytes = chunk_result.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        // Network reads arrive in arbitrary sizes; write them out in fixed blocks
        for chunk in bytes.chunks(CHUNK_SIZE) {
            file.write_all(chunk)
                .await
                .map_err(|e| DownloadError::FileWriteFailed {
                    path: output_path.to_path_buf(),
                    source: e,
                })?;

            bytes_downloaded += chunk.len() as u64;

            reporter.report(ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
                percent: progress_percent(bytes_downloaded, total_bytes),
            });
        }
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::FileWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    debug!(url, bytes = bytes_downloaded, "Download finished");

    reporter.report(ProgressEvent::DownloadCompleted {
        output_path: output_path.to_path_buf(),
        bytes_downloaded,
    });

    Ok(output_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ByteStream, HttpResponse};
    use crate::progress::ProgressReporter;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::{Arc, Mutex};

    use tempfile::tempdir;

    struct MockHttpClient {
        response_data: Vec<u8>,
        status: u16,
        send_length: bool,
    }

    impl MockHttpClient {
        fn ok(data: &[u8]) -> Self {
            Self {
                response_data: data.to_vec(),
                status: 200,
                send_length: true,
            }
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get_bytes(&self, _url: &str) -> Result<Bytes, reqwest::Error> {
            Ok(Bytes::from(self.response_data.clone()))
        }

        async fn get_stream(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            let data = self.response_data.clone();
            let len = data.len() as u64;

            let stream: ByteStream =
                Box::pin(futures::stream::once(async move { Ok(Bytes::from(data)) }));

            Ok(HttpResponse {
                status: self.status,
                content_length: self.send_length.then_some(len),
                body: stream,
            })
        }
    }

    /// Sends one block of data, then fails mid-stream
    struct InterruptedHttpClient {
        first_block: Vec<u8>,
    }

    #[async_trait]
    impl HttpClient for InterruptedHttpClient {
        async fn get_bytes(&self, _url: &str) -> Result<Bytes, reqwest::Error> {
            Ok(Bytes::from(self.first_block.clone()))
        }

        async fn get_stream(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            let first = Bytes::from(self.first_block.clone());
            let error = reqwest::Client::new()
                .get("not a valid url")
                .build()
                .unwrap_err();

            let stream: ByteStream = Box::pin(futures::stream::iter(vec![Ok(first), Err(error)]));

            Ok(HttpResponse {
                status: 200,
                content_length: Some(self.first_block.len() as u64 * 2),
                body: stream,
            })
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl RecordingReporter {
        fn percents(&self) -> Vec<Option<f64>> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    ProgressEvent::DownloadProgress { percent, .. } => Some(*percent),
                    _ => None,
                })
                .collect()
        }
    }

    #[test]
    fn percent_needs_known_total() {
        assert_eq!(progress_percent(50, Some(200)), Some(25.0));
        assert_eq!(progress_percent(50, None), None);
        assert_eq!(progress_percent(50, Some(0)), None);
    }

    #[tokio::test]
    async fn download_writes_file_and_creates_directories() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("Podcast").join("Podcast - Episode.mp3");

        let client = MockHttpClient::ok(b"test audio content");
        let reporter: SharedProgressReporter = crate::progress::NoopReporter::shared();

        let path = download_episode(&client, "https://example.com/ep.mp3", &output_path, &reporter)
            .await
            .unwrap();

        assert_eq!(path, output_path);
        assert_eq!(std::fs::read(&output_path).unwrap(), b"test audio content");
    }

    #[tokio::test]
    async fn download_reports_progress_per_chunk() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("ep.mp3");

        let data = vec![7u8; CHUNK_SIZE * 2 + 100];
        let client = MockHttpClient::ok(&data);
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        download_episode(&client, "https://example.com/ep.mp3", &output_path, &reporter)
            .await
            .unwrap();

        let percents = recorder.percents();
        assert_eq!(percents.len(), 3);
        assert!(percents.iter().all(Option::is_some));
        assert_eq!(percents.last().unwrap().unwrap(), 100.0);
        assert_eq!(std::fs::read(&output_path).unwrap().len(), data.len());

        let events = recorder.events.lock().unwrap();
        assert!(matches!(
            events.first(),
            Some(ProgressEvent::DownloadStarting {
                content_length: Some(_),
                ..
            })
        ));
        assert!(matches!(
            events.last(),
            Some(ProgressEvent::DownloadCompleted { bytes_downloaded, .. })
                if *bytes_downloaded == data.len() as u64
        ));
    }

    #[tokio::test]
    async fn download_without_length_has_no_percent() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("ep.mp3");

        let client = MockHttpClient {
            send_length: false,
            ..MockHttpClient::ok(b"audio")
        };
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        download_episode(&client, "https://example.com/ep.mp3", &output_path, &reporter)
            .await
            .unwrap();

        assert_eq!(recorder.percents(), vec![None]);
    }

    #[tokio::test]
    async fn download_fails_on_http_error() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("ep.mp3");

        let client = MockHttpClient {
            status: 404,
            ..MockHttpClient::ok(b"Not Found")
        };
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        let result =
            download_episode(&client, "https://example.com/ep.mp3", &output_path, &reporter).await;

        match result.unwrap_err() {
            DownloadError::HttpStatus { status, .. } => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got {other}"),
        }
        assert!(!output_path.exists());
        assert!(matches!(
            recorder.events.lock().unwrap().last(),
            Some(ProgressEvent::DownloadFailed { .. })
        ));
    }

    #[tokio::test]
    async fn interrupted_download_keeps_partial_file() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("ep.mp3");

        let client = InterruptedHttpClient {
            first_block: vec![1u8; 10_000],
        };
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        let result =
            download_episode(&client, "https://example.com/ep.mp3", &output_path, &reporter).await;

        match result.unwrap_err() {
            DownloadError::StreamFailed { url, .. } => {
                assert_eq!(url, "https://example.com/ep.mp3")
            }
            other => panic!("Expected StreamFailed error, got {other}"),
        }
        assert_eq!(std::fs::read(&output_path).unwrap().len(), 10_000);
        assert!(matches!(
            recorder.events.lock().unwrap().last(),
            Some(ProgressEvent::DownloadFailed { .. })
        ));
    }
}
