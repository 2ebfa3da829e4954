use std::path::PathBuf;

use serde_json::Value;
use tokio::{fs, process::Command};

use crate::{
    error::{ReplaymapError, Result},
    types::VideoInfo,
};

pub const DEFAULT_YT_DLP: &str = "yt-dlp";

/// Canonical watch URL for a video id
pub fn video_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Source of raw video metadata.
pub trait MetadataProvider {
    fn name(&self) -> &'static str;

    async fn extract_info(&self, video_id: &str) -> Result<VideoInfo>;
}

/// Runs `yt-dlp` in metadata-only mode.
#[derive(Debug, Clone)]
pub struct YtDlpProvider {
    pub binary: PathBuf,
}

impl Default for YtDlpProvider {
    fn default() -> Self {
        Self::new(DEFAULT_YT_DLP)
    }
}

impl YtDlpProvider {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl MetadataProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract_info(&self, video_id: &str) -> Result<VideoInfo> {
        let url = video_url(video_id);
        tracing::debug!(binary = %self.binary.display(), %url, "running yt-dlp");

        let output = Command::new(&self.binary)
            .arg("--dump-single-json")
            .arg("--skip-download")
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(&url)
            .output()
            .await
            .map_err(|e| ReplaymapError::ExtractionFailed {
                url: url.clone(),
                reason: format!("could not run {}: {e}", self.binary.display()),
            })?;

        if !output.status.success() {
            return Err(ReplaymapError::ExtractionFailed {
                url,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout_str = String::from_utf8_lossy(output.stdout.as_slice());
        parse_info_document(video_id, &url, &stdout_str)
    }
}

/// Reads a metadata document saved by an earlier run.
#[derive(Debug, Clone)]
pub struct InfoFileProvider {
    pub path: PathBuf,
}

impl InfoFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataProvider for InfoFileProvider {
    fn name(&self) -> &'static str {
        "info file"
    }

    async fn extract_info(&self, video_id: &str) -> Result<VideoInfo> {
        let source = self.path.display().to_string();
        let json_content =
            fs::read_to_string(&self.path)
                .await
                .map_err(|e| ReplaymapError::ExtractionFailed {
                    url: source.clone(),
                    reason: e.to_string(),
                })?;
        parse_info_document(video_id, &source, &json_content)
    }
}

/// Only a JSON object counts as a usable record.
pub fn parse_info_document(video_id: &str, source: &str, text: &str) -> Result<VideoInfo> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ReplaymapError::ExtractionFailed {
            url: source.to_string(),
            reason: "provider returned no metadata".to_string(),
        });
    }

    let raw: Value = serde_json::from_str(text).map_err(|e| ReplaymapError::ExtractionFailed {
        url: source.to_string(),
        reason: format!("invalid metadata JSON: {e}"),
    })?;

    if !raw.is_object() {
        return Err(ReplaymapError::ExtractionFailed {
            url: source.to_string(),
            reason: "provider returned no usable record".to_string(),
        });
    }

    Ok(VideoInfo::new(video_id, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_watch_url() {
        assert_eq!(
            video_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn null_document_is_an_extraction_failure() {
        let err = parse_info_document("vid", "src", "null").unwrap_err();
        assert!(matches!(err, ReplaymapError::ExtractionFailed { .. }));
        let err = parse_info_document("vid", "src", "  \n").unwrap_err();
        assert!(matches!(err, ReplaymapError::ExtractionFailed { .. }));
        let err = parse_info_document("vid", "src", "{oops").unwrap_err();
        assert!(matches!(err, ReplaymapError::ExtractionFailed { .. }));
    }

    #[test]
    fn object_document_is_accepted() {
        let info = parse_info_document("vid", "src", r#"{"id": "vid", "heatmap": []}"#).unwrap();
        assert_eq!(info.video_id, "vid");
        assert_eq!(info.raw["id"], "vid");
    }

    #[tokio::test]
    async fn missing_binary_is_an_extraction_failure() {
        let provider = YtDlpProvider::new("/nonexistent/replaymap-yt-dlp");
        let err = provider.extract_info("vid").await.unwrap_err();
        match err {
            ReplaymapError::ExtractionFailed { url, .. } => {
                assert_eq!(url, video_url("vid"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_info_file_is_an_extraction_failure() {
        let provider = InfoFileProvider::new("/nonexistent/info.json");
        let err = provider.extract_info("vid").await.unwrap_err();
        assert!(matches!(err, ReplaymapError::ExtractionFailed { .. }));
    }
}
