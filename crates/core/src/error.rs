use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplaymapError {
    #[error("Extraction failed for {url}: {reason}")]
    ExtractionFailed { url: String, reason: String },

    #[error("No {field} data found for {video_id}")]
    MissingRequiredField { field: String, video_id: String },

    #[error("Malformed {field} data for {video_id}: {source}")]
    MalformedField {
        field: String,
        video_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid video id {0:?}: must be non-empty and must not contain path separators")]
    InvalidVideoId(String),

    #[error("Render failed: {reason}")]
    RenderFailed { reason: String },

    #[error("Failed to open viewer for {path}: {reason}")]
    DisplayFailed { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Image encode error: {0}")]
    ImageError(#[from] image::ImageError),
}

impl ReplaymapError {
    pub fn render(reason: impl Into<String>) -> Self {
        ReplaymapError::RenderFailed {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReplaymapError>;
