use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{ReplaymapError, Result},
    validate::{optional_field, required_field},
};

/// Average relative engagement over `[start_time, end_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSample {
    pub start_time: f64,
    pub end_time: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterMarker {
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub title: String,
}

/// Raw metadata document exactly as the provider returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub video_id: String,
    pub raw: Value,
}

impl VideoInfo {
    pub fn new(video_id: impl Into<String>, raw: Value) -> Self {
        Self {
            video_id: video_id.into(),
            raw,
        }
    }
}

/// Typed view over [`VideoInfo`] holding only what the renderer and the CLI read.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub duration: Option<f64>,
    pub heatmap: Vec<HeatmapSample>,
    pub chapters: Option<Vec<ChapterMarker>>,
}

impl VideoRecord {
    /// Map the provider document into a record.
    ///
    /// Fails with `MissingRequiredField` when `heatmap` is absent or null. A missing
    /// `chapters` field only logs a notice, a malformed one a warning.
    pub fn from_info(info: &VideoInfo) -> Result<Self> {
        let id = info.video_id.as_str();
        let raw = &info.raw;

        let heatmap: Vec<HeatmapSample> = required_field(raw, "heatmap", id)?;
        let chapters: Option<Vec<ChapterMarker>> = match optional_field(raw, "chapters", id) {
            Ok(chapters) => chapters,
            Err(e @ ReplaymapError::MalformedField { .. }) => {
                tracing::warn!(video_id = id, "{e}; skipping chapters");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            video_id: id.to_string(),
            title: raw.get("title").and_then(Value::as_str).map(str::to_string),
            uploader: raw
                .get("uploader")
                .and_then(Value::as_str)
                .map(str::to_string),
            duration: raw.get("duration").and_then(Value::as_f64),
            heatmap,
            chapters,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_heatmap_and_null_chapters() {
        let info = VideoInfo::new(
            "abc123",
            json!({
                "title": "Some video",
                "duration": 20,
                "heatmap": [
                    {"start_time": 0.0, "end_time": 10.0, "value": 0.2},
                    {"start_time": 10.0, "end_time": 20.0, "value": 0.9}
                ],
                "chapters": null
            }),
        );

        let record = VideoRecord::from_info(&info).unwrap();
        assert_eq!(record.video_id, "abc123");
        assert_eq!(record.title.as_deref(), Some("Some video"));
        assert_eq!(record.duration, Some(20.0));
        assert_eq!(record.heatmap.len(), 2);
        assert_eq!(record.heatmap[1].value, 0.9);
        assert!(record.chapters.is_none());
    }

    #[test]
    fn missing_heatmap_is_a_hard_failure() {
        let info = VideoInfo::new("abc123", json!({"title": "x", "chapters": []}));
        let err = VideoRecord::from_info(&info).unwrap_err();
        match err {
            ReplaymapError::MissingRequiredField { field, video_id } => {
                assert_eq!(field, "heatmap");
                assert_eq!(video_id, "abc123");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_chapters_are_dropped_not_fatal() {
        let info = VideoInfo::new(
            "abc123",
            json!({
                "heatmap": [{"start_time": 0.0, "end_time": 5.0, "value": 0.5}],
                "chapters": [{"title": "no start"}]
            }),
        );
        let record = VideoRecord::from_info(&info).unwrap();
        assert_eq!(record.heatmap.len(), 1);
        assert!(record.chapters.is_none());
    }

    #[test]
    fn malformed_heatmap_stays_fatal() {
        let info = VideoInfo::new("abc123", json!({"heatmap": [{"value": 0.5}]}));
        let err = VideoRecord::from_info(&info).unwrap_err();
        assert!(matches!(err, ReplaymapError::MalformedField { ref field, .. } if field == "heatmap"));
    }

    #[test]
    fn empty_chapter_list_is_kept() {
        let info = VideoInfo::new("abc123", json!({"heatmap": [], "chapters": []}));
        let record = VideoRecord::from_info(&info).unwrap();
        assert!(record.heatmap.is_empty());
        assert_eq!(record.chapters, Some(vec![]));
    }

    #[test]
    fn chapter_without_title_defaults_to_empty() {
        let info = VideoInfo::new(
            "abc123",
            json!({"heatmap": [], "chapters": [{"start_time": 5.0, "end_time": 9.0}]}),
        );
        let record = VideoRecord::from_info(&info).unwrap();
        let chapters = record.chapters.unwrap();
        assert_eq!(chapters[0].title, "");
        assert_eq!(chapters[0].end_time, Some(9.0));
    }
}
