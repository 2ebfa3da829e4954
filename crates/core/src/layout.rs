use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;

use crate::{
    error::{ReplaymapError, Result},
    types::VideoInfo,
};

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Where a run writes its files: `<root>/info/<id>.json` and `<root>/heatmaps/<id>.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn info_dir(&self) -> PathBuf {
        self.root.join("info")
    }

    pub fn heatmap_dir(&self) -> PathBuf {
        self.root.join("heatmaps")
    }

    /// Get the path for a saved info file
    pub fn info_path(&self, video_id: &str) -> PathBuf {
        self.info_dir().join(format!("{video_id}.json"))
    }

    /// Get the path for a rendered heatmap
    pub fn heatmap_path(&self, video_id: &str) -> PathBuf {
        self.heatmap_dir().join(format!("{video_id}.png"))
    }

    pub async fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(self.info_dir()).await?;
        fs::create_dir_all(self.heatmap_dir()).await?;
        Ok(())
    }
}

/// Reject ids that would escape the output directories once used as file names.
pub fn validate_video_id(video_id: &str) -> Result<()> {
    let bad = video_id.trim().is_empty()
        || video_id.contains(['/', '\\'])
        || video_id == "."
        || video_id.contains("..");
    if bad {
        return Err(ReplaymapError::InvalidVideoId(video_id.to_string()));
    }
    Ok(())
}

/// Serialize as pretty JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Save the raw provider document verbatim
pub async fn save_info(info: &VideoInfo, path: &Path) -> Result<()> {
    let pretty_json = to_pretty_json(&info.raw)?;
    fs::write(path, &pretty_json).await?;
    tracing::debug!(path = %path.display(), bytes = pretty_json.len(), "saved info json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::provider::{InfoFileProvider, MetadataProvider};

    #[test]
    fn paths_follow_the_layout() {
        let layout = OutputLayout::default();
        assert_eq!(layout.info_path("abc"), PathBuf::from("output/info/abc.json"));
        assert_eq!(
            layout.heatmap_path("abc"),
            PathBuf::from("output/heatmaps/abc.png")
        );
    }

    #[test]
    fn rejects_path_like_ids() {
        assert!(validate_video_id("dQw4w9WgXcQ").is_ok());
        assert!(validate_video_id("-abc_123").is_ok());
        assert!(validate_video_id("").is_err());
        assert!(validate_video_id("   ").is_err());
        assert!(validate_video_id("../etc").is_err());
        assert!(validate_video_id("a/b").is_err());
        assert!(validate_video_id("a\\b").is_err());
    }

    #[test]
    fn pretty_json_uses_four_spaces() {
        let bytes = to_pretty_json(&json!({"a": {"b": 1}})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[tokio::test]
    async fn saved_info_keeps_provider_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ordered.json");
        let raw: serde_json::Value =
            serde_json::from_str(r#"{"id": "abc", "title": "t", "heatmap": [], "chapters": null}"#)
                .unwrap();
        save_info(&VideoInfo::new("abc", raw), &path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let pos = |key: &str| text.find(&format!("\"{key}\"")).unwrap();
        assert!(pos("id") < pos("title"));
        assert!(pos("title") < pos("heatmap"));
        assert!(pos("heatmap") < pos("chapters"));
    }

    #[tokio::test]
    async fn save_then_load_info() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout.ensure_dirs().await.unwrap();
        assert!(layout.info_dir().is_dir());
        assert!(layout.heatmap_dir().is_dir());

        let info = VideoInfo::new("abc", json!({"id": "abc", "heatmap": null}));
        let path = layout.info_path("abc");
        save_info(&info, &path).await.unwrap();

        let loaded = InfoFileProvider::new(&path)
            .extract_info("abc")
            .await
            .unwrap();
        assert_eq!(loaded, info);
    }
}
