//! Replaymap Core Library
//!
//! Fetches YouTube video metadata through yt-dlp, keeps the raw record on disk and
//! renders the "Most Replayed" heatmap, optionally with chapter markers.

pub mod axis;
pub mod chart;
pub mod curve;
pub mod display;
pub mod error;
pub mod figure;
pub mod format;
pub mod gradient;
pub mod layout;
pub mod provider;
pub mod types;
pub mod validate;

// Re-export commonly used items at crate root
pub use chart::{RenderOptions, RenderSummary, render_heatmap, save_heatmap};
pub use curve::{Curve, CurvePoint};
pub use display::show_image;
pub use error::{ReplaymapError, Result};
pub use format::{format_record_summary, format_timestamp};
pub use gradient::{Color, Gradient};
pub use layout::{OutputLayout, save_info, validate_video_id};
pub use provider::{InfoFileProvider, MetadataProvider, YtDlpProvider, video_url};
pub use types::{ChapterMarker, HeatmapSample, VideoInfo, VideoRecord};
pub use validate::{optional_field, required_field, validate_field};
