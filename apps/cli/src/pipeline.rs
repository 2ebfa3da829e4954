use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use replaymap_core::{
    MetadataProvider, OutputLayout, RenderOptions, RenderSummary, VideoRecord,
    format_record_summary, save_heatmap, save_info, show_image, validate_video_id,
};

pub struct Job {
    pub video_id: String,
    pub save_info: bool,
    pub show: bool,
    pub layout: OutputLayout,
    pub render: RenderOptions,
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn elapsed(start: Instant) -> String {
    style(format!("[{}]", format_duration(start.elapsed())))
        .dim()
        .to_string()
}

/// Fetch → (save) → validate → render → (show), one step after the other.
pub async fn run<P: MetadataProvider>(job: &Job, provider: &P) -> Result<RenderSummary> {
    validate_video_id(&job.video_id)?;
    job.layout
        .ensure_dirs()
        .await
        .with_context(|| format!("create output dirs under '{}'", job.layout.root().display()))?;

    // Step 1: Fetch metadata
    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Fetching metadata via {}...", provider.name()));
    let info = match provider.extract_info(&job.video_id).await {
        Ok(info) => info,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    spinner.finish_with_message(format!(
        "{} Metadata extracted {}",
        style("✓").green().bold(),
        elapsed(step_start)
    ));

    // Step 2: Persist the raw record
    if job.save_info {
        let info_path = job.layout.info_path(&job.video_id);
        save_info(&info, &info_path).await?;
        println!(
            "{} Info saved: {}",
            style("✓").green().bold(),
            style(info_path.display()).dim()
        );
    }

    // Step 3: Map into a typed record, heatmap required
    let record = VideoRecord::from_info(&info)?;
    let chapter_note = match &record.chapters {
        Some(chapters) => format!("{} chapters", chapters.len()),
        None => "no chapters".to_string(),
    };
    println!(
        "{} {}: {} samples, {}",
        style("✓").green().bold(),
        format_record_summary(&record),
        style(record.heatmap.len()).yellow(),
        chapter_note
    );

    // Step 4: Render
    let step_start = Instant::now();
    let spinner = create_spinner("Rendering heatmap...");
    let heatmap_path = job.layout.heatmap_path(&job.video_id);
    let summary = match save_heatmap(&record, &job.render, &heatmap_path) {
        Ok(summary) => summary,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    spinner.finish_with_message(format!(
        "{} Heatmap rendered: {}x{} {}",
        style("✓").green().bold(),
        summary.width,
        summary.height,
        elapsed(step_start)
    ));

    // Step 5: Optional on-screen display, never fatal
    if job.show {
        if let Err(e) = show_image(&summary.path).await {
            tracing::warn!("{e}");
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_read_naturally() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
