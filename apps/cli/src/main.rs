use std::{path::PathBuf, time::Instant};

use anyhow::Result;
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use console::style;
use tracing_subscriber::EnvFilter;

use replaymap_core::{
    InfoFileProvider, OutputLayout, RenderOptions, YtDlpProvider, layout::DEFAULT_OUTPUT_DIR,
    provider::DEFAULT_YT_DLP,
};

use crate::pipeline::{Job, format_duration, run};

mod pipeline;

#[derive(Parser)]
#[command(name = "replaymap", version)]
#[command(about = "Fetch YouTube video metadata and render its \"Most Replayed\" heatmap")]
struct Cli {
    /// YouTube video ID
    #[arg(long = "video_id")]
    video_id: String,

    /// Save the raw metadata to <output_dir>/info/<video_id>.json
    #[arg(long = "save_info", default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    save_info: bool,

    /// Draw chapter markers if the video has any
    #[arg(
        long = "show_chapters",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    show_chapters: bool,

    /// Open the rendered heatmap in the default image viewer
    #[arg(long)]
    show: bool,

    /// Root directory for info/ and heatmaps/
    #[arg(long = "output_dir", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Render from a previously saved info JSON instead of running yt-dlp
    #[arg(long = "from_info")]
    from_info: Option<PathBuf>,

    /// yt-dlp executable
    #[arg(long = "yt_dlp", env = "REPLAYMAP_YT_DLP", default_value = DEFAULT_YT_DLP)]
    yt_dlp: PathBuf,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Filter used when `RUST_LOG` is unset. Library notices (e.g. missing chapters)
/// stay visible at the default level.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,replaymap_core=info",
        1 => "info",
        _ => "debug",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    println!(
        "\n{}  {}\n",
        style("replaymap").cyan().bold(),
        style("Most Replayed Heatmap").dim()
    );

    let job = Job {
        video_id: cli.video_id,
        save_info: cli.save_info,
        show: cli.show,
        layout: OutputLayout::new(cli.output_dir),
        render: RenderOptions {
            show_chapters: cli.show_chapters,
            ..RenderOptions::default()
        },
    };

    let total_start = Instant::now();
    let result = match cli.from_info {
        Some(path) => run(&job, &InfoFileProvider::new(path)).await,
        None => run(&job, &YtDlpProvider::new(cli.yt_dlp)).await,
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    println!(
        "\n{} {}",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );
    println!(
        "{} {}\n",
        style("Saved:").dim(),
        style(summary.path.display()).cyan()
    );

    Ok(())
}
