//! The "Most Replayed" heatmap plot.

use std::path::{Path, PathBuf};

use crate::{
    axis::{AxisRange, Ticks},
    curve::Curve,
    error::Result,
    figure::{Anchor, Baseline, Figure, FigureSize, Paint, Raster, TextStyle},
    format::{TimeLabels, format_number},
    gradient::Gradient,
    types::{ChapterMarker, VideoRecord},
};

pub const VALUE_AXIS_MAX: f64 = 1.05;
pub const FILL_OPACITY: f64 = 0.85;
pub const OUTLINE_OPACITY: f64 = 0.7;
pub const CHAPTER_LABEL_Y: f64 = -0.15;

const AXES_FACE: &str = "#f8f9fa";
const GRID: &str = "#b0b0b0";
const SPINE: &str = "#cccccc";
const CHAPTER: &str = "#808080";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub show_chapters: bool,
    pub dpi: f64,
    pub size: FigureSize,
    pub title: String,
    /// Padding kept around the content when cropping, in inches.
    pub pad_inches: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_chapters: false,
            dpi: 300.0,
            size: FigureSize {
                width_in: 16.0,
                height_in: 7.0,
            },
            title: "YouTube Most Replayed Heatmap".to_string(),
            pad_inches: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub points: usize,
    pub max_time: f64,
    pub chapters_drawn: usize,
}

/// Plot area in figure points plus the data ranges it shows.
#[derive(Debug, Clone, Copy)]
struct Axes {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x: AxisRange,
    y: AxisRange,
}

impl Axes {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn px(&self, x: f64) -> f64 {
        self.left + self.x.fraction(x) * self.width
    }

    fn py(&self, y: f64) -> f64 {
        self.bottom() - self.y.fraction(y) * self.height
    }
}

/// Lay out the full heatmap figure without rasterizing it.
pub fn build_heatmap_figure(
    curve: &Curve,
    chapters: Option<&[ChapterMarker]>,
    options: &RenderOptions,
) -> (Figure, usize) {
    let gradient = Gradient::replay();
    let mut fig = Figure::new(options.size);

    let axes = Axes {
        left: 72.0,
        top: 60.0,
        width: fig.width() - 72.0 - 130.0,
        height: fig.height() - 60.0 - 64.0,
        x: AxisRange::new(0.0, curve.max_time),
        y: AxisRange::new(0.0, VALUE_AXIS_MAX),
    };
    let x_ticks = Ticks::for_range(axes.x, 10);
    let y_ticks = Ticks::for_range(axes.y, 6);
    let labels = TimeLabels::for_max_time(curve.max_time);

    fig.rect(
        axes.left,
        axes.top,
        axes.width,
        axes.height,
        &Paint::fill(AXES_FACE),
    );
    draw_grid(&mut fig, &axes, &x_ticks, &y_ticks);

    let overlay: &[ChapterMarker] = match chapters {
        Some(chapters) if options.show_chapters && !chapters.is_empty() => chapters,
        _ => &[],
    };

    fig.begin_clip("axes", axes.left, axes.top, axes.width, axes.height);
    draw_curve(&mut fig, &axes, curve, &gradient);
    draw_chapter_guides(&mut fig, &axes, overlay);
    fig.end_group();

    draw_chapter_labels(&mut fig, &axes, overlay);
    let chapters_drawn = overlay.len();

    fig.rect(
        axes.left,
        axes.top,
        axes.width,
        axes.height,
        &Paint::stroke(SPINE, 1.25),
    );
    draw_tick_marks(&mut fig, &axes, &x_ticks, &y_ticks, labels);
    draw_colorbar(&mut fig, &axes, &gradient);

    let center_x = axes.left + axes.width / 2.0;
    fig.text(
        center_x,
        axes.top - 20.0,
        &options.title,
        &TextStyle::new(16.0).bold().anchor(Anchor::Middle),
    );
    fig.text(
        center_x,
        axes.bottom() + 40.0,
        "Time (seconds)",
        &TextStyle::new(12.0).anchor(Anchor::Middle),
    );
    fig.text(
        axes.left - 46.0,
        axes.top + axes.height / 2.0,
        "Most Replayed",
        &TextStyle::new(12.0)
            .anchor(Anchor::Middle)
            .rotated(90.0),
    );

    (fig, chapters_drawn)
}

fn draw_grid(fig: &mut Figure, axes: &Axes, x_ticks: &Ticks, y_ticks: &Ticks) {
    let minor = Paint::stroke(GRID, 0.6).stroke_opacity(0.2).dashed("1,1.65");
    let major = Paint::stroke(GRID, 0.8).stroke_opacity(0.3).dashed("3.7,1.6");

    for (ticks, paint) in [(&x_ticks.minor, &minor), (&x_ticks.major, &major)] {
        for &x in ticks {
            let px = axes.px(x);
            fig.line(px, axes.top, px, axes.bottom(), paint);
        }
    }
    for (ticks, paint) in [(&y_ticks.minor, &minor), (&y_ticks.major, &major)] {
        for &y in ticks {
            let py = axes.py(y);
            fig.line(axes.left, py, axes.right(), py, paint);
        }
    }
}

fn draw_curve(fig: &mut Figure, axes: &Axes, curve: &Curve, gradient: &Gradient) {
    let base = axes.py(0.0);
    for (a, b) in curve.segments() {
        if b.x <= a.x {
            continue;
        }
        let color = gradient.map(a.y).to_hex();
        fig.polygon(
            &[
                (axes.px(a.x), base),
                (axes.px(b.x), base),
                (axes.px(b.x), axes.py(b.y)),
                (axes.px(a.x), axes.py(a.y)),
            ],
            &Paint::fill(color).fill_opacity(FILL_OPACITY),
        );
    }

    let outline: Vec<(f64, f64)> = curve
        .points
        .iter()
        .map(|p| (axes.px(p.x), axes.py(p.y)))
        .collect();
    fig.polyline(
        &outline,
        &Paint::stroke("#000000", 1.5).stroke_opacity(OUTLINE_OPACITY),
    );
}

/// Guide lines stay inside the axes clip.
fn draw_chapter_guides(fig: &mut Figure, axes: &Axes, chapters: &[ChapterMarker]) {
    let guide = Paint::stroke(CHAPTER, 1.0)
        .stroke_opacity(0.5)
        .dashed("3.7,1.6");
    for chapter in chapters {
        let x = axes.px(chapter.start_time);
        fig.line(x, axes.top, x, axes.bottom(), &guide);
    }
}

fn draw_chapter_labels(fig: &mut Figure, axes: &Axes, chapters: &[ChapterMarker]) {
    let label = TextStyle::new(5.0)
        .color(CHAPTER)
        .baseline(Baseline::Hanging)
        .rotated(45.0);
    for chapter in chapters {
        let x = axes.px(chapter.start_time);
        fig.text(x, axes.py(CHAPTER_LABEL_Y), &chapter.title, &label);
    }
}

fn draw_tick_marks(
    fig: &mut Figure,
    axes: &Axes,
    x_ticks: &Ticks,
    y_ticks: &Ticks,
    labels: TimeLabels,
) {
    let major = Paint::stroke(SPINE, 1.0);
    let minor = Paint::stroke(SPINE, 0.6);
    let tick_label = TextStyle::new(11.0);

    for &x in &x_ticks.minor {
        let px = axes.px(x);
        fig.line(px, axes.bottom(), px, axes.bottom() + 2.0, &minor);
    }
    for &x in &x_ticks.major {
        let px = axes.px(x);
        fig.line(px, axes.bottom(), px, axes.bottom() + 3.5, &major);
        fig.text(
            px,
            axes.bottom() + 6.0,
            &labels.format(x),
            &tick_label
                .clone()
                .anchor(Anchor::Middle)
                .baseline(Baseline::Hanging),
        );
    }

    for &y in &y_ticks.minor {
        let py = axes.py(y);
        fig.line(axes.left - 2.0, py, axes.left, py, &minor);
    }
    for &y in &y_ticks.major {
        let py = axes.py(y);
        fig.line(axes.left - 3.5, py, axes.left, py, &major);
        fig.text(
            axes.left - 6.0,
            py,
            &format_number(y),
            &tick_label
                .clone()
                .anchor(Anchor::End)
                .baseline(Baseline::Middle),
        );
    }
}

fn draw_colorbar(fig: &mut Figure, axes: &Axes, gradient: &Gradient) {
    let left = axes.right() + 0.02 * fig.width();
    let width = 0.025 * fig.width().min(fig.height() * 2.0);
    let colors = gradient.colors();
    let band = axes.height / colors.len() as f64;

    for (k, color) in colors.iter().enumerate() {
        let y = axes.bottom() - (k + 1) as f64 * band;
        // overlap by a hair so antialiasing leaves no seams
        fig.rect(left, y - 0.2, width, band + 0.4, &Paint::fill(color.to_hex()));
    }
    fig.rect(left, axes.top, width, axes.height, &Paint::stroke(SPINE, 0.8));

    let scale = AxisRange::new(0.0, 1.0);
    let label = TextStyle::new(9.0).baseline(Baseline::Middle);
    for &v in &Ticks::for_range(scale, 5).major {
        let y = axes.bottom() - scale.fraction(v) * axes.height;
        fig.line(left + width, y, left + width + 3.5, y, &Paint::stroke(SPINE, 0.8));
        fig.text(left + width + 6.0, y, &format_number(v), &label);
    }
}

/// Render the heatmap and return the cropped pixels.
pub fn render_heatmap(
    curve: &Curve,
    chapters: Option<&[ChapterMarker]>,
    options: &RenderOptions,
) -> Result<(Raster, usize)> {
    let (fig, chapters_drawn) = build_heatmap_figure(curve, chapters, options);
    let raster = fig.rasterize(options.dpi)?.crop_tight(options.pad_inches);
    Ok((raster, chapters_drawn))
}

/// Reconstruct, render and write the heatmap of `record` to `path` as PNG.
pub fn save_heatmap(
    record: &VideoRecord,
    options: &RenderOptions,
    path: &Path,
) -> Result<RenderSummary> {
    let curve = Curve::from_samples(&record.heatmap);
    tracing::debug!(
        video_id = %record.video_id,
        samples = record.heatmap.len(),
        points = curve.points.len(),
        max_time = curve.max_time,
        "reconstructed curve"
    );

    let (raster, chapters_drawn) = render_heatmap(&curve, record.chapters.as_deref(), options)?;
    raster.save_png(path)?;
    tracing::debug!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "saved heatmap"
    );

    Ok(RenderSummary {
        path: path.to_path_buf(),
        width: raster.width(),
        height: raster.height(),
        points: curve.points.len(),
        max_time: curve.max_time,
        chapters_drawn,
    })
}
