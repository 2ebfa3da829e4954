//! Owned drawing surface for a single rendered image.
//!
//! A [`Figure`] collects vector primitives in figure points (1/72 inch) into an
//! SVG document, rasterizes it through `usvg`/`resvg` at the requested DPI and
//! hands back a [`Raster`] that can be cropped and written as PNG. Nothing is
//! shared between figures; dropping one releases everything it allocated.

use std::{fmt::Write as _, path::Path};

use image::{ImageFormat, RgbaImage};

use crate::error::{ReplaymapError, Result};

pub const POINTS_PER_INCH: f64 = 72.0;

const MAX_DIM: u32 = 16_384;
const FONT_FAMILY: &str = "DejaVu Sans, Bitstream Vera Sans, Arial, Helvetica, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl FigureSize {
    pub fn width_pt(&self) -> f64 {
        self.width_in * POINTS_PER_INCH
    }

    pub fn height_pt(&self) -> f64 {
        self.height_in * POINTS_PER_INCH
    }
}

/// Fill/stroke settings for shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paint {
    pub fill: Option<String>,
    pub fill_opacity: f64,
    pub stroke: Option<String>,
    pub stroke_opacity: f64,
    pub stroke_width: f64,
    pub dash: Option<String>,
}

impl Paint {
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            fill_opacity: 1.0,
            ..Self::default()
        }
    }

    pub fn stroke(color: impl Into<String>, width: f64) -> Self {
        Self {
            stroke: Some(color.into()),
            stroke_opacity: 1.0,
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }

    pub fn stroke_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = opacity;
        self
    }

    pub fn dashed(mut self, pattern: impl Into<String>) -> Self {
        self.dash = Some(pattern.into());
        self
    }

    fn attrs(&self) -> String {
        let mut out = String::new();
        match &self.fill {
            Some(fill) => {
                let _ = write!(out, r#" fill="{fill}""#);
                if self.fill_opacity < 1.0 {
                    let _ = write!(out, r#" fill-opacity="{}""#, num(self.fill_opacity));
                }
            }
            None => out.push_str(r#" fill="none""#),
        }
        if let Some(stroke) = &self.stroke {
            let _ = write!(
                out,
                r#" stroke="{stroke}" stroke-width="{}""#,
                num(self.stroke_width)
            );
            if self.stroke_opacity < 1.0 {
                let _ = write!(out, r#" stroke-opacity="{}""#, num(self.stroke_opacity));
            }
            if let Some(dash) = &self.dash {
                let _ = write!(out, r#" stroke-dasharray="{dash}""#);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Alphabetic,
    Middle,
    Hanging,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub color: String,
    pub anchor: Anchor,
    pub baseline: Baseline,
    /// Degrees, counter-clockwise.
    pub rotation: f64,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            bold: false,
            color: "#262626".to_string(),
            anchor: Anchor::Start,
            baseline: Baseline::Alphabetic,
            rotation: 0.0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}

/// Vector scene for one image, laid out in points.
#[derive(Debug)]
pub struct Figure {
    size: FigureSize,
    /// Scratch space around the figure so overflowing labels survive until cropping.
    bleed: f64,
    defs: String,
    body: String,
    open_groups: usize,
}

impl Figure {
    pub fn new(size: FigureSize) -> Self {
        Self {
            size,
            bleed: POINTS_PER_INCH,
            defs: String::new(),
            body: String::new(),
            open_groups: 0,
        }
    }

    pub fn size(&self) -> FigureSize {
        self.size
    }

    pub fn width(&self) -> f64 {
        self.size.width_pt()
    }

    pub fn height(&self) -> f64 {
        self.size.height_pt()
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
            num(x),
            num(y),
            num(w.max(0.0)),
            num(h.max(0.0)),
            paint.attrs()
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, paint: &Paint) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            paint.attrs()
        );
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let _ = writeln!(
            self.body,
            r#"<polygon points="{}"{}/>"#,
            point_list(points),
            paint.attrs()
        );
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], paint: &Paint) {
        if points.len() < 2 {
            return;
        }
        let _ = writeln!(
            self.body,
            r#"<polyline points="{}" stroke-linejoin="round"{}/>"#,
            point_list(points),
            paint.attrs()
        );
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        let anchor = match style.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let baseline = match style.baseline {
            Baseline::Alphabetic => "alphabetic",
            Baseline::Middle => "central",
            Baseline::Hanging => "hanging",
        };
        let weight = if style.bold { "bold" } else { "normal" };
        let transform = if style.rotation != 0.0 {
            format!(
                r#" transform="rotate({} {} {})""#,
                num(-style.rotation),
                num(x),
                num(y)
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="{}" font-weight="{weight}" fill="{}" text-anchor="{anchor}" dominant-baseline="{baseline}"{transform}>{}</text>"#,
            num(x),
            num(y),
            num(style.size),
            style.color,
            escape_text(content)
        );
    }

    /// Start a group clipped to the given rectangle; close it with [`Figure::end_group`].
    pub fn begin_clip(&mut self, id: &str, x: f64, y: f64, w: f64, h: f64) {
        let _ = writeln!(
            self.defs,
            r#"<clipPath id="{id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            num(x),
            num(y),
            num(w),
            num(h)
        );
        let _ = writeln!(self.body, r#"<g clip-path="url(#{id})">"#);
        self.open_groups += 1;
    }

    pub fn end_group(&mut self) {
        if self.open_groups > 0 {
            self.body.push_str("</g>\n");
            self.open_groups -= 1;
        }
    }

    /// The complete SVG document, white background included.
    pub fn to_svg(&self) -> String {
        let b = self.bleed;
        let total_w = self.width() + 2.0 * b;
        let total_h = self.height() + 2.0 * b;

        let mut svg = String::with_capacity(self.body.len() + self.defs.len() + 512);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}">"#,
            w = num(total_w),
            h = num(total_h),
            x = num(-b),
            y = num(-b),
        );
        if !self.defs.is_empty() {
            let _ = write!(svg, "<defs>\n{}</defs>\n", self.defs);
        }
        let _ = writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="white"/>"#,
            num(-b),
            num(-b),
            num(total_w),
            num(total_h)
        );
        svg.push_str(&self.body);
        for _ in 0..self.open_groups {
            svg.push_str("</g>\n");
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Rasterize at `dpi` pixels per inch.
    pub fn rasterize(&self, dpi: f64) -> Result<Raster> {
        let svg = self.to_svg();

        let mut opt = usvg::Options::default();
        opt.font_family = "DejaVu Sans".to_string();
        opt.fontdb_mut().load_system_fonts();
        let tree = usvg::Tree::from_str(&svg, &opt)
            .map_err(|e| ReplaymapError::render(format!("parse figure svg: {e}")))?;

        let scale = (dpi / POINTS_PER_INCH) as f32;
        let width = to_px(tree.size().width() * scale)?;
        let height = to_px(tree.size().height() * scale)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| ReplaymapError::render("failed to allocate figure pixmap"))?;
        pixmap.fill(resvg::tiny_skia::Color::WHITE);

        let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        // Opaque background, so premultiplied and straight alpha coincide.
        let image = RgbaImage::from_raw(width, height, pixmap.take())
            .ok_or_else(|| ReplaymapError::render("pixmap size mismatch"))?;
        tracing::debug!(width, height, dpi, "rasterized figure");
        Ok(Raster { image, dpi })
    }
}

fn to_px(v: f32) -> Result<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ReplaymapError::render("figure has invalid width/height"));
    }
    let px = (v.ceil() as u32).max(1);
    if px > MAX_DIM {
        return Err(ReplaymapError::render(format!(
            "figure raster too large: {px}px (max {MAX_DIM})"
        )));
    }
    Ok(px)
}

/// Rendered pixels plus the resolution they were produced at.
#[derive(Debug, Clone)]
pub struct Raster {
    pub image: RgbaImage,
    pub dpi: f64,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Bounding box `(x, y, w, h)` of every pixel that is not pure white.
    pub fn content_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let (mut x0, mut y0) = (u32::MAX, u32::MAX);
        let (mut x1, mut y1) = (0u32, 0u32);
        for (x, y, px) in self.image.enumerate_pixels() {
            if px.0[..3] != [255, 255, 255] {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
            }
        }
        (x0 != u32::MAX).then(|| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    /// Crop to the drawn content plus `pad_in` inches on every side.
    pub fn crop_tight(self, pad_in: f64) -> Raster {
        let Some((x, y, w, h)) = self.content_bounds() else {
            return self;
        };
        let pad = (pad_in * self.dpi).round() as u32;
        let x0 = x.saturating_sub(pad);
        let y0 = y.saturating_sub(pad);
        let x1 = (x + w + pad).min(self.width());
        let y1 = (y + h + pad).min(self.height());

        let image = image::imageops::crop_imm(&self.image, x0, y0, x1 - x0, y1 - y0).to_image();
        Raster {
            image,
            dpi: self.dpi,
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn point_list(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
