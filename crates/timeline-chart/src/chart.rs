// File: crates/timeline-chart/src/chart.rs
// Summary: Chart description (title, series, axes) and headless rendering using Skia CPU raster surfaces.

use std::io::Cursor;

use anyhow::{Context, Result};
use skia_safe as skia;

use crate::geometry::{Insets, RectI32};
use crate::grid::{linspace, nice_ticks};
use crate::series::{Series, SeriesType};
use crate::{Axis, Theme, ViewState};

/// Default surface size in pixels.
pub const WIDTH: i32 = 1024;
pub const HEIGHT: i32 = 640;

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    pub theme: Theme,
    /// Text (title, ticks, legend) can be switched off for pixel-stable tests.
    pub draw_labels: bool,
    /// Series longer than this are thinned with LTTB before drawing.
    pub max_points: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            theme: Theme::default(),
            draw_labels: true,
            max_points: 2_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: skia::Color,
}

#[derive(Clone, Debug)]
pub struct Chart {
    pub title: Option<String>,
    pub series: Vec<Series>,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    pub fn new() -> Self {
        Self {
            title: None,
            series: Vec::new(),
            x_axis: Axis::default_x(),
            y_axis: Axis::default_y(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    /// True when no series carries a point.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }

    /// One entry per named series, in series order.
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.series
            .iter()
            .filter_map(|s| s.name.as_ref().map(|n| LegendEntry { label: n.clone(), color: s.color }))
            .collect()
    }

    /// Fit both axes to the data, padding Y by `margin` (fraction of the span).
    pub fn autoscale_axes(&mut self, margin: f64) {
        ViewState::from_chart(self, margin).apply_to_chart(self);
    }

    /// Render into a tightly packed, unpremultiplied RGBA buffer.
    /// Returns `(pixels, width, height, row_bytes)`.
    pub fn render_to_rgba8(&self, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
        if opts.width <= 0 || opts.height <= 0 {
            anyhow::bail!("invalid surface size {}x{}", opts.width, opts.height);
        }
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        self.draw(surface.canvas(), opts);

        let info = skia::ImageInfo::new(
            (opts.width, opts.height),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Unpremul,
            None,
        );
        let row_bytes = opts.width as usize * 4;
        let mut pixels = vec![0u8; row_bytes * opts.height as usize];
        if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            anyhow::bail!("reading back raster pixels failed");
        }
        Ok((pixels, opts.width as u32, opts.height as u32, row_bytes))
    }

    /// Render to PNG bytes in memory.
    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let (pixels, w, h, _) = self.render_to_rgba8(opts)?;
        let img = image::RgbaImage::from_raw(w, h, pixels)
            .ok_or_else(|| anyhow::anyhow!("pixel buffer does not match {w}x{h}"))?;
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).context("encode PNG failed")?;
        Ok(out.into_inner())
    }

    /// Render the chart to a PNG at `output_png_path`.
    pub fn render_to_png(&self, opts: &RenderOptions, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_to_png_bytes(opts)?;
        let path = output_png_path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn draw(&self, canvas: &skia::Canvas, opts: &RenderOptions) {
        let theme = &opts.theme;
        canvas.clear(theme.background);

        let plot = RectI32::plot_area(opts.width, opts.height, &opts.insets);
        let x_ticks = linspace(self.x_axis.min, self.x_axis.max, 6);
        let y_ticks = nice_ticks(self.y_axis.min, self.y_axis.max, 5);

        draw_grid(canvas, &plot, &self.x_axis, &self.y_axis, &x_ticks, &y_ticks, theme);
        draw_axes(canvas, &plot, theme);

        canvas.save();
        let clip = skia::Rect::from_ltrb(
            plot.left as f32 - 8.0,
            plot.top as f32 - 8.0,
            plot.right as f32 + 8.0,
            plot.bottom as f32 + 8.0,
        );
        canvas.clip_rect(clip, skia::ClipOp::Intersect, true);
        for s in &self.series {
            let s = s.downsample_xy_lttb(opts.max_points);
            draw_line_series(canvas, &plot, &self.x_axis, &self.y_axis, &s);
        }
        canvas.restore();

        if opts.draw_labels {
            draw_tick_labels(canvas, &plot, &self.x_axis, &self.y_axis, &x_ticks, &y_ticks, theme);
            draw_axis_labels(canvas, &plot, &self.x_axis, &self.y_axis, theme);
            if let Some(title) = &self.title {
                draw_title(canvas, &plot, title, theme);
            }
            draw_legend(canvas, &plot, &self.legend(), theme);
        }
    }
}

// ---- helpers ----------------------------------------------------------------

fn to_px_x(plot: &RectI32, axis: &Axis, x: f64) -> f32 {
    let span = (axis.max - axis.min).max(1e-9);
    plot.left as f32 + ((x - axis.min) / span) as f32 * plot.width() as f32
}

fn to_px_y(plot: &RectI32, axis: &Axis, y: f64) -> f32 {
    let span = (axis.max - axis.min).max(1e-9);
    plot.bottom as f32 - ((y - axis.min) / span) as f32 * plot.height() as f32
}

fn label_font(size: f32) -> skia::Font {
    let mut font = skia::Font::default();
    font.set_size(size);
    font
}

fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_color(color);
    paint.set_anti_alias(true);
    paint
}

fn draw_grid(
    canvas: &skia::Canvas,
    plot: &RectI32,
    x_axis: &Axis,
    y_axis: &Axis,
    x_ticks: &[f64],
    y_ticks: &[f64],
    theme: &Theme,
) {
    let mut paint = fill_paint(theme.grid);
    paint.set_stroke_width(1.0);

    for &x in x_ticks {
        let px = to_px_x(plot, x_axis, x);
        canvas.draw_line((px, plot.top as f32), (px, plot.bottom as f32), &paint);
    }
    for &y in y_ticks {
        let py = to_px_y(plot, y_axis, y);
        canvas.draw_line((plot.left as f32, py), (plot.right as f32, py), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, plot: &RectI32, theme: &Theme) {
    let mut paint = fill_paint(theme.axis_line);
    paint.set_stroke_width(1.5);
    let (l, t, r, b) = (plot.left as f32, plot.top as f32, plot.right as f32, plot.bottom as f32);
    canvas.draw_line((l, b), (r, b), &paint);
    canvas.draw_line((l, t), (l, b), &paint);
}

fn draw_tick_labels(
    canvas: &skia::Canvas,
    plot: &RectI32,
    x_axis: &Axis,
    y_axis: &Axis,
    x_ticks: &[f64],
    y_ticks: &[f64],
    theme: &Theme,
) {
    let paint = fill_paint(theme.tick);
    let font = label_font(12.0);
    for &x in x_ticks {
        let label = x_axis.format_tick(x);
        let px = to_px_x(plot, x_axis, x) - label.len() as f32 * 3.3;
        canvas.draw_str(&label, (px, plot.bottom as f32 + 18.0), &font, &paint);
    }
    for &y in y_ticks {
        let label = y_axis.format_tick(y);
        let px = plot.left as f32 - 8.0 - label.len() as f32 * 7.0;
        canvas.draw_str(&label, (px, to_px_y(plot, y_axis, y) + 4.0), &font, &paint);
    }
}

fn draw_axis_labels(canvas: &skia::Canvas, plot: &RectI32, x: &Axis, y: &Axis, theme: &Theme) {
    let paint = fill_paint(theme.axis_label);
    let font = label_font(14.0);
    let x_label_px = (plot.left + plot.right) as f32 * 0.5 - x.label.len() as f32 * 3.8;
    canvas.draw_str(&x.label, (x_label_px, plot.bottom as f32 + 42.0), &font, &paint);
    canvas.draw_str(&y.label, (plot.left as f32 - 60.0, plot.top as f32 - 12.0), &font, &paint);
}

fn draw_title(canvas: &skia::Canvas, plot: &RectI32, title: &str, theme: &Theme) {
    let paint = fill_paint(theme.title);
    let font = label_font(18.0);
    canvas.draw_str(title, (plot.left as f32, plot.top as f32 - 30.0), &font, &paint);
}

fn draw_legend(canvas: &skia::Canvas, plot: &RectI32, entries: &[LegendEntry], theme: &Theme) {
    if entries.is_empty() {
        return;
    }
    let text = fill_paint(theme.axis_label);
    let font = label_font(13.0);
    let x0 = plot.right as f32 + 16.0;
    for (i, e) in entries.iter().enumerate() {
        let y = plot.top as f32 + 12.0 + i as f32 * 20.0;
        let mut swatch = fill_paint(e.color);
        swatch.set_stroke_width(4.0);
        canvas.draw_line((x0, y - 4.0), (x0 + 20.0, y - 4.0), &swatch);
        canvas.draw_circle((x0 + 10.0, y - 4.0), 4.0, &swatch);
        canvas.draw_str(&e.label, (x0 + 28.0, y), &font, &text);
    }
}

fn draw_line_series(canvas: &skia::Canvas, plot: &RectI32, x_axis: &Axis, y_axis: &Axis, series: &Series) {
    let data = &series.data_xy;
    if data.is_empty() {
        return;
    }
    let points: Vec<(f32, f32)> = data
        .iter()
        .map(|&(x, y)| (to_px_x(plot, x_axis, x), to_px_y(plot, y_axis, y)))
        .collect();

    if points.len() >= 2 {
        let mut path = skia::Path::new();
        path.move_to(points[0]);
        for &p in points.iter().skip(1) {
            path.line_to(p);
        }
        let mut stroke = fill_paint(series.color);
        stroke.set_style(skia::paint::Style::Stroke);
        stroke.set_stroke_width(series.style.line_width);
        canvas.draw_path(&path, &stroke);
    }

    // A lone point has no segment to draw, so it always gets a marker.
    if series.series_type == SeriesType::LineMarkers || points.len() == 1 {
        let marker = fill_paint(series.color);
        for &p in &points {
            canvas.draw_circle(p, series.style.marker_radius, &marker);
        }
    }
}
