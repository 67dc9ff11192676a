// File: crates/timeline-chart/tests/rgba.rs
// Purpose: Validate RGBA rendering buffer shape and a few pixels.

use timeline_chart::{Axis, Chart, RenderOptions, Series, SeriesType, Theme};

#[test]
fn render_rgba8_buffer() {
    let mut chart = Chart::new();
    chart.x_axis = Axis::new("X", 0.0, 4.0);
    chart.y_axis = Axis::new("Y", 0.0, 4.0);
    chart.add_series(Series::with_data(SeriesType::Line, Theme::light().line_stroke, vec![(0.0, 0.0), (4.0, 4.0)]));

    let mut opts = RenderOptions::default();
    opts.width = 320;
    opts.height = 200;
    opts.draw_labels = false; // avoid font variance
    let (px, w, h, stride) = chart.render_to_rgba8(&opts).expect("rgba render");
    assert_eq!((w, h), (320, 200));
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(stride, (w as usize) * 4);

    // Top-left pixel sits in the inset margin: pure background.
    let bg = opts.theme.background;
    assert_eq!(&px[0..4], &[bg.r(), bg.g(), bg.b(), 255]);
}

#[test]
fn series_color_reaches_the_plot() {
    let color = Theme::light().series_color(1);
    let mut chart = Chart::new();
    chart.x_axis = Axis::new("X", 0.0, 1.0);
    chart.y_axis = Axis::new("Y", 0.0, 1.0);
    chart.add_series(Series::with_data(SeriesType::LineMarkers, color, vec![(0.0, 0.5), (1.0, 0.5)]));

    let mut opts = RenderOptions::default();
    opts.width = 400;
    opts.height = 300;
    opts.draw_labels = false;
    let (px, w, _, stride) = chart.render_to_rgba8(&opts).expect("rgba render");

    // Horizontal line through the middle of the plot area.
    let plot_mid_y = (opts.insets.top as usize + (300 - opts.insets.bottom as usize)) / 2;
    let plot_mid_x = (opts.insets.left as usize + (w as usize - opts.insets.right as usize)) / 2;
    let i = plot_mid_y * stride + plot_mid_x * 4;
    assert_eq!(&px[i..i + 3], &[color.r(), color.g(), color.b()]);
}
