// File: crates/timeline-chart/tests/legend.rs
// Purpose: Legend entries and autoscale over multiple named series.

use timeline_chart::{Chart, Series, SeriesType, Theme};

#[test]
fn legend_lists_named_series_in_order() {
    let theme = Theme::light();
    let mut chart = Chart::new();
    chart.add_series(Series::with_data(SeriesType::LineMarkers, theme.series_color(0), vec![(0.0, 1.0)]).named("news"));
    chart.add_series(Series::with_data(SeriesType::LineMarkers, theme.series_color(1), vec![(0.0, 2.0)]));
    chart.add_series(Series::with_data(SeriesType::LineMarkers, theme.series_color(2), vec![(0.0, 3.0)]).named("blog"));

    let legend = chart.legend();
    let labels: Vec<&str> = legend.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["news", "blog"]);
    assert_eq!(legend[1].color, theme.series_color(2));
}

#[test]
fn autoscale_spans_all_series() {
    let mut chart = Chart::new();
    chart.add_series(Series::with_data(SeriesType::Line, Theme::light().line_stroke, vec![(0.0, 1.0), (5.0, 3.0)]));
    chart.add_series(Series::with_data(SeriesType::Line, Theme::light().line_stroke, vec![(2.0, 6.0), (3.0, 1.5)]));

    chart.autoscale_axes(0.0);

    assert!(chart.x_axis.min <= 0.0 + 1e-9);
    assert!(chart.x_axis.max >= 5.0 - 1e-9);
    assert!(chart.y_axis.min <= 1.0 + 1e-9);
    assert!(chart.y_axis.max >= 6.0 - 1e-9);
}
