// File: crates/timeline-chart/src/series.rs
// Summary: Line series model: named, colored (x, y) points with optional markers.

use skia_safe as skia;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesType {
    Line,
    /// Line with a filled marker on every point.
    LineMarkers,
}

/// Stroke width and marker radius, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesStyle {
    pub line_width: f32,
    pub marker_radius: f32,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self { line_width: 4.0, marker_radius: 5.0 }
    }
}

#[derive(Clone, Debug)]
pub struct Series {
    pub series_type: SeriesType,
    /// Legend label; unnamed series are left out of the legend.
    pub name: Option<String>,
    pub color: skia::Color,
    pub style: SeriesStyle,
    pub data_xy: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(series_type: SeriesType, color: skia::Color) -> Self {
        Self { series_type, name: None, color, style: SeriesStyle::default(), data_xy: Vec::new() }
    }

    pub fn with_data(series_type: SeriesType, color: skia::Color, data: Vec<(f64, f64)>) -> Self {
        Self { data_xy: data, ..Self::new(series_type, color) }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize { self.data_xy.len() }

    pub fn is_empty(&self) -> bool { self.data_xy.is_empty() }

    /// Downsample using LTTB to at most `max_points`; markers are dropped once thinned.
    pub fn downsample_xy_lttb(&self, max_points: usize) -> Self {
        use crate::downsample::lttb;
        if self.data_xy.len() > max_points && max_points >= 2 {
            Series {
                series_type: SeriesType::Line,
                data_xy: lttb(&self.data_xy, max_points),
                ..self.clone()
            }
        } else {
            self.clone()
        }
    }
}
