// File: crates/timeline-chart/src/lib.rs
// Summary: Chart library entry point; exports the chart description model and PNG rendering.

pub mod axis;
pub mod chart;
pub mod downsample;
pub mod geometry;
pub mod grid;
pub mod renderer;
pub mod series;
pub mod theme;
pub mod view;

pub use axis::{Axis, ScaleKind};
pub use chart::{Chart, LegendEntry, RenderOptions};
pub use downsample::lttb;
pub use geometry::Insets;
pub use renderer::{ChartRenderer, PngRenderer, RenderedChart};
pub use series::{Series, SeriesStyle, SeriesType};
pub use theme::Theme;
pub use view::ViewState;
