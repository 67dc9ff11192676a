// File: crates/timeline-chart/src/renderer.rs
// Summary: Renderer seam between chart descriptions and whatever the host displays.

use anyhow::Result;

use crate::{Chart, RenderOptions};

/// Turns a chart description into something a host can embed.
pub trait ChartRenderer {
    type Output;
    fn render(&self, chart: &Chart) -> Result<Self::Output>;
}

/// A chart encoded as PNG, ready to write to disk or inline as a data URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedChart {
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// CPU raster renderer producing PNG bytes.
#[derive(Clone, Debug, Default)]
pub struct PngRenderer {
    pub opts: RenderOptions,
}

impl PngRenderer {
    pub fn new(opts: RenderOptions) -> Self {
        Self { opts }
    }
}

impl ChartRenderer for PngRenderer {
    type Output = RenderedChart;

    fn render(&self, chart: &Chart) -> Result<RenderedChart> {
        let png = chart.render_to_png_bytes(&self.opts)?;
        Ok(RenderedChart {
            title: chart.title.clone(),
            width: self.opts.width as u32,
            height: self.opts.height as u32,
            png,
        })
    }
}
