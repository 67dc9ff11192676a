// File: crates/timeline-core/src/config.rs
// Summary: Dashboard configuration, deserialized from TOML with every field defaulted.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use timeline_chart::{theme, RenderOptions, Theme};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Period of the corpus-list poll.
    pub poll_interval_ms: u64,
    pub chart_width: i32,
    pub chart_height: i32,
    /// Theme preset name, see `timeline_chart::theme::presets`.
    pub theme: String,
    pub controls_max_width: u32,
    /// CSV header holding document bodies when loading corpora from files.
    pub document_column: String,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            chart_width: 1024,
            chart_height: 640,
            theme: "light".to_string(),
            controls_max_width: 120,
            document_column: "document".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: DashboardConfig = toml::from_str(raw).context("parsing dashboard config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be positive");
        }
        if self.chart_width <= 0 || self.chart_height <= 0 {
            anyhow::bail!("chart size must be positive, got {}x{}", self.chart_width, self.chart_height);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn theme(&self) -> Theme {
        theme::find(&self.theme)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.chart_width,
            height: self.chart_height,
            theme: self.theme(),
            ..RenderOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn partial_document_overrides_fields() {
        let cfg = DashboardConfig::from_toml_str("theme = \"dark\"\nchart_width = 800\n").unwrap();
        assert_eq!(cfg.theme().name, "dark");
        assert_eq!(cfg.render_options().width, 800);
        assert_eq!(cfg.render_options().height, 640);
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        assert!(DashboardConfig::from_toml_str("poll_interval_ms = 0").is_err());
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(DashboardConfig::from_toml_str("chart_width = \"wide\"").is_err());
    }
}
