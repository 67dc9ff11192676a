// File: crates/timeline-chart/src/axis.rs
// Summary: Axis model with labels, ranges and tick label formatting.

use chrono::DateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    /// Values are seconds since the Unix epoch; ticks print as dates.
    Time,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub kind: ScaleKind,
}

impl Axis {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, kind: ScaleKind::Linear }
    }

    pub fn time(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, kind: ScaleKind::Time }
    }

    pub fn default_x() -> Self {
        Self::time("Time", 0.0, 1.0)
    }

    pub fn default_y() -> Self {
        Self::new("Count", 0.0, 1.0)
    }

    /// Human readable tick label for `v`. Time ticks drop the clock part when
    /// the visible span is at least a few days.
    pub fn format_tick(&self, v: f64) -> String {
        match self.kind {
            ScaleKind::Linear => {
                if (v - v.round()).abs() < 1e-9 { format!("{}", v.round() as i64) } else { format!("{v:.2}") }
            }
            ScaleKind::Time => {
                let Some(dt) = DateTime::from_timestamp(v.floor() as i64, 0) else {
                    return format!("{v}");
                };
                if self.max - self.min >= 3.0 * 86_400.0 {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%m-%d %H:%M").to_string()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_ticks_print_integers_plainly() {
        let a = Axis::new("Count", 0.0, 10.0);
        assert_eq!(a.format_tick(4.0), "4");
        assert_eq!(a.format_tick(2.5), "2.50");
    }

    #[test]
    fn time_ticks_print_dates_for_wide_spans() {
        // 2021-03-01T00:00:00Z
        let a = Axis::time("created", 1_614_556_800.0, 1_614_556_800.0 + 90.0 * 86_400.0);
        assert_eq!(a.format_tick(1_614_556_800.0), "2021-03-01");
    }

    #[test]
    fn time_ticks_print_clock_for_narrow_spans() {
        let a = Axis::time("created", 1_614_556_800.0, 1_614_556_800.0 + 3_600.0);
        assert_eq!(a.format_tick(1_614_556_800.0 + 1_800.0), "03-01 00:30");
    }
}
