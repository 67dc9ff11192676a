// File: crates/timeline-core/src/builder.rs
// Summary: Turns bucketed counts into line-chart descriptions (overall frequency or per-group breakdown).

use std::collections::HashMap;

use timeline_chart::{Axis, Chart, Series, SeriesType, Theme, ViewState};

use crate::aggregate::CountRow;
use crate::bucket::BucketWidth;

/// What the rows were aggregated over; drives titles and axis labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartLabels {
    pub time_column: String,
    /// Grouping column the rows were split by, if any.
    pub group_column: Option<String>,
    pub width: BucketWidth,
}

impl ChartLabels {
    pub fn title(&self) -> String {
        let subject = self.group_column.as_deref().unwrap_or("Document");
        format!("{subject} frequency per {}", self.width.describe())
    }

    pub fn y_label(&self) -> String {
        match &self.group_column {
            Some(g) => format!("{g}_frequency"),
            None => "frequency".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChartBuilder {
    theme: Theme,
}

impl ChartBuilder {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// One series when `labels.group_column` is unset; otherwise one named series per
    /// group key, in order of first appearance. Empty input gives a chart without series.
    ///
    /// Group colors come from the theme's ten-color palette and repeat from the
    /// eleventh group on, so series are told apart by legend name, not color alone.
    pub fn build(&self, rows: &[CountRow], labels: &ChartLabels) -> Chart {
        let mut chart = Chart::new().with_title(labels.title());
        let point = |r: &CountRow| (r.bucket_start.and_utc().timestamp() as f64, r.count as f64);

        if labels.group_column.is_none() {
            if !rows.is_empty() {
                let data = rows.iter().map(point).collect();
                chart.add_series(Series::with_data(SeriesType::LineMarkers, self.theme.line_stroke, data));
            }
        } else {
            let mut order: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
            let mut index: HashMap<String, usize> = HashMap::new();
            for r in rows {
                let key = r.group.clone().unwrap_or_default();
                let slot = *index.entry(key.clone()).or_insert_with(|| {
                    order.push((key, Vec::new()));
                    order.len() - 1
                });
                order[slot].1.push(point(r));
            }
            for (i, (key, data)) in order.into_iter().enumerate() {
                chart.add_series(
                    Series::with_data(SeriesType::LineMarkers, self.theme.series_color(i), data).named(key),
                );
            }
        }

        chart.x_axis = Axis::time(labels.time_column.clone(), 0.0, 1.0);
        chart.y_axis = Axis::new(labels.y_label(), 0.0, 1.0);
        ViewState::from_chart(&chart, 0.05).include_zero_y().apply_to_chart(&mut chart);
        chart
    }
}
