// File: crates/timeline-core/src/dashboard.rs
// Summary: Dashboard orchestration; keeps the control panel in sync with the provider and renders charts on demand.

use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use timeline_chart::ChartRenderer;
use tracing::{debug, info};

use crate::aggregate::{aggregate, filter_date_range, CountRow};
use crate::bucket::BucketUnit;
use crate::builder::{ChartBuilder, ChartLabels};
use crate::config::DashboardConfig;
use crate::controls::{on_corpus_list, SelectionState};
use crate::corpus::{Corpus, CorpusEntry, CorpusEvent, CorpusEventKind, CorpusProvider};
use crate::error::{Result, TimelineError};

/// Control panel plus chart region for corpora served by a `CorpusProvider`.
///
/// Single-threaded: provider notifications are queued on a channel and applied by
/// [`Dashboard::process_events`] or [`Dashboard::poll`] on the host's thread.
pub struct Dashboard<R: ChartRenderer> {
    provider: Rc<dyn CorpusProvider>,
    corpora: Vec<CorpusEntry>,
    selected: Option<Arc<Corpus>>,
    state: SelectionState,
    builder: ChartBuilder,
    renderer: R,
    charts: Vec<R::Output>,
    counts: Vec<CountRow>,
    events: Receiver<CorpusEvent>,
    poll_interval: Duration,
    last_poll: Option<Instant>,
}

impl<R: ChartRenderer> Dashboard<R> {
    /// Subscribe to every provider event kind and load the current corpus list.
    pub fn new(provider: Rc<dyn CorpusProvider>, renderer: R, config: &DashboardConfig) -> Self {
        let (tx, events) = mpsc::channel();
        for kind in CorpusEventKind::ALL {
            let tx = tx.clone();
            provider.subscribe(
                kind,
                Box::new(move |event: &CorpusEvent| {
                    // Receiver gone means the dashboard was dropped.
                    let _ = tx.send(event.clone());
                }),
            );
        }
        let mut dashboard = Self {
            provider,
            corpora: Vec::new(),
            selected: None,
            state: SelectionState::default(),
            builder: ChartBuilder::new(config.theme()),
            renderer,
            charts: Vec::new(),
            counts: Vec::new(),
            events,
            poll_interval: config.poll_interval(),
            last_poll: None,
        };
        dashboard.refresh_corpora();
        dashboard
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn corpora(&self) -> &[CorpusEntry] {
        &self.corpora
    }

    pub fn selected_corpus(&self) -> Option<&Arc<Corpus>> {
        self.selected.as_ref()
    }

    /// Charts currently displayed: overall first, then the breakdown when grouped.
    pub fn charts(&self) -> &[R::Output] {
        &self.charts
    }

    /// Ungrouped counts behind the displayed overall chart.
    pub fn counts(&self) -> &[CountRow] {
        &self.counts
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Drain queued provider notifications; refreshes the corpus list if any arrived.
    pub fn process_events(&mut self) -> usize {
        let mut received = 0;
        while let Ok(event) = self.events.try_recv() {
            debug!(?event, "provider notification");
            received += 1;
        }
        if received > 0 {
            self.refresh_corpora();
        }
        received
    }

    /// Periodic tick. Refreshes the corpus list once per poll interval; returns whether it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_poll {
            if now.saturating_duration_since(last) < self.poll_interval {
                return false;
            }
        }
        self.last_poll = Some(now);
        self.process_events();
        self.refresh_corpora();
        true
    }

    /// Re-read the provider listing and re-derive everything downstream of a changed corpus.
    /// Returns whether the selected corpus changed.
    pub fn refresh_corpora(&mut self) -> bool {
        self.corpora = self.provider.list_corpora();
        let names: Vec<String> = self.corpora.iter().map(|e| e.name.clone()).collect();
        let next = on_corpus_list(&self.state.corpus, &names);
        if next != self.state.corpus {
            info!(corpora = names.len(), selected = ?next.value(), "corpus list replaced");
            self.state.corpus = next;
        }
        self.sync_selected()
    }

    fn lookup(&self, name: &str) -> Option<Arc<Corpus>> {
        self.corpora.iter().find(|e| e.name == name).map(|e| Arc::clone(&e.corpus))
    }

    /// Cascade only when the selected handle differs from the one the columns were derived from.
    fn sync_selected(&mut self) -> bool {
        let handle = self.state.corpus.value().and_then(|n| self.lookup(n));
        let changed = match (&self.selected, &handle) {
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.selected = handle;
            self.state.cascade(self.selected.as_deref());
            debug!(
                corpus = ?self.state.corpus.value(),
                time_column = ?self.state.columns.time_column.value(),
                "selected corpus changed"
            );
        }
        changed
    }

    /// Explicit selection always re-derives the columns and date range.
    pub fn select_corpus(&mut self, name: Option<&str>) -> bool {
        if let Err(err) = self.state.corpus.select(name) {
            debug!(error = ?err, "corpus selection rejected");
            return false;
        }
        self.selected = name.and_then(|n| self.lookup(n));
        self.state.cascade(self.selected.as_deref());
        true
    }

    pub fn select_time_column(&mut self, name: Option<&str>) -> bool {
        accepted(self.state.select_time_column(self.selected.as_deref(), name), "time column")
    }

    pub fn select_group_column(&mut self, name: Option<&str>) -> bool {
        accepted(self.state.select_group_column(name), "grouping column")
    }

    pub fn set_date_range(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        accepted(self.state.set_date_range(start, end), "date range")
    }

    pub fn set_bucket_count(&mut self, count: i64) -> bool {
        accepted(self.state.set_bucket_count(count), "bucket count")
    }

    pub fn set_bucket_unit(&mut self, unit: BucketUnit) {
        self.state.set_bucket_unit(unit);
    }

    /// Aggregate, build and render the charts for the current selection.
    ///
    /// The displayed charts are replaced only when every chart rendered. Failures are
    /// logged and leave the display untouched. Returns whether the display changed.
    pub fn generate(&mut self) -> bool {
        match self.try_generate() {
            Ok(Some((charts, counts))) => {
                info!(charts = charts.len(), buckets = counts.len(), interval = %self.state.interval, "charts generated");
                self.charts = charts;
                self.counts = counts;
                true
            }
            Ok(None) => {
                debug!("nothing to plot: corpus or time column unselected");
                false
            }
            Err(err) => {
                debug!(error = ?err, "chart generation failed");
                false
            }
        }
    }

    fn try_generate(&self) -> Result<Option<(Vec<R::Output>, Vec<CountRow>)>> {
        let (Some(corpus), Some(time_column)) = (self.selected.as_deref(), self.state.columns.time_column.value())
        else {
            return Ok(None);
        };
        let batch = match self.state.date_range.value() {
            Some((start, end)) => filter_date_range(corpus.batch(), time_column, start, end)?,
            None => corpus.batch().clone(),
        };
        let width = self.state.interval;

        let overall = aggregate(&batch, time_column, width, None)?;
        let mut labels = ChartLabels { time_column: time_column.to_string(), group_column: None, width };
        let mut charts = vec![self.builder.build(&overall, &labels)];

        if let Some(group) = self.state.columns.group_column.value() {
            let rows = aggregate(&batch, time_column, width, Some(group))?;
            labels.group_column = Some(group.to_string());
            charts.push(self.builder.build(&rows, &labels));
        }

        let rendered = charts
            .iter()
            .map(|chart| self.renderer.render(chart))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(TimelineError::Render)?;
        Ok(Some((rendered, overall)))
    }
}

fn accepted(result: Result<()>, what: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            debug!(error = ?err, control = what, "selection rejected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{datetime_array, text_array};
    use chrono::NaiveDate;
    use timeline_chart::Chart;

    struct Describe;

    impl ChartRenderer for Describe {
        type Output = Chart;
        fn render(&self, chart: &Chart) -> anyhow::Result<Chart> {
            Ok(chart.clone())
        }
    }

    fn ts(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn corpus() -> Corpus {
        Corpus::new(
            ["a", "b", "c"],
            vec![
                ("when", datetime_array([Some(ts(1, 3)), Some(ts(1, 9)), Some(ts(4, 1))])),
                ("kind", text_array([Some("x"), Some("y"), Some("x")])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn poll_respects_interval() {
        let loader = Rc::new(crate::corpus::CorpusLoader::new());
        let mut dash = Dashboard::new(loader, Describe, &DashboardConfig::default());
        let t0 = Instant::now();
        assert!(dash.poll(t0));
        assert!(!dash.poll(t0 + Duration::from_millis(100)));
        assert!(dash.poll(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn notifications_update_the_corpus_list() {
        let loader = Rc::new(crate::corpus::CorpusLoader::new());
        let mut dash = Dashboard::new(loader.clone(), Describe, &DashboardConfig::default());
        assert_eq!(dash.state().corpus.value(), None);

        loader.build("first", corpus()).unwrap();
        assert_eq!(dash.process_events(), 1);
        assert_eq!(dash.state().corpus.value(), Some("first"));
        assert_eq!(dash.state().columns.time_column.value(), Some("when"));
        assert_eq!(dash.process_events(), 0);
    }

    #[test]
    fn generate_builds_overall_and_breakdown() {
        let loader = Rc::new(crate::corpus::CorpusLoader::new());
        loader.build("c", corpus()).unwrap();
        let mut dash = Dashboard::new(loader, Describe, &DashboardConfig::default());
        dash.set_bucket_unit(BucketUnit::Months);
        assert!(dash.select_group_column(Some("kind")));
        assert!(dash.generate());
        assert_eq!(dash.charts().len(), 2);
        assert_eq!(dash.counts().len(), 2);
        assert_eq!(dash.charts()[1].series.len(), 2);

        assert!(dash.select_group_column(None));
        assert!(dash.generate());
        assert_eq!(dash.charts().len(), 1);
    }

    #[test]
    fn rejected_setters_keep_state() {
        let loader = Rc::new(crate::corpus::CorpusLoader::new());
        loader.build("c", corpus()).unwrap();
        let mut dash = Dashboard::new(loader, Describe, &DashboardConfig::default());
        let before = dash.state().clone();
        assert!(!dash.select_corpus(Some("nope")));
        assert!(!dash.select_time_column(Some("kind")));
        assert!(!dash.set_bucket_count(0));
        assert_eq!(dash.state(), &before);
    }
}
