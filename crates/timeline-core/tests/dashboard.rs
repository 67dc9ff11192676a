// File: crates/timeline-core/tests/dashboard.rs
// Purpose: Dashboard behavior against the in-memory provider with fake renderers.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::bail;
use chrono::{NaiveDate, NaiveDateTime};
use timeline_chart::{Chart, ChartRenderer, PngRenderer};
use timeline_core::{datetime_array, text_array, BucketUnit, Corpus, CorpusLoader, Dashboard, DashboardConfig};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

fn corpus(times: &[NaiveDateTime]) -> Corpus {
    Corpus::new(
        times.iter().map(|t| format!("written {t}")),
        vec![
            ("created", datetime_array(times.iter().copied().map(Some))),
            ("author", text_array((0..times.len()).map(|i| Some(if i % 2 == 0 { "ann" } else { "bo" })))),
        ],
    )
    .unwrap()
}

struct Passthrough;

impl ChartRenderer for Passthrough {
    type Output = Chart;
    fn render(&self, chart: &Chart) -> anyhow::Result<Chart> {
        Ok(chart.clone())
    }
}

/// Fails once `fail` is set.
struct Flaky {
    fail: Rc<Cell<bool>>,
}

impl ChartRenderer for Flaky {
    type Output = Chart;
    fn render(&self, chart: &Chart) -> anyhow::Result<Chart> {
        if self.fail.get() {
            bail!("surface unavailable");
        }
        Ok(chart.clone())
    }
}

#[test]
fn new_corpus_is_selected_and_columns_derived() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("old", corpus(&[at(2020, 1, 1)])).unwrap();
    let mut dash = Dashboard::new(loader.clone(), Passthrough, &DashboardConfig::default());
    assert_eq!(dash.state().corpus.value(), Some("old"));

    loader.build("new", corpus(&[at(2021, 3, 1), at(2021, 6, 1)])).unwrap();
    dash.process_events();
    assert_eq!(dash.state().corpus.value(), Some("new"));
    assert_eq!(dash.state().columns.time_column.value(), Some("created"));
    assert_eq!(dash.state().columns.group_column.value(), Some("document"));
    assert_eq!(dash.state().date_range.bounds(), Some((at(2021, 3, 1), at(2021, 6, 1))));
}

#[test]
fn stable_selection_survives_polling() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("a", corpus(&[at(2020, 1, 1)])).unwrap();
    loader.build("b", corpus(&[at(2020, 2, 1)])).unwrap();
    let mut dash = Dashboard::new(loader, Passthrough, &DashboardConfig::default());
    assert!(dash.select_corpus(Some("a")));
    assert!(dash.select_group_column(Some("author")));

    for _ in 0..3 {
        assert!(!dash.refresh_corpora());
    }
    assert_eq!(dash.state().corpus.value(), Some("a"));
    assert_eq!(dash.state().columns.group_column.value(), Some("author"));
}

#[test]
fn deleting_the_last_corpus_clears_everything() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("only", corpus(&[at(2020, 1, 1)])).unwrap();
    let mut dash = Dashboard::new(loader.clone(), Passthrough, &DashboardConfig::default());
    loader.delete("only").unwrap();
    dash.process_events();
    let state = dash.state();
    assert_eq!(state.corpus.value(), None);
    assert!(state.columns.time_column.options().is_empty());
    assert!(state.columns.group_column.options().is_empty());
    assert_eq!(state.date_range.value(), None);
    assert!(!dash.generate());
}

#[test]
fn replaced_corpus_with_same_columns_rederives_range() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("x", corpus(&[at(2020, 1, 1), at(2020, 5, 1)])).unwrap();
    let mut dash = Dashboard::new(loader.clone(), Passthrough, &DashboardConfig::default());

    loader.delete("x").unwrap();
    loader.build("x", corpus(&[at(2022, 7, 1), at(2022, 9, 1)])).unwrap();
    dash.process_events();
    assert_eq!(dash.state().corpus.value(), Some("x"));
    assert_eq!(dash.state().date_range.value(), Some((at(2022, 7, 1), at(2022, 9, 1))));
}

#[test]
fn changing_the_interval_keeps_the_date_range() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("c", corpus(&[at(2020, 1, 1), at(2020, 3, 1), at(2020, 11, 1)])).unwrap();
    let mut dash = Dashboard::new(loader, Passthrough, &DashboardConfig::default());
    assert!(dash.set_date_range(at(2020, 2, 1), at(2020, 12, 31)));
    let range = dash.state().date_range;
    assert_eq!(range.value(), Some((at(2020, 2, 1), at(2020, 11, 1))));

    assert!(dash.generate());
    assert!(dash.set_bucket_count(2));
    dash.set_bucket_unit(BucketUnit::Months);
    assert!(dash.generate());
    assert_eq!(dash.state().date_range, range);
    assert_eq!(dash.counts().iter().map(|r| r.count).sum::<u64>(), 2);
}

#[test]
fn inverted_range_plots_empty_charts() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("c", corpus(&[at(2020, 1, 1), at(2020, 3, 1)])).unwrap();
    let mut dash = Dashboard::new(loader, Passthrough, &DashboardConfig::default());
    assert!(dash.select_group_column(Some("author")));
    assert!(dash.set_date_range(at(2020, 3, 1), at(2020, 1, 1)));
    assert!(dash.generate());
    assert!(dash.counts().is_empty());
    assert!(dash.charts().iter().all(|c| c.series.is_empty()));
}

#[test]
fn inverted_range_outside_the_bounds_stays_empty() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("c", corpus(&[at(2020, 1, 1), at(2020, 3, 1)])).unwrap();
    let mut dash = Dashboard::new(loader, Passthrough, &DashboardConfig::default());
    assert!(dash.set_date_range(at(2030, 1, 1), at(2010, 1, 1)));
    assert_eq!(dash.state().date_range.value(), Some((at(2030, 1, 1), at(2010, 1, 1))));
    assert!(dash.generate());
    assert!(dash.counts().is_empty());
}

#[test]
fn renaming_the_selected_corpus_selects_the_last_one() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("a", corpus(&[at(2020, 1, 1)])).unwrap();
    loader.build("b", corpus(&[at(2021, 1, 1), at(2021, 2, 1)])).unwrap();
    let mut dash = Dashboard::new(loader.clone(), Passthrough, &DashboardConfig::default());
    assert_eq!(dash.state().corpus.value(), Some("b"));
    assert!(dash.select_corpus(Some("a")));

    loader.rename("a", "c").unwrap();
    assert_eq!(dash.process_events(), 1);
    let names: Vec<&str> = dash.state().corpus.options().iter().map(String::as_str).collect();
    assert_eq!(names, vec!["c", "b"]);
    assert_eq!(dash.state().corpus.value(), Some("b"));
    assert_eq!(dash.selected_corpus().map(|c| c.len()), Some(2));
    assert_eq!(dash.state().date_range.bounds(), Some((at(2021, 1, 1), at(2021, 2, 1))));
}

#[test]
fn render_failure_keeps_previous_charts() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("c", corpus(&[at(2020, 1, 1), at(2020, 3, 1)])).unwrap();
    let fail = Rc::new(Cell::new(false));
    let mut dash = Dashboard::new(loader, Flaky { fail: fail.clone() }, &DashboardConfig::default());
    assert!(dash.generate());
    let shown = dash.charts().len();
    let counts = dash.counts().to_vec();

    fail.set(true);
    dash.set_bucket_unit(BucketUnit::Days);
    assert!(!dash.generate());
    assert_eq!(dash.charts().len(), shown);
    assert_eq!(dash.counts(), &counts[..]);
}

#[test]
fn png_renderer_output_is_displayed() {
    let loader = Rc::new(CorpusLoader::new());
    loader.build("c", corpus(&[at(2020, 1, 1), at(2020, 2, 1), at(2020, 2, 9)])).unwrap();
    let config = DashboardConfig { chart_width: 320, chart_height: 200, ..DashboardConfig::default() };
    let mut dash = Dashboard::new(loader, PngRenderer::new(config.render_options()), &config);
    dash.set_bucket_unit(BucketUnit::Months);
    assert!(dash.generate());
    let png = &dash.charts()[0];
    assert_eq!((png.width, png.height), (320, 200));
    assert!(png.png.starts_with(&[137, 80, 78, 71]));
    assert_eq!(png.title.as_deref(), Some("Document frequency per 1 month"));
}
