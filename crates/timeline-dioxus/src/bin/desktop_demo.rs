// File: crates/timeline-dioxus/src/bin/desktop_demo.rs
// Purpose: Desktop launcher over two generated corpora.

#[cfg(feature = "desktop")]
fn seed(loader: &timeline_core::CorpusLoader) {
    use chrono::{Duration, NaiveDate};
    use timeline_core::{datetime_array, text_array, Corpus};

    let Some(origin) = NaiveDate::from_ymd_opt(2021, 1, 4).and_then(|d| d.and_hms_opt(9, 0, 0)) else {
        return;
    };
    for (name, n, step_hours) in [("press", 240usize, 71i64), ("forum", 600, 19)] {
        let published = (0..n).map(|i| Some(origin + Duration::hours(step_hours * i as i64)));
        let section = (0..n).map(|i| Some(["politics", "science", "sport"][(i * 7 / 5) % 3]));
        let corpus = Corpus::new(
            (0..n).map(|i| format!("{name} document {i}")),
            vec![("published", datetime_array(published)), ("section", text_array(section))],
        );
        match corpus.and_then(|c| loader.build(name, c)) {
            Ok(_) => {}
            Err(e) => eprintln!("skipping corpus {name}: {e}"),
        }
    }
}

#[cfg(feature = "desktop")]
fn main() {
    if let Err(e) = timeline_dioxus::ui::run_desktop(timeline_core::DashboardConfig::default(), seed) {
        eprintln!("timeline-dioxus demo error: {e}");
    }
}

#[cfg(not(feature = "desktop"))]
fn main() {
    eprintln!("This demo requires --features desktop");
}
