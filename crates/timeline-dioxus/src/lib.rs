// File: crates/timeline-dioxus/src/lib.rs
// Summary: Dioxus desktop view of the corpus timeline dashboard (behind the `desktop` feature).

use chrono::NaiveDateTime;

/// Value format of `<input type="datetime-local">`.
pub const INPUT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format a timestamp for a datetime-local input.
pub fn to_input_value(ts: NaiveDateTime) -> String {
    ts.format(INPUT_DATETIME_FORMAT).to_string()
}

/// Parse a datetime-local input value; browsers send seconds only when non-zero.
pub fn parse_input_value(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, INPUT_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Empty `<select>` value means "nothing selected".
pub fn non_empty(raw: &str) -> Option<&str> {
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

#[cfg(feature = "desktop")]
pub mod ui {
    use super::*;
    use std::rc::Rc;
    use std::sync::OnceLock;
    use std::time::Instant;

    use base64::Engine as _;
    use dioxus::prelude::*;
    use timeline_chart::PngRenderer;
    use timeline_core::{BucketUnit, CorpusLoader, CorpusProvider, Dashboard, DashboardConfig};
    use tracing::debug;

    /// PNG bytes as an `<img src>` data URL.
    pub fn data_url(png: &[u8]) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(png);
        format!("data:image/png;base64,{b64}")
    }

    #[derive(Props, Clone)]
    pub struct CorpusTimelineProps {
        pub provider: Rc<dyn CorpusProvider>,
        #[props(default)]
        pub config: DashboardConfig,
    }

    impl PartialEq for CorpusTimelineProps {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.provider, &other.provider) && self.config == other.config
        }
    }

    /// Control column beside the rendered charts. The corpus list is polled once per
    /// `config.poll_interval_ms`; charts only change on "Generate plot".
    #[component]
    pub fn CorpusTimeline(props: CorpusTimelineProps) -> Element {
        let config = props.config.clone();
        let mut dashboard = use_signal({
            let provider = props.provider.clone();
            let config = config.clone();
            move || Dashboard::new(provider, PngRenderer::new(config.render_options()), &config)
        });

        let interval = config.poll_interval();
        use_future(move || async move {
            loop {
                tokio::time::sleep(interval).await;
                dashboard.write().poll(Instant::now());
            }
        });

        let dash = dashboard.read();
        let state = dash.state().clone();
        let images: Vec<(String, String)> = dash
            .charts()
            .iter()
            .map(|c| (c.title.clone().unwrap_or_default(), data_url(&c.png)))
            .collect();
        drop(dash);

        let corpora = state.corpus.options().to_vec();
        let selected_corpus = state.corpus.value().map(str::to_string);
        let time_columns = state.columns.time_column.options().to_vec();
        let selected_time = state.columns.time_column.value().map(str::to_string);
        let group_columns = state.columns.group_column.options().to_vec();
        let selected_group = state.columns.group_column.value().map(str::to_string);
        let range = state.date_range.value();
        let (start_value, end_value) = range
            .map(|(s, e)| (to_input_value(s), to_input_value(e)))
            .unwrap_or_default();
        let count = state.interval.count();
        let controls_width = config.controls_max_width;
        let unit = state.interval.unit();

        rsx! {
            div {
                style: "display:flex; gap:16px; font-family:sans-serif;",
                div {
                    style: "display:flex; flex-direction:column; gap:8px; max-width:{controls_width}px;",
                    label { "Corpus" }
                    select {
                        onchange: move |evt: FormEvent| {
                            dashboard.write().select_corpus(non_empty(&evt.value()));
                        },
                        option { value: "", selected: selected_corpus.is_none(), "" }
                        for name in corpora {
                            option { selected: selected_corpus.as_deref() == Some(name.as_str()), value: "{name}", "{name}" }
                        }
                    }
                    label { "Datetime column" }
                    select {
                        onchange: move |evt: FormEvent| {
                            dashboard.write().select_time_column(non_empty(&evt.value()));
                        },
                        for name in time_columns {
                            option { selected: selected_time.as_deref() == Some(name.as_str()), value: "{name}", "{name}" }
                        }
                    }
                    label { "Range start" }
                    input {
                        r#type: "datetime-local",
                        value: "{start_value}",
                        disabled: range.is_none(),
                        onchange: move |evt: FormEvent| {
                            let mut dash = dashboard.write();
                            match (parse_input_value(&evt.value()), dash.state().date_range.value()) {
                                (Some(start), Some((_, end))) => {
                                    dash.set_date_range(start, end);
                                }
                                _ => debug!(value = %evt.value(), "ignored range start"),
                            }
                        },
                    }
                    label { "Range end" }
                    input {
                        r#type: "datetime-local",
                        value: "{end_value}",
                        disabled: range.is_none(),
                        onchange: move |evt: FormEvent| {
                            let mut dash = dashboard.write();
                            match (parse_input_value(&evt.value()), dash.state().date_range.value()) {
                                (Some(end), Some((start, _))) => {
                                    dash.set_date_range(start, end);
                                }
                                _ => debug!(value = %evt.value(), "ignored range end"),
                            }
                        },
                    }
                    label { "Interval" }
                    input {
                        r#type: "number",
                        min: "1",
                        value: "{count}",
                        onchange: move |evt: FormEvent| match evt.value().parse::<i64>() {
                            Ok(n) => {
                                dashboard.write().set_bucket_count(n);
                            }
                            Err(err) => debug!(error = %err, "interval count is not a number"),
                        },
                    }
                    select {
                        onchange: move |evt: FormEvent| match evt.value().parse::<BucketUnit>() {
                            Ok(u) => dashboard.write().set_bucket_unit(u),
                            Err(err) => debug!(error = %err, "unknown interval unit"),
                        },
                        for u in BucketUnit::ALL {
                            option { selected: u == unit, value: u.label(), "{u}" }
                        }
                    }
                    label { "Included metadata" }
                    select {
                        onchange: move |evt: FormEvent| {
                            dashboard.write().select_group_column(non_empty(&evt.value()));
                        },
                        option { value: "", selected: selected_group.is_none(), "" }
                        for name in group_columns {
                            option { selected: selected_group.as_deref() == Some(name.as_str()), value: "{name}", "{name}" }
                        }
                    }
                    button {
                        onclick: move |_| {
                            dashboard.write().generate();
                        },
                        "Generate plot"
                    }
                }
                div {
                    style: "display:flex; flex-direction:column; gap:8px;",
                    for (title, src) in images {
                        img { alt: "{title}", src: "{src}" }
                    }
                }
            }
        }
    }

    static LAUNCH: OnceLock<(DashboardConfig, fn(&CorpusLoader))> = OnceLock::new();

    fn no_seed(_: &CorpusLoader) {}

    #[component]
    fn App() -> Element {
        let (config, seed) = LAUNCH
            .get()
            .cloned()
            .unwrap_or_else(|| (DashboardConfig::default(), no_seed as fn(&CorpusLoader)));
        let provider = use_hook(move || {
            let loader = Rc::new(CorpusLoader::new());
            seed(&loader);
            loader as Rc<dyn CorpusProvider>
        });
        rsx! { CorpusTimeline { provider, config } }
    }

    /// Open a desktop window over an in-memory provider populated by `seed`.
    pub fn run_desktop(config: DashboardConfig, seed: fn(&CorpusLoader)) -> Result<(), String> {
        LAUNCH
            .set((config, seed))
            .map_err(|_| "desktop view already launched".to_string())?;
        let cfg = dioxus_desktop::Config::new().with_window(
            dioxus_desktop::WindowBuilder::new().with_title("Corpus timeline"),
        );
        let platform: Vec<Box<dyn std::any::Any>> = vec![Box::new(cfg)];
        dioxus_desktop::launch::launch(App, Vec::new(), platform);
        #[allow(unreachable_code)]
        Ok(())
    }

}

/// Fallback when the `desktop` feature is not enabled.
#[cfg(not(feature = "desktop"))]
pub fn run_desktop(
    _config: timeline_core::DashboardConfig,
    _seed: fn(&timeline_core::CorpusLoader),
) -> Result<(), &'static str> {
    Err("timeline-dioxus built without `desktop` feature; enable it to run the desktop view")
}
