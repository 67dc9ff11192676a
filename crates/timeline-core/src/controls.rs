// File: crates/timeline-core/src/controls.rs
// Summary: Control-panel state and the pure update rules that keep it consistent with the corpora.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::bucket::{BucketUnit, BucketWidth};
use crate::corpus::{Corpus, DOCUMENT_COLUMN};
use crate::error::{Result, TimelineError};

/// A dropdown: a list of options and at most one selected option.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Select {
    options: Vec<String>,
    value: Option<String>,
}

impl Select {
    /// Options with the first one selected (nothing when empty).
    pub fn with_first(options: Vec<String>) -> Self {
        let value = options.first().cloned();
        Self { options, value }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Select `value` (or clear with `None`). Returns whether the selection changed.
    pub fn select(&mut self, value: Option<&str>) -> Result<bool> {
        if let Some(v) = value {
            if !self.options.iter().any(|o| o == v) {
                return Err(TimelineError::UnknownOption(v.to_string()));
            }
        }
        let changed = self.value.as_deref() != value;
        self.value = value.map(str::to_string);
        Ok(changed)
    }
}

/// Corpus dropdown after the provider listed `names`.
///
/// Options always follow the provider's order. Names are compared as a set, so a poll
/// that sees the same corpora (in any order) keeps the selection. A changed set
/// selects the last, most recently added, corpus.
pub fn on_corpus_list(current: &Select, names: &[String]) -> Select {
    let old: BTreeSet<&str> = current.options.iter().map(String::as_str).collect();
    let new: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    let value = if old == new { current.value.clone() } else { names.last().cloned() };
    Select { options: names.to_vec(), value }
}

/// The two column dropdowns that depend on the selected corpus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnControls {
    /// Datetime metadata columns.
    pub time_column: Select,
    /// The document pseudo-column followed by every metadata column.
    pub group_column: Select,
}

/// Column dropdowns after the selected corpus changed to `corpus`.
pub fn on_corpus_selected(current: &ColumnControls, corpus: Option<&Corpus>) -> ColumnControls {
    let Some(corpus) = corpus else {
        return ColumnControls::default();
    };
    let metas = corpus.metas();
    let time_options: Vec<String> = metas.iter().filter(|m| corpus.is_datetime_meta(m)).cloned().collect();
    let mut group_options = Vec::with_capacity(metas.len() + 1);
    group_options.push(DOCUMENT_COLUMN.to_string());
    group_options.extend(metas);

    ColumnControls {
        time_column: rederive(&current.time_column, time_options),
        group_column: rederive(&current.group_column, group_options),
    }
}

fn rederive(current: &Select, options: Vec<String>) -> Select {
    if current.options == options {
        current.clone()
    } else {
        Select::with_first(options)
    }
}

/// Date range picker: observed bounds of the time column and the chosen sub-range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRangeControl {
    bounds: Option<(NaiveDateTime, NaiveDateTime)>,
    value: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl DateRangeControl {
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Bounds and value both span `[start, end]`.
    pub fn full(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { bounds: Some((start, end)), value: Some((start, end)) }
    }

    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.bounds
    }

    pub fn value(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.value
    }

    /// Clamp both endpoints into the bounds. An inverted range (`start > end`) is
    /// stored unclamped so it keeps selecting no rows.
    pub fn set(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<()> {
        let (lo, hi) = self.bounds.ok_or(TimelineError::NoDateBounds)?;
        self.value = if start > end { Some((start, end)) } else { Some((start.clamp(lo, hi), end.clamp(lo, hi))) };
        Ok(())
    }
}

/// Date range after the time column changed; spans every non-null timestamp of the column.
pub fn on_time_column_selected(corpus: Option<&Corpus>, time_column: Option<&str>) -> DateRangeControl {
    let span = match (corpus, time_column) {
        (Some(corpus), Some(column)) => corpus.datetime_span(column),
        _ => None,
    };
    match span {
        Some((start, end)) => DateRangeControl::full(start, end),
        None => DateRangeControl::cleared(),
    }
}

/// Everything the user has picked on the control panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub corpus: Select,
    pub columns: ColumnControls,
    pub date_range: DateRangeControl,
    pub interval: BucketWidth,
}

impl SelectionState {
    /// Re-run corpus -> columns -> date range for the (possibly new) selected corpus.
    pub fn cascade(&mut self, corpus: Option<&Corpus>) {
        self.columns = on_corpus_selected(&self.columns, corpus);
        self.date_range = on_time_column_selected(corpus, self.columns.time_column.value());
    }

    pub fn select_time_column(&mut self, corpus: Option<&Corpus>, name: Option<&str>) -> Result<()> {
        self.columns.time_column.select(name)?;
        self.date_range = on_time_column_selected(corpus, self.columns.time_column.value());
        Ok(())
    }

    pub fn select_group_column(&mut self, name: Option<&str>) -> Result<()> {
        self.columns.group_column.select(name).map(|_| ())
    }

    pub fn set_date_range(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<()> {
        self.date_range.set(start, end)
    }

    pub fn set_bucket_count(&mut self, count: i64) -> Result<()> {
        self.interval = self.interval.with_count(count)?;
        Ok(())
    }

    pub fn set_bucket_unit(&mut self, unit: BucketUnit) {
        self.interval = self.interval.with_unit(unit);
    }
}
