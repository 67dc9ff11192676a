// File: crates/timeline-core/src/lib.rs
// Summary: Core library entry point; corpus model, aggregation, chart building and dashboard state.

pub mod aggregate;
pub mod bucket;
pub mod builder;
pub mod config;
pub mod controls;
pub mod corpus;
pub mod dashboard;
pub mod error;
pub mod frame;

pub use aggregate::{aggregate, filter_date_range, CountRow};
pub use bucket::{BucketUnit, BucketWidth};
pub use builder::{ChartBuilder, ChartLabels};
pub use config::DashboardConfig;
pub use controls::{ColumnControls, DateRangeControl, Select, SelectionState};
pub use corpus::{Corpus, CorpusEntry, CorpusEvent, CorpusEventKind, CorpusLoader, CorpusProvider, DOCUMENT_COLUMN};
pub use dashboard::Dashboard;
pub use error::{Result, TimelineError};
pub use frame::{datetime_array, text_array};
