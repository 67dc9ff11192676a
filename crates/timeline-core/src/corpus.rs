// File: crates/timeline-core/src/corpus.rs
// Summary: Corpus handles, the provider seam with change notifications, and an in-memory provider.

use std::cell::RefCell;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{Result, TimelineError};
use crate::frame;

/// Name of the pseudo-column holding document bodies.
pub const DOCUMENT_COLUMN: &str = "document";

/// A tabular document collection: one document body per row plus metadata columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Corpus {
    batch: RecordBatch,
}

impl Corpus {
    /// Every metadata column must have one value per document and a unique name.
    pub fn new<S, N>(documents: impl IntoIterator<Item = S>, metas: impl IntoIterator<Item = (N, ArrayRef)>) -> Result<Self>
    where
        S: Into<String>,
        N: Into<String>,
    {
        let documents: Vec<String> = documents.into_iter().map(Into::into).collect();
        let rows = documents.len();
        let mut fields = vec![Field::new(DOCUMENT_COLUMN, DataType::Utf8, false)];
        let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(documents))];
        for (name, array) in metas {
            let name = name.into();
            if fields.iter().any(|f| *f.name() == name) {
                return Err(TimelineError::DuplicateColumn(name));
            }
            if array.len() != rows {
                return Err(TimelineError::RaggedFrame { column: name, expected: rows, found: array.len() });
            }
            fields.push(Field::new(name, array.data_type().clone(), true));
            columns.push(array);
        }
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        Ok(Self { batch })
    }

    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Metadata column names, in corpus order.
    pub fn metas(&self) -> Vec<String> {
        self.batch.schema().fields().iter().skip(1).map(|f| f.name().clone()).collect()
    }

    pub fn meta(&self, name: &str) -> Option<&ArrayRef> {
        if name == DOCUMENT_COLUMN {
            return None;
        }
        self.batch.column_by_name(name)
    }

    pub fn meta_values(&self, name: &str) -> Result<&ArrayRef> {
        self.meta(name).ok_or_else(|| TimelineError::ColumnNotFound(name.to_string()))
    }

    pub fn is_datetime_meta(&self, name: &str) -> bool {
        self.meta(name).is_some_and(|a| frame::is_datetime(a.data_type()))
    }

    /// Earliest and latest non-null timestamp of a datetime metadata column.
    pub fn datetime_span(&self, name: &str) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let times = frame::timestamp_micros(self.meta(name)?, name).ok()?;
        frame::datetime_span(&times)
    }

    /// Full row-set: the document column followed by every metadata column.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }
}

/// A named corpus as listed by a provider.
#[derive(Clone, Debug)]
pub struct CorpusEntry {
    pub name: String,
    pub corpus: Arc<Corpus>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CorpusEventKind {
    Build,
    Rename,
    Delete,
}

impl CorpusEventKind {
    pub const ALL: [CorpusEventKind; 3] = [CorpusEventKind::Build, CorpusEventKind::Rename, CorpusEventKind::Delete];
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorpusEvent {
    Built { name: String },
    Renamed { from: String, to: String },
    Deleted { name: String },
}

impl CorpusEvent {
    pub fn kind(&self) -> CorpusEventKind {
        match self {
            CorpusEvent::Built { .. } => CorpusEventKind::Build,
            CorpusEvent::Renamed { .. } => CorpusEventKind::Rename,
            CorpusEvent::Deleted { .. } => CorpusEventKind::Delete,
        }
    }
}

pub type EventCallback = Box<dyn Fn(&CorpusEvent)>;

/// Source of named corpora. Single-threaded: callbacks run on the caller's thread.
pub trait CorpusProvider {
    /// Corpora in provider order; the last entry is the most recently added.
    fn list_corpora(&self) -> Vec<CorpusEntry>;
    /// Register `callback` for events of `kind`. Callbacks must not subscribe re-entrantly.
    fn subscribe(&self, kind: CorpusEventKind, callback: EventCallback);
}

/// In-memory provider: holds corpora and notifies subscribers on every change.
#[derive(Default)]
pub struct CorpusLoader {
    corpora: RefCell<Vec<CorpusEntry>>,
    subscribers: RefCell<Vec<(CorpusEventKind, EventCallback)>>,
}

impl CorpusLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a corpus under a new, unique name.
    pub fn build(&self, name: impl Into<String>, corpus: Corpus) -> Result<Arc<Corpus>> {
        let name = name.into();
        let corpus = Arc::new(corpus);
        {
            let mut corpora = self.corpora.borrow_mut();
            if corpora.iter().any(|e| e.name == name) {
                return Err(TimelineError::DuplicateCorpus(name));
            }
            corpora.push(CorpusEntry { name: name.clone(), corpus: Arc::clone(&corpus) });
        }
        self.notify(&CorpusEvent::Built { name });
        Ok(corpus)
    }

    /// Rename in place; the corpus keeps its position in the listing.
    pub fn rename(&self, from: &str, to: impl Into<String>) -> Result<()> {
        let to = to.into();
        {
            let mut corpora = self.corpora.borrow_mut();
            if corpora.iter().any(|e| e.name == to) {
                return Err(TimelineError::DuplicateCorpus(to));
            }
            let entry = corpora
                .iter_mut()
                .find(|e| e.name == from)
                .ok_or_else(|| TimelineError::UnknownCorpus(from.to_string()))?;
            entry.name = to.clone();
        }
        self.notify(&CorpusEvent::Renamed { from: from.to_string(), to });
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<Arc<Corpus>> {
        let removed = {
            let mut corpora = self.corpora.borrow_mut();
            let idx = corpora
                .iter()
                .position(|e| e.name == name)
                .ok_or_else(|| TimelineError::UnknownCorpus(name.to_string()))?;
            corpora.remove(idx)
        };
        self.notify(&CorpusEvent::Deleted { name: name.to_string() });
        Ok(removed.corpus)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Corpus>> {
        self.corpora.borrow().iter().find(|e| e.name == name).map(|e| Arc::clone(&e.corpus))
    }

    fn notify(&self, event: &CorpusEvent) {
        let subscribers = self.subscribers.borrow();
        let mut delivered = 0usize;
        for (kind, callback) in subscribers.iter() {
            if *kind == event.kind() {
                callback(event);
                delivered += 1;
            }
        }
        debug!(?event, delivered, "corpus event");
    }
}

impl CorpusProvider for CorpusLoader {
    fn list_corpora(&self) -> Vec<CorpusEntry> {
        self.corpora.borrow().clone()
    }

    fn subscribe(&self, kind: CorpusEventKind, callback: EventCallback) {
        self.subscribers.borrow_mut().push((kind, callback));
    }
}
