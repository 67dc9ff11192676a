// File: crates/timeline-core/src/frame.rs
// Summary: Arrow helpers for corpus row-sets: column construction, lookup and timestamp access.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray, TimestampMicrosecondArray};
use arrow::compute::{self, cast};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use arrow::temporal_conversions::timestamp_us_to_datetime;
use chrono::NaiveDateTime;

use crate::error::{Result, TimelineError};

/// Type of datetime columns built here; any `Timestamp` unit is accepted on input.
pub fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, None)
}

pub fn is_datetime(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Timestamp(_, _))
}

/// Naive timestamps are stored as microseconds since the epoch, read as UTC.
pub fn datetime_array(values: impl IntoIterator<Item = Option<NaiveDateTime>>) -> ArrayRef {
    let micros: TimestampMicrosecondArray =
        values.into_iter().map(|v| v.map(|t| t.and_utc().timestamp_micros())).collect();
    Arc::new(micros)
}

pub fn text_array<S: AsRef<str>>(values: impl IntoIterator<Item = Option<S>>) -> ArrayRef {
    Arc::new(values.into_iter().collect::<StringArray>())
}

pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| TimelineError::ColumnNotFound(name.to_string()))
}

/// `array` converted to microsecond precision, keeping its timezone.
pub fn timestamp_micros(array: &ArrayRef, name: &str) -> Result<TimestampMicrosecondArray> {
    let DataType::Timestamp(_, tz) = array.data_type() else {
        return Err(TimelineError::NotDatetime(name.to_string()));
    };
    let micros = cast(array.as_ref(), &DataType::Timestamp(TimeUnit::Microsecond, tz.clone()))?;
    micros
        .as_any()
        .downcast_ref::<TimestampMicrosecondArray>()
        .cloned()
        .ok_or_else(|| TimelineError::NotDatetime(name.to_string()))
}

/// The `name` column of `batch` as microsecond timestamps.
pub fn timestamps(batch: &RecordBatch, name: &str) -> Result<TimestampMicrosecondArray> {
    timestamp_micros(column(batch, name)?, name)
}

/// Earliest and latest non-null timestamp.
pub fn datetime_span(times: &TimestampMicrosecondArray) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let lo = compute::min(times)?;
    let hi = compute::max(times)?;
    Some((timestamp_us_to_datetime(lo)?, timestamp_us_to_datetime(hi)?))
}
