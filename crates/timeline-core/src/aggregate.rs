// File: crates/timeline-core/src/aggregate.rs
// Summary: Date-range filtering and bucketed frequency counts, optionally split by a group column.

use std::collections::BTreeMap;

use arrow::array::{Array, Scalar, TimestampMicrosecondArray};
use arrow::compute::filter_record_batch;
use arrow::compute::kernels::{boolean as boolean_kernels, cmp as cmp_kernels};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::bucket::BucketWidth;
use crate::error::Result;
use crate::frame;

/// Number of rows falling in one bucket (and group, when grouping).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub bucket_start: NaiveDateTime,
    pub group: Option<String>,
    pub count: u64,
}

/// Rows whose `column` timestamp lies in `[start, end]`. Null timestamps never match,
/// and `start > end` matches nothing.
pub fn filter_date_range(batch: &RecordBatch, column: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<RecordBatch> {
    let times = frame::timestamps(batch, column)?;
    let tz = match times.data_type() {
        DataType::Timestamp(_, tz) => tz.clone(),
        _ => None,
    };
    // One-element bounds broadcast across the column.
    let bound = |t: NaiveDateTime| {
        Scalar::new(TimestampMicrosecondArray::from(vec![t.and_utc().timestamp_micros()]).with_timezone_opt(tz.clone()))
    };
    let ge = cmp_kernels::gt_eq(&times, &bound(start))?;
    let le = cmp_kernels::lt_eq(&times, &bound(end))?;
    // Null timestamps give null mask entries, which the filter drops.
    let mask = boolean_kernels::and(&ge, &le)?;
    Ok(filter_record_batch(batch, &mask)?)
}

/// Count rows per bucket of `width`, and per distinct value of `group_column` when given.
///
/// Output is ordered by bucket start, then group key. Buckets without rows are
/// omitted. Rows with a null timestamp, or a null group value when grouping, are
/// skipped. Group keys are the values' display form. An empty row-set always
/// yields an empty result.
pub fn aggregate(
    batch: &RecordBatch,
    time_column: &str,
    width: BucketWidth,
    group_column: Option<&str>,
) -> Result<Vec<CountRow>> {
    if batch.num_rows() == 0 {
        return Ok(Vec::new());
    }
    let times = frame::timestamps(batch, time_column)?;
    let groups = group_column.map(|g| frame::column(batch, g)).transpose()?;
    let options = FormatOptions::default();
    let keys = groups
        .map(|g| ArrayFormatter::try_new(g.as_ref(), &options).map(|f| (g, f)))
        .transpose()?;

    let mut counts: BTreeMap<(NaiveDateTime, Option<String>), u64> = BTreeMap::new();
    for row in 0..times.len() {
        if times.is_null(row) {
            continue;
        }
        let Some(ts) = times.value_as_datetime(row) else { continue };
        let key = match &keys {
            Some((column, formatter)) => {
                if column.is_null(row) {
                    continue;
                }
                Some(formatter.value(row).try_to_string()?)
            }
            None => None,
        };
        *counts.entry((width.bucket_start(ts)?, key)).or_insert(0) += 1;
    }

    Ok(counts
        .into_iter()
        .map(|((bucket_start, group), count)| CountRow { bucket_start, group, count })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::BucketUnit;
    use crate::error::TimelineError;
    use arrow::array::{ArrayRef, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn at(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, m, d).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn frame() -> RecordBatch {
        let stars: ArrayRef = Arc::new(Int64Array::from(vec![Some(5), Some(5), Some(3), Some(5), None]));
        RecordBatch::try_from_iter(vec![
            ("t", frame::datetime_array([Some(at(1, 3)), Some(at(1, 20)), Some(at(2, 2)), Some(at(4, 9)), None])),
            ("src", frame::text_array([Some("a"), Some("b"), Some("a"), None, Some("a")])),
            ("stars", stars),
        ])
        .unwrap()
    }

    fn monthly() -> BucketWidth {
        BucketWidth::new(1, BucketUnit::Months).unwrap()
    }

    fn month_start(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, m, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn ungrouped_counts_skip_empty_buckets() {
        let rows = aggregate(&frame(), "t", monthly(), None).unwrap();
        // March has no rows and must not appear.
        assert_eq!(
            rows,
            vec![
                CountRow { bucket_start: month_start(1), group: None, count: 2 },
                CountRow { bucket_start: month_start(2), group: None, count: 1 },
                CountRow { bucket_start: month_start(4), group: None, count: 1 },
            ]
        );
    }

    #[test]
    fn grouped_counts_split_buckets_and_drop_null_keys() {
        let rows = aggregate(&frame(), "t", monthly(), Some("src")).unwrap();
        let summary: Vec<(u32, Option<&str>, u64)> = rows
            .iter()
            .map(|r| (chrono::Datelike::month(&r.bucket_start), r.group.as_deref(), r.count))
            .collect();
        assert_eq!(summary, vec![(1, Some("a"), 1), (1, Some("b"), 1), (2, Some("a"), 1)]);
    }

    #[test]
    fn non_text_group_keys_use_display_form() {
        let rows = aggregate(&frame(), "t", monthly(), Some("stars")).unwrap();
        let keys: Vec<Option<&str>> = rows.iter().map(|r| r.group.as_deref()).collect();
        assert_eq!(keys, vec![Some("5"), Some("3"), Some("5")]);
        assert_eq!(rows[0].count, 2);
    }

    #[test]
    fn timestamps_with_a_timezone_filter_by_instant() {
        let utc = frame::datetime_array([Some(at(1, 3)), Some(at(2, 2))]);
        let tz = arrow::compute::cast(&utc, &DataType::Timestamp(arrow::datatypes::TimeUnit::Microsecond, Some("+00:00".into()))).unwrap();
        let schema = Arc::new(Schema::new(vec![Field::new("t", tz.data_type().clone(), true)]));
        let batch = RecordBatch::try_new(schema, vec![tz]).unwrap();
        assert_eq!(filter_date_range(&batch, "t", at(1, 1), at(1, 31)).unwrap().num_rows(), 1);
    }

    #[test]
    fn empty_frame_yields_nothing() {
        let empty = frame().slice(0, 0);
        assert!(aggregate(&empty, "t", monthly(), Some("src")).unwrap().is_empty());
        let no_columns = RecordBatch::new_empty(Arc::new(Schema::empty()));
        assert!(aggregate(&no_columns, "t", monthly(), None).unwrap().is_empty());
    }

    #[test]
    fn bad_columns_are_reported() {
        assert!(matches!(aggregate(&frame(), "nope", monthly(), None), Err(TimelineError::ColumnNotFound(_))));
        assert!(matches!(aggregate(&frame(), "src", monthly(), None), Err(TimelineError::NotDatetime(_))));
        assert!(matches!(aggregate(&frame(), "t", monthly(), Some("nope")), Err(TimelineError::ColumnNotFound(_))));
    }

    #[test]
    fn date_filter_is_inclusive() {
        let f = filter_date_range(&frame(), "t", at(1, 20), at(2, 2)).unwrap();
        assert_eq!(f.num_rows(), 2);
        assert_eq!(f.num_columns(), 3);
        assert_eq!(filter_date_range(&frame(), "t", at(1, 3), at(4, 9)).unwrap().num_rows(), 4);
    }

    #[test]
    fn inverted_date_range_matches_nothing() {
        let f = filter_date_range(&frame(), "t", at(4, 9), at(1, 3)).unwrap();
        assert_eq!(f.num_rows(), 0);
        assert!(aggregate(&f, "t", monthly(), None).unwrap().is_empty());
    }
}
