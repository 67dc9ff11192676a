// File: crates/timeline-core/src/bucket.rs
// Summary: Bucket units and widths, and the mapping from a timestamp to the start of its bucket.
//
// Buckets are anchored at calendar origins derived from the Unix epoch:
//
// - years, quarters and months count whole months from 1970-01, so a bucket
//   always starts at midnight on the first day of a month (`1 quarters`
//   starts on Jan/Apr/Jul/Oct 1, `2 years` on Jan 1 of even years);
// - weeks start on Monday, counted from 1970-01-05;
// - days, hours, minutes and seconds are fixed-length windows counted from
//   1970-01-01T00:00:00.
//
// Euclidean division keeps the mapping monotonic for pre-epoch timestamps.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;
/// 1970-01-05T00:00:00, the first Monday after the epoch.
const WEEK_ORIGIN_SECS: i64 = 4 * SECONDS_PER_DAY;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketUnit {
    Years,
    Quarters,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl BucketUnit {
    /// Display order of the interval selector.
    pub const ALL: [BucketUnit; 8] = [
        BucketUnit::Years,
        BucketUnit::Quarters,
        BucketUnit::Months,
        BucketUnit::Weeks,
        BucketUnit::Days,
        BucketUnit::Hours,
        BucketUnit::Minutes,
        BucketUnit::Seconds,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BucketUnit::Years => "years",
            BucketUnit::Quarters => "quarters",
            BucketUnit::Months => "months",
            BucketUnit::Weeks => "weeks",
            BucketUnit::Days => "days",
            BucketUnit::Hours => "hours",
            BucketUnit::Minutes => "minutes",
            BucketUnit::Seconds => "seconds",
        }
    }

    pub fn singular(self) -> &'static str {
        let label = self.label();
        &label[..label.len() - 1]
    }

    /// Short frequency alias (`3M`, `15min`, ...).
    pub fn alias(self) -> &'static str {
        match self {
            BucketUnit::Years => "Y",
            BucketUnit::Quarters => "Q",
            BucketUnit::Months => "M",
            BucketUnit::Weeks => "W",
            BucketUnit::Days => "D",
            BucketUnit::Hours => "h",
            BucketUnit::Minutes => "min",
            BucketUnit::Seconds => "s",
        }
    }

    fn months(self) -> Option<i64> {
        match self {
            BucketUnit::Years => Some(12),
            BucketUnit::Quarters => Some(3),
            BucketUnit::Months => Some(1),
            _ => None,
        }
    }

    fn seconds(self) -> i64 {
        match self {
            BucketUnit::Weeks => SECONDS_PER_WEEK,
            BucketUnit::Days => SECONDS_PER_DAY,
            BucketUnit::Hours => SECONDS_PER_HOUR,
            BucketUnit::Minutes => SECONDS_PER_MINUTE,
            BucketUnit::Seconds => 1,
            // Calendar units have no fixed length.
            BucketUnit::Years | BucketUnit::Quarters | BucketUnit::Months => 0,
        }
    }
}

impl fmt::Display for BucketUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts plural or singular names in any case, or the exact short alias.
impl FromStr for BucketUnit {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        BucketUnit::ALL
            .into_iter()
            .find(|u| {
                u.alias() == trimmed
                    || u.label().eq_ignore_ascii_case(trimmed)
                    || u.singular().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| TimelineError::UnknownBucketUnit(s.to_string()))
    }
}

/// `count × unit`, with `count` at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BucketWidth {
    count: NonZeroU32,
    unit: BucketUnit,
}

impl Default for BucketWidth {
    fn default() -> Self {
        Self { count: NonZeroU32::MIN, unit: BucketUnit::Years }
    }
}

impl BucketWidth {
    pub fn new(count: i64, unit: BucketUnit) -> Result<Self> {
        u32::try_from(count)
            .ok()
            .and_then(NonZeroU32::new)
            .map(|count| Self { count, unit })
            .ok_or(TimelineError::InvalidBucketCount(count))
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }

    pub fn unit(&self) -> BucketUnit {
        self.unit
    }

    pub fn with_count(self, count: i64) -> Result<Self> {
        Self::new(count, self.unit)
    }

    pub fn with_unit(self, unit: BucketUnit) -> Self {
        Self { unit, ..self }
    }

    /// Natural-language interval: "1 month", "3 months".
    pub fn describe(&self) -> String {
        let n = self.count();
        let unit = if n == 1 { self.unit.singular() } else { self.unit.label() };
        format!("{n} {unit}")
    }

    /// Start of the bucket containing `ts`.
    pub fn bucket_start(&self, ts: NaiveDateTime) -> Result<NaiveDateTime> {
        let count = i64::from(self.count());
        match self.unit.months() {
            Some(months) => {
                let width = count * months;
                let index = (i64::from(ts.year()) - 1970) * 12 + i64::from(ts.month0());
                let start = index.div_euclid(width) * width;
                let year = i32::try_from(1970 + start.div_euclid(12)).map_err(|_| TimelineError::OutOfRange(ts))?;
                let month = start.rem_euclid(12) as u32 + 1;
                NaiveDate::from_ymd_opt(year, month, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .ok_or(TimelineError::OutOfRange(ts))
            }
            None => {
                let origin = if self.unit == BucketUnit::Weeks { WEEK_ORIGIN_SECS } else { 0 };
                let width = count * self.unit.seconds();
                let secs = ts.and_utc().timestamp() - origin;
                let start = secs.div_euclid(width) * width + origin;
                DateTime::from_timestamp(start, 0)
                    .map(|d| d.naive_utc())
                    .ok_or(TimelineError::OutOfRange(ts))
            }
        }
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count(), self.unit.alias())
    }
}
