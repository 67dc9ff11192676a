// File: crates/timeline-demo/src/csv_corpus.rs
// Summary: Load a CSV file as a corpus, inferring one type per metadata column.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array};
use arrow::datatypes::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use timeline_core::frame::{datetime_array, text_array, timestamp_type};
use timeline_core::Corpus;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// RFC 3339 (normalized to UTC), then the naive formats, then a bare date at midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(|d| d.and_time(NaiveTime::MIN))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// First type every non-empty cell parses as; text when nothing narrower fits.
fn infer(cells: &[&str]) -> DataType {
    let filled: Vec<&str> = cells.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).collect();
    if filled.is_empty() {
        return DataType::Utf8;
    }
    if filled.iter().all(|c| parse_timestamp(c).is_some()) {
        timestamp_type()
    } else if filled.iter().all(|c| c.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if filled.iter().all(|c| c.parse::<f64>().is_ok()) {
        DataType::Float64
    } else if filled.iter().all(|c| parse_bool(c).is_some()) {
        DataType::Boolean
    } else {
        DataType::Utf8
    }
}

/// Build one column of `dtype`; blank cells become nulls.
fn to_array(cells: &[&str], dtype: &DataType) -> ArrayRef {
    let filled = cells.iter().map(|c| Some(c.trim()).filter(|c| !c.is_empty()));
    match dtype {
        DataType::Timestamp(_, _) => datetime_array(filled.map(|c| c.and_then(parse_timestamp))),
        DataType::Int64 => Arc::new(filled.map(|c| c.and_then(|c| c.parse().ok())).collect::<Int64Array>()),
        DataType::Float64 => Arc::new(filled.map(|c| c.and_then(|c| c.parse().ok())).collect::<Float64Array>()),
        DataType::Boolean => Arc::new(filled.map(|c| c.and_then(parse_bool)).collect::<BooleanArray>()),
        _ => text_array(filled),
    }
}

pub fn load_corpus(path: &Path, document_column: &str) -> Result<Corpus> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_corpus(file, document_column).with_context(|| format!("reading {}", path.display()))
}

/// The `document_column` header holds document bodies; every other header is metadata.
pub fn read_corpus<R: Read>(reader: R, document_column: &str) -> Result<Corpus> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let doc_idx = headers
        .iter()
        .position(|h| h == document_column)
        .with_context(|| format!("no '{document_column}' column; headers are {headers:?}"))?;

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("record {}", line + 1))?;
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(rec.get(i).unwrap_or_default().to_string());
        }
    }

    let documents = std::mem::take(&mut cells[doc_idx]);
    let mut metas = Vec::with_capacity(headers.len().saturating_sub(1));
    for (i, name) in headers.iter().enumerate() {
        if i == doc_idx {
            continue;
        }
        let raw: Vec<&str> = cells[i].iter().map(String::as_str).collect();
        let dtype = infer(&raw);
        metas.push((name.clone(), to_array(&raw, &dtype)));
    }
    Ok(Corpus::new(documents, metas)?)
}
