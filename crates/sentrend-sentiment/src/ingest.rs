//! JSON-lines reader for collector output.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sentrend_core::RawRecord;

use crate::error::SentimentError;
use crate::unify::{RejectReason, Rejection};

/// Records decoded from one input, plus the lines that could not be.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub records: Vec<RawRecord>,
    pub rejections: Vec<Rejection>,
}

impl IngestOutcome {
    pub fn extend(&mut self, other: IngestOutcome) {
        self.records.extend(other.records);
        self.rejections.extend(other.rejections);
    }
}

/// Pull an `id` out of a line that failed to decode, if it has one.
fn salvage_id(line: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    match value.get("id")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode one [`RawRecord`] per non-blank line.
///
/// Lines that are not valid records, including lines that are not valid
/// UTF-8, become [`RejectReason::Malformed`] rejections; they never abort
/// the read.
///
/// # Errors
///
/// Returns [`SentimentError::Io`] if the reader itself fails.
pub fn read_jsonl<R: BufRead>(mut reader: R) -> Result<IngestOutcome, SentimentError> {
    let mut outcome = IngestOutcome::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(line = line_no, error = %e, "input line is not utf-8");
                outcome.rejections.push(Rejection {
                    record_id: salvage_id(&String::from_utf8_lossy(&buf)),
                    reason: RejectReason::Malformed(format!("line {line_no}: {e}")),
                });
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(line) {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                tracing::debug!(line = line_no, error = %e, "undecodable input line");
                outcome.rejections.push(Rejection {
                    record_id: salvage_id(line),
                    reason: RejectReason::Malformed(format!("line {line_no}: {e}")),
                });
            }
        }
    }

    Ok(outcome)
}

/// [`read_jsonl`] over a file on disk.
///
/// # Errors
///
/// Returns [`SentimentError::Io`] if the file cannot be opened or read.
pub fn read_jsonl_file(path: &Path) -> Result<IngestOutcome, SentimentError> {
    let outcome = read_jsonl(BufReader::new(File::open(path)?))?;
    if !outcome.rejections.is_empty() {
        tracing::warn!(
            path = %path.display(),
            rejected = outcome.rejections.len(),
            "skipped undecodable lines"
        );
    }
    tracing::info!(
        path = %path.display(),
        records = outcome.records.len(),
        "read collector output"
    );
    Ok(outcome)
}
