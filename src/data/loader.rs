use std::path::Path;

use anyhow::{Context, Result, bail};
use thiserror::Error;

use super::model::RawTable;

/// Marker line that instrument exports put between their metadata block
/// and the tabular records.
pub const RECORD_MARKER: &[u8] = b"BEGIN RECORD";

/// Spellings read as a missing value, in addition to the empty string.
const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read CSV header: {0}")]
    Header(#[from] csv::Error),
    #[error("File has no columns")]
    NoColumns,
}

// ---------------------------------------------------------------------------
// RawUpload – the file as the user handed it over
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RawUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read a user-selected file.  Only `.txt` and `.csv` are accepted.
pub fn load_file(path: &Path) -> Result<RawUpload> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "txt" | "csv" => {}
        other => bail!("Unsupported file extension: .{other}"),
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(RawUpload { file_name, bytes })
}

// ---------------------------------------------------------------------------
// Record detection
// ---------------------------------------------------------------------------

/// Index of the first line after the `BEGIN RECORD` marker, or 0 when the
/// file carries no marker.
pub fn find_record_start(bytes: &[u8]) -> usize {
    bytes
        .split(|&b| b == b'\n')
        .position(|line| {
            line.windows(RECORD_MARKER.len())
                .any(|w| w == RECORD_MARKER)
        })
        .map_or(0, |k| k + 1)
}

/// Byte offset at which `line` starts.
fn line_offset(bytes: &[u8], line: usize) -> usize {
    if line == 0 {
        return 0;
    }
    bytes
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'\n')
        .nth(line - 1)
        .map_or(bytes.len(), |(i, _)| i + 1)
}

// ---------------------------------------------------------------------------
// CSV parse
// ---------------------------------------------------------------------------

/// Result of the tolerant parse: the table plus how many records were skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedUpload {
    pub table: RawTable,
    /// First data line, relative to the start of the file.
    pub record_start: usize,
    pub malformed: usize,
}

/// Parse upload bytes as comma-separated values.
///
/// Parsing starts after the `BEGIN RECORD` marker when one is present.
/// Records with more fields than the header, or that the reader cannot
/// decode, are skipped and counted.  Short records are padded with
/// missing values.
pub fn parse_upload(bytes: &[u8]) -> Result<ParsedUpload, LoadError> {
    let record_start = find_record_start(bytes);
    let body = &bytes[line_offset(bytes, record_start)..];

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body);

    let raw_headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if raw_headers.is_empty() {
        return Err(LoadError::NoColumns);
    }
    let headers = dedupe_headers(raw_headers);
    let width = headers.len();

    let mut rows = Vec::new();
    let mut malformed = 0;

    for (row_no, result) in reader.byte_records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::debug!("skipping record {row_no}: {e}");
                malformed += 1;
                continue;
            }
        };
        if record.len() > width {
            log::debug!(
                "skipping record {row_no}: {} fields, header has {width}",
                record.len()
            );
            malformed += 1;
            continue;
        }

        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|field| normalize_field(&String::from_utf8_lossy(field)))
            .collect();
        row.resize(width, None);
        rows.push(row);
    }

    Ok(ParsedUpload {
        table: RawTable { headers, rows },
        record_start,
        malformed,
    })
}

/// `None` for empty fields and NA spellings.
pub fn normalize_field(field: &str) -> Option<String> {
    if field.is_empty() || NA_VALUES.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

/// Give blank headers a placeholder name and suffix repeats with `.1`, `.2`…
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}
