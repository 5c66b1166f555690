/*!
# CSV Decoding

Turns delimited text into a [`Dataset`]: ordered header names plus one
record per data line, keyed by header.

Decoding is forgiving. Lines with the wrong number of fields are repaired
and reported as warnings, unreadable lines are skipped with a warning, and
the rows that did decode stay usable. Only a missing header row or an I/O
failure is an error.
*/

use csv::{ReaderBuilder, StringRecord};
use rowguard_schema::{Dataset, DecodeWarning, Record};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::{CsvError, CsvResult};

/// How to split the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Field delimiter (single ASCII byte)
    pub delimiter: u8,

    /// Trim surrounding whitespace from header names
    pub trim_headers: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim_headers: true,
        }
    }
}

impl DecodeOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> CsvResult<Self> {
        if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
            return Err(CsvError::InvalidFormat(format!(
                "unsupported delimiter {:?}",
                delimiter
            )));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }
}

// ================================================================================================
// Reading
// ================================================================================================

/// Read and decode a delimited file
pub fn read_dataset<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> CsvResult<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    decode_reader(file, options, &path.display().to_string())
}

/// Decode in-memory text
pub fn decode_str(text: &str, options: &DecodeOptions) -> CsvResult<Dataset> {
    decode_reader(text.as_bytes(), options, "<input>")
}

/// Decode from any reader. `source` names the input in messages.
pub fn decode_reader<R: Read>(
    reader: R,
    options: &DecodeOptions,
    source: &str,
) -> CsvResult<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(CsvError::MissingHeader(source.to_string()));
    }

    let mut warnings = Vec::new();
    let columns = header_names(&headers, options, &mut warnings);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line());
                warn!(source, ?line, "skipping unreadable record: {}", e);
                warnings.push(DecodeWarning::new(
                    line,
                    format!("Skipped unreadable record: {}", e),
                ));
                continue;
            }
        };

        if is_blank_line(&record, columns.len()) {
            continue;
        }

        rows.push(to_record(&record, &columns, &mut warnings));
    }

    info!(
        source,
        rows = rows.len(),
        columns = columns.len(),
        warnings = warnings.len(),
        "decoded dataset"
    );

    Ok(Dataset::new(columns, rows).with_warnings(warnings))
}

fn header_names(
    headers: &StringRecord,
    options: &DecodeOptions,
    warnings: &mut Vec<DecodeWarning>,
) -> Vec<String> {
    let line = headers.position().map(|p| p.line()).or(Some(1));
    let mut seen = HashSet::new();

    headers
        .iter()
        .map(|h| {
            let name = if options.trim_headers { h.trim() } else { h };
            if !seen.insert(name.to_string()) {
                debug!(column = name, "duplicate header");
                warnings.push(DecodeWarning::new(
                    line,
                    format!("Duplicate column \"{}\"; later values win", name),
                ));
            }
            name.to_string()
        })
        .collect()
}

fn is_blank_line(record: &StringRecord, column_count: usize) -> bool {
    column_count > 1 && record.len() == 1 && record[0].trim().is_empty()
}

fn to_record(
    record: &StringRecord,
    columns: &[String],
    warnings: &mut Vec<DecodeWarning>,
) -> Record {
    let line = record.position().map(|p| p.line());

    if record.len() != columns.len() {
        let action = if record.len() < columns.len() {
            "missing values left empty"
        } else {
            "extra values ignored"
        };
        warn!(?line, expected = columns.len(), found = record.len(), "{}", action);
        warnings.push(DecodeWarning::new(
            line,
            format!(
                "Expected {} fields, found {}; {}",
                columns.len(),
                record.len(),
                action
            ),
        ));
    }

    columns
        .iter()
        .enumerate()
        .map(|(i, column)| (column.clone(), record.get(i).unwrap_or("").to_string()))
        .collect()
}

// ================================================================================================
// Tests
// ================================================================================================
