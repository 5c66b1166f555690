//! Schema documents on disk.
//!
//! A schema file is a JSON array of `{name, type, required}` objects. Reading
//! never fails on content: malformed text comes back as an empty schema plus
//! issues, the same as pasted text would.

use rowguard_schema::{parse_schema_text, ParsedSchema, Schema};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::errors::CsvResult;

pub fn read_schema_file<P: AsRef<Path>>(path: P) -> CsvResult<ParsedSchema> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let parsed = parse_schema_text(&text);

    for issue in &parsed.issues {
        warn!(path = %path.display(), "schema issue: {}", issue);
    }
    info!(
        path = %path.display(),
        fields = parsed.schema.len(),
        issues = parsed.issues.len(),
        "loaded schema"
    );

    Ok(parsed)
}

/// Write `schema` as a pretty JSON array
pub fn write_schema_file<P: AsRef<Path>>(path: P, schema: &Schema) -> CsvResult<()> {
    let path = path.as_ref();
    let mut text = serde_json::to_string_pretty(schema)?;
    text.push('\n');
    fs::write(path, text)?;
    info!(path = %path.display(), fields = schema.len(), "wrote schema");
    Ok(())
}
