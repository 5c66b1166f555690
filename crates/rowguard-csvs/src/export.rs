/*!
# Exports

- full-record JSON: every column, in dataset column order
- projected JSON: a caller-chosen ordered subset of columns
- CSV error report: `row,errors`, one line per failing row

JSON exports carry coerced values for columns the schema describes (numbers
as JSON numbers, booleans as JSON booleans, dates and text as strings) and
the raw text for every other column. Whether a dataset with errors may be
exported at all is up to the caller.
*/

use csv::WriterBuilder;
use rowguard_schema::{coerce, CoercedValue, Dataset, FieldType, Record, Schema, ValidationReport};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::errors::{CsvError, CsvResult};

/// Expected headers for the error report in exact order
pub const ERROR_REPORT_HEADERS: &[&str] = &["row", "errors"];

/// Separator between messages of one row in the error report
pub const ERROR_MESSAGE_SEPARATOR: &str = " | ";

// ================================================================================================
// JSON Exports
// ================================================================================================

struct ExportColumn<'a> {
    name: &'a str,
    field_type: Option<FieldType>,
}

/// Serializable view over the rows of a dataset.
pub struct JsonExport<'a> {
    dataset: &'a Dataset,
    columns: Vec<ExportColumn<'a>>,
}

impl<'a> JsonExport<'a> {
    /// Every dataset column. A repeated header is exported once, at its
    /// first position, carrying the value the record kept.
    pub fn full(dataset: &'a Dataset, schema: &'a Schema) -> Self {
        let mut columns: Vec<ExportColumn<'a>> = Vec::with_capacity(dataset.columns.len());
        for name in &dataset.columns {
            push_unique(&mut columns, name, schema);
        }
        Self { dataset, columns }
    }

    /// Only `selected`, in the given order. Names the dataset does not have
    /// are skipped; repeated names are exported once.
    pub fn projected(dataset: &'a Dataset, schema: &'a Schema, selected: &'a [String]) -> Self {
        let mut columns: Vec<ExportColumn<'a>> = Vec::with_capacity(selected.len());

        for name in selected {
            if !dataset.columns.contains(name) {
                warn!(column = %name, "skipping unknown export column");
                continue;
            }
            push_unique(&mut columns, name, schema);
        }

        Self { dataset, columns }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn to_json_string(&self) -> CsvResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> CsvResult<()> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> CsvResult<()> {
        let path = path.as_ref();
        self.write_to(File::create(path)?)?;
        info!(
            path = %path.display(),
            rows = self.dataset.len(),
            columns = self.columns.len(),
            "wrote JSON export"
        );
        Ok(())
    }
}

fn push_unique<'a>(columns: &mut Vec<ExportColumn<'a>>, name: &'a str, schema: &Schema) {
    if !columns.iter().any(|c| c.name == name) {
        columns.push(export_column(name, schema));
    }
}

fn export_column<'a>(name: &'a str, schema: &Schema) -> ExportColumn<'a> {
    ExportColumn {
        name,
        field_type: schema.field(name).map(|f| f.field_type),
    }
}

struct RowView<'a> {
    record: &'a Record,
    columns: &'a [ExportColumn<'a>],
}

impl Serialize for RowView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            let raw = self.record.get(column.name).map(String::as_str);
            let value = match (raw, column.field_type) {
                (None, _) => CoercedValue::Null,
                (Some(raw), Some(field_type)) => coerce(Some(raw), field_type),
                (Some(raw), None) => CoercedValue::Text(raw.to_string()),
            };
            map.serialize_entry(column.name, &value)?;
        }
        map.end()
    }
}

impl Serialize for JsonExport<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.dataset.len()))?;
        for record in &self.dataset.rows {
            seq.serialize_element(&RowView {
                record,
                columns: &self.columns,
            })?;
        }
        seq.end()
    }
}

/// Full-record JSON array as pretty text
pub fn records_to_json(dataset: &Dataset, schema: &Schema) -> CsvResult<String> {
    JsonExport::full(dataset, schema).to_json_string()
}

/// Column-filtered JSON array as pretty text
pub fn project_records_to_json(
    dataset: &Dataset,
    schema: &Schema,
    columns: &[String],
) -> CsvResult<String> {
    JsonExport::projected(dataset, schema, columns).to_json_string()
}

pub fn write_records_json<P: AsRef<Path>>(
    path: P,
    dataset: &Dataset,
    schema: &Schema,
) -> CsvResult<()> {
    JsonExport::full(dataset, schema).write_to_path(path)
}

pub fn write_projection_json<P: AsRef<Path>>(
    path: P,
    dataset: &Dataset,
    schema: &Schema,
    columns: &[String],
) -> CsvResult<()> {
    JsonExport::projected(dataset, schema, columns).write_to_path(path)
}

// ================================================================================================
// CSV Error Report
// ================================================================================================

fn collapse_newlines(message: &str) -> String {
    message.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Write the `row,errors` report for every failing row.
///
/// Messages of a row are joined with [`ERROR_MESSAGE_SEPARATOR`]. Fields are
/// quoted only when needed, with embedded quotes doubled.
pub fn write_error_report<W: Write>(writer: W, report: &ValidationReport) -> CsvResult<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(ERROR_REPORT_HEADERS)?;

    for row in report.failing_rows() {
        let joined = row
            .errors
            .iter()
            .map(|m| collapse_newlines(m))
            .collect::<Vec<_>>()
            .join(ERROR_MESSAGE_SEPARATOR);
        wtr.write_record([row.row_index.to_string(), joined])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn error_report_to_string(report: &ValidationReport) -> CsvResult<String> {
    let mut buffer = Vec::new();
    write_error_report(&mut buffer, report)?;
    String::from_utf8(buffer).map_err(|e| CsvError::InvalidFormat(e.to_string()))
}

pub fn write_error_report_csv<P: AsRef<Path>>(path: P, report: &ValidationReport) -> CsvResult<()> {
    let path = path.as_ref();
    write_error_report(File::create(path)?, report)?;
    info!(
        path = %path.display(),
        rows = report.error_row_count(),
        "wrote error report"
    );
    Ok(())
}

// ================================================================================================
// Tests
// ================================================================================================
