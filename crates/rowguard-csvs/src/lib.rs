/*!
# Rowguard CSV I/O

File-facing half of Rowguard. Decodes delimited text into a
[`Dataset`](rowguard_schema::Dataset), reads and writes schema documents, and
writes the JSON and CSV exports.

## Files

- **data** (`*.csv`): header row plus data rows, any single-byte delimiter
- **schema** (`*.json`): array of `{"name", "type", "required"}` objects
- **error report** (`*.csv`): `row,errors` with one line per failing row
- **JSON export** (`*.json`): array of row objects in column order
*/

pub mod decode;
pub mod errors;
pub mod export;
pub mod schema_files;

pub use decode::{decode_reader, decode_str, read_dataset, DecodeOptions};
pub use errors::{CsvError, CsvResult};
pub use export::{
    error_report_to_string, project_records_to_json, records_to_json, write_error_report,
    write_error_report_csv, write_projection_json, write_records_json, JsonExport,
    ERROR_MESSAGE_SEPARATOR, ERROR_REPORT_HEADERS,
};
pub use schema_files::{read_schema_file, write_schema_file};
