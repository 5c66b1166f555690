/*!
# Rowguard Schema Engine

This crate holds the **validation engine** behind Rowguard: it takes a decoded
dataset (column names plus one raw-string record per row) and a field schema,
and tells you which cells are wrong and why.

Everything here is pure and synchronous. Reading files and writing exports
lives in `rowguard-csvs`; this crate never touches the filesystem.

## Pieces

- [`coercion`]: raw cell text to a typed candidate value
- [`validation`]: per-field rules and the per-row validator
- [`schemas`]: field definitions, the normalizer and the schema self-check
- [`inference`]: guess a schema from the first record
- [`report`]: aggregate row results into a [`ValidationReport`]
- [`cache`]: fingerprints and an explicitly keyed report cache

## Usage

```rust
use rowguard_schema::{build_report, parse_schema_text, Dataset, Record};

let parsed = parse_schema_text(r#"[{"name":"age","type":"number","required":true}]"#);
assert!(parsed.issues.is_empty());

let mut row = Record::new();
row.insert("age".to_string(), "abc".to_string());
let dataset = Dataset::new(vec!["age".to_string()], vec![row]);

let report = build_report(&dataset, &parsed.schema);
assert!(report.has_errors);
assert_eq!(report.rows[0].errors, vec![r#"Field "age" must be a number"#]);
```
*/

pub mod cache;
pub mod coercion;
pub mod dataset;
pub mod inference;
pub mod report;
pub mod schemas;
pub mod validation;

// Re-export main types for convenience
pub use cache::{dataset_fingerprint, schema_fingerprint, ReportCache, ReportKey};
pub use coercion::{coerce, coerce_boolean, is_valid_boolean_token, CoercedValue};
pub use dataset::{Dataset, DecodeWarning, Record};
pub use inference::{infer_field_type, infer_schema};
pub use report::{build_report, RowValidationResult, ValidationReport};
pub use schemas::{
    check_schema, normalize, parse_schema_text, FieldDefinition, FieldType, ParsedSchema,
    Schema, SchemaIssue,
};
pub use validation::{
    field_errors, format_error, row_errors, validate_field, validate_row, RowError,
};
