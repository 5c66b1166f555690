//! Best-effort schema guessing from a single sample record.
//!
//! Only the first record is inspected, and every inferred field is optional.
//! The check order matters: anything that parses as a number is a number,
//! even when it would also be a valid boolean token (`"1"`) or date.

use crate::coercion::{is_valid_boolean_token, is_valid_date, is_valid_currency};
use crate::dataset::Record;
use crate::schemas::{FieldDefinition, FieldType, Schema};

/// Classify one raw sample value.
pub fn infer_field_type(raw: Option<&str>) -> FieldType {
    let Some(value) = raw.filter(|s| !s.trim().is_empty()) else {
        return FieldType::String;
    };

    if is_valid_currency(value) {
        FieldType::Number
    } else if is_valid_boolean_token(value) {
        FieldType::Boolean
    } else if is_valid_date(value) {
        FieldType::Date
    } else {
        FieldType::String
    }
}

/// One optional field per column, typed from `sample`.
///
/// With no sample (an empty dataset) every column is a string.
pub fn infer_schema(sample: Option<&Record>, columns: &[String]) -> Schema {
    columns
        .iter()
        .map(|column| {
            let raw = sample.and_then(|record| record.get(column)).map(String::as_str);
            FieldDefinition::new(column.clone(), infer_field_type(raw))
        })
        .collect()
}
