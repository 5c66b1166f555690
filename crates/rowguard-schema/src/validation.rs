/*!
# Field & Row Validation

Rules applied to a single cell, in this order, each independently:

1. required: the value is blank
2. number: present but not a finite number
3. currency: present but not a finite number once symbols are stripped
4. email: present but not `local@domain.tld`
5. boolean: present but not one of `true`, `false`, `0`, `1`
6. date: present but not a parseable calendar date

"Present" means non-blank after trimming, so a blank optional cell is never
malformed. A schema field whose column is absent from the record yields a
single missing-column error and no other rule runs for it.
*/

use thiserror::Error;

use crate::coercion::{
    coerce, is_valid_boolean_token, is_valid_date, is_valid_email, CoercedValue,
};
use crate::dataset::Record;
use crate::schemas::{FieldDefinition, FieldType, Schema};

/// One validation failure. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Field \"{0}\" is required")]
    Required(String),

    #[error("Field \"{field}\" must be {}", expectation(.expected))]
    InvalidFormat { field: String, expected: FieldType },
}

impl RowError {
    /// Name of the schema field this error belongs to
    pub fn field_name(&self) -> &str {
        match self {
            RowError::MissingColumn(name) | RowError::Required(name) => name,
            RowError::InvalidFormat { field, .. } => field,
        }
    }

    /// Type-format failures only; these are the ones counted per column.
    pub fn is_format_error(&self) -> bool {
        matches!(self, RowError::InvalidFormat { .. })
    }
}

fn expectation(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::String => "text",
        FieldType::Number => "a number",
        FieldType::Currency => "a valid currency amount",
        FieldType::Email => "a valid email address",
        FieldType::Boolean => "one of true, false, 0, 1",
        FieldType::Date => "a valid date",
    }
}

fn is_blank(raw: Option<&str>) -> bool {
    raw.map_or(true, |s| s.trim().is_empty())
}

// ================================================================================================
// Field Validation
// ================================================================================================

/// Type-format rules (2 through 6) for one cell.
///
/// Returns `None` for blank cells regardless of type.
pub fn format_error(raw: Option<&str>, field: &FieldDefinition) -> Option<RowError> {
    let value = raw.filter(|s| !s.trim().is_empty())?;

    let well_formed = match field.field_type {
        FieldType::String => true,
        FieldType::Number | FieldType::Currency => matches!(
            coerce(Some(value), field.field_type),
            CoercedValue::Number(n) if n.is_finite()
        ),
        FieldType::Email => is_valid_email(value),
        FieldType::Boolean => is_valid_boolean_token(value),
        FieldType::Date => is_valid_date(value),
    };

    (!well_formed).then(|| RowError::InvalidFormat {
        field: field.name.clone(),
        expected: field.field_type,
    })
}

// Required looks at the raw cell: a boolean coerces to `false`, never to an
// empty value, so the coerced form cannot tell a blank cell apart.
fn push_field_errors(raw: Option<&str>, field: &FieldDefinition, errors: &mut Vec<RowError>) {
    if field.required && is_blank(raw) {
        errors.push(RowError::Required(field.name.clone()));
    }
    if let Some(error) = format_error(raw, field) {
        errors.push(error);
    }
}

/// All rule failures for one cell, in rule order.
pub fn field_errors(raw: Option<&str>, field: &FieldDefinition) -> Vec<RowError> {
    let mut errors = Vec::new();
    push_field_errors(raw, field, &mut errors);
    errors
}

/// Same as [`field_errors`], rendered as messages.
pub fn validate_field(raw: Option<&str>, field: &FieldDefinition) -> Vec<String> {
    field_errors(raw, field)
        .iter()
        .map(ToString::to_string)
        .collect()
}

// ================================================================================================
// Row Validation
// ================================================================================================

/// Validate one record against every schema field, in schema order.
pub fn row_errors(record: &Record, schema: &Schema) -> Vec<RowError> {
    let mut errors = Vec::new();

    for field in schema {
        match record.get(&field.name) {
            None => errors.push(RowError::MissingColumn(field.name.clone())),
            Some(raw) => push_field_errors(Some(raw.as_str()), field, &mut errors),
        }
    }

    errors
}

/// Same as [`row_errors`], rendered as messages.
pub fn validate_row(record: &Record, schema: &Schema) -> Vec<String> {
    row_errors(record, schema)
        .iter()
        .map(ToString::to_string)
        .collect()
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[(&str, &str)]) -> Record {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_non_numeric_number() {
        let schema = Schema::new(vec![FieldDefinition::new("age", FieldType::Number)]);
        let errors = validate_row(&record(&[("age", "abc")]), &schema);
        assert_eq!(errors, vec![r#"Field "age" must be a number"#]);
    }

    #[test]
    fn test_required_blank_email_has_no_format_error() {
        let schema = Schema::new(vec![FieldDefinition::new("email", FieldType::Email).required()]);
        let errors = validate_row(&record(&[("email", "")]), &schema);
        assert_eq!(errors, vec![r#"Field "email" is required"#]);
    }

    #[test]
    fn test_missing_column_skips_other_rules() {
        let schema = Schema::new(vec![FieldDefinition::new("x", FieldType::Number).required()]);
        let errors = validate_row(&Record::new(), &schema);
        assert_eq!(errors, vec!["Missing column: x"]);
    }

    #[test]
    fn test_required_whitespace_for_every_type() {
        for field_type in FieldType::ALL {
            let field = FieldDefinition::new("f", field_type).required();
            assert_eq!(
                field_errors(Some("  \t "), &field),
                vec![RowError::Required("f".to_string())],
                "type {}",
                field_type
            );
            assert_eq!(
                field_errors(None, &field),
                vec![RowError::Required("f".to_string())]
            );
        }
    }

    #[test]
    fn test_optional_blank_never_errors() {
        for field_type in FieldType::ALL {
            let field = FieldDefinition::new("f", field_type);
            assert!(field_errors(Some(""), &field).is_empty());
            assert!(field_errors(Some("   "), &field).is_empty());
            assert!(field_errors(None, &field).is_empty());
        }
    }

    #[test]
    fn test_format_messages_per_type() {
        let cases = [
            (FieldType::Currency, "ten", r#"Field "f" must be a valid currency amount"#),
            (FieldType::Email, "nobody", r#"Field "f" must be a valid email address"#),
            (FieldType::Boolean, "yes", r#"Field "f" must be one of true, false, 0, 1"#),
            (FieldType::Date, "someday", r#"Field "f" must be a valid date"#),
        ];
        for (field_type, raw, message) in cases {
            let field = FieldDefinition::new("f", field_type);
            assert_eq!(validate_field(Some(raw), &field), vec![message]);
        }
    }

    #[test]
    fn test_well_formed_values_pass() {
        let cases = [
            (FieldType::String, "anything at all"),
            (FieldType::Number, "-12.5"),
            (FieldType::Currency, "$1,200.00"),
            (FieldType::Email, "ada@example.com"),
            (FieldType::Boolean, "FALSE"),
            (FieldType::Date, "2024-01-05"),
        ];
        for (field_type, raw) in cases {
            let field = FieldDefinition::new("f", field_type).required();
            assert!(field_errors(Some(raw), &field).is_empty(), "{}", raw);
        }
    }

    #[test]
    fn test_currency_symbols_rejected_for_plain_numbers() {
        let field = FieldDefinition::new("price", FieldType::Number);
        assert_eq!(field_errors(Some("$5"), &field).len(), 1);
        let field = FieldDefinition::new("price", FieldType::Currency);
        assert!(field_errors(Some("$5"), &field).is_empty());
    }

    #[test]
    fn test_row_errors_follow_schema_order() {
        let schema = Schema::new(vec![
            FieldDefinition::new("b", FieldType::Boolean),
            FieldDefinition::new("missing", FieldType::String),
            FieldDefinition::new("a", FieldType::Number).required(),
        ]);
        let row = record(&[("a", ""), ("b", "maybe")]);

        let errors = validate_row(&row, &schema);
        assert_eq!(
            errors,
            vec![
                r#"Field "b" must be one of true, false, 0, 1"#,
                "Missing column: missing",
                r#"Field "a" is required"#,
            ]
        );
        assert_eq!(validate_row(&row, &schema), errors);
    }

    #[test]
    fn test_error_classification() {
        let missing = RowError::MissingColumn("x".to_string());
        let format = RowError::InvalidFormat {
            field: "y".to_string(),
            expected: FieldType::Date,
        };
        assert!(!missing.is_format_error());
        assert!(format.is_format_error());
        assert_eq!(missing.field_name(), "x");
        assert_eq!(format.field_name(), "y");
    }
}
