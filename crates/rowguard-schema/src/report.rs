/*!
# Validation Reports

Runs the row validator over a whole dataset and derives the aggregates a
caller needs to decide what to show and whether a clean export is possible.

Reports use ordered collections throughout, so validating the same dataset
against the same schema twice yields reports that compare equal and
serialize identically.
*/

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::dataset::Dataset;
use crate::schemas::Schema;
use crate::validation::row_errors;

/// Messages for one row. An empty `errors` list means the row is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowValidationResult {
    /// 1-based, matching decode order
    pub row_index: usize,
    pub errors: Vec<String>,
}

impl RowValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// One entry per dataset row, in order
    pub rows: Vec<RowValidationResult>,

    pub has_errors: bool,

    /// Indices of rows with at least one error
    pub error_rows: BTreeSet<usize>,

    /// Column name to the number of records whose cell fails a type-format
    /// rule. Required and missing-column failures are not counted here.
    pub column_error_counts: BTreeMap<String, usize>,
}

impl ValidationReport {
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn error_row_count(&self) -> usize {
        self.error_rows.len()
    }

    pub fn valid_row_count(&self) -> usize {
        self.total_rows().saturating_sub(self.error_row_count())
    }

    /// Messages for a 1-based row index
    pub fn errors_for_row(&self, row_index: usize) -> Option<&[String]> {
        row_index
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .map(|r| r.errors.as_slice())
    }

    pub fn failing_rows(&self) -> impl Iterator<Item = &RowValidationResult> {
        self.rows.iter().filter(|r| !r.is_valid())
    }

    pub fn column_error_count(&self, column: &str) -> usize {
        self.column_error_counts.get(column).copied().unwrap_or(0)
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let messages: usize = self.rows.iter().map(|r| r.errors.len()).sum();
        format!(
            "{} rows checked, {} valid, {} with errors ({} messages)",
            self.total_rows(),
            self.valid_row_count(),
            self.error_row_count(),
            messages
        )
    }
}

/// Validate every record of `dataset` against `schema`.
///
/// Runs in time linear in rows times schema fields.
pub fn build_report(dataset: &Dataset, schema: &Schema) -> ValidationReport {
    let mut report = ValidationReport {
        rows: Vec::with_capacity(dataset.len()),
        ..Default::default()
    };

    for (i, record) in dataset.rows.iter().enumerate() {
        let row_index = i + 1;
        let errors = row_errors(record, schema);

        if !errors.is_empty() {
            report.error_rows.insert(row_index);

            let mut counted: Vec<&str> = Vec::new();
            for error in errors.iter().filter(|e| e.is_format_error()) {
                let column = error.field_name();
                if counted.contains(&column) {
                    continue;
                }
                counted.push(column);

                match report.column_error_counts.get_mut(column) {
                    Some(count) => *count += 1,
                    None => {
                        report.column_error_counts.insert(column.to_string(), 1);
                    }
                }
            }
        }

        report.rows.push(RowValidationResult {
            row_index,
            errors: errors.iter().map(ToString::to_string).collect(),
        });
    }

    report.has_errors = !report.error_rows.is_empty();

    debug!(
        rows = report.total_rows(),
        fields = schema.len(),
        error_rows = report.error_row_count(),
        "built validation report"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::schemas::{FieldDefinition, FieldType};

    fn record(cells: &[(&str, &str)]) -> Record {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn people() -> (Dataset, Schema) {
        let columns = vec!["name".to_string(), "email".to_string(), "age".to_string()];
        let rows = vec![
            record(&[("name", "Ada"), ("email", "ada@example.com"), ("age", "36")]),
            record(&[("name", "Bob"), ("email", "bob-at-example"), ("age", "41")]),
            record(&[("name", "Cy"), ("email", "cy@"), ("age", "old")]),
        ];
        let schema = Schema::new(vec![
            FieldDefinition::new("name", FieldType::String).required(),
            FieldDefinition::new("email", FieldType::Email).required(),
            FieldDefinition::new("age", FieldType::Number),
        ]);
        (Dataset::new(columns, rows), schema)
    }

    #[test]
    fn test_report_aggregates() {
        let (dataset, schema) = people();
        let report = build_report(&dataset, &schema);

        assert!(report.has_errors);
        assert_eq!(report.error_rows, BTreeSet::from([2, 3]));
        assert_eq!(report.column_error_count("email"), 2);
        assert_eq!(report.column_error_count("age"), 1);
        assert_eq!(report.column_error_count("name"), 0);
        assert_eq!(report.valid_row_count(), 1);
        assert_eq!(
            report.errors_for_row(3),
            Some(
                &[
                    r#"Field "email" must be a valid email address"#.to_string(),
                    r#"Field "age" must be a number"#.to_string(),
                ][..]
            )
        );
        assert_eq!(report.errors_for_row(1), Some(&[][..]));
        assert_eq!(report.errors_for_row(0), None);
    }

    #[test]
    fn test_empty_dataset() {
        let (_, schema) = people();
        let report = build_report(&Dataset::default(), &schema);
        assert!(!report.has_errors);
        assert!(report.rows.is_empty());
        assert!(report.column_error_counts.is_empty());
        assert_eq!(report.summary(), "0 rows checked, 0 valid, 0 with errors (0 messages)");
    }

    #[test]
    fn test_required_and_missing_not_counted_per_column() {
        let schema = Schema::new(vec![
            FieldDefinition::new("email", FieldType::Email).required(),
            FieldDefinition::new("age", FieldType::Number),
        ]);
        let dataset = Dataset::new(
            vec!["email".to_string()],
            vec![record(&[("email", "")]), record(&[("email", " ")])],
        );

        let report = build_report(&dataset, &schema);
        assert_eq!(report.error_rows, BTreeSet::from([1, 2]));
        assert!(report.column_error_counts.is_empty());
        assert_eq!(
            report.rows[0].errors,
            vec![r#"Field "email" is required"#, "Missing column: age"]
        );
    }

    #[test]
    fn test_duplicate_fields_count_a_record_once() {
        let schema = Schema::new(vec![
            FieldDefinition::new("n", FieldType::Number),
            FieldDefinition::new("n", FieldType::Number).required(),
        ]);
        let dataset = Dataset::new(vec!["n".to_string()], vec![record(&[("n", "x")])]);

        let report = build_report(&dataset, &schema);
        assert_eq!(report.rows[0].errors.len(), 2);
        assert_eq!(report.column_error_count("n"), 1);
    }

    #[test]
    fn test_hand_built_report_counts_do_not_underflow() {
        let report = ValidationReport {
            error_rows: BTreeSet::from([1]),
            has_errors: true,
            ..Default::default()
        };
        assert_eq!(report.valid_row_count(), 0);
        assert_eq!(report.summary(), "0 rows checked, 0 valid, 1 with errors (0 messages)");
    }

    #[test]
    fn test_report_is_deterministic() {
        let (dataset, schema) = people();
        let first = build_report(&dataset, &schema);
        let second = build_report(&dataset, &schema);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_failing_rows_and_summary() {
        let (dataset, schema) = people();
        let report = build_report(&dataset, &schema);
        let failing: Vec<usize> = report.failing_rows().map(|r| r.row_index).collect();
        assert_eq!(failing, vec![2, 3]);
        assert_eq!(
            report.summary(),
            "3 rows checked, 1 valid, 2 with errors (3 messages)"
        );
    }
}
