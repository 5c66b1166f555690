use rowguard_schema::{
    build_report, infer_field_type, normalize, parse_schema_text, validate_row, Dataset,
    DecodeWarning, FieldType, Record, ReportCache,
};
use serde_json::json;
use std::collections::BTreeSet;

fn record(cells: &[(&str, &str)]) -> Record {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_number_field_rejects_text() {
    let parsed = parse_schema_text(r#"[{"name":"age","type":"number","required":false}]"#);
    assert!(parsed.is_clean());

    let errors = validate_row(&record(&[("age", "abc")]), &parsed.schema);
    assert_eq!(errors, vec![r#"Field "age" must be a number"#]);
}

#[test]
fn test_required_email_reports_required_only() {
    let parsed = parse_schema_text(r#"[{"name":"email","type":"email","required":true}]"#);

    let errors = validate_row(&record(&[("email", "")]), &parsed.schema);
    assert_eq!(errors, vec![r#"Field "email" is required"#]);
}

#[test]
fn test_missing_column_reported_once() {
    let parsed = parse_schema_text(r#"[{"name":"x","type":"number"}]"#);

    let errors = validate_row(&Record::new(), &parsed.schema);
    assert_eq!(errors, vec!["Missing column: x"]);
}

#[test]
fn test_inference_examples() {
    assert_eq!(infer_field_type(Some("30")), FieldType::Number);
    assert_eq!(infer_field_type(Some("2024-01-05")), FieldType::Date);
    assert_eq!(infer_field_type(Some("true")), FieldType::Boolean);
    assert_eq!(infer_field_type(Some("")), FieldType::String);
}

#[test]
fn test_report_over_three_rows() {
    let schema = normalize(&json!([
        {"name": "name", "type": "string", "required": true},
        {"name": "email", "type": "email", "required": true},
        {"name": "age", "type": "number"},
    ]));
    let dataset = Dataset::new(
        vec!["name".to_string(), "email".to_string(), "age".to_string()],
        vec![
            record(&[("name", "Ada"), ("email", "ada@example.com"), ("age", "36")]),
            record(&[("name", "Bob"), ("email", "bob@localhost"), ("age", "41")]),
            record(&[("name", "Cy"), ("email", "cy at example.com"), ("age", "n/a")]),
        ],
    );

    let report = build_report(&dataset, &schema);

    assert!(report.has_errors);
    assert_eq!(report.error_rows, BTreeSet::from([2, 3]));
    assert_eq!(report.column_error_counts.get("email"), Some(&2));
    assert_eq!(report.column_error_counts.get("age"), Some(&1));
    assert_eq!(report.column_error_counts.len(), 2);
    assert_eq!(
        report.rows.iter().map(|r| r.row_index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_inferred_schema_accepts_its_own_sample() {
    let dataset = Dataset::new(
        vec!["id".to_string(), "joined".to_string(), "vip".to_string()],
        vec![
            record(&[("id", "1"), ("joined", "2024-01-05"), ("vip", "false")]),
            record(&[("id", "two"), ("joined", "2024-13-01"), ("vip", "maybe")]),
        ],
    );

    let schema = dataset.infer_schema();
    let report = build_report(&dataset, &schema);

    assert_eq!(report.error_rows, BTreeSet::from([2]));
    assert_eq!(report.column_error_count("id"), 1);
    assert_eq!(report.column_error_count("joined"), 1);
    assert_eq!(report.column_error_count("vip"), 1);
}

#[test]
fn test_schema_edits_invalidate_cached_report() {
    let dataset = Dataset::new(vec!["qty".to_string()], vec![record(&[("qty", "many")])]);
    let mut cache = ReportCache::new();

    let loose = parse_schema_text(r#"[{"name":"qty","type":"string"}]"#).schema;
    assert!(!cache.get_or_build(&dataset, &loose).has_errors);

    let strict = parse_schema_text(r#"[{"name":"qty","type":"number"}]"#).schema;
    assert!(cache.get_or_build(&dataset, &strict).has_errors);
}

#[test]
fn test_decode_warnings_survive_validation() {
    let warnings = vec![
        DecodeWarning::new(Some(3), "Expected 2 fields, found 1; missing values left empty"),
        DecodeWarning::new(None, "Skipped unreadable record"),
    ];
    let dataset = Dataset::new(
        vec!["qty".to_string(), "note".to_string()],
        vec![record(&[("qty", "x"), ("note", "")])],
    )
    .with_warnings(warnings.clone());
    let schema = parse_schema_text(r#"[{"name":"qty","type":"number"}]"#).schema;

    let report = build_report(&dataset, &schema);

    assert!(report.has_errors);
    assert_eq!(dataset.warnings, warnings);
}
