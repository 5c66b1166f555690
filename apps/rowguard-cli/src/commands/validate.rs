use crate::commands::{load_dataset, load_schema};
use crate::config::RowguardConfig;
use crate::error::{CliError, CliResult};
use rowguard_csvs::write_error_report_csv;
use rowguard_schema::{build_report, ValidationReport};

pub fn execute(config: &RowguardConfig, json: bool) -> CliResult<()> {
    let dataset = load_dataset(config)?;
    let schema = load_schema(config, &dataset)?;

    println!("\n🔍 Validating...");
    let report = build_report(&dataset, &schema);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(path) = &config.error_report {
        write_error_report_csv(path, &report)?;
        println!("📝 Error report written to {}", path.display());
    }

    if report.has_errors {
        return Err(CliError::ValidationFailed {
            error_rows: report.error_row_count(),
        });
    }

    println!("✅ All rows valid");
    Ok(())
}

fn print_report(report: &ValidationReport) {
    println!("{}", report.summary());

    for row in report.failing_rows() {
        println!("  row {}:", row.row_index);
        for message in &row.errors {
            println!("    - {}", message);
        }
    }

    if !report.column_error_counts.is_empty() {
        println!("\n📊 Format errors by column:");
        for (column, count) in &report.column_error_counts {
            println!("  {}: {}", column, count);
        }
    }
}
