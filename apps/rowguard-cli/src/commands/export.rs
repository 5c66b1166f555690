use crate::commands::{load_dataset, load_schema};
use crate::config::RowguardConfig;
use crate::error::{CliError, CliResult};
use rowguard_csvs::JsonExport;
use rowguard_schema::build_report;

pub fn execute(config: &RowguardConfig) -> CliResult<()> {
    let dataset = load_dataset(config)?;
    let schema = load_schema(config, &dataset)?;

    let report = build_report(&dataset, &schema);
    println!("{}", report.summary());

    if report.has_errors {
        if !config.allow_errors {
            return Err(CliError::ExportBlocked {
                error_rows: report.error_row_count(),
            });
        }
        println!(
            "⚠️  Exporting {} row(s) with errors",
            report.error_row_count()
        );
    }

    let export = if config.columns.is_empty() {
        JsonExport::full(&dataset, &schema)
    } else {
        JsonExport::projected(&dataset, &schema, &config.columns)
    };
    println!("📦 Columns: {}", export.column_names().join(", "));

    match &config.output {
        Some(path) => {
            export.write_to_path(path)?;
            println!("✅ Exported {} rows to {}", dataset.len(), path.display());
        }
        None => println!("{}", export.to_json_string()?),
    }

    Ok(())
}
