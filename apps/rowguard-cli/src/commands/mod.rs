pub mod check_schema;
pub mod export;
pub mod infer;
pub mod validate;

use crate::config::RowguardConfig;
use crate::error::CliResult;
use rowguard_csvs::{read_dataset, read_schema_file};
use rowguard_schema::{Dataset, Schema};
use tracing::debug;

/// Decode the configured data file and print any decode warnings
pub(crate) fn load_dataset(config: &RowguardConfig) -> CliResult<Dataset> {
    let path = config.data_path()?;
    let options = config.decode_options()?;

    println!("📋 Reading {}", path.display());
    let dataset = read_dataset(path, &options)?;
    println!(
        "✅ Loaded {} rows, {} columns",
        dataset.len(),
        dataset.columns.len()
    );

    for warning in &dataset.warnings {
        match warning.line {
            Some(line) => println!("⚠️  line {}: {}", line, warning.message),
            None => println!("⚠️  {}", warning.message),
        }
    }

    Ok(dataset)
}

/// Read the configured schema, or infer one from the first row.
///
/// Authoring issues are printed; the normalized schema is used regardless.
pub(crate) fn load_schema(config: &RowguardConfig, dataset: &Dataset) -> CliResult<Schema> {
    let Some(path) = config.schema.as_deref() else {
        println!("🔍 No schema given; inferring from the first row");
        let schema = dataset.infer_schema();
        debug!(fields = schema.len(), "inferred schema");
        return Ok(schema);
    };

    let parsed = read_schema_file(path)?;
    for issue in &parsed.issues {
        println!("⚠️  schema: {}", issue);
    }
    println!(
        "✅ Schema {} ({} fields)",
        path.display(),
        parsed.schema.len()
    );

    Ok(parsed.schema)
}
