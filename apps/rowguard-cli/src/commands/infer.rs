use crate::commands::load_dataset;
use crate::config::RowguardConfig;
use crate::error::CliResult;
use rowguard_csvs::write_schema_file;

pub fn execute(config: &RowguardConfig) -> CliResult<()> {
    let dataset = load_dataset(config)?;

    println!("\n🔍 Inferring field types from the first row...");
    let schema = dataset.infer_schema();
    for field in &schema {
        println!("  {}: {}", field.name, field.field_type);
    }

    match &config.output {
        Some(path) => {
            write_schema_file(path, &schema)?;
            println!("✅ Schema written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&schema)?),
    }

    Ok(())
}
