use crate::config::RowguardConfig;
use crate::error::{CliError, CliResult};
use rowguard_csvs::read_schema_file;

pub fn execute(config: &RowguardConfig) -> CliResult<()> {
    let path = config.schema.as_deref().ok_or_else(|| {
        CliError::InvalidConfig("no schema file given (pass a path or set `schema`)".to_string())
    })?;

    println!("🔍 Checking {}", path.display());
    let parsed = read_schema_file(path)?;

    for field in &parsed.schema {
        let required = if field.required { " (required)" } else { "" };
        println!("  {}: {}{}", field.name, field.field_type, required);
    }

    if !parsed.is_clean() {
        for issue in &parsed.issues {
            println!("❌ {}", issue);
        }
        return Err(CliError::SchemaRejected(format!(
            "{} issue(s) in {}",
            parsed.issues.len(),
            path.display()
        )));
    }

    println!("✅ Schema OK ({} fields)", parsed.schema.len());
    Ok(())
}
