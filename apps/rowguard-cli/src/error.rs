use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] rowguard_csvs::CsvError),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Schema rejected: {0}")]
    SchemaRejected(String),

    #[error("Validation failed: {error_rows} row(s) with errors")]
    ValidationFailed { error_rows: usize },

    #[error("Export blocked: {error_rows} row(s) with errors (pass --allow-errors to export anyway)")]
    ExportBlocked { error_rows: usize },
}
