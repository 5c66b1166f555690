use crate::error::{CliError, CliResult};
use rowguard_csvs::DecodeOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project configuration file structure.
///
/// Every key is optional. Relative paths are resolved against the directory
/// holding the configuration file.
///
/// ```yaml
/// data: customers.csv
/// schema: customers.schema.json
/// delimiter: ";"
/// columns: [email, joined]
/// allow_errors: false
/// error_report: out/errors.csv
/// output: out/customers.json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RowguardConfig {
    /// Data file to decode
    pub data: Option<PathBuf>,

    /// Schema document (JSON array of field definitions)
    pub schema: Option<PathBuf>,

    /// Field delimiter, single ASCII character
    pub delimiter: Option<char>,

    /// Ordered column subset for projected exports
    pub columns: Vec<String>,

    /// Export even when the report has errors
    pub allow_errors: bool,

    /// Where to write the `row,errors` report
    pub error_report: Option<PathBuf>,

    /// Where to write command output (JSON export or inferred schema)
    pub output: Option<PathBuf>,
}

impl RowguardConfig {
    pub fn from_yaml_str(text: &str) -> CliResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            CliError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&text)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_relative(base))
    }

    /// Load `path` if given, otherwise start from defaults
    pub fn load_optional(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn resolve_relative(mut self, base: &Path) -> Self {
        let resolve = |p: Option<PathBuf>| p.map(|p| if p.is_relative() { base.join(p) } else { p });
        self.data = resolve(self.data.take());
        self.schema = resolve(self.schema.take());
        self.error_report = resolve(self.error_report.take());
        self.output = resolve(self.output.take());
        self
    }

    /// Layer command-line values on top. Set flags win; unset flags keep the
    /// configured value.
    pub fn merge(self, overrides: RowguardConfig) -> Self {
        Self {
            data: overrides.data.or(self.data),
            schema: overrides.schema.or(self.schema),
            delimiter: overrides.delimiter.or(self.delimiter),
            columns: if overrides.columns.is_empty() {
                self.columns
            } else {
                overrides.columns
            },
            allow_errors: overrides.allow_errors || self.allow_errors,
            error_report: overrides.error_report.or(self.error_report),
            output: overrides.output.or(self.output),
        }
    }

    pub fn data_path(&self) -> CliResult<&Path> {
        self.data.as_deref().ok_or_else(|| {
            CliError::InvalidConfig("no data file given (pass a path or set `data`)".to_string())
        })
    }

    pub fn decode_options(&self) -> CliResult<DecodeOptions> {
        let options = DecodeOptions::default();
        match self.delimiter {
            Some(delimiter) => options
                .with_delimiter(delimiter)
                .map_err(|e| CliError::InvalidConfig(e.to_string())),
            None => Ok(options),
        }
    }
}
