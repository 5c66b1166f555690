use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::inference::infer_schema;
use crate::schemas::Schema;

/// One decoded row: column name to raw cell text.
///
/// A decoder supplies a key for every header it saw. A schema field naming a
/// key that is not here is a missing column, not an empty value.
pub type Record = HashMap<String, String>;

/// Non-fatal problem reported by a decoder. The engine passes these through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeWarning {
    /// 1-based line in the source text, when known
    pub line: Option<u64>,
    pub message: String,
}

impl DecodeWarning {
    pub fn new(line: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Decoded rows sharing one ordered column set.
///
/// Row `i` in `rows` is reported as row `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub warnings: Vec<DecodeWarning>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self {
            columns,
            rows,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<DecodeWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record at a 1-based row index
    pub fn row(&self, row_index: usize) -> Option<&Record> {
        row_index.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// Best-effort schema guessed from the first record
    pub fn infer_schema(&self) -> Schema {
        infer_schema(self.rows.first(), &self.columns)
    }
}
