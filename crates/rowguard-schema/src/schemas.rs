/*!
# Field Schemas

A schema is an ordered list of field definitions. The interchange format is a
JSON array of `{"name", "type", "required"}` objects, used both on disk and
while a schema is being authored.

Schemas coming from users are untrusted, so they go through [`normalize`],
which never fails: anything it cannot make sense of degrades to "no
constraint". Authoring mistakes are reported separately by [`check_schema`].
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

// ================================================================================================
// Field Types
// ================================================================================================

/// The declared type of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Currency,
    Boolean,
    Date,
    Email,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Currency,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Email,
    ];

    /// Token used in the JSON interchange format
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Email => "email",
        }
    }

    /// Exact token match; anything else is not a known type.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ================================================================================================
// Field Definitions
// ================================================================================================

/// One expected column: its name, type and whether a value is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Ordered sequence of field definitions.
///
/// Order only affects the order of reported messages; every field is
/// checked independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldDefinition>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDefinition> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field with the given name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn to_json_value(&self) -> Value {
        Value::Array(
            self.fields
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "name": f.name,
                        "type": f.field_type.as_str(),
                        "required": f.required,
                    })
                })
                .collect(),
        )
    }

    /// Pretty JSON in the interchange format
    pub fn to_json_string_pretty(&self) -> String {
        // Serializing a `Value` tree with string keys cannot fail.
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_else(|_| "[]".to_string())
    }
}

impl FromIterator<FieldDefinition> for Schema {
    fn from_iter<I: IntoIterator<Item = FieldDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// ================================================================================================
// Normalization
// ================================================================================================

/// Repair an arbitrary decoded JSON value into a schema.
///
/// Non-array input yields an empty schema. Each element is coerced on its
/// own: `name` is stringified and trimmed, unknown `type` tokens fall back to
/// [`FieldType::String`], and `required` follows JavaScript truthiness.
pub fn normalize(candidate: &Value) -> Schema {
    let Some(elements) = candidate.as_array() else {
        return Schema::default();
    };

    elements
        .iter()
        .map(|element| FieldDefinition {
            name: stringify_name(element.get("name")),
            field_type: element
                .get("type")
                .and_then(Value::as_str)
                .and_then(FieldType::from_token)
                .unwrap_or_default(),
            required: is_truthy(element.get("required")),
        })
        .collect()
}

fn stringify_name(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

// ================================================================================================
// Schema Self-Check
// ================================================================================================

/// Authoring problem found in a schema definition itself.
///
/// Positions are 1-based indices into the schema array.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    #[error("Schema is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Schema must be a JSON array of field definitions")]
    NotAnArray,

    #[error("Field {position}: name is empty")]
    EmptyName { position: usize },

    #[error("Field {position}: duplicate name \"{name}\"")]
    DuplicateName { position: usize, name: String },

    #[error("Field {position} (\"{name}\"): invalid type {token}, treated as string")]
    InvalidType {
        position: usize,
        name: String,
        token: String,
    },
}

const MISSING_TYPE_TOKEN: &str = "<missing>";

/// Report authoring problems in a raw schema candidate.
///
/// The first occurrence of a name is fine; every later occurrence is a
/// duplicate. Nothing is fixed here.
pub fn check_schema(candidate: &Value) -> Vec<SchemaIssue> {
    let Some(elements) = candidate.as_array() else {
        return vec![SchemaIssue::NotAnArray];
    };

    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (i, element) in elements.iter().enumerate() {
        let position = i + 1;
        let name = stringify_name(element.get("name"));

        if name.is_empty() {
            issues.push(SchemaIssue::EmptyName { position });
        } else if !seen.insert(name.clone()) {
            issues.push(SchemaIssue::DuplicateName {
                position,
                name: name.clone(),
            });
        }

        let token = match element.get("type") {
            None => Some(MISSING_TYPE_TOKEN.to_string()),
            Some(Value::String(s)) if FieldType::from_token(s).is_some() => None,
            Some(other) => Some(other.to_string()),
        };
        if let Some(token) = token {
            issues.push(SchemaIssue::InvalidType {
                position,
                name,
                token,
            });
        }
    }

    issues
}

/// A normalized schema plus the authoring issues found while reading it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSchema {
    pub schema: Schema,
    pub issues: Vec<SchemaIssue>,
}

impl ParsedSchema {
    pub fn from_value(candidate: &Value) -> Self {
        Self {
            schema: normalize(candidate),
            issues: check_schema(candidate),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Parse schema text as typed by a user.
///
/// Blank text is an empty schema. Malformed JSON also yields an empty
/// schema, with an [`SchemaIssue::InvalidJson`] issue attached.
pub fn parse_schema_text(text: &str) -> ParsedSchema {
    if text.trim().is_empty() {
        return ParsedSchema::default();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => ParsedSchema::from_value(&value),
        Err(e) => ParsedSchema {
            schema: Schema::default(),
            issues: vec![SchemaIssue::InvalidJson {
                message: e.to_string(),
            }],
        },
    }
}

// ================================================================================================
// Tests
// ================================================================================================
