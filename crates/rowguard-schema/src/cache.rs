/*!
# Report Cache

Validation is pure, so a caller that re-validates on every schema edit can
reuse the previous report whenever neither input changed. Change is detected
through an explicit [`ReportKey`] built from content fingerprints, never by
tracking mutations.
*/

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::dataset::Dataset;
use crate::report::{build_report, ValidationReport};
use crate::schemas::Schema;

fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Hex SHA-256 of the schema's interchange form
pub fn schema_fingerprint(schema: &Schema) -> String {
    let mut hasher = Sha256::new();
    update_str(&mut hasher, &schema.to_json_value().to_string());
    hex::encode(hasher.finalize())
}

/// Hex SHA-256 over columns and every cell of every row.
///
/// Cells are hashed in sorted key order so the fingerprint does not depend
/// on map iteration order. Decode warnings are not part of the fingerprint.
pub fn dataset_fingerprint(dataset: &Dataset) -> String {
    let mut hasher = Sha256::new();

    hasher.update((dataset.columns.len() as u64).to_le_bytes());
    for column in &dataset.columns {
        update_str(&mut hasher, column);
    }

    hasher.update((dataset.rows.len() as u64).to_le_bytes());
    for record in &dataset.rows {
        let mut cells: Vec<(&String, &String)> = record.iter().collect();
        cells.sort();

        hasher.update((cells.len() as u64).to_le_bytes());
        for (key, value) in cells {
            update_str(&mut hasher, key);
            update_str(&mut hasher, value);
        }
    }

    hex::encode(hasher.finalize())
}

/// Identity of one (schema, dataset) validation input pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportKey {
    pub schema: String,
    pub dataset: String,
}

impl ReportKey {
    pub fn new(dataset: &Dataset, schema: &Schema) -> Self {
        Self {
            schema: schema_fingerprint(schema),
            dataset: dataset_fingerprint(dataset),
        }
    }
}

/// Holds the most recent report and the key it was built for.
#[derive(Debug, Default)]
pub struct ReportCache {
    entry: Option<(ReportKey, ValidationReport)>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached report, if it was built for exactly `key`
    pub fn get(&self, key: &ReportKey) -> Option<&ValidationReport> {
        self.entry
            .as_ref()
            .filter(|(cached, _)| cached == key)
            .map(|(_, report)| report)
    }

    /// Return the cached report for `key`, rebuilding it on a key mismatch.
    ///
    /// The caller vouches that `key` describes `dataset` and `schema`.
    pub fn get_or_build_with_key(
        &mut self,
        key: ReportKey,
        dataset: &Dataset,
        schema: &Schema,
    ) -> &ValidationReport {
        if self
            .entry
            .as_ref()
            .is_some_and(|(cached, _)| *cached != key)
        {
            self.entry = None;
        }

        if self.entry.is_some() {
            debug!(schema = %key.schema, "report cache hit");
        }

        let (_, report) = self.entry.get_or_insert_with(|| {
            debug!(schema = %key.schema, dataset = %key.dataset, "report cache miss");
            let report = build_report(dataset, schema);
            (key, report)
        });
        report
    }

    /// Fingerprint both inputs, then behave like [`Self::get_or_build_with_key`].
    pub fn get_or_build(&mut self, dataset: &Dataset, schema: &Schema) -> &ValidationReport {
        let key = ReportKey::new(dataset, schema);
        self.get_or_build_with_key(key, dataset, schema)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::schemas::{FieldDefinition, FieldType};

    fn dataset(age: &str) -> Dataset {
        let mut row = Record::new();
        row.insert("age".to_string(), age.to_string());
        row.insert("name".to_string(), "Ada".to_string());
        Dataset::new(vec!["name".to_string(), "age".to_string()], vec![row])
    }

    fn schema(field_type: FieldType) -> Schema {
        Schema::new(vec![FieldDefinition::new("age", field_type)])
    }

    #[test]
    fn test_fingerprints_are_stable_and_sensitive() {
        assert_eq!(dataset_fingerprint(&dataset("1")), dataset_fingerprint(&dataset("1")));
        assert_ne!(dataset_fingerprint(&dataset("1")), dataset_fingerprint(&dataset("2")));
        assert_eq!(
            schema_fingerprint(&schema(FieldType::Number)),
            schema_fingerprint(&schema(FieldType::Number))
        );
        assert_ne!(
            schema_fingerprint(&schema(FieldType::Number)),
            schema_fingerprint(&schema(FieldType::Date))
        );
        assert_eq!(schema_fingerprint(&Schema::default()).len(), 64);
    }

    #[test]
    fn test_cache_rebuilds_on_key_change() {
        let mut cache = ReportCache::new();
        let data = dataset("x");

        let number_key = ReportKey::new(&data, &schema(FieldType::Number));
        assert!(cache.get(&number_key).is_none());

        let report = cache.get_or_build(&data, &schema(FieldType::Number)).clone();
        assert!(report.has_errors);
        assert_eq!(cache.get(&number_key), Some(&report));

        let report = cache.get_or_build(&data, &schema(FieldType::String)).clone();
        assert!(!report.has_errors);
        assert!(cache.get(&number_key).is_none());

        cache.clear();
        let string_key = ReportKey::new(&data, &schema(FieldType::String));
        assert!(cache.get(&string_key).is_none());
    }

    #[test]
    fn test_cache_hit_returns_stored_report() {
        let mut cache = ReportCache::new();
        let data = dataset("7");
        let key = ReportKey::new(&data, &schema(FieldType::Number));

        let first = cache
            .get_or_build_with_key(key.clone(), &data, &schema(FieldType::Number))
            .clone();
        let second = cache
            .get_or_build_with_key(key, &data, &schema(FieldType::Number))
            .clone();
        assert_eq!(first, second);
    }
}
