//! Lookup table construction from the auxiliary dataset

use crate::velomerge::datasource::traits::RecordReader;
use crate::velomerge::datasource::types::Record;
use crate::velomerge::error::{MergeError, MergeResult};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Counters collected while building a `LookupTable`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// Auxiliary rows consumed
    pub rows_read: u64,
    /// Rows whose identifier had already been seen and overwrote an entry
    pub duplicate_keys: u64,
}

/// Identifier → auxiliary values, read-only once built
///
/// The whole auxiliary dataset is held in memory: one entry per distinct
/// identifier, each holding one string per auxiliary field. Inputs too large
/// to fit in memory are not supported.
#[derive(Debug, Clone)]
pub struct LookupTable {
    key_column: String,
    fields: Arc<[String]>,
    entries: HashMap<String, Box<[String]>>,
    stats: LookupStats,
}

impl LookupTable {
    /// Values for `identifier`, positionally aligned with `fields()`
    ///
    /// The identifier is trimmed before the lookup, so `" SKU1 "` and
    /// `"SKU1"` find the same entry. Matching is case-sensitive.
    pub fn get(&self, identifier: &str) -> Option<&[String]> {
        self.entries.get(identifier.trim()).map(|values| &values[..])
    }

    /// Value of a single auxiliary field for `identifier`
    pub fn get_field(&self, identifier: &str, field: &str) -> Option<&str> {
        let index = self.fields.iter().position(|f| f == field)?;
        self.get(identifier).map(|values| values[index].as_str())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier.trim())
    }

    /// Number of distinct identifiers stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn stats(&self) -> LookupStats {
        self.stats
    }
}

/// Builds a `LookupTable` in one pass over the auxiliary rows
///
/// Later rows overwrite earlier rows with the same identifier, silently.
pub struct LookupBuilder {
    table: LookupTable,
    source_name: String,
}

impl LookupBuilder {
    pub fn new(key_column: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            table: LookupTable {
                key_column: key_column.into(),
                fields: fields.into(),
                entries: HashMap::new(),
                stats: LookupStats::default(),
            },
            source_name: "<auxiliary>".to_string(),
        }
    }

    /// Name reported in `MalformedRecord` errors raised by `push`
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    /// Add one auxiliary row
    pub fn push(&mut self, record: &Record) -> MergeResult<()> {
        let table = &mut self.table;
        let identifier = record.get(&table.key_column).ok_or_else(|| {
            MergeError::malformed(self.source_name.clone(), record.offset, &table.key_column)
        })?;

        let values: Box<[String]> = table
            .fields
            .iter()
            .map(|field| record.get_or_empty(field).to_string())
            .collect();

        table.stats.rows_read += 1;
        if table
            .entries
            .insert(identifier.trim().to_string(), values)
            .is_some()
        {
            table.stats.duplicate_keys += 1;
        }
        Ok(())
    }

    pub fn finish(self) -> LookupTable {
        self.table
    }

    /// Consume `reader` to the end and return the populated table
    pub async fn build(mut self, reader: &mut dyn RecordReader) -> MergeResult<LookupTable> {
        self.source_name = reader.name().to_string();

        let columns = reader.fetch_columns().await?;
        for field in self.table.fields.iter() {
            if !columns.iter().any(|c| c == field) {
                warn!(
                    "Auxiliary source '{}' has no '{}' column; every value will be empty",
                    self.source_name, field
                );
            }
        }

        while let Some(record) = reader.read().await? {
            self.push(&record)?;
        }

        let table = self.finish();
        if table.stats.duplicate_keys > 0 {
            debug!(
                "Auxiliary source '{}': {} rows overwrote an earlier identifier",
                reader.name(),
                table.stats.duplicate_keys
            );
        }
        info!(
            "Loaded {} {} records from {}",
            table.len(),
            table.key_column,
            reader.name()
        );
        Ok(table)
    }
}
