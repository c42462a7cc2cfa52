//! Record type shared by every reader and writer

/// A single row: ordered `(column, value)` pairs plus its row number
///
/// Lookups distinguish an absent column (`get` returns `None`) from an empty
/// one (`Some("")`). Writers that need a value for every column use
/// `get_or_empty`, which treats both as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
    /// 1-based data row number within its source (header excluded)
    pub offset: u64,
}

impl Record {
    pub fn new(offset: u64) -> Self {
        Self {
            fields: Vec::new(),
            offset,
        }
    }

    pub fn with_capacity(offset: u64, capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            offset,
        }
    }

    /// Build a record from `(column, value)` pairs, keeping their order
    pub fn from_pairs<I, K, V>(offset: u64, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new(offset);
        for (k, v) in pairs {
            record.set(k, v);
        }
        record
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Overwrite the value of `column`, or append it if not present
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Append `column` without checking for an existing entry
    ///
    /// Callers guarantee the column is not already present.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.push((column.into(), value.into()));
    }

    /// Column name and value at `index`, in insertion order
    pub fn field_at(&self, index: usize) -> Option<(&str, &str)> {
        self.fields
            .get(index)
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Project this record onto `columns`, filling gaps with empty strings
    pub fn project(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .enumerate()
            .map(|(position, column)| match self.field_at(position) {
                Some((name, value)) if name == column => value.to_string(),
                _ => self.get_or_empty(column).to_string(),
            })
            .collect()
    }
}
