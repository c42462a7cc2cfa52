//! Output column layout

use crate::velomerge::datasource::types::Record;
use log::warn;

/// Where an output column takes its value from
#[derive(Debug, Clone, PartialEq, Eq)]
enum ColumnSource {
    /// Position of the column in the primary header
    Primary(usize),
    Auxiliary(usize),
}

/// Ordered output columns: primary columns first, auxiliary fields appended
///
/// A primary column that shares its name with an auxiliary field keeps its
/// position but is filled from the auxiliary value; the name is not repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    columns: Vec<String>,
    sources: Vec<ColumnSource>,
    primary_width: usize,
}

impl OutputSchema {
    pub fn derive(primary_columns: &[String], auxiliary_fields: &[String]) -> Self {
        let auxiliary_index =
            |name: &str| auxiliary_fields.iter().position(|field| field == name);

        let mut columns = Vec::with_capacity(primary_columns.len() + auxiliary_fields.len());
        let mut sources = Vec::with_capacity(columns.capacity());

        for (position, column) in primary_columns.iter().enumerate() {
            match auxiliary_index(column) {
                Some(index) => {
                    warn!(
                        "Primary column '{}' is also an auxiliary field; auxiliary values replace it",
                        column
                    );
                    sources.push(ColumnSource::Auxiliary(index));
                }
                None => sources.push(ColumnSource::Primary(position)),
            }
            columns.push(column.clone());
        }
        let primary_width = columns.len();

        for (index, field) in auxiliary_fields.iter().enumerate() {
            if primary_columns.contains(field) {
                continue;
            }
            columns.push(field.clone());
            sources.push(ColumnSource::Auxiliary(index));
        }

        Self {
            columns,
            sources,
            primary_width,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of leading columns that came from the primary source
    pub fn primary_width(&self) -> usize {
        self.primary_width
    }

    /// Lay out one output row
    ///
    /// `auxiliary` is the matched lookup entry, or `None` on a miss. Every
    /// schema column gets a value; anything missing becomes `""`. Records
    /// whose fields follow the header order are projected by position.
    pub fn project(&self, record: &Record, auxiliary: Option<&[String]>) -> Vec<String> {
        self.columns
            .iter()
            .zip(&self.sources)
            .map(|(column, source)| match source {
                ColumnSource::Primary(position) => match record.field_at(*position) {
                    Some((name, value)) if name == column => value.to_string(),
                    _ => record.get_or_empty(column).to_string(),
                },
                ColumnSource::Auxiliary(index) => auxiliary
                    .and_then(|values| values.get(*index))
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    }
}
