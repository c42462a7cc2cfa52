//! In-memory reader and writer
//!
//! Used by library callers that already hold their rows in memory, and by
//! tests that need to observe exactly what the joiner emitted.

use super::traits::{RecordReader, RecordWriter};
use super::types::Record;
use crate::velomerge::error::{MergeError, MergeResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;

/// Reader over a fixed list of records
pub struct MemoryReader {
    name: String,
    columns: Vec<String>,
    records: VecDeque<Record>,
}

impl MemoryReader {
    pub fn new(name: impl Into<String>, columns: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            columns,
            records: records.into(),
        }
    }

    /// Build a reader from a header and positional rows
    ///
    /// Rows shorter than the header simply lack the trailing columns.
    pub fn from_rows(name: impl Into<String>, columns: &[&str], rows: &[&[&str]]) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Record::from_pairs(
                    i as u64 + 1,
                    columns.iter().cloned().zip(row.iter().map(|v| v.to_string())),
                )
            })
            .collect();
        Self::new(name, columns, records)
    }

    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl RecordReader for MemoryReader {
    async fn fetch_columns(&mut self) -> MergeResult<Vec<String>> {
        Ok(self.columns.clone())
    }

    async fn read(&mut self) -> MergeResult<Option<Record>> {
        Ok(self.records.pop_front())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Writer that keeps everything it receives
#[derive(Default)]
pub struct MemoryWriter {
    name: String,
    schema: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    finalize_calls: usize,
    finalized: bool,
    fail_after: Option<u64>,
}

impl MemoryWriter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Reject every write once `rows` rows have been accepted
    pub fn failing_after(mut self, rows: u64) -> Self {
        self.fail_after = Some(rows);
        self
    }

    pub fn schema(&self) -> Option<&[String]> {
        self.schema.as_deref()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Rows as column → value pairs, for assertions that read better by name
    pub fn records(&self) -> Vec<Record> {
        let columns = self.schema.clone().unwrap_or_default();
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Record::from_pairs(i as u64 + 1, columns.iter().cloned().zip(row.iter().cloned()))
            })
            .collect()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn finalize_calls(&self) -> usize {
        self.finalize_calls
    }

    fn ensure_open(&self) -> MergeResult<()> {
        if self.finalized {
            return Err(MergeError::sink_unavailable(
                self.name.clone(),
                io::Error::new(io::ErrorKind::BrokenPipe, "writer already finalized"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordWriter for MemoryWriter {
    async fn write_schema(&mut self, columns: &[String]) -> MergeResult<()> {
        self.ensure_open()?;
        if self.schema.is_some() {
            return Err(MergeError::InvalidState {
                message: format!("schema already written to '{}'", self.name),
            });
        }
        self.schema = Some(columns.to_vec());
        Ok(())
    }

    async fn write(&mut self, values: &[String]) -> MergeResult<()> {
        self.ensure_open()?;
        if let Some(limit) = self.fail_after {
            if self.rows.len() as u64 >= limit {
                return Err(MergeError::sink_unavailable(
                    self.name.clone(),
                    io::Error::other("no space left on device"),
                ));
            }
        }
        self.rows.push(values.to_vec());
        Ok(())
    }

    async fn finalize(&mut self) -> MergeResult<()> {
        self.finalize_calls += 1;
        self.finalized = true;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn records_written(&self) -> u64 {
        self.rows.len() as u64
    }
}
