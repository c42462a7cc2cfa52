//! Record source and sink abstraction traits
//!
//! The merge core only talks to these traits; concrete adapters (CSV files,
//! stdout, in-memory buffers) live next to them in this module tree.

use super::types::Record;
use crate::velomerge::error::MergeResult;
use async_trait::async_trait;

/// Pull-based, forward-only reader over a finite sequence of records
#[async_trait]
pub trait RecordReader: Send {
    /// Column names in source order
    ///
    /// Available before the first record is read. Readers without a header
    /// return whatever names they assign to positional columns.
    async fn fetch_columns(&mut self) -> MergeResult<Vec<String>>;

    /// Read the next record, or `None` once the source is exhausted
    async fn read(&mut self) -> MergeResult<Option<Record>>;

    /// Name used in log lines and error messages
    fn name(&self) -> &str;
}

/// Ordered writer: one schema, then any number of rows in schema order
#[async_trait]
pub trait RecordWriter: Send {
    /// Write the column header. Called once, before any row.
    async fn write_schema(&mut self, columns: &[String]) -> MergeResult<()>;

    /// Write one row whose values line up with the schema columns
    async fn write(&mut self, values: &[String]) -> MergeResult<()>;

    /// Flush buffered writes and release the underlying resource
    ///
    /// Must be safe to call more than once; calls after the first are no-ops.
    async fn finalize(&mut self) -> MergeResult<()>;

    /// Name used in log lines and error messages
    fn name(&self) -> &str;

    /// Number of data rows accepted so far
    fn records_written(&self) -> u64;
}
