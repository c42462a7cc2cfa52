//! Key-based enrichment of a primary dataset
//!
//! Two passes, strictly in order:
//!
//! 1. [`LookupBuilder`] reads the whole auxiliary dataset into a
//!    [`LookupTable`] (identifier → auxiliary values).
//! 2. [`StreamingJoiner`] reads the primary dataset one record at a time,
//!    appends the looked-up values (or empty strings on a miss) and writes
//!    each row before reading the next.
//!
//! ```rust
//! use velomerge::velomerge::datasource::{MemoryReader, MemoryWriter};
//! use velomerge::velomerge::merge::{build_lookup, stream_join};
//!
//! # tokio_test_block_on(async {
//! let mut aux = MemoryReader::from_rows("aux", &["sku", "img"], &[&["A", "u1"]]);
//! let lookup = build_lookup(&mut aux, "sku", vec!["img".to_string()]).await.unwrap();
//!
//! let mut primary = MemoryReader::from_rows("primary", &["sku", "color"], &[&["A", "red"]]);
//! let mut out = MemoryWriter::new("out");
//! let rows = stream_join(&mut primary, "sku", lookup, &mut out).await.unwrap();
//!
//! assert_eq!(rows, 1);
//! assert_eq!(out.rows()[0], vec!["A", "red", "u1"]);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod job;
pub mod joiner;
pub mod lookup;
pub mod schema;

pub use job::{MergeJob, MergeSummary};
pub use joiner::{JoinState, JoinStats, StreamingJoiner};
pub use lookup::{LookupBuilder, LookupStats, LookupTable};
pub use schema::OutputSchema;

use crate::velomerge::datasource::traits::{RecordReader, RecordWriter};
use crate::velomerge::error::MergeResult;

/// Read every auxiliary record into a lookup table keyed by `key_column`
pub async fn build_lookup(
    reader: &mut dyn RecordReader,
    key_column: &str,
    fields: Vec<String>,
) -> MergeResult<LookupTable> {
    LookupBuilder::new(key_column, fields).build(reader).await
}

/// Join `reader` against `lookup` into `writer`, returning the row count
///
/// `writer` is finalized whether or not the join succeeds.
pub async fn stream_join(
    reader: &mut dyn RecordReader,
    key_column: &str,
    lookup: LookupTable,
    writer: &mut dyn RecordWriter,
) -> MergeResult<u64> {
    let mut joiner = StreamingJoiner::new(key_column, lookup);
    let stats = joiner.run(reader, writer).await?;
    Ok(stats.rows)
}
