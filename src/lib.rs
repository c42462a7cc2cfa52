//! # velomerge
//!
//! Streaming enrichment of tabular data: load a lookup table from an
//! auxiliary dataset, then stream a primary dataset through it, appending the
//! looked-up columns to every row while keeping the original column order.
//!
//! ## Features
//!
//! - **Bounded memory**: only the auxiliary dataset is held in memory; primary
//!   rows are written as soon as they are joined
//! - **Order preserving**: output row N is always input row N
//! - **Pluggable I/O**: the join talks to `RecordReader` / `RecordWriter`
//!   traits, with CSV file, stdout and in-memory implementations included
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use velomerge::velomerge::config::MergeConfig;
//! use velomerge::velomerge::merge::MergeJob;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = MergeConfig::default();
//!     config.auxiliary.path = "source.csv".to_string();
//!     config.primary.path = "target.csv".to_string();
//!     config.output.path = "merged_output.csv".to_string();
//!
//!     let summary = MergeJob::new(config)?.run().await?;
//!     println!("Merged {} rows", summary.rows());
//!     Ok(())
//! }
//! ```

pub mod velomerge;

pub use velomerge::config::{ConfigError, MergeConfig};
pub use velomerge::datasource::{Record, RecordReader, RecordWriter};
pub use velomerge::error::{MergeError, MergeResult};
pub use velomerge::merge::{
    build_lookup, stream_join, JoinState, JoinStats, LookupBuilder, LookupTable, MergeJob,
    MergeSummary, OutputSchema, StreamingJoiner,
};
