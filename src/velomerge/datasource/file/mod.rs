//! CSV file adapters for the merge pipeline
//!
//! - **FileReader**: streams a CSV file one record at a time
//! - **FileWriter**: buffered CSV output with explicit finalize
//! - **FileDataSource / FileDataSink**: factories built from configuration
//!
//! ```rust,no_run
//! use velomerge::velomerge::datasource::file::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let source = FileDataSource::new(FileSourceConfig::new("target.csv"));
//!     let mut reader = source.create_reader().await?;
//!
//!     while let Some(record) = reader.read().await? {
//!         println!("Record: {:?}", record);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data_sink;
pub mod data_source;
pub mod reader;

pub use config::{FileSinkConfig, FileSourceConfig, STDOUT_PATH};
pub use data_sink::{FileDataSink, FileWriter};
pub use data_source::FileDataSource;
pub use reader::FileReader;
