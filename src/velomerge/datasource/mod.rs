//! Record sources and sinks
//!
//! The merge core reads through [`RecordReader`] and writes through
//! [`RecordWriter`]; nothing in it knows about files or CSV.
//!
//! - **traits**: the reader/writer contracts
//! - **types**: the `Record` row type
//! - **file**: CSV file reader and writer
//! - **stdout_writer**: CSV to standard output
//! - **memory**: in-memory reader and writer

pub mod file;
pub mod memory;
pub mod stdout_writer;
pub mod traits;
pub mod types;

pub use memory::{MemoryReader, MemoryWriter};
pub use stdout_writer::StdoutWriter;
pub use traits::{RecordReader, RecordWriter};
pub use types::Record;
