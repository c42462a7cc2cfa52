pub mod config;
pub mod datasource;
pub mod error;
pub mod merge;

pub use error::{MergeError, MergeResult};
