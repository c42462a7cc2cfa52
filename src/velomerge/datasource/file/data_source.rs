//! File Data Source Implementation

use crate::velomerge::datasource::traits::RecordReader;
use crate::velomerge::error::{MergeError, MergeResult};
use std::io;

use super::config::FileSourceConfig;
use super::reader::FileReader;

/// Factory for readers over a single CSV file
pub struct FileDataSource {
    config: FileSourceConfig,
}

impl FileDataSource {
    pub fn new(config: FileSourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FileSourceConfig {
        &self.config
    }

    /// Open a fresh reader positioned before the first record
    ///
    /// Readers are forward-only; call this again to restart from the top.
    pub async fn create_reader(&self) -> MergeResult<Box<dyn RecordReader>> {
        self.config.validate().map_err(|msg| {
            MergeError::source_unavailable(
                self.config.path.clone(),
                io::Error::new(io::ErrorKind::InvalidInput, msg),
            )
        })?;
        let reader = FileReader::new(self.config.clone()).await?;
        Ok(Box::new(reader))
    }
}
