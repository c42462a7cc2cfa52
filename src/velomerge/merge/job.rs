//! End-to-end merge driven by a `MergeConfig`

use super::joiner::{JoinStats, StreamingJoiner};
use super::lookup::{LookupBuilder, LookupStats};
use crate::velomerge::config::{ConfigError, MergeConfig};
use crate::velomerge::datasource::file::{FileDataSink, FileDataSource};
use crate::velomerge::error::MergeResult;
use log::info;
use std::time::{Duration, Instant};

/// What a finished merge reports back to its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Distinct identifiers loaded from the auxiliary source
    pub lookup_keys: usize,
    pub lookup: LookupStats,
    pub join: JoinStats,
    /// Output path, or `-` for stdout
    pub output: String,
    pub elapsed: Duration,
}

impl MergeSummary {
    /// Total rows written, same as the number of primary rows read
    pub fn rows(&self) -> u64 {
        self.join.rows
    }
}

/// Loads the auxiliary file, then streams the primary file into the output
pub struct MergeJob {
    config: MergeConfig,
}

impl MergeJob {
    pub fn new(config: MergeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Run the merge
    ///
    /// The auxiliary file is fully loaded before the primary file is opened,
    /// and the output is only created once the primary file could be opened.
    pub async fn run(&self) -> MergeResult<MergeSummary> {
        let started = Instant::now();
        let config = &self.config;

        let mut auxiliary = FileDataSource::new(config.auxiliary.clone())
            .create_reader()
            .await?;
        let lookup = LookupBuilder::new(&config.key_column, config.auxiliary_fields.clone())
            .build(auxiliary.as_mut())
            .await?;
        drop(auxiliary);

        let lookup_keys = lookup.len();
        let lookup_stats = lookup.stats();

        let mut primary = FileDataSource::new(config.primary.clone())
            .create_reader()
            .await?;
        let mut writer = FileDataSink::new(config.output.clone())
            .create_writer()
            .await?;

        let mut joiner = StreamingJoiner::new(config.primary_key(), lookup);
        let join = joiner.run(primary.as_mut(), writer.as_mut()).await?;

        if !config.output.is_stdout() {
            info!("Output saved to: {}", config.output.path);
        }

        Ok(MergeSummary {
            lookup_keys,
            lookup: lookup_stats,
            join,
            output: config.output.path.clone(),
            elapsed: started.elapsed(),
        })
    }
}
