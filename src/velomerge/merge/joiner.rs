//! Streaming join of the primary dataset against a `LookupTable`

use super::lookup::LookupTable;
use super::schema::OutputSchema;
use crate::velomerge::datasource::traits::{RecordReader, RecordWriter};
use crate::velomerge::error::{MergeError, MergeResult};
use log::{debug, info, trace, warn};

const PROGRESS_LOG_INTERVAL: u64 = 100_000;

/// Lifecycle of a `StreamingJoiner`
///
/// `NotStarted → SchemaWritten → Streaming → Completed`. An empty primary
/// source goes straight from `SchemaWritten` to `Completed`. `Failed` and
/// `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinState {
    NotStarted,
    SchemaWritten,
    Streaming,
    Completed,
    Failed,
}

impl JoinState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JoinState::Completed | JoinState::Failed)
    }
}

/// Counters reported after a join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Rows read from the primary source and written to the sink
    pub rows: u64,
    /// Rows whose identifier was found in the lookup table
    pub matched: u64,
    /// Rows that got empty auxiliary values
    pub unmatched: u64,
}

/// Streams primary records through the lookup table into a writer
///
/// Output row N always corresponds to input row N; each row is written
/// before the next one is read.
pub struct StreamingJoiner {
    key_column: String,
    lookup: LookupTable,
    state: JoinState,
    stats: JoinStats,
    schema: Option<OutputSchema>,
}

impl StreamingJoiner {
    /// `key_column` names the identifier column in the primary source
    pub fn new(key_column: impl Into<String>, lookup: LookupTable) -> Self {
        Self {
            key_column: key_column.into(),
            lookup,
            state: JoinState::NotStarted,
            stats: JoinStats::default(),
            schema: None,
        }
    }

    pub fn state(&self) -> JoinState {
        self.state
    }

    pub fn stats(&self) -> JoinStats {
        self.stats
    }

    pub fn schema(&self) -> Option<&OutputSchema> {
        self.schema.as_ref()
    }

    /// Run the join to completion
    ///
    /// The writer is finalized on every exit path. When both the join and
    /// the finalize fail, the join error is returned.
    pub async fn run(
        &mut self,
        reader: &mut dyn RecordReader,
        writer: &mut dyn RecordWriter,
    ) -> MergeResult<JoinStats> {
        if self.state != JoinState::NotStarted {
            return Err(MergeError::InvalidState {
                message: format!("joiner cannot run from state {:?}", self.state),
            });
        }

        let streamed = self.stream(reader, writer).await;
        let finalized = writer.finalize().await;

        match (streamed, finalized) {
            (Ok(()), Ok(())) => {
                self.state = JoinState::Completed;
                info!(
                    "Successfully merged {} rows ({} matched, {} unmatched)",
                    self.stats.rows, self.stats.matched, self.stats.unmatched
                );
                Ok(self.stats)
            }
            (Ok(()), Err(e)) => {
                self.state = JoinState::Failed;
                Err(e)
            }
            (Err(e), finalized) => {
                if let Err(finalize_err) = finalized {
                    warn!(
                        "Failed to finalize '{}' after error: {}",
                        writer.name(),
                        finalize_err
                    );
                }
                debug!(
                    "Join aborted in state {:?} after {} rows",
                    self.state, self.stats.rows
                );
                self.state = JoinState::Failed;
                Err(e)
            }
        }
    }

    async fn stream(
        &mut self,
        reader: &mut dyn RecordReader,
        writer: &mut dyn RecordWriter,
    ) -> MergeResult<()> {
        let primary_columns = reader.fetch_columns().await?;
        if !primary_columns.iter().any(|c| *c == self.key_column) {
            warn!(
                "Primary source '{}' has no '{}' column in its header",
                reader.name(),
                self.key_column
            );
        }

        let schema = OutputSchema::derive(&primary_columns, self.lookup.fields());
        writer.write_schema(schema.columns()).await?;
        self.state = JoinState::SchemaWritten;
        let schema = self.schema.insert(schema);

        while let Some(record) = reader.read().await? {
            self.state = JoinState::Streaming;

            let identifier = record.get(&self.key_column).ok_or_else(|| {
                MergeError::malformed(reader.name(), record.offset, &self.key_column)
            })?;

            let auxiliary = self.lookup.get(identifier);
            match auxiliary {
                Some(_) => self.stats.matched += 1,
                None => {
                    trace!("No auxiliary record for '{}'", identifier.trim());
                    self.stats.unmatched += 1;
                }
            }

            let row = schema.project(&record, auxiliary);
            writer.write(&row).await?;
            self.stats.rows += 1;

            if self.stats.rows % PROGRESS_LOG_INTERVAL == 0 {
                debug!("Merged {} rows so far", self.stats.rows);
            }
        }
        Ok(())
    }
}
