//! CSV writer for standard output

use super::file::config::FileSinkConfig;
use super::file::data_sink::CsvRowEncoder;
use super::traits::RecordWriter;
use crate::velomerge::error::{MergeError, MergeResult};
use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncWriteExt, Stdout};

const STDOUT_NAME: &str = "<stdout>";

/// Writes CSV rows to the process's standard output
pub struct StdoutWriter {
    stdout: Option<Stdout>,
    encoder: CsvRowEncoder,
    buffer_size: usize,
    write_header: bool,
    schema_written: bool,
    records_written: u64,
}

impl StdoutWriter {
    pub fn new(config: &FileSinkConfig) -> Self {
        let buffer_size = config.buffer_size_bytes as usize;
        Self {
            stdout: Some(tokio::io::stdout()),
            encoder: CsvRowEncoder::new(config.csv_delimiter, buffer_size),
            buffer_size,
            write_header: config.csv_has_header,
            schema_written: false,
            records_written: 0,
        }
    }

    async fn flush_buffer(&mut self) -> MergeResult<()> {
        if self.encoder.buffered_len() == 0 {
            return Ok(());
        }
        let data = self
            .encoder
            .drain()
            .map_err(|e| MergeError::sink_unavailable(STDOUT_NAME, e))?;
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(closed_error());
        };
        stdout
            .write_all(&data)
            .await
            .map_err(|e| MergeError::sink_unavailable(STDOUT_NAME, e))
    }

    async fn encode_row(&mut self, values: &[String]) -> MergeResult<()> {
        if self.stdout.is_none() {
            return Err(closed_error());
        }
        self.encoder
            .encode(values)
            .map_err(|e| MergeError::sink_unavailable(STDOUT_NAME, e))?;
        if self.encoder.buffered_len() >= self.buffer_size {
            self.flush_buffer().await?;
        }
        Ok(())
    }
}

fn closed_error() -> MergeError {
    MergeError::sink_unavailable(
        STDOUT_NAME,
        io::Error::new(io::ErrorKind::BrokenPipe, "writer already finalized"),
    )
}

#[async_trait]
impl RecordWriter for StdoutWriter {
    async fn write_schema(&mut self, columns: &[String]) -> MergeResult<()> {
        if self.schema_written {
            return Err(MergeError::InvalidState {
                message: "schema already written to stdout".to_string(),
            });
        }
        self.schema_written = true;
        if !self.write_header {
            return Ok(());
        }
        self.encode_row(columns).await
    }

    async fn write(&mut self, values: &[String]) -> MergeResult<()> {
        self.encode_row(values).await?;
        self.records_written += 1;
        Ok(())
    }

    async fn finalize(&mut self) -> MergeResult<()> {
        if self.stdout.is_none() {
            return Ok(());
        }
        let flushed = self.flush_buffer().await;
        let Some(mut stdout) = self.stdout.take() else {
            return flushed;
        };
        flushed?;
        stdout
            .flush()
            .await
            .map_err(|e| MergeError::sink_unavailable(STDOUT_NAME, e))
    }

    fn name(&self) -> &str {
        STDOUT_NAME
    }

    fn records_written(&self) -> u64 {
        self.records_written
    }
}
