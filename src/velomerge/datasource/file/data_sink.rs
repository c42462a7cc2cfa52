//! File Sink Implementation
//!
//! Writes merged rows as CSV with:
//! - RFC 4180 quoting via the `csv` encoder
//! - In-memory write buffering, flushed when the buffer fills
//! - Append or truncate on open
//! - Explicit finalize that flushes and syncs the file

use crate::velomerge::datasource::stdout_writer::StdoutWriter;
use crate::velomerge::datasource::traits::RecordWriter;
use crate::velomerge::error::{MergeError, MergeResult};
use async_trait::async_trait;
use log::{debug, info};
use std::io;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::config::FileSinkConfig;

/// Factory for writers described by a `FileSinkConfig`
pub struct FileDataSink {
    config: FileSinkConfig,
}

impl FileDataSink {
    pub fn new(config: FileSinkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FileSinkConfig {
        &self.config
    }

    /// Open a writer: stdout for `-`, a file otherwise
    pub async fn create_writer(&self) -> MergeResult<Box<dyn RecordWriter>> {
        if self.config.is_stdout() {
            return Ok(Box::new(StdoutWriter::new(&self.config)));
        }
        let writer = FileWriter::new(self.config.clone()).await?;
        Ok(Box::new(writer))
    }
}

/// Serializes rows to CSV bytes, accumulating them until drained
pub(crate) struct CsvRowEncoder {
    encoder: csv::Writer<Vec<u8>>,
    delimiter: u8,
    capacity: usize,
}

impl CsvRowEncoder {
    pub(crate) fn new(delimiter: char, capacity: usize) -> Self {
        let delimiter = delimiter as u8;
        Self {
            encoder: Self::build(delimiter, capacity),
            delimiter,
            capacity,
        }
    }

    fn build(delimiter: u8, capacity: usize) -> csv::Writer<Vec<u8>> {
        csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(false)
            .from_writer(Vec::with_capacity(capacity))
    }

    pub(crate) fn encode(&mut self, values: &[String]) -> io::Result<()> {
        self.encoder.write_record(values).map_err(io::Error::from)?;
        self.encoder.flush()
    }

    pub(crate) fn buffered_len(&self) -> usize {
        self.encoder.get_ref().len()
    }

    /// Take the encoded bytes, leaving a fresh encoder behind
    pub(crate) fn drain(&mut self) -> io::Result<Vec<u8>> {
        let fresh = Self::build(self.delimiter, self.capacity);
        std::mem::replace(&mut self.encoder, fresh)
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))
    }
}

/// Buffered CSV file writer
pub struct FileWriter {
    config: FileSinkConfig,
    current_file: Option<File>,
    current_path: PathBuf,
    encoder: CsvRowEncoder,
    buffer_size: usize,
    skip_header: bool,
    schema_width: Option<usize>,
    bytes_written: u64,
    records_written: u64,
}

impl FileWriter {
    /// Create the output file (or open it for append)
    pub async fn new(config: FileSinkConfig) -> MergeResult<Self> {
        let path = PathBuf::from(&config.path);

        let appending = config.append_if_exists && path.exists();
        let file = if appending {
            tokio::fs::OpenOptions::new().append(true).open(&path).await
        } else {
            File::create(&path).await
        }
        .map_err(|e| {
            MergeError::sink_unavailable(
                config.path.clone(),
                io::Error::new(
                    e.kind(),
                    format!("Failed to open file {}: {}", path.display(), e),
                ),
            )
        })?;

        // A header in the middle of an existing file would read as data
        let existing_len = if appending {
            file.metadata().await.map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        debug!(
            "FileWriter: opened '{}' (append: {}, existing bytes: {})",
            path.display(),
            appending,
            existing_len
        );

        let buffer_size = config.buffer_size_bytes as usize;
        Ok(Self {
            encoder: CsvRowEncoder::new(config.csv_delimiter, buffer_size),
            skip_header: !config.csv_has_header || existing_len > 0,
            config,
            current_file: Some(file),
            current_path: path,
            buffer_size,
            schema_width: None,
            bytes_written: 0,
            records_written: 0,
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.current_path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn sink_error(&self, err: io::Error) -> MergeError {
        MergeError::sink_unavailable(self.config.path.clone(), err)
    }

    fn closed_error(&self) -> MergeError {
        self.sink_error(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "writer already finalized",
        ))
    }

    async fn encode_row(&mut self, values: &[String]) -> MergeResult<()> {
        if self.current_file.is_none() {
            return Err(self.closed_error());
        }
        if let Err(e) = self.encoder.encode(values) {
            return Err(self.sink_error(e));
        }
        if self.encoder.buffered_len() >= self.buffer_size {
            self.flush_buffer().await?;
        }
        Ok(())
    }

    /// Flush write buffer to file
    async fn flush_buffer(&mut self) -> MergeResult<()> {
        if self.encoder.buffered_len() == 0 {
            return Ok(());
        }
        if self.current_file.is_none() {
            return Err(self.closed_error());
        }
        let data = match self.encoder.drain() {
            Ok(data) => data,
            Err(e) => return Err(self.sink_error(e)),
        };

        if let Some(file) = self.current_file.as_mut() {
            // tokio completes writes in the background until flushed
            let written = match file.write_all(&data).await {
                Ok(()) => file.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                return Err(self.sink_error(e));
            }
        }

        self.bytes_written += data.len() as u64;
        Ok(())
    }
}

#[async_trait]
impl RecordWriter for FileWriter {
    async fn write_schema(&mut self, columns: &[String]) -> MergeResult<()> {
        if self.schema_width.is_some() {
            return Err(MergeError::InvalidState {
                message: format!("schema already written to '{}'", self.config.path),
            });
        }
        self.schema_width = Some(columns.len());
        if self.skip_header {
            return Ok(());
        }
        self.encode_row(columns).await
    }

    async fn write(&mut self, values: &[String]) -> MergeResult<()> {
        if let Some(width) = self.schema_width {
            if values.len() != width {
                return Err(self.sink_error(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("row has {} values, schema has {}", values.len(), width),
                )));
            }
        }
        self.encode_row(values).await?;
        self.records_written += 1;
        Ok(())
    }

    async fn finalize(&mut self) -> MergeResult<()> {
        if self.current_file.is_none() {
            return Ok(());
        }
        let flushed = self.flush_buffer().await;

        // Close the file even when the final flush failed
        let Some(mut file) = self.current_file.take() else {
            return flushed;
        };
        flushed?;
        file.flush().await.map_err(|e| self.sink_error(e))?;
        file.sync_all().await.map_err(|e| self.sink_error(e))?;

        info!(
            "FileWriter: finalized '{}' ({} records, {} bytes)",
            self.current_path.display(),
            self.records_written,
            self.bytes_written
        );
        Ok(())
    }

    fn name(&self) -> &str {
        &self.config.path
    }

    fn records_written(&self) -> u64 {
        self.records_written
    }
}
