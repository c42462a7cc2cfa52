//! CSV File Reader Implementation

use crate::velomerge::datasource::traits::RecordReader;
use crate::velomerge::datasource::types::Record;
use crate::velomerge::error::{MergeError, MergeResult};
use async_trait::async_trait;
use log::debug;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;

use super::config::FileSourceConfig;

/// Forward-only CSV reader producing one `Record` per data row
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the row.
pub struct FileReader {
    config: FileSourceConfig,
    reader: csv::Reader<BufReader<File>>,
    headers: Option<Vec<String>>,
    unique_headers: bool,
    // First data row, held back when column names had to be inferred from it
    pending: Option<csv::ByteRecord>,
    row_buffer: csv::ByteRecord,
    records_read: u64,
    finished: bool,
}

impl FileReader {
    /// Open the file described by `config`
    pub async fn new(config: FileSourceConfig) -> MergeResult<Self> {
        let file = File::open(&config.path)
            .map_err(|e| MergeError::source_unavailable(config.path.clone(), e))?;
        let buffered = BufReader::with_capacity(config.buffer_size, file);

        let reader = csv::ReaderBuilder::new()
            .delimiter(config.csv_delimiter as u8)
            .quote(config.csv_quote as u8)
            .has_headers(config.csv_has_header)
            .flexible(true)
            .trim(if config.trim_fields {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(buffered);

        debug!(
            "FileReader: opened '{}' (header: {}, delimiter: {:?})",
            config.path, config.csv_has_header, config.csv_delimiter
        );

        Ok(Self {
            config,
            reader,
            headers: None,
            unique_headers: true,
            pending: None,
            row_buffer: csv::ByteRecord::new(),
            records_read: 0,
            finished: false,
        })
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    fn load_headers(&mut self) -> MergeResult<&[String]> {
        if self.headers.is_none() {
            let headers: Vec<String> = if self.config.csv_has_header {
                let raw = self
                    .reader
                    .byte_headers()
                    .map_err(|e| source_error(&self.config.path, e))?;
                raw.iter().map(|h| decode(h).into_owned()).collect()
            } else {
                let mut first = csv::ByteRecord::new();
                let has_row = self
                    .reader
                    .read_byte_record(&mut first)
                    .map_err(|e| source_error(&self.config.path, e))?;
                let width = if has_row { first.len() } else { 0 };
                if has_row {
                    self.pending = Some(first);
                }
                (0..width).map(|i| format!("column_{}", i)).collect()
            };
            self.unique_headers = {
                let mut seen = HashSet::with_capacity(headers.len());
                headers.iter().all(|h| seen.insert(h.as_str()))
            };
            if !self.unique_headers {
                debug!(
                    "FileReader: '{}' repeats a column name; the last value wins",
                    self.config.path
                );
            }
            self.headers = Some(headers);
        }
        Ok(self.headers.as_deref().unwrap_or_default())
    }

    fn to_record(&self, row: &csv::ByteRecord) -> Record {
        let headers = self.headers.as_deref().unwrap_or_default();
        let mut record = Record::with_capacity(self.records_read, row.len());
        for (i, value) in row.iter().enumerate() {
            let value = decode(value);
            match headers.get(i) {
                Some(name) if self.unique_headers => record.push(name.clone(), value),
                Some(name) => record.set(name.clone(), value),
                // Extra trailing cells beyond the header get positional names
                None => record.set(format!("column_{}", i), value),
            }
        }
        record
    }
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

fn source_error(path: &str, err: csv::Error) -> MergeError {
    MergeError::source_unavailable(path, err)
}

#[async_trait]
impl RecordReader for FileReader {
    async fn fetch_columns(&mut self) -> MergeResult<Vec<String>> {
        Ok(self.load_headers()?.to_vec())
    }

    async fn read(&mut self) -> MergeResult<Option<Record>> {
        if self.finished {
            return Ok(None);
        }
        self.load_headers()?;

        let row = match self.pending.take() {
            Some(row) => row,
            None => {
                let mut row = std::mem::take(&mut self.row_buffer);
                let has_row = self
                    .reader
                    .read_byte_record(&mut row)
                    .map_err(|e| source_error(&self.config.path, e))?;
                if !has_row {
                    self.finished = true;
                    debug!(
                        "FileReader: reached end of '{}' after {} records",
                        self.config.path, self.records_read
                    );
                    return Ok(None);
                }
                row
            }
        };

        self.records_read += 1;
        let record = self.to_record(&row);
        self.row_buffer = row;
        Ok(Some(record))
    }

    fn name(&self) -> &str {
        &self.config.path
    }
}
