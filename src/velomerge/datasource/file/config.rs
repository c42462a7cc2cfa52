//! File Source and Sink Configuration

use serde::{Deserialize, Serialize};

/// Path value that routes a sink to standard output
pub const STDOUT_PATH: &str = "-";

/// Configuration for CSV file sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourceConfig {
    /// Path to the CSV file
    pub path: String,

    /// CSV delimiter character
    pub csv_delimiter: char,

    /// CSV quote character
    pub csv_quote: char,

    /// Whether the first line is a header row.
    /// Without one, columns are named `column_0`, `column_1`, ...
    pub csv_has_header: bool,

    /// Trim surrounding whitespace from every header and value
    pub trim_fields: bool,

    /// Buffer size for reading files (bytes)
    pub buffer_size: usize,
}

impl Default for FileSourceConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            csv_delimiter: ',',
            csv_quote: '"',
            csv_has_header: true,
            trim_fields: false,
            buffer_size: 8192,
        }
    }
}

impl FileSourceConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_csv_options(mut self, delimiter: char, quote: char, has_header: bool) -> Self {
        self.csv_delimiter = delimiter;
        self.csv_quote = quote;
        self.csv_has_header = has_header;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("File path cannot be empty".to_string());
        }
        validate_single_byte("csv_delimiter", self.csv_delimiter)?;
        validate_single_byte("csv_quote", self.csv_quote)?;
        if self.csv_delimiter == self.csv_quote {
            return Err("csv_delimiter and csv_quote must differ".to_string());
        }
        if self.buffer_size == 0 {
            return Err("buffer_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for CSV file sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkConfig {
    /// Output path; `-` writes to standard output
    pub path: String,

    /// Append to an existing file instead of truncating it
    pub append_if_exists: bool,

    /// Bytes buffered in memory before hitting the file
    pub buffer_size_bytes: u64,

    /// CSV delimiter character
    pub csv_delimiter: char,

    /// Whether to emit the header row
    pub csv_has_header: bool,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            append_if_exists: false,
            buffer_size_bytes: 64 * 1024,
            csv_delimiter: ',',
            csv_has_header: true,
        }
    }
}

impl FileSinkConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn is_stdout(&self) -> bool {
        self.path == STDOUT_PATH
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("Output path cannot be empty".to_string());
        }
        validate_single_byte("csv_delimiter", self.csv_delimiter)?;
        if self.csv_delimiter.is_alphanumeric() {
            return Err(format!(
                "csv_delimiter should not be alphanumeric, got '{}'",
                self.csv_delimiter
            ));
        }
        if self.is_stdout() && self.append_if_exists {
            return Err("append_if_exists has no meaning when writing to stdout".to_string());
        }
        Ok(())
    }
}

fn validate_single_byte(name: &str, c: char) -> Result<(), String> {
    if !c.is_ascii() {
        return Err(format!("{} must be a single ASCII character, got '{}'", name, c));
    }
    Ok(())
}
