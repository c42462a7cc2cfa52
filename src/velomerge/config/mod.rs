//! Merge job configuration
//!
//! Loaded from YAML; every key is optional and falls back to the defaults
//! below.
//!
//! ```yaml
//! key_column: sku
//! auxiliary_fields: [instagramImages, designer]
//! auxiliary:
//!   path: source.csv
//! primary:
//!   path: target.csv
//!   csv_delimiter: ";"
//! output:
//!   path: merged_output.csv
//! ```

use crate::velomerge::datasource::file::config::{FileSinkConfig, FileSourceConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_AUXILIARY_PATH: &str = "source.csv";
pub const DEFAULT_PRIMARY_PATH: &str = "target.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "merged_output.csv";
pub const DEFAULT_KEY_COLUMN: &str = "sku";
pub const DEFAULT_AUXILIARY_FIELDS: [&str; 2] = ["instagramImages", "designer"];

/// Errors raised while loading or validating a `MergeConfig`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("IO error reading {file}: {error}")]
    IoError {
        file: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("YAML parsing error in {file}: {error}")]
    ParseError {
        file: PathBuf,
        #[source]
        error: serde_yaml::Error,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Everything needed to run one merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Dataset providing the extra columns
    pub auxiliary: FileSourceConfig,

    /// Dataset being streamed and enriched
    pub primary: FileSourceConfig,

    /// Where the merged rows go (`-` for stdout)
    pub output: FileSinkConfig,

    /// Identifier column in the auxiliary dataset
    pub key_column: String,

    /// Identifier column in the primary dataset, when named differently
    pub primary_key_column: Option<String>,

    /// Auxiliary columns appended to every output row, in this order
    pub auxiliary_fields: Vec<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            auxiliary: FileSourceConfig::new(DEFAULT_AUXILIARY_PATH),
            primary: FileSourceConfig::new(DEFAULT_PRIMARY_PATH),
            output: FileSinkConfig::new(DEFAULT_OUTPUT_PATH),
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            primary_key_column: None,
            auxiliary_fields: DEFAULT_AUXILIARY_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl MergeConfig {
    /// Load a YAML file; relative data paths resolve against the file's directory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|error| ConfigError::IoError {
            file: path.to_path_buf(),
            error,
        })?;
        let mut config = Self::from_yaml_str(&content).map_err(|error| ConfigError::ParseError {
            file: path.to_path_buf(),
            error,
        })?;

        if let Some(base_dir) = path.parent() {
            config.resolve_paths(base_dir);
        }
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Identifier column used for the primary dataset
    pub fn primary_key(&self) -> &str {
        self.primary_key_column.as_deref().unwrap_or(&self.key_column)
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        resolve_path(&mut self.auxiliary.path, base_dir);
        resolve_path(&mut self.primary.path, base_dir);
        if !self.output.is_stdout() {
            resolve_path(&mut self.output.path, base_dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::Invalid { message };

        if self.key_column.trim().is_empty() {
            return Err(invalid("key_column cannot be empty".to_string()));
        }
        if self.primary_key().trim().is_empty() {
            return Err(invalid("primary_key_column cannot be empty".to_string()));
        }
        if self.auxiliary_fields.is_empty() {
            return Err(invalid(
                "auxiliary_fields must name at least one column".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.auxiliary_fields {
            if field.is_empty() {
                return Err(invalid("auxiliary_fields contains an empty name".to_string()));
            }
            if !seen.insert(field.as_str()) {
                return Err(invalid(format!("auxiliary field '{}' listed twice", field)));
            }
            if field == &self.key_column || field == self.primary_key() {
                return Err(invalid(format!(
                    "auxiliary field '{}' is also the key column",
                    field
                )));
            }
        }

        self.auxiliary
            .validate()
            .map_err(|e| invalid(format!("auxiliary: {}", e)))?;
        self.primary
            .validate()
            .map_err(|e| invalid(format!("primary: {}", e)))?;
        self.output
            .validate()
            .map_err(|e| invalid(format!("output: {}", e)))?;

        if !self.output.is_stdout() {
            for input in [&self.auxiliary.path, &self.primary.path] {
                if same_path(input, &self.output.path) {
                    return Err(invalid(format!(
                        "output path '{}' would overwrite an input",
                        self.output.path
                    )));
                }
            }
        }
        Ok(())
    }
}

fn resolve_path(path: &mut String, base_dir: &Path) {
    let candidate = Path::new(path.as_str());
    if candidate.is_relative() && !base_dir.as_os_str().is_empty() {
        *path = base_dir.join(candidate).to_string_lossy().to_string();
    }
}

fn same_path(a: &str, b: &str) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => Path::new(a) == Path::new(b),
    }
}
