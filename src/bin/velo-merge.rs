//! velo-merge: enrich a CSV file with columns looked up from another
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: source.csv + target.csv -> merged_output.csv, keyed on `sku`
//! velo-merge run
//!
//! # Explicit files and columns
//! velo-merge run --auxiliary images.csv --primary products.csv \
//!     --output merged.csv --key sku --fields instagramImages,designer
//!
//! # From a YAML config, writing to stdout
//! velo-merge run --config merge.yaml --output -
//!
//! # Check a config without touching any file
//! velo-merge validate --config merge.yaml
//! ```

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process;
use velomerge::velomerge::config::{ConfigError, MergeConfig};
use velomerge::velomerge::merge::MergeJob;

#[derive(Parser)]
#[command(name = "velo-merge")]
#[command(about = "Append columns from an auxiliary CSV to every row of a primary CSV, joined by key")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a merge
    Run(RunArgs),

    /// Validate a configuration and print the resolved settings
    Validate {
        /// YAML configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// YAML configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV providing the extra columns
    #[arg(short, long)]
    auxiliary: Option<String>,

    /// CSV to enrich
    #[arg(short, long)]
    primary: Option<String>,

    /// Output CSV, or `-` for stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Identifier column in the auxiliary CSV (and the primary one unless --primary-key is set)
    #[arg(short, long)]
    key: Option<String>,

    /// Identifier column in the primary CSV
    #[arg(long)]
    primary_key: Option<String>,

    /// Comma-separated auxiliary columns to append
    #[arg(short, long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Field delimiter used by both inputs and the output
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Append to the output file instead of replacing it
    #[arg(long)]
    append: bool,
}

impl RunArgs {
    fn into_config(self) -> Result<MergeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => MergeConfig::from_file(path)?,
            None => MergeConfig::default(),
        };

        if let Some(path) = self.auxiliary {
            config.auxiliary.path = path;
        }
        if let Some(path) = self.primary {
            config.primary.path = path;
        }
        if let Some(path) = self.output {
            config.output.path = path;
        }
        if let Some(key) = self.key {
            config.key_column = key;
        }
        if let Some(key) = self.primary_key {
            config.primary_key_column = Some(key);
        }
        if let Some(fields) = self.fields {
            config.auxiliary_fields = fields.into_iter().map(|f| f.trim().to_string()).collect();
        }
        if let Some(delimiter) = self.delimiter {
            config.auxiliary.csv_delimiter = delimiter;
            config.primary.csv_delimiter = delimiter;
            config.output.csv_delimiter = delimiter;
        }
        if self.append {
            config.output.append_if_exists = true;
        }
        Ok(config)
    }
}

async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.into_config()?;
    let job = MergeJob::new(config)?;
    let summary = job.run().await?;

    info!(
        "Merge complete: {} rows ({} matched, {} unmatched) against {} identifiers in {:.2?}",
        summary.rows(),
        summary.join.matched,
        summary.join.unmatched,
        summary.lookup_keys,
        summary.elapsed
    );
    Ok(())
}

fn validate(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = MergeConfig::from_file(&config_path)?;
    config.validate()?;
    println!("✅ {} is valid", config_path.display());
    println!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Validate { config } => validate(config),
    };

    if let Err(e) = result {
        error!("Error during merge: {}", e);
        process::exit(1);
    }
}
