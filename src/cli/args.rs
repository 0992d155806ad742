//! Command-line argument definitions using clap

use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

use crate::pipeline::{CleanConfig, SchemaConfig};

/// c3sclean - Deduplicate and reconcile CCS measurements in a C3S database
#[derive(Parser, Debug)]
#[command(name = "c3sclean")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source database path (SQLite, must contain a `master` table)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Clean database path. Replaced if it already exists.
    /// Defaults to the input directory with a '_clean' suffix (e.g., C3S.db → C3S_clean.db).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing the schema scripts
    /// (C3SDB_schema.sqlite3, mqn_schema.sqlite3, pred_CCS_schema.sqlite3).
    /// Defaults to '_include' next to the executable.
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Write a JSON report of every duplicate group's decision to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip the confirmation prompt before replacing an existing output database
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Get the output path, deriving it from the input if not explicitly provided.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derive_clean_path(&self.input))
    }

    /// Get the schema directory, falling back to the install-relative default.
    pub fn schema_dir(&self) -> PathBuf {
        self.schema_dir
            .clone()
            .unwrap_or_else(SchemaConfig::default_dir)
    }

    /// Build the pipeline configuration from the parsed arguments.
    pub fn clean_config(&self) -> CleanConfig {
        CleanConfig::new(self.schema_dir())
    }

    /// Log filter matching the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// `dir/C3S.db` → `dir/C3S_clean.db`
fn derive_clean_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    match input.extension().and_then(|e| e.to_str()) {
        Some(extension) => parent.join(format!("{}_clean.{}", stem, extension)),
        None => parent.join(format!("{}_clean", stem)),
    }
}
