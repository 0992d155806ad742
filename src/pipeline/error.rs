//! Error types for the cleaning pipeline.

use std::path::PathBuf;

use crate::pipeline::record::GroupKey;

/// Errors that abort a cleaning run.
///
/// Every variant is fatal: nothing is retried, and a run that fails after the
/// destination was initialized leaves it in a partial state.
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    /// A schema script is missing. Raised before any database is touched.
    #[error("Schema script not found: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// A schema script exists but could not be read.
    #[error("Failed to read schema script {}: {source}", path.display())]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source database could not be opened or queried.
    #[error("Source database error: {0}")]
    SourceAccess(#[source] rusqlite::Error),

    /// The destination database could not be removed, created, initialized, or closed.
    #[error("Destination database error at {}: {message}", path.display())]
    DestinationAccess { path: PathBuf, message: String },

    /// A group's CCS values have a zero mean, so relative dispersion is undefined.
    #[error("Degenerate CCS sample for group {key}: mean is {mean}")]
    DegenerateSample { key: GroupKey, mean: f64 },

    /// Inserting a reconciled record failed. Rows written for earlier groups remain.
    #[error("Failed to write record {id}: {source}")]
    Write {
        id: i64,
        #[source]
        source: rusqlite::Error,
    },

    /// The JSON decision report could not be written.
    #[error("Failed to write decision report {}: {message}", path.display())]
    Report { path: PathBuf, message: String },
}

pub type CleanResult<T> = Result<T, CleanError>;
