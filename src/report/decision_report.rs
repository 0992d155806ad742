//! Per-group decision report export
//!
//! Records which duplicates were merged, which values survived, and which
//! source ids were dropped, so that the metadata lost to value suppression
//! can be traced back to the source database.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleanError, CleanOutcome, CleanResult, GroupKey, GroupOutcome, Resolution};
use crate::report::CleanSummary;

/// Metadata about the cleaning run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub c3sclean_version: String,
    pub source_database: String,
    pub clean_database: String,
    pub schema_dir: String,
}

/// One duplicate group's decision
#[derive(Serialize)]
pub struct GroupReportEntry {
    pub key: GroupKey,
    pub resolution: Resolution,
    /// Relative standard deviation (%) of the input CCS values
    pub input_rsd: f64,
    pub input_ids: Vec<i64>,
    pub input_ccs: Vec<f64>,
    pub output_ccs: Vec<f64>,
    pub written_ids: Vec<i64>,
    pub dropped_ids: Vec<i64>,
}

impl From<&GroupOutcome> for GroupReportEntry {
    fn from(outcome: &GroupOutcome) -> Self {
        Self {
            key: outcome.key.clone(),
            resolution: outcome.decision.resolution,
            input_rsd: outcome.decision.dispersion,
            input_ids: outcome.input_ids.clone(),
            input_ccs: outcome.input_ccs.clone(),
            output_ccs: outcome.decision.values.clone(),
            written_ids: outcome.written_ids.clone(),
            dropped_ids: outcome.dropped_ids.clone(),
        }
    }
}

/// Complete decision report
#[derive(Serialize)]
pub struct DecisionReport {
    pub metadata: RunMetadata,
    pub summary: CleanSummary,
    /// Groups with more than one record, in processing order
    pub groups: Vec<GroupReportEntry>,
}

/// Paths recorded in the report metadata
pub struct ReportParams<'a> {
    pub source: &'a Path,
    pub destination: &'a Path,
    pub schema_dir: &'a Path,
}

impl DecisionReport {
    pub fn new(outcome: &CleanOutcome, summary: &CleanSummary, params: &ReportParams) -> Self {
        let groups = outcome
            .groups
            .iter()
            .filter(|g| g.input_ids.len() > 1)
            .map(GroupReportEntry::from)
            .collect();

        Self {
            metadata: RunMetadata {
                timestamp: Utc::now().to_rfc3339(),
                c3sclean_version: env!("CARGO_PKG_VERSION").to_string(),
                source_database: params.source.display().to_string(),
                clean_database: params.destination.display().to_string(),
                schema_dir: params.schema_dir.display().to_string(),
            },
            summary: summary.clone(),
            groups,
        }
    }
}

/// Write the decision report as pretty-printed JSON
pub fn export_decision_report(report: &DecisionReport, output_path: &Path) -> CleanResult<()> {
    let report_error = |message: String| CleanError::Report {
        path: output_path.to_path_buf(),
        message,
    };

    let json = serde_json::to_string_pretty(report).map_err(|e| report_error(e.to_string()))?;
    std::fs::write(output_path, json).map_err(|e| report_error(e.to_string()))?;

    Ok(())
}
