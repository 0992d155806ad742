//! Tests for the cleaning summary and the JSON decision report

use std::path::Path;

use c3sclean::pipeline::{clean_groups, group_records, CleanOutcome, Resolution};
use c3sclean::report::{export_decision_report, CleanSummary, DecisionReport, ReportParams};
use indicatif::ProgressBar;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn mixed_outcome() -> CleanOutcome {
    let records = create_mixed_records();
    let source_records = records.len();
    let groups = group_records(records);
    let mut destination = MemoryDestination::default();
    let outcomes = clean_groups(&groups, &mut destination, &ProgressBar::hidden()).unwrap();

    CleanOutcome {
        source_records,
        groups: outcomes,
    }
}

fn params() -> ReportParams<'static> {
    ReportParams {
        source: Path::new("/data/C3S.db"),
        destination: Path::new("/data/C3S_clean.db"),
        schema_dir: Path::new("/opt/c3sclean/_include"),
    }
}

#[test]
fn test_summary_counts() {
    let summary = CleanSummary::from_outcome(&mixed_outcome());

    assert_eq!(summary.source_records, 12);
    assert_eq!(summary.groups, 5);
    assert_eq!(summary.duplicate_groups, 4);
    assert_eq!(summary.records_written, 6);
    assert_eq!(summary.records_dropped, 6);
}

#[test]
fn test_summary_resolution_counts_skip_singletons() {
    let summary = CleanSummary::from_outcome(&mixed_outcome());
    let counts = &summary.resolutions;

    assert_eq!(counts.get(Resolution::AveragedLowDispersion), 1);
    assert_eq!(counts.get(Resolution::PreferredDriftTube), 1);
    assert_eq!(counts.get(Resolution::KeptDistinctPair), 1);
    assert_eq!(counts.get(Resolution::OutlierConsensus), 1);
    // The valine singleton is resolved as kept-distinct but not counted
    assert_eq!(counts.get(Resolution::KeptDistinct), 0);
}

#[test]
fn test_summary_of_empty_run() {
    let summary = CleanSummary::from_outcome(&CleanOutcome {
        source_records: 0,
        groups: Vec::new(),
    });

    assert_eq!(summary.groups, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(summary.records_written, 0);
}

#[test]
fn test_decision_report_lists_duplicate_groups_only() {
    let outcome = mixed_outcome();
    let summary = CleanSummary::from_outcome(&outcome);

    let report = DecisionReport::new(&outcome, &summary, &params());

    let names: Vec<&str> = report.groups.iter().map(|g| g.key.name.as_str()).collect();
    assert_eq!(names, vec!["caffeine", "glucose", "alanine", "serine"]);

    let glucose = &report.groups[1];
    assert_eq!(glucose.resolution, Resolution::PreferredDriftTube);
    assert_eq!(glucose.input_ccs, vec![150.0, 160.0]);
    assert_eq!(glucose.output_ccs, vec![150.0, 150.0]);
    assert_eq!(glucose.written_ids, vec![2]);
    assert_eq!(glucose.dropped_ids, vec![4]);
}

#[test]
fn test_export_decision_report_json() {
    let temp_dir = TempDir::new().unwrap();
    let report_path = temp_dir.path().join("decisions.json");
    let outcome = mixed_outcome();
    let mut summary = CleanSummary::from_outcome(&outcome);
    summary.add_step_time("Group", std::time::Duration::from_millis(3));
    let report = DecisionReport::new(&outcome, &summary, &params());

    export_decision_report(&report, &report_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();

    assert_eq!(json["metadata"]["source_database"], "/data/C3S.db");
    assert_eq!(json["metadata"]["clean_database"], "/data/C3S_clean.db");
    assert!(json["metadata"]["timestamp"].as_str().is_some());

    assert_eq!(json["summary"]["duplicate_groups"], 4);
    assert_eq!(json["summary"]["resolutions"]["outlier_consensus"], 1);
    assert!(json["summary"].get("step_times").is_none());

    let serine = &json["groups"][3];
    assert_eq!(serine["key"]["name"], "serine");
    assert_eq!(serine["key"]["mz_bin"], 106);
    assert_eq!(serine["resolution"], "outlier_consensus");
    assert_eq!(serine["written_ids"], serde_json::json!([7]));
    assert_eq!(serine["dropped_ids"], serde_json::json!([8, 9, 10, 11]));
}

#[test]
fn test_export_to_missing_directory_is_report_error() {
    let outcome = mixed_outcome();
    let summary = CleanSummary::from_outcome(&outcome);
    let report = DecisionReport::new(&outcome, &summary, &params());

    let err = export_decision_report(&report, Path::new("/no/such/dir/report.json")).unwrap_err();

    assert!(matches!(err, c3sclean::pipeline::CleanError::Report { .. }));
}
