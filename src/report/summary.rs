//! Cleaning summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

use crate::pipeline::{CleanOutcome, Resolution};

/// How many duplicate groups each rule resolved
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionCounts {
    pub averaged_low_dispersion: usize,
    pub preferred_drift_tube: usize,
    pub kept_distinct_pair: usize,
    pub outlier_consensus: usize,
    pub kept_distinct: usize,
}

impl ResolutionCounts {
    pub fn record(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::AveragedLowDispersion => self.averaged_low_dispersion += 1,
            Resolution::PreferredDriftTube => self.preferred_drift_tube += 1,
            Resolution::KeptDistinctPair => self.kept_distinct_pair += 1,
            Resolution::OutlierConsensus => self.outlier_consensus += 1,
            Resolution::KeptDistinct => self.kept_distinct += 1,
        }
    }

    pub fn get(&self, resolution: Resolution) -> usize {
        match resolution {
            Resolution::AveragedLowDispersion => self.averaged_low_dispersion,
            Resolution::PreferredDriftTube => self.preferred_drift_tube,
            Resolution::KeptDistinctPair => self.kept_distinct_pair,
            Resolution::OutlierConsensus => self.outlier_consensus,
            Resolution::KeptDistinct => self.kept_distinct,
        }
    }
}

/// Summary of a cleaning run
#[derive(Debug, Default, Clone, Serialize)]
pub struct CleanSummary {
    pub source_records: usize,
    pub groups: usize,
    /// Groups with more than one record
    pub duplicate_groups: usize,
    pub records_written: usize,
    pub records_dropped: usize,
    /// Resolutions of duplicate groups only; singletons are not counted
    pub resolutions: ResolutionCounts,
    #[serde(skip)]
    pub step_times: Vec<(String, Duration)>,
}

impl CleanSummary {
    pub fn from_outcome(outcome: &CleanOutcome) -> Self {
        let mut resolutions = ResolutionCounts::default();
        let mut duplicate_groups = 0;
        for group in outcome.groups.iter().filter(|g| g.input_ids.len() > 1) {
            duplicate_groups += 1;
            resolutions.record(group.decision.resolution);
        }

        Self {
            source_records: outcome.source_records,
            groups: outcome.groups.len(),
            duplicate_groups,
            records_written: outcome.records_written(),
            records_dropped: outcome.records_dropped(),
            resolutions,
            step_times: Vec::new(),
        }
    }

    pub fn add_step_time(&mut self, step: &str, elapsed: Duration) {
        self.step_times.push((step.to_string(), elapsed));
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CLEANING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Source Records"),
            Cell::new(self.source_records),
        ]);
        table.add_row(vec![Cell::new("🧪 Groups"), Cell::new(self.groups)]);
        table.add_row(vec![
            Cell::new("🔗 Duplicate Groups"),
            Cell::new(self.duplicate_groups).fg(if self.duplicate_groups == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (Repeated CCS)"),
            Cell::new(self.records_dropped).fg(if self.records_dropped == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Records Written"),
            Cell::new(self.records_written)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        let reduction_pct = if self.source_records > 0 {
            self.records_dropped as f64 / self.source_records as f64 * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new("📉 Reduction"),
            Cell::new(format!("{:.1}%", reduction_pct))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if self.duplicate_groups > 0 {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("DUPLICATE GROUP RESOLUTIONS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            println!();
            for resolution in [
                Resolution::AveragedLowDispersion,
                Resolution::PreferredDriftTube,
                Resolution::KeptDistinctPair,
                Resolution::OutlierConsensus,
                Resolution::KeptDistinct,
            ] {
                let count = self.resolutions.get(resolution);
                if count > 0 {
                    println!(
                        "      {} {:<24} {}",
                        style("•").dim(),
                        resolution.label(),
                        style(count).yellow()
                    );
                }
            }
        }

        if !self.step_times.is_empty() {
            println!();
            println!("    {}", style("Timings").dim());
            for (step, elapsed) in &self.step_times {
                println!(
                    "      {:<24} {}",
                    step,
                    style(format!("{:.2?}", elapsed)).dim()
                );
            }
        }
    }
}
