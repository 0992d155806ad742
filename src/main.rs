//! c3sclean: CCS Database Cleaning CLI Tool
//!
//! A command-line tool that groups duplicate CCS measurements, reconciles
//! them by relative dispersion, and writes a clean copy of the database.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use c3sclean::cli::{confirm_overwrite, Cli};
use c3sclean::pipeline::{
    clean_groups, count_duplicate_groups, group_records, initialize_destination, is_same_file,
    prepare_run, CleanOutcome, SourceStore, SqliteDestination, SqliteSource,
};
use c3sclean::report::{export_decision_report, CleanSummary, DecisionReport, ReportParams};
use c3sclean::utils::{
    abandon_with_error, create_group_progress_bar, create_spinner, finish_with_success,
    print_banner, print_completion, print_config, print_count, print_info, print_step_header,
    print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let source_path = cli.input.clone();
    let output_path = cli.output_path();
    let config = cli.clean_config();

    if !source_path.is_file() {
        anyhow::bail!("Source database not found: {}", source_path.display());
    }
    if let Some(report_path) = &cli.report {
        if is_same_file(report_path, &source_path) || is_same_file(report_path, &output_path) {
            anyhow::bail!(
                "Report path must differ from both databases: {}",
                report_path.display()
            );
        }
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &source_path,
        &output_path,
        &config.schema.dir,
        cli.report.as_deref(),
    );

    // Step 1: Schema scripts and paths (checked before any database is touched)
    print_step_header(1, "Check Inputs");
    let step_start = Instant::now();
    let scripts = prepare_run(&source_path, &output_path, &config)
        .context("Cannot initialize the clean database")?;
    print_success(&format!(
        "Loaded {} schema scripts from {}",
        scripts.len(),
        config.schema.dir.display()
    ));
    let schema_elapsed = step_start.elapsed();
    print_step_time(schema_elapsed);

    if output_path.exists() && !cli.no_confirm && !confirm_overwrite(&output_path)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    // Step 2: Read source
    print_step_header(2, "Read Source Database");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading measurements...");
    let records = SqliteSource::open(&source_path)
        .and_then(|source| source.fetch_records())
        .with_context(|| format!("Failed to read {}", source_path.display()))?;
    let source_records = records.len();
    finish_with_success(&spinner, "Source database read");
    print_count("measurement record(s)", source_records, None);
    let read_elapsed = step_start.elapsed();
    print_step_time(read_elapsed);

    // Step 3: Group duplicates
    print_step_header(3, "Group Duplicate Measurements");
    let step_start = Instant::now();
    let groups = group_records(records);
    let duplicate_groups = count_duplicate_groups(&groups);
    print_count("group(s)", groups.len(), Some("(name, adduct, rounded m/z)"));
    if duplicate_groups == 0 {
        print_info("No duplicate measurements found");
    } else {
        print_count("group(s) with duplicate measurements", duplicate_groups, None);
    }
    let group_elapsed = step_start.elapsed();
    print_step_time(group_elapsed);

    // Step 4: Initialize destination
    print_step_header(4, "Initialize Clean Database");
    let step_start = Instant::now();
    let mut destination = SqliteDestination::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    initialize_destination(&mut destination, &scripts)?;
    print_success(&format!("Created {}", output_path.display()));
    let init_elapsed = step_start.elapsed();
    print_step_time(init_elapsed);

    // Step 5: Reconcile and write
    print_step_header(5, "Reconcile and Write");
    let step_start = Instant::now();
    let pb = create_group_progress_bar(groups.len());
    let outcomes = match clean_groups(&groups, &mut destination, &pb) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            abandon_with_error(&pb, "Reconciliation stopped");
            return Err(e).with_context(|| {
                format!(
                    "Cleaning aborted; {} is incomplete and should be deleted",
                    output_path.display()
                )
            });
        }
    };
    destination.close()?;
    finish_with_success(&pb, "All groups reconciled");
    let outcome = CleanOutcome {
        source_records,
        groups: outcomes,
    };
    print_success(&format!(
        "Wrote {} record(s) to {}",
        outcome.records_written(),
        output_path.display()
    ));
    let write_elapsed = step_start.elapsed();
    print_step_time(write_elapsed);

    let mut summary = CleanSummary::from_outcome(&outcome);
    summary.add_step_time("Check inputs", schema_elapsed);
    summary.add_step_time("Read source", read_elapsed);
    summary.add_step_time("Group", group_elapsed);
    summary.add_step_time("Initialize", init_elapsed);
    summary.add_step_time("Reconcile and write", write_elapsed);

    if let Some(report_path) = &cli.report {
        let report = DecisionReport::new(
            &outcome,
            &summary,
            &ReportParams {
                source: &source_path,
                destination: &output_path,
                schema_dir: &config.schema.dir,
            },
        );
        export_decision_report(&report, report_path)?;
        print_success(&format!("Decision report saved to {}", report_path.display()));
    }

    summary.display();
    print_completion();

    Ok(())
}
