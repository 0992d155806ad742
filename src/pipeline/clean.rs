//! Database cleaning pipeline: read, group, reconcile, write

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{debug, info};

use super::error::{CleanError, CleanResult};
use super::grouping::{group_records, DuplicateGroup};
use super::policy::{decide_group, suppress_duplicates, GroupDecision};
use super::record::{GroupKey, MeasurementRecord};
use super::schema::{SchemaConfig, SchemaScript};
use super::store::{
    initialize_destination, DestinationStore, SourceStore, SqliteDestination, SqliteSource,
};

/// Settings for a cleaning run
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub schema: SchemaConfig,
}

impl CleanConfig {
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema: SchemaConfig::from_dir(schema_dir),
        }
    }
}

/// What happened to one duplicate group
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    pub key: GroupKey,
    /// Source ids, in read order
    pub input_ids: Vec<i64>,
    /// Source CCS values, in read order
    pub input_ccs: Vec<f64>,
    pub decision: GroupDecision,
    /// Ids of the records written to the destination
    pub written_ids: Vec<i64>,
    /// Ids dropped because their output value repeated an earlier one
    pub dropped_ids: Vec<i64>,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub source_records: usize,
    pub groups: Vec<GroupOutcome>,
}

impl CleanOutcome {
    pub fn records_written(&self) -> usize {
        self.groups.iter().map(|g| g.written_ids.len()).sum()
    }

    pub fn records_dropped(&self) -> usize {
        self.groups.iter().map(|g| g.dropped_ids.len()).sum()
    }
}

/// Reconcile a single group and write its surviving records.
pub fn clean_group<D: DestinationStore + ?Sized>(
    group: &DuplicateGroup,
    destination: &mut D,
) -> CleanResult<GroupOutcome> {
    let decision = decide_group(&group.entries)?;
    debug!(
        "Group {} ({} records, RSD {:.3}%): {:?}",
        group.key,
        group.len(),
        decision.dispersion,
        decision.resolution
    );

    let (kept, dropped_ids) = suppress_duplicates(&group.entries, &decision.values);
    for record in &kept {
        destination.insert_record(record)?;
    }

    Ok(GroupOutcome {
        key: group.key.clone(),
        input_ids: group.entries.iter().map(|e| e.id).collect(),
        input_ccs: group.entries.iter().map(|e| e.ccs).collect(),
        decision,
        written_ids: kept.iter().map(|r| r.id).collect(),
        dropped_ids,
    })
}

/// Reconcile and write every group in order, ticking `pb` once per group.
///
/// Stops at the first failing group; rows written for earlier groups remain in
/// the destination.
pub fn clean_groups<D: DestinationStore + ?Sized>(
    groups: &[DuplicateGroup],
    destination: &mut D,
    pb: &ProgressBar,
) -> CleanResult<Vec<GroupOutcome>> {
    let mut outcomes = Vec::with_capacity(groups.len());
    for group in groups {
        outcomes.push(clean_group(group, destination)?);
        pb.inc(1);
    }
    Ok(outcomes)
}

/// Run the whole pipeline against arbitrary stores.
///
/// Schema scripts are loaded and the source is read in full before the
/// destination is touched.
pub fn clean_stores<S, D>(
    source: &S,
    destination: &mut D,
    config: &CleanConfig,
    pb: &ProgressBar,
) -> CleanResult<CleanOutcome>
where
    S: SourceStore + ?Sized,
    D: DestinationStore + ?Sized,
{
    let scripts = config.schema.load_scripts()?;
    let records = source.fetch_records()?;
    write_clean(records, &scripts, destination, pb)
}

/// Checks that must pass before any database is opened: every schema script
/// is present and readable, and the destination is not the source file under
/// another name. Returns the loaded scripts.
pub fn prepare_run(
    source_path: &Path,
    destination_path: &Path,
    config: &CleanConfig,
) -> CleanResult<Vec<SchemaScript>> {
    let scripts = config.schema.load_scripts()?;
    if is_same_file(source_path, destination_path) {
        return Err(CleanError::DestinationAccess {
            path: destination_path.to_path_buf(),
            message: "destination is the source database".to_string(),
        });
    }
    Ok(scripts)
}

/// Clean the SQLite database at `source_path` into a new database at
/// `destination_path`, replacing any file already there.
pub fn clean_database(
    source_path: &Path,
    destination_path: &Path,
    config: &CleanConfig,
) -> CleanResult<CleanOutcome> {
    let scripts = prepare_run(source_path, destination_path, config)?;

    let source = SqliteSource::open(source_path)?;
    let records = source.fetch_records()?;
    drop(source);

    let mut destination = SqliteDestination::create(destination_path)?;
    let outcome = write_clean(records, &scripts, &mut destination, &ProgressBar::hidden())?;
    destination.close()?;

    info!(
        "Database cleaned and saved as {} ({} of {} records kept)",
        destination_path.display(),
        outcome.records_written(),
        outcome.source_records
    );
    Ok(outcome)
}

fn write_clean<D: DestinationStore + ?Sized>(
    records: Vec<MeasurementRecord>,
    scripts: &[SchemaScript],
    destination: &mut D,
    pb: &ProgressBar,
) -> CleanResult<CleanOutcome> {
    let source_records = records.len();
    let groups = group_records(records);
    info!(
        "Grouped {} records into {} groups",
        source_records,
        groups.len()
    );

    initialize_destination(destination, scripts)?;
    pb.set_length(groups.len() as u64);
    let groups = clean_groups(&groups, destination, pb)?;

    Ok(CleanOutcome {
        source_records,
        groups,
    })
}

/// Whether two paths name the same file once `.`/`..` components and
/// symlinks are resolved. A path that does not exist yet is compared through
/// its resolved parent directory.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    resolve_path(a) == resolve_path(b)
}

fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}
