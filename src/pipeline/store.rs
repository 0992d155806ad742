//! Source and destination database access
//!
//! The pipeline only needs two narrow contracts: read every row of the
//! `master` table, and initialize then populate a fresh copy of it. The SQLite
//! implementations below are what the CLI uses.

use std::path::{Path, PathBuf};

use log::info;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};

use super::error::{CleanError, CleanResult};
use super::record::MeasurementRecord;
use super::schema::SchemaScript;

/// Projection read from the source `master` table
pub const SELECT_MASTER: &str = "SELECT g_id, name, adduct, mass, z, mz, ccs, smi, \
     chem_class_label, src_tag, ccs_type, ccs_method FROM master";

/// Insert of one row of the same 12-column shape
pub const INSERT_MASTER: &str =
    "INSERT INTO master VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";

/// Read access to the measurements being cleaned
pub trait SourceStore {
    fn fetch_records(&self) -> CleanResult<Vec<MeasurementRecord>>;
}

/// Write access to the clean database
pub trait DestinationStore {
    /// Execute a batch of schema-definition statements
    fn execute_script(&mut self, sql: &str) -> CleanResult<()>;

    /// Insert one reconciled record into `master`
    fn insert_record(&mut self, record: &MeasurementRecord) -> CleanResult<()>;
}

/// Records already held in memory
impl SourceStore for [MeasurementRecord] {
    fn fetch_records(&self) -> CleanResult<Vec<MeasurementRecord>> {
        Ok(self.to_vec())
    }
}

/// Run the schema scripts against a destination, in order
pub fn initialize_destination<D: DestinationStore + ?Sized>(
    destination: &mut D,
    scripts: &[SchemaScript],
) -> CleanResult<()> {
    for script in scripts {
        info!("Executing schema script {}", script.path.display());
        destination.execute_script(&script.sql)?;
    }
    Ok(())
}

/// Read-only SQLite source database
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open an existing database. A missing file is an error rather than an
    /// empty new database.
    pub fn open(path: &Path) -> CleanResult<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(CleanError::SourceAccess)?;
        Ok(Self { conn })
    }
}

impl SourceStore for SqliteSource {
    fn fetch_records(&self) -> CleanResult<Vec<MeasurementRecord>> {
        let mut stmt = self
            .conn
            .prepare(SELECT_MASTER)
            .map_err(CleanError::SourceAccess)?;
        let records = stmt
            .query_map([], record_from_row)
            .map_err(CleanError::SourceAccess)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(CleanError::SourceAccess)?;
        info!("Read {} records from source", records.len());
        Ok(records)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MeasurementRecord> {
    Ok(MeasurementRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        adduct: row.get(2)?,
        mass: row.get(3)?,
        charge: integer_column(row, 4)?,
        mz: row.get(5)?,
        ccs: row.get(6)?,
        smi: row.get(7)?,
        chem_class_label: row.get(8)?,
        src_tag: row.get(9)?,
        ccs_type: row.get(10)?,
        ccs_method: row.get(11)?,
    })
}

/// Read an integer column that a loosely typed source may hold as a whole
/// REAL (`1.0`) or as decimal TEXT (`"1"`).
fn integer_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    let value = row.get_ref(idx)?;
    let converted = match value {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|t| t.trim().parse::<i64>().ok()),
        _ => None,
    };
    converted.ok_or_else(|| {
        let name = row
            .as_ref()
            .column_name(idx)
            .map(str::to_string)
            .unwrap_or_default();
        rusqlite::Error::InvalidColumnType(idx, name, value.data_type())
    })
}

/// Freshly created SQLite destination database
pub struct SqliteDestination {
    conn: Connection,
    path: PathBuf,
}

impl SqliteDestination {
    /// Create an empty database at `path`, deleting any existing file first.
    pub fn create(path: &Path) -> CleanResult<Self> {
        if path.exists() {
            info!("Removing existing destination {}", path.display());
            std::fs::remove_file(path).map_err(|e| destination_error(path, e))?;
        }
        let conn = Connection::open(path).map_err(|e| destination_error(path, e))?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> CleanResult<()> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, e)| destination_error(&path, e))
    }
}

impl DestinationStore for SqliteDestination {
    fn execute_script(&mut self, sql: &str) -> CleanResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| destination_error(&self.path, e))
    }

    fn insert_record(&mut self, record: &MeasurementRecord) -> CleanResult<()> {
        let write_error = |source| CleanError::Write {
            id: record.id,
            source,
        };
        let mut stmt = self.conn.prepare_cached(INSERT_MASTER).map_err(write_error)?;
        stmt.execute(params![
            record.id,
            record.name,
            record.adduct,
            record.mass,
            record.charge,
            record.mz,
            record.ccs,
            record.smi,
            record.chem_class_label,
            record.src_tag,
            record.ccs_type,
            record.ccs_method,
        ])
        .map_err(write_error)?;
        Ok(())
    }
}

fn destination_error(path: &Path, err: impl std::fmt::Display) -> CleanError {
    CleanError::DestinationAccess {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
