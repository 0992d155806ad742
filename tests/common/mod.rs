//! Shared test utilities and fixture generators

#![allow(dead_code)]

use c3sclean::pipeline::{CleanError, CleanResult, DestinationStore, MeasurementRecord};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `master` table as laid out in the C3S database
pub const MASTER_SCHEMA: &str = r#"
CREATE TABLE master (
    g_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    adduct TEXT NOT NULL,
    mass REAL NOT NULL,
    z INTEGER NOT NULL,
    mz REAL NOT NULL,
    ccs REAL NOT NULL,
    smi TEXT,
    chem_class_label TEXT,
    src_tag TEXT NOT NULL,
    ccs_type TEXT NOT NULL,
    ccs_method TEXT
);
"#;

pub const MQN_SCHEMA: &str = r#"
CREATE TABLE mqns (
    g_id INTEGER PRIMARY KEY,
    mqn_01 INTEGER, mqn_02 INTEGER, mqn_03 INTEGER, mqn_04 INTEGER
);
"#;

pub const PRED_CCS_SCHEMA: &str = r#"
CREATE TABLE predicted (
    g_id INTEGER PRIMARY KEY,
    pred_ccs REAL NOT NULL
);
"#;

/// Build a record with sensible defaults for the fields tests rarely care about
pub fn record(
    id: i64,
    name: &str,
    adduct: &str,
    mz: f64,
    ccs: f64,
    ccs_type: &str,
) -> MeasurementRecord {
    MeasurementRecord {
        id,
        name: name.to_string(),
        adduct: adduct.to_string(),
        mass: mz - 1.007276,
        charge: 1,
        mz,
        ccs,
        smi: Some("CN1C=NC2=C1C(=O)N(C(=O)N2C)C".to_string()),
        chem_class_label: None,
        src_tag: Some(format!("src_{}", id)),
        ccs_type: Some(ccs_type.to_string()),
        ccs_method: Some("single field".to_string()),
    }
}

/// Records forming one group with the given CCS values (all non-DT)
pub fn group_of(first_id: i64, ccs_values: &[f64]) -> Vec<MeasurementRecord> {
    ccs_values
        .iter()
        .enumerate()
        .map(|(i, &ccs)| record(first_id + i as i64, "Caffeine", "[M+H]+", 195.0877, ccs, "TW"))
        .collect()
}

/// A source data set exercising every reconciliation rule
///
/// - caffeine [M+H]+: two agreeing values (100.0, 100.05) -> one averaged row
/// - glucose [M+Na]+: DT 150.0 vs TW 160.0 -> one DT row
/// - alanine [M+H]+: TW 120.0 vs TW 140.0 -> both rows kept
/// - serine [M+H]+: 100 x4 + 200 -> one row at 100.0
/// - valine [M+H]+: singleton, untouched
pub fn create_mixed_records() -> Vec<MeasurementRecord> {
    vec![
        record(1, "Caffeine", "[M+H]+", 195.0877, 100.0, "TW"),
        record(2, "Glucose", "[M+Na]+", 203.0526, 150.0, "DT"),
        record(3, "caffeine", "[M+H]+", 195.0900, 100.05, "DT"),
        record(4, "Glucose", "[M+Na]+", 203.0500, 160.0, "TW"),
        record(5, "Alanine", "[M+H]+", 90.0550, 120.0, "TW"),
        record(6, "Alanine", "[M+H]+", 90.0550, 140.0, "TW"),
        record(7, "Serine", "[M+H]+", 106.0499, 100.0, "TW"),
        record(8, "Serine", "[M+H]+", 106.0499, 100.0, "TW"),
        record(9, "Serine", "[M+H]+", 106.0499, 100.0, "TW"),
        record(10, "Serine", "[M+H]+", 106.0499, 100.0, "TW"),
        record(11, "Serine", "[M+H]+", 106.0499, 200.0, "TW"),
        record(12, "Valine", "[M+H]+", 118.0863, 131.2, "DT"),
    ]
}

/// Create a temporary directory holding the three schema scripts
pub fn create_schema_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("C3SDB_schema.sqlite3"), MASTER_SCHEMA).unwrap();
    std::fs::write(dir.path().join("mqn_schema.sqlite3"), MQN_SCHEMA).unwrap();
    std::fs::write(dir.path().join("pred_CCS_schema.sqlite3"), PRED_CCS_SCHEMA).unwrap();
    dir
}

/// Create a temporary directory with a source database holding `records`
pub fn create_source_db(records: &[MeasurementRecord]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("C3S.db");
    write_master(&db_path, records);
    (temp_dir, db_path)
}

/// Create a `master` table at `path` and fill it with `records`
pub fn write_master(path: &Path, records: &[MeasurementRecord]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(MASTER_SCHEMA).unwrap();
    for r in records {
        conn.execute(
            "INSERT INTO master VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                r.id,
                r.name,
                r.adduct,
                r.mass,
                r.charge,
                r.mz,
                r.ccs,
                r.smi,
                r.chem_class_label,
                r.src_tag,
                r.ccs_type,
                r.ccs_method
            ],
        )
        .unwrap();
    }
}

/// Read every row of `master` in insertion order
pub fn read_master(path: &Path) -> Vec<MeasurementRecord> {
    let conn = Connection::open(path).unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT g_id, name, adduct, mass, z, mz, ccs, smi, chem_class_label, src_tag, \
             ccs_type, ccs_method FROM master ORDER BY rowid",
        )
        .unwrap();
    stmt.query_map([], |row| {
        Ok(MeasurementRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            adduct: row.get(2)?,
            mass: row.get(3)?,
            charge: row.get(4)?,
            mz: row.get(5)?,
            ccs: row.get(6)?,
            smi: row.get(7)?,
            chem_class_label: row.get(8)?,
            src_tag: row.get(9)?,
            ccs_type: row.get(10)?,
            ccs_method: row.get(11)?,
        })
    })
    .unwrap()
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
}

/// Names of the tables in a SQLite database
pub fn table_names(path: &Path) -> Vec<String> {
    let conn = Connection::open(path).unwrap();
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

/// In-memory destination that can be told to fail on a given record id
#[derive(Debug, Default)]
pub struct MemoryDestination {
    pub scripts: Vec<String>,
    pub rows: Vec<MeasurementRecord>,
    pub fail_on_id: Option<i64>,
}

impl DestinationStore for MemoryDestination {
    fn execute_script(&mut self, sql: &str) -> CleanResult<()> {
        self.scripts.push(sql.to_string());
        Ok(())
    }

    fn insert_record(&mut self, record: &MeasurementRecord) -> CleanResult<()> {
        if self.fail_on_id == Some(record.id) {
            return Err(CleanError::Write {
                id: record.id,
                source: rusqlite::Error::InvalidQuery,
            });
        }
        self.rows.push(record.clone());
        Ok(())
    }
}

/// Assert two floats agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected {}, got {}",
        expected,
        actual
    );
}
