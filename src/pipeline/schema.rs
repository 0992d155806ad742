//! Schema scripts used to initialize a clean database

use std::path::{Path, PathBuf};

use super::error::{CleanError, CleanResult};

/// Schema script file names, in execution order: master measurements,
/// MQN descriptors, predicted CCS.
pub const SCHEMA_SCRIPTS: [&str; 3] = [
    "C3SDB_schema.sqlite3",
    "mqn_schema.sqlite3",
    "pred_CCS_schema.sqlite3",
];

/// Directory name searched for schema scripts when none is configured
pub const DEFAULT_SCHEMA_DIR: &str = "_include";

/// Location of the schema scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    pub dir: PathBuf,
}

/// A schema script read into memory
#[derive(Debug, Clone)]
pub struct SchemaScript {
    pub path: PathBuf,
    pub sql: String,
}

impl SchemaConfig {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `_include` next to the running executable, or relative to the working
    /// directory if the executable path cannot be determined.
    pub fn default_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join(DEFAULT_SCHEMA_DIR)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_DIR))
    }

    /// Full paths of the scripts, in execution order
    pub fn script_paths(&self) -> Vec<PathBuf> {
        SCHEMA_SCRIPTS.iter().map(|name| self.dir.join(name)).collect()
    }

    /// Check that every script exists
    pub fn verify(&self) -> CleanResult<()> {
        for path in self.script_paths() {
            if !path.is_file() {
                return Err(CleanError::MissingArtifact { path });
            }
        }
        Ok(())
    }

    /// Read all scripts, failing before any is returned if one is missing
    pub fn load_scripts(&self) -> CleanResult<Vec<SchemaScript>> {
        self.verify()?;
        self.script_paths()
            .into_iter()
            .map(|path| read_script(&path).map(|sql| SchemaScript { path, sql }))
            .collect()
    }
}

fn read_script(path: &Path) -> CleanResult<String> {
    std::fs::read_to_string(path).map_err(|source| CleanError::SchemaRead {
        path: path.to_path_buf(),
        source,
    })
}
