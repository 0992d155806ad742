//! Measurement records and the key used to group duplicates

use std::fmt;

use serde::Serialize;

/// CCS measurement type for drift-tube derived values
pub const DRIFT_TUBE: &str = "DT";

/// One row of the `master` table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub id: i64,
    pub name: String,
    pub adduct: String,
    pub mass: f64,
    pub charge: i64,
    pub mz: f64,
    pub ccs: f64,
    /// Structure encoding (SMILES)
    pub smi: Option<String>,
    pub chem_class_label: Option<String>,
    pub src_tag: Option<String>,
    pub ccs_type: Option<String>,
    pub ccs_method: Option<String>,
}

impl MeasurementRecord {
    /// Whether this CCS value was measured with a drift tube
    pub fn is_drift_tube(&self) -> bool {
        self.ccs_type.as_deref() == Some(DRIFT_TUBE)
    }

    /// Key of the duplicate group this record belongs to
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.name, &self.adduct, self.mz)
    }

    /// Copy of this record carrying a reconciled CCS value
    pub fn with_ccs(&self, ccs: f64) -> Self {
        Self {
            ccs,
            ..self.clone()
        }
    }
}

/// Identity of a duplicate group: lower-cased name, adduct, and m/z rounded
/// to the nearest integer (ties to even).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupKey {
    pub name: String,
    pub adduct: String,
    pub mz_bin: i64,
}

impl GroupKey {
    pub fn new(name: &str, adduct: &str, mz: f64) -> Self {
        Self {
            name: name.to_lowercase(),
            adduct: adduct.to_string(),
            mz_bin: mz.round_ties_even() as i64,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ~{}", self.name, self.adduct, self.mz_bin)
    }
}
