//! Group reconciliation policy
//!
//! Decides, for one group of duplicate measurements, which CCS value each
//! record should carry in the cleaned database, and which records survive
//! once repeated values are collapsed.

use log::debug;
use serde::Serialize;

use super::error::{CleanError, CleanResult};
use super::record::MeasurementRecord;
use super::stats::{
    mean, reconcile, relative_dispersion, round_to, Reconciled, CONSENSUS_RSD_PERCENT,
};

/// Decimal places kept when replicate values are averaged
pub const CCS_DECIMALS: i32 = 4;

/// Which rule produced a group's output values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Replicates already agreed; every record gets the rounded mean
    AveragedLowDispersion,
    /// A disagreeing pair with exactly one drift-tube value; the DT value wins
    PreferredDriftTube,
    /// A disagreeing pair with no single DT value; both values kept
    KeptDistinctPair,
    /// Outliers were stripped and the survivors' mean applied to every record
    OutlierConsensus,
    /// Outlier removal reached no consensus; original values kept
    KeptDistinct,
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::AveragedLowDispersion => "Averaged (RSD < 1%)",
            Resolution::PreferredDriftTube => "Preferred drift tube",
            Resolution::KeptDistinctPair => "Kept distinct pair",
            Resolution::OutlierConsensus => "Outlier consensus",
            Resolution::KeptDistinct => "Kept distinct",
        }
    }
}

/// Output CCS values for a group, positionally aligned with its entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDecision {
    pub values: Vec<f64>,
    pub resolution: Resolution,
    /// Relative dispersion (%) of the input CCS values
    pub dispersion: f64,
}

/// Compute the output CCS value for every entry of a duplicate group.
pub fn reconcile_group(entries: &[MeasurementRecord]) -> CleanResult<Vec<f64>> {
    decide_group(entries).map(|decision| decision.values)
}

/// Like [`reconcile_group`], also reporting which rule decided the group.
///
/// Fails with [`CleanError::DegenerateSample`] when the CCS values have a zero
/// mean, since their dispersion is then undefined.
pub fn decide_group(entries: &[MeasurementRecord]) -> CleanResult<GroupDecision> {
    let Some(first) = entries.first() else {
        return Ok(GroupDecision {
            values: Vec::new(),
            resolution: Resolution::KeptDistinct,
            dispersion: 0.0,
        });
    };

    let ccs_values: Vec<f64> = entries.iter().map(|e| e.ccs).collect();
    let dispersion = relative_dispersion(&ccs_values);
    if !dispersion.is_finite() {
        return Err(CleanError::DegenerateSample {
            key: first.group_key(),
            mean: mean(&ccs_values),
        });
    }

    let n = entries.len();
    let averaged = || vec![round_to(mean(&ccs_values), CCS_DECIMALS); n];

    let (values, resolution) = if dispersion < CONSENSUS_RSD_PERCENT {
        (averaged(), Resolution::AveragedLowDispersion)
    } else if n == 2 {
        let drift_tube: Vec<&MeasurementRecord> =
            entries.iter().filter(|e| e.is_drift_tube()).collect();
        match drift_tube.as_slice() {
            [dt] => (vec![dt.ccs; n], Resolution::PreferredDriftTube),
            _ => (ccs_values.clone(), Resolution::KeptDistinctPair),
        }
    } else {
        match reconcile(&ccs_values) {
            Reconciled::Consensus(value) => (
                vec![round_to(value, CCS_DECIMALS); n],
                Resolution::OutlierConsensus,
            ),
            Reconciled::Distinct(values) => (values, Resolution::KeptDistinct),
        }
    };

    Ok(GroupDecision {
        values,
        resolution,
        dispersion,
    })
}

/// Pair entries with their output values and keep only the first entry for
/// each distinct value.
///
/// Kept records carry their own metadata with the output CCS substituted;
/// entries repeating an already-kept value are dropped.
pub fn suppress_duplicates(
    entries: &[MeasurementRecord],
    values: &[f64],
) -> (Vec<MeasurementRecord>, Vec<i64>) {
    let mut emitted: Vec<f64> = Vec::with_capacity(values.len());
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for (entry, &value) in entries.iter().zip(values) {
        if emitted.iter().any(|&v| v == value) {
            debug!("Suppressing record {} (CCS {} already written)", entry.id, value);
            dropped.push(entry.id);
        } else {
            emitted.push(value);
            kept.push(entry.with_ccs(value));
        }
    }

    (kept, dropped)
}
