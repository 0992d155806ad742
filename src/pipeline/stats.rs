//! Dispersion statistics and outlier reconciliation for CCS samples

/// Relative dispersion (in percent) below which replicate values are treated
/// as the same measurement.
pub const CONSENSUS_RSD_PERCENT: f64 = 1.0;

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// A single representative value that applies to every input position
    Consensus(f64),
    /// No consensus; the original values, in input order
    Distinct(Vec<f64>),
}

/// Leaf size below which [`pairwise_sum`] stops splitting
const PAIRWISE_BLOCK: usize = 128;

/// Sum with the blocked pairwise scheme used by NumPy's `add.reduce`.
///
/// Fewer than 8 values are added in order. Up to [`PAIRWISE_BLOCK`] values go
/// through 8 interleaved accumulators combined as a balanced tree, with the
/// tail added in order. Longer slices split at a multiple of 8 near the middle.
/// Matching this order keeps group means bit-identical to the database tooling.
pub fn pairwise_sum(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 8 {
        values.iter().fold(0.0, |acc, v| acc + v)
    } else if n <= PAIRWISE_BLOCK {
        let mut r = [0.0; 8];
        r.copy_from_slice(&values[..8]);
        let blocked = n - n % 8;
        for chunk in values[8..blocked].chunks_exact(8) {
            for (acc, v) in r.iter_mut().zip(chunk) {
                *acc += v;
            }
        }
        let tree = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
        values[blocked..].iter().fold(tree, |acc, v| acc + v)
    } else {
        let mut split = n / 2;
        split -= split % 8;
        pairwise_sum(&values[..split]) + pairwise_sum(&values[split..])
    }
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    pairwise_sum(values) / values.len() as f64
}

/// Population standard deviation (divides by N, not N - 1).
pub fn population_std_dev(values: &[f64]) -> f64 {
    let center = mean(values);
    let squared: Vec<f64> = values.iter().map(|v| (v - center) * (v - center)).collect();
    (pairwise_sum(&squared) / values.len() as f64).sqrt()
}

/// Relative standard deviation of a sample, as a percentage of its mean.
///
/// The caller guarantees a non-empty sample. A zero mean produces NaN or an
/// infinity rather than an error; see [`crate::pipeline::decide_group`] for
/// where that is caught.
pub fn relative_dispersion(values: &[f64]) -> f64 {
    population_std_dev(values) / mean(values) * 100.0
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Strip values more than one standard deviation from the mean and decide
/// whether what remains agrees on a single value.
///
/// Samples of two or fewer values are returned untouched. Otherwise the first
/// filtering pass that removes anything settles the outcome: the mean of the
/// survivors is returned whenever their dispersion is below
/// [`CONSENSUS_RSD_PERCENT`] or their count differs from the input count. A pass
/// that removes nothing ends the search with the original values.
pub fn reconcile(values: &[f64]) -> Reconciled {
    let mut working = values.to_vec();

    while working.len() > 2 {
        let center = mean(&working);
        let spread = population_std_dev(&working);
        let filtered: Vec<f64> = working
            .iter()
            .copied()
            .filter(|v| (v - center).abs() <= spread)
            .collect();

        if filtered.len() == working.len() {
            break;
        }
        working = filtered;

        if relative_dispersion(&working) < CONSENSUS_RSD_PERCENT {
            return Reconciled::Consensus(mean(&working));
        }
        // Size changed but dispersion is still high: accepted as consensus anyway.
        if working.len() != values.len() {
            return Reconciled::Consensus(mean(&working));
        }
    }

    Reconciled::Distinct(values.to_vec())
}
