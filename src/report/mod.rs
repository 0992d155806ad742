//! Report module - summarizing cleaning results

pub mod decision_report;
pub mod summary;

pub use decision_report::*;
pub use summary::*;
