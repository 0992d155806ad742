//! c3sclean: CCS Database Cleaning Library
//!
//! A library for deduplicating collision cross-section measurements:
//! grouping replicate records, removing outliers by relative dispersion,
//! and writing the reconciled records into a fresh database.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
