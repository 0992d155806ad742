//! Pipeline module - grouping, reconciliation, and database I/O

pub mod clean;
pub mod error;
pub mod grouping;
pub mod policy;
pub mod record;
pub mod schema;
pub mod stats;
pub mod store;

pub use clean::*;
pub use error::*;
pub use grouping::*;
pub use policy::*;
pub use record::*;
pub use schema::*;
pub use stats::*;
pub use store::*;
