//! Session registry
//!
//! Groups uploaded file records under client-chosen session identifiers.
//! State lives in memory for the lifetime of the process.

pub mod registry;
pub mod types;

pub use registry::SessionRegistry;
pub use types::FileRecord;
