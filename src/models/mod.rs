//! Data models for package records and report entries

mod entry;
mod record;

pub use entry::*;
pub use record::*;
