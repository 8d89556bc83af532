// Report persistence and queries.
// Validation lives in front of every backend: `ReportStore::create` checks before it writes.

pub mod handlers;
pub mod memory;
pub mod pagination;
pub mod postgres;
pub mod store;
pub mod validation;
