//! Reporting utilities: run summary, coverage, and result tables.

pub mod format;

pub use format::*;
