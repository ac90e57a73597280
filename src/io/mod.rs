//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - result, reference and personal writers (`export`)
//! - settings JSON read/write (`settings`)

pub mod export;
pub mod ingest;
pub mod settings;

pub use export::*;
pub use ingest::*;
pub use settings::*;
