//! `ffb-sens` library crate.
//!
//! The binary (`ffbsens`) is a thin wrapper around this library so that:
//!
//! - the calculation core is testable without spawning processes
//! - the core (`calc`) can be embedded by other front-ends
//! - file handling stays separate from the math

pub mod app;
pub mod calc;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod personal;
pub mod report;
