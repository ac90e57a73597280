//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - keys for the curve table (`Surface`, `Axis`)
//! - drivetrain normalization (`DrivetrainKind`, `DrivetrainFactors`)
//! - car records consumed by the calculation (`CalculationCar`, `CarInfo`)
//! - results and persisted settings (`CarFfbSens`, `PersonalCar`, `Adjustments`)

pub mod types;

pub use types::*;
