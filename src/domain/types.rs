//! Shared domain types.
//!
//! These types are plain data records so they can be:
//!
//! - read from catalog / reference / personal CSV files
//! - passed through the calculation core unchanged
//! - exported to JSON/CSV

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Smallest sensitivity the simulator accepts.
pub const FFB_SENS_MIN: i32 = 10;
/// Largest sensitivity the simulator accepts.
pub const FFB_SENS_MAX: i32 = 5000;

/// Which wheels are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrivetrainKind {
    Fwd,
    Rwd,
    Awd,
}

impl DrivetrainKind {
    pub const ALL: [DrivetrainKind; 3] = [DrivetrainKind::Fwd, DrivetrainKind::Rwd, DrivetrainKind::Awd];

    pub fn label(self) -> &'static str {
        match self {
            DrivetrainKind::Fwd => "FWD",
            DrivetrainKind::Rwd => "RWD",
            DrivetrainKind::Awd => "AWD",
        }
    }

    fn index(self) -> usize {
        match self {
            DrivetrainKind::Fwd => 0,
            DrivetrainKind::Rwd => 1,
            DrivetrainKind::Awd => 2,
        }
    }
}

impl fmt::Display for DrivetrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DrivetrainKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fwd" => Ok(DrivetrainKind::Fwd),
            "rwd" => Ok(DrivetrainKind::Rwd),
            // Catalog exports label all-wheel drive either way.
            "awd" | "4wd" => Ok(DrivetrainKind::Awd),
            other => Err(format!("Unknown drivetrain '{other}'. Expected one of: fwd, rwd, awd.")),
        }
    }
}

/// Surface type a sensitivity applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Gravel,
    Tarmac,
    Snow,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Gravel, Surface::Tarmac, Surface::Snow];

    pub fn index(self) -> usize {
        match self {
            Surface::Gravel => 0,
            Surface::Tarmac => 1,
            Surface::Snow => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Surface::Gravel => "gravel",
            Surface::Tarmac => "tarmac",
            Surface::Snow => "snow",
        }
    }
}

/// Independent variable a reference curve is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Lock-to-lock steering rotation.
    Rotation,
    /// Vehicle weight in kg.
    Weight,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Rotation, Axis::Weight];

    pub fn index(self) -> usize {
        match self {
            Axis::Rotation => 0,
            Axis::Weight => 1,
        }
    }
}

/// Per-drivetrain normalization factors (fractions, not percentages).
///
/// A kind may be missing; looking it up then fails with
/// [`CalcError::MissingDrivetrainFactor`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrivetrainFactors {
    factors: [Option<f64>; 3],
}

impl DrivetrainFactors {
    /// Complete mapping from fractions.
    pub fn new(fwd: f64, rwd: f64, awd: f64) -> Result<Self, CalcError> {
        Self::empty()
            .with(DrivetrainKind::Fwd, fwd)?
            .with(DrivetrainKind::Rwd, rwd)?
            .with(DrivetrainKind::Awd, awd)
    }

    /// Complete mapping from user-facing percentages (`100` = factor `1.0`).
    pub fn from_percent(fwd: f64, rwd: f64, awd: f64) -> Result<Self, CalcError> {
        Self::new(fwd / 100.0, rwd / 100.0, awd / 100.0)
    }

    /// Mapping with no kinds at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return a copy with `kind` set to `factor`.
    pub fn with(mut self, kind: DrivetrainKind, factor: f64) -> Result<Self, CalcError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(CalcError::InvalidDrivetrainFactor { kind, value: factor });
        }
        self.factors[kind.index()] = Some(factor);
        Ok(self)
    }

    pub fn get(&self, kind: DrivetrainKind) -> Option<f64> {
        self.factors[kind.index()]
    }

    /// Factor for `kind`, or an error if the mapping lacks it.
    pub fn factor(&self, kind: DrivetrainKind) -> Result<f64, CalcError> {
        self.get(kind).ok_or(CalcError::MissingDrivetrainFactor(kind))
    }
}

/// Sensitivity triple for one car. `None` means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarFfbSens {
    pub gravel: Option<i32>,
    pub tarmac: Option<i32>,
    pub snow: Option<i32>,
}

impl CarFfbSens {
    pub fn new(gravel: Option<i32>, tarmac: Option<i32>, snow: Option<i32>) -> Self {
        Self { gravel, tarmac, snow }
    }

    pub fn get(&self, surface: Surface) -> Option<i32> {
        match surface {
            Surface::Gravel => self.gravel,
            Surface::Tarmac => self.tarmac,
            Surface::Snow => self.snow,
        }
    }

    pub fn set(&mut self, surface: Surface, value: Option<i32>) {
        match surface {
            Surface::Gravel => self.gravel = value,
            Surface::Tarmac => self.tarmac = value,
            Surface::Snow => self.snow = value,
        }
    }

    pub fn has_any(&self) -> bool {
        Surface::ALL.iter().any(|s| self.get(*s).is_some())
    }

    pub fn is_complete(&self) -> bool {
        Surface::ALL.iter().all(|s| self.get(*s).is_some())
    }
}

/// A reference car: known sensitivities at a known rotation and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationCar {
    pub drivetrain: DrivetrainKind,
    /// Maximum steering lock, in degrees lock-to-lock.
    pub rotation: u32,
    pub weight_kg: u32,
    pub ffb_sens: CarFfbSens,
}

/// A target car from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarInfo {
    pub id: u32,
    pub drivetrain: DrivetrainKind,
    pub rotation: u32,
    pub weight_kg: u32,
}

/// A catalog row: the calculation attributes plus a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub info: CarInfo,
    pub name: String,
}

/// Per-car personal data: stored sensitivities and an optional rotation override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalCar {
    pub car_id: u32,
    pub ffb_sens: CarFfbSens,
    pub rotation: Option<u32>,
}

/// User adjustments, persisted between runs.
///
/// Values are percentages as the user enters them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// `0` = rotation curve only, `100` = weight curve only.
    pub weight_ratio_percent: f64,
    pub fwd_percent: f64,
    pub rwd_percent: f64,
    pub awd_percent: f64,
    /// Restrict calculation to a single catalog car.
    pub target_car_id: Option<u32>,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            weight_ratio_percent: 0.0,
            fwd_percent: 100.0,
            rwd_percent: 100.0,
            awd_percent: 100.0,
            target_car_id: None,
        }
    }
}

impl Adjustments {
    pub fn weight_ratio(&self) -> f64 {
        self.weight_ratio_percent / 100.0
    }

    pub fn drivetrain_factors(&self) -> Result<DrivetrainFactors, CalcError> {
        DrivetrainFactors::from_percent(self.fwd_percent, self.rwd_percent, self.awd_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drivetrain_parses_case_insensitive() {
        assert_eq!("FWD".parse::<DrivetrainKind>().unwrap(), DrivetrainKind::Fwd);
        assert_eq!(" rwd ".parse::<DrivetrainKind>().unwrap(), DrivetrainKind::Rwd);
        assert_eq!("4WD".parse::<DrivetrainKind>().unwrap(), DrivetrainKind::Awd);
        assert!("xwd".parse::<DrivetrainKind>().is_err());
    }

    #[test]
    fn factors_from_percent() {
        let f = DrivetrainFactors::from_percent(100.0, 80.0, 120.0).unwrap();
        assert!((f.factor(DrivetrainKind::Fwd).unwrap() - 1.0).abs() < 1e-12);
        assert!((f.factor(DrivetrainKind::Rwd).unwrap() - 0.8).abs() < 1e-12);
        assert!((f.factor(DrivetrainKind::Awd).unwrap() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn factors_reject_non_positive() {
        let err = DrivetrainFactors::new(1.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            CalcError::InvalidDrivetrainFactor { kind: DrivetrainKind::Rwd, .. }
        ));
        assert!(DrivetrainFactors::empty().with(DrivetrainKind::Awd, f64::NAN).is_err());
    }

    #[test]
    fn missing_factor_is_reported() {
        let f = DrivetrainFactors::empty().with(DrivetrainKind::Fwd, 1.0).unwrap();
        assert_eq!(
            f.factor(DrivetrainKind::Awd),
            Err(CalcError::MissingDrivetrainFactor(DrivetrainKind::Awd))
        );
    }

    #[test]
    fn ffb_sens_accessors() {
        let mut s = CarFfbSens::default();
        assert!(!s.has_any());
        s.set(Surface::Snow, Some(300));
        assert_eq!(s.get(Surface::Snow), Some(300));
        assert!(s.has_any());
        assert!(!s.is_complete());
        s.set(Surface::Gravel, Some(1));
        s.set(Surface::Tarmac, Some(2));
        assert!(s.is_complete());
    }

    #[test]
    fn adjustments_defaults() {
        let a = Adjustments::default();
        assert_eq!(a.weight_ratio(), 0.0);
        let f = a.drivetrain_factors().unwrap();
        for kind in DrivetrainKind::ALL {
            assert_eq!(f.get(kind), Some(1.0));
        }
    }
}
