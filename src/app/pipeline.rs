//! Shared calculation pipeline used by the `calc` and `apply` commands.
//!
//! load catalog/references/personal -> rotation overrides -> target selection
//! -> batch calculation -> joined result rows
//!
//! The commands then only decide what to print and what to write.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::calc::calculate_all;
use crate::domain::{Adjustments, CalculationCar, CarFfbSens, CarRecord};
use crate::error::AppError;
use crate::io::export::{CarResult, car_results};
use crate::io::ingest::{load_catalog, load_personal, load_references};
use crate::personal::{OverrideSummary, PersonalData, TargetSelection, select_targets};

/// Where a run reads its inputs from, plus the effective adjustments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub catalog_path: PathBuf,
    pub references_path: PathBuf,
    pub personal_path: Option<PathBuf>,
    pub adjustments: Adjustments,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Catalog with rotation overrides applied.
    pub catalog: Vec<CarRecord>,
    pub references: Vec<CalculationCar>,
    pub personal: PersonalData,
    pub adjustments: Adjustments,
    pub overrides: OverrideSummary,
    /// Rows skipped across all input files.
    pub skipped_rows: usize,
    pub results: BTreeMap<u32, CarFfbSens>,
    pub rows: Vec<CarResult>,
}

/// Load every input from disk and run the calculation.
pub fn run_calculation(config: &RunConfig) -> Result<RunOutput, AppError> {
    let catalog = load_catalog(&config.catalog_path)?;
    let references = load_references(&config.references_path)?;
    let (personal, personal_skipped) = match &config.personal_path {
        Some(path) => {
            let ingested = load_personal(path)?;
            (PersonalData::from_cars(ingested.items), ingested.row_errors.len())
        }
        None => (PersonalData::default(), 0),
    };

    let skipped_rows = catalog.row_errors.len() + references.row_errors.len() + personal_skipped;
    let mut output = run_calculation_with(catalog.items, references.items, personal, config.adjustments)?;
    output.skipped_rows = skipped_rows;
    Ok(output)
}

/// Run the calculation on already loaded inputs.
pub fn run_calculation_with(
    mut catalog: Vec<CarRecord>,
    references: Vec<CalculationCar>,
    personal: PersonalData,
    adjustments: Adjustments,
) -> Result<RunOutput, AppError> {
    if references.is_empty() {
        log::warn!("no reference cars; every result will be empty");
    }

    let overrides = personal.apply_rotation_overrides(&mut catalog);
    let targets = select_targets(&catalog, TargetSelection::from_option(adjustments.target_car_id))?;

    let factors = adjustments.drivetrain_factors()?;
    let results = calculate_all(&targets, adjustments.weight_ratio(), &factors, &references)?;
    log::info!("computed sensitivities for {} car(s)", results.len());

    let rows = car_results(&catalog, &results);

    Ok(RunOutput {
        catalog,
        references,
        personal,
        adjustments,
        overrides,
        skipped_rows: 0,
        results,
        rows,
    })
}
