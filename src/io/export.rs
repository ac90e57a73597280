//! Write results, reference templates, and personal data.
//!
//! CSV outputs use the same headers `io::ingest` reads, so a written file can
//! be fed straight back in.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Adjustments, CalculationCar, CarFfbSens, CarRecord, DrivetrainKind};
use crate::error::AppError;
use crate::personal::PersonalData;

/// Results JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub adjustments: Adjustments,
    pub cars: Vec<CarResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarResult {
    pub car_id: u32,
    pub name: String,
    pub drivetrain: DrivetrainKind,
    pub rotation: u32,
    pub weight_kg: u32,
    pub ffb_sens: CarFfbSens,
}

/// Join results with catalog attributes, in car id order.
pub fn car_results(catalog: &[CarRecord], results: &BTreeMap<u32, CarFfbSens>) -> Vec<CarResult> {
    let by_id: BTreeMap<u32, &CarRecord> = catalog.iter().map(|c| (c.info.id, c)).collect();
    results
        .iter()
        .filter_map(|(id, sens)| {
            let record = by_id.get(id)?;
            Some(CarResult {
                car_id: *id,
                name: record.name.clone(),
                drivetrain: record.info.drivetrain,
                rotation: record.info.rotation,
                weight_kg: record.info.weight_kg,
                ffb_sens: *sens,
            })
        })
        .collect()
}

pub fn write_results_csv(path: &Path, rows: &[CarResult]) -> Result<(), AppError> {
    let file = create(path, "results CSV")?;
    write_results_csv_to(file, rows)
        .map_err(|e| AppError::new(4, format!("Failed to write results CSV '{}': {e}", path.display())))
}

pub fn write_results_json(path: &Path, rows: &[CarResult], adjustments: &Adjustments) -> Result<(), AppError> {
    let file = create(path, "results JSON")?;
    let doc = ResultsFile {
        tool: "ffbsens".to_string(),
        generated_at: Utc::now(),
        adjustments: *adjustments,
        cars: rows.to_vec(),
    };
    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(4, format!("Failed to write results JSON: {e}")))
}

pub fn write_references_csv(path: &Path, cars: &[CalculationCar]) -> Result<(), AppError> {
    let file = create(path, "references CSV")?;
    write_references_csv_to(file, cars)
        .map_err(|e| AppError::new(4, format!("Failed to write references CSV '{}': {e}", path.display())))
}

pub fn write_personal_csv(path: &Path, personal: &PersonalData) -> Result<(), AppError> {
    let file = create(path, "personal CSV")?;
    write_personal_csv_to(file, personal)
        .map_err(|e| AppError::new(4, format!("Failed to write personal CSV '{}': {e}", path.display())))
}

fn create(path: &Path, what: &str) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::new(4, format!("Failed to create {what} '{}': {e}", path.display())))
}

fn write_results_csv_to<W: Write>(out: W, rows: &[CarResult]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["car_id", "name", "drivetrain", "rotation", "weight_kg", "gravel", "tarmac", "snow"])?;
    for r in rows {
        let mut record = vec![
            r.car_id.to_string(),
            r.name.clone(),
            drivetrain_cell(r.drivetrain),
            r.rotation.to_string(),
            r.weight_kg.to_string(),
        ];
        record.extend(sens_fields(&r.ffb_sens));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_references_csv_to<W: Write>(out: W, cars: &[CalculationCar]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["drivetrain", "rotation", "weight_kg", "gravel", "tarmac", "snow"])?;
    for c in cars {
        let mut record = vec![drivetrain_cell(c.drivetrain), c.rotation.to_string(), c.weight_kg.to_string()];
        record.extend(sens_fields(&c.ffb_sens));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_personal_csv_to<W: Write>(out: W, personal: &PersonalData) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["car_id", "gravel", "tarmac", "snow", "rotation"])?;
    for p in personal.cars() {
        let mut record = vec![p.car_id.to_string()];
        record.extend(sens_fields(&p.ffb_sens));
        record.push(p.rotation.map(|v| v.to_string()).unwrap_or_default());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn drivetrain_cell(kind: DrivetrainKind) -> String {
    kind.label().to_ascii_lowercase()
}

/// Gravel, tarmac and snow cells; absent values are empty.
fn sens_fields(sens: &CarFfbSens) -> [String; 3] {
    [sens.gravel, sens.tarmac, sens.snow].map(|v| v.map(|v| v.to_string()).unwrap_or_default())
}
