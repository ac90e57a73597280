//! CSV ingest and validation.
//!
//! Three inputs feed a run:
//!
//! - the car catalog (`id,name,drivetrain,rotation,weight_kg`)
//! - the reference cars (`drivetrain,rotation,weight_kg,gravel,tarmac,snow`)
//! - the personal file (`car_id,gravel,tarmac,snow,rotation`)
//!
//! Headers are matched case-insensitively. Bad rows are skipped and reported
//! with their line number instead of failing the whole file.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{CalculationCar, CarFfbSens, CarInfo, CarRecord, FFB_SENS_MAX, FFB_SENS_MIN, PersonalCar, Surface};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Parsed rows plus what went wrong along the way.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub items: Vec<T>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl<T> Ingested<T> {
    fn log_row_errors(&self, what: &str) {
        for e in &self.row_errors {
            log::warn!("{what} line {}: {}", e.line, e.message);
        }
    }
}

pub fn load_catalog(path: &Path) -> Result<Ingested<CarRecord>, AppError> {
    let ingested = read_catalog(open(path, "catalog")?)?;
    ingested.log_row_errors("catalog");
    Ok(ingested)
}

pub fn load_references(path: &Path) -> Result<Ingested<CalculationCar>, AppError> {
    let ingested = read_references(open(path, "references")?)?;
    ingested.log_row_errors("references");
    Ok(ingested)
}

/// Load the personal file; a missing file reads as zero rows.
pub fn load_personal(path: &Path) -> Result<Ingested<PersonalCar>, AppError> {
    if !path.exists() {
        log::info!("personal file '{}' does not exist yet", path.display());
        return Ok(Ingested {
            items: Vec::new(),
            row_errors: Vec::new(),
            rows_read: 0,
        });
    }
    let ingested = read_personal(open(path, "personal")?)?;
    ingested.log_row_errors("personal");
    Ok(ingested)
}

/// Read the car catalog. Fails if no row is usable.
pub fn read_catalog<R: Read>(reader: R) -> Result<Ingested<CarRecord>, AppError> {
    let mut seen = HashSet::new();
    let ingested = read_rows(reader, &["id", "drivetrain", "rotation", "weight_kg"], |record, headers| {
        let info = CarInfo {
            id: parse_u32(get_required(record, headers, "id")?, "id")?,
            drivetrain: get_required(record, headers, "drivetrain")?.parse()?,
            rotation: parse_u32(get_required(record, headers, "rotation")?, "rotation")?,
            weight_kg: parse_u32(get_required(record, headers, "weight_kg")?, "weight_kg")?,
        };
        if !seen.insert(info.id) {
            return Err(format!("Duplicate car id {}", info.id));
        }
        let name = get_optional(record, headers, "name").unwrap_or_default().to_string();
        Ok(CarRecord { info, name })
    })?;

    if ingested.items.is_empty() {
        return Err(AppError::new(3, "No valid cars in the catalog."));
    }
    Ok(ingested)
}

/// Read reference cars. Sensitivity cells may be blank.
pub fn read_references<R: Read>(reader: R) -> Result<Ingested<CalculationCar>, AppError> {
    read_rows(reader, &["drivetrain", "rotation", "weight_kg"], |record, headers| {
        let mut ffb_sens = CarFfbSens::default();
        for surface in Surface::ALL {
            let value = parse_opt_i32(get_optional(record, headers, surface.name()), surface.name())?;
            if let Some(v) = value {
                check_sens_range(v, surface)?;
            }
            ffb_sens.set(surface, value);
        }

        Ok(CalculationCar {
            drivetrain: get_required(record, headers, "drivetrain")?.parse()?,
            rotation: parse_u32(get_required(record, headers, "rotation")?, "rotation")?,
            weight_kg: parse_u32(get_required(record, headers, "weight_kg")?, "weight_kg")?,
            ffb_sens,
        })
    })
}

/// Read personal records. A later row for the same car wins.
pub fn read_personal<R: Read>(reader: R) -> Result<Ingested<PersonalCar>, AppError> {
    read_rows(reader, &["car_id"], |record, headers| {
        let mut ffb_sens = CarFfbSens::default();
        for surface in Surface::ALL {
            ffb_sens.set(
                surface,
                parse_opt_i32(get_optional(record, headers, surface.name()), surface.name())?,
            );
        }
        let rotation = get_optional(record, headers, "rotation")
            .map(|s| parse_u32(s, "rotation"))
            .transpose()?;

        Ok(PersonalCar {
            car_id: parse_u32(get_required(record, headers, "car_id")?, "car_id")?,
            ffb_sens,
            rotation,
        })
    })
}

fn open(path: &Path, what: &str) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open {what} CSV '{}': {e}", path.display())))
}

fn read_rows<R, T, F>(reader: R, required: &[&str], mut parse: F) -> Result<Ingested<T>, AppError>
where
    R: Read,
    F: FnMut(&StringRecord, &HashMap<String, usize>) -> Result<T, String>,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }

    let mut items = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers.
        let line = idx + 2;
        rows_read += 1;

        let outcome = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse(&record, &header_map));
        match outcome {
            Ok(item) => items.push(item),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(Ingested {
        items,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_u32(s: &str, name: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("Invalid `{name}` '{s}': expected a non-negative integer."))
}

fn parse_opt_i32(s: Option<&str>, name: &str) -> Result<Option<i32>, String> {
    s.map(|s| {
        s.parse::<i32>()
            .map_err(|_| format!("Invalid `{name}` '{s}': expected an integer."))
    })
    .transpose()
}

fn check_sens_range(value: i32, surface: Surface) -> Result<(), String> {
    if (FFB_SENS_MIN..=FFB_SENS_MAX).contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "`{}` sensitivity {value} is outside {FFB_SENS_MIN}..={FFB_SENS_MAX}.",
            surface.name()
        ))
    }
}
