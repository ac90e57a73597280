//! Read/write the adjustments settings JSON.
//!
//! Missing fields fall back to `Adjustments::default()`, so older or
//! hand-written files keep loading.

use std::fs::File;
use std::path::Path;

use crate::domain::Adjustments;
use crate::error::AppError;

/// Load settings; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<Adjustments, AppError> {
    if !path.exists() {
        log::info!("settings file '{}' not found, using defaults", path.display());
        return Ok(Adjustments::default());
    }
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open settings '{}': {e}", path.display())))?;
    let settings: Adjustments =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid settings JSON: {e}")))?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Adjustments) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create settings '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, settings)
        .map_err(|e| AppError::new(4, format!("Failed to write settings JSON: {e}")))?;
    Ok(())
}
