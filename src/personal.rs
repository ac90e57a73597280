//! Personal per-car data and target selection.
//!
//! The personal file holds what the user (or a previous `apply`) stored for
//! each car: a sensitivity triple and an optional lock-to-lock rotation
//! override. This module only manipulates the in-memory form; reading lives
//! in `io::ingest` and writing in `io::export`.

use std::collections::BTreeMap;

use crate::domain::{CarFfbSens, CarInfo, CarRecord, PersonalCar};
use crate::error::AppError;

/// Which catalog cars a run computes sensitivities for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelection {
    All,
    Single(u32),
}

impl TargetSelection {
    pub fn from_option(car_id: Option<u32>) -> Self {
        match car_id {
            Some(id) => TargetSelection::Single(id),
            None => TargetSelection::All,
        }
    }
}

/// Resolve the target cars for a run.
pub fn select_targets(catalog: &[CarRecord], selection: TargetSelection) -> Result<Vec<CarInfo>, AppError> {
    match selection {
        TargetSelection::All => Ok(catalog.iter().map(|c| c.info).collect()),
        TargetSelection::Single(id) => catalog
            .iter()
            .find(|c| c.info.id == id)
            .map(|c| vec![c.info])
            .ok_or_else(|| AppError::new(2, format!("Target car {id} is not in the catalog."))),
    }
}

/// Personal records keyed by car id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalData {
    cars: BTreeMap<u32, PersonalCar>,
}

/// Outcome of [`PersonalData::apply_rotation_overrides`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideSummary {
    pub applied: usize,
    /// Personal records whose car id is not in the catalog.
    pub unknown: usize,
}

impl PersonalData {
    pub fn from_cars(cars: impl IntoIterator<Item = PersonalCar>) -> Self {
        Self {
            cars: cars.into_iter().map(|c| (c.car_id, c)).collect(),
        }
    }

    pub fn get(&self, car_id: u32) -> Option<&PersonalCar> {
        self.cars.get(&car_id)
    }

    pub fn cars(&self) -> impl Iterator<Item = &PersonalCar> {
        self.cars.values()
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Replace each catalog car's rotation with the personal override, if any.
    pub fn apply_rotation_overrides(&self, catalog: &mut [CarRecord]) -> OverrideSummary {
        let mut summary = OverrideSummary::default();

        for record in catalog.iter_mut() {
            if let Some(rotation) = self.cars.get(&record.info.id).and_then(|p| p.rotation) {
                record.info.rotation = rotation;
                summary.applied += 1;
            }
        }

        summary.unknown = self
            .cars
            .keys()
            .filter(|id| !catalog.iter().any(|c| c.info.id == **id))
            .count();
        if summary.unknown > 0 {
            log::warn!("{} personal record(s) refer to cars missing from the catalog", summary.unknown);
        }

        summary
    }

    /// Store computed results, replacing each car's triple wholesale.
    pub fn apply_results(&mut self, results: &BTreeMap<u32, CarFfbSens>) {
        for (&car_id, &ffb_sens) in results {
            self.cars
                .entry(car_id)
                .or_insert_with(|| PersonalCar {
                    car_id,
                    ..PersonalCar::default()
                })
                .ffb_sens = ffb_sens;
        }
    }

    /// Forget all stored sensitivities; rotation overrides are kept.
    pub fn clear_sensitivities(&mut self) {
        for car in self.cars.values_mut() {
            car.ffb_sens = CarFfbSens::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DrivetrainKind;

    fn record(id: u32, rotation: u32) -> CarRecord {
        CarRecord {
            info: CarInfo {
                id,
                drivetrain: DrivetrainKind::Fwd,
                rotation,
                weight_kg: 1100,
            },
            name: format!("Car {id}"),
        }
    }

    #[test]
    fn selects_all_or_single() {
        let catalog = vec![record(1, 900), record(2, 540)];
        assert_eq!(select_targets(&catalog, TargetSelection::All).unwrap().len(), 2);

        let single = select_targets(&catalog, TargetSelection::Single(2)).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].id, 2);

        let err = select_targets(&catalog, TargetSelection::Single(9)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn rotation_overrides_apply_to_known_cars() {
        let mut catalog = vec![record(1, 900), record(2, 540)];
        let personal = PersonalData::from_cars([
            PersonalCar {
                car_id: 2,
                ffb_sens: CarFfbSens::default(),
                rotation: Some(720),
            },
            PersonalCar {
                car_id: 1,
                ffb_sens: CarFfbSens::new(Some(500), None, None),
                rotation: None,
            },
            PersonalCar {
                car_id: 77,
                ffb_sens: CarFfbSens::default(),
                rotation: Some(360),
            },
        ]);

        let summary = personal.apply_rotation_overrides(&mut catalog);
        assert_eq!(summary, OverrideSummary { applied: 1, unknown: 1 });
        assert_eq!(catalog[0].info.rotation, 900);
        assert_eq!(catalog[1].info.rotation, 720);
    }

    #[test]
    fn apply_results_replaces_triples_and_adds_records() {
        let mut personal = PersonalData::from_cars([PersonalCar {
            car_id: 1,
            ffb_sens: CarFfbSens::new(Some(100), Some(200), Some(300)),
            rotation: Some(800),
        }]);

        let mut results = BTreeMap::new();
        results.insert(1, CarFfbSens::new(Some(150), None, None));
        results.insert(5, CarFfbSens::new(None, Some(600), None));
        personal.apply_results(&results);

        let one = personal.get(1).unwrap();
        assert_eq!(one.ffb_sens, CarFfbSens::new(Some(150), None, None));
        assert_eq!(one.rotation, Some(800));
        assert_eq!(personal.get(5).unwrap().ffb_sens.tarmac, Some(600));
        assert_eq!(personal.len(), 2);
    }

    #[test]
    fn clear_keeps_rotation_overrides() {
        let mut personal = PersonalData::from_cars([PersonalCar {
            car_id: 3,
            ffb_sens: CarFfbSens::new(Some(1), Some(2), Some(3)),
            rotation: Some(540),
        }]);
        personal.clear_sensitivities();
        let car = personal.get(3).unwrap();
        assert!(!car.ffb_sens.has_any());
        assert_eq!(car.rotation, Some(540));
    }
}
