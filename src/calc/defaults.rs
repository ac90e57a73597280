//! Starting reference templates for a fresh setup.

use crate::domain::{CalculationCar, CarFfbSens, CarInfo, DrivetrainKind};

/// Weights used when the catalog is empty.
const FALLBACK_WEIGHTS_KG: [u32; 2] = [500, 1000];

/// Two reference templates spanning the catalog, with no sensitivities set.
///
/// The first sits at the lowest rotation and weight in `catalog`, the second
/// at the highest.
pub fn default_reference_cars(catalog: &[CarInfo]) -> [CalculationCar; 2] {
    let rotation_min = catalog.iter().map(|c| c.rotation).min().unwrap_or(0);
    let rotation_max = catalog.iter().map(|c| c.rotation).max().unwrap_or(0);
    let weight_min = catalog.iter().map(|c| c.weight_kg).min().unwrap_or(FALLBACK_WEIGHTS_KG[0]);
    let weight_max = catalog.iter().map(|c| c.weight_kg).max().unwrap_or(FALLBACK_WEIGHTS_KG[1]);

    [
        template(rotation_min, weight_min),
        template(rotation_max, weight_max),
    ]
}

fn template(rotation: u32, weight_kg: u32) -> CalculationCar {
    CalculationCar {
        drivetrain: DrivetrainKind::Rwd,
        rotation,
        weight_kg,
        ffb_sens: CarFfbSens::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_catalog_extremes() {
        let catalog = [
            CarInfo { id: 1, drivetrain: DrivetrainKind::Fwd, rotation: 540, weight_kg: 1400 },
            CarInfo { id: 2, drivetrain: DrivetrainKind::Awd, rotation: 900, weight_kg: 980 },
            CarInfo { id: 3, drivetrain: DrivetrainKind::Rwd, rotation: 720, weight_kg: 1230 },
        ];
        let [low, high] = default_reference_cars(&catalog);
        assert_eq!((low.rotation, low.weight_kg), (540, 980));
        assert_eq!((high.rotation, high.weight_kg), (900, 1400));
        assert!(!low.ffb_sens.has_any());
        assert!(!high.ffb_sens.has_any());
    }

    #[test]
    fn empty_catalog_uses_fallbacks() {
        let [low, high] = default_reference_cars(&[]);
        assert_eq!((low.rotation, low.weight_kg), (0, 500));
        assert_eq!((high.rotation, high.weight_kg), (0, 1000));
    }
}
