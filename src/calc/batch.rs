//! Batch calculation over a whole catalog.
//!
//! Target cars sharing `(drivetrain, rotation, weight)` always get the same
//! result, so each such group is evaluated once and fanned back out to its
//! car ids.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::calc::blend::{NormalizedSens, blend_surfaces};
use crate::calc::interpolate::round_sens;
use crate::calc::reference::ReferenceCurves;
use crate::domain::{CalculationCar, CarFfbSens, CarInfo, DrivetrainFactors, DrivetrainKind, Surface};
use crate::error::CalcError;

/// Parameter name reported when the weight ratio is out of range.
pub const WEIGHT_RATIO_PARAM: &str = "weight_ratio";

type GroupKey = (DrivetrainKind, u32, u32);

/// Compute sensitivities for every target car.
///
/// Either every car gets an entry (values may be absent per surface) or the
/// whole call fails.
pub fn calculate_all<'a, I>(
    cars: I,
    weight_ratio: f64,
    factors: &DrivetrainFactors,
    reference_cars: &[CalculationCar],
) -> Result<BTreeMap<u32, CarFfbSens>, CalcError>
where
    I: IntoIterator<Item = &'a CarInfo>,
{
    if !(0.0..=1.0).contains(&weight_ratio) {
        return Err(CalcError::WeightRatioOutOfRange {
            parameter: WEIGHT_RATIO_PARAM,
            value: weight_ratio,
        });
    }

    let curves = ReferenceCurves::build(reference_cars, factors)?;
    for surface in Surface::ALL {
        log::debug!(
            "{} reference curve: {} point(s)",
            surface.name(),
            curves.point_count(surface)
        );
    }

    let mut groups: BTreeMap<GroupKey, Vec<u32>> = BTreeMap::new();
    for car in cars {
        groups
            .entry((car.drivetrain, car.rotation, car.weight_kg))
            .or_default()
            .push(car.id);
    }
    log::debug!("evaluating {} car group(s)", groups.len());

    let evaluated: Vec<(Vec<u32>, CarFfbSens)> = groups
        .into_par_iter()
        .map(|((drivetrain, rotation, weight_kg), ids)| {
            let factor = factors.factor(drivetrain)?;
            let normalized = blend_surfaces(&curves, rotation, weight_kg, weight_ratio);
            Ok::<_, CalcError>((ids, denormalize(normalized, factor)))
        })
        .collect::<Result<_, _>>()?;

    let mut out = BTreeMap::new();
    for (ids, sens) in evaluated {
        for id in ids {
            out.insert(id, sens);
        }
    }
    Ok(out)
}

/// Scale normalized values back by a drivetrain factor, then round.
fn denormalize(sens: NormalizedSens, factor: f64) -> CarFfbSens {
    let mut out = CarFfbSens::default();
    for surface in Surface::ALL {
        out.set(surface, sens[surface.index()].map(|v| round_sens(v * factor)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(drivetrain: DrivetrainKind, rotation: u32, weight_kg: u32, gravel: Option<i32>) -> CalculationCar {
        CalculationCar {
            drivetrain,
            rotation,
            weight_kg,
            ffb_sens: CarFfbSens::new(gravel, None, None),
        }
    }

    fn target(id: u32, drivetrain: DrivetrainKind, rotation: u32, weight_kg: u32) -> CarInfo {
        CarInfo {
            id,
            drivetrain,
            rotation,
            weight_kg,
        }
    }

    fn fwd_only() -> DrivetrainFactors {
        DrivetrainFactors::empty().with(DrivetrainKind::Fwd, 1.0).unwrap()
    }

    fn car_a_b() -> Vec<CalculationCar> {
        vec![
            reference(DrivetrainKind::Fwd, 900, 1200, Some(800)),
            reference(DrivetrainKind::Fwd, 1080, 1500, Some(1000)),
        ]
    }

    #[test]
    fn rejects_out_of_range_weight_ratio() {
        let cars = [target(1, DrivetrainKind::Fwd, 900, 1200)];
        for ratio in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let err = calculate_all(&cars, ratio, &fwd_only(), &car_a_b()).unwrap_err();
            assert!(matches!(
                err,
                CalcError::WeightRatioOutOfRange { parameter: WEIGHT_RATIO_PARAM, .. }
            ));
        }
    }

    #[test]
    fn range_is_checked_before_factors() {
        let cars = [target(1, DrivetrainKind::Awd, 900, 1200)];
        let err = calculate_all(&cars, 2.0, &DrivetrainFactors::empty(), &car_a_b()).unwrap_err();
        assert!(matches!(err, CalcError::WeightRatioOutOfRange { .. }));
    }

    #[test]
    fn rotation_midpoint() {
        let cars = [target(7, DrivetrainKind::Fwd, 990, 9999)];
        let out = calculate_all(&cars, 0.0, &fwd_only(), &car_a_b()).unwrap();
        assert_eq!(out[&7].gravel, Some(900));
        assert_eq!(out[&7].tarmac, None);
        assert_eq!(out[&7].snow, None);
    }

    #[test]
    fn weight_midpoint() {
        let cars = [target(7, DrivetrainKind::Fwd, 1, 1350)];
        let out = calculate_all(&cars, 1.0, &fwd_only(), &car_a_b()).unwrap();
        assert_eq!(out[&7].gravel, Some(900));
    }

    #[test]
    fn missing_target_factor_fails_without_partial_output() {
        let cars = [
            target(1, DrivetrainKind::Fwd, 990, 1350),
            target(2, DrivetrainKind::Rwd, 990, 1350),
        ];
        let result = calculate_all(&cars, 0.5, &fwd_only(), &car_a_b());
        assert_eq!(result, Err(CalcError::MissingDrivetrainFactor(DrivetrainKind::Rwd)));
    }

    #[test]
    fn same_drivetrain_round_trips_reference_value() {
        let factors = DrivetrainFactors::new(1.0, 0.8, 1.25).unwrap();
        let references = [CalculationCar {
            drivetrain: DrivetrainKind::Awd,
            rotation: 720,
            weight_kg: 1300,
            ffb_sens: CarFfbSens::new(Some(850), Some(640), Some(1210)),
        }];
        let cars = [target(3, DrivetrainKind::Awd, 720, 1300)];
        for ratio in [0.0, 0.3, 1.0] {
            let out = calculate_all(&cars, ratio, &factors, &references).unwrap();
            assert_eq!(out[&3], CarFfbSens::new(Some(850), Some(640), Some(1210)));
        }
    }

    #[test]
    fn round_trip_holds_for_factors_above_one() {
        let references = [reference(DrivetrainKind::Fwd, 900, 1200, Some(1000))];
        let cars = [target(5, DrivetrainKind::Fwd, 900, 1200)];
        for factor in [1.5, 3.0] {
            let factors = DrivetrainFactors::empty().with(DrivetrainKind::Fwd, factor).unwrap();
            for ratio in [0.0, 0.5, 1.0] {
                let out = calculate_all(&cars, ratio, &factors, &references).unwrap();
                assert_eq!(out[&5].gravel, Some(1000), "factor {factor}, ratio {ratio}");
            }
        }
    }

    #[test]
    fn cross_drivetrain_rounds_once() {
        // 1002 / 4.0 = 250.5 normalized; rounding that before scaling would give 502.
        let factors = DrivetrainFactors::new(4.0, 2.0, 1.0).unwrap();
        let references = [reference(DrivetrainKind::Fwd, 900, 1200, Some(1002))];
        let cars = [target(6, DrivetrainKind::Rwd, 900, 1200)];
        let out = calculate_all(&cars, 0.0, &factors, &references).unwrap();
        assert_eq!(out[&6].gravel, Some(501));
    }

    #[test]
    fn drivetrain_factor_scales_output() {
        let factors = DrivetrainFactors::new(1.0, 1.5, 1.0).unwrap();
        let cars = [target(1, DrivetrainKind::Rwd, 990, 1350)];
        let out = calculate_all(&cars, 0.0, &factors, &car_a_b()).unwrap();
        assert_eq!(out[&1].gravel, Some(1350));
    }

    #[test]
    fn identical_attributes_share_results() {
        let cars = [
            target(10, DrivetrainKind::Fwd, 950, 1250),
            target(11, DrivetrainKind::Fwd, 950, 1250),
            target(12, DrivetrainKind::Fwd, 1000, 1250),
        ];
        let out = calculate_all(&cars, 0.4, &fwd_only(), &car_a_b()).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[&10], out[&11]);
        assert!(out[&12].gravel.is_some());
    }

    #[test]
    fn surface_without_references_is_absent_for_every_ratio() {
        let cars = [
            target(1, DrivetrainKind::Fwd, 900, 1200),
            target(2, DrivetrainKind::Fwd, 1200, 2000),
        ];
        for ratio in [0.0, 0.5, 1.0] {
            let out = calculate_all(&cars, ratio, &fwd_only(), &car_a_b()).unwrap();
            for sens in out.values() {
                assert_eq!(sens.snow, None);
                assert_eq!(sens.tarmac, None);
            }
        }
    }

    #[test]
    fn no_targets_gives_empty_map() {
        let cars: [CarInfo; 0] = [];
        let out = calculate_all(&cars, 0.5, &fwd_only(), &car_a_b()).unwrap();
        assert!(out.is_empty());
    }
}
