//! Combine the rotation-based and weight-based curves into one sensitivity.

use crate::calc::interpolate::{Curve, round_sens};
use crate::calc::reference::ReferenceCurves;
use crate::domain::{Axis, Surface};

/// Blend the two curves of one surface and round the result.
///
/// `weight_ratio` is expected to be within `[0, 1]`; `0` reads only the
/// rotation curve and `1` reads only the weight curve. Between the two, both
/// curves must yield a value or the result is `None`.
pub fn blend(
    rotation_curve: &Curve,
    weight_curve: &Curve,
    rotation_query: f64,
    weight_query: f64,
    weight_ratio: f64,
) -> Option<i32> {
    blend_normalized(rotation_curve, weight_curve, rotation_query, weight_query, weight_ratio).map(round_sens)
}

/// Same as [`blend`], without the final rounding.
pub fn blend_normalized(
    rotation_curve: &Curve,
    weight_curve: &Curve,
    rotation_query: f64,
    weight_query: f64,
    weight_ratio: f64,
) -> Option<f64> {
    if weight_ratio == 0.0 {
        return rotation_curve.interpolate(rotation_query);
    }
    if weight_ratio == 1.0 {
        return weight_curve.interpolate(weight_query);
    }

    let by_rotation = rotation_curve.interpolate(rotation_query)?;
    let by_weight = weight_curve.interpolate(weight_query)?;
    Some((1.0 - weight_ratio) * by_rotation + weight_ratio * by_weight)
}

/// Unrounded per-surface values, indexed by [`Surface::index`].
pub type NormalizedSens = [Option<f64>; 3];

/// Blend every surface for one `(rotation, weight)` pair.
///
/// The returned values are still normalized (not yet scaled by a drivetrain
/// factor) and unrounded; rounding happens once, after denormalization.
pub fn blend_surfaces(curves: &ReferenceCurves, rotation: u32, weight_kg: u32, weight_ratio: f64) -> NormalizedSens {
    let mut out = [None; 3];
    for surface in Surface::ALL {
        out[surface.index()] = blend_normalized(
            curves.curve(surface, Axis::Rotation),
            curves.curve(surface, Axis::Weight),
            f64::from(rotation),
            f64::from(weight_kg),
            weight_ratio,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::interpolate::ReferencePoint;
    use crate::domain::{CalculationCar, CarFfbSens, DrivetrainFactors, DrivetrainKind};

    fn rotation_curve() -> Curve {
        Curve::from_points(vec![ReferencePoint::new(900.0, 800.0), ReferencePoint::new(1080.0, 1000.0)])
    }

    fn weight_curve() -> Curve {
        Curve::from_points(vec![ReferencePoint::new(1200.0, 800.0), ReferencePoint::new(1500.0, 1400.0)])
    }

    #[test]
    fn ratio_zero_ignores_weight_curve() {
        let rot = rotation_curve();
        let a = blend(&rot, &weight_curve(), 990.0, 1350.0, 0.0);
        let b = blend(&rot, &Curve::default(), 990.0, 99_999.0, 0.0);
        assert_eq!(a, Some(900));
        assert_eq!(a, b);
    }

    #[test]
    fn ratio_one_ignores_rotation_curve() {
        let w = weight_curve();
        let a = blend(&rotation_curve(), &w, 990.0, 1350.0, 1.0);
        let b = blend(&Curve::default(), &w, -5.0, 1350.0, 1.0);
        assert_eq!(a, Some(1100));
        assert_eq!(a, b);
    }

    #[test]
    fn mixed_ratio_is_linear_blend() {
        // rotation -> 900, weight -> 1100
        let v = blend(&rotation_curve(), &weight_curve(), 990.0, 1350.0, 0.25);
        assert_eq!(v, Some(950));
    }

    #[test]
    fn mixed_ratio_needs_both_curves() {
        assert_eq!(blend(&rotation_curve(), &Curve::default(), 990.0, 1350.0, 0.5), None);
        assert_eq!(blend(&Curve::default(), &weight_curve(), 990.0, 1350.0, 0.5), None);
    }

    #[test]
    fn rounds_only_once_after_blending() {
        // 0.5 * 10.0 + 0.5 * 10.75 = 10.375 -> 10; rounding each side first would give 11.
        let rot = Curve::from_points(vec![ReferencePoint::new(0.0, 10.0)]);
        let w = Curve::from_points(vec![ReferencePoint::new(0.0, 10.75)]);
        assert_eq!(blend(&rot, &w, 0.0, 0.0, 0.5), Some(10));
    }

    #[test]
    fn normalized_blend_keeps_fraction() {
        let rot = Curve::from_points(vec![ReferencePoint::new(0.0, 10.0), ReferencePoint::new(4.0, 11.0)]);
        assert_eq!(blend_normalized(&rot, &Curve::default(), 1.0, 0.0, 0.0), Some(10.25));
        assert_eq!(blend(&rot, &Curve::default(), 1.0, 0.0, 0.0), Some(10));
    }

    #[test]
    fn blend_surfaces_leaves_empty_surfaces_absent() {
        let cars = [CalculationCar {
            drivetrain: DrivetrainKind::Fwd,
            rotation: 900,
            weight_kg: 1200,
            ffb_sens: CarFfbSens::new(Some(801), None, None),
        }];
        let factors = DrivetrainFactors::empty().with(DrivetrainKind::Fwd, 0.8).unwrap();
        let curves = ReferenceCurves::build(&cars, &factors).unwrap();
        let out = blend_surfaces(&curves, 900, 1200, 0.5);
        assert_eq!(out[Surface::Gravel.index()], Some(801.0 / 0.8));
        assert_eq!(out[Surface::Tarmac.index()], None);
        assert_eq!(out[Surface::Snow.index()], None);
    }
}
