//! Reference curve construction.
//!
//! Every reference car contributes one point per surface it has a
//! sensitivity for, to both the rotation curve and the weight curve of that
//! surface. Sensitivities are divided by the car's drivetrain factor so cars
//! of different drivetrains share one curve.

use crate::calc::interpolate::{Curve, ReferencePoint};
use crate::domain::{Axis, CalculationCar, DrivetrainFactors, Surface};
use crate::error::CalcError;

/// The six curves, keyed by `(Surface, Axis)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceCurves {
    curves: [[Curve; 2]; 3],
}

impl ReferenceCurves {
    /// Build all curves from `cars`.
    ///
    /// Fails if any car's drivetrain is missing from `factors`, whether or
    /// not that car has sensitivities set.
    pub fn build(cars: &[CalculationCar], factors: &DrivetrainFactors) -> Result<Self, CalcError> {
        let mut points: [[Vec<ReferencePoint>; 2]; 3] = Default::default();

        for car in cars {
            let factor = factors.factor(car.drivetrain)?;

            for surface in Surface::ALL {
                let Some(sens) = car.ffb_sens.get(surface) else {
                    continue;
                };
                let normalized = f64::from(sens) / factor;

                for axis in Axis::ALL {
                    let value = match axis {
                        Axis::Rotation => f64::from(car.rotation),
                        Axis::Weight => f64::from(car.weight_kg),
                    };
                    points[surface.index()][axis.index()].push(ReferencePoint::new(value, normalized));
                }
            }
        }

        let curves = points.map(|per_axis| per_axis.map(Curve::from_points));
        Ok(Self { curves })
    }

    pub fn curve(&self, surface: Surface, axis: Axis) -> &Curve {
        &self.curves[surface.index()][axis.index()]
    }

    /// Number of points per surface (identical on both axes).
    pub fn point_count(&self, surface: Surface) -> usize {
        self.curve(surface, Axis::Rotation).len()
    }
}
