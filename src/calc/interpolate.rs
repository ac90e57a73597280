//! Piecewise-linear lookup on a sorted reference curve.
//!
//! Queries outside the curve's range are clamped to the nearest boundary
//! point; there is no linear extrapolation past the outermost points.

/// One anchor on a reference curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    /// Independent variable (rotation in degrees, or weight in kg).
    pub value: f64,
    /// Sensitivity divided by the reference car's drivetrain factor.
    pub sens: f64,
}

impl ReferencePoint {
    pub fn new(value: f64, sens: f64) -> Self {
        Self { value, sens }
    }
}

/// A reference curve, always sorted ascending by `value`.
///
/// Points sharing a value are kept side by side in insertion order. When the
/// lookup settles on such a value, the first inserted point among them wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    points: Vec<ReferencePoint>,
}

impl Curve {
    pub fn from_points(mut points: Vec<ReferencePoint>) -> Self {
        // Stable, so equal values keep their insertion order.
        points.sort_by(|a, b| a.value.total_cmp(&b.value));
        Self { points }
    }

    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn interpolate(&self, query: f64) -> Option<f64> {
        interpolate(&self.points, query)
    }
}

/// Interpolate the normalized sensitivity at `query`.
///
/// `curve` must be sorted ascending by `value`. Returns `None` for an empty
/// curve. No rounding is applied here.
pub fn interpolate(curve: &[ReferencePoint], query: f64) -> Option<f64> {
    match curve {
        [] => None,
        [only] => Some(only.sens),
        _ => {
            let lower = lower_point(curve, query);
            let upper = upper_point(curve, query);

            if lower.value == upper.value {
                return Some(lower.sens);
            }

            let factor = (query - lower.value) / (upper.value - lower.value);
            Some(lower.sens + (upper.sens - lower.sens) * factor)
        }
    }
}

/// Round a sensitivity to an integer, half away from zero.
pub fn round_sens(value: f64) -> i32 {
    value.round() as i32
}

/// First point holding the greatest value `<= query`, or the first point.
fn lower_point(curve: &[ReferencePoint], query: f64) -> ReferencePoint {
    let end = curve.partition_point(|p| p.value <= query);
    if end == 0 {
        return curve[0];
    }
    let best = curve[end - 1].value;
    curve[curve.partition_point(|p| p.value < best)]
}

/// First point holding the smallest value `>= query`, or the first point
/// holding the largest value.
fn upper_point(curve: &[ReferencePoint], query: f64) -> ReferencePoint {
    let start = curve.partition_point(|p| p.value < query);
    if let Some(p) = curve.get(start) {
        return *p;
    }
    let best = curve[curve.len() - 1].value;
    curve[curve.partition_point(|p| p.value < best)]
}
