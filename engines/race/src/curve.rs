//! Parametric curve pieces a track is stitched together from.
//!
//! Control points are stored in authored order: the start point first, the end point second,
//! and the interior weights after that. All track tables depend on this order.

use std::fmt::{self, Display};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{RaceError, RaceResult};

/// Parameter step used when estimating a tangent by forward difference.
pub const DEFAULT_TANGENT_STEP: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Line,
    QuadraticBezier,
    CubicBezier,
}

impl CurveKind {
    #[must_use]
    pub fn control_point_count(self) -> usize {
        match self {
            CurveKind::Line => 2,
            CurveKind::QuadraticBezier => 3,
            CurveKind::CubicBezier => 4,
        }
    }
}

impl Display for CurveKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            CurveKind::Line => "line",
            CurveKind::QuadraticBezier => "quadratic bezier",
            CurveKind::CubicBezier => "cubic bezier",
        })
    }
}

/// `a` at `t = 0`, `b` at `t = 1`.
#[must_use]
pub fn evaluate_line(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    a * (1.0 - t) + b * t
}

/// `a` and `b` are the end points, `c` pulls the curve towards itself.
#[must_use]
pub fn evaluate_quadratic(a: DVec3, b: DVec3, c: DVec3, t: f64) -> DVec3 {
    let s = 1.0 - t;
    a * (s * s) + c * (2.0 * s * t) + b * (t * t)
}

/// `a` and `b` are the end points, `c` is the weight near `a` and `d` the weight near `b`.
#[must_use]
pub fn evaluate_cubic(a: DVec3, b: DVec3, c: DVec3, d: DVec3, t: f64) -> DVec3 {
    let s = 1.0 - t;
    a * (s * s * s) + c * (3.0 * s * s * t) + d * (3.0 * s * t * t) + b * (t * t * t)
}

/// One piece of a track. The point count is part of the variant, so a segment
/// can never disagree with its kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CurveSegment {
    Line([DVec3; 2]),
    QuadraticBezier([DVec3; 3]),
    CubicBezier([DVec3; 4]),
}

impl CurveSegment {
    #[must_use]
    pub fn line(start: DVec3, end: DVec3) -> Self {
        Self::Line([start, end])
    }

    #[must_use]
    pub fn quadratic(start: DVec3, end: DVec3, weight: DVec3) -> Self {
        Self::QuadraticBezier([start, end, weight])
    }

    #[must_use]
    pub fn cubic(start: DVec3, end: DVec3, start_weight: DVec3, end_weight: DVec3) -> Self {
        Self::CubicBezier([start, end, start_weight, end_weight])
    }

    /// Builds a segment from an authored point table.
    ///
    /// # Errors
    ///
    /// Returns [`RaceError::ControlPointCount`] if `points` does not hold exactly
    /// as many points as `kind` requires.
    pub fn from_points(kind: CurveKind, points: &[DVec3]) -> RaceResult<Self> {
        let count_error = || RaceError::ControlPointCount {
            kind,
            expected: kind.control_point_count(),
            found: points.len(),
        };
        match kind {
            CurveKind::Line => points.try_into().map(Self::Line),
            CurveKind::QuadraticBezier => points.try_into().map(Self::QuadraticBezier),
            CurveKind::CubicBezier => points.try_into().map(Self::CubicBezier),
        }
        .map_err(|_mismatch| count_error())
    }

    #[must_use]
    pub fn kind(&self) -> CurveKind {
        match self {
            CurveSegment::Line(_) => CurveKind::Line,
            CurveSegment::QuadraticBezier(_) => CurveKind::QuadraticBezier,
            CurveSegment::CubicBezier(_) => CurveKind::CubicBezier,
        }
    }

    #[must_use]
    pub fn control_points(&self) -> &[DVec3] {
        match self {
            CurveSegment::Line(points) => points,
            CurveSegment::QuadraticBezier(points) => points,
            CurveSegment::CubicBezier(points) => points,
        }
    }

    #[must_use]
    pub fn start(&self) -> DVec3 {
        match *self {
            CurveSegment::Line([start, ..])
            | CurveSegment::QuadraticBezier([start, ..])
            | CurveSegment::CubicBezier([start, ..]) => start,
        }
    }

    #[must_use]
    pub fn end(&self) -> DVec3 {
        match *self {
            CurveSegment::Line([_, end])
            | CurveSegment::QuadraticBezier([_, end, _])
            | CurveSegment::CubicBezier([_, end, _, _]) => end,
        }
    }

    #[must_use]
    pub fn evaluate(&self, t: f64) -> DVec3 {
        match *self {
            CurveSegment::Line([a, b]) => evaluate_line(a, b, t),
            CurveSegment::QuadraticBezier([a, b, c]) => evaluate_quadratic(a, b, c, t),
            CurveSegment::CubicBezier([a, b, c, d]) => evaluate_cubic(a, b, c, d, t),
        }
    }

    /// Forward difference `evaluate(t + step) - evaluate(t)`.
    ///
    /// This is not normalized and carries a small bias compared to the analytic derivative.
    #[must_use]
    pub fn tangent(&self, t: f64, step: f64) -> DVec3 {
        self.evaluate(t + step) - self.evaluate(t)
    }

    /// Sum of chord lengths between `samples + 1` evenly spaced parameter values.
    #[must_use]
    pub fn arc_length(&self, samples: u32) -> f64 {
        let samples = samples.max(1);
        let step = f64::from(samples).recip();
        let mut previous = self.evaluate(0.0);
        let mut length = 0.0;
        for sample in 1..=samples {
            let point = self.evaluate(f64::from(sample) * step);
            length += point.distance(previous);
            previous = point;
        }
        length
    }
}
