//! Viewpoints derived from the race, recomputed from scratch every frame.

use std::{
    f64::consts::FRAC_PI_4,
    fmt::{self, Display},
};

use glam::DVec3;
use lib_geometry::Camera;
use serde::{Deserialize, Serialize};

use crate::{
    config::CameraConfig,
    error::{RaceError, RaceResult},
};

const MIN_HORIZONTAL_MAGNITUDE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Orbit controlled by the host.
    #[default]
    Default,
    /// High above the pack, looking down.
    Helicopter,
    /// Beside the lead robot.
    MotorCycle,
    /// Behind and above the lead robot, looking ahead.
    FirstPerson,
    /// Cycles helicopter, motorcycle and first person.
    Auto,
}

impl CameraMode {
    pub const ALL: [CameraMode; 5] = [
        CameraMode::Default,
        CameraMode::Helicopter,
        CameraMode::MotorCycle,
        CameraMode::FirstPerson,
        CameraMode::Auto,
    ];

    const AUTO_CYCLE: [CameraMode; 3] = [
        CameraMode::Helicopter,
        CameraMode::MotorCycle,
        CameraMode::FirstPerson,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The concrete mode shown at animation time `time`.
    ///
    /// Only [`CameraMode::Auto`] depends on the time; it holds each view for `interval`.
    #[must_use]
    pub fn resolve(self, time: f64, interval: f64) -> CameraMode {
        if self != CameraMode::Auto {
            return self;
        }
        if !(interval > 0.0 && time.is_finite()) {
            return CameraMode::Helicopter;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "rem_euclid keeps the value in 0..3"
        )]
        let slot = (time / interval).floor().rem_euclid(3.0) as usize;
        Self::AUTO_CYCLE
            .get(slot)
            .copied()
            .unwrap_or(CameraMode::Helicopter)
    }
}

impl TryFrom<usize> for CameraMode {
    type Error = RaceError;

    fn try_from(index: usize) -> RaceResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(RaceError::UnknownCameraMode(index))
    }
}

impl Display for CameraMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            CameraMode::Default => "default",
            CameraMode::Helicopter => "helicopter",
            CameraMode::MotorCycle => "motorcycle",
            CameraMode::FirstPerson => "first person",
            CameraMode::Auto => "auto",
        })
    }
}

/// Spherical orbit of the default view. Angles are in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub center: DVec3,
    /// angle around z, from the x axis
    pub azimuth: f64,
    /// angle above the xy plane
    pub elevation: f64,
    pub distance: f64,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            azimuth: FRAC_PI_4,
            elevation: 0.6,
            distance: 350.0,
        }
    }
}

impl Orbit {
    /// Elevation actually used: nudged away from the poles, where the view direction
    /// would line up with the up vector.
    #[must_use]
    pub fn safe_elevation(&self, gimbal_epsilon: f64) -> f64 {
        if self.elevation.cos().abs() <= gimbal_epsilon {
            self.elevation - (3.0 * gimbal_epsilon).copysign(self.elevation.sin())
        } else {
            self.elevation
        }
    }

    #[must_use]
    pub fn eye(&self, gimbal_epsilon: f64) -> DVec3 {
        let elevation = self.safe_elevation(gimbal_epsilon);
        let direction = DVec3::new(
            elevation.cos() * self.azimuth.cos(),
            elevation.cos() * self.azimuth.sin(),
            elevation.sin(),
        );
        self.center + direction * self.distance
    }
}

/// Everything a view is computed from.
#[derive(Clone, Copy, Debug)]
pub struct CameraInputs<'a> {
    /// World positions of all robots, the followed robot first.
    pub positions: &'a [DVec3],
    /// Direction of travel of the followed robot; need not be normalized.
    pub lead_tangent: DVec3,
    pub orbit: &'a Orbit,
    /// Animation clock, drives the auto mode.
    pub time: f64,
}

impl CameraInputs<'_> {
    fn lead_position(&self) -> DVec3 {
        self.positions.first().copied().unwrap_or(self.orbit.center)
    }

    fn centroid(&self) -> DVec3 {
        if self.positions.is_empty() {
            return self.orbit.center;
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "there are only a handful of robots"
        )]
        let count = self.positions.len() as f64;
        self.positions.iter().sum::<DVec3>() / count
    }

    fn lead_direction(&self) -> DVec3 {
        self.lead_tangent.try_normalize().unwrap_or(DVec3::X)
    }
}

/// Computes eye, center and up for `mode`.
///
/// Pure function of its inputs; switching modes takes effect immediately.
#[must_use]
pub fn view(mode: CameraMode, inputs: &CameraInputs<'_>, config: &CameraConfig) -> Camera {
    match mode.resolve(inputs.time, config.auto_interval) {
        CameraMode::Default => default_view(inputs.orbit, config),
        CameraMode::Helicopter => helicopter_view(inputs, config),
        CameraMode::MotorCycle => motorcycle_view(inputs, config),
        // `resolve` never yields auto
        CameraMode::FirstPerson | CameraMode::Auto => first_person_view(inputs, config),
    }
}

fn default_view(orbit: &Orbit, config: &CameraConfig) -> Camera {
    Camera::new(orbit.eye(config.gimbal_epsilon), orbit.center)
}

fn helicopter_view(inputs: &CameraInputs<'_>, config: &CameraConfig) -> Camera {
    let center = inputs.centroid();
    Camera::new(center + config.helicopter_offset, center).with_up(DVec3::NEG_Y)
}

fn motorcycle_view(inputs: &CameraInputs<'_>, config: &CameraConfig) -> Camera {
    let position = inputs.lead_position();
    let direction = inputs.lead_direction();
    let horizontal = direction.x.hypot(direction.y);
    let normal = if horizontal > MIN_HORIZONTAL_MAGNITUDE {
        DVec3::new(
            direction.y / horizontal,
            -direction.x / horizontal,
            direction.z,
        )
    } else {
        DVec3::Y
    };
    Camera::new(position + normal * config.motorcycle_distance, position)
}

fn first_person_view(inputs: &CameraInputs<'_>, config: &CameraConfig) -> Camera {
    let position = inputs.lead_position();
    let direction = inputs.lead_direction();
    let raised = DVec3::Z * config.first_person_height;
    Camera::new(
        position - direction * config.first_person_back + raised,
        position + direction * config.first_person_look_ahead + raised,
    )
}
