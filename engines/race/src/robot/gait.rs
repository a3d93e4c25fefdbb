use std::f64::consts::TAU;

use glam::DVec3;

use super::{Leg, Limb, Robot};
use crate::config::GaitConfig;

/// Hip and knee angles in degrees at `phase` time units into the stride.
///
/// The knee follows the hip fully while the leg lifts and only halfway while it plants.
#[must_use]
pub fn leg_angles(config: &GaitConfig, phase: f64) -> (f64, f64) {
    let period = if config.period > 0.0 { config.period } else { 1.0 };
    let hip = config.max_angle * (TAU * phase / period).sin();
    let knee = if hip < 0.0 { -hip } else { 0.5 * hip };
    (hip, knee)
}

/// Sets the y rotations of an upper leg and its lower leg.
pub fn animate_leg(upper_leg: &mut Limb, config: &GaitConfig, phase: f64) {
    let (hip, knee) = leg_angles(config, phase);
    upper_leg.set_rotation(with_y(upper_leg.rotation(), hip));
    if let Some(lower_leg) = upper_leg.child_mut(0) {
        lower_leg.set_rotation(with_y(lower_leg.rotation(), knee));
    }
}

/// Poses all four legs for the distance the robot has walked.
///
/// The stride advances with the travelled distance over the speed divisor, so faster robots
/// step faster and speed changes never make the legs jump.
pub fn walk(robot: &mut Robot, config: &GaitConfig) {
    let divisor = if config.speed_divisor.abs() > f64::EPSILON {
        config.speed_divisor
    } else {
        1.0
    };
    let phase = robot.state().distance() / divisor;
    pose_legs(robot, config, phase);
}

/// Poses all four legs at `phase` time units into the stride.
///
/// Each leg is shifted by its phase offset times the period.
pub fn pose_legs(robot: &mut Robot, config: &GaitConfig, phase: f64) {
    for (leg, offset) in Leg::ALL.into_iter().zip(config.phase_offsets) {
        if let Some(upper_leg) = robot.leg_mut(leg) {
            animate_leg(upper_leg, config, phase + offset * config.period);
        }
    }
}

fn with_y(rotation: DVec3, y: f64) -> DVec3 {
    DVec3::new(rotation.x, y, rotation.z)
}
