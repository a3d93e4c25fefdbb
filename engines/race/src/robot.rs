//! Articulated robots walking along their lanes.

mod gait;
mod limb;

use glam::{DMat4, DVec2, DVec3};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::RobotConfig,
    draw::{scoped, DrawSurface},
    material::Material,
    track::{Lane, RobotRaceState, Track},
};

pub use gait::{animate_leg, leg_angles, pose_legs, walk};
pub use limb::{DrawStyle, Limb, LimbKind, LimbRole};

/// Height of the torso joint above the feet.
pub const TORSO_HEIGHT: f64 = 11.0;
const TORSO_LENGTH: f64 = 7.0;
const HIPS: DVec2 = DVec2::new(2.0, 1.4);
const HEAD_OFFSET: f64 = 4.4;
const NECK_LENGTH: f64 = 1.0;
const HEAD_RADIUS: f64 = 1.6;
const UPPER_LEG_LENGTH: f64 = 7.6;
const LOWER_LEG_LENGTH: f64 = 3.4;
const FOOT_LENGTH: f64 = 2.0;

/// Vertical tangent components up to this size count as level ground.
const LEVEL_TOLERANCE: f64 = 1e-4;

/// The legs in the order their gait phases are assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Leg {
    FrontLeft,
    RearRight,
    FrontRight,
    RearLeft,
}

impl Leg {
    pub const ALL: [Leg; 4] = [Leg::FrontLeft, Leg::RearRight, Leg::FrontRight, Leg::RearLeft];

    /// Position among the torso's children; the head comes first.
    fn child_index(self) -> usize {
        match self {
            Leg::FrontLeft => 1,
            Leg::FrontRight => 2,
            Leg::RearLeft => 3,
            Leg::RearRight => 4,
        }
    }

    fn hip(self) -> DVec3 {
        let (forward, left) = match self {
            Leg::FrontLeft => (1.0, 1.0),
            Leg::FrontRight => (1.0, -1.0),
            Leg::RearLeft => (-1.0, 1.0),
            Leg::RearRight => (-1.0, -1.0),
        };
        DVec3::new(forward * HIPS.x, left * HIPS.y, 0.0)
    }
}

fn build_leg(leg: Leg) -> Limb {
    let foot = Limb::new(
        LimbKind::Foot {
            length: FOOT_LENGTH,
        },
        DVec3::new(0.0, 0.0, -LOWER_LEG_LENGTH),
        Vec::new(),
    );
    let lower_leg = Limb::new(
        LimbKind::LowerLeg {
            length: LOWER_LEG_LENGTH,
        },
        DVec3::new(0.0, 0.0, -UPPER_LEG_LENGTH),
        vec![foot],
    );
    Limb::new(
        LimbKind::UpperLeg {
            length: UPPER_LEG_LENGTH,
        },
        leg.hip(),
        vec![lower_leg],
    )
}

/// The limb tree every robot is built from, rooted at the torso.
#[must_use]
pub fn build_body() -> Limb {
    let head = Limb::new(
        LimbKind::Head {
            neck: NECK_LENGTH,
            radius: HEAD_RADIUS,
        },
        DVec3::new(HEAD_OFFSET, 0.0, 0.0),
        Vec::new(),
    );

    let mut children = vec![head];
    children.extend(
        [Leg::FrontLeft, Leg::FrontRight, Leg::RearLeft, Leg::RearRight]
            .into_iter()
            .map(build_leg),
    );

    Limb::new(
        LimbKind::Torso {
            length: TORSO_LENGTH,
            hips: HIPS,
        },
        DVec3::new(0.0, 0.0, TORSO_HEIGHT),
        children,
    )
}

/// Heading angles `(0, elevation, azimuth)` in degrees for walking along `tangent`.
///
/// Uphill tangents pitch the nose up. Returns `None` for zero or non-finite tangents.
#[must_use]
pub fn heading_from_tangent(tangent: DVec3) -> Option<DVec3> {
    let length = tangent.length();
    if !length.is_finite() || length <= f64::EPSILON {
        return None;
    }
    let azimuth = tangent.y.atan2(tangent.x).to_degrees();
    let elevation = if tangent.z.abs() <= LEVEL_TOLERANCE {
        0.0
    } else {
        -(tangent.z / length).clamp(-1.0, 1.0).asin().to_degrees()
    };
    Some(DVec3::new(0.0, elevation, azimuth))
}

#[derive(Clone, Debug)]
pub struct Robot {
    body: Limb,
    material: Material,
    state: RobotRaceState,
    rng: StdRng,
    position: DVec3,
    tangent: DVec3,
}

impl Robot {
    #[must_use]
    pub fn new(material: Material, lane: Lane, speed: f64) -> Self {
        Self::with_rng(material, lane, speed, StdRng::from_entropy())
    }

    /// A robot whose speed changes are reproducible.
    #[must_use]
    pub fn with_seed(material: Material, lane: Lane, speed: f64, seed: u64) -> Self {
        Self::with_rng(material, lane, speed, StdRng::seed_from_u64(seed))
    }

    fn with_rng(material: Material, lane: Lane, speed: f64, rng: StdRng) -> Self {
        Self {
            body: build_body(),
            material,
            state: RobotRaceState::new(lane, speed),
            rng,
            position: DVec3::ZERO,
            tangent: DVec3::X,
        }
    }

    #[must_use]
    pub fn body(&self) -> &Limb {
        &self.body
    }

    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[must_use]
    pub fn state(&self) -> &RobotRaceState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RobotRaceState {
        &mut self.state
    }

    /// Where the robot stands, on its lane.
    #[must_use]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Direction of travel at the last placement; not normalized.
    #[must_use]
    pub fn tangent(&self) -> DVec3 {
        self.tangent
    }

    /// Torso rotation in degrees.
    #[must_use]
    pub fn heading(&self) -> DVec3 {
        self.body.rotation()
    }

    pub fn set_heading(&mut self, degrees: DVec3) {
        self.body.set_rotation(degrees);
    }

    /// World transform of the torso.
    #[must_use]
    pub fn world_rotation(&self) -> DMat4 {
        DMat4::from_translation(self.position) * self.body.local_transform()
    }

    #[must_use]
    pub fn leg(&self, leg: Leg) -> Option<&Limb> {
        self.body.child(leg.child_index())
    }

    pub fn leg_mut(&mut self, leg: Leg) -> Option<&mut Limb> {
        self.body.child_mut(leg.child_index())
    }

    pub fn perturb_speed(&mut self, config: &RobotConfig) {
        self.state.perturb_speed(&mut self.rng, config);
    }

    pub fn advance(&mut self, track: &Track, dt: f64) {
        self.state.advance(track, dt);
    }

    /// Moves the robot onto its lane and turns it along the track.
    ///
    /// Where the tangent gives no direction the previous heading is kept.
    pub fn place(&mut self, track: &Track, lane_width: f64) {
        let segment = self.state.segment_index();
        let local_t = self.state.local_t();
        let lane = self.state.lane();
        self.position = track.position_on_lane(segment, local_t, lane, lane_width);

        let tangent = track.tangent(segment, local_t, lane, lane_width);
        if let Some(heading) = heading_from_tangent(tangent) {
            self.tangent = tangent;
            self.set_heading(heading);
        }
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, style: DrawStyle) {
        scoped(surface, |surface| {
            surface.translate(self.position);
            self.body.draw(surface, style, &self.material);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{curve::CurveSegment, draw::RecordingSurface};

    fn line_track() -> Track {
        Track::new(
            "line",
            vec![CurveSegment::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))],
            1,
            100,
            0.001,
        )
        .unwrap()
    }

    #[test]
    fn body_has_a_head_and_four_legs() {
        let body = build_body();
        assert_eq!(body.role(), LimbRole::Torso);
        let roles: Vec<_> = body.children().iter().map(Limb::role).collect();
        assert_eq!(
            roles,
            [
                LimbRole::Head,
                LimbRole::UpperLeg,
                LimbRole::UpperLeg,
                LimbRole::UpperLeg,
                LimbRole::UpperLeg
            ]
        );
        assert_eq!(body.world_transforms(DMat4::IDENTITY).len(), 1 + 1 + 4 * 3);
    }

    #[test]
    fn feet_touch_the_ground_when_standing() {
        let body = build_body();
        for (role, transform) in body.world_transforms(DMat4::IDENTITY) {
            if role == LimbRole::Foot {
                let ankle = transform.transform_point3(DVec3::ZERO);
                assert!(ankle.z.abs() < 1e-12, "{ankle}");
            }
        }
    }

    #[test]
    fn legs_are_where_their_names_say() {
        let robot = Robot::with_seed(Material::GOLD, Lane::ALL[0], 1.0, 0);
        let hip = |leg| robot.leg(leg).map(Limb::local_origin).unwrap_or_default();
        assert!(hip(Leg::FrontLeft).x > 0.0 && hip(Leg::FrontLeft).y > 0.0);
        assert!(hip(Leg::FrontRight).x > 0.0 && hip(Leg::FrontRight).y < 0.0);
        assert!(hip(Leg::RearLeft).x < 0.0 && hip(Leg::RearLeft).y > 0.0);
        assert!(hip(Leg::RearRight).x < 0.0 && hip(Leg::RearRight).y < 0.0);
    }

    #[test]
    fn heading_follows_the_tangent() {
        let heading = heading_from_tangent(DVec3::new(0.0, 2.0, 0.0)).unwrap();
        assert!(heading.distance(DVec3::new(0.0, 0.0, 90.0)) < 1e-12);

        let uphill = heading_from_tangent(DVec3::new(1.0, 0.0, 1.0)).unwrap();
        assert!((uphill.y + 45.0).abs() < 1e-9);
        let downhill = heading_from_tangent(DVec3::new(1.0, 0.0, -1.0)).unwrap();
        assert!((downhill.y - 45.0).abs() < 1e-9);

        // tiny slopes count as level
        let level = heading_from_tangent(DVec3::new(1.0, 0.0, 5e-5)).unwrap();
        assert!(level.y.abs() < f64::EPSILON);

        // the cutoff applies to the raw forward difference, however short it is
        let short_level = heading_from_tangent(DVec3::new(0.2, 0.0, 8e-5)).unwrap();
        assert!(short_level.y.abs() < f64::EPSILON);
        let short_slope = heading_from_tangent(DVec3::new(0.2, 0.0, 2e-4)).unwrap();
        assert!(short_slope.y < 0.0);

        assert_eq!(heading_from_tangent(DVec3::ZERO), None);
        assert_eq!(heading_from_tangent(DVec3::new(f64::NAN, 0.0, 0.0)), None);
    }

    #[test]
    fn uphill_heading_raises_the_nose() {
        let mut robot = Robot::with_seed(Material::GOLD, Lane::ALL[0], 1.0, 0);
        if let Some(heading) = heading_from_tangent(DVec3::new(1.0, 0.0, 1.0)) {
            robot.set_heading(heading);
        }
        let nose = robot.world_rotation().transform_vector3(DVec3::X);
        assert!(nose.z > 0.5, "{nose}");
    }

    #[test]
    fn placement_on_a_straight_line() {
        let track = line_track();
        let mut robot = Robot::with_seed(Material::GOLD, Lane::ALL[0], 1.0, 0);
        robot.advance(&track, 5.0);
        robot.place(&track, 0.0);

        assert!((robot.state().local_t() - 0.5).abs() < 1e-12);
        assert!(robot.position().distance(DVec3::new(5.0, 0.0, 0.0)) < 1e-12);
        assert!(robot.tangent().distance(DVec3::new(0.01, 0.0, 0.0)) < 1e-12);
        assert!(robot.tangent().normalize().distance(DVec3::X) < 1e-12);
        assert!(robot.heading().length() < 1e-9);
    }

    #[test]
    fn drawing_is_balanced_and_placed() {
        let track = line_track();
        let mut robot = Robot::with_seed(Material::ORANGE, Lane::ALL[0], 1.0, 0);
        robot.advance(&track, 5.0);
        robot.place(&track, 0.0);

        for style in [DrawStyle::Solid, DrawStyle::StickFigure] {
            let mut surface = RecordingSurface::new();
            robot.draw(&mut surface, style);
            assert_eq!(surface.stack_depth(), 0);
            let (first, _) = surface.primitives().next().unwrap();
            let origin = first.transform_point3(DVec3::ZERO);
            assert!(origin.distance(DVec3::new(5.0, 0.0, TORSO_HEIGHT)) < 1e-9, "{origin}");
        }
    }

    #[test]
    fn seeded_robots_change_speed_alike() {
        let config = RobotConfig::default();
        let mut first = Robot::with_seed(Material::GOLD, Lane::ALL[0], config.initial_speed, 42);
        let mut second = Robot::with_seed(Material::GOLD, Lane::ALL[0], config.initial_speed, 42);
        for _ in 0..20 {
            first.perturb_speed(&config);
            second.perturb_speed(&config);
        }
        assert!((first.state().speed() - second.state().speed()).abs() < f64::EPSILON);
    }
}
