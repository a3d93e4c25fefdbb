//! The per-frame driver tying track, robots, camera and terrain together.

mod axes;
mod terrain;

use glam::{DVec3, DVec4};
use lib_geometry::{Camera, Projection};
use log::{debug, info, trace};

use crate::{
    camera::{self, CameraInputs, CameraMode},
    config::RaceConfig,
    draw::DrawSurface,
    error::RaceResult,
    global_state::GlobalState,
    material::Material,
    robot::{walk, Robot},
    track::{Lane, Track, TrackId, TrackMesh, Tracks},
};

pub use axes::draw_axis_frame;
pub use terrain::Terrain;

const BACKGROUND: DVec4 = DVec4::new(1.0, 1.0, 1.0, 0.0);
const AXIS_LENGTH: f64 = 20.0;

/// Owns the race and turns [`GlobalState`] snapshots into frames.
///
/// All mutation happens in [`RaceScene::update`]; [`RaceScene::draw`] only reads.
#[derive(Debug)]
pub struct RaceScene {
    config: RaceConfig,
    tracks: Tracks,
    meshes: Vec<TrackMesh>,
    terrain: Terrain,
    robots: Vec<Robot>,
    track: TrackId,
    last_time: Option<f64>,
    camera_mode: CameraMode,
    camera: Camera,
    projection: Projection,
}

impl RaceScene {
    /// # Errors
    ///
    /// Fails if the configured custom track is malformed.
    pub fn new(config: RaceConfig) -> RaceResult<Self> {
        let speed = config.robots.initial_speed;
        let robots = Lane::ALL
            .into_iter()
            .zip(Material::ROBOTS)
            .map(|(lane, material)| Robot::new(material, lane, speed))
            .collect();
        Self::with_robots(config, robots)
    }

    /// A scene whose robots draw their speed changes from seeds derived from `seed`.
    ///
    /// # Errors
    ///
    /// Fails if the configured custom track is malformed.
    pub fn with_seed(config: RaceConfig, seed: u64) -> RaceResult<Self> {
        let speed = config.robots.initial_speed;
        let robots = Lane::ALL
            .into_iter()
            .zip(Material::ROBOTS)
            .zip(0..)
            .map(|((lane, material), index)| {
                Robot::with_seed(material, lane, speed, seed.wrapping_add(index))
            })
            .collect();
        Self::with_robots(config, robots)
    }

    fn with_robots(config: RaceConfig, robots: Vec<Robot>) -> RaceResult<Self> {
        let tracks = Tracks::build(&config.track)?;
        let meshes = TrackId::ALL
            .into_iter()
            .map(|id| TrackMesh::build(tracks.get(id), &config.track))
            .collect();
        let terrain = Terrain::build(&config.terrain);
        let defaults = GlobalState::default();

        let mut scene = Self {
            tracks,
            meshes,
            terrain,
            robots,
            track: defaults.track,
            last_time: None,
            camera_mode: defaults.camera_mode,
            camera: Camera::default(),
            projection: Projection::for_view_distance(
                defaults.surface_size,
                defaults.fov,
                defaults.orbit.distance,
            ),
            config,
        };
        scene.place_robots();
        Ok(scene)
    }

    #[must_use]
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    #[must_use]
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// The track the robots currently run on.
    #[must_use]
    pub fn track(&self) -> &Track {
        self.tracks.get(self.track)
    }

    #[must_use]
    pub fn track_id(&self) -> TrackId {
        self.track
    }

    #[must_use]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// The concrete mode of the last update; never [`CameraMode::Auto`].
    #[must_use]
    pub fn camera_mode(&self) -> CameraMode {
        self.camera_mode
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Advances the race to `state.time` and recomputes the view.
    pub fn update(&mut self, state: &GlobalState) {
        if state.track != self.track {
            info!("switching from {} to {}", self.track, state.track);
            self.track = state.track;
            for robot in &mut self.robots {
                robot.state_mut().reset();
            }
        }

        let dt = match self.last_time {
            Some(last) if state.time >= last => state.time - last,
            Some(last) => {
                trace!("clock went back from {last} to {}, holding still", state.time);
                0.0
            }
            None => 0.0,
        };
        self.last_time = Some(state.time);

        let track = self.tracks.get(self.track);
        let lane_width = self.config.track.lane_width;
        for robot in &mut self.robots {
            robot.perturb_speed(&self.config.robots);
            robot.advance(track, dt);
            walk(robot, &self.config.gait);
            robot.place(track, lane_width);
        }

        self.update_camera(state);
    }

    fn update_camera(&mut self, state: &GlobalState) {
        let mode = state
            .camera_mode
            .resolve(state.time, self.config.camera.auto_interval);
        if mode != self.camera_mode {
            debug!("camera mode {} -> {mode}", self.camera_mode);
            self.camera_mode = mode;
        }

        let positions: Vec<DVec3> = self.robots.iter().map(Robot::position).collect();
        let lead_tangent = self.robots.first().map_or(DVec3::X, Robot::tangent);
        let inputs = CameraInputs {
            positions: &positions,
            lead_tangent,
            orbit: &state.orbit,
            time: state.time,
        };
        self.camera = camera::view(mode, &inputs, &self.config.camera);

        let view_distance = self.camera.eye.distance(self.camera.center).max(1.0);
        self.projection =
            Projection::for_view_distance(state.surface_size, state.fov, view_distance);
    }

    /// Issues one frame: robots, track, terrain and optionally the axis frame.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, state: &GlobalState) {
        surface.clear(BACKGROUND);
        surface.set_view(&self.camera, &self.projection);

        let style = state.draw_style();
        for robot in &self.robots {
            robot.draw(surface, style);
        }

        if let Some(mesh) = self.meshes.get(self.track.index()) {
            mesh.draw(surface);
        }

        self.terrain.draw(surface);

        if state.show_axes {
            draw_axis_frame(surface, AXIS_LENGTH);
        }
    }

    /// [`RaceScene::update`] followed by [`RaceScene::draw`].
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S, state: &GlobalState) {
        self.update(state);
        self.draw(surface, state);
    }

    fn place_robots(&mut self) {
        let track = self.tracks.get(self.track);
        let lane_width = self.config.track.lane_width;
        for robot in &mut self.robots {
            robot.place(track, lane_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, Primitive, RecordingSurface, TextureId};

    fn scene() -> RaceScene {
        RaceScene::with_seed(RaceConfig::default(), 11).unwrap()
    }

    #[test]
    fn robots_start_on_their_lanes() {
        let scene = scene();
        let track = scene.track();
        let lane_width = scene.config().track.lane_width;
        for (robot, lane) in scene.robots().iter().zip(Lane::ALL) {
            assert_eq!(robot.state().lane(), lane);
            assert_eq!(robot.state().segment_index(), 0);
            let expected = track.position_on_lane(0, 0.0, lane, lane_width);
            assert!(robot.position().distance(expected) < 1e-9);
        }
        let materials: Vec<_> = scene.robots().iter().map(|robot| *robot.material()).collect();
        assert_eq!(materials, Material::ROBOTS);
    }

    #[test]
    fn first_update_does_not_move() {
        let mut scene = scene();
        scene.update(&GlobalState {
            time: 30.0,
            ..GlobalState::default()
        });
        assert!(scene
            .robots()
            .iter()
            .all(|robot| robot.state().distance().abs() < f64::EPSILON));
    }

    #[test]
    fn robots_move_by_speed_times_elapsed_time() {
        let mut scene = scene();
        let mut state = GlobalState::default();
        scene.update(&state);
        state.time = 0.5;
        scene.update(&state);
        for robot in scene.robots() {
            let expected = robot.state().speed() * 0.5;
            assert!((robot.state().distance() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn clock_going_back_holds_the_robots() {
        let mut scene = scene();
        let mut state = GlobalState::default();
        state.time = 2.0;
        scene.update(&state);
        state.time = 3.0;
        scene.update(&state);
        let distances: Vec<_> = scene.robots().iter().map(|r| r.state().distance()).collect();
        state.time = 1.0;
        scene.update(&state);
        let after: Vec<_> = scene.robots().iter().map(|r| r.state().distance()).collect();
        assert_eq!(distances, after);
    }

    #[test]
    fn switching_tracks_resets_progress() {
        let mut scene = scene();
        let mut state = GlobalState::default();
        for frame in 0..120 {
            state.time = f64::from(frame) / 60.0;
            scene.update(&state);
        }
        assert!(scene.robots().iter().all(|robot| robot.state().distance() > 0.0));

        state.track = TrackId::L;
        state.time += 1.0 / 60.0;
        scene.update(&state);
        assert_eq!(scene.track_id(), TrackId::L);
        for robot in scene.robots() {
            // one frame on the new track
            let frame_distance = robot.state().speed() / 60.0;
            assert!(robot.state().distance() <= frame_distance + 1e-9);
            assert_eq!(robot.state().segment_index(), 0);
        }
    }

    #[test]
    fn frame_issues_robots_then_track_then_terrain() {
        let mut scene = scene();
        let state = GlobalState {
            track: TrackId::O,
            show_axes: true,
            ..GlobalState::default()
        };
        let mut surface = RecordingSurface::new();
        scene.frame(&mut surface, &state);

        assert_eq!(surface.stack_depth(), 0);
        let commands = surface.commands();
        assert!(matches!(commands.first(), Some(DrawCommand::Clear(_))));
        assert!(matches!(commands.get(1), Some(DrawCommand::SetView { .. })));

        let position = |wanted: &dyn Fn(&DrawCommand) -> bool| commands.iter().position(wanted);
        let first_robot = position(&|command| matches!(command, DrawCommand::SetMaterial(_)));
        let track = position(&|command| {
            matches!(command, DrawCommand::BindTexture(TextureId::Track))
        });
        let terrain = position(&|command| {
            matches!(command, DrawCommand::BindTexture(TextureId::Terrain))
        });
        let axes = position(&|command| {
            matches!(
                command,
                DrawCommand::Draw {
                    primitive: Primitive::Cone { .. },
                    ..
                }
            )
        });
        assert!(first_robot.is_some());
        assert!(
            first_robot < track && track < terrain && terrain < axes,
            "{first_robot:?} {track:?} {terrain:?} {axes:?}"
        );
    }

    #[test]
    fn axes_are_optional() {
        let mut scene = scene();
        let mut surface = RecordingSurface::new();
        scene.frame(&mut surface, &GlobalState::default());
        assert!(!surface
            .primitives()
            .any(|(_, primitive)| matches!(primitive, Primitive::Cone { .. })));
    }

    #[test]
    fn stick_figures_use_no_materials() {
        let mut scene = scene();
        let mut surface = RecordingSurface::new();
        let state = GlobalState {
            stick_figure: true,
            ..GlobalState::default()
        };
        scene.frame(&mut surface, &state);
        assert!(!surface
            .commands()
            .iter()
            .any(|command| matches!(command, DrawCommand::SetMaterial(_))));
    }

    #[test]
    fn helicopter_follows_the_pack() {
        let mut scene = scene();
        let state = GlobalState {
            camera_mode: CameraMode::Helicopter,
            ..GlobalState::default()
        };
        scene.update(&state);
        let centroid = scene.robots().iter().map(Robot::position).sum::<DVec3>() / 4.0;
        assert!(scene.camera().center.distance(centroid) < 1e-9);
        assert_eq!(scene.camera_mode(), CameraMode::Helicopter);
        assert!((scene.projection().far() - 10.0 * 300.0).abs() < 1.0);
    }

    #[test]
    fn auto_mode_reports_the_shown_view() {
        let mut scene = scene();
        let state = GlobalState {
            camera_mode: CameraMode::Auto,
            time: 9.0,
            ..GlobalState::default()
        };
        scene.update(&state);
        assert_eq!(scene.camera_mode(), CameraMode::FirstPerson);
    }
}
