use crate::{
    camera::{CameraMode, Orbit},
    robot::DrawStyle,
    track::TrackId,
};

/// Frame inputs owned by the host: menu selections, the animation clock and the window.
///
/// The scene reads these at the start of every frame and never writes them.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalState {
    pub track: TrackId,
    pub camera_mode: CameraMode,
    /// animation clock in seconds
    pub time: f64,
    /// width and height of the drawing surface in pixels
    pub surface_size: (u32, u32),
    pub stick_figure: bool,
    pub show_axes: bool,
    pub orbit: Orbit,
    /// vertical field of view in degrees
    pub fov: f64,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            track: TrackId::default(),
            camera_mode: CameraMode::default(),
            time: 0.0,
            surface_size: (1280, 720),
            stick_figure: false,
            show_axes: false,
            orbit: Orbit::default(),
            fov: 40.0,
        }
    }
}

impl GlobalState {
    #[must_use]
    pub fn draw_style(&self) -> DrawStyle {
        if self.stick_figure {
            DrawStyle::StickFigure
        } else {
            DrawStyle::Solid
        }
    }
}
