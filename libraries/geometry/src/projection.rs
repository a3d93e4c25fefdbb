use std::ops::Range;

use glam::DMat4;

/// Maps view space to clip space.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    Perspective {
        surface_width: u32,
        surface_height: u32,
        /// vertical field of view in degrees
        fov: f64,
        z_range: Range<f64>,
    },
}

impl Projection {
    #[must_use]
    pub fn new_perspective(
        (surface_width, surface_height): (u32, u32),
        fov: f64,
        z_range: Range<f64>,
    ) -> Self {
        Self::Perspective {
            surface_width,
            surface_height,
            fov,
            z_range,
        }
    }

    /// A perspective whose clipping planes follow the viewing distance,
    /// so zooming out never clips the scene.
    #[must_use]
    pub fn for_view_distance(surface: (u32, u32), fov: f64, view_distance: f64) -> Self {
        Self::new_perspective(surface, fov, 0.01 * view_distance..10.0 * view_distance)
    }

    #[must_use]
    pub fn surface_dimensions(&self) -> (u32, u32) {
        match *self {
            Projection::Perspective {
                surface_width,
                surface_height,
                ..
            } => (surface_width, surface_height),
        }
    }

    #[must_use]
    pub fn near(&self) -> f64 {
        match *self {
            Projection::Perspective { ref z_range, .. } => z_range.start,
        }
    }

    #[must_use]
    pub fn far(&self) -> f64 {
        match *self {
            Projection::Perspective { ref z_range, .. } => z_range.end,
        }
    }

    #[must_use]
    pub fn fov(&self) -> f64 {
        match *self {
            Projection::Perspective { fov, .. } => fov,
        }
    }

    /// Width over height; a collapsed surface (minimized window) counts as square.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        let (width, height) = self.surface_dimensions();
        if width == 0 || height == 0 {
            1.0
        } else {
            f64::from(width) / f64::from(height)
        }
    }

    #[must_use]
    pub fn matrix(&self) -> DMat4 {
        DMat4::perspective_rh(
            self.fov().to_radians(),
            self.aspect_ratio(),
            self.near(),
            self.far(),
        )
    }
}
