use glam::{DMat4, DVec3};

/// A view described by the point we look from, the point we look at and the up direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: DVec3,
    pub center: DVec3,
    pub up: DVec3,
}

impl Camera {
    #[must_use]
    pub fn new(eye: DVec3, center: DVec3) -> Self {
        Self {
            eye,
            center,
            up: DVec3::Z,
        }
    }

    #[must_use]
    pub fn with_up(mut self, up: DVec3) -> Self {
        self.up = up;
        self
    }

    /// Normalized viewing direction, or zero if `eye` and `center` coincide.
    #[must_use]
    pub fn direction(&self) -> DVec3 {
        (self.center - self.eye).normalize_or_zero()
    }

    #[must_use]
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye, self.center, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DVec3::new(3.0, 6.0, 5.0), DVec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let camera = Camera::new(DVec3::new(10.0, 0.0, 0.0), DVec3::ZERO);
        let eye_in_view = camera.view_matrix().transform_point3(camera.eye);
        assert!(eye_in_view.length() < 1e-9, "{eye_in_view}");
    }

    #[test]
    fn center_lies_on_negative_z_in_view_space() {
        let camera = Camera::new(DVec3::new(0.0, -20.0, 5.0), DVec3::new(0.0, 0.0, 5.0));
        let center_in_view = camera.view_matrix().transform_point3(camera.center);
        assert!(center_in_view.x.abs() < 1e-9);
        assert!(center_in_view.y.abs() < 1e-9);
        assert!((center_in_view.z + 20.0).abs() < 1e-9);
    }
}
