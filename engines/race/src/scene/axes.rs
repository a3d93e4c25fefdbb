use glam::{DVec3, DVec4};

use crate::draw::{scoped, DrawSurface, Fill};

const ORIGIN_COLOR: DVec4 = DVec4::new(1.0, 1.0, 0.0, 1.0);

/// Red x, green y and blue z arrows of length `length` with a yellow ball at the origin.
pub fn draw_axis_frame<S: DrawSurface + ?Sized>(surface: &mut S, length: f64) {
    // (direction, colour, rotation turning +z onto the direction)
    let axes = [
        (DVec3::X, DVec4::new(1.0, 0.0, 0.0, 1.0), (90.0, DVec3::Y)),
        (DVec3::Y, DVec4::new(0.0, 1.0, 0.0, 1.0), (-90.0, DVec3::X)),
        (DVec3::Z, DVec4::new(0.0, 0.0, 1.0, 1.0), (0.0, DVec3::Z)),
    ];
    for (direction, color, (degrees, axis)) in axes {
        surface.set_color(color);
        surface.lines(&[DVec3::ZERO, direction * length]);
        scoped(surface, |surface| {
            surface.translate(direction * length);
            surface.rotate(degrees, axis);
            surface.cone(0.05 * length, 0.2 * length, 12, 1, Fill::Solid);
        });
    }

    surface.set_color(ORIGIN_COLOR);
    surface.sphere(0.05 * length, 12, 12, Fill::Solid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Primitive, RecordingSurface};

    #[test]
    fn cones_point_along_their_axes() {
        let mut surface = RecordingSurface::new();
        draw_axis_frame(&mut surface, 10.0);
        assert_eq!(surface.stack_depth(), 0);

        let cones: Vec<_> = surface
            .primitives()
            .filter(|(_, primitive)| matches!(primitive, Primitive::Cone { .. }))
            .map(|(transform, _)| *transform)
            .collect();
        assert_eq!(cones.len(), 3);
        for (transform, direction) in cones.iter().zip([DVec3::X, DVec3::Y, DVec3::Z]) {
            let base = transform.transform_point3(DVec3::ZERO);
            let tip = transform.transform_vector3(DVec3::Z);
            assert!(base.distance(direction * 10.0) < 1e-9);
            assert!(tip.distance(direction) < 1e-9, "{tip}");
        }
    }
}
