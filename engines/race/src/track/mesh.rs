use glam::{DVec2, DVec3, DVec4};

use super::{Track, LANE_COUNT};
use crate::{
    config::TrackConfig,
    draw::{DrawSurface, TextureDimension, TextureId, Vertex},
};

const PLAIN_TRACK_COLOR: DVec4 = DVec4::new(0.55, 0.2, 0.15, 1.0);

/// Quad strips of a track's driving surface and side walls, one strip per segment.
#[derive(Clone, Debug, Default)]
pub struct TrackMesh {
    pub surface: Vec<Vec<Vertex>>,
    pub inner_wall: Vec<Vec<Vertex>>,
    pub outer_wall: Vec<Vec<Vertex>>,
    textured: bool,
}

impl TrackMesh {
    /// The band spans all lanes. Texture `u` runs across the band, `v` along the
    /// arc length in repetitions of `texture_length`.
    #[must_use]
    pub fn build(track: &Track, config: &TrackConfig) -> Self {
        let half_width = config.lane_width * half_lane_count();
        let steps = config.draw_steps.max(1);
        let texture_length = if config.texture_length > 0.0 {
            config.texture_length
        } else {
            1.0
        };
        let depth = DVec3::new(0.0, 0.0, config.wall_depth);

        let mut mesh = Self {
            textured: track.is_textured(),
            ..Self::default()
        };
        let mut distance = 0.0;
        for (index, &length) in track.arc_lengths().iter().enumerate() {
            let mut surface = Vec::new();
            let mut inner_wall = Vec::new();
            let mut outer_wall = Vec::new();
            for step in 0..=steps {
                let t = f64::from(step) / f64::from(steps);
                let v = (distance + t * length) / texture_length;
                let center = track.point(index, t);
                let lateral = track.lateral_at(index, t);
                let inner = center - lateral * half_width;
                let outer = center + lateral * half_width;

                surface.push(Vertex::new(inner, DVec3::Z, DVec2::new(0.0, v)));
                surface.push(Vertex::new(outer, DVec3::Z, DVec2::new(1.0, v)));

                inner_wall.push(Vertex::new(inner, -lateral, DVec2::new(v, 0.0)));
                inner_wall.push(Vertex::new(inner - depth, -lateral, DVec2::new(v, 1.0)));

                outer_wall.push(Vertex::new(outer, lateral, DVec2::new(v, 0.0)));
                outer_wall.push(Vertex::new(outer - depth, lateral, DVec2::new(v, 1.0)));
            }
            distance += length;
            mesh.surface.push(surface);
            mesh.inner_wall.push(inner_wall);
            mesh.outer_wall.push(outer_wall);
        }
        mesh
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        if !self.textured {
            surface.set_color(PLAIN_TRACK_COLOR);
            for strip in &self.surface {
                surface.quad_strip(strip);
            }
            return;
        }

        surface.set_color(DVec4::ONE);
        surface.set_texture_enabled(TextureDimension::Two, true);
        surface.bind_texture(TextureId::Track);
        for strip in &self.surface {
            surface.quad_strip(strip);
        }
        surface.bind_texture(TextureId::Brick);
        for strip in self.inner_wall.iter().chain(&self.outer_wall) {
            surface.quad_strip(strip);
        }
        surface.set_texture_enabled(TextureDimension::Two, false);
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "the lane count is a small constant"
)]
fn half_lane_count() -> f64 {
    LANE_COUNT as f64 / 2.0
}
