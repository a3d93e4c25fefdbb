use glam::{DVec2, DVec3, DVec4};

use crate::{
    config::TerrainConfig,
    draw::{DrawSurface, TextureDimension, TextureId, Vertex},
};

const WATER_COLOR: DVec4 = DVec4::new(0.2, 0.4, 0.8, 0.5);

/// Height field around the track, coloured through a 1D texture by height.
#[derive(Clone, Debug)]
pub struct Terrain {
    config: TerrainConfig,
    strips: Vec<Vec<Vertex>>,
    water: [Vertex; 4],
}

impl Terrain {
    #[must_use]
    pub fn build(config: &TerrainConfig) -> Self {
        let resolution = config.resolution.max(1);
        let step = 2.0 * config.extent / f64::from(resolution);
        let coordinate = |index: u32| -config.extent + f64::from(index) * step;

        let strips = (0..resolution)
            .map(|row| {
                let (y0, y1) = (coordinate(row), coordinate(row + 1));
                (0..=resolution)
                    .flat_map(|column| {
                        let x = coordinate(column);
                        [vertex(config, x, y0), vertex(config, x, y1)]
                    })
                    .collect()
            })
            .collect();

        let extent = config.extent;
        let corner = |x: f64, y: f64| {
            Vertex::new(
                DVec3::new(x, y, config.water_level),
                DVec3::Z,
                DVec2::ZERO,
            )
        };
        let water = [
            corner(-extent, -extent),
            corner(extent, -extent),
            corner(extent, extent),
            corner(-extent, extent),
        ];

        Self {
            config: config.clone(),
            strips,
            water,
        }
    }

    #[must_use]
    pub fn height_at(&self, x: f64, y: f64) -> f64 {
        height(&self.config, x, y)
    }

    #[must_use]
    pub fn strips(&self) -> &[Vec<Vertex>] {
        &self.strips
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_color(DVec4::ONE);
        surface.set_texture_enabled(TextureDimension::One, true);
        surface.bind_texture(TextureId::Terrain);
        for strip in &self.strips {
            surface.quad_strip(strip);
        }
        surface.set_texture_enabled(TextureDimension::One, false);

        surface.set_color(WATER_COLOR);
        surface.quads(&self.water);
    }
}

fn phases(config: &TerrainConfig, x: f64, y: f64) -> (f64, f64) {
    let (fx, fy) = (x * config.frequency_scale, y * config.frequency_scale);
    (0.3 * fx + 0.2 * fy, fx - 0.5 * fy)
}

fn height(config: &TerrainConfig, x: f64, y: f64) -> f64 {
    let (a, b) = phases(config, x, y);
    config.height_scale * (0.6 * a.cos() + 0.4 * b.cos())
}

fn normal(config: &TerrainConfig, x: f64, y: f64) -> DVec3 {
    let (a, b) = phases(config, x, y);
    let (f, s) = (config.frequency_scale, config.height_scale);
    let dx = -s * f * (0.6 * 0.3 * a.sin() + 0.4 * b.sin());
    let dy = -s * f * (0.6 * 0.2 * a.sin() - 0.4 * 0.5 * b.sin());
    DVec3::new(-dx, -dy, 1.0).normalize()
}

/// Maps heights `-s..=s` onto texture coordinates `0..=1`: water, sand, grass.
fn texture_coordinate(config: &TerrainConfig, height: f64) -> f64 {
    if config.height_scale.abs() <= f64::EPSILON {
        return 0.5;
    }
    (0.5 + 0.5 * height / config.height_scale.abs()).clamp(0.0, 1.0)
}

fn vertex(config: &TerrainConfig, x: f64, y: f64) -> Vertex {
    let z = height(config, x, y);
    Vertex::new(
        DVec3::new(x, y, z),
        normal(config, x, y),
        DVec2::new(texture_coordinate(config, z), 0.0),
    )
}
