//! The immediate-mode drawing surface the race is rendered through.
//!
//! The engine never talks to a graphics API directly. A host implements [`DrawSurface`] on top
//! of whatever it renders with; [`RecordingSurface`] keeps the calls for inspection instead.

mod recording;

use glam::{DVec2, DVec3, DVec4};
use lib_geometry::{Camera, Projection};

use crate::material::Material;

pub use recording::{DrawCommand, FrameStats, Primitive, RecordingSurface};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vertex {
    pub position: DVec3,
    pub normal: DVec3,
    pub tex_coord: DVec2,
}

impl Vertex {
    #[must_use]
    pub fn new(position: DVec3, normal: DVec3, tex_coord: DVec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Whether a built-in solid is filled or drawn as a wire frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    Solid,
    Wire,
}

/// Textures are loaded by the host; the engine only refers to them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureId {
    Track,
    Brick,
    Head,
    Torso,
    /// one-dimensional height palette
    Terrain,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    One,
    Two,
}

pub trait DrawSurface {
    fn clear(&mut self, color: DVec4);
    fn set_view(&mut self, camera: &Camera, projection: &Projection);

    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    fn translate(&mut self, offset: DVec3);
    /// Rotates by `degrees` around `axis`, in the current frame.
    fn rotate(&mut self, degrees: f64, axis: DVec3);
    fn scale(&mut self, factors: DVec3);

    fn set_color(&mut self, color: DVec4);
    fn set_material(&mut self, material: &Material);
    fn bind_texture(&mut self, texture: TextureId);
    fn set_texture_enabled(&mut self, dimension: TextureDimension, enabled: bool);

    /// Pairs of points, each pair one line.
    fn lines(&mut self, points: &[DVec3]);
    /// Groups of four vertices, each group one quad.
    fn quads(&mut self, vertices: &[Vertex]);
    fn quad_strip(&mut self, vertices: &[Vertex]);

    fn sphere(&mut self, radius: f64, slices: u32, stacks: u32, fill: Fill);
    /// Extends from the origin along +z.
    fn cylinder(&mut self, radius: f64, height: f64, slices: u32, stacks: u32, fill: Fill);
    /// Base at the origin, tip on +z.
    fn cone(&mut self, base: f64, height: f64, slices: u32, stacks: u32, fill: Fill);
    fn cube(&mut self, size: f64, fill: Fill);
}

/// Runs `draw` between a matching push and pop of the transform stack.
pub fn scoped<S: DrawSurface + ?Sized>(surface: &mut S, draw: impl FnOnce(&mut S)) {
    surface.push_matrix();
    draw(surface);
    surface.pop_matrix();
}
