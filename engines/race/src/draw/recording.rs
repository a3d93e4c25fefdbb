use glam::{DMat4, DVec3, DVec4};
use lib_geometry::{Camera, Projection};
use log::{trace, warn};

use super::{DrawSurface, Fill, TextureDimension, TextureId, Vertex};
use crate::material::Material;

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Lines(Vec<DVec3>),
    Quads(Vec<Vertex>),
    QuadStrip(Vec<Vertex>),
    Sphere {
        radius: f64,
        slices: u32,
        stacks: u32,
        fill: Fill,
    },
    Cylinder {
        radius: f64,
        height: f64,
        slices: u32,
        stacks: u32,
        fill: Fill,
    },
    Cone {
        base: f64,
        height: f64,
        slices: u32,
        stacks: u32,
        fill: Fill,
    },
    Cube {
        size: f64,
        fill: Fill,
    },
}

impl Primitive {
    fn vertex_count(&self) -> usize {
        match self {
            Primitive::Lines(points) => points.len(),
            Primitive::Quads(vertices) | Primitive::QuadStrip(vertices) => vertices.len(),
            Primitive::Sphere { .. }
            | Primitive::Cylinder { .. }
            | Primitive::Cone { .. }
            | Primitive::Cube { .. } => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(DVec4),
    SetView {
        camera: Camera,
        projection: Projection,
    },
    SetColor(DVec4),
    SetMaterial(Material),
    BindTexture(TextureId),
    SetTextureEnabled {
        dimension: TextureDimension,
        enabled: bool,
    },
    /// `transform` is the model matrix that was current when the primitive was emitted.
    Draw {
        transform: DMat4,
        primitive: Primitive,
    },
}

/// Summary of one recorded frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub commands: usize,
    pub primitives: usize,
    pub vertices: usize,
    /// primitives whose local origin lies inside the view volume
    pub in_view: usize,
    pub max_stack_depth: usize,
}

/// A [`DrawSurface`] that keeps every call instead of rendering it.
///
/// Transform calls are applied to an internal matrix stack, so each recorded primitive
/// carries its composed model matrix.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    view_projection: DMat4,
    transform: DMat4,
    stack: Vec<DMat4>,
    max_stack_depth: usize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the previous frame's commands and resets the transform.
    pub fn begin_frame(&mut self) {
        if !self.stack.is_empty() {
            warn!(
                "previous frame left {} matrices on the stack",
                self.stack.len()
            );
        }
        self.view_projection = DMat4::IDENTITY;
        self.transform = DMat4::IDENTITY;
        self.stack.clear();
        self.max_stack_depth = 0;
        self.commands.clear();
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Emitted primitives in order, with their model matrices.
    pub fn primitives(&self) -> impl Iterator<Item = (&DMat4, &Primitive)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Draw {
                transform,
                primitive,
            } => Some((transform, primitive)),
            _ => None,
        })
    }

    #[must_use]
    pub fn transform(&self) -> DMat4 {
        self.transform
    }

    /// Projection times view of the last [`DrawSurface::set_view`] this frame.
    #[must_use]
    pub fn view_projection(&self) -> DMat4 {
        self.view_projection
    }

    /// Whether the local origin of a primitive drawn under `transform` would be on screen.
    #[must_use]
    pub fn is_in_view(&self, transform: &DMat4) -> bool {
        let clip = (self.view_projection * *transform) * DVec4::W;
        clip.w > 0.0 && clip.truncate().abs().cmple(DVec3::splat(clip.w)).all()
    }

    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        let mut stats = FrameStats {
            commands: self.commands.len(),
            max_stack_depth: self.max_stack_depth,
            ..FrameStats::default()
        };
        for (transform, primitive) in self.primitives() {
            stats.primitives += 1;
            stats.vertices += primitive.vertex_count();
            if self.is_in_view(transform) {
                stats.in_view += 1;
            }
        }
        stats
    }

    fn emit(&mut self, primitive: Primitive) {
        self.commands.push(DrawCommand::Draw {
            transform: self.transform,
            primitive,
        });
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: DVec4) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_view(&mut self, camera: &Camera, projection: &Projection) {
        self.view_projection = projection.matrix() * camera.view_matrix();
        self.commands.push(DrawCommand::SetView {
            camera: *camera,
            projection: projection.clone(),
        });
    }

    fn push_matrix(&mut self) {
        self.stack.push(self.transform);
        self.max_stack_depth = self.max_stack_depth.max(self.stack.len());
    }

    fn pop_matrix(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        } else {
            warn!("pop_matrix on an empty stack ignored");
        }
    }

    fn translate(&mut self, offset: DVec3) {
        self.transform *= DMat4::from_translation(offset);
    }

    fn rotate(&mut self, degrees: f64, axis: DVec3) {
        let Some(axis) = axis.try_normalize() else {
            trace!("rotation around a zero axis ignored");
            return;
        };
        self.transform *= DMat4::from_axis_angle(axis, degrees.to_radians());
    }

    fn scale(&mut self, factors: DVec3) {
        self.transform *= DMat4::from_scale(factors);
    }

    fn set_color(&mut self, color: DVec4) {
        self.commands.push(DrawCommand::SetColor(color));
    }

    fn set_material(&mut self, material: &Material) {
        self.commands.push(DrawCommand::SetMaterial(*material));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.commands.push(DrawCommand::BindTexture(texture));
    }

    fn set_texture_enabled(&mut self, dimension: TextureDimension, enabled: bool) {
        self.commands
            .push(DrawCommand::SetTextureEnabled { dimension, enabled });
    }

    fn lines(&mut self, points: &[DVec3]) {
        self.emit(Primitive::Lines(points.to_vec()));
    }

    fn quads(&mut self, vertices: &[Vertex]) {
        self.emit(Primitive::Quads(vertices.to_vec()));
    }

    fn quad_strip(&mut self, vertices: &[Vertex]) {
        self.emit(Primitive::QuadStrip(vertices.to_vec()));
    }

    fn sphere(&mut self, radius: f64, slices: u32, stacks: u32, fill: Fill) {
        self.emit(Primitive::Sphere {
            radius,
            slices,
            stacks,
            fill,
        });
    }

    fn cylinder(&mut self, radius: f64, height: f64, slices: u32, stacks: u32, fill: Fill) {
        self.emit(Primitive::Cylinder {
            radius,
            height,
            slices,
            stacks,
            fill,
        });
    }

    fn cone(&mut self, base: f64, height: f64, slices: u32, stacks: u32, fill: Fill) {
        self.emit(Primitive::Cone {
            base,
            height,
            slices,
            stacks,
            fill,
        });
    }

    fn cube(&mut self, size: f64, fill: Fill) {
        self.emit(Primitive::Cube { size, fill });
    }
}
