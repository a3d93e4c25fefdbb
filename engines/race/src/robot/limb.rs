//! Rigid body parts joined into a fixed tree.

use glam::{DMat4, DVec2, DVec3, DVec4};

use crate::{
    draw::{scoped, DrawSurface, Fill, TextureDimension, TextureId},
    material::Material,
};

const STICK_COLOR: DVec4 = DVec4::new(0.0, 0.0, 0.0, 1.0);
const JOINT_COLOR: DVec4 = DVec4::new(1.0, 0.0, 0.0, 1.0);
const JOINT_RADIUS: f64 = 0.3;
const LIMB_RADIUS: f64 = 0.45;

/// How a robot is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DrawStyle {
    #[default]
    Solid,
    StickFigure,
}

/// Role of a limb without its geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LimbRole {
    Torso,
    Head,
    UpperLeg,
    LowerLeg,
    Foot,
}

/// The role of a limb together with the dimensions its shape is drawn with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LimbKind {
    /// Spine along x, centered on the joint; hips at `(±hips.x, ±hips.y, 0)`.
    Torso { length: f64, hips: DVec2 },
    /// Neck along +x, skull at its end.
    Head { neck: f64, radius: f64 },
    /// Bone hanging down -z.
    UpperLeg { length: f64 },
    LowerLeg { length: f64 },
    /// Sole along x, centered on the ankle.
    Foot { length: f64 },
}

impl LimbKind {
    #[must_use]
    pub fn role(&self) -> LimbRole {
        match self {
            LimbKind::Torso { .. } => LimbRole::Torso,
            LimbKind::Head { .. } => LimbRole::Head,
            LimbKind::UpperLeg { .. } => LimbRole::UpperLeg,
            LimbKind::LowerLeg { .. } => LimbRole::LowerLeg,
            LimbKind::Foot { .. } => LimbRole::Foot,
        }
    }

    fn draw_stick<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        match *self {
            LimbKind::Torso { length, hips } => {
                surface.set_color(STICK_COLOR);
                let half = length / 2.0;
                surface.lines(&[
                    DVec3::new(-half, 0.0, 0.0),
                    DVec3::new(half, 0.0, 0.0),
                    // shoulders and pelvis
                    DVec3::new(hips.x, 0.0, 0.0),
                    DVec3::new(hips.x, hips.y, 0.0),
                    DVec3::new(hips.x, 0.0, 0.0),
                    DVec3::new(hips.x, -hips.y, 0.0),
                    DVec3::new(-hips.x, 0.0, 0.0),
                    DVec3::new(-hips.x, hips.y, 0.0),
                    DVec3::new(-hips.x, 0.0, 0.0),
                    DVec3::new(-hips.x, -hips.y, 0.0),
                ]);
            }
            LimbKind::Head { neck, .. } => {
                joint(surface);
                surface.set_color(STICK_COLOR);
                surface.lines(&[DVec3::ZERO, DVec3::new(neck, 0.0, 0.0)]);
            }
            LimbKind::UpperLeg { length } | LimbKind::LowerLeg { length } => {
                surface.set_color(STICK_COLOR);
                surface.lines(&[DVec3::ZERO, DVec3::new(0.0, 0.0, -length)]);
                joint(surface);
            }
            LimbKind::Foot { length } => {
                joint(surface);
                surface.set_color(STICK_COLOR);
                let half = length / 2.0;
                surface.lines(&[DVec3::new(-half, 0.0, 0.0), DVec3::new(half, 0.0, 0.0)]);
            }
        }
    }

    fn draw_solid<S: DrawSurface + ?Sized>(&self, surface: &mut S, material: &Material) {
        surface.set_material(material);
        surface.set_color(material.diffuse);
        match *self {
            LimbKind::Torso { length, hips } => {
                surface.set_texture_enabled(TextureDimension::Two, true);
                surface.bind_texture(TextureId::Torso);
                scoped(surface, |surface| {
                    surface.scale(DVec3::new(length, 2.0 * hips.y, 2.0 * hips.y));
                    surface.cube(1.0, Fill::Solid);
                });
                surface.set_texture_enabled(TextureDimension::Two, false);
            }
            LimbKind::Head { neck, radius } => {
                scoped(surface, |surface| {
                    surface.rotate(90.0, DVec3::Y);
                    surface.cylinder(LIMB_RADIUS, neck, 12, 1, Fill::Solid);
                });
                surface.set_texture_enabled(TextureDimension::Two, true);
                surface.bind_texture(TextureId::Head);
                scoped(surface, |surface| {
                    surface.translate(DVec3::new(neck, 0.0, 0.0));
                    surface.sphere(radius, 16, 16, Fill::Solid);
                });
                surface.set_texture_enabled(TextureDimension::Two, false);
            }
            LimbKind::UpperLeg { length } | LimbKind::LowerLeg { length } => {
                surface.sphere(LIMB_RADIUS * 1.4, 12, 12, Fill::Solid);
                scoped(surface, |surface| {
                    surface.translate(DVec3::new(0.0, 0.0, -length));
                    surface.cylinder(LIMB_RADIUS, length, 12, 1, Fill::Solid);
                });
            }
            LimbKind::Foot { length } => {
                scoped(surface, |surface| {
                    surface.translate(DVec3::new(length / 4.0, 0.0, 0.0));
                    surface.scale(DVec3::new(length, LIMB_RADIUS * 2.0, LIMB_RADIUS));
                    surface.cube(1.0, Fill::Solid);
                });
            }
        }
    }
}

fn joint<S: DrawSurface + ?Sized>(surface: &mut S) {
    surface.set_color(JOINT_COLOR);
    surface.sphere(JOINT_RADIUS, 5, 5, Fill::Wire);
}

/// A node of a robot's body.
///
/// Which limbs exist and where they attach is decided at construction;
/// afterwards only the joint rotations change.
#[derive(Clone, Debug, PartialEq)]
pub struct Limb {
    kind: LimbKind,
    local_origin: DVec3,
    /// degrees around x, y and z
    rotation: DVec3,
    children: Vec<Limb>,
}

impl Limb {
    #[must_use]
    pub fn new(kind: LimbKind, local_origin: DVec3, children: Vec<Limb>) -> Self {
        Self {
            kind,
            local_origin,
            rotation: DVec3::ZERO,
            children,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &LimbKind {
        &self.kind
    }

    #[must_use]
    pub fn role(&self) -> LimbRole {
        self.kind.role()
    }

    #[must_use]
    pub fn local_origin(&self) -> DVec3 {
        self.local_origin
    }

    #[must_use]
    pub fn rotation(&self) -> DVec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: DVec3) {
        self.rotation = degrees;
    }

    #[must_use]
    pub fn children(&self) -> &[Limb] {
        &self.children
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Limb> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Limb> {
        self.children.get_mut(index)
    }

    /// Joint frame relative to the parent: move to the joint, then turn around z, x and y.
    #[must_use]
    pub fn local_transform(&self) -> DMat4 {
        DMat4::from_translation(self.local_origin)
            * DMat4::from_rotation_z(self.rotation.z.to_radians())
            * DMat4::from_rotation_x(self.rotation.x.to_radians())
            * DMat4::from_rotation_y(self.rotation.y.to_radians())
    }

    /// World transforms of this limb and all descendants, parents before children.
    #[must_use]
    pub fn world_transforms(&self, parent: DMat4) -> Vec<(LimbRole, DMat4)> {
        let mut transforms = Vec::new();
        self.collect_transforms(parent, &mut transforms);
        transforms
    }

    fn collect_transforms(&self, parent: DMat4, transforms: &mut Vec<(LimbRole, DMat4)>) {
        let world = parent * self.local_transform();
        transforms.push((self.role(), world));
        for child in &self.children {
            child.collect_transforms(world, transforms);
        }
    }

    /// Draws this limb and its descendants in the surface's current frame.
    pub fn draw<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        style: DrawStyle,
        material: &Material,
    ) {
        scoped(surface, |surface| {
            surface.translate(self.local_origin);
            surface.rotate(self.rotation.z, DVec3::Z);
            surface.rotate(self.rotation.x, DVec3::X);
            surface.rotate(self.rotation.y, DVec3::Y);

            match style {
                DrawStyle::StickFigure => self.kind.draw_stick(surface),
                DrawStyle::Solid => self.kind.draw_solid(surface, material),
            }

            for child in &self.children {
                child.draw(surface, style, material);
            }
        });
    }
}
