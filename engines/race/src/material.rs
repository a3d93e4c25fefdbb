use glam::DVec4;
use serde::{Deserialize, Serialize};

/// Fixed-function surface reflectance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub diffuse: DVec4,
    pub ambient: DVec4,
    pub specular: DVec4,
    pub shininess: f64,
}

impl Material {
    pub const GOLD: Self = Self {
        diffuse: DVec4::new(0.752, 0.606, 0.226, 1.0),
        ambient: DVec4::new(0.247, 0.199, 0.075, 1.0),
        specular: DVec4::new(0.628, 0.556, 0.366, 1.0),
        shininess: 51.2,
    };

    pub const SILVER: Self = Self {
        diffuse: DVec4::new(0.508, 0.508, 0.508, 1.0),
        ambient: DVec4::new(0.192, 0.192, 0.192, 1.0),
        specular: DVec4::new(0.508, 0.508, 0.508, 1.0),
        shininess: 51.2,
    };

    pub const WOOD: Self = Self {
        diffuse: DVec4::new(0.545, 0.353, 0.169, 1.0),
        ambient: DVec4::new(0.2, 0.13, 0.06, 1.0),
        specular: DVec4::new(0.05, 0.05, 0.05, 1.0),
        shininess: 4.0,
    };

    pub const ORANGE: Self = Self {
        diffuse: DVec4::new(1.0, 0.5, 0.0, 1.0),
        ambient: DVec4::new(0.3, 0.15, 0.0, 1.0),
        specular: DVec4::new(0.3, 0.3, 0.3, 1.0),
        shininess: 20.0,
    };

    /// Materials of robots 0 to 3.
    pub const ROBOTS: [Self; 4] = [Self::GOLD, Self::SILVER, Self::WOOD, Self::ORANGE];
}
