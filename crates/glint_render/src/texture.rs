//! Textures: polymorphic color lookups over (u, v, p).

use glint_math::{Color, Point3};

/// A color that varies over a surface parameterization and position.
pub trait Texture: Send + Sync {
    /// Sample the texture at UV coordinates and world position.
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A constant color everywhere.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// A spatial checker pattern alternating between two colors.
pub struct Checker {
    inv_scale: f64,
    even: Color,
    odd: Color,
}

impl Checker {
    pub fn new(scale: f64, even: Color, odd: Color) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }
}

impl Texture for Checker {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        let x = (self.inv_scale * p.x).floor() as i64;
        let y = (self.inv_scale * p.y).floor() as i64;
        let z = (self.inv_scale * p.z).floor() as i64;

        if (x + y + z) % 2 == 0 {
            self.even
        } else {
            self.odd
        }
    }
}
