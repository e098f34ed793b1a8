//! Scene description records and the persisted scene format.
//!
//! The editor serializes a scene as whitespace-separated numbers:
//! a camera header, then a sphere count followed by sphere records,
//! a light count followed by emissive-sphere records, and a quad count
//! followed by quad records. The headless renderer reads this format
//! back; the records here are plain data with no rendering behavior.

use std::fmt;
use std::path::Path;

use glint_math::{Color, Point3, Vec3};
use thiserror::Error;

/// Errors that can occur while reading a persisted scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of scene data (expected {expected} at token {position})")]
    UnexpectedEnd { expected: &'static str, position: usize },

    #[error("Invalid number '{token}' at token {position}: expected {expected}")]
    InvalidNumber {
        token: String,
        position: usize,
        expected: &'static str,
    },
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

/// Surface material selector used by the editor records.
///
/// The numeric codes are part of the persisted format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialKind {
    #[default]
    Lambertian,
    Metal,
    Dielectric,
    DiffuseLight,
}

impl MaterialKind {
    /// Decode a material code. Unknown codes fall back to lambertian,
    /// matching the editor's behavior.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => MaterialKind::Metal,
            2 => MaterialKind::Dielectric,
            3 => MaterialKind::DiffuseLight,
            _ => MaterialKind::Lambertian,
        }
    }

    /// The persisted numeric code.
    pub fn code(self) -> i64 {
        match self {
            MaterialKind::Lambertian => 0,
            MaterialKind::Metal => 1,
            MaterialKind::Dielectric => 2,
            MaterialKind::DiffuseLight => 3,
        }
    }
}

/// Camera header of a persisted scene.
#[derive(Debug, Clone)]
pub struct CameraDesc {
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub vfov: f64,
    pub aspect_ratio: f64,
    pub defocus_angle: f64,
    pub focus_dist: f64,
    pub lookfrom: Point3,
    pub lookat: Point3,
    pub background: Color,
    /// Not part of the persisted header; the editor renders with a
    /// fixed bounce budget.
    pub max_depth: u32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            image_width: 400,
            samples_per_pixel: 100,
            vfov: 20.0,
            aspect_ratio: 16.0 / 9.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            lookfrom: Point3::new(13.0, 2.0, 3.0),
            lookat: Point3::ZERO,
            background: Color::new(0.70, 0.80, 1.00),
            max_depth: 50,
        }
    }
}

/// An editable sphere record.
#[derive(Debug, Clone)]
pub struct SphereDesc {
    pub center: Point3,
    pub radius: f64,
    pub material: MaterialKind,
    pub albedo: Color,
    /// Fuzz for metal, refraction index for dielectric.
    pub param: f64,
}

/// An emissive sphere light record.
#[derive(Debug, Clone)]
pub struct LightDesc {
    pub center: Point3,
    pub radius: f64,
    pub color: Color,
    /// Multiplier applied to `color` for the emitted radiance.
    pub intensity: f64,
}

/// A parallelogram record.
#[derive(Debug, Clone)]
pub struct QuadDesc {
    pub corner: Point3,
    pub side_a: Vec3,
    pub side_b: Vec3,
    pub material: MaterialKind,
    pub color: Color,
    /// Fuzz for metal, refraction index for dielectric,
    /// intensity for diffuse light.
    pub param: f64,
}

/// A complete scene description: camera plus primitive records.
#[derive(Debug, Clone, Default)]
pub struct SceneDesc {
    pub camera: CameraDesc,
    pub spheres: Vec<SphereDesc>,
    pub lights: Vec<LightDesc>,
    pub quads: Vec<QuadDesc>,
}

impl SceneDesc {
    /// Read a scene from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse the whitespace-separated scene format.
    pub fn parse(content: &str) -> SceneResult<Self> {
        let mut tokens = Tokens::new(content);

        let mut camera = CameraDesc {
            image_width: tokens.next_u32("image width")?,
            samples_per_pixel: tokens.next_u32("samples per pixel")?,
            vfov: tokens.next_f64("vfov")?,
            aspect_ratio: tokens.next_f64("aspect ratio")?,
            defocus_angle: tokens.next_f64("defocus angle")?,
            focus_dist: tokens.next_f64("focus distance")?,
            ..CameraDesc::default()
        };
        camera.lookfrom = tokens.next_vec3("lookfrom")?;
        camera.lookat = tokens.next_vec3("lookat")?;
        camera.background = tokens.next_vec3("background color")?;

        let sphere_count = tokens.next_usize("sphere count")?;
        let mut spheres = Vec::with_capacity(sphere_count);
        for _ in 0..sphere_count {
            spheres.push(SphereDesc {
                center: tokens.next_vec3("sphere center")?,
                radius: tokens.next_f64("sphere radius")?,
                material: MaterialKind::from_code(tokens.next_i64("sphere material code")?),
                albedo: tokens.next_vec3("sphere albedo")?,
                param: tokens.next_f64("sphere material parameter")?,
            });
        }

        let light_count = tokens.next_usize("light count")?;
        let mut lights = Vec::with_capacity(light_count);
        for _ in 0..light_count {
            lights.push(LightDesc {
                center: tokens.next_vec3("light center")?,
                radius: tokens.next_f64("light radius")?,
                color: tokens.next_vec3("light color")?,
                intensity: tokens.next_f64("light intensity")?,
            });
        }

        let quad_count = tokens.next_usize("quad count")?;
        let mut quads = Vec::with_capacity(quad_count);
        for _ in 0..quad_count {
            quads.push(QuadDesc {
                corner: tokens.next_vec3("quad corner")?,
                side_a: tokens.next_vec3("quad side A")?,
                side_b: tokens.next_vec3("quad side B")?,
                material: MaterialKind::from_code(tokens.next_i64("quad material code")?),
                color: tokens.next_vec3("quad color")?,
                param: tokens.next_f64("quad material parameter")?,
            });
        }

        log::debug!(
            "parsed scene: {} spheres, {} lights, {} quads",
            spheres.len(),
            lights.len(),
            quads.len()
        );

        Ok(Self {
            camera,
            spheres,
            lights,
            quads,
        })
    }

    /// Serialize back to the persisted format.
    pub fn write<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let cam = &self.camera;
        writeln!(
            out,
            "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
            cam.image_width,
            cam.samples_per_pixel,
            cam.vfov,
            cam.aspect_ratio,
            cam.defocus_angle,
            cam.focus_dist,
            cam.lookfrom.x,
            cam.lookfrom.y,
            cam.lookfrom.z,
            cam.lookat.x,
            cam.lookat.y,
            cam.lookat.z,
            cam.background.x,
            cam.background.y,
            cam.background.z,
        )?;

        writeln!(out, "{}", self.spheres.len())?;
        for s in &self.spheres {
            writeln!(
                out,
                "{} {} {} {} {} {} {} {} {}",
                s.center.x,
                s.center.y,
                s.center.z,
                s.radius,
                s.material.code(),
                s.albedo.x,
                s.albedo.y,
                s.albedo.z,
                s.param,
            )?;
        }

        writeln!(out, "{}", self.lights.len())?;
        for l in &self.lights {
            writeln!(
                out,
                "{} {} {} {} {} {} {} {}",
                l.center.x,
                l.center.y,
                l.center.z,
                l.radius,
                l.color.x,
                l.color.y,
                l.color.z,
                l.intensity,
            )?;
        }

        writeln!(out, "{}", self.quads.len())?;
        for q in &self.quads {
            writeln!(
                out,
                "{} {} {} {} {} {} {} {} {} {} {} {} {} {}",
                q.corner.x,
                q.corner.y,
                q.corner.z,
                q.side_a.x,
                q.side_a.y,
                q.side_a.z,
                q.side_b.x,
                q.side_b.y,
                q.side_b.z,
                q.material.code(),
                q.color.x,
                q.color.y,
                q.color.z,
                q.param,
            )?;
        }

        Ok(())
    }
}

/// Whitespace token stream with position tracking for diagnostics.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            iter: content.split_whitespace(),
            position: 0,
        }
    }

    fn next_token(&mut self, expected: &'static str) -> SceneResult<&'a str> {
        self.position += 1;
        self.iter.next().ok_or(SceneError::UnexpectedEnd {
            expected,
            position: self.position,
        })
    }

    fn next_f64(&mut self, expected: &'static str) -> SceneResult<f64> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| SceneError::InvalidNumber {
            token: token.to_string(),
            position: self.position,
            expected,
        })
    }

    fn next_i64(&mut self, expected: &'static str) -> SceneResult<i64> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| SceneError::InvalidNumber {
            token: token.to_string(),
            position: self.position,
            expected,
        })
    }

    fn next_u32(&mut self, expected: &'static str) -> SceneResult<u32> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| SceneError::InvalidNumber {
            token: token.to_string(),
            position: self.position,
            expected,
        })
    }

    fn next_usize(&mut self, expected: &'static str) -> SceneResult<usize> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| SceneError::InvalidNumber {
            token: token.to_string(),
            position: self.position,
            expected,
        })
    }

    fn next_vec3(&mut self, expected: &'static str) -> SceneResult<Vec3> {
        Ok(Vec3::new(
            self.next_f64(expected)?,
            self.next_f64(expected)?,
            self.next_f64(expected)?,
        ))
    }
}
