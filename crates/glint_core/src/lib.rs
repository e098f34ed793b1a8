//! Glint Core - renderer-agnostic scene description.
//!
//! This crate provides:
//!
//! - **Scene description records**: `CameraDesc`, `SphereDesc`,
//!   `LightDesc`, `QuadDesc`, `SceneDesc`
//! - **Persistence**: the whitespace-separated scene format the editor
//!   writes and the headless renderer reads
//!
//! # Example
//!
//! ```ignore
//! use glint_core::SceneDesc;
//!
//! let scene = SceneDesc::load("scene.txt")?;
//! println!("Loaded {} spheres, {} lights, {} quads",
//!     scene.spheres.len(),
//!     scene.lights.len(),
//!     scene.quads.len());
//! ```

pub mod scene;

// Re-export commonly used types
pub use scene::{
    CameraDesc, LightDesc, MaterialKind, QuadDesc, SceneDesc, SceneError, SceneResult, SphereDesc,
};
