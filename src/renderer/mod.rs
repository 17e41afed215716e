//! Forward renderer: one pass drawing every imported model with the
//! scene's lights.

/// The scene pipeline, GPU mesh upload, and per-frame drawing.
pub mod scene_renderer;

pub use scene_renderer::{GpuModel, SceneRenderer};
