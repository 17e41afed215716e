//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization and the texture store
//! that decodes image files and keeps the resident GPU textures alive.

/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Image decode/upload and the resident texture store.
pub mod texture;
