//! Crate-level error types.

use std::fmt;
use std::path::PathBuf;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the nightdrive crate.
#[derive(Debug)]
pub enum NightdriveError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to import a scene asset.
    Import(ImportError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for NightdriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Import(e) => write!(f, "scene import error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for NightdriveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Import(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for NightdriveError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<ImportError> for NightdriveError {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

impl From<std::io::Error> for NightdriveError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Structural failure while importing a scene asset.
///
/// Fatal to that one import: the caller gets no model and decides whether
/// the process survives. Texture problems are *not* import errors; they
/// are recovered inside the import (see [`TextureLoadError`]).
#[derive(Debug)]
pub enum ImportError {
    /// The asset file could not be read or parsed.
    Parse(gltf::Error),
    /// The asset parsed but contains no scene root to traverse.
    MissingRoot(PathBuf),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "asset parse failed: {e}"),
            Self::MissingRoot(path) => {
                write!(f, "asset has no scene root: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::MissingRoot(_) => None,
        }
    }
}

impl From<gltf::Error> for ImportError {
    fn from(e: gltf::Error) -> Self {
        Self::Parse(e)
    }
}

/// Failure to turn a texture reference into a GPU texture.
///
/// Always recovered locally: the importer logs it and substitutes the
/// null handle so the rest of the model still loads.
#[derive(Debug)]
pub enum TextureLoadError {
    /// The image file could not be read.
    Io(std::io::Error),
    /// The image file was read but could not be decoded.
    Decode(image::ImageError),
    /// The material references an embedded texture (buffer view or data
    /// URI), which this importer does not support.
    Embedded(String),
}

impl fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "texture read failed: {e}"),
            Self::Decode(e) => write!(f, "texture decode failed: {e}"),
            Self::Embedded(name) => {
                write!(f, "embedded textures are not supported: {name}")
            }
        }
    }
}

impl std::error::Error for TextureLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Embedded(_) => None,
        }
    }
}

impl From<std::io::Error> for TextureLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for TextureLoadError {
    fn from(e: image::ImageError) -> Self {
        Self::Decode(e)
    }
}
