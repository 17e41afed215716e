//! Mesh construction: raw attribute streams into GPU-ready vertex data,
//! synthesizing the tangent space when the source omits it.

use glam::{Vec2, Vec3};

use crate::scene::vertex::Vertex;

/// UV determinants below this magnitude are treated as degenerate; the
/// triangle then contributes nothing to the tangent accumulation.
const UV_DEGENERATE_EPS: f32 = 1e-6;

/// Opaque handle to an uploaded texture, owned by the
/// [`TextureStore`](crate::gpu::texture::TextureStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// The null handle: binds the store's built-in fallback texture.
    /// Substituted when a texture fails to load.
    pub const NULL: Self = Self(0);
}

/// Semantic role of a texture reference, so the shading stage knows
/// which slot to bind it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    /// Base color map.
    Diffuse,
    /// Specular intensity map.
    Specular,
    /// Tangent-space normal map.
    Normal,
}

/// A texture handle tagged with its semantic role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    /// Handle into the texture store.
    pub handle: TextureHandle,
    /// What the texture means to the shader.
    pub role: TextureRole,
}

/// Raw per-vertex attribute streams as delivered by an asset parser or
/// a procedural generator. Positions and normals are always present;
/// everything else is optional and synthesized by [`build_mesh`].
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals (same length as positions).
    pub normals: Vec<Vec3>,
    /// Texture coordinates, if authored.
    pub uvs: Option<Vec<Vec2>>,
    /// Authored tangents, if present.
    pub tangents: Option<Vec<Vec3>>,
    /// Authored bitangents, if present.
    pub bitangents: Option<Vec<Vec3>>,
    /// Triangle indices (three per face).
    pub indices: Vec<u32>,
}

/// A complete mesh: interleaved vertices, triangle indices, and tagged
/// texture references. Immutable after construction; owned by the
/// [`Model`](crate::scene::model::Model) that produced it.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Interleaved vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices (three per face).
    pub indices: Vec<u32>,
    /// Textures resolved from the source material, in slot order
    /// (diffuse, specular, normal).
    pub textures: Vec<TextureRef>,
}

/// Build a [`Mesh`] from raw attribute streams.
///
/// Missing texture coordinates default to (0, 0) per vertex and never
/// fail construction. The tangent space is handled in three tiers:
///
/// 1. Source provided tangents *and* bitangents: passed through
///    unchanged, no renormalization.
/// 2. Source provided tangents only: each tangent is normalized and the
///    bitangent re-derived from `cross(tangent, normal)`; a degenerate
///    tangent falls back to the fixed pair (1,0,0)/(0,1,0). The fixed
///    pair is not guaranteed orthogonal to the normal — a known
///    approximation, kept for compatibility with existing assets.
/// 3. No tangents at all: generated from the UV gradients per triangle
///    and accumulated per vertex (see [`generate_tangents`]).
#[must_use]
pub fn build_mesh(raw: &RawMesh, textures: Vec<TextureRef>) -> Mesh {
    let count = raw.positions.len();
    let mut vertices: Vec<Vertex> = Vec::with_capacity(count);

    for i in 0..count {
        let uv = raw
            .uvs
            .as_ref()
            .and_then(|uvs| uvs.get(i).copied())
            .unwrap_or(Vec2::ZERO);
        vertices.push(Vertex {
            position: raw.positions[i].to_array(),
            normal: raw.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
            uv: uv.to_array(),
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
        });
    }

    match (&raw.tangents, &raw.bitangents) {
        (Some(tangents), Some(bitangents)) => {
            for (i, vertex) in vertices.iter_mut().enumerate() {
                vertex.tangent =
                    tangents.get(i).copied().unwrap_or(Vec3::X).to_array();
                vertex.bitangent =
                    bitangents.get(i).copied().unwrap_or(Vec3::Y).to_array();
            }
        }
        (Some(tangents), None) => {
            for (i, vertex) in vertices.iter_mut().enumerate() {
                let tangent = tangents.get(i).copied().unwrap_or(Vec3::ZERO);
                let normal = Vec3::from_array(vertex.normal);
                if tangent.length() > UV_DEGENERATE_EPS {
                    let tangent = tangent.normalize();
                    vertex.tangent = tangent.to_array();
                    vertex.bitangent =
                        tangent.cross(normal).normalize().to_array();
                } else {
                    vertex.tangent = [1.0, 0.0, 0.0];
                    vertex.bitangent = [0.0, 1.0, 0.0];
                }
            }
        }
        _ => generate_tangents(&mut vertices, &raw.indices),
    }

    Mesh {
        vertices,
        indices: raw.indices.clone(),
        textures,
    }
}

/// Generate per-vertex tangents and bitangents from UV gradients.
///
/// For each triangle the tangent-space vectors are solved from the
/// position edges and UV deltas, then *accumulated* into all three
/// vertices; vertices shared across triangles receive an implicitly
/// weighted average through the summation. A triangle whose UV
/// determinant is near zero contributes exactly zero instead of
/// dividing by it. After accumulation every vector is normalized;
/// vertices touched only by degenerate triangles stay at zero.
pub fn generate_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) =
            (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let p0 = Vec3::from_array(vertices[i0].position);
        let p1 = Vec3::from_array(vertices[i1].position);
        let p2 = Vec3::from_array(vertices[i2].position);
        let uv0 = Vec2::from_array(vertices[i0].uv);
        let uv1 = Vec2::from_array(vertices[i1].uv);
        let uv2 = Vec2::from_array(vertices[i2].uv);

        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let duv1 = uv1 - uv0;
        let duv2 = uv2 - uv0;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        let f = if det.abs() > UV_DEGENERATE_EPS {
            1.0 / det
        } else {
            0.0
        };

        let tangent = (edge1 * duv2.y - edge2 * duv1.y) * f;
        let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * f;

        for &i in &[i0, i1, i2] {
            let t = Vec3::from_array(vertices[i].tangent) + tangent;
            let b = Vec3::from_array(vertices[i].bitangent) + bitangent;
            vertices[i].tangent = t.to_array();
            vertices[i].bitangent = b.to_array();
        }
    }

    for vertex in vertices.iter_mut() {
        vertex.tangent = Vec3::from_array(vertex.tangent)
            .normalize_or_zero()
            .to_array();
        vertex.bitangent = Vec3::from_array(vertex.bitangent)
            .normalize_or_zero()
            .to_array();
    }
}
