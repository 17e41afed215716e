//! Procedural UV-sphere geometry.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::scene::mesh::RawMesh;

/// Generate a UV sphere as raw mesh data (pole axis along +Y).
///
/// Vertices are laid out in `stacks + 1` latitude rings of
/// `sectors + 1` vertices each (the seam column is duplicated so the
/// texture wraps cleanly). Quads between rings are split into two
/// triangles, except at the poles where the degenerate triangle of each
/// quad is skipped. Normals are the unit positions; tangents are left
/// for the mesh builder to derive from the UVs.
#[must_use]
pub fn sphere_mesh(radius: f32, sectors: u32, stacks: u32) -> RawMesh {
    let sector_step = 2.0 * PI / sectors as f32;
    let stack_step = PI / stacks as f32;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();

    for i in 0..=stacks {
        let stack_angle = PI / 2.0 - i as f32 * stack_step;
        let ring = stack_angle.cos();
        let y = stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let normal = Vec3::new(
                ring * sector_angle.cos(),
                y,
                ring * sector_angle.sin(),
            );
            positions.push(normal * radius);
            normals.push(normal);
            uvs.push(Vec2::new(
                j as f32 / sectors as f32,
                i as f32 / stacks as f32,
            ));
        }
    }

    let mut indices = Vec::new();
    for i in 0..stacks {
        let mut k1 = i * (sectors + 1);
        let mut k2 = k1 + sectors + 1;

        for _ in 0..sectors {
            if i != 0 {
                indices.push(k1);
                indices.push(k2);
                indices.push(k1 + 1);
            }
            if i != stacks - 1 {
                indices.push(k1 + 1);
                indices.push(k2);
                indices.push(k2 + 1);
            }
            k1 += 1;
            k2 += 1;
        }
    }

    RawMesh {
        positions,
        normals,
        uvs: Some(uvs),
        tangents: None,
        bitangents: None,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_index_counts() {
        let sectors = 36;
        let stacks = 18;
        let raw = sphere_mesh(1.0, sectors, stacks);
        let expected_vertices = ((sectors + 1) * (stacks + 1)) as usize;
        assert_eq!(raw.positions.len(), expected_vertices);
        assert_eq!(raw.normals.len(), expected_vertices);
        // Each ring band is two triangles per sector, except the two
        // pole bands which contribute one each.
        let expected_triangles = (sectors * (2 * stacks - 2)) as usize;
        assert_eq!(raw.indices.len(), expected_triangles * 3);
    }

    #[test]
    fn indices_stay_in_bounds() {
        let raw = sphere_mesh(2.5, 12, 6);
        let count = raw.positions.len() as u32;
        assert!(raw.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn normals_are_unit_positions() {
        let radius = 2.5;
        let raw = sphere_mesh(radius, 8, 4);
        for (p, n) in raw.positions.iter().zip(&raw.normals) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((p.length() - radius).abs() < 1e-4);
            assert!((*p - *n * radius).length() < 1e-4);
        }
    }

    #[test]
    fn poles_sit_on_the_y_axis() {
        let raw = sphere_mesh(1.0, 8, 4);
        let top = raw.positions[0];
        assert!((top - Vec3::Y).length() < 1e-5);
        let bottom = raw.positions[raw.positions.len() - 1];
        assert!((bottom - Vec3::NEG_Y).length() < 1e-5);
    }
}
