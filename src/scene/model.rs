//! Scene import: flattens a hierarchical asset into an ordered mesh
//! list with de-duplicated textures.
//!
//! The import has two layers. The format-neutral layer walks a
//! [`RawScene`] — a parser-independent view of the node tree, meshes,
//! and materials — in pre-order, building one [`Mesh`] per node mesh
//! reference and resolving materials to texture handles through a
//! per-import cache. The glTF front-end fills a `RawScene` from a file
//! on disk (the `gltf::import` idiom: document plus buffer blobs,
//! decoded image blobs ignored in favor of loading by URI).
//!
//! The importer keeps no state across calls: each import is one
//! synchronous pass producing one immutable [`Model`].

use std::path::Path;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::error::{ImportError, TextureLoadError};
use crate::scene::mesh::{
    build_mesh, Mesh, RawMesh, TextureHandle, TextureRef, TextureRole,
};

/// Marker character for embedded texture references. Asset pipelines
/// use it to address textures stored inside the asset blob; those are
/// unsupported here and resolve to the null handle.
const EMBEDDED_MARKER: char = '*';

/// Decode-and-upload boundary between the importer and the GPU layer.
///
/// Implemented by [`TextureStore`](crate::gpu::texture::TextureStore)
/// for real use; tests substitute a counting fake.
pub trait TextureUploader {
    /// Decode the image at `path` and upload it, returning an opaque
    /// handle to the resident texture.
    ///
    /// # Errors
    ///
    /// Returns [`TextureLoadError`] when the file cannot be read or
    /// decoded. The importer recovers by substituting
    /// [`TextureHandle::NULL`].
    fn upload(&mut self, path: &Path)
        -> Result<TextureHandle, TextureLoadError>;
}

/// Texture slots of one source material, as asset-relative path
/// strings. Slot names follow the classic diffuse/specular/normal
/// convention; `height` is a legacy slot some formats use to smuggle
/// normal maps.
#[derive(Debug, Clone, Default)]
pub struct RawMaterial {
    /// Base color maps.
    pub diffuse: Vec<String>,
    /// Specular intensity maps.
    pub specular: Vec<String>,
    /// Tangent-space normal maps.
    pub normal: Vec<String>,
    /// Height maps, reinterpreted as normal maps when `normal` is
    /// empty.
    pub height: Vec<String>,
}

/// One mesh primitive of the source asset: attribute streams plus an
/// optional material index into [`RawScene::materials`].
#[derive(Debug, Clone, Default)]
pub struct RawPrimitive {
    /// Attribute streams and indices.
    pub mesh: RawMesh,
    /// Index of the material this primitive uses.
    pub material: Option<usize>,
}

/// One node of the source hierarchy.
#[derive(Debug, Clone, Default)]
pub struct RawNode {
    /// Indices into [`RawScene::primitives`] referenced by this node.
    pub mesh_indices: Vec<usize>,
    /// Child nodes in source-declared order.
    pub children: Vec<RawNode>,
}

/// Parser-independent view of a whole asset.
#[derive(Debug, Clone, Default)]
pub struct RawScene {
    /// Root nodes of the hierarchy in source-declared order.
    pub roots: Vec<RawNode>,
    /// All mesh primitives, addressed by [`RawNode::mesh_indices`].
    pub primitives: Vec<RawPrimitive>,
    /// All materials, addressed by [`RawPrimitive::material`].
    pub materials: Vec<RawMaterial>,
}

/// A flattened model: meshes in pre-order traversal order of the source
/// node tree, sharing textures de-duplicated per import.
pub struct Model {
    meshes: Vec<Mesh>,
}

impl Model {
    /// Import a glTF asset from disk.
    ///
    /// Texture files are resolved relative to the asset's directory and
    /// routed through `uploader`; load failures are logged and replaced
    /// with the null handle without aborting the import.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when the file cannot be parsed or has no
    /// scene root. Nothing is drawn for a failed asset; the caller
    /// decides whether that is fatal to the process.
    pub fn load<U: TextureUploader>(
        path: &Path,
        uploader: &mut U,
    ) -> Result<Self, ImportError> {
        let scene = load_gltf(path)?;
        Self::from_raw(&scene, path, uploader)
    }

    /// Flatten a parsed [`RawScene`] into a model.
    ///
    /// `asset_path` locates the asset on disk: texture paths are
    /// resolved against its parent directory, and it names the asset in
    /// error reports.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MissingRoot`] when the scene has no root
    /// node to traverse.
    pub fn from_raw<U: TextureUploader>(
        scene: &RawScene,
        asset_path: &Path,
        uploader: &mut U,
    ) -> Result<Self, ImportError> {
        if scene.roots.is_empty() {
            return Err(ImportError::MissingRoot(asset_path.to_path_buf()));
        }

        let base_dir = asset_path.parent().unwrap_or(Path::new(""));
        let mut session = ImportSession {
            scene,
            base_dir,
            uploader,
            loaded: FxHashMap::default(),
            meshes: Vec::new(),
        };
        for root in &scene.roots {
            session.process_node(root);
        }

        log::info!(
            "imported {}: {} meshes, {} unique textures",
            asset_path.display(),
            session.meshes.len(),
            session.loaded.len(),
        );

        Ok(Self {
            meshes: session.meshes,
        })
    }

    /// Wrap already-built meshes (procedural geometry) as a model.
    #[must_use]
    pub fn from_meshes(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    /// The meshes in draw order (pre-order traversal of the source
    /// node tree).
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }
}

/// Transient state of one import: the per-model texture cache and the
/// accumulating mesh list. Dropped when the import finishes.
struct ImportSession<'a, U: TextureUploader> {
    scene: &'a RawScene,
    base_dir: &'a Path,
    uploader: &'a mut U,
    /// De-duplication table: source-relative path -> handle. Scoped to
    /// this one import; two models loading the same file each upload it
    /// once.
    loaded: FxHashMap<String, TextureHandle>,
    meshes: Vec<Mesh>,
}

impl<U: TextureUploader> ImportSession<'_, U> {
    /// Pre-order traversal: this node's meshes first, then children in
    /// declared order. Traversal order determines draw order.
    fn process_node(&mut self, node: &RawNode) {
        for &index in &node.mesh_indices {
            if let Some(primitive) = self.scene.primitives.get(index) {
                let textures = primitive
                    .material
                    .and_then(|m| self.scene.materials.get(m).cloned())
                    .map(|m| self.resolve_material(&m))
                    .unwrap_or_default();
                self.meshes.push(build_mesh(&primitive.mesh, textures));
            } else {
                log::warn!("node references missing mesh index {index}");
            }
        }
        for child in &node.children {
            self.process_node(child);
        }
    }

    /// Collect diffuse, then specular, then normal maps. When the
    /// material has no explicit normal map, the height slot is
    /// reinterpreted as one.
    fn resolve_material(&mut self, material: &RawMaterial) -> Vec<TextureRef> {
        let mut textures = Vec::new();
        for path in &material.diffuse {
            textures.push(self.texture_ref(path, TextureRole::Diffuse));
        }
        for path in &material.specular {
            textures.push(self.texture_ref(path, TextureRole::Specular));
        }
        let normal_paths = if material.normal.is_empty() {
            &material.height
        } else {
            &material.normal
        };
        for path in normal_paths {
            textures.push(self.texture_ref(path, TextureRole::Normal));
        }
        textures
    }

    /// Look the path up in the per-model cache, uploading on a miss.
    /// Failures (and embedded references) are logged and cached as the
    /// null handle so the import continues.
    fn texture_ref(&mut self, path: &str, role: TextureRole) -> TextureRef {
        if let Some(&handle) = self.loaded.get(path) {
            return TextureRef { handle, role };
        }

        let handle = match self.upload(path) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("texture {path} failed to load: {e}");
                TextureHandle::NULL
            }
        };
        let _ = self.loaded.insert(path.to_owned(), handle);
        TextureRef { handle, role }
    }

    fn upload(&mut self, path: &str) -> Result<TextureHandle, TextureLoadError> {
        if path.contains(EMBEDDED_MARKER) || path.starts_with("data:") {
            return Err(TextureLoadError::Embedded(path.to_owned()));
        }
        self.uploader.upload(&self.base_dir.join(path))
    }
}

// ---------------------------------------------------------------------------
// glTF front-end
// ---------------------------------------------------------------------------

/// Parse a glTF/GLB file into the format-neutral representation.
fn load_gltf(path: &Path) -> Result<RawScene, ImportError> {
    let (document, buffers, _images) = gltf::import(path)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| ImportError::MissingRoot(path.to_path_buf()))?;

    // Flatten every glTF mesh's primitives into one list; remember the
    // primitive range each mesh maps to so nodes can reference them.
    let mut primitives = Vec::new();
    let mut mesh_ranges: Vec<Vec<usize>> = Vec::new();
    for mesh in document.meshes() {
        let mut range = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "skipping non-triangle primitive in mesh {}",
                    mesh.index()
                );
                continue;
            }
            match read_primitive(&primitive, &buffers) {
                Some(raw) => {
                    range.push(primitives.len());
                    primitives.push(RawPrimitive {
                        mesh: raw,
                        material: primitive.material().index(),
                    });
                }
                None => log::warn!(
                    "skipping primitive without positions in mesh {}",
                    mesh.index()
                ),
            }
        }
        mesh_ranges.push(range);
    }

    let materials = document.materials().map(|m| read_material(&m)).collect();

    let roots = scene
        .nodes()
        .map(|node| read_node(&node, &mesh_ranges))
        .collect();

    Ok(RawScene {
        roots,
        primitives,
        materials,
    })
}

/// Recursively convert a glTF node, mapping its mesh reference to the
/// flattened primitive indices.
fn read_node(node: &gltf::Node<'_>, mesh_ranges: &[Vec<usize>]) -> RawNode {
    let mesh_indices = node
        .mesh()
        .and_then(|mesh| mesh_ranges.get(mesh.index()).cloned())
        .unwrap_or_default();
    let children = node
        .children()
        .map(|child| read_node(&child, mesh_ranges))
        .collect();
    RawNode {
        mesh_indices,
        children,
    }
}

/// Read one primitive's attribute streams.
///
/// glTF tangents come as vec4 with a handedness sign in `w`; they are
/// split here into tangent and `cross(normal, tangent) * w` bitangent,
/// which the mesh builder then passes through untouched.
fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Option<RawMesh> {
    let reader =
        primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));

    let positions: Vec<Vec3> =
        reader.read_positions()?.map(Vec3::from_array).collect();

    let normals: Vec<Vec3> = reader.read_normals().map_or_else(
        || vec![Vec3::Y; positions.len()],
        |iter| iter.map(Vec3::from_array).collect(),
    );

    let uvs = reader
        .read_tex_coords(0)
        .map(|t| t.into_f32().map(Vec2::from_array).collect());

    let (tangents, bitangents) = reader.read_tangents().map_or(
        (None, None),
        |iter| {
            let mut tangents = Vec::with_capacity(positions.len());
            let mut bitangents = Vec::with_capacity(positions.len());
            for (i, [x, y, z, w]) in iter.enumerate() {
                let tangent = Vec3::new(x, y, z);
                let normal = normals.get(i).copied().unwrap_or(Vec3::Y);
                tangents.push(tangent);
                bitangents.push(normal.cross(tangent) * w);
            }
            (Some(tangents), Some(bitangents))
        },
    );

    let indices = reader.read_indices().map_or_else(
        || (0..positions.len() as u32).collect(),
        |iter| iter.into_u32().collect(),
    );

    Some(RawMesh {
        positions,
        normals,
        uvs,
        tangents,
        bitangents,
        indices,
    })
}

/// Map a glTF material to the classic texture slots: base color is the
/// diffuse map, the specular-glossiness extension supplies the specular
/// map when present, and normal maps come from the dedicated slot.
/// glTF has no height slot, so that fallback stays empty here.
fn read_material(material: &gltf::Material<'_>) -> RawMaterial {
    let mut raw = RawMaterial::default();

    if let Some(info) = material.pbr_metallic_roughness().base_color_texture()
    {
        raw.diffuse.push(texture_path(&info.texture()));
    }
    if let Some(sg) = material.pbr_specular_glossiness() {
        if raw.diffuse.is_empty() {
            if let Some(info) = sg.diffuse_texture() {
                raw.diffuse.push(texture_path(&info.texture()));
            }
        }
        if let Some(info) = sg.specular_glossiness_texture() {
            raw.specular.push(texture_path(&info.texture()));
        }
    }
    if let Some(normal) = material.normal_texture() {
        raw.normal.push(texture_path(&normal.texture()));
    }

    raw
}

/// Asset-relative path of a texture's image, or a marker string for
/// embedded images (rejected later by the cache lookup).
fn texture_path(texture: &gltf::Texture<'_>) -> String {
    match texture.source().source() {
        gltf::image::Source::Uri { uri, .. } => uri.to_owned(),
        gltf::image::Source::View { .. } => {
            format!("{EMBEDDED_MARKER}{}", texture.source().index())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    /// Uploader fake: hands out sequential handles and records every
    /// path it was asked to upload.
    #[derive(Default)]
    struct CountingUploader {
        uploads: Vec<PathBuf>,
        fail: bool,
    }

    impl TextureUploader for CountingUploader {
        fn upload(
            &mut self,
            path: &Path,
        ) -> Result<TextureHandle, TextureLoadError> {
            if self.fail {
                return Err(TextureLoadError::Io(std::io::Error::other(
                    "unreadable",
                )));
            }
            self.uploads.push(path.to_path_buf());
            Ok(TextureHandle(self.uploads.len() as u32))
        }
    }

    fn tri_primitive(material: Option<usize>) -> RawPrimitive {
        RawPrimitive {
            mesh: RawMesh {
                positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                normals: vec![Vec3::Z; 3],
                uvs: None,
                tangents: None,
                bitangents: None,
                indices: vec![0, 1, 2],
            },
            material,
        }
    }

    fn diffuse_material(path: &str) -> RawMaterial {
        RawMaterial {
            diffuse: vec![path.to_owned()],
            ..RawMaterial::default()
        }
    }

    #[test]
    fn missing_root_reports_import_error() {
        let scene = RawScene::default();
        let mut uploader = CountingUploader::default();
        let result = Model::from_raw(
            &scene,
            Path::new("assets/empty/scene.gltf"),
            &mut uploader,
        );
        assert!(matches!(result, Err(ImportError::MissingRoot(_))));
        assert!(uploader.uploads.is_empty());
    }

    #[test]
    fn child_meshes_survive_an_empty_root() {
        let scene = RawScene {
            roots: vec![RawNode {
                mesh_indices: Vec::new(),
                children: vec![
                    RawNode {
                        mesh_indices: vec![0],
                        children: vec![RawNode {
                            mesh_indices: vec![1],
                            children: Vec::new(),
                        }],
                    },
                    RawNode {
                        mesh_indices: vec![2],
                        children: Vec::new(),
                    },
                ],
            }],
            primitives: vec![
                tri_primitive(None),
                tri_primitive(None),
                tri_primitive(None),
            ],
            materials: Vec::new(),
        };
        let mut uploader = CountingUploader::default();
        let model =
            Model::from_raw(&scene, Path::new("scene.gltf"), &mut uploader)
                .unwrap();
        assert_eq!(model.meshes().len(), 3);
    }

    #[test]
    fn traversal_is_pre_order_in_declared_order() {
        // Give each primitive a distinct vertex count so the flattened
        // order is observable.
        let mut primitives = Vec::new();
        for extra in 0..4_usize {
            let mut p = tri_primitive(None);
            for _ in 0..extra {
                p.mesh.positions.push(Vec3::ONE);
                p.mesh.normals.push(Vec3::Z);
            }
            primitives.push(p);
        }
        // root(mesh 3) -> [childA(mesh 1) -> [grandchild(mesh 0)],
        //                  childB(mesh 2)]
        let scene = RawScene {
            roots: vec![RawNode {
                mesh_indices: vec![3],
                children: vec![
                    RawNode {
                        mesh_indices: vec![1],
                        children: vec![RawNode {
                            mesh_indices: vec![0],
                            children: Vec::new(),
                        }],
                    },
                    RawNode {
                        mesh_indices: vec![2],
                        children: Vec::new(),
                    },
                ],
            }],
            primitives,
            materials: Vec::new(),
        };
        let mut uploader = CountingUploader::default();
        let model =
            Model::from_raw(&scene, Path::new("scene.gltf"), &mut uploader)
                .unwrap();
        let counts: Vec<usize> =
            model.meshes().iter().map(|m| m.vertices.len()).collect();
        assert_eq!(counts, vec![6, 4, 3, 5]);
    }

    #[test]
    fn duplicate_texture_paths_upload_once() {
        let scene = RawScene {
            roots: vec![RawNode {
                mesh_indices: vec![0, 1],
                children: Vec::new(),
            }],
            primitives: vec![tri_primitive(Some(0)), tri_primitive(Some(1))],
            materials: vec![
                diffuse_material("textures/brick.png"),
                diffuse_material("textures/brick.png"),
            ],
        };
        let mut uploader = CountingUploader::default();
        let model =
            Model::from_raw(&scene, Path::new("city/scene.gltf"), &mut uploader)
                .unwrap();

        assert_eq!(uploader.uploads.len(), 1);
        assert_eq!(
            uploader.uploads[0],
            Path::new("city").join("textures/brick.png")
        );
        let a = model.meshes()[0].textures[0];
        let b = model.meshes()[1].textures[0];
        assert_eq!(a.handle, b.handle);
        assert_ne!(a.handle, TextureHandle::NULL);
    }

    #[test]
    fn height_maps_fall_back_into_the_normal_slot() {
        let material = RawMaterial {
            diffuse: vec!["d.png".to_owned()],
            height: vec!["bump.png".to_owned()],
            ..RawMaterial::default()
        };
        let scene = RawScene {
            roots: vec![RawNode {
                mesh_indices: vec![0],
                children: Vec::new(),
            }],
            primitives: vec![tri_primitive(Some(0))],
            materials: vec![material],
        };
        let mut uploader = CountingUploader::default();
        let model =
            Model::from_raw(&scene, Path::new("scene.gltf"), &mut uploader)
                .unwrap();
        let roles: Vec<TextureRole> = model.meshes()[0]
            .textures
            .iter()
            .map(|t| t.role)
            .collect();
        assert_eq!(roles, vec![TextureRole::Diffuse, TextureRole::Normal]);
    }

    #[test]
    fn explicit_normal_map_wins_over_height() {
        let material = RawMaterial {
            normal: vec!["n.png".to_owned()],
            height: vec!["bump.png".to_owned()],
            ..RawMaterial::default()
        };
        let scene = RawScene {
            roots: vec![RawNode {
                mesh_indices: vec![0],
                children: Vec::new(),
            }],
            primitives: vec![tri_primitive(Some(0))],
            materials: vec![material],
        };
        let mut uploader = CountingUploader::default();
        let model =
            Model::from_raw(&scene, Path::new("scene.gltf"), &mut uploader)
                .unwrap();
        assert_eq!(model.meshes()[0].textures.len(), 1);
        assert!(uploader
            .uploads
            .iter()
            .all(|p| p.ends_with("n.png")));
    }

    #[test]
    fn texture_failure_substitutes_null_and_continues() {
        let scene = RawScene {
            roots: vec![RawNode {
                mesh_indices: vec![0],
                children: Vec::new(),
            }],
            primitives: vec![tri_primitive(Some(0))],
            materials: vec![diffuse_material("missing.png")],
        };
        let mut uploader = CountingUploader {
            fail: true,
            ..CountingUploader::default()
        };
        let model =
            Model::from_raw(&scene, Path::new("scene.gltf"), &mut uploader)
                .unwrap();
        assert_eq!(model.meshes().len(), 1);
        assert_eq!(
            model.meshes()[0].textures[0].handle,
            TextureHandle::NULL
        );
    }

    #[test]
    fn embedded_references_never_reach_the_uploader() {
        let scene = RawScene {
            roots: vec![RawNode {
                mesh_indices: vec![0],
                children: Vec::new(),
            }],
            primitives: vec![tri_primitive(Some(0))],
            materials: vec![diffuse_material("*0")],
        };
        let mut uploader = CountingUploader::default();
        let model =
            Model::from_raw(&scene, Path::new("scene.gltf"), &mut uploader)
                .unwrap();
        assert!(uploader.uploads.is_empty());
        assert_eq!(
            model.meshes()[0].textures[0].handle,
            TextureHandle::NULL
        );
    }
}
