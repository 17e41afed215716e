//! The rendering engine: wires the GPU context, texture store,
//! renderer, and scene together.

use std::path::Path;

use glam::{Mat4, Vec3};

use crate::error::NightdriveError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::TextureStore;
use crate::options::Options;
use crate::renderer::{GpuModel, SceneRenderer};
use crate::scene::command::SceneCommand;
use crate::scene::mesh::build_mesh;
use crate::scene::model::Model;
use crate::scene::sphere::sphere_mesh;
use crate::scene::{Placement, Scene};

/// Ties the GPU context, the texture store, the forward renderer, and
/// the scene state into one object the viewer drives each frame.
///
/// Construction and asset import run to completion before the first
/// frame; nothing here is asynchronous once the render loop starts.
pub struct DriveEngine {
    context: RenderContext,
    store: TextureStore,
    renderer: SceneRenderer,
    scene: Scene,
    /// GPU-resident models, paired one-to-one with `scene.models()`.
    gpu_models: Vec<GpuModel>,
}

impl DriveEngine {
    /// Create an engine rendering to `window` at `size`.
    ///
    /// # Errors
    ///
    /// Returns [`NightdriveError::Gpu`] when no usable GPU context can
    /// be created.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: &Options,
    ) -> Result<Self, NightdriveError> {
        let context = RenderContext::new(window, size).await?;
        let mut store = TextureStore::new(&context.device, &context.queue);
        let renderer = SceneRenderer::new(&context, &mut store);

        let mut scene = Scene::new(options);
        scene.rig_mut().flight.camera.aspect = context.aspect();

        Ok(Self {
            context,
            store,
            renderer,
            scene,
            gpu_models: Vec::new(),
        })
    }

    /// Import the demo scene from `assets_dir`: the city, the sphere,
    /// and the car, each under `<name>/scene.gltf`.
    ///
    /// A failed city or car import is fatal to the scene; a missing
    /// sphere asset falls back to procedural sphere geometry.
    ///
    /// # Errors
    ///
    /// Returns [`NightdriveError::Import`] when a required asset cannot
    /// be imported.
    pub fn load_demo_scene(
        &mut self,
        assets_dir: &Path,
    ) -> Result<(), NightdriveError> {
        // Draw order: city first, then the sphere, then the car.
        let city = Model::load(
            &assets_dir.join("city/scene.gltf"),
            &mut self.store,
        )?;
        self.add_model(
            city,
            Placement::Static(
                Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0))
                    * Mat4::from_rotation_x(90.0_f32.to_radians()),
            ),
        );

        let sphere_placement = Placement::Static(
            Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0))
                * Mat4::from_scale(Vec3::splat(0.15)),
        );
        match Model::load(
            &assets_dir.join("sphere/scene.gltf"),
            &mut self.store,
        ) {
            Ok(sphere) => self.add_model(sphere, sphere_placement),
            Err(e) => {
                log::info!(
                    "sphere asset unavailable ({e}); generating geometry"
                );
                let raw = sphere_mesh(10.0, 36, 18);
                let mesh = build_mesh(&raw, Vec::new());
                self.add_model(Model::from_meshes(vec![mesh]), sphere_placement);
            }
        }

        let car = Model::load(
            &assets_dir.join("car/scene.gltf"),
            &mut self.store,
        )?;
        self.add_model(car, Placement::Car);

        Ok(())
    }

    /// Add a model to the scene and upload it to the GPU.
    pub fn add_model(&mut self, model: Model, placement: Placement) {
        self.gpu_models.push(self.renderer.upload_model(
            &self.context,
            &self.store,
            &model,
        ));
        self.scene.add_model(model, placement);
    }

    /// The scene state.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for the viewer layer.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Apply one input command.
    pub fn execute(&mut self, command: SceneCommand) {
        self.scene.execute(command);
    }

    /// Advance scene time by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.scene.update(dt);
    }

    /// Resize the surface, depth buffer, and camera aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.renderer.resize(&self.context);
        self.scene.rig_mut().flight.camera.aspect = self.context.aspect();
    }

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the swapchain texture cannot
    /// be acquired; the viewer responds by resizing and retrying.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.renderer
            .render(&self.context, &self.scene, &self.gpu_models)
    }
}
