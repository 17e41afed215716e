use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::camera::core::CameraUniform;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::TextureStore;
use crate::lighting::LightingUniform;
use crate::scene::mesh::{Mesh, TextureHandle, TextureRole};
use crate::scene::model::Model;
use crate::scene::vertex::Vertex;
use crate::scene::Scene;

/// Model (object-to-world) matrix uniform.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
}

/// One mesh resident on the GPU: vertex/index buffers plus the bind
/// group holding its resolved material textures.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material_bind_group: wgpu::BindGroup,
}

/// A whole model resident on the GPU, with its per-draw model-matrix
/// buffer. Buffers are released when the value drops.
pub struct GpuModel {
    meshes: Vec<GpuMesh>,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
}

/// The forward scene pipeline and the frame-level uniforms.
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    lighting_uniform: LightingUniform,
    lighting_buffer: wgpu::Buffer,
    lighting_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    model_layout: wgpu::BindGroupLayout,
    depth_view: wgpu::TextureView,
    /// Flat (0, 0, 1) normal map bound when a mesh has no normal
    /// texture, so the normal-mapping path degenerates to the geometric
    /// normal.
    flat_normal: TextureHandle,
}

impl SceneRenderer {
    /// Create the pipeline, frame uniforms, and fallback textures.
    #[must_use]
    pub fn new(context: &RenderContext, store: &mut TextureStore) -> Self {
        let device = &context.device;

        let flat_normal =
            store.upload_rgba("Flat Normal", 1, 1, &[128, 128, 255, 255]);

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX
                | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX
                | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: true,
                },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_entry(0)],
            });
        let lighting_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[uniform_entry(0)],
            });
        let material_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material Bind Group Layout"),
                entries: &[
                    texture_entry(0),
                    texture_entry(1),
                    texture_entry(2),
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::VERTEX
                            | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(
                            wgpu::SamplerBindingType::Filtering,
                        ),
                        count: None,
                    },
                ],
            });
        let model_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let lighting_uniform = LightingUniform::default();
        let lighting_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[lighting_uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let lighting_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Lighting Bind Group"),
                layout: &lighting_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: lighting_buffer.as_entire_binding(),
                }],
            });

        let shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/scene.wgsl"
        ));
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[
                    &camera_layout,
                    &lighting_layout,
                    &material_layout,
                    &model_layout,
                ],
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.format(),
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    // Imported assets mix winding orders; skip culling.
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let depth_view = create_depth_view(context);

        Self {
            pipeline,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            lighting_uniform,
            lighting_buffer,
            lighting_bind_group,
            material_layout,
            model_layout,
            depth_view,
            flat_normal,
        }
    }

    /// Recreate the depth buffer after a window resize.
    pub fn resize(&mut self, context: &RenderContext) {
        self.depth_view = create_depth_view(context);
    }

    /// Upload a model's meshes and create its bind groups.
    #[must_use]
    pub fn upload_model(
        &self,
        context: &RenderContext,
        store: &TextureStore,
        model: &Model,
    ) -> GpuModel {
        let device = &context.device;

        let model_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Buffer"),
                contents: bytemuck::cast_slice(&[ModelUniform {
                    model: Mat4::IDENTITY.to_cols_array_2d(),
                }]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let model_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Model Bind Group"),
                layout: &self.model_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: model_buffer.as_entire_binding(),
                }],
            });

        let meshes = model
            .meshes()
            .iter()
            .map(|mesh| self.upload_mesh(context, store, mesh))
            .collect();

        GpuModel {
            meshes,
            model_buffer,
            model_bind_group,
        }
    }

    fn upload_mesh(
        &self,
        context: &RenderContext,
        store: &TextureStore,
        mesh: &Mesh,
    ) -> GpuMesh {
        let device = &context.device;

        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        // First texture of each role wins; missing slots fall back to
        // white (diffuse/specular) or the flat normal map.
        let role_handle = |role| {
            mesh.textures
                .iter()
                .find(|t| t.role == role)
                .map(|t| t.handle)
        };
        let diffuse = role_handle(TextureRole::Diffuse)
            .unwrap_or(TextureHandle::NULL);
        let specular = role_handle(TextureRole::Specular)
            .unwrap_or(TextureHandle::NULL);
        let normal =
            role_handle(TextureRole::Normal).unwrap_or(self.flat_normal);

        let material_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Material Bind Group"),
                layout: &self.material_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            store.view(diffuse),
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            store.view(specular),
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(
                            store.view(normal),
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(
                            store.sampler(),
                        ),
                    },
                ],
            });

        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            material_bind_group,
        }
    }

    /// Draw one frame: refresh the frame uniforms from the scene state,
    /// then draw every model in insertion order.
    ///
    /// `models` must pair one-to-one with `scene.models()`.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the swapchain texture cannot
    /// be acquired (lost/outdated surface after a resize).
    pub fn render(
        &mut self,
        context: &RenderContext,
        scene: &Scene,
        models: &[GpuModel],
    ) -> Result<(), wgpu::SurfaceError> {
        let (view, eye) = scene.view();
        let projection = scene.rig().flight.camera.projection();
        self.camera_uniform.update_from_view(view, projection, eye);
        self.camera_uniform.fovy = scene.rig().flight.camera.fovy;
        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        self.lighting_uniform.apply_sky(scene.sky());
        self.lighting_uniform.set_spots(scene.spot_lights_gpu());
        self.lighting_uniform.shading_mode =
            u32::from(scene.phong_shading());
        context.queue.write_buffer(
            &self.lighting_buffer,
            0,
            bytemuck::cast_slice(&[self.lighting_uniform]),
        );

        for ((_, transform), gpu_model) in scene.draw_items().zip(models) {
            context.queue.write_buffer(
                &gpu_model.model_buffer,
                0,
                bytemuck::cast_slice(&[ModelUniform {
                    model: transform.to_cols_array_2d(),
                }]),
            );
        }

        let frame = context.get_next_frame()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let sky = scene.sky();
        let mut encoder = context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &surface_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: f64::from(sky.clear_color[0]),
                                    g: f64::from(sky.clear_color[1]),
                                    b: f64::from(sky.clear_color[2]),
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.lighting_bind_group, &[]);

            for gpu_model in models {
                pass.set_bind_group(3, &gpu_model.model_bind_group, &[]);
                for mesh in &gpu_model.meshes {
                    pass.set_bind_group(2, &mesh.material_bind_group, &[]);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(
                        mesh.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        context.submit(encoder);
        frame.present();
        Ok(())
    }
}

fn create_depth_view(context: &RenderContext) -> wgpu::TextureView {
    let depth = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: context.config.width.max(1),
            height: context.config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth.create_view(&wgpu::TextureViewDescriptor::default())
}
