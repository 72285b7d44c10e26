use anyhow::{Result, bail};
use wgpu::util::DeviceExt;

use crate::core::LoadCtx;
use crate::render::mesh::{CUBE_INDEX_COUNT, CUBE_INDICES, CUBE_VERTICES, Vertex};
use crate::render::shader::compile_wgsl;
use crate::render::transform::Transforms;
use crate::render::{RenderCtx, RenderTarget};

/// Draws the fixed red cube.
///
/// Owns every device handle the cube needs. All of them are created once in
/// [`CubeRenderer::new`]; per frame only the uniform buffer is rewritten.
pub struct CubeRenderer {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,

    /// Vertex layout + shader stages + depth state.
    pipeline: wgpu::RenderPipeline,
    shader: wgpu::ShaderModule,

    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl CubeRenderer {
    /// Uploads geometry, compiles the shader and builds the pipeline.
    ///
    /// Fails if the device rejects the pipeline (e.g. the shader did not
    /// compile); the compiler output has been logged by then.
    pub fn new(ctx: &LoadCtx<'_>) -> Result<Self> {
        let device = ctx.device;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cubelet cube vbo"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cubelet cube ibo"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cubelet cube transforms ubo"),
            size: std::mem::size_of::<Transforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shader = compile_wgsl(device, "cubelet cube shader", include_str!("shaders/cube.wgsl"));

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubelet cube bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<Transforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cubelet cube bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cubelet cube pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cubelet cube pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Depth testing resolves visibility; culling is not needed.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            bail!("cube pipeline creation failed: {err}");
        }

        log::debug!(
            "cube resources created: {} vertices, {} indices",
            CUBE_VERTICES.len(),
            CUBE_INDEX_COUNT
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            pipeline,
            shader,
            uniform_buffer,
            bind_group,
        })
    }

    /// Uploads `transforms` and issues the single indexed draw.
    ///
    /// The pass loads the already-cleared color and depth attachments.
    pub fn render(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        transforms: &Transforms,
    ) {
        ctx.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(transforms));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cubelet cube pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..CUBE_INDEX_COUNT, 0, 0..1);
    }

    /// Destroys the buffers eagerly and drops the remaining handles.
    pub fn release(self) {
        let Self {
            vertex_buffer,
            index_buffer,
            pipeline,
            shader,
            uniform_buffer,
            bind_group,
        } = self;

        drop(bind_group);
        drop(pipeline);
        drop(shader);

        for buffer in [vertex_buffer, index_buffer, uniform_buffer] {
            buffer.destroy();
        }

        log::debug!("cube resources released");
    }
}
