//! wgpu rasterizer for the primitive solids.
//!
//! [`SolidPass`] uploads the geometry of every [`Shape`] once into a shared vertex
//! buffer. During a frame it implements [`Rasterizer`] by collecting draws into a
//! CPU-side list; [`SolidPass::submit`] then uploads one instance (model matrix and
//! color) per draw and records a single depth-tested render pass.
//!
//! # Pipeline Configuration
//!
//! - `Depth32Float` depth buffer, `Less` comparison, cleared to 1.0
//! - No culling, so winding order does not matter
//! - No blending; alpha is written straight through
//! - The vertex stage remaps GL-style depth in `[-1, 1]` onto wgpu's `[0, 1]`

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::color::Color;
use crate::geometry::{Shape, Solids, Vertex};
use crate::gpu::GpuContext;
use crate::raster::Rasterizer;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    /// Camera rotation applied before every model matrix.
    pub global: [[f32; 4]; 4],
    /// Clip-space `xy` scale keeping the scene undistorted; `zw` unused.
    pub aspect_scale: [f32; 4],
}

/// Per-draw instance data.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Instance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl Instance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Instance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &wgpu::vertex_attr_array![
            1 => Float32x4, 2 => Float32x4, 3 => Float32x4, 4 => Float32x4,
            5 => Float32x4
        ],
    };
}

/// Scale for clip-space `xy` that fits the unit square into a `width × height` target.
pub fn aspect_scale(width: u32, height: u32) -> [f32; 2] {
    if width == 0 || height == 0 {
        return [1.0, 1.0];
    }
    let aspect = width as f32 / height as f32;
    if aspect >= 1.0 {
        [1.0 / aspect, 1.0]
    } else {
        [1.0, aspect]
    }
}

struct QueuedDraw {
    vertices: Range<u32>,
    instance: Instance,
}

/// Draws instanced solids with depth testing.
pub struct SolidPass {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    /// First vertex of each shape within `vertex_buffer`, indexed like [`Shape::ALL`].
    shape_base: [u32; 2],
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    global: Mat4,
    queued: Vec<QueuedDraw>,
}

impl SolidPass {
    pub fn new(gpu: &GpuContext, solids: &Solids) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Solid Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/solid.wgsl").into()),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Solid Globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Solid Globals Layout"),
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

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Solid Globals Bind Group"),
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // All shapes share one vertex buffer.
        let mut vertices: Vec<Vertex> = Vec::new();
        let mut shape_base = [0u32; 2];
        for (slot, solid) in solids.iter().enumerate() {
            shape_base[slot] = vertices.len() as u32;
            vertices.extend_from_slice(&solid.geometry.vertices);
        }
        let vertex_buffer = create_buffer_init(
            device,
            "Solid Vertices",
            bytemuck::cast_slice(&vertices),
            wgpu::BufferUsages::VERTEX,
        );

        let instance_capacity = 64;
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Solid Pipeline Layout"),
            bind_group_layouts: &[&globals_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Solid Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex::LAYOUT, Instance::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            vertex_buffer,
            shape_base,
            instance_buffer,
            instance_capacity,
            depth_view: create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
            global: Mat4::IDENTITY,
            queued: Vec::new(),
        }
    }

    /// Number of draws collected since the last [`Rasterizer::begin_frame`].
    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    fn ensure_instance_capacity(&mut self, device: &wgpu::Device, needed: usize) {
        if needed > self.instance_capacity {
            self.instance_capacity = needed.next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
            log::debug!("instance buffer grown to {}", self.instance_capacity);
        }
    }

    /// Clears `target` to `background` and draws everything queued this frame.
    pub fn submit(&mut self, gpu: &GpuContext, target: &wgpu::TextureView, background: Color) {
        self.ensure_depth_size(gpu);
        self.ensure_instance_capacity(&gpu.device, self.queued.len());

        let [sx, sy] = aspect_scale(gpu.width(), gpu.height());
        let globals = Globals {
            global: self.global.to_cols_array_2d(),
            aspect_scale: [sx, sy, 1.0, 1.0],
        };
        gpu.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::cast_slice(&[globals]));

        let instances: Vec<Instance> = self.queued.iter().map(|d| d.instance).collect();
        if !instances.is_empty() {
            gpu.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Solid Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Solid Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            for (i, draw) in self.queued.iter().enumerate() {
                let i = i as u32;
                render_pass.draw(draw.vertices.clone(), i..i + 1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl Rasterizer for SolidPass {
    fn begin_frame(&mut self, global_rotation: Mat4) {
        self.global = global_rotation;
        self.queued.clear();
    }

    fn draw(&mut self, shape: Shape, vertices: Range<u32>, model: Mat4, color: Color) {
        let slot = match shape {
            Shape::Cube => 0,
            Shape::Cylinder => 1,
        };
        let base = self.shape_base[slot];
        self.queued.push(QueuedDraw {
            vertices: vertices.start + base..vertices.end + base,
            instance: Instance {
                model: model.to_cols_array_2d(),
                color: color.to_array(),
            },
        });
    }
}

fn create_buffer_init(
    device: &wgpu::Device,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    use wgpu::util::DeviceExt;
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage,
    })
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Solid Instances"),
        size: (capacity * std::mem::size_of::<Instance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Solid Depth"),
        size: wgpu::Extent3d {
            width: gpu.width(),
            height: gpu.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_scale_fits_unit_square() {
        assert_eq!(aspect_scale(600, 600), [1.0, 1.0]);
        assert_eq!(aspect_scale(1200, 600), [0.5, 1.0]);
        assert_eq!(aspect_scale(600, 1200), [1.0, 0.5]);
        assert_eq!(aspect_scale(0, 600), [1.0, 1.0]);
    }

    #[test]
    fn instance_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Instance>(), 80);
        assert_eq!(Instance::LAYOUT.array_stride, 80);
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
    }
}
