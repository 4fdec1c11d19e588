//! Weather particle rendering.
//!
//! The particle buffer is uploaded once. Per frame only the uniform block
//! changes, and all particles go out in a single instanced draw.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::error::GpuError;
use crate::particles::{ParticleCloud, ParticleRecord, PARTICLE_STRIDE};
use crate::shader::PARTICLE_SHADER;
use crate::weather::WeatherOffsets;

use super::DEPTH_FORMAT;

/// Vertices per particle quad.
const QUAD_VERTICES: u32 = 6;

/// Uniform block for `particle.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub cam_pos: [f32; 3],
    pub gravity_offset: f32,
    pub cam_forward: [f32; 3],
    pub wind_offset: f32,
    pub tint: [f32; 3],
    pub particle_density: f32,
    pub viewport: [f32; 2],
    pub extent: f32,
    pub _padding: f32,
}

/// Everything the particle shader needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ParticleFrame {
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub camera_forward: Vec3,
    pub offsets: WeatherOffsets,
    pub particle_density: f32,
    pub tint: Vec3,
    pub extent: f32,
    pub viewport: (u32, u32),
}

impl ParticleUniforms {
    pub fn new(frame: &ParticleFrame) -> Self {
        Self {
            view_proj: frame.view_proj.to_cols_array_2d(),
            cam_pos: frame.camera_position.to_array(),
            gravity_offset: frame.offsets.gravity(),
            cam_forward: frame.camera_forward.to_array(),
            wind_offset: frame.offsets.wind(),
            tint: frame.tint.to_array(),
            particle_density: frame.particle_density,
            viewport: [frame.viewport.0.max(1) as f32, frame.viewport.1.max(1) as f32],
            extent: frame.extent,
            _padding: 0.0,
        }
    }
}

/// Bytes needed to hold `count` particles, checked against `max_buffer_size`.
pub fn particle_buffer_size(count: usize, max_buffer_size: u64) -> Result<u64, GpuError> {
    let size = (count as u64).saturating_mul(PARTICLE_STRIDE);
    if size > max_buffer_size {
        return Err(GpuError::ParticleBufferTooLarge {
            size,
            limit: max_buffer_size,
        });
    }
    Ok(size)
}

/// Owns the particle buffer and the pipeline that draws it.
pub struct ParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    particle_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    particle_count: u32,
}

impl ParticleRenderer {
    /// Upload `cloud` and build the particle pipeline.
    ///
    /// Fails when the cloud is larger than the device's maximum buffer size.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        cloud: &ParticleCloud,
    ) -> Result<Self, GpuError> {
        particle_buffer_size(cloud.len(), device.limits().max_buffer_size)?;

        // A zero-sized vertex buffer cannot be bound; keep one blank record.
        let blank = [0u8; PARTICLE_STRIDE as usize];
        let contents = if cloud.is_empty() {
            &blank[..]
        } else {
            cloud.as_bytes()
        };

        let particle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Buffer"),
            contents,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform Buffer"),
            contents: bytemuck::bytes_of(&ParticleUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Particle Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[ParticleRecord::vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Translucent: test against the scene but don't occlude other particles.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::info!(
            "Uploaded {} particles ({} bytes, {} lattice divisions per axis)",
            cloud.len(),
            cloud.as_bytes().len(),
            cloud.divisions()
        );

        Ok(Self {
            pipeline,
            particle_buffer,
            uniform_buffer,
            uniform_bind_group,
            particle_count: cloud.len() as u32,
        })
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    /// Upload this frame's uniforms. The particle buffer itself is untouched.
    pub fn prepare(&self, queue: &wgpu::Queue, frame: &ParticleFrame) {
        let uniforms = ParticleUniforms::new(frame);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Draw every particle with one instanced call.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.particle_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.particle_buffer.slice(..));
        render_pass.draw(0..QUAD_VERTICES, 0..self.particle_count);
    }
}
