//! Static scene rendering.
//!
//! Each mesh is uploaded once. Per-draw transforms live in one uniform buffer
//! with a slot per draw, picked with a dynamic offset at draw time.

use std::num::NonZeroU64;

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::primitives::{Mesh, MeshKind};
use crate::scene::SceneDraw;
use crate::shader::SCENE_SHADER;

use super::DEPTH_FORMAT;

/// Bytes of one `mat4x4<f32>`.
const MATRIX_SIZE: u64 = std::mem::size_of::<[[f32; 4]; 4]>() as u64;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: wgpu::VertexFormat::Float32x3,
}];

const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 1,
    format: wgpu::VertexFormat::Float32x4,
}];

struct GpuMesh {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, kind: MeshKind, mesh: &Mesh) -> Self {
        let label = format!("{:?}", kind);
        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Positions")),
            contents: bytemuck::cast_slice(&mesh.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Colors")),
            contents: bytemuck::cast_slice(&mesh.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            positions,
            colors,
            indices,
            index_count: mesh.index_count(),
        }
    }
}

/// Round `size` up to a multiple of `alignment`.
fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Draws the floor, cubes and planes.
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    meshes: Vec<GpuMesh>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    slot_stride: u64,
    slot_count: usize,
    frame_meshes: Vec<MeshKind>,
    staging: Vec<u8>,
}

impl SceneRenderer {
    /// Upload all meshes and reserve transform slots for `max_draws` draws.
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, max_draws: usize) -> Self {
        let meshes = MeshKind::ALL
            .iter()
            .map(|&kind| GpuMesh::upload(device, kind, &kind.build()))
            .collect();

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let slot_stride = align_to(MATRIX_SIZE, alignment);
        let slot_count = max_draws.max(1);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: slot_stride * slot_count as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(MATRIX_SIZE),
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: NonZeroU64::new(MATRIX_SIZE),
                }),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &POSITION_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &COLOR_ATTRIBUTES,
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Mirrored wings flip winding.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
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
            meshes,
            uniform_buffer,
            uniform_bind_group,
            slot_stride,
            slot_count,
            frame_meshes: Vec::with_capacity(slot_count),
            staging: vec![0; (slot_stride as usize) * slot_count],
        }
    }

    /// Upload `view_proj * model` for every draw of this frame.
    ///
    /// Draws beyond the reserved slot count are dropped.
    pub fn prepare(&mut self, queue: &wgpu::Queue, view_proj: Mat4, draws: &[SceneDraw]) {
        if draws.len() > self.slot_count {
            log::warn!(
                "Scene has {} draws but only {} transform slots; extra draws skipped",
                draws.len(),
                self.slot_count
            );
        }

        self.frame_meshes.clear();
        for (slot, draw) in draws.iter().take(self.slot_count).enumerate() {
            let mvp = (view_proj * draw.model).to_cols_array_2d();
            let start = slot * self.slot_stride as usize;
            self.staging[start..start + MATRIX_SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&mvp));
            self.frame_meshes.push(draw.mesh);
        }

        let used = self.frame_meshes.len() * self.slot_stride as usize;
        if used > 0 {
            queue.write_buffer(&self.uniform_buffer, 0, &self.staging[..used]);
        }
    }

    /// Record the draws uploaded by the last [`SceneRenderer::prepare`].
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        for (slot, kind) in self.frame_meshes.iter().enumerate() {
            let mesh = &self.meshes[kind.index()];
            let offset = (slot as u64 * self.slot_stride) as wgpu::DynamicOffset;
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, mesh.positions.slice(..));
            render_pass.set_vertex_buffer(1, mesh.colors.slice(..));
            render_pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(64, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
        assert_eq!(align_to(64, 64), 64);
    }

    #[test]
    fn test_matrix_size() {
        assert_eq!(MATRIX_SIZE, 64);
    }
}
