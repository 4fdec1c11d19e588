//! Particle cloud generation.
//!
//! The cloud is a jittered lattice: the volume is split into `frag³` cells
//! and every particle lands at a random spot inside its own cell. This keeps
//! the distribution even without looking like a grid.
//!
//! Records are generated once at startup and never touched again on the CPU.
//! All motion comes from the vertex shader reinterpreting these records with
//! the global weather offsets.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

/// Number of `f32` components per particle (3 position + 1 size).
pub const FLOATS_PER_PARTICLE: usize = 4;

/// Bytes between consecutive particles in the vertex buffer.
pub const PARTICLE_STRIDE: u64 = (FLOATS_PER_PARTICLE * std::mem::size_of::<f32>()) as u64;

/// Byte offset of `position` within a record.
pub const POSITION_OFFSET: u64 = 0;

/// Byte offset of `size` within a record.
pub const SIZE_OFFSET: u64 = 3 * std::mem::size_of::<f32>() as u64;

/// Smallest particle size (inclusive).
pub const MIN_SIZE: f32 = 20.0;

/// Width of the particle size range; sizes fall in `[MIN_SIZE, MIN_SIZE + SIZE_RANGE)`.
pub const SIZE_RANGE: f32 = 20.0;

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        offset: POSITION_OFFSET,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3, // pos
    },
    wgpu::VertexAttribute {
        offset: SIZE_OFFSET,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32, // size
    },
];

/// One particle as laid out in GPU memory.
///
/// The layout is shared with the particle pipeline through
/// [`ParticleRecord::vertex_layout`]; change both or neither.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ParticleRecord {
    pub position: [f32; 3],
    pub size: f32,
}

impl ParticleRecord {
    pub fn new(position: Vec3, size: f32) -> Self {
        Self {
            position: position.to_array(),
            size,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Vertex buffer layout for the particle pipeline.
    ///
    /// Stepped per instance: each particle is one instance of a 6-vertex quad.
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: PARTICLE_STRIDE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &PARTICLE_ATTRIBUTES,
        }
    }
}

/// Number of lattice divisions per axis for `count` particles: `ceil(cbrt(count))`.
///
/// Computed on integers so perfect cubes never round up by a float error.
pub fn lattice_divisions(count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    let mut frag = (count as f64).cbrt().round() as u32;
    while (frag as u64).pow(3) < count as u64 {
        frag += 1;
    }
    while frag > 1 && ((frag - 1) as u64).pow(3) >= count as u64 {
        frag -= 1;
    }
    frag.max(1)
}

/// The full set of particles plus the parameters it was built from.
#[derive(Debug, Clone, Default)]
pub struct ParticleCloud {
    records: Vec<ParticleRecord>,
    extent: f32,
    divisions: u32,
}

impl ParticleCloud {
    /// Generate `count` particles filling a cube of edge `extent`.
    ///
    /// For lattice index `i` (integer division throughout):
    ///
    /// ```text
    /// x = (r + i % frag)          / frag * extent
    /// y = (r + (i / frag) % frag) / frag * extent
    /// z = (r + i / frag²)         / frag * extent
    /// size = r * 20 + 20
    /// ```
    ///
    /// with a fresh `r` in `[0, 1)` drawn for each component, in that order.
    /// When `count` is not a perfect cube the top z layer is only partly
    /// filled.
    pub fn generate<R: Rng + ?Sized>(count: u32, extent: f32, rng: &mut R) -> Self {
        let frag = lattice_divisions(count);
        let records = (0..count)
            .map(|i| {
                let x = lattice_coordinate(rng.gen::<f64>(), u64::from(i % frag), frag, extent);
                let y = lattice_coordinate(
                    rng.gen::<f64>(),
                    u64::from((i / frag) % frag),
                    frag,
                    extent,
                );
                let z = lattice_coordinate(
                    rng.gen::<f64>(),
                    u64::from(i) / (u64::from(frag) * u64::from(frag)),
                    frag,
                    extent,
                );
                let size = rng.gen::<f32>() * SIZE_RANGE + MIN_SIZE;
                ParticleRecord::new(Vec3::new(x, y, z), size.min(below(MIN_SIZE + SIZE_RANGE)))
            })
            .collect();

        Self {
            records,
            extent,
            divisions: frag,
        }
    }

    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Lattice divisions per axis used to build this cloud.
    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    /// Raw bytes ready for upload, `len() * PARTICLE_STRIDE` long.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }
}

/// `(jitter + cell) / frag * extent`, kept strictly below `extent`.
fn lattice_coordinate(jitter: f64, cell: u64, frag: u32, extent: f32) -> f32 {
    let value = ((jitter + cell as f64) / f64::from(frag) * f64::from(extent)) as f32;
    if extent > 0.0 {
        value.min(below(extent))
    } else {
        value
    }
}

/// Largest `f32` strictly less than a positive `value`.
fn below(value: f32) -> f32 {
    f32::from_bits(value.to_bits() - 1)
}
