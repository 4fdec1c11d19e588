//! Static meshes for the scene around the weather.
//!
//! Every mesh is an indexed triangle list with one RGBA color per vertex.

/// Identifies one of the built-in meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Floor,
    Cube,
    PlaneBody,
    PlaneWing,
    PlanePropeller,
}

impl MeshKind {
    pub const ALL: [MeshKind; 5] = [
        MeshKind::Floor,
        MeshKind::Cube,
        MeshKind::PlaneBody,
        MeshKind::PlaneWing,
        MeshKind::PlanePropeller,
    ];

    /// Position of this kind in [`MeshKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn build(self) -> Mesh {
        match self {
            MeshKind::Floor => floor(),
            MeshKind::Cube => cube(),
            MeshKind::PlaneBody => plane_body(),
            MeshKind::PlaneWing => plane_wing(),
            MeshKind::PlanePropeller => plane_propeller(),
        }
    }
}

/// Indexed triangle mesh with per-vertex colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

const FLOOR_TILES: u32 = 10;
const FLOOR_TILE_SIZE: f32 = 2.0;

/// Checkerboard ground plane at y = 0, centered on the origin.
///
/// Built in world space so it needs no model transform.
pub fn floor() -> Mesh {
    let light = [0.45, 0.5, 0.4, 1.0];
    let dark = [0.3, 0.35, 0.28, 1.0];
    let half = FLOOR_TILES as f32 * FLOOR_TILE_SIZE / 2.0;

    let mut mesh = Mesh {
        positions: Vec::new(),
        colors: Vec::new(),
        indices: Vec::new(),
    };

    for row in 0..FLOOR_TILES {
        for col in 0..FLOOR_TILES {
            let x0 = col as f32 * FLOOR_TILE_SIZE - half;
            let z0 = row as f32 * FLOOR_TILE_SIZE - half;
            let x1 = x0 + FLOOR_TILE_SIZE;
            let z1 = z0 + FLOOR_TILE_SIZE;
            let color = if (row + col) % 2 == 0 { light } else { dark };

            let base = mesh.positions.len() as u32;
            mesh.positions
                .extend_from_slice(&[[x0, 0.0, z0], [x1, 0.0, z0], [x1, 0.0, z1], [x0, 0.0, z1]]);
            mesh.colors.extend_from_slice(&[color; 4]);
            mesh.indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }
    }

    mesh
}

/// Cube spanning -1..1 on every axis, one flat color per face.
pub fn cube() -> Mesh {
    let corners: [[[f32; 3]; 4]; 6] = [
        [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]], // +X
        [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]], // -X
        [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]], // +Y
        [[-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0]], // -Y
        [[1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0]], // +Z
        [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]], // -Z
    ];
    let colors: [[f32; 4]; 6] = [
        [0.9, 0.2, 0.2, 1.0],
        [0.6, 0.1, 0.1, 1.0],
        [0.2, 0.9, 0.2, 1.0],
        [0.1, 0.6, 0.1, 1.0],
        [0.2, 0.2, 0.9, 1.0],
        [0.1, 0.1, 0.6, 1.0],
    ];

    let mut mesh = Mesh {
        positions: Vec::with_capacity(24),
        colors: Vec::with_capacity(24),
        indices: Vec::with_capacity(36),
    };
    for (corners, color) in corners.into_iter().zip(colors) {
        let base = mesh.positions.len() as u32;
        mesh.positions.extend_from_slice(&corners);
        mesh.colors.extend_from_slice(&[color; 4]);
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Elongated diamond along +Y; the nose is at y = 0.5.
pub fn plane_body() -> Mesh {
    let nose = [1.0, 0.85, 0.3, 1.0];
    let hull = [0.85, 0.6, 0.15, 1.0];
    let tail = [0.5, 0.35, 0.1, 1.0];
    Mesh {
        positions: vec![
            [0.0, 0.5, 0.0],   // nose
            [0.0, -0.5, 0.0],  // tail
            [0.1, 0.0, 0.0],
            [0.0, 0.0, 0.1],
            [-0.1, 0.0, 0.0],
            [0.0, 0.0, -0.1],
        ],
        colors: vec![nose, tail, hull, hull, hull, hull],
        indices: vec![
            0, 2, 3, 0, 3, 4, 0, 4, 5, 0, 5, 2, // front
            1, 3, 2, 1, 4, 3, 1, 5, 4, 1, 2, 5, // back
        ],
    }
}

/// Right wing, flat in the XY plane, rooted at the body axis.
///
/// The left wing is the same mesh mirrored across X.
pub fn plane_wing() -> Mesh {
    let root = [0.2, 0.4, 0.8, 1.0];
    let tip = [0.6, 0.8, 1.0, 1.0];
    Mesh {
        positions: vec![
            [0.0, 0.2, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, -0.15, 0.0],
            [0.0, -0.3, 0.0],
        ],
        colors: vec![root, tip, tip, root],
        indices: vec![0, 3, 1, 1, 3, 2],
    }
}

/// Two-bladed propeller in the XY plane, centered on the hub.
pub fn plane_propeller() -> Mesh {
    let blade = [0.15, 0.15, 0.15, 1.0];
    let hub = [0.4, 0.4, 0.4, 1.0];
    Mesh {
        positions: vec![
            [-1.0, -0.08, 0.0],
            [1.0, -0.08, 0.0],
            [1.0, 0.08, 0.0],
            [-1.0, 0.08, 0.0],
            [0.0, 0.0, 0.0],
        ],
        colors: vec![blade, blade, blade, blade, hub],
        indices: vec![0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meshes_are_well_formed() {
        for kind in MeshKind::ALL {
            let mesh = kind.build();
            assert_eq!(mesh.positions.len(), mesh.colors.len(), "{:?}", kind);
            assert!(!mesh.indices.is_empty(), "{:?}", kind);
            assert_eq!(mesh.indices.len() % 3, 0, "{:?}", kind);
            let vertex_count = mesh.positions.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < vertex_count), "{:?}", kind);
        }
    }

    #[test]
    fn test_kind_index_matches_all() {
        for (i, kind) in MeshKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_floor_is_flat() {
        let floor = floor();
        assert!(floor.positions.iter().all(|p| p[1] == 0.0));
        assert_eq!(floor.index_count(), FLOOR_TILES * FLOOR_TILES * 6);
    }

    #[test]
    fn test_cube_bounds() {
        let cube = cube();
        assert_eq!(cube.positions.len(), 24);
        assert_eq!(cube.index_count(), 36);
        assert!(cube.positions.iter().flatten().all(|c| c.abs() == 1.0));
    }
}
