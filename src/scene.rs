//! Layout of the static scene.
//!
//! The scene is a floor, two cubes and two planes. This module only decides
//! what goes where; `gpu::scene_renderer` turns the list into draw calls.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Mat4, Vec3};

use crate::primitives::MeshKind;

/// Propeller spin in radians per second.
pub const PROPELLER_SPEED: f32 = 10.0;

/// One mesh drawn with one model transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneDraw {
    pub mesh: MeshKind,
    pub model: Mat4,
}

/// Every draw of the scene at `current_time` seconds, in draw order.
pub fn scene_draws(current_time: f32) -> Vec<SceneDraw> {
    let mut draws = Vec::with_capacity(15);

    // The floor is built in world space.
    draws.push(SceneDraw {
        mesh: MeshKind::Floor,
        model: Mat4::IDENTITY,
    });

    for model in [
        Mat4::from_translation(Vec3::new(2.0, 1.0, 2.0)) * Mat4::from_rotation_y(FRAC_PI_2),
        Mat4::from_translation(Vec3::new(-2.0, 1.0, -2.0)) * Mat4::from_rotation_y(FRAC_PI_4),
    ] {
        draws.push(SceneDraw {
            mesh: MeshKind::Cube,
            model,
        });
    }

    for model in [
        Mat4::from_translation(Vec3::new(-2.0, 0.5, 2.0)) * Mat4::from_rotation_x(FRAC_PI_4),
        Mat4::from_translation(Vec3::new(2.0, 0.5, -2.0)) * Mat4::from_rotation_x(FRAC_PI_4 * 3.0),
    ] {
        push_plane(&mut draws, model, current_time);
    }

    draws
}

fn push_plane(draws: &mut Vec<SceneDraw>, model: Mat4, current_time: f32) {
    let propeller = model
        * Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0))
        * Mat4::from_rotation_y(current_time * PROPELLER_SPEED)
        * Mat4::from_rotation_x(FRAC_PI_2)
        * Mat4::from_scale(Vec3::splat(0.5));
    let wing_right_back = model
        * Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0))
        * Mat4::from_scale(Vec3::splat(0.5));
    let wing_left = model * Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0));
    let wing_left_back = model
        * Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0))
        * Mat4::from_scale(Vec3::new(-0.5, 0.5, 0.5));

    draws.extend(
        [
            (MeshKind::PlaneBody, model),
            (MeshKind::PlaneWing, model),
            (MeshKind::PlanePropeller, propeller),
            (MeshKind::PlaneWing, wing_right_back),
            (MeshKind::PlaneWing, wing_left),
            (MeshKind::PlaneWing, wing_left_back),
        ]
        .map(|(mesh, model)| SceneDraw { mesh, model }),
    );
}

/// Upper bound on draws per frame, used to size GPU uniform storage.
pub fn max_scene_draws() -> usize {
    scene_draws(0.0).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_counts() {
        let draws = scene_draws(0.0);
        assert_eq!(draws.len(), 15);
        let count = |kind| draws.iter().filter(|d| d.mesh == kind).count();
        assert_eq!(count(MeshKind::Floor), 1);
        assert_eq!(count(MeshKind::Cube), 2);
        assert_eq!(count(MeshKind::PlaneBody), 2);
        assert_eq!(count(MeshKind::PlaneWing), 8);
        assert_eq!(count(MeshKind::PlanePropeller), 2);
    }

    #[test]
    fn test_floor_is_untransformed() {
        assert_eq!(scene_draws(3.0)[0].model, Mat4::IDENTITY);
    }

    #[test]
    fn test_cubes_rest_on_floor() {
        for draw in scene_draws(0.0).iter().filter(|d| d.mesh == MeshKind::Cube) {
            let bottom = draw.model.transform_point3(Vec3::new(0.0, -1.0, 0.0));
            assert!(bottom.y.abs() < 1e-5);
        }
    }

    #[test]
    fn test_only_propellers_move() {
        let before = scene_draws(0.0);
        let after = scene_draws(0.1);
        for (a, b) in before.iter().zip(&after) {
            if a.mesh == MeshKind::PlanePropeller {
                assert_ne!(a.model, b.model);
            } else {
                assert_eq!(a.model, b.model);
            }
        }
    }

    #[test]
    fn test_left_wing_mirrors_right() {
        let draws = scene_draws(0.0);
        let right = draws[4].model.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        let left = draws[7].model.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        let origin = draws[3].model.transform_point3(Vec3::ZERO);
        assert!(((right - origin) + (left - origin)).length() < 1e-5);
    }
}
