//! First-person fly camera.
//!
//! Orientation is derived from the absolute cursor position every frame rather
//! than from accumulated deltas, so the same cursor position always produces
//! the same view direction. Movement is planar: the vertical part of the view
//! direction is dropped before translating.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat3, Mat4, Vec2, Vec3};

/// Pitch is clamped to this many degrees either side of the horizon.
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 70.0;

pub const Z_NEAR: f32 = 0.01;
pub const Z_FAR: f32 = 100.0;

/// Eye height the camera starts at.
pub const EYE_HEIGHT: f32 = 1.6;

/// A single frame's worth of keyboard movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    StrafeRight,
    StrafeLeft,
}

/// Map a cursor position in pixels into a symmetric angular range.
///
/// The window spans `max - min` degrees centered on zero. Screen y grows
/// downward, so it is flipped: moving the cursor up gives positive values.
pub fn cursor_in_range(cursor: Vec2, window_size: (u32, u32), min: f32, max: f32) -> Vec2 {
    let sum = max - min;
    let (w, h) = window_size;
    let x = cursor.x / w as f32 * sum - sum / 2.0;
    let y = cursor.y / h as f32 * sum - sum / 2.0;
    Vec2::new(x, -y)
}

/// Yaw and pitch in degrees for a ranged cursor value.
///
/// Yaw is unbounded; pitch is clamped after dividing by `gain`.
pub fn look_angles(ranged: Vec2, gain: f32) -> (f32, f32) {
    let yaw = ranged.x / gain;
    let pitch = (ranged.y / gain).clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    (yaw, pitch)
}

/// Unit view direction for yaw/pitch given in degrees.
pub fn forward_from_angles(yaw_degrees: f32, pitch_degrees: f32) -> Vec3 {
    let look_around = Mat3::from_rotation_y((-yaw_degrees).to_radians());
    let look_up_down = Mat3::from_rotation_x(pitch_degrees.to_radians());
    (look_around * look_up_down * Vec3::NEG_Z).normalize()
}

/// Free-flying first-person camera.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    /// World-space eye position. Unbounded.
    pub position: Vec3,
    forward: Vec3,
}

impl FlyCamera {
    /// Camera at eye height above the origin, looking down -Z.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, EYE_HEIGHT, 0.0),
            forward: Vec3::NEG_Z,
        }
    }

    /// Unit-length view direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Point the camera according to an absolute cursor position.
    ///
    /// Does nothing while the window has a zero dimension (minimized).
    pub fn look_at_cursor(
        &mut self,
        cursor: Vec2,
        window_size: (u32, u32),
        cursor_range: (f32, f32),
        rotation_gain: f32,
    ) {
        if window_size.0 == 0 || window_size.1 == 0 {
            return;
        }
        let ranged = cursor_in_range(cursor, window_size, cursor_range.0, cursor_range.1);
        let (yaw, pitch) = look_angles(ranged, rotation_gain);
        self.forward = forward_from_angles(yaw, pitch);
    }

    /// Translate the camera along the ground plane relative to where it looks.
    pub fn apply_movement(&mut self, movement: Movement, speed: f32) {
        let direction = self.forward * Vec3::new(speed, 0.0, speed);
        match movement {
            Movement::Forward => self.position += direction,
            Movement::Backward => self.position -= direction,
            Movement::StrafeRight => self.position += strafe_direction(direction),
            Movement::StrafeLeft => self.position -= strafe_direction(direction),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, Vec3::Y)
    }

    pub fn projection_matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR)
    }

    /// Combined projection * view for the given framebuffer size.
    pub fn view_projection(&self, width: u32, height: u32) -> Mat4 {
        self.projection_matrix(width, height) * self.view_matrix()
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotate a planar direction 90 degrees clockwise seen from above (to the right).
fn strafe_direction(direction: Vec3) -> Vec3 {
    Mat3::from_rotation_y(-FRAC_PI_2) * direction
}
