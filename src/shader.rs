//! WGSL sources, embedded at compile time.

/// Weather particles: instanced quads animated from the weather offsets.
pub const PARTICLE_SHADER: &str = include_str!("shaders/particle.wgsl");

/// Static scene: vertex-colored triangles with one transform per draw.
pub const SCENE_SHADER: &str = include_str!("shaders/scene.wgsl");
