//! # drizzle - falling weather particles
//!
//! A first-person walk through rain or snow, rendered with wgpu.
//!
//! The particle cloud is generated once on the CPU and uploaded once. After
//! that the CPU only advances two scalars per frame (a gravity offset and a
//! wind offset); every particle's fall, sway and wrap-around is computed in
//! the vertex shader from its rest position and those two numbers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use drizzle::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let config = WeatherConfig::new()
//!         .with_preset(WeatherPreset::Rain)
//!         .with_particle_count(20_000)
//!         .with_seed(7);
//!     drizzle::run(config)
//! }
//! ```
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | W / Up | Move forward |
//! | S / Down | Move backward |
//! | D / Right | Strafe right |
//! | A / Left | Strafe left |
//! | Mouse | Look around |
//! | Escape | Quit |
//!
//! ## Headless use
//!
//! Everything except [`run`] works without a window. [`AppState`] drives one
//! frame of input and simulation, which is what the tests use:
//!
//! ```
//! use drizzle::prelude::*;
//!
//! let mut state = AppState::new(WeatherConfig::new());
//! for _ in 0..50 {
//!     assert!(state.update(0.02));
//! }
//! assert!((state.offsets.gravity() - 1.0).abs() < 1e-3);
//! ```

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod gpu;
pub mod input;
pub mod particles;
pub mod primitives;
pub mod scene;
pub mod shader;
pub mod time;
pub mod weather;

pub use app::{run, App, AppState};
pub use camera::{FlyCamera, Movement};
pub use config::{WeatherConfig, WeatherPreset};
pub use error::{AppError, GpuError};
pub use glam::{Mat4, Vec2, Vec3};
pub use particles::{ParticleCloud, ParticleRecord};
pub use weather::WeatherOffsets;

/// Common imports for driving the demo.
///
/// ```ignore
/// use drizzle::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{run, AppState};
    pub use crate::camera::{FlyCamera, Movement};
    pub use crate::config::{WeatherConfig, WeatherPreset};
    pub use crate::error::{AppError, GpuError};
    pub use crate::input::{Input, KeyCode};
    pub use crate::particles::{ParticleCloud, ParticleRecord};
    pub use crate::time::{FrameLimiter, Time};
    pub use crate::weather::WeatherOffsets;
    pub use crate::{Mat4, Vec2, Vec3};
}
