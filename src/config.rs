//! Demo configuration.
//!
//! All tunables live in [`WeatherConfig`]. Values are fixed once the demo
//! starts; nothing here is mutated by the frame loop.
//!
//! ```ignore
//! use drizzle::config::{WeatherConfig, WeatherPreset};
//!
//! let config = WeatherConfig::new()
//!     .with_preset(WeatherPreset::Rain)
//!     .with_particle_count(50_000)
//!     .with_seed(7);
//! ```

use std::time::Duration;

use glam::Vec3;

/// Weather look presets.
///
/// Particle density controls how much a particle's size slows its fall:
/// heavy drops want a high value, drifting flakes a low one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherPreset {
    Rain,
    #[default]
    Snow,
}

impl WeatherPreset {
    /// Default particle density for this preset.
    pub fn particle_density(self) -> f32 {
        match self {
            WeatherPreset::Rain => 0.25,
            WeatherPreset::Snow => 0.05,
        }
    }

    /// Linear RGB tint applied to every particle.
    pub fn tint(self) -> Vec3 {
        match self {
            WeatherPreset::Rain => Vec3::new(0.55, 0.65, 0.85),
            WeatherPreset::Snow => Vec3::new(0.95, 0.95, 1.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeatherPreset::Rain => "rain",
            WeatherPreset::Snow => "snow",
        }
    }
}

/// Configuration for the weather demo.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherConfig {
    /// Number of particles in the cloud.
    pub particle_count: u32,
    /// Edge length of the cube the cloud fills (world units).
    pub extent: f32,
    /// How strongly particle size slows the fall speed.
    pub particle_density: f32,
    /// Active look preset.
    pub preset: WeatherPreset,
    /// Camera translation per frame while a movement key is held.
    pub linear_speed: f32,
    /// Divides cursor angles; larger values make looking less sensitive.
    pub rotation_gain: f32,
    /// Angular range (degrees) the cursor is mapped into, as `(min, max)`.
    pub cursor_range: (f32, f32),
    /// Initial window size in logical pixels.
    pub window_size: (u32, u32),
    /// Minimum time between frame starts.
    pub frame_interval: Duration,
    /// Seed for the particle cloud. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl WeatherConfig {
    pub const DEFAULT_PARTICLE_COUNT: u32 = 10_000;
    pub const DEFAULT_EXTENT: f32 = 30.0;
    pub const DEFAULT_LINEAR_SPEED: f32 = 0.15;
    pub const DEFAULT_ROTATION_GAIN: f32 = 30.0;
    pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (600, 600);
    pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(20);
    /// Largest cloud that fits the default 256 MiB buffer limit.
    pub const MAX_PARTICLE_COUNT: u32 = 16_777_216;

    /// Create a configuration with the default (snow) settings.
    pub fn new() -> Self {
        let preset = WeatherPreset::default();
        Self {
            particle_count: Self::DEFAULT_PARTICLE_COUNT,
            extent: Self::DEFAULT_EXTENT,
            particle_density: preset.particle_density(),
            preset,
            linear_speed: Self::DEFAULT_LINEAR_SPEED,
            rotation_gain: Self::DEFAULT_ROTATION_GAIN,
            cursor_range: (0.0, 360.0),
            window_size: Self::DEFAULT_WINDOW_SIZE,
            frame_interval: Self::DEFAULT_FRAME_INTERVAL,
            seed: None,
        }
    }

    /// Switch preset. Also resets particle density to the preset's value.
    pub fn with_preset(mut self, preset: WeatherPreset) -> Self {
        self.preset = preset;
        self.particle_density = preset.particle_density();
        self
    }

    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_extent(mut self, extent: f32) -> Self {
        self.extent = extent;
        self
    }

    /// Override the preset's particle density.
    ///
    /// Negative values are clamped to zero; below that the shader's fall speed
    /// divisor can reach zero for the largest particles.
    pub fn with_particle_density(mut self, density: f32) -> Self {
        self.particle_density = density.max(0.0);
        self
    }

    pub fn with_linear_speed(mut self, speed: f32) -> Self {
        self.linear_speed = speed;
        self
    }

    pub fn with_rotation_gain(mut self, gain: f32) -> Self {
        self.rotation_gain = gain;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Use a fixed seed so the particle cloud is identical across runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.particle_count, 10_000);
        assert_eq!(config.extent, 30.0);
        assert_eq!(config.preset, WeatherPreset::Snow);
        assert_eq!(config.particle_density, 0.05);
        assert_eq!(config.linear_speed, 0.15);
        assert_eq!(config.rotation_gain, 30.0);
        assert_eq!(config.frame_interval, Duration::from_millis(20));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_preset_sets_density() {
        let config = WeatherConfig::new().with_preset(WeatherPreset::Rain);
        assert_eq!(config.particle_density, 0.25);
    }

    #[test]
    fn test_density_override_after_preset() {
        let config = WeatherConfig::new()
            .with_preset(WeatherPreset::Rain)
            .with_particle_density(0.1);
        assert_eq!(config.preset, WeatherPreset::Rain);
        assert_eq!(config.particle_density, 0.1);
    }

    #[test]
    fn test_negative_density_clamps_to_zero() {
        let config = WeatherConfig::new().with_particle_density(-0.05);
        assert_eq!(config.particle_density, 0.0);

        // Smallest particle size must keep the fall divisor positive.
        assert!(1.0 + crate::particles::MIN_SIZE * config.particle_density > 0.0);
    }

    #[test]
    fn test_max_particle_count_fits_default_buffer_limit() {
        let bytes =
            u64::from(WeatherConfig::MAX_PARTICLE_COUNT) * crate::particles::PARTICLE_STRIDE;
        assert!(bytes <= wgpu::Limits::default().max_buffer_size);
    }
}
