//! Weather time offsets.
//!
//! The particle cloud never moves on the CPU. Instead two scalars grow with
//! elapsed time and the vertex shader turns them into fall and drift. Per-frame
//! CPU cost is constant no matter how many particles there are.

/// Gravity offset gained per second.
pub const GRAVITY_RATE: f32 = 1.0;

/// Wind offset gained per second.
pub const WIND_RATE: f32 = 0.1;

/// Accumulated simulation time fed to the particle shader.
///
/// Both values only ever grow. They are not clamped or wrapped; the shader
/// folds positions back into the visible volume itself.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeatherOffsets {
    gravity: f32,
    wind: f32,
}

impl WeatherOffsets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both offsets by one frame's worth of time.
    pub fn advance(&mut self, delta_time: f32) {
        self.gravity += GRAVITY_RATE * delta_time;
        self.wind += WIND_RATE * delta_time;
    }

    #[inline]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    #[inline]
    pub fn wind(&self) -> f32 {
        self.wind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let offsets = WeatherOffsets::new();
        assert_eq!(offsets.gravity(), 0.0);
        assert_eq!(offsets.wind(), 0.0);
    }

    #[test]
    fn test_single_advance() {
        let mut offsets = WeatherOffsets::new();
        offsets.advance(0.5);
        assert_eq!(offsets.gravity(), 0.5);
        assert!((offsets.wind() - 0.05).abs() < 1e-7);
    }

    #[test]
    fn test_sum_of_deltas() {
        let deltas = [0.016, 0.033, 0.02, 0.1, 0.0, 0.007];
        let mut offsets = WeatherOffsets::new();
        for dt in deltas {
            offsets.advance(dt);
        }
        let total: f32 = deltas.iter().sum();
        assert!((offsets.gravity() - total).abs() < 1e-5);
        assert!((offsets.wind() - 0.1 * total).abs() < 1e-6);
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut forward = WeatherOffsets::new();
        let mut reverse = WeatherOffsets::new();
        let deltas = [0.02, 0.5, 0.013, 0.25];
        for dt in deltas {
            forward.advance(dt);
        }
        for dt in deltas.iter().rev() {
            reverse.advance(*dt);
        }
        assert!((forward.gravity() - reverse.gravity()).abs() < 1e-5);
        assert!((forward.wind() - reverse.wind()).abs() < 1e-6);
    }

    #[test]
    fn test_no_wraparound() {
        let mut offsets = WeatherOffsets::new();
        for _ in 0..1000 {
            offsets.advance(1.0);
        }
        assert_eq!(offsets.gravity(), 1000.0);
        assert!((offsets.wind() - 100.0).abs() < 1e-2);
    }
}
