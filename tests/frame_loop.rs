//! Headless frame loop: input and simulation without a window.

use std::time::{Duration, Instant};

use drizzle::camera::EYE_HEIGHT;
use drizzle::prelude::*;
use drizzle::scene::{max_scene_draws, scene_draws};

#[test]
fn test_offsets_after_fifty_frames() {
    let mut state = AppState::new(WeatherConfig::new());
    for _ in 0..50 {
        assert!(state.update(0.02));
    }
    assert!((state.offsets.gravity() - 1.0).abs() < 1e-3);
    assert!((state.offsets.wind() - 0.1).abs() < 1e-3);
}

#[test]
fn test_centered_cursor_keeps_camera_still() {
    let mut state = AppState::new(WeatherConfig::new());
    for _ in 0..10 {
        state.update(0.02);
    }
    assert_eq!(state.camera.position, Vec3::new(0.0, EYE_HEIGHT, 0.0));
    let forward = state.camera.forward();
    assert!((forward - Vec3::NEG_Z).length() < 1e-6);
}

#[test]
fn test_offsets_do_not_depend_on_preset() {
    let mut rain = AppState::new(WeatherConfig::new().with_preset(WeatherPreset::Rain));
    let mut snow = AppState::new(WeatherConfig::new().with_preset(WeatherPreset::Snow));
    for _ in 0..20 {
        rain.update(0.016);
        snow.update(0.016);
    }
    assert_eq!(rain.offsets, snow.offsets);
}

#[test]
fn test_frame_limiter_spacing() {
    let mut limiter = FrameLimiter::new(Duration::from_millis(20));
    let start = Instant::now();
    assert!(limiter.ready(start));

    let deadline = limiter.schedule(start);
    assert_eq!(deadline, start + Duration::from_millis(20));
    assert!(!limiter.ready(start + Duration::from_millis(19)));
    assert!(limiter.ready(start + Duration::from_millis(20)));
}

#[test]
fn test_scene_draw_count_is_stable() {
    assert_eq!(max_scene_draws(), 15);
    assert_eq!(scene_draws(3.5).len(), max_scene_draws());
}
