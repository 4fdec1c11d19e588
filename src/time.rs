//! Frame timing.
//!
//! [`Time`] is the single source of truth for elapsed time and delta time.
//! [`FrameLimiter`] enforces a minimum interval between frame starts by handing
//! the event loop a deadline to sleep until, instead of spinning.
//!
//! # Example
//!
//! ```ignore
//! use drizzle::time::{FrameLimiter, Time};
//!
//! let mut time = Time::new();
//! let mut limiter = FrameLimiter::new(Duration::from_millis(20));
//!
//! // In the frame loop:
//! if limiter.ready(Instant::now()) {
//!     let frame_start = Instant::now();
//!     let (elapsed, delta) = time.update();
//!     // ... draw ...
//!     limiter.schedule(frame_start);
//! }
//! ```

use std::time::{Duration, Instant};

/// Time tracking for the frame loop.
///
/// Provides elapsed time, delta time, frame counting, and FPS calculation.
#[derive(Debug)]
pub struct Time {
    /// When the timer was created.
    start: Instant,
    /// Elapsed seconds at the previous update.
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Set on the update that refreshed `fps`.
    fps_refreshed: bool,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_secs(1),
            fps_refreshed: false,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        self.update_at(Instant::now())
    }

    /// Update against an explicit clock reading.
    ///
    /// Delta time is the difference between successive elapsed readings, so
    /// the deltas of a run always sum to its elapsed time.
    pub fn update_at(&mut self, now: Instant) -> (f32, f32) {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        self.delta_secs = (elapsed - self.elapsed_secs).max(0.0);
        self.elapsed_secs = elapsed.max(self.elapsed_secs);

        self.frame_count += 1;

        // Update FPS periodically
        self.fps_refreshed = false;
        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            self.fps_refreshed = true;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the last update recomputed [`Time::fps`].
    #[inline]
    pub fn fps_refreshed(&self) -> bool {
        self.fps_refreshed
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Soft frame-rate ceiling.
///
/// After a frame, [`FrameLimiter::schedule`] records when the next frame may
/// start. The event loop sleeps until [`FrameLimiter::deadline`] and checks
/// [`FrameLimiter::ready`] before drawing again.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval: Duration,
    next_frame: Option<Instant>,
}

impl FrameLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_frame: None,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Earliest instant the next frame may start, if one has been scheduled.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.next_frame
    }

    /// Whether a new frame may start at `now`.
    pub fn ready(&self, now: Instant) -> bool {
        self.next_frame.map_or(true, |deadline| now >= deadline)
    }

    /// Record that a frame started at `frame_start`.
    pub fn schedule(&mut self, frame_start: Instant) -> Instant {
        let deadline = frame_start + self.interval;
        self.next_frame = Some(deadline);
        deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert_eq!(time.delta(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_deltas_sum_to_elapsed() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        let mut total = 0.0;
        for ms in [20, 35, 41, 60, 100] {
            let (_, delta) = time.update_at(start + Duration::from_millis(ms));
            total += delta;
        }
        assert!((total - time.elapsed()).abs() < 1e-6);
        assert!((time.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_fps_refresh() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        for frame in 1..50 {
            time.update_at(start + Duration::from_millis(20 * frame));
            assert!(!time.fps_refreshed());
        }
        time.update_at(start + Duration::from_millis(1000));
        assert!(time.fps_refreshed());
        assert!((time.fps() - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_limiter_ready_before_first_frame() {
        let limiter = FrameLimiter::new(Duration::from_millis(20));
        assert!(limiter.ready(Instant::now()));
        assert_eq!(limiter.deadline(), None);
    }

    #[test]
    fn test_limiter_waits_for_interval() {
        let mut limiter = FrameLimiter::new(Duration::from_millis(20));
        let start = Instant::now();
        let deadline = limiter.schedule(start);

        assert_eq!(deadline, start + Duration::from_millis(20));
        assert!(!limiter.ready(start));
        assert!(!limiter.ready(start + Duration::from_millis(19)));
        assert!(limiter.ready(start + Duration::from_millis(20)));
        assert!(limiter.ready(start + Duration::from_millis(45)));
    }
}
