//! Window, frame loop and per-frame state.
//!
//! [`AppState`] holds everything that changes from frame to frame: the camera,
//! the weather offsets, input and timing. [`run`] opens a window and drives it
//! at a fixed minimum frame interval until the window closes or Escape is
//! pressed.

use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::camera::FlyCamera;
use crate::config::WeatherConfig;
use crate::error::{AppError, GpuError};
use crate::gpu::{GpuContext, ParticleFrame, ParticleRenderer, SceneRenderer};
use crate::input::Input;
use crate::particles::ParticleCloud;
use crate::scene::{max_scene_draws, scene_draws};
use crate::time::{FrameLimiter, Time};
use crate::weather::WeatherOffsets;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Mutable state of a running demo.
#[derive(Debug)]
pub struct AppState {
    pub config: WeatherConfig,
    pub camera: FlyCamera,
    pub offsets: WeatherOffsets,
    pub input: Input,
    pub time: Time,
}

impl AppState {
    pub fn new(config: WeatherConfig) -> Self {
        let (width, height) = config.window_size;
        Self {
            camera: FlyCamera::new(),
            offsets: WeatherOffsets::new(),
            input: Input::new(width, height),
            time: Time::new(),
            config,
        }
    }

    /// Apply this frame's input to the camera.
    ///
    /// Returns `false` when the user asked to quit.
    pub fn handle_input(&mut self) -> bool {
        if self.input.exit_requested() {
            return false;
        }

        if let Some(movement) = self.input.movement() {
            self.camera.apply_movement(movement, self.config.linear_speed);
        }

        self.camera.look_at_cursor(
            self.input.cursor_position(),
            self.input.window_size(),
            self.config.cursor_range,
            self.config.rotation_gain,
        );

        true
    }

    /// Input and simulation half of a frame.
    ///
    /// Returns `false` when the user asked to quit; the offsets are not
    /// advanced in that case.
    pub fn update(&mut self, delta_time: f32) -> bool {
        if !self.handle_input() {
            return false;
        }
        self.offsets.advance(delta_time);
        true
    }

    pub(crate) fn particle_frame(&self, view_proj: Mat4, viewport: (u32, u32)) -> ParticleFrame {
        ParticleFrame {
            view_proj,
            camera_position: self.camera.position,
            camera_forward: self.camera.forward(),
            offsets: self.offsets,
            particle_density: self.config.particle_density,
            tint: self.config.preset.tint(),
            extent: self.config.extent,
            viewport,
        }
    }
}

/// GPU resources, created once the window exists.
struct Renderer {
    gpu: GpuContext,
    scene: SceneRenderer,
    particles: ParticleRenderer,
}

impl Renderer {
    fn new(gpu: GpuContext, cloud: &ParticleCloud) -> Result<Self, GpuError> {
        let particles = ParticleRenderer::new(&gpu.device, gpu.format(), cloud)?;
        let scene = SceneRenderer::new(&gpu.device, gpu.format(), max_scene_draws());
        Ok(Self {
            gpu,
            scene,
            particles,
        })
    }

    fn render(&self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.acquire_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Opaque scene first so particles depth-test against it.
            self.scene.draw(&mut render_pass);
            self.particles.draw(&mut render_pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// winit application driving the demo.
pub struct App {
    state: AppState,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    /// Generated at startup, dropped after upload.
    cloud: Option<ParticleCloud>,
    limiter: FrameLimiter,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: WeatherConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cloud = ParticleCloud::generate(config.particle_count, config.extent, &mut rng);
        let limiter = FrameLimiter::new(config.frame_interval);

        Self {
            state: AppState::new(config),
            window: None,
            renderer: None,
            cloud: Some(cloud),
            limiter,
            error: None,
        }
    }

    /// The fatal error that stopped the loop, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    /// Stop the loop and keep `error` for [`run`] to return.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        self.error = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let (width, height) = self.state.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(format!("drizzle - {}", self.state.config.preset.name()))
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        self.state.input = Input::new(size.width, size.height);
        self.state.input.set_cursor_grabbed(grab_cursor(&window));

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let cloud = self.cloud.take().unwrap_or_default();
        self.renderer = Some(Renderer::new(gpu, &cloud)?);

        log::info!(
            "Weather: {} particles, {} preset, density {}",
            self.state.config.particle_count,
            self.state.config.preset.name(),
            self.state.config.particle_density
        );

        self.window = Some(window);
        self.state.time = Time::new();
        Ok(())
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let frame_start = Instant::now();
        self.limiter.schedule(frame_start);

        let (current_time, delta_time) = self.state.time.update_at(frame_start);
        if self.state.time.fps_refreshed() {
            log::debug!("{:.1} fps", self.state.time.fps());
        }

        if !self.state.update(delta_time) {
            event_loop.exit();
            return;
        }

        let viewport = renderer.gpu.size();
        let view_proj = self.state.camera.view_projection(viewport.0, viewport.1);

        renderer
            .scene
            .prepare(&renderer.gpu.queue, view_proj, &scene_draws(current_time));
        renderer
            .particles
            .prepare(&renderer.gpu.queue, &self.state.particle_frame(view_proj, viewport));

        match renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipping frame: {:?}", e),
        }
    }
}

/// Hide and capture the cursor.
///
/// Returns `true` when the cursor is locked and only raw motion is reported.
fn grab_cursor(window: &Window) -> bool {
    window.set_cursor_visible(false);
    match window.set_cursor_grab(CursorGrabMode::Locked) {
        Ok(()) => true,
        Err(locked_err) => {
            if let Err(confined_err) = window.set_cursor_grab(CursorGrabMode::Confined) {
                log::warn!(
                    "Cursor grab unavailable ({}; {}); using absolute cursor",
                    locked_err,
                    confined_err
                );
            }
            false
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.state.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.gpu.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        self.state.input.handle_device_event(&event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        if self.limiter.ready(Instant::now()) {
            window.request_redraw();
            event_loop.set_control_flow(ControlFlow::Wait);
        } else if let Some(deadline) = self.limiter.deadline() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}

/// Open a window and run the demo until it is closed.
pub fn run(config: WeatherConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use glam::Vec3;

    #[test]
    fn test_fifty_idle_frames() {
        let mut state = AppState::new(WeatherConfig::new());
        let start = state.camera.clone();
        for _ in 0..50 {
            assert!(state.update(0.02));
        }
        assert!((state.offsets.gravity() - 1.0).abs() < 1e-5);
        assert!((state.offsets.wind() - 0.1).abs() < 1e-5);
        assert_eq!(state.camera, start);
    }

    #[test]
    fn test_escape_stops_before_advancing() {
        let mut state = AppState::new(WeatherConfig::new());
        state.input.press(KeyCode::Escape);
        assert!(!state.update(0.02));
        assert_eq!(state.offsets, WeatherOffsets::new());
    }

    #[test]
    fn test_held_key_moves_every_frame() {
        let config = WeatherConfig::new().with_linear_speed(0.5);
        let mut state = AppState::new(config);
        state.input.press(KeyCode::W);
        for _ in 0..4 {
            state.update(0.02);
        }
        let expected = Vec3::new(0.0, 1.6, -2.0);
        assert!((state.camera.position - expected).length() < 1e-5);
    }

    #[test]
    fn test_particle_frame_uses_config() {
        let config = WeatherConfig::new().with_particle_density(0.3).with_extent(12.0);
        let mut state = AppState::new(config);
        state.update(0.5);
        let frame = state.particle_frame(Mat4::IDENTITY, (640, 480));
        assert_eq!(frame.particle_density, 0.3);
        assert_eq!(frame.extent, 12.0);
        assert_eq!(frame.offsets.gravity(), 0.5);
        assert_eq!(frame.camera_forward, state.camera.forward());
        assert_eq!(frame.viewport, (640, 480));
    }

    #[test]
    fn test_stored_error_is_returned_once() {
        let mut app = App::new(WeatherConfig::new().with_particle_count(8).with_seed(1));
        assert!(app.take_error().is_none());

        app.error = Some(GpuError::NoAdapter.into());
        assert!(matches!(app.take_error(), Some(AppError::Gpu(GpuError::NoAdapter))));
        assert!(app.take_error().is_none());
    }
}
