use anyhow::Result;
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::ThreadRng;
use rtsim_render::{ButtonAction, SkiaRenderer, load_font};
use rtsim_timing::{HighPrecisionTimer, Timer};
use rtsim_trial::{ReactionTest, SimulationConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::session::Session;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    session: Session<HighPrecisionTimer, ThreadRng>,
    renderer: SkiaRenderer,
    arena: (u32, u32),
    frame_interval: Duration,
    next_frame: Instant,
    last_frame: Option<Instant>,
    should_exit: bool,
}

impl App {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let arena = (config.arena_width, config.arena_height);
        let frame_interval = config.frame_interval();
        let font = load_font(config.font_path.as_deref());
        let renderer = SkiaRenderer::new(arena.0, arena.1, font)?;
        let test = ReactionTest::new(config, HighPrecisionTimer::new(), rand::rng())?;

        Ok(Self {
            window: None,
            pixels: None,
            session: Session::new(test),
            renderer,
            arena,
            frame_interval,
            next_frame: Instant::now(),
            last_frame: None,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        log::info!("=== REACTION TIME SIMULATION ===");
        log::info!(
            "Platform: {} / {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        );
        log::info!("Click 'Start Simulation' to begin, ESC to exit.");

        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.arena;
        let window_attributes = Window::default_attributes()
            .with_title("Reaction Time Simulation")
            .with_inner_size(LogicalSize::new(w, h))
            .with_min_inner_size(LogicalSize::new(w / 2, h / 2));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();

        log::info!("Display Configuration:");
        log::info!(
            "  Physical size: {}×{}",
            physical_size.width,
            physical_size.height
        );
        log::info!("  Scale factor: {:.2}", window.scale_factor());
        if let Some(rate) = window
            .current_monitor()
            .and_then(|m| m.refresh_rate_millihertz())
        {
            log::info!("  Refresh rate: {:.1} Hz", rate as f64 / 1000.0);
        }

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(w, h, surface_texture)?);

        window.request_redraw();
        self.window = Some(window);
        self.next_frame = Instant::now();
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let Some(pixels) = self.pixels.as_mut() else {
            return Ok(());
        };
        let scene = self.session.scene();
        let stats = self.renderer.render_frame(&scene, pixels.frame_mut())?;
        pixels.render()?;
        log::trace!(
            "draw {:.3}ms, copy {:.3}ms, total {:.3}ms",
            stats.draw.as_secs_f64() * 1e3,
            stats.copy.as_secs_f64() * 1e3,
            stats.total.as_secs_f64() * 1e3,
        );
        Ok(())
    }

    fn update(&mut self) {
        let frame_start = Instant::now();
        if let Some(last) = self.last_frame.replace(frame_start) {
            self.session.test.timer.record_frame(frame_start - last);
        }

        let now = self.session.test.timer.now();
        if let Some(result) = self.session.tick(now) {
            match serde_json::to_string(&result) {
                Ok(json) => log::info!("trial result {json}"),
                Err(e) => log::warn!("could not serialise trial result: {e}"),
            }
        }
    }

    fn handle_key(&mut self, key: PhysicalKey, event_loop: &ActiveEventLoop) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match code {
            KeyCode::Space => {
                let at = self.session.test.timer.now();
                self.session.response_signal(at);
            }
            KeyCode::Escape => self.cleanup_and_exit(event_loop),
            _ => {}
        }
    }

    fn handle_cursor(&mut self, x: f64, y: f64) {
        let cursor = self
            .pixels
            .as_ref()
            .and_then(|p| p.window_pos_to_pixel((x as f32, y as f32)).ok())
            .map(|(px, py)| (px as f32, py as f32));
        self.session.set_cursor(cursor);
    }

    fn handle_click(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(ButtonAction::Exit) = self.session.click() {
            self.cleanup_and_exit(event_loop);
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                log::error!("Failed to resize surface: {}", e);
            }
        }
        log::debug!("Display resized to: {}×{}", new_size.width, new_size.height);
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        let stats = self.session.test.timer.calibration_stats();
        log::info!(
            "Frame timing: {:.3} ms/frame, {:.1} Hz, jitter {:.3} ms over {} frames",
            stats.average_frame_time_ns / 1e6,
            stats.effective_fps,
            stats.jitter_ns / 1e6,
            self.session.test.timer.frame_count(),
        );
        log::info!("Goodbye.");

        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                log::error!("Failed to create window and surface: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    log::error!("Render error: {}", e);
                    self.cleanup_and_exit(event_loop);
                }
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed() && !event.repeat =>
            {
                self.handle_key(event.physical_key, event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => self.handle_cursor(position.x, position.y),
            WindowEvent::CursorLeft { .. } => self.session.set_cursor(None),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_click(event_loop),
            WindowEvent::Resized(sz) => self.handle_resize(sz),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.handle_resize(size);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame += self.frame_interval;
            if self.next_frame < now {
                // fell behind, don't try to catch up with a burst of frames
                self.next_frame = now + self.frame_interval;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}
