use anyhow::{Result, anyhow};
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::ThreadRng;
use reflex_experiment::FileDestination;
use reflex_render::SkiaRenderer;
use reflex_timing::{Clock, FrameTimes, MonotonicClock};
use std::sync::Arc;
use tracing::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

use crate::cli::Cli;
use crate::keymap::{command_for_key, command_for_pointer};
use crate::session::{Command, Flow, Session};

const TITLE: &str = "Reaction Time Test";

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<SkiaRenderer>,
    session: Session<MonotonicClock, ThreadRng>,
    fullscreen: bool,
    current_size: Option<PhysicalSize<u32>>,
    refresh_rate: Option<f64>,
    frame_times: FrameTimes,
    last_frame_ns: Option<u64>,
    title: String,
    should_exit: bool,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self> {
        let session = Session::new(
            cli.controller_config(),
            MonotonicClock::new(),
            rand::rng(),
            Box::new(FileDestination::new(&cli.output)),
            cli.export_options(),
        )?;

        Ok(Self {
            window: None,
            pixels: None,
            renderer: None,
            session,
            fullscreen: !cli.windowed,
            current_size: None,
            refresh_rate: None,
            frame_times: FrameTimes::default(),
            last_frame_ns: None,
            title: TITLE.to_string(),
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!(
            platform = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            "Enter: start, T: test run, E: export, Esc: quit"
        );
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow!("No monitor available"))?;

        self.refresh_rate = monitor
            .refresh_rate_millihertz()
            .map(|rate| rate as f64 / 1000.0);

        let mut attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_resizable(!self.fullscreen);
        attributes = if self.fullscreen {
            attributes.with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))))
        } else {
            attributes.with_inner_size(LogicalSize::new(480.0, 800.0))
        };

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        self.current_size = Some(size);

        info!(
            width = size.width,
            height = size.height,
            scale_factor = window.scale_factor(),
            refresh_hz = ?self.refresh_rate,
            "display configured"
        );

        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface_texture)?);
        self.renderer = Some(SkiaRenderer::new(size.width, size.height)?);

        if self.fullscreen {
            window.set_cursor_visible(false);
        }
        window.request_redraw();
        self.window = Some(window);

        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };
        let clock = self.session.clock();
        let scene = self.session.scene();

        let stats = renderer.render_frame(&scene, pixels.frame_mut(), clock)?;
        pixels.render()?;

        let now = clock.now();
        if let Some(previous) = self.last_frame_ns.replace(now) {
            self.frame_times.record(clock.elapsed(previous));
        }
        if stats.redrawn {
            debug!(
                draw_ms = stats.draw.as_secs_f64() * 1e3,
                copy_ms = stats.copy.as_secs_f64() * 1e3,
                ?scene,
                "scene changed"
            );
        }

        let title = self.session.title();
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command, event_loop: &ActiveEventLoop) {
        if self.session.apply(command) == Flow::Exit {
            self.cleanup_and_exit(event_loop);
        }
    }

    fn handle_key(&mut self, key: PhysicalKey, event_loop: &ActiveEventLoop) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let phase = self.session.phase();
        if let Some(command) = command_for_key(code, phase, self.session.is_confirming_ignore()) {
            self.dispatch(command, event_loop);
        }
    }

    fn handle_pointer(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(command) = command_for_pointer(self.session.phase()) {
            self.dispatch(command, event_loop);
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.current_size = Some(new_size);
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize buffer");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize renderer");
            }
        }
        debug!(width = new_size.width, height = new_size.height, "display resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(true);
        }

        let frames = self.frame_times.stats();
        if frames.samples > 0 {
            info!(
                fps = format_args!("{:.1}", frames.effective_fps),
                frame_ms = format_args!("{:.3}", frames.average_frame_time_ns / 1e6),
                jitter_ms = format_args!("{:.3}", frames.jitter_ns / 1e6),
                "display timing"
            );
        }
        self.session.log_summary();

        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!(error = %e, "failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                self.session.tick();
                if let Err(e) = self.render() {
                    error!(error = %e, "render failed");
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() && !event.repeat => {
                self.handle_key(event.physical_key, event_loop);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_pointer(event_loop),
            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                self.handle_pointer(event_loop);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
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
        }
    }
}
