//! Particle Sandbox
//!
//! Hold the left mouse button to spawn particles and the right one to pull
//! (or push) them towards the cursor. Obstacles are created from the settings
//! panel and bounce every particle that enters them.

mod error;
mod gui;

use error::{AppError, GpuError};
use glam::Vec2;
use gui::{Gui, UiAction, UiState};
use particle_physics::ParticleVertex;
use particle_renderer::{clear_color, Camera, ObstacleRenderer, ParticleRenderer};
use particle_simulation::{FrameInput, Simulation};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Pointer and keyboard state latched between frames
#[derive(Debug, Default)]
struct InputState {
    cursor: Vec2,
    spawn_held: bool,
    force_held: bool,
    toggle_requested: bool,
}

impl InputState {
    fn set_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.spawn_held = pressed,
            MouseButton::Right => self.force_held = pressed,
            _ => {}
        }
    }

    /// Snapshot for one tick; the toggle edge is consumed
    fn frame(&mut self, dt: f32, ui_captures_pointer: bool) -> FrameInput {
        let input = FrameInput {
            dt,
            pointer: self.cursor,
            spawn_held: self.spawn_held,
            force_held: self.force_held,
            toggle_mode: self.toggle_requested,
            ui_captures_pointer,
        };
        self.toggle_requested = false;
        input
    }
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    simulation: Simulation,
    camera: Camera,
    particle_renderer: ParticleRenderer,
    obstacle_renderer: ObstacleRenderer,
    gui: Gui,
    ui_state: UiState,
    vertices: Vec<ParticleVertex>,
    last_frame_time: Instant,
    frame_times: VecDeque<f32>,
}

impl GpuState {
    async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let simulation = Simulation::new(Vec2::new(config.width as f32, config.height as f32));
        log::info!("✓ Simulation initialized");

        let camera = Camera::new(config.width, config.height);
        let particle_renderer =
            ParticleRenderer::new(&device, config.format, simulation.pool().capacity());
        let obstacle_renderer = ObstacleRenderer::new(&device, config.format);
        log::info!("✓ Renderers initialized");

        let gui = Gui::new(&device, config.format, &window);
        let ui_state = UiState {
            params: *simulation.params(),
            ..UiState::default()
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            simulation,
            camera,
            particle_renderer,
            obstacle_renderer,
            gui,
            ui_state,
            vertices: Vec::new(),
            last_frame_time: Instant::now(),
            frame_times: VecDeque::with_capacity(100),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera.resize(new_size.width, new_size.height);
            self.simulation
                .set_bounds(Vec2::new(new_size.width as f32, new_size.height as f32));
        }
    }

    /// Push last frame's panel edits and commands into the simulation
    fn apply_ui(&mut self, input: &mut InputState) {
        let edited = self.ui_state.params;
        let current = *self.simulation.params();

        if edited.max_particles != current.max_particles {
            self.simulation.set_max_particles(edited.max_particles);
        }
        if edited.lifetime != current.lifetime {
            self.simulation.set_lifetime(edited.lifetime);
        }
        if edited.speed != current.speed {
            self.simulation.set_speed(edited.speed);
        }
        if edited.color_mode != current.color_mode {
            self.simulation.set_color_mode(edited.color_mode);
        }
        if edited.tint != current.tint {
            self.simulation.set_tint(edited.tint);
        }
        if edited.obstacle_size != current.obstacle_size {
            self.simulation.set_obstacle_size(edited.obstacle_size);
        }

        for action in std::mem::take(&mut self.ui_state.actions) {
            match action {
                UiAction::Reset(param) => self.simulation.reset(param),
                UiAction::ToggleMode => input.toggle_requested = true,
                UiAction::CreateObstacle(shape) => {
                    self.simulation.create_obstacle(shape);
                }
                UiAction::ClearObstacles => self.simulation.clear_obstacles(),
            }
        }
    }

    fn render(
        &mut self,
        window: &Window,
        input: &mut InputState,
    ) -> Result<(f32, f32), wgpu::SurfaceError> {
        // Track frame time
        let now = Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        self.frame_times.push_back(dt * 1000.0);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }
        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = 1000.0 / avg_frame_time;

        // Simulate
        self.apply_ui(input);
        let frame_input = input.frame(dt, self.gui.wants_pointer());
        self.simulation.step(&frame_input);

        self.vertices.clear();
        self.vertices
            .extend(self.simulation.active_particles().map(ParticleVertex::from));

        self.ui_state.fps = fps;
        self.ui_state.frame_time = avg_frame_time;
        self.ui_state.active_particles = self.vertices.len();
        self.ui_state.obstacle_count = self.simulation.obstacles().len();
        self.ui_state.mode = self.simulation.mode();
        self.ui_state.params = *self.simulation.params();

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.obstacle_renderer.prepare(
            &self.device,
            &self.queue,
            &self.camera,
            self.simulation.obstacles(),
        );
        self.particle_renderer
            .prepare(&self.device, &self.queue, &self.camera, &self.vertices);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Obstacles first so particles stay visible on top of them
            self.obstacle_renderer.render(&mut render_pass);
            self.particle_renderer.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        // Render GUI
        {
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("GUI Encoder"),
                });

            self.gui.render(
                &self.device,
                &self.queue,
                &mut encoder,
                window,
                &view,
                &mut self.ui_state,
            );

            self.queue.submit(std::iter::once(encoder.finish()));
        }

        output.present();
        Ok((fps, avg_frame_time))
    }
}

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    input: InputState,
    error: Option<AppError>,
}

impl App {
    fn init(event_loop: &ActiveEventLoop) -> Result<(Arc<Window>, GpuState), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Particle Sandbox")
            .with_inner_size(winit::dpi::LogicalSize::new(1920, 1080));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;
        Ok((window, gpu_state))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match Self::init(event_loop) {
            Ok((window, gpu_state)) => {
                self.window = Some(window);
                self.gpu_state = Some(gpu_state);
            }
            Err(e) => {
                log::error!("Startup failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&mut self.gpu_state, &self.window) {
            (Some(gpu_state), Some(window)) => gpu_state.gui.handle_event(window, &event),
            _ => false,
        };

        // Button releases always reach the simulation so nothing stays held
        match &event {
            WindowEvent::CursorMoved { position, .. } => {
                self.input.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                if !(pressed && consumed) {
                    self.input.set_button(*button, pressed);
                }
            }
            _ => {}
        }

        if consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyM),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.input.toggle_requested = true;
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    match gpu_state.render(window, &mut self.input) {
                        Ok((fps, frame_time)) => {
                            window.set_title(&format!(
                                "Particle Sandbox - {:.0} FPS ({:.2}ms) - {} particles",
                                fps,
                                frame_time,
                                gpu_state.ui_state.active_particles
                            ));
                        }
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.resize(window.inner_size())
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("Render error: {e}"),
                    }
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting particle sandbox...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_edge() {
        let mut input = InputState {
            toggle_requested: true,
            ..InputState::default()
        };
        assert!(input.frame(0.016, false).toggle_mode);
        assert!(!input.frame(0.016, false).toggle_mode);
    }

    #[test]
    fn buttons_map_to_spawn_and_force() {
        let mut input = InputState::default();
        input.set_button(MouseButton::Left, true);
        input.set_button(MouseButton::Right, true);
        input.set_button(MouseButton::Middle, true);
        input.cursor = Vec2::new(3.0, 4.0);

        let frame = input.frame(0.5, true);
        assert!(frame.spawn_held && frame.force_held && frame.ui_captures_pointer);
        assert_eq!(frame.pointer, Vec2::new(3.0, 4.0));

        input.set_button(MouseButton::Left, false);
        assert!(!input.frame(0.5, false).spawn_held);
    }
}
