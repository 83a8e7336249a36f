use egui::Context;
use egui_wgpu::Renderer;
use egui_winit::State;
use glam::Vec4;
use particle_physics::ObstacleShape;
use particle_simulation::{
    ColorMode, InteractionMode, Param, SimulationParams, LIFETIME_RANGE, MAX_PARTICLES_RANGE,
    OBSTACLE_SIZE_RANGE, SPEED_RANGE,
};
use wgpu::{Device, TextureFormat};
use winit::{event::WindowEvent, window::Window};

/// One-shot commands raised by the settings panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    Reset(Param),
    ToggleMode,
    CreateObstacle(ObstacleShape),
    ClearObstacles,
}

/// Data shared between the host and the panel for one frame.
///
/// `params` is an editable copy; the host diffs it against the simulation
/// after the panel has run and applies whatever changed.
pub struct UiState {
    pub fps: f32,
    pub frame_time: f32,
    pub active_particles: usize,
    pub obstacle_count: usize,
    pub mode: InteractionMode,
    pub params: SimulationParams,
    pub actions: Vec<UiAction>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: 0.0,
            active_particles: 0,
            obstacle_count: 0,
            mode: InteractionMode::default(),
            params: SimulationParams::default(),
            actions: Vec::new(),
        }
    }
}

pub struct Gui {
    context: Context,
    state: State,
    renderer: Renderer,
}

impl Gui {
    pub fn new(device: &Device, output_color_format: TextureFormat, window: &Window) -> Self {
        let context = Context::default();
        let id = context.viewport_id();

        let state = State::new(
            context.clone(),
            id,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );

        let renderer = Renderer::new(
            device,
            output_color_format,
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            context,
            state,
            renderer,
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    /// The panel is under the pointer or being dragged
    pub fn wants_pointer(&self) -> bool {
        self.context.wants_pointer_input() || self.context.is_pointer_over_area()
    }

    pub fn render(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        ui_state: &mut UiState,
    ) {
        let raw_input = self.state.take_egui_input(window);

        let full_output = self.context.run(raw_input, |ctx| {
            settings_panel(ctx, ui_state);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let size = window.inner_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Egui Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // egui-wgpu wants a 'static pass
        let mut render_pass = render_pass.forget_lifetime();
        self.renderer
            .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        drop(render_pass);

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn reset_button(ui: &mut egui::Ui, actions: &mut Vec<UiAction>, param: Param) {
    if ui.small_button("Reset").clicked() {
        actions.push(UiAction::Reset(param));
    }
}

fn settings_panel(ctx: &Context, state: &mut UiState) {
    let UiState {
        fps,
        frame_time,
        active_particles,
        obstacle_count,
        mode,
        params,
        actions,
    } = state;

    egui::Window::new("Settings")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.heading("Particles");
            ui.horizontal(|ui| {
                ui.add(
                    egui::Slider::new(&mut params.max_particles, MAX_PARTICLES_RANGE)
                        .text("Max Particles"),
                );
                reset_button(ui, actions, Param::MaxParticles);
            });
            ui.horizontal(|ui| {
                ui.add(egui::Slider::new(&mut params.lifetime, LIFETIME_RANGE).text("Lifetime"));
                reset_button(ui, actions, Param::Lifetime);
            });
            ui.horizontal(|ui| {
                ui.add(egui::Slider::new(&mut params.speed, SPEED_RANGE).text("Speed"));
                reset_button(ui, actions, Param::Speed);
            });

            ui.separator();
            ui.heading("Color");
            ui.horizontal(|ui| {
                ui.selectable_value(&mut params.color_mode, ColorMode::Tint, "Tint");
                ui.selectable_value(&mut params.color_mode, ColorMode::Random, "Random");
                reset_button(ui, actions, Param::ColorMode);
            });
            ui.horizontal(|ui| {
                let mut rgba = params.tint.to_array();
                ui.label("Tint");
                if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
                    params.tint = Vec4::from_array(rgba);
                }
                reset_button(ui, actions, Param::Tint);
            });

            ui.separator();
            ui.heading("Interaction");
            let label = format!("Mode: {} (M to toggle)", mode.name());
            if ui.button(label).clicked() {
                actions.push(UiAction::ToggleMode);
            }

            ui.separator();
            ui.heading("Obstacles");
            ui.horizontal(|ui| {
                ui.add(
                    egui::Slider::new(&mut params.obstacle_size, OBSTACLE_SIZE_RANGE)
                        .text("Obstacle Size"),
                );
                reset_button(ui, actions, Param::ObstacleSize);
            });
            ui.horizontal(|ui| {
                for shape in ObstacleShape::ALL {
                    if ui.button(format!("Create {}", shape.name())).clicked() {
                        actions.push(UiAction::CreateObstacle(shape));
                    }
                }
            });
            if ui.button("Delete All Obstacles").clicked() {
                actions.push(UiAction::ClearObstacles);
            }
        });

    egui::Window::new("Statistics")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.label(format!("FPS: {fps:.1}"));
            ui.label(format!("Frame Time: {frame_time:.2} ms"));
            ui.separator();
            ui.label(format!(
                "Particles: {active_particles} / {}",
                params.max_particles
            ));
            ui.label(format!("Obstacles: {obstacle_count}"));
        });
}
