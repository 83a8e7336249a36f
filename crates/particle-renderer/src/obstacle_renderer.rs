//! Obstacle rendering

use glam::Vec4;
use particle_physics::{Obstacle, ObstacleInstance, ObstacleShape, CIRCLE_SEGMENTS};

use crate::camera::Camera;
use crate::renderer::{camera_buffer, instanced_pipeline, srgb_to_linear, InstanceBuffer};

/// Vertices issued per obstacle; enough for a full circle fan
pub const OBSTACLE_VERTICES: u32 = 3 * CIRCLE_SEGMENTS;

/// Fill color for an obstacle shape, from the Catppuccin Mocha palette
pub fn obstacle_color(shape: ObstacleShape) -> Vec4 {
    let colors = &catppuccin::PALETTE.mocha.colors;
    let rgb = match shape {
        ObstacleShape::Square => colors.blue.rgb,
        ObstacleShape::Triangle => colors.green.rgb,
        ObstacleShape::Circle => colors.peach.rgb,
    };
    Vec4::new(
        srgb_to_linear(rgb.r) as f32,
        srgb_to_linear(rgb.g) as f32,
        srgb_to_linear(rgb.b) as f32,
        1.0,
    )
}

pub struct ObstacleRenderer {
    render_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    instances: InstanceBuffer,
    bind_group: Option<wgpu::BindGroup>,
    count: u32,
}

impl ObstacleRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Obstacle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/obstacle.wgsl").into()),
        });
        let (render_pipeline, bind_group_layout) =
            instanced_pipeline(device, format, "Obstacle Render Pipeline", &shader);

        Self {
            render_pipeline,
            bind_group_layout,
            camera_buffer: camera_buffer(device, "Obstacle Camera Buffer"),
            instances: InstanceBuffer::new(
                device,
                "Obstacle Buffer",
                std::mem::size_of::<ObstacleInstance>(),
                16,
            ),
            bind_group: None,
            count: 0,
        }
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        obstacles: &[Obstacle],
    ) {
        let instances: Vec<ObstacleInstance> = obstacles
            .iter()
            .map(|o| ObstacleInstance::new(o, obstacle_color(o.shape)))
            .collect();

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform(0.0)]),
        );
        self.instances
            .write(device, queue, bytemuck::cast_slice(&instances));
        self.count = instances.len() as u32;

        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Obstacle Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.instances.buffer().as_entire_binding(),
                },
            ],
        }));
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let Some(bind_group) = &self.bind_group else {
            return;
        };
        if self.count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.draw(0..OBSTACLE_VERTICES, 0..self.count);
    }
}
