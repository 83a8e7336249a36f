//! Screen-space camera for the 2D playfield

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// Camera uniform for GPU (matches WGSL `Camera`)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub point_size: f32,
    pub _padding: [f32; 3],
}

/// Orthographic camera mapping pixels to clip space.
///
/// The origin is the top-left corner of the window and y grows downward, so
/// simulation coordinates and cursor positions need no conversion.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, -1.0, 1.0)
    }

    pub fn to_uniform(&self, point_size: f32) -> CameraUniform {
        CameraUniform {
            view_proj: self.build_view_projection_matrix().to_cols_array_2d(),
            point_size,
            _padding: [0.0; 3],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }
}
