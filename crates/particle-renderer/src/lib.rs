//! # Particle Renderer
//!
//! wgpu pipelines for the sandbox: obstacles as filled shapes and particles as
//! point quads, both drawn into a render pass supplied by the host.

pub mod camera;
pub mod obstacle_renderer;
pub mod renderer;

pub use camera::*;
pub use obstacle_renderer::*;
pub use renderer::*;
