//! # Particle Physics
//!
//! Value types and pure geometry for the particle sandbox: particles in 2D or
//! 3D, static obstacles, their shape predicates and collision response.

pub mod collision;
pub mod constants;
pub mod obstacle;
pub mod particle;

pub use collision::*;
pub use constants::*;
pub use obstacle::*;
pub use particle::*;
