//! # Particle Simulation Engine
//!
//! CPU simulation core for the particle sandbox: a fixed-capacity particle
//! pool, the obstacle field with randomized placement, pointer interaction,
//! and the `Simulation` context that runs one tick per frame.

pub mod interaction;
pub mod obstacles;
pub mod params;
pub mod pool;
pub mod simulation;

pub use interaction::*;
pub use obstacles::*;
pub use params::*;
pub use pool::*;
pub use simulation::*;
