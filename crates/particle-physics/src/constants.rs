//! Default tunables and fixed limits for the particle sandbox
//!
//! Distances are in screen pixels, times in seconds.

/// Default playfield width
pub const SCREEN_WIDTH: f32 = 1920.0;

/// Default playfield height
pub const SCREEN_HEIGHT: f32 = 1080.0;

/// Default pool capacity
pub const DEFAULT_MAX_PARTICLES: usize = 2000;

/// Upper bound offered by the settings panel
pub const MAX_PARTICLES_LIMIT: usize = 2000;

/// Default upper bound for a spawned particle's lifetime
pub const DEFAULT_LIFETIME: f32 = 5.0;

/// Default spawn speed, also the steering strength
pub const DEFAULT_SPEED: f32 = 100.0;

/// Default edge length / diameter for newly created obstacles
pub const DEFAULT_OBSTACLE_SIZE: f32 = 200.0;

/// Default global tint (opaque white)
pub const DEFAULT_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Rejection-sampling budget for obstacle placement
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// On-screen edge length of a particle quad
pub const PARTICLE_POINT_SIZE: f32 = 5.0;

/// Segments used to tessellate circle obstacles
pub const CIRCLE_SEGMENTS: u32 = 20;

/// Below this absolute area a triangle is treated as degenerate
pub const DEGENERATE_AREA: f32 = 1e-6;
