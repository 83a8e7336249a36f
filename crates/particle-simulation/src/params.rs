//! Runtime-tunable simulation parameters

use std::ops::RangeInclusive;

use glam::Vec4;
use particle_physics::{
    DEFAULT_LIFETIME, DEFAULT_MAX_PARTICLES, DEFAULT_OBSTACLE_SIZE, DEFAULT_SPEED, DEFAULT_TINT,
    MAX_PARTICLES_LIMIT,
};

/// Slider ranges offered by the settings panel
pub const MAX_PARTICLES_RANGE: RangeInclusive<usize> = 1..=MAX_PARTICLES_LIMIT;
pub const LIFETIME_RANGE: RangeInclusive<f32> = 0.1..=20.0;
pub const SPEED_RANGE: RangeInclusive<f32> = 0.1..=500.0;
pub const OBSTACLE_SIZE_RANGE: RangeInclusive<f32> = 100.0..=1000.0;

/// How freshly spawned particles are colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Every particle shares the global tint
    #[default]
    Tint,
    /// Each spawn draws its own opaque color
    Random,
}

/// A single tunable, used for reset-to-default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    MaxParticles,
    Lifetime,
    Speed,
    Tint,
    ObstacleSize,
    ColorMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Pool capacity
    pub max_particles: usize,
    /// Upper bound of a spawned particle's lifetime (seconds)
    pub lifetime: f32,
    /// Spawn speed and steering strength (pixels per second)
    pub speed: f32,
    pub tint: Vec4,
    /// Size used by the next obstacle creation
    pub obstacle_size: f32,
    pub color_mode: ColorMode,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            lifetime: DEFAULT_LIFETIME,
            speed: DEFAULT_SPEED,
            tint: Vec4::from_array(DEFAULT_TINT),
            obstacle_size: DEFAULT_OBSTACLE_SIZE,
            color_mode: ColorMode::default(),
        }
    }
}

impl SimulationParams {
    /// Restore one parameter to its default value
    pub fn reset(&mut self, param: Param) {
        let defaults = Self::default();
        match param {
            Param::MaxParticles => self.max_particles = defaults.max_particles,
            Param::Lifetime => self.lifetime = defaults.lifetime,
            Param::Speed => self.speed = defaults.speed,
            Param::Tint => self.tint = defaults.tint,
            Param::ObstacleSize => self.obstacle_size = defaults.obstacle_size,
            Param::ColorMode => self.color_mode = defaults.color_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sit_inside_slider_ranges() {
        let p = SimulationParams::default();
        assert!(MAX_PARTICLES_RANGE.contains(&p.max_particles));
        assert!(LIFETIME_RANGE.contains(&p.lifetime));
        assert!(SPEED_RANGE.contains(&p.speed));
        assert!(OBSTACLE_SIZE_RANGE.contains(&p.obstacle_size));
    }

    #[test]
    fn reset_touches_only_the_named_param() {
        let mut p = SimulationParams {
            max_particles: 10,
            lifetime: 1.0,
            speed: 2.0,
            tint: Vec4::new(1.0, 0.0, 0.0, 1.0),
            obstacle_size: 300.0,
            color_mode: ColorMode::Random,
        };

        p.reset(Param::Speed);
        assert_eq!(p.speed, DEFAULT_SPEED);
        assert_eq!(p.lifetime, 1.0);
        assert_eq!(p.max_particles, 10);

        p.reset(Param::MaxParticles);
        p.reset(Param::Lifetime);
        p.reset(Param::Tint);
        p.reset(Param::ObstacleSize);
        p.reset(Param::ColorMode);
        assert_eq!(p, SimulationParams::default());
    }
}
