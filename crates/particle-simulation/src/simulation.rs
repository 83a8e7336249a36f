//! The simulation context owned by the host
//!
//! One `step` per rendered frame: latch input, steer/integrate/age/collide the
//! pool, then spawn at most one particle. Parameter edits go through the
//! setters below and take effect on the next step.

use glam::{Vec2, Vec4};
use particle_physics::{Obstacle, ObstacleShape, Particle, SCREEN_HEIGHT, SCREEN_WIDTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::interaction::{FrameInput, InteractionController, InteractionMode};
use crate::obstacles::ObstacleField;
use crate::params::{ColorMode, Param, SimulationParams};
use crate::pool::{ParticlePool, SpawnSpec};

pub struct Simulation {
    pool: ParticlePool<Vec2>,
    obstacles: ObstacleField,
    controller: InteractionController<Vec2>,
    params: SimulationParams,
    rng: StdRng,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT))
    }
}

impl Simulation {
    pub fn new(bounds: Vec2) -> Self {
        Self::with_rng(bounds, StdRng::from_os_rng())
    }

    /// Deterministic simulation for tests and replays
    pub fn with_seed(bounds: Vec2, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: Vec2, rng: StdRng) -> Self {
        let params = SimulationParams::default();
        log::info!(
            "Initializing simulation: {} particles, {}x{} playfield",
            params.max_particles,
            bounds.x,
            bounds.y
        );
        Self {
            pool: ParticlePool::new(params.max_particles, params.tint),
            obstacles: ObstacleField::new(bounds),
            controller: InteractionController::default(),
            params,
            rng,
        }
    }

    /// Run one tick
    pub fn step(&mut self, input: &FrameInput<Vec2>) {
        let dt = input.dt.max(0.0);
        self.controller.update(input);
        let interaction = self.controller.resolve();

        self.pool
            .tick(dt, interaction.steering, self.params.speed, &self.obstacles);

        if let Some(position) = interaction.spawn_at {
            self.spawn(position);
        }
    }

    /// Request one spawn at `position`; a full pool ignores the request
    pub fn spawn(&mut self, position: Vec2) -> Option<usize> {
        let color = match self.params.color_mode {
            ColorMode::Tint => self.params.tint,
            ColorMode::Random => random_color(&mut self.rng),
        };
        let spec = SpawnSpec {
            speed: self.params.speed,
            max_lifetime: self.params.lifetime,
            color,
        };
        self.pool.spawn(position, &spec, &mut self.rng)
    }

    // Queries

    pub fn active_particles(&self) -> impl Iterator<Item = &Particle<Vec2>> + '_ {
        self.pool.active_particles()
    }

    pub fn pool(&self) -> &ParticlePool<Vec2> {
        &self.pool
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.obstacles.obstacles()
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn mode(&self) -> InteractionMode {
        self.controller.mode()
    }

    pub fn bounds(&self) -> Vec2 {
        self.obstacles.bounds()
    }

    // Configuration

    /// Reallocate the pool; every particle is discarded
    pub fn set_max_particles(&mut self, capacity: usize) {
        self.params.max_particles = capacity;
        self.pool.initialize(capacity, self.params.tint);
        log::info!("Max particles changed to {capacity}");
    }

    /// Affects future spawns only
    pub fn set_lifetime(&mut self, lifetime: f32) {
        self.params.lifetime = lifetime.max(0.0);
        log::info!("Lifetime changed to {}", self.params.lifetime);
    }

    /// Affects future spawns and steering strength
    pub fn set_speed(&mut self, speed: f32) {
        self.params.speed = speed.max(0.0);
        log::info!("Speed changed to {}", self.params.speed);
    }

    /// In tint mode, active particles are recolored immediately
    pub fn set_tint(&mut self, tint: Vec4) {
        self.params.tint = tint;
        if self.params.color_mode == ColorMode::Tint {
            self.pool.recolor(tint);
        }
        log::debug!("Tint changed to {tint}");
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.params.color_mode = mode;
        if mode == ColorMode::Tint {
            self.pool.recolor(self.params.tint);
        }
        log::info!("Color mode changed to {mode:?}");
    }

    /// Used by the next obstacle creation
    pub fn set_obstacle_size(&mut self, size: f32) {
        self.params.obstacle_size = size.max(0.0);
        log::info!("Obstacle size changed to {}", self.params.obstacle_size);
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.controller.set_mode(mode);
        log::info!("Interaction mode: {}", mode.name());
    }

    pub fn toggle_mode(&mut self) -> InteractionMode {
        let mode = self.controller.toggle_mode();
        log::info!("Interaction mode: {}", mode.name());
        mode
    }

    /// Restore a parameter to its default, with the same side effects as its setter
    pub fn reset(&mut self, param: Param) {
        let mut defaults = self.params;
        defaults.reset(param);
        match param {
            Param::MaxParticles => self.set_max_particles(defaults.max_particles),
            Param::Lifetime => self.set_lifetime(defaults.lifetime),
            Param::Speed => self.set_speed(defaults.speed),
            Param::Tint => self.set_tint(defaults.tint),
            Param::ObstacleSize => self.set_obstacle_size(defaults.obstacle_size),
            Param::ColorMode => self.set_color_mode(defaults.color_mode),
        }
    }

    /// Playfield extent used for obstacle placement
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.obstacles.set_bounds(bounds);
    }

    // Obstacles

    /// Place and append an obstacle of the configured size
    pub fn create_obstacle(&mut self, shape: ObstacleShape) -> Obstacle {
        self.obstacles
            .create(shape, self.params.obstacle_size, &mut self.rng)
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Vec4 {
    Vec4::new(rng.random(), rng.random(), rng.random(), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> Simulation {
        Simulation::with_seed(Vec2::new(1920.0, 1080.0), 42)
    }

    fn spawn_input(pointer: Vec2) -> FrameInput {
        FrameInput {
            pointer,
            spawn_held: true,
            ..FrameInput::idle(0.0)
        }
    }

    #[test]
    fn one_spawn_per_step() {
        let mut s = sim();
        s.step(&spawn_input(Vec2::new(10.0, 10.0)));
        s.step(&spawn_input(Vec2::new(10.0, 10.0)));
        // dt = 0 so nothing can have aged, but a zero lifetime draw is possible
        assert!(s.pool().active_count() <= 2);
        assert_eq!(
            s.pool()
                .slots()
                .iter()
                .filter(|p| p.position == Vec2::new(10.0, 10.0))
                .count(),
            2
        );
    }

    #[test]
    fn spawn_happens_after_the_tick() {
        let mut s = sim();
        s.step(&FrameInput {
            dt: 0.5,
            ..spawn_input(Vec2::new(100.0, 100.0))
        });
        // The fresh particle was not integrated in the tick that spawned it
        assert_eq!(s.pool().slots()[0].position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn random_color_mode_keeps_colors_on_tint_change() {
        let mut s = sim();
        s.set_color_mode(ColorMode::Random);
        s.spawn(Vec2::ZERO);
        s.pool.recolor(Vec4::new(0.5, 0.5, 0.5, 1.0));

        s.set_tint(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(s.pool().slots()[0].color, Vec4::new(0.5, 0.5, 0.5, 1.0));

        s.set_color_mode(ColorMode::Tint);
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(s.active_particles().all(|p| p.color == red));
    }

    #[test]
    fn tint_applies_to_active_and_future_particles() {
        let mut s = sim();
        s.spawn(Vec2::ZERO);
        let green = Vec4::new(0.0, 1.0, 0.0, 1.0);
        s.set_tint(green);
        assert!(s.active_particles().all(|p| p.color == green));

        s.spawn(Vec2::ONE);
        assert_eq!(s.pool().slots()[1].color, green);
    }

    #[test]
    fn negative_dt_is_treated_as_zero() {
        let mut s = sim();
        s.spawn(Vec2::ZERO);
        let before = s.pool().slots()[0];
        s.step(&FrameInput::idle(-1.0));
        assert_eq!(s.pool().slots()[0], before);
    }
}
