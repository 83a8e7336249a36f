//! Pointer-driven steering and spawning

use glam::Vec2;
use particle_physics::Vector;

/// Direction of the steering impulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Particles are pushed towards the target
    #[default]
    Attract,
    /// Particles are pushed away from the target
    Repel,
}

impl InteractionMode {
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Attract => InteractionMode::Repel,
            InteractionMode::Repel => InteractionMode::Attract,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InteractionMode::Attract => "Attract",
            InteractionMode::Repel => "Repel",
        }
    }
}

/// A steering request applied to every active particle for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering<V = Vec2> {
    pub target: V,
    pub mode: InteractionMode,
}

impl<V: Vector> Steering<V> {
    /// Velocity change for a particle at `position`.
    ///
    /// Zero when the particle already sits on the target.
    pub fn impulse(&self, position: V, strength: f32, dt: f32) -> V {
        let direction = match self.mode {
            InteractionMode::Attract => self.target - position,
            InteractionMode::Repel => position - self.target,
        };
        let length = direction.length();
        if length > 0.0 {
            direction * (strength * dt / length)
        } else {
            V::ZERO
        }
    }
}

/// What the pool should do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction<V = Vec2> {
    pub steering: Option<Steering<V>>,
    pub spawn_at: Option<V>,
}

impl<V> Interaction<V> {
    pub fn none() -> Self {
        Self {
            steering: None,
            spawn_at: None,
        }
    }
}

/// Host input sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput<V = Vec2> {
    /// Elapsed seconds since the previous tick
    pub dt: f32,
    /// Pointer in simulation coordinates
    pub pointer: V,
    /// Primary button held: spawn
    pub spawn_held: bool,
    /// Secondary button held: steering force
    pub force_held: bool,
    /// Mode toggle fired since the previous tick
    pub toggle_mode: bool,
    /// The UI owns the pointer; spawning is vetoed
    pub ui_captures_pointer: bool,
}

impl<V: Vector> FrameInput<V> {
    /// A tick with no pointer activity
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            pointer: V::ZERO,
            spawn_held: false,
            force_held: false,
            toggle_mode: false,
            ui_captures_pointer: false,
        }
    }
}

/// Translates pointer state into steering and spawn requests.
#[derive(Debug, Clone, Copy)]
pub struct InteractionController<V = Vec2> {
    target: V,
    spawn_held: bool,
    force_held: bool,
    spawn_vetoed: bool,
    mode: InteractionMode,
}

impl<V: Vector> Default for InteractionController<V> {
    fn default() -> Self {
        Self::new(InteractionMode::default())
    }
}

impl<V: Vector> InteractionController<V> {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            target: V::ZERO,
            spawn_held: false,
            force_held: false,
            spawn_vetoed: false,
            mode,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> InteractionMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn target(&self) -> V {
        self.target
    }

    /// Latch a frame's input. A mode toggle is applied here, before resolving.
    pub fn update(&mut self, input: &FrameInput<V>) {
        self.target = input.pointer;
        self.spawn_held = input.spawn_held;
        self.force_held = input.force_held;
        self.spawn_vetoed = input.ui_captures_pointer;
        if input.toggle_mode {
            let mode = self.toggle_mode();
            log::info!("Interaction mode: {}", mode.name());
        }
    }

    /// Steering and spawn requests implied by the latched state
    pub fn resolve(&self) -> Interaction<V> {
        Interaction {
            steering: self.force_held.then_some(Steering {
                target: self.target,
                mode: self.mode,
            }),
            spawn_at: (self.spawn_held && !self.spawn_vetoed).then_some(self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn input(pointer: Vec2) -> FrameInput {
        FrameInput {
            pointer,
            ..FrameInput::idle(0.016)
        }
    }

    #[test]
    fn attract_points_at_target_with_configured_magnitude() {
        let s = Steering {
            target: Vec2::new(10.0, 0.0),
            mode: InteractionMode::Attract,
        };
        let dv = s.impulse(Vec2::ZERO, 100.0, 0.5);
        assert!((dv - Vec2::new(50.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn repel_points_away_from_target() {
        let s = Steering {
            target: Vec3::ZERO,
            mode: InteractionMode::Repel,
        };
        let dv = s.impulse(Vec3::new(0.0, 0.0, -3.0), 10.0, 1.0);
        assert!((dv - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-4);
    }

    #[test]
    fn impulse_is_zero_on_target() {
        let s = Steering {
            target: Vec2::new(4.0, 4.0),
            mode: InteractionMode::Attract,
        };
        let dv = s.impulse(Vec2::new(4.0, 4.0), 100.0, 1.0);
        assert_eq!(dv, Vec2::ZERO);
        assert!(dv.is_finite());
    }

    #[test]
    fn buttons_map_to_requests() {
        let mut c = InteractionController::default();
        c.update(&input(Vec2::new(5.0, 6.0)));
        assert_eq!(c.resolve(), Interaction::none());

        c.update(&FrameInput {
            spawn_held: true,
            force_held: true,
            ..input(Vec2::new(5.0, 6.0))
        });
        let i = c.resolve();
        assert_eq!(i.spawn_at, Some(Vec2::new(5.0, 6.0)));
        assert_eq!(
            i.steering,
            Some(Steering {
                target: Vec2::new(5.0, 6.0),
                mode: InteractionMode::Attract
            })
        );
    }

    #[test]
    fn ui_capture_vetoes_spawn_but_not_force() {
        let mut c = InteractionController::default();
        c.update(&FrameInput {
            spawn_held: true,
            force_held: true,
            ui_captures_pointer: true,
            ..input(Vec2::ONE)
        });
        let i = c.resolve();
        assert_eq!(i.spawn_at, None);
        assert!(i.steering.is_some());
    }

    #[test]
    fn toggle_is_applied_before_resolve() {
        let mut c = InteractionController::default();
        c.update(&FrameInput {
            force_held: true,
            toggle_mode: true,
            ..input(Vec2::ZERO)
        });
        assert_eq!(c.mode(), InteractionMode::Repel);
        assert_eq!(c.resolve().steering.map(|s| s.mode), Some(InteractionMode::Repel));

        // Held state is not an edge: no further toggles
        c.update(&FrameInput {
            force_held: true,
            ..input(Vec2::ZERO)
        });
        assert_eq!(c.mode(), InteractionMode::Repel);
    }
}
