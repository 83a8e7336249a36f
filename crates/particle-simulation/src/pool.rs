//! Fixed-capacity particle pool
//!
//! Slots are never removed: a particle expires in place when its lifetime
//! reaches zero and the slot becomes claimable again. Spawning always claims
//! the lowest-index free slot.

use glam::{Vec2, Vec4};
use particle_physics::{Collider, Particle, Vector};
use rand::Rng;

use crate::interaction::Steering;

/// Initial state handed to a freshly claimed slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSpec {
    /// Each velocity component is uniform in `[-0.5, 0.5] * speed`
    pub speed: f32,
    /// Lifetime is uniform in `[0, max_lifetime]`
    pub max_lifetime: f32,
    pub color: Vec4,
}

pub struct ParticlePool<V = Vec2> {
    slots: Vec<Particle<V>>,
}

impl<V: Vector> ParticlePool<V> {
    pub fn new(capacity: usize, color: Vec4) -> Self {
        Self {
            slots: vec![Particle::inactive(color); capacity],
        }
    }

    /// Replace every slot with `capacity` fresh inactive slots.
    ///
    /// The new storage is fully built before the old one is dropped.
    pub fn initialize(&mut self, capacity: usize, color: Vec4) {
        let slots = vec![Particle::inactive(color); capacity];
        self.slots = slots;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.is_active()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Particle::is_active)
    }

    /// Every slot, active or not, in index order
    pub fn slots(&self) -> &[Particle<V>] {
        &self.slots
    }

    /// Active particles in index order. Each call starts a fresh pass.
    pub fn active_particles(&self) -> impl Iterator<Item = &Particle<V>> + '_ {
        self.slots.iter().filter(|p| p.is_active())
    }

    /// Advance every active particle by `dt`.
    ///
    /// Per particle: steering impulse, integration, aging, then collision
    /// response against `collider`.
    pub fn tick<C>(&mut self, dt: f32, steering: Option<Steering<V>>, strength: f32, collider: &C)
    where
        C: Collider<V> + ?Sized,
    {
        for particle in self.slots.iter_mut().filter(|p| p.is_active()) {
            if let Some(steering) = &steering {
                particle.velocity += steering.impulse(particle.position, strength, dt);
            }

            particle.position += particle.velocity * dt;
            particle.age(dt);
            particle.velocity = collider.respond(particle.position, particle.velocity);
        }
    }

    /// Claim the first free slot at `position`.
    ///
    /// Returns the claimed index, or `None` when every slot is active.
    pub fn spawn<R>(&mut self, position: V, spec: &SpawnSpec, rng: &mut R) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        let index = self.slots.iter().position(|p| !p.is_active())?;

        let velocity = V::from_components(|| (rng.random::<f32>() - 0.5) * spec.speed);
        let lifetime = rng.random::<f32>() * spec.max_lifetime;

        self.slots[index] = Particle {
            position,
            velocity,
            lifetime,
            color: spec.color,
        };
        Some(index)
    }

    /// Apply `color` to every active particle
    pub fn recolor(&mut self, color: Vec4) {
        for particle in self.slots.iter_mut().filter(|p| p.is_active()) {
            particle.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionMode;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec() -> SpawnSpec {
        SpawnSpec {
            speed: 100.0,
            max_lifetime: 5.0,
            color: Vec4::ONE,
        }
    }

    /// A pool with `active` hand-placed particles, all at rest
    fn pool_with(capacity: usize, active: &[(Vec2, f32)]) -> ParticlePool {
        let mut pool = ParticlePool::new(capacity, Vec4::ONE);
        for (slot, &(position, lifetime)) in pool.slots.iter_mut().zip(active) {
            slot.position = position;
            slot.lifetime = lifetime;
        }
        pool
    }

    #[test]
    fn spawn_claims_lowest_free_slot() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = pool_with(4, &[(Vec2::ZERO, 1.0), (Vec2::ZERO, 1.0)]);
        pool.slots[0].lifetime = 0.0;

        assert_eq!(pool.spawn(Vec2::ONE, &spec(), &mut rng), Some(0));
        assert_eq!(pool.spawn(Vec2::ONE, &spec(), &mut rng), Some(2));
        assert_eq!(pool.spawn(Vec2::ONE, &spec(), &mut rng), Some(3));
    }

    #[test]
    fn spawn_draws_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = ParticlePool::<Vec2>::new(500, Vec4::ONE);
        let color = Vec4::new(0.2, 0.4, 0.6, 1.0);
        let spec = SpawnSpec {
            color,
            ..spec()
        };

        while pool.spawn(Vec2::new(3.0, 4.0), &spec, &mut rng).is_some() {}

        for p in pool.slots() {
            assert_eq!(p.position, Vec2::new(3.0, 4.0));
            assert!(p.velocity.x.abs() <= 50.0 && p.velocity.y.abs() <= 50.0);
            assert!(p.lifetime <= 5.0);
            assert_eq!(p.color, color);
        }
    }

    #[test]
    fn tick_integrates_and_ages() {
        let mut pool = pool_with(2, &[(Vec2::new(1.0, 1.0), 1.0)]);
        pool.slots[0].velocity = Vec2::new(10.0, -20.0);

        pool.tick(0.5, None, 100.0, &());

        let p = pool.slots[0];
        assert_eq!(p.position, Vec2::new(6.0, -9.0));
        assert_eq!(p.lifetime, 0.5);
        assert_eq!(p.velocity, Vec2::new(10.0, -20.0));
        // Inactive slot is untouched
        assert_eq!(pool.slots[1], Particle::inactive(Vec4::ONE));
    }

    #[test]
    fn steering_is_applied_before_integration() {
        let mut pool = pool_with(1, &[(Vec2::ZERO, 10.0)]);
        let steering = Steering {
            target: Vec2::new(0.0, 100.0),
            mode: InteractionMode::Attract,
        };

        pool.tick(0.1, Some(steering), 100.0, &());

        let p = pool.slots[0];
        assert!((p.velocity - Vec2::new(0.0, 10.0)).length() < 1e-4);
        assert!((p.position - Vec2::new(0.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn steering_at_target_leaves_velocity_alone() {
        let mut pool = pool_with(1, &[(Vec2::new(5.0, 5.0), 10.0)]);
        let steering = Steering {
            target: Vec2::new(5.0, 5.0),
            mode: InteractionMode::Repel,
        };

        pool.tick(0.1, Some(steering), 100.0, &());

        assert_eq!(pool.slots[0].velocity, Vec2::ZERO);
        assert_eq!(pool.slots[0].position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn expired_particles_leave_the_active_set() {
        let mut pool = pool_with(3, &[(Vec2::ZERO, 0.3), (Vec2::ZERO, 1.0)]);

        pool.tick(0.5, None, 0.0, &());

        assert_eq!(pool.slots[0].lifetime, 0.0);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.active_particles().count(), 1);
    }

    #[test]
    fn recolor_skips_free_slots() {
        let mut pool = pool_with(2, &[(Vec2::ZERO, 1.0)]);
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);

        pool.recolor(red);

        assert_eq!(pool.slots[0].color, red);
        assert_eq!(pool.slots[1].color, Vec4::ONE);
    }

    #[test]
    fn pool_runs_in_three_dimensions() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = ParticlePool::<Vec3>::new(8, Vec4::ONE);
        let spec = SpawnSpec {
            max_lifetime: 0.0,
            ..spec()
        };
        // Zero max lifetime spawns an already expired particle
        assert_eq!(pool.spawn(Vec3::ONE, &spec, &mut rng), Some(0));
        assert_eq!(pool.active_count(), 0);

        pool.slots[0].lifetime = 2.0;
        pool.slots[0].velocity = Vec3::new(0.0, 0.0, 4.0);
        pool.tick(0.25, None, 0.0, &());
        assert_eq!(pool.slots[0].position, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn initialize_discards_state() {
        let mut pool = pool_with(4, &[(Vec2::ONE, 1.0), (Vec2::ONE, 1.0)]);
        let tint = Vec4::new(0.0, 1.0, 0.0, 1.0);

        pool.initialize(6, tint);

        assert_eq!(pool.capacity(), 6);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.slots().iter().all(|p| p.color == tint));
    }
}
