//! Collision response seam between particles and whatever they bounce off

use glam::Vec2;

use crate::obstacle::Obstacle;
use crate::particle::Vector;

/// Anything a particle can collide with.
pub trait Collider<V: Vector> {
    /// Velocity after responding to every overlapping body at `position`.
    fn respond(&self, position: V, velocity: V) -> V;
}

/// No collision; the 3D sandbox uses this.
impl<V: Vector> Collider<V> for () {
    fn respond(&self, _position: V, velocity: V) -> V {
        velocity
    }
}

impl Collider<Vec2> for Obstacle {
    fn respond(&self, position: Vec2, velocity: Vec2) -> Vec2 {
        self.collide(position, velocity)
    }
}

/// Every obstacle is visited in order; overlapping obstacles each flip the
/// velocity, so two overlaps cancel out.
impl Collider<Vec2> for [Obstacle] {
    fn respond(&self, position: Vec2, velocity: Vec2) -> Vec2 {
        self.iter()
            .fold(velocity, |v, obstacle| obstacle.collide(position, v))
    }
}
