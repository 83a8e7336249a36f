//! Particle state and GPU vertex layout

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Vector space a particle lives in.
///
/// Implemented for `Vec2` (the interactive sandbox) and `Vec3`.
pub trait Vector:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Neg<Output = Self>
    + AddAssign
{
    const ZERO: Self;

    fn length(self) -> f32;

    /// Build a vector by drawing each component from `component` in axis order.
    fn from_components(component: impl FnMut() -> f32) -> Self;
}

impl Vector for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    fn length(self) -> f32 {
        Vec2::length(self)
    }

    fn from_components(mut component: impl FnMut() -> f32) -> Self {
        let x = component();
        let y = component();
        Vec2::new(x, y)
    }
}

impl Vector for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    fn length(self) -> f32 {
        Vec3::length(self)
    }

    fn from_components(mut component: impl FnMut() -> f32) -> Self {
        let x = component();
        let y = component();
        let z = component();
        Vec3::new(x, y, z)
    }
}

/// One pool slot.
///
/// A slot is active while `lifetime > 0.0`; an expired slot is free for reuse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle<V = Vec2> {
    pub position: V,
    pub velocity: V,
    /// Remaining lifetime in seconds, never negative
    pub lifetime: f32,
    pub color: Vec4,
}

impl<V: Vector> Particle<V> {
    /// A free slot carrying the given color
    pub fn inactive(color: Vec4) -> Self {
        Self {
            position: V::ZERO,
            velocity: V::ZERO,
            lifetime: 0.0,
            color,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Count down the remaining lifetime, clamping at zero
    pub fn age(&mut self, dt: f32) {
        self.lifetime = (self.lifetime - dt).max(0.0);
    }
}

/// GPU-compatible particle record (matches WGSL `ParticleVertex`)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 2],
    pub _padding: [f32; 2],
    pub color: [f32; 4],
}

impl From<&Particle<Vec2>> for ParticleVertex {
    fn from(particle: &Particle<Vec2>) -> Self {
        Self {
            position: particle.position.to_array(),
            _padding: [0.0; 2],
            color: particle.color.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_slot_is_not_active() {
        let p = Particle::<Vec2>::inactive(Vec4::ONE);
        assert!(!p.is_active());
        assert_eq!(p.position, Vec2::ZERO);
        assert_eq!(p.color, Vec4::ONE);
    }

    #[test]
    fn age_clamps_to_zero() {
        let mut p = Particle::<Vec3>::inactive(Vec4::ONE);
        p.lifetime = 0.25;
        p.age(0.1);
        assert!((p.lifetime - 0.15).abs() < 1e-6);
        p.age(1.0);
        assert_eq!(p.lifetime, 0.0);
        assert!(!p.is_active());
    }

    #[test]
    fn components_are_drawn_in_axis_order() {
        let mut next = 0.0;
        let v = Vec3::from_components(|| {
            next += 1.0;
            next
        });
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn vertex_layout() {
        assert_eq!(std::mem::size_of::<ParticleVertex>(), 32);
    }
}
