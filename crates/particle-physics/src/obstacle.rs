//! Static obstacles and their geometric predicates

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use crate::constants::DEGENERATE_AREA;

/// Obstacle outline
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleShape {
    Square = 0,
    Triangle = 1,
    Circle = 2,
}

impl ObstacleShape {
    pub const ALL: [ObstacleShape; 3] = [
        ObstacleShape::Square,
        ObstacleShape::Triangle,
        ObstacleShape::Circle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObstacleShape::Square => "Square",
            ObstacleShape::Triangle => "Triangle",
            ObstacleShape::Circle => "Circle",
        }
    }
}

/// A static blocker.
///
/// `size` is the square's side, the triangle's bounding width and height, or
/// the circle's diameter. Coordinates are screen space with y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vec2,
    pub size: f32,
    pub shape: ObstacleShape,
}

impl Obstacle {
    pub fn new(shape: ObstacleShape, position: Vec2, size: f32) -> Self {
        Self {
            position,
            size,
            shape,
        }
    }

    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// Apex above the center, base corners below it
    pub fn triangle_vertices(&self) -> [Vec2; 3] {
        let s = self.half_size();
        [
            self.position + Vec2::new(0.0, -s),
            self.position + Vec2::new(-s, s),
            self.position + Vec2::new(s, s),
        ]
    }

    /// Whether `point` lies inside the outline.
    ///
    /// Square and circle edges are exclusive, triangle edges inclusive.
    pub fn contains(&self, point: Vec2) -> bool {
        match self.shape {
            ObstacleShape::Square => inside_square(point, self.position, self.half_size()),
            ObstacleShape::Triangle => {
                let [a, b, c] = self.triangle_vertices();
                point_in_triangle(point, a, b, c)
            }
            ObstacleShape::Circle => point.distance(self.position) < self.half_size(),
        }
    }

    /// Velocity after touching this obstacle: negated when `position` is inside.
    pub fn collide(&self, position: Vec2, velocity: Vec2) -> Vec2 {
        if self.contains(position) {
            -velocity
        } else {
            velocity
        }
    }

    /// Whether this obstacle rules out placing a new obstacle of `size` at `candidate`.
    ///
    /// Squares reject candidates whose center falls inside them, circles reject
    /// any footprint overlap. Triangles never reject.
    pub fn blocks_placement(&self, candidate: Vec2, size: f32) -> bool {
        match self.shape {
            ObstacleShape::Square => inside_square(candidate, self.position, self.half_size()),
            ObstacleShape::Circle => {
                candidate.distance(self.position) < self.half_size() + size / 2.0
            }
            ObstacleShape::Triangle => false,
        }
    }
}

fn inside_square(point: Vec2, center: Vec2, half: f32) -> bool {
    let min = center - Vec2::splat(half);
    let max = center + Vec2::splat(half);
    point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
}

/// Barycentric point-in-triangle test, boundary inclusive.
///
/// A zero-area triangle contains nothing.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let area = 0.5 * (-b.y * c.x + a.y * (-b.x + c.x) + a.x * (b.y - c.y) + b.x * c.y);
    if area.abs() < DEGENERATE_AREA || !area.is_finite() {
        return false;
    }

    let inv = 1.0 / (2.0 * area);
    let s = inv * (a.y * c.x - a.x * c.y + (c.y - a.y) * p.x + (a.x - c.x) * p.y);
    let t = inv * (a.x * b.y - a.y * b.x + (a.y - b.y) * p.x + (b.x - a.x) * p.y);

    s >= 0.0 && t >= 0.0 && s + t <= 1.0
}

/// GPU-compatible obstacle record (matches WGSL `ObstacleInstance`)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObstacleInstance {
    pub center: [f32; 2],
    pub size: f32,
    pub shape: u32,
    pub color: [f32; 4],
}

impl ObstacleInstance {
    pub fn new(obstacle: &Obstacle, color: Vec4) -> Self {
        Self {
            center: obstacle.position.to_array(),
            size: obstacle.size,
            shape: obstacle.shape as u32,
            color: color.to_array(),
        }
    }
}
