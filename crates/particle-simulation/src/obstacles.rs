//! The obstacle field: an append-only list of static obstacles plus
//! randomized placement.

use glam::Vec2;
use particle_physics::{Collider, Obstacle, ObstacleShape, PLACEMENT_ATTEMPTS};
use rand::Rng;

pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    /// Playfield extent used for placement
    bounds: Vec2,
}

impl ObstacleField {
    pub fn new(bounds: Vec2) -> Self {
        Self {
            obstacles: Vec::new(),
            bounds,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Append an obstacle as-is
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Place a new obstacle of `shape` and `size` and append it
    pub fn create<R>(&mut self, shape: ObstacleShape, size: f32, rng: &mut R) -> Obstacle
    where
        R: Rng + ?Sized,
    {
        let position = self.find_valid_placement(size, rng);
        let obstacle = Obstacle::new(shape, position, size);
        self.obstacles.push(obstacle);
        log::info!(
            "{} created at: {:.1}, {:.1}",
            shape.name(),
            position.x,
            position.y
        );
        obstacle
    }

    pub fn clear(&mut self) {
        let removed = self.obstacles.len();
        self.obstacles.clear();
        log::info!("All obstacles deleted ({removed})");
    }

    /// Rejection-sample a center for a new obstacle of `size`.
    ///
    /// Candidates keep the whole footprint on the playfield. Existing squares
    /// and circles can reject a candidate, triangles never do. After
    /// `PLACEMENT_ATTEMPTS` rejections the last candidate is returned anyway.
    pub fn find_valid_placement<R>(&self, size: f32, rng: &mut R) -> Vec2
    where
        R: Rng + ?Sized,
    {
        let half = size / 2.0;
        let mut candidate = self.sample_candidate(half, rng);

        for attempt in 1..=PLACEMENT_ATTEMPTS {
            if !self
                .obstacles
                .iter()
                .any(|o| o.blocks_placement(candidate, size))
            {
                return candidate;
            }
            if attempt < PLACEMENT_ATTEMPTS {
                candidate = self.sample_candidate(half, rng);
            }
        }

        log::debug!(
            "No free spot for size {size} after {PLACEMENT_ATTEMPTS} attempts, placing at {candidate}"
        );
        candidate
    }

    fn sample_candidate<R>(&self, half: f32, rng: &mut R) -> Vec2
    where
        R: Rng + ?Sized,
    {
        let x = sample_axis(half, self.bounds.x, rng);
        let y = sample_axis(half, self.bounds.y, rng);
        Vec2::new(x, y)
    }
}

/// Uniform in `[half, extent - half]`, collapsing to the middle when the
/// footprint is wider than the extent
fn sample_axis<R: Rng + ?Sized>(half: f32, extent: f32, rng: &mut R) -> f32 {
    let min = half;
    let max = extent - half;
    if max <= min {
        return extent / 2.0;
    }
    min + rng.random::<f32>() * (max - min)
}

impl Collider<Vec2> for ObstacleField {
    fn respond(&self, position: Vec2, velocity: Vec2) -> Vec2 {
        self.obstacles.as_slice().respond(position, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn create_appends_in_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = ObstacleField::new(Vec2::new(1920.0, 1080.0));

        let a = field.create(ObstacleShape::Square, 100.0, &mut rng);
        let b = field.create(ObstacleShape::Circle, 150.0, &mut rng);

        assert_eq!(field.obstacles(), &[a, b]);
        assert_eq!(b.size, 150.0);
        assert_eq!(b.shape, ObstacleShape::Circle);
    }

    #[test]
    fn oversized_footprint_collapses_to_center() {
        let mut rng = StdRng::seed_from_u64(5);
        let field = ObstacleField::new(Vec2::new(400.0, 300.0));

        let p = field.find_valid_placement(350.0, &mut rng);

        assert_eq!(p.y, 150.0);
        assert!(p.x >= 175.0 && p.x <= 225.0);
    }

    #[test]
    fn rejection_avoids_existing_circle() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut field = ObstacleField::new(Vec2::new(1000.0, 1000.0));
        field.push(Obstacle::new(
            ObstacleShape::Circle,
            Vec2::new(250.0, 500.0),
            300.0,
        ));

        for _ in 0..50 {
            let p = field.find_valid_placement(100.0, &mut rng);
            assert!(p.distance(Vec2::new(250.0, 500.0)) >= 200.0);
        }
    }

    #[test]
    fn field_collides_like_its_obstacles() {
        let mut field = ObstacleField::new(Vec2::new(1000.0, 1000.0));
        let p = Vec2::new(100.0, 100.0);
        let v = Vec2::new(1.0, 0.0);
        assert_eq!(field.respond(p, v), v);

        field.push(Obstacle::new(ObstacleShape::Circle, p, 10.0));
        assert_eq!(field.respond(p, v), -v);
    }
}
