use log::trace;
use rand::Rng;

use crate::error::{FlockError, Result};
use crate::random::random_between;
use crate::vector::Vector2;
use crate::Parameters;

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    id: usize,
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    params: Parameters,
}

impl Boid {
    /// Starts at `position` heading in a random direction at a speed drawn
    /// from `[1, 2)`, with no acceleration.
    pub fn new<R: Rng>(
        id: usize,
        position: Vector2,
        params: Parameters,
        rng: &mut R,
    ) -> Self {
        let speed = random_between(rng, 1.0, 2.0);
        Boid {
            id,
            position,
            velocity: Vector2::random_unit(rng, speed),
            acceleration: Vector2::ZERO,
            params,
        }
    }

    pub fn with_velocity(
        id: usize,
        position: Vector2,
        velocity: Vector2,
        params: Parameters,
    ) -> Self {
        Boid {
            id,
            position,
            velocity,
            acceleration: Vector2::ZERO,
            params,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn radius(&self) -> f32 {
        self.params.draw_radius
    }

    /// Every other boid in `population` strictly closer than `radius`, in
    /// population order. The boid itself is recognised by id.
    pub fn neighbours_within<'a>(&self, population: &'a [Boid], radius: f32) -> Vec<&'a Boid> {
        population
            .iter()
            .filter(|other| {
                other.id != self.id && other.position.distance_to(&self.position) < radius
            })
            .collect()
    }

    pub fn visible_neighbours<'a>(&self, population: &'a [Boid]) -> Vec<&'a Boid> {
        self.neighbours_within(population, self.params.visible_range)
    }

    pub fn protected_neighbours<'a>(&self, population: &'a [Boid]) -> Vec<&'a Boid> {
        self.neighbours_within(population, self.params.protected_range)
    }

    /// Steer away from boids inside the protected range. An empty set gives
    /// zero, but callers skip the rule when there is nobody to avoid.
    pub fn separation(&self, neighbours: &[&Boid]) -> Vector2 {
        let mut steering = Vector2::ZERO;
        for other in neighbours {
            steering.add(Vector2::difference(self.position, other.position));
        }
        *steering.scale(self.params.avoid_factor)
    }

    /// Steer towards the mean velocity of the visible neighbours.
    pub fn alignment(&self, neighbours: &[&Boid]) -> Result<Vector2> {
        if neighbours.is_empty() {
            return Err(FlockError::EmptyNeighbourhood { rule: "alignment" });
        }
        let mut steering = Vector2::ZERO;
        for other in neighbours {
            steering.add(other.velocity);
        }
        steering
            .divide(neighbours.len() as f32)
            .subtract(self.velocity)
            .scale(self.params.matching_factor);
        Ok(steering)
    }

    /// Steer towards the centre of mass of the visible neighbours.
    pub fn cohesion(&self, neighbours: &[&Boid]) -> Result<Vector2> {
        if neighbours.is_empty() {
            return Err(FlockError::EmptyNeighbourhood { rule: "cohesion" });
        }
        let mut steering = Vector2::ZERO;
        for other in neighbours {
            steering.add(other.position);
        }
        steering
            .divide(neighbours.len() as f32)
            .subtract(self.position)
            .scale(self.params.centering_factor);
        Ok(steering)
    }

    /// Nudge the velocity back into the world when within `margin` of an
    /// edge. Each axis and side is checked on its own, so a boid in a corner
    /// turns on both axes.
    pub fn apply_boundary_turn(&mut self, width: f32, height: f32) {
        let margin = self.params.margin;
        let turn = self.params.turn_factor;
        if self.position.x < margin {
            self.velocity.x += turn;
        }
        if self.position.x > width - margin {
            self.velocity.x -= turn;
        }
        if self.position.y < margin {
            self.velocity.y += turn;
        }
        if self.position.y > height - margin {
            self.velocity.y -= turn;
        }
    }

    /// Moves by the current velocity, then folds in the acceleration from the
    /// previous step and clamps the speed. Acceleration is cleared.
    pub fn integrate(&mut self) {
        self.position.add(self.velocity);
        self.velocity.add(self.acceleration);

        // ceiling first, then floor
        self.velocity
            .limit_magnitude(self.params.max_speed)
            .floor_magnitude(self.params.min_speed);
        self.acceleration = Vector2::ZERO;
    }

    /// Acceleration produced by the neighbours found in `population`. It only
    /// takes effect on the next call to [`Boid::integrate`].
    pub fn steering(&self, population: &[Boid]) -> Result<Vector2> {
        let mut acceleration = Vector2::ZERO;

        let protected = self.protected_neighbours(population);
        if !protected.is_empty() {
            acceleration.add(self.separation(&protected));
        }

        let visible = self.visible_neighbours(population);
        if !visible.is_empty() {
            acceleration.add(self.alignment(&visible)?);
            acceleration.add(self.cohesion(&visible)?);
        }

        trace!(
            "boid {}: {} protected, {} visible, acceleration ({:.4}, {:.4})",
            self.id,
            protected.len(),
            visible.len(),
            acceleration.x,
            acceleration.y
        );
        Ok(acceleration)
    }

    /// One full update against a population this boid is not borrowed from.
    pub fn step(&mut self, population: &[Boid]) -> Result<()> {
        self.integrate();
        self.acceleration = self.steering(population)?;
        Ok(())
    }
}
