pub mod boids;
pub mod config;
pub mod error;
pub mod flock;
pub mod random;
pub mod render;
pub mod vector;

use serde::{Deserialize, Serialize};

pub use boids::Boid;
pub use error::{FlockError, Result};
pub use flock::{Flock, FrameStats, UpdateMode};
pub use vector::Vector2;

/// Per-boid tuning, fixed once the boid is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub max_speed: f32,
    pub min_speed: f32,
    /// Distance from each world edge at which boids start turning back.
    pub margin: f32,
    pub visible_range: f32,
    pub protected_range: f32,
    pub avoid_factor: f32,
    pub matching_factor: f32,
    pub centering_factor: f32,
    pub turn_factor: f32,
    /// Drawing size only; the movement rules never look at it.
    pub draw_radius: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            max_speed: 3.0,
            min_speed: 2.0,
            margin: 50.0,
            visible_range: 75.0,
            protected_range: 10.0,
            avoid_factor: 0.05,
            matching_factor: 0.05,
            centering_factor: 0.0005,
            turn_factor: 0.2,
            draw_radius: 15.0,
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("max_speed", self.max_speed),
            ("min_speed", self.min_speed),
            ("margin", self.margin),
            ("visible_range", self.visible_range),
            ("protected_range", self.protected_range),
            ("avoid_factor", self.avoid_factor),
            ("matching_factor", self.matching_factor),
            ("centering_factor", self.centering_factor),
            ("turn_factor", self.turn_factor),
            ("draw_radius", self.draw_radius),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(FlockError::InvalidParameter {
                    name,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        // the floor runs after the ceiling, so both only hold when min <= max
        if self.min_speed > self.max_speed {
            return Err(FlockError::InvalidParameter {
                name: "min_speed",
                reason: format!(
                    "{} is above max_speed {}",
                    self.min_speed, self.max_speed
                ),
            });
        }
        Ok(())
    }
}
