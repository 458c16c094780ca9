use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::boids::Boid;
use crate::error::{FlockError, Result};
use crate::random::random_between;
use crate::vector::Vector2;
use crate::Parameters;

/// Half the side of the square, centred on the world, that boids spawn in.
const SPAWN_SPREAD: f32 = 100.0;

/// How a frame walks the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Boids update one after another in population order, and each one sees
    /// the boids before it already moved this frame.
    #[default]
    Sequential,
    /// Every boid updates in parallel against a snapshot taken before the
    /// frame. Order independent, but the flock behaves differently from
    /// sequential mode.
    Synchronized,
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(UpdateMode::Sequential),
            "synchronized" | "synchronised" => Ok(UpdateMode::Synchronized),
            other => Err(format!(
                "unknown update mode `{other}`, expected `sequential` or `synchronized`"
            )),
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Sequential => write!(f, "sequential"),
            UpdateMode::Synchronized => write!(f, "synchronized"),
        }
    }
}

/// Summary of the population after a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub frame: u64,
    pub boids: usize,
    pub mean_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub centroid: Vector2,
    pub mean_pairwise_distance: f32,
}

#[derive(Debug, Clone)]
pub struct Flock {
    boids: Vec<Boid>,
    mode: UpdateMode,
    frame: u64,
}

impl Flock {
    /// Boids find themselves in the flock by id, so ids must be unique.
    pub fn new(boids: Vec<Boid>, mode: UpdateMode) -> Result<Self> {
        let mut seen = HashSet::with_capacity(boids.len());
        for boid in &boids {
            boid.params().validate()?;
            if !seen.insert(boid.id()) {
                return Err(FlockError::DuplicateBoidId(boid.id()));
            }
        }
        Ok(Flock {
            boids,
            mode,
            frame: 0,
        })
    }

    /// `count` boids scattered over the 200x200 square around the centre of
    /// the world.
    pub fn spawn<R: Rng>(
        count: usize,
        width: f32,
        height: f32,
        params: Parameters,
        rng: &mut R,
    ) -> Result<Self> {
        let (cx, cy) = (width / 2.0, height / 2.0);
        let positions: Vec<Vector2> = (0..count)
            .map(|_| {
                Vector2::new(
                    random_between(rng, cx - SPAWN_SPREAD, cx + SPAWN_SPREAD),
                    random_between(rng, cy - SPAWN_SPREAD, cy + SPAWN_SPREAD),
                )
            })
            .collect();
        let flock = Self::from_positions(positions, params, rng)?;
        info!("spawned {count} boids around ({cx}, {cy})");
        Ok(flock)
    }

    /// One boid per position, ids in the same order.
    pub fn from_positions<R: Rng>(
        positions: impl IntoIterator<Item = Vector2>,
        params: Parameters,
        rng: &mut R,
    ) -> Result<Self> {
        params.validate()?;
        let boids = positions
            .into_iter()
            .enumerate()
            .map(|(id, position)| Boid::new(id, position, params, rng))
            .collect();
        Flock::new(boids, UpdateMode::default())
    }

    pub fn with_mode(mut self, mode: UpdateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Turn every boid away from the edges of a `width` x `height` world and
    /// step it against the rest of the flock.
    pub fn advance_frame(&mut self, width: f32, height: f32) -> Result<()> {
        match self.mode {
            UpdateMode::Sequential => self.advance_sequential(width, height)?,
            UpdateMode::Synchronized => self.advance_synchronized(width, height)?,
        }
        self.frame += 1;
        debug!("frame {} advanced ({} boids, {})", self.frame, self.boids.len(), self.mode);
        Ok(())
    }

    fn advance_sequential(&mut self, width: f32, height: f32) -> Result<()> {
        for index in 0..self.boids.len() {
            let boid = &mut self.boids[index];
            boid.apply_boundary_turn(width, height);
            boid.integrate();
            // the whole flock is read here, including boids already moved this frame
            let acceleration = self.boids[index].steering(&self.boids)?;
            self.boids[index].acceleration = acceleration;
        }
        Ok(())
    }

    fn advance_synchronized(&mut self, width: f32, height: f32) -> Result<()> {
        let snapshot = self.boids.clone();
        self.boids = snapshot
            .par_iter()
            .map(|boid| {
                let mut next = boid.clone();
                next.apply_boundary_turn(width, height);
                next.step(&snapshot)?;
                Ok(next)
            })
            .collect::<Result<Vec<Boid>>>()?;
        Ok(())
    }

    pub fn stats(&self) -> FrameStats {
        let count = self.boids.len();
        if count == 0 {
            return FrameStats {
                frame: self.frame,
                boids: 0,
                mean_speed: 0.0,
                min_speed: 0.0,
                max_speed: 0.0,
                centroid: Vector2::ZERO,
                mean_pairwise_distance: 0.0,
            };
        }

        let speeds: Vec<f32> = self.boids.iter().map(|b| b.velocity.magnitude()).collect();
        let mut centroid = Vector2::ZERO;
        for boid in &self.boids {
            centroid.add(boid.position);
        }
        centroid.divide(count as f32);

        let mut total_distance = 0.0;
        let mut pairs = 0usize;
        for (i, a) in self.boids.iter().enumerate() {
            for b in &self.boids[i + 1..] {
                total_distance += a.position.distance_to(&b.position);
                pairs += 1;
            }
        }

        FrameStats {
            frame: self.frame,
            boids: count,
            mean_speed: speeds.iter().sum::<f32>() / count as f32,
            min_speed: speeds.iter().copied().fold(f32::INFINITY, f32::min),
            max_speed: speeds.iter().copied().fold(0.0, f32::max),
            centroid,
            mean_pairwise_distance: if pairs > 0 {
                total_distance / pairs as f32
            } else {
                0.0
            },
        }
    }
}

/// Rejects worlds with a zero dimension.
pub fn check_world(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FlockError::InvalidWorld { width, height });
    }
    Ok(())
}
