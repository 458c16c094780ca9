use std::path::{Path, PathBuf};

use colors_transform::Color;
use image::{Rgb, RgbImage};

use crate::boids::Boid;
use crate::error::{FlockError, Result};
use crate::flock::Flock;
use crate::vector::Vector2;

/// `#rrggbb` (or `rrggbb`) to an RGB pixel.
pub fn parse_colour(hex: &str) -> Result<Rgb<u8>> {
    let parsed = colors_transform::Rgb::from_hex_str(hex)
        .map_err(|_| FlockError::InvalidColour(hex.to_string()))?;
    Ok(Rgb([
        parsed.get_red().round() as u8,
        parsed.get_green().round() as u8,
        parsed.get_blue().round() as u8,
    ]))
}

pub fn frame_path(dir: &Path, frame: u64) -> PathBuf {
    dir.join(format!("frame_{:0>8}.png", frame))
}

/// An off-screen surface that keeps fading trails of previous frames.
pub struct Canvas {
    image: RgbImage,
    colour: Rgb<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, colour: &str) -> Result<Self> {
        Ok(Canvas {
            image: RgbImage::new(width, height),
            colour: parse_colour(colour)?,
        })
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Darken every pixel by `amount` of its brightness. Channels round down
    /// so old trails always reach black.
    pub fn fade(&mut self, amount: f32) {
        let keep = (1.0 - amount).clamp(0.0, 1.0);
        for pixel in self.image.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = (*channel as f32 * keep) as u8;
            }
        }
    }

    /// A triangle with its tip on the boid's position, pointing along its
    /// velocity, `radius` long and two thirds of `radius` wide.
    pub fn draw_boid(&mut self, boid: &Boid) {
        let radius = boid.radius();
        let angle = boid.velocity.heading();
        let (sin, cos) = angle.sin_cos();
        let rotate = |dx: f32, dy: f32| {
            Vector2::new(
                boid.position.x + dx * cos - dy * sin,
                boid.position.y + dx * sin + dy * cos,
            )
        };
        let tip = boid.position;
        let left = rotate(-radius, radius / 3.0);
        let right = rotate(-radius, -radius / 3.0);
        self.fill_triangle(tip, left, right);
    }

    pub fn draw_flock(&mut self, flock: &Flock) {
        for boid in flock.boids() {
            self.draw_boid(boid);
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    fn fill_triangle(&mut self, a: Vector2, b: Vector2, c: Vector2) {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0);
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0);
        let max_x = a.x.max(b.x).max(c.x).ceil().min(width as f32 - 1.0);
        let max_y = a.y.max(b.y).max(c.y).ceil().min(height as f32 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let area = edge(a, b, c);
        if area == 0.0 {
            return;
        }
        for y in min_y as u32..=max_y as u32 {
            for x in min_x as u32..=max_x as u32 {
                let p = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.image.put_pixel(x, y, self.colour);
                }
            }
        }
    }
}

// twice the signed area of (a, b, p)
fn edge(a: Vector2, b: Vector2, p: Vector2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
