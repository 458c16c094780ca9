use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::random::random_between;

/// A mutable 2D vector. Every arithmetic operation works on the receiver in
/// place and hands it back so calls can be chained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Vector2 { x, y }
    }

    pub fn add(&mut self, other: Vector2) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    pub fn subtract(&mut self, other: Vector2) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    pub fn scale(&mut self, factor: f32) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self
    }

    /// Dividing by zero leaves non-finite components behind.
    pub fn divide(&mut self, divisor: f32) -> &mut Self {
        self.x /= divisor;
        self.y /= divisor;
        self
    }

    pub fn magnitude(&self) -> f32 {
        nalgebra::Vector2::<f32>::from(*self).norm()
    }

    pub fn distance_to(&self, other: &Vector2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle of the vector in radians, as returned by `atan2`.
    pub fn heading(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Scales to unit length. The zero vector has no direction and is left
    /// untouched.
    pub fn normalize(&mut self) -> &mut Self {
        let magnitude = self.magnitude();
        if magnitude > 0.0 {
            self.divide(magnitude);
        }
        self
    }

    pub fn set_magnitude(&mut self, target: f32) -> &mut Self {
        self.normalize().scale(target)
    }

    pub fn limit_magnitude(&mut self, max_value: f32) -> &mut Self {
        if self.magnitude() > max_value {
            self.set_magnitude(max_value);
        }
        self
    }

    pub fn floor_magnitude(&mut self, min_value: f32) -> &mut Self {
        if self.magnitude() < min_value {
            self.set_magnitude(min_value);
        }
        self
    }

    /// A vector of the given length pointing in a uniformly random direction.
    pub fn random_unit<R: Rng>(rng: &mut R, magnitude: f32) -> Self {
        let angle = random_between(rng, 0.0, TAU);
        Vector2::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    /// `a - b` without touching either operand.
    pub fn difference(a: Vector2, b: Vector2) -> Self {
        Vector2::new(a.x - b.x, a.y - b.y)
    }
}

impl From<nalgebra::Vector2<f32>> for Vector2 {
    fn from(v: nalgebra::Vector2<f32>) -> Self {
        Vector2::new(v.x, v.y)
    }
}

impl From<Vector2> for nalgebra::Vector2<f32> {
    fn from(v: Vector2) -> Self {
        nalgebra::Vector2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const DELTA: f32 = 1e-5;

    #[test]
    fn add() {
        let mut v = Vector2::new(1.0, 2.0);
        v.add(Vector2::new(3.0, 4.0));
        assert_eq!(v, Vector2::new(4.0, 6.0));
    }

    #[test]
    fn subtract() {
        let mut v = Vector2::new(1.0, 2.0);
        v.subtract(Vector2::new(3.0, 4.0));
        assert_eq!(v, Vector2::new(-2.0, -2.0));
    }

    #[test]
    fn add_then_subtract_restores() {
        let original = Vector2::new(-7.25, 13.5);
        let other = Vector2::new(0.1, -3.3);
        let mut v = original;
        v.add(other).subtract(other);
        assert_abs_diff_eq!(v.x, original.x, epsilon = DELTA);
        assert_abs_diff_eq!(v.y, original.y, epsilon = DELTA);
    }

    #[test]
    fn scale_and_divide() {
        let mut v = Vector2::new(1.0, 2.0);
        v.scale(2.0);
        assert_eq!(v, Vector2::new(2.0, 4.0));
        v.divide(4.0);
        assert_eq!(v, Vector2::new(0.5, 1.0));
    }

    #[test]
    fn divide_by_zero_is_not_finite() {
        let mut v = Vector2::new(1.0, -1.0);
        v.divide(0.0);
        assert!(!v.x.is_finite());
        assert!(!v.y.is_finite());
    }

    #[test]
    fn magnitude_and_distance() {
        assert_abs_diff_eq!(Vector2::new(1.0, 2.0).magnitude(), 5f32.sqrt(), epsilon = DELTA);
        let d = Vector2::new(1.0, 2.0).distance_to(&Vector2::new(3.0, 4.0));
        assert_abs_diff_eq!(d, 8f32.sqrt(), epsilon = DELTA);
    }

    #[test]
    fn normalize() {
        let mut v = Vector2::new(1.0, 1.0);
        v.normalize();
        assert_abs_diff_eq!(v.magnitude(), 1.0, epsilon = DELTA);

        let mut zero = Vector2::ZERO;
        zero.normalize();
        assert_eq!(zero, Vector2::ZERO);
    }

    #[test]
    fn set_magnitude() {
        let mut v = Vector2::new(1.0, 1.0);
        v.set_magnitude(10.0);
        assert_abs_diff_eq!(v.magnitude(), 10.0, epsilon = DELTA);
    }

    #[test]
    fn limit() {
        let mut v = Vector2::new(6.0, 8.0);
        v.limit_magnitude(12.0);
        assert_eq!(v, Vector2::new(6.0, 8.0));
        v.limit_magnitude(4.0);
        assert_abs_diff_eq!(v.magnitude(), 4.0, epsilon = DELTA);
        // direction is kept
        assert_abs_diff_eq!(v.y / v.x, 8.0 / 6.0, epsilon = DELTA);
    }

    #[test]
    fn floor() {
        let mut v = Vector2::new(6.0, 8.0);
        v.floor_magnitude(4.0);
        assert_eq!(v, Vector2::new(6.0, 8.0));
        v.floor_magnitude(16.0);
        assert_abs_diff_eq!(v.magnitude(), 16.0, epsilon = DELTA);
    }

    #[test]
    fn floor_leaves_zero_vector_alone() {
        let mut v = Vector2::ZERO;
        v.floor_magnitude(2.0);
        assert_eq!(v, Vector2::ZERO);
    }

    #[test]
    fn random_unit_has_requested_magnitude() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_abs_diff_eq!(Vector2::random_unit(&mut rng, 1.0).magnitude(), 1.0, epsilon = DELTA);
        for _ in 0..100 {
            let v = Vector2::random_unit(&mut rng, 16.0);
            assert_abs_diff_eq!(v.magnitude(), 16.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn random_unit_covers_every_quadrant() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut quadrants = [0usize; 4];
        let samples = 4000;
        for _ in 0..samples {
            let v = Vector2::random_unit(&mut rng, 1.0);
            let q = match (v.x >= 0.0, v.y >= 0.0) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            quadrants[q] += 1;
        }
        for count in quadrants {
            // expected 1000 per quadrant
            assert!((800..1200).contains(&count), "{quadrants:?}");
        }
    }

    #[test]
    fn difference_leaves_operands_alone() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(1.0, 1.0);
        assert_eq!(Vector2::difference(a, b), Vector2::ZERO);
        assert_eq!(a, Vector2::new(1.0, 1.0));
        assert_eq!(Vector2::difference(Vector2::new(5.0, 2.0), b), Vector2::new(4.0, 1.0));
    }

    #[test]
    fn nalgebra_round_trip() {
        let v = Vector2::new(3.0, -4.0);
        let n: nalgebra::Vector2<f32> = v.into();
        assert_abs_diff_eq!(n.norm(), 5.0, epsilon = DELTA);
        assert_eq!(Vector2::from(n), v);
    }
}
