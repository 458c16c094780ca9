use rand::Rng;

/// Uniform value in `[min, max)`. A collapsed range returns `min`.
pub fn random_between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    rng.random_range(min..max)
}
