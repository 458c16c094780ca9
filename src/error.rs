use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlockError>;

#[derive(Debug, Error)]
pub enum FlockError {
    /// An averaging rule was handed an empty neighbour set.
    #[error("{rule} needs at least one neighbour")]
    EmptyNeighbourhood { rule: &'static str },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("boid id {0} appears more than once in the flock")]
    DuplicateBoidId(usize),

    #[error("world dimensions must be non-zero, got {width}x{height}")]
    InvalidWorld { width: u32, height: u32 },

    #[error("invalid colour `{0}`")]
    InvalidColour(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
