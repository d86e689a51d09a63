use quadtree::QuadtreeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error(transparent)]
    Quadtree(#[from] QuadtreeError),
    #[error("fixed timestep must be finite and positive (fixed_timestep: {0})")]
    InvalidTimestep(f32),
    #[error("body mass must be finite and positive (mass: {0})")]
    InvalidMass(f32),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
