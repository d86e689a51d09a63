use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadtreeError {
    #[error(
        "position is outside the quadtree bounds (x: {x}, y: {y}, bounds_min_x: {bounds_min_x}, bounds_min_y: {bounds_min_y}, bounds_max_x: {bounds_max_x}, bounds_max_y: {bounds_max_y})"
    )]
    OutOfRange {
        x: f32,
        y: f32,
        bounds_min_x: f32,
        bounds_min_y: f32,
        bounds_max_x: f32,
        bounds_max_y: f32,
    },
    #[error("circle radius must be finite and non-negative (radius: {radius})")]
    InvalidCircleRadius { radius: f32 },
    #[error(
        "rectangle must be finite with non-negative width/height (x: {x}, y: {y}, width: {width}, height: {height})"
    )]
    InvalidRectangleDims {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    #[error("quadtree bounds must be finite with positive width/height (width: {width}, height: {height})")]
    InvalidBounds { width: f32, height: f32 },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;
