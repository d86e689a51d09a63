pub mod shapes;

pub use nalgebra::Vector2;
