use nalgebra::Vector2;
use rand::Rng;
use serde::Deserialize;

/// Axis-aligned rectangle stored as center + size. `y` grows downward, so
/// `top()` is the minimum y.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            x: (min_x + max_x) / 2.0,
            y: (min_y + max_y) / 2.0,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn min(&self) -> Vector2<f32> {
        Vector2::new(self.left(), self.top())
    }

    pub fn max(&self) -> Vector2<f32> {
        Vector2::new(self.right(), self.bottom())
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    // Squared distance from the point to the closest point of the rectangle.
    pub fn distance_sq_to_point(&self, point: Vector2<f32>) -> f32 {
        let dx = (point.x - self.x).abs() - self.width / 2.0;
        let dy = (point.y - self.y).abs() - self.height / 2.0;
        f32::max(dx, 0.0).powi(2) + f32::max(dy, 0.0).powi(2)
    }

    // Edges are inclusive so a point on a split line lands in the first quadrant checked.
    pub fn contains_point(&self, point: Vector2<f32>) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Quarter of this rectangle, ordered top-left, bottom-left, top-right,
    /// bottom-right.
    pub fn quadrant(&self, index: usize) -> Rectangle {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let dx = if index < 2 { -half_w / 2.0 } else { half_w / 2.0 };
        let dy = if index % 2 == 0 { -half_h / 2.0 } else { half_h / 2.0 };
        Rectangle::new(self.x + dx, self.y + dy, half_w, half_h)
    }

    pub fn expand_to_include(&mut self, other: &Rectangle) {
        let left = f32::min(self.left(), other.left());
        let right = f32::max(self.right(), other.right());
        let top = f32::min(self.top(), other.top());
        let bottom = f32::max(self.bottom(), other.bottom());
        self.x = (left + right) / 2.0;
        self.y = (top + bottom) / 2.0;
        self.width = right - left;
        self.height = bottom - top;
    }

    pub fn get_random_point_inside<R: Rng>(&self, rng: &mut R) -> Vector2<f32> {
        Vector2::new(
            self._safe_randf32(rng, self.left(), self.right()),
            self._safe_randf32(rng, self.top(), self.bottom()),
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}
