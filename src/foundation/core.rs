use crate::foundation::error::{CharmloomError, CharmloomResult};

pub use kurbo::{Point, Vec2};

/// Live canvas dimensions in canvas-local pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
}

impl CanvasSize {
    /// Construct a canvas size, rejecting non-finite or non-positive dimensions.
    pub fn new(width: f64, height: f64) -> CharmloomResult<Self> {
        if !width.is_finite() || !height.is_finite() {
            return Err(CharmloomError::validation("canvas size must be finite"));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(CharmloomError::validation("canvas size must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Clamp the top-left corner of a `side`-sized square so it stays fully
    /// inside the canvas on both axes.
    pub fn clamp_origin(self, pos: Point, side: f64) -> Point {
        Point::new(
            pos.x.clamp(0.0, (self.width - side).max(0.0)),
            pos.y.clamp(0.0, (self.height - side).max(0.0)),
        )
    }

    /// Largest square side that fits inside the canvas with its top-left at `pos`.
    pub fn max_side_at(self, pos: Point) -> f64 {
        (self.width - pos.x).min(self.height - pos.y).max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
