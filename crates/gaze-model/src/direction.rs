//! Gaze direction values.

use serde::{Deserialize, Serialize};

/// Normalized offset of the tracked target from the frame center.
///
/// Both components are nominally in `[-1.0, 1.0]` and may slightly exceed
/// that range near frame edges. Serializes as `{"dx": .., "dy": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Direction {
    /// Horizontal offset; positive is toward the user's right.
    pub dx: f64,
    /// Vertical offset; positive is down.
    pub dy: f64,
}

impl Direction {
    /// The frame center.
    pub const CENTER: Direction = Direction { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }

    /// Offset of a pixel position from the center of a `width x height` frame.
    ///
    /// Uses integer half-sizes, so odd dimensions round the center down.
    pub fn from_pixel_offset(cx: i64, cy: i64, width: u32, height: u32) -> Option<Self> {
        let half_w = i64::from(width / 2);
        let half_h = i64::from(height / 2);
        if half_w == 0 || half_h == 0 {
            return None;
        }
        Some(Self {
            dx: (cx - half_w) as f64 / half_w as f64,
            dy: (cy - half_h) as f64 / half_h as f64,
        })
    }

    /// Linearly interpolate from `self` toward `target` by `t`.
    pub fn lerp(self, target: Direction, t: f64) -> Direction {
        Direction {
            dx: self.dx + (target.dx - self.dx) * t,
            dy: self.dy + (target.dy - self.dy) * t,
        }
    }
}

impl From<(f64, f64)> for Direction {
    fn from((dx, dy): (f64, f64)) -> Self {
        Self { dx, dy }
    }
}

impl From<Direction> for (f64, f64) {
    fn from(direction: Direction) -> Self {
        (direction.dx, direction.dy)
    }
}
