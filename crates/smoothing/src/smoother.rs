//! Exponential interpolation of the published direction.

use gazetrack_common::config::TrackingConfig;
use gazetrack_gaze_model::Direction;

/// Default fraction of the remaining distance covered per tick.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.20;

/// Holds the last weighted-average target and the published direction.
///
/// Each `advance` moves the published direction a fixed fraction of the way
/// toward the target. With a static target the gap shrinks by
/// `(1 - alpha)` per call, so the output never overshoots.
#[derive(Debug, Clone)]
pub struct DirectionSmoother {
    raw: Direction,
    current: Direction,
    alpha: f64,
}

impl DirectionSmoother {
    /// Create a smoother at rest on the frame center.
    ///
    /// `alpha` is clamped to `[0, 1]`; a non-finite value falls back to the
    /// default.
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            DEFAULT_SMOOTHING_FACTOR
        };
        Self {
            raw: Direction::CENTER,
            current: Direction::CENTER,
            alpha,
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.smoothing_factor)
    }

    /// Replace the interpolation target.
    pub fn observe_raw(&mut self, raw: Direction) {
        self.raw = raw;
    }

    /// Step the published direction toward the target and return it.
    pub fn advance(&mut self) -> Direction {
        self.current = self.current.lerp(self.raw, self.alpha);
        self.current
    }

    /// The published (smoothed) direction.
    pub fn current(&self) -> Direction {
        self.current
    }

    /// The last observed target.
    pub fn raw(&self) -> Direction {
        self.raw
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for DirectionSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_center() {
        let smoother = DirectionSmoother::default();
        assert_eq!(smoother.current(), Direction::CENTER);
        assert_eq!(smoother.raw(), Direction::CENTER);
    }

    #[test]
    fn test_geometric_convergence() {
        let mut smoother = DirectionSmoother::default();
        smoother.observe_raw(Direction::new(1.0, 0.0));

        let expected = [0.2, 0.36, 0.488];
        for want in expected {
            let got = smoother.advance();
            assert!((got.dx - want).abs() < 1e-9, "got {}, want {want}", got.dx);
        }
    }

    #[test]
    fn test_fixed_point() {
        let mut smoother = DirectionSmoother::default();
        smoother.advance();
        assert_eq!(smoother.current(), Direction::CENTER);

        smoother.observe_raw(Direction::new(0.3, -0.3));
        for _ in 0..400 {
            smoother.advance();
        }
        let settled = smoother.current();
        assert!((settled.dx - 0.3).abs() < 1e-12);
        smoother.observe_raw(settled);
        assert_eq!(smoother.advance(), settled);
    }

    #[test]
    fn test_keeps_moving_without_new_target() {
        let mut smoother = DirectionSmoother::default();
        smoother.observe_raw(Direction::new(-1.0, 1.0));
        let first = smoother.advance();
        let second = smoother.advance();
        assert!(second.dx < first.dx);
        assert!(second.dy > first.dy);
    }

    #[test]
    fn test_never_overshoots() {
        let mut smoother = DirectionSmoother::default();
        smoother.observe_raw(Direction::new(0.8, -0.6));
        for _ in 0..100 {
            let d = smoother.advance();
            assert!(d.dx <= 0.8 && d.dx >= 0.0);
            assert!(d.dy >= -0.6 && d.dy <= 0.0);
        }
    }

    #[test]
    fn test_alpha_sanitized() {
        assert_eq!(DirectionSmoother::new(2.0).alpha(), 1.0);
        assert_eq!(DirectionSmoother::new(-1.0).alpha(), 0.0);
        assert_eq!(
            DirectionSmoother::new(f64::NAN).alpha(),
            DEFAULT_SMOOTHING_FACTOR
        );
    }
}
