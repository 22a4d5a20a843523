//! Infinite horizontal background scroll from two tiling segments

use serde::{Deserialize, Serialize};

/// Two same-width segments laid end to end; positions are left edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scroller {
    pub width: f32,
    pub a: f32,
    pub b: f32,
}

impl Scroller {
    pub fn new(width: f32) -> Self {
        debug_assert!(width > 0.0);
        Self {
            width,
            a: 0.0,
            b: width,
        }
    }

    /// Shift both segments left by `speed * dt`. A segment whose right edge
    /// reaches x <= 0 sits at the right edge of the other one, however many
    /// widths the shift covers, so large deltas never open a gap. A shift or
    /// width that is not finite leaves the segments where they are.
    pub fn advance(&mut self, dt: f32, speed: f32) {
        let shift = speed.max(0.0) * dt.max(0.0);
        let w = self.width;
        if !shift.is_finite() || !(w.is_finite() && w > 0.0) {
            return;
        }

        // `a` repeats every two widths; its right edge lives in (0, 2w]
        let period = 2.0 * w;
        let mut right = (self.a - shift + w).rem_euclid(period);
        if right == 0.0 {
            right = period;
        }
        self.a = right - w;
        self.b = if self.a <= 0.0 { self.a + w } else { self.a - w };
    }

    /// Left edge of whichever segment is currently leftmost
    pub fn leading_edge(&self) -> f32 {
        self.a.min(self.b)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_left() {
        let mut s = Scroller::new(400.0);
        s.advance(0.5, 100.0);
        assert_eq!(s.a, -50.0);
        assert_eq!(s.b, 350.0);
    }

    #[test]
    fn test_wraps_without_gap() {
        let mut s = Scroller::new(400.0);
        s.advance(4.0, 100.0);
        // a's right edge hit 0 exactly -> relocated behind b
        assert_eq!(s.b, 0.0);
        assert_eq!(s.a, 400.0);
    }

    #[test]
    fn test_huge_delta_keeps_tiling() {
        let mut s = Scroller::new(400.0);
        s.advance(37.3, 100.0);
        assert!(((s.a - s.b).abs() - 400.0).abs() < 1e-2);
        assert!(s.leading_edge() > -400.0 && s.leading_edge() <= 0.0);
    }

    #[test]
    fn test_tiny_width_returns() {
        let mut s = Scroller::new(1e-9);
        s.advance(1.0 / 60.0, 100.0);
        assert!(s.a.is_finite() && s.b.is_finite());
        assert!(s.leading_edge() <= 0.0);
        assert!(s.a + s.width > 0.0 && s.b + s.width > 0.0);
    }

    #[test]
    fn test_infinite_shift_is_ignored() {
        let mut s = Scroller::new(400.0);
        s.advance(1.0 / 60.0, f32::INFINITY);
        s.advance(f32::INFINITY, 100.0);
        s.advance(f32::NAN, f32::NAN);
        assert_eq!(s, Scroller::new(400.0));
    }

    #[test]
    fn test_many_small_steps_match_one_large() {
        let mut stepped = Scroller::new(400.0);
        for _ in 0..30 {
            stepped.advance(0.5, 100.0);
        }
        let mut jumped = Scroller::new(400.0);
        jumped.advance(15.0, 100.0);
        assert!((stepped.a - jumped.a).abs() < 1e-2);
        assert!((stepped.b - jumped.b).abs() < 1e-2);
    }

    #[test]
    fn test_negative_speed_is_ignored() {
        let mut s = Scroller::new(400.0);
        s.advance(1.0, -100.0);
        assert_eq!(s, Scroller::new(400.0));
    }
}
