//! Math types.
//!
//! Screen space: origin at the top-left, `y` grows downwards, angles in
//! radians measured from the positive `x` axis towards positive `y`.

use serde::{Deserialize, Serialize};

/// 2D vector in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }

    /// Angle of this vector, using the two-argument arctangent so all four
    /// quadrants (and a zero `x` component) resolve correctly.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Angle of the vector pointing from `self` to `to`.
    pub fn angle_to(self, to: Self) -> f64 {
        to.sub(self).angle()
    }

    /// Point at `radius` along `angle` from the origin.
    pub fn from_polar(angle: f64, radius: f64) -> Self {
        Self::new(angle.cos() * radius, angle.sin() * radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn angle_to_covers_all_quadrants() {
        let o = Vec2::new(100.0, 100.0);
        assert_eq!(o.angle_to(Vec2::new(150.0, 100.0)), 0.0);
        assert_eq!(o.angle_to(Vec2::new(100.0, 50.0)), -FRAC_PI_2);
        assert_eq!(o.angle_to(Vec2::new(100.0, 150.0)), FRAC_PI_2);
        assert_eq!(o.angle_to(Vec2::new(50.0, 100.0)), PI);
    }
}
