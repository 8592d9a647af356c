//! Elbow placement for a two-joint arm
//!
//! Each arm has an elliptical region of valid elbow positions. A hand target
//! inside the region pulls the elbow onto the hand; anywhere else the elbow
//! sits where the ray from the ellipse center to the hand leaves the ellipse.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned ellipse bounding valid elbow positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachEllipse {
    pub center: Vec2,
    pub radii: Vec2,
}

impl ReachEllipse {
    pub fn new(center: Vec2, radii: Vec2) -> Self {
        Self { center, radii }
    }

    /// Radii are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.center.is_finite() && self.radii.is_finite() && self.radii.x > 0.0 && self.radii.y > 0.0
    }

    /// Normalized radial distance: < 1 inside, 1 on the boundary, > 1 outside
    #[inline]
    pub fn level(&self, point: Vec2) -> f32 {
        ((point - self.center) / self.radii).length_squared()
    }

    /// Point is inside or on the ellipse
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.level(point) <= 1.0
    }

    /// Elbow position for a hand target
    pub fn solve_elbow(&self, hand: Vec2) -> Vec2 {
        if !self.is_valid() || !hand.is_finite() || self.contains(hand) {
            return hand;
        }

        // x^2 / rx^2 + y^2 / ry^2 = 1 around the origin
        let Vec2 { x: rx, y: ry } = self.radii;
        let h = hand - self.center;
        let elbow = if h.x == 0.0 {
            Vec2::new(0.0, h.y.signum() * ry)
        } else {
            let x = h.x * rx * ry / (h.x * h.x * ry * ry + h.y * h.y * rx * rx).sqrt();
            Vec2::new(x, h.y / h.x * x)
        };
        elbow + self.center
    }
}
