//! Discrete-step projectile motion
//!
//! Velocity changes by `accel` once per tick and position accumulates the
//! resulting arithmetic series, so a jump of `n` ticks has a closed form that
//! matches `n` single steps exactly.

use serde::{Deserialize, Serialize};

/// Constant vertical acceleration shared by every ball in a pool
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gravity {
    pub accel: f32,
    pub half: f32,
}

impl Gravity {
    pub fn new(accel: f32) -> Self {
        Self {
            accel,
            half: accel / 2.0,
        }
    }
}

/// Vertical flight state of a ball (x drifts at a constant rate)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Flight {
    pub x: f32,
    pub y: f32,
    pub dy: f32,
}

/// State `steps` ticks ahead of `state`
///
/// `steps == 0` returns the state unchanged.
pub fn advance(state: Flight, dx: f32, gravity: Gravity, steps: u32) -> Flight {
    if steps == 0 {
        return state;
    }
    let n = steps as f32;
    Flight {
        x: state.x + dx * n,
        y: state.y + state.dy * n + gravity.half * n * (n - 1.0),
        dy: state.dy + gravity.accel * n,
    }
}

/// Initial vertical velocity that puts the apex of a throw from `launcher_y` on `top`
///
/// Returns 0 when the launcher is already above the top line or the result
/// would not be finite.
pub fn launch_velocity(launcher_y: f32, top: f32, half: f32) -> f32 {
    let height = launcher_y - top;
    if height < 0.0 || half <= 0.0 {
        return 0.0;
    }
    let time = (height / half).sqrt();
    let velocity = half * (1.0 - 2.0 * time);
    if velocity.is_finite() { velocity } else { 0.0 }
}
