//! Tap Juggle - a two-armed robot juggling reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball flight, arm scheduling, session rules)
//! - `settings`: Rig geometry and session configuration
//! - `best`: Persisted best score

pub mod best;
pub mod settings;
pub mod sim;

pub use best::BestScore;
pub use settings::{ArmRig, Rig, Settings, ViewBox};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Tick length of the external game loop (ms)
    pub const TICK_MS: u32 = 20;
    /// Lives at the start of a game
    pub const START_LIVES: u8 = 3;

    /// Acceleration at stage 1 (pixels/tick²)
    pub const BASE_ACCEL: f32 = 0.2;
    /// Acceleration added on every speed-up
    pub const ACCEL_STEP: f32 = 0.2;

    /// Apex line sits this far below the (scaled) top of the view
    pub const TOP_MARGIN: f32 = 20.0;
    /// Ground line sits this far below the unscaled bottom of the view
    pub const GROUND_MARGIN: f32 = 40.0;
    /// Balls are launched this far below the bottom line
    pub const LAUNCH_MARGIN: f32 = 20.0;
    /// Horizontal launch offset from the center line
    pub const LAUNCH_X: f32 = 30.0;
    /// Hold ticks between two balls launched together
    pub const HOLD_TICKS_PER_BALL: usize = 48;

    /// Number of precomputed orbit paths (one per interception delay)
    pub const ORBIT_LEVELS: usize = 5;
    /// Interception delay is `INTERCEPT_BASE - active count`, at least 1
    pub const INTERCEPT_BASE: usize = 6;
    /// Horizontal semi-axis of the follow orbit (unit path)
    pub const ORBIT_RX: f32 = 0.5;
    /// Vertical semi-axis of the follow orbit (unit path)
    pub const ORBIT_RY: f32 = 0.35;
    /// Ticks a released ball takes to drift to its home target
    pub const RELEASE_TICKS: f32 = 100.0;
    /// Height divisor in the catch score
    pub const SCORE_DIVISOR: f32 = 100.0;

    /// Largest display scale handed to the renderer
    pub const MAX_DISPLAY_SCALE: f32 = 8.5;
}

/// Display scale for a difficulty stage (grows one notch every 3 stages)
#[inline]
pub fn stage_scale(stage: u32) -> f32 {
    (stage.div_ceil(3) + 2) as f32 / 4.0
}

/// Linear steps from `from` to `to`, excluding `from` and ending exactly on `to`
pub fn lerp_steps(from: Vec2, to: Vec2, steps: usize) -> Vec<Vec2> {
    if steps == 0 {
        return Vec::new();
    }
    let delta = (to - from) / steps as f32;
    let mut point = from;
    (0..steps)
        .map(|_| {
            point += delta;
            point
        })
        .collect()
}
