//! Rig geometry and session settings
//!
//! Stored as JSON. Anything unreadable falls back to the defaults, and
//! non-finite or degenerate geometry is replaced value by value.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{START_LIVES, TICK_MS};
use crate::sim::ReachEllipse;

/// Logical drawing area (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            x: -160.0,
            y: -100.0,
            width: 320.0,
            height: 300.0,
        }
    }
}

/// Rest pose and elbow region of one arm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmRig {
    pub hand: Vec2,
    pub elbow: Vec2,
    pub reach: ReachEllipse,
}

impl ArmRig {
    /// Rig for the arm on the screen's left (the robot's right)
    pub fn right() -> Self {
        Self {
            hand: Vec2::new(-100.0, 150.0),
            elbow: Vec2::new(-80.0, 175.0),
            reach: ReachEllipse::new(Vec2::new(-60.0, 160.0), Vec2::new(35.0, 25.0)),
        }
    }

    pub fn left() -> Self {
        Self {
            hand: Vec2::new(100.0, 150.0),
            elbow: Vec2::new(80.0, 175.0),
            reach: ReachEllipse::new(Vec2::new(60.0, 160.0), Vec2::new(35.0, 25.0)),
        }
    }
}

/// The complete visual rig
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    pub view: ViewBox,
    pub right: ArmRig,
    pub left: ArmRig,
    /// Added to every hand target an arm dequeues
    pub hand_offset: Vec2,
}

impl Default for Rig {
    fn default() -> Self {
        Self {
            view: ViewBox::default(),
            right: ArmRig::right(),
            left: ArmRig::left(),
            hand_offset: Vec2::new(0.0, 10.0),
        }
    }
}

impl Rig {
    /// Replace unusable values with defaults; returns how many were replaced
    pub fn sanitize(&mut self) -> usize {
        let defaults = Rig::default();
        let mut fixed = 0;

        let view = &mut self.view;
        for (value, fallback, positive) in [
            (&mut view.x, defaults.view.x, false),
            (&mut view.y, defaults.view.y, false),
            (&mut view.width, defaults.view.width, true),
            (&mut view.height, defaults.view.height, true),
        ] {
            if !value.is_finite() || (positive && *value <= 0.0) {
                *value = fallback;
                fixed += 1;
            }
        }

        fixed += sanitize_arm(&mut self.right, &defaults.right);
        fixed += sanitize_arm(&mut self.left, &defaults.left);
        fixed += replace_point(&mut self.hand_offset, defaults.hand_offset);

        if fixed > 0 {
            log::warn!("Replaced {} invalid rig values with defaults", fixed);
        }
        fixed
    }
}

fn sanitize_arm(arm: &mut ArmRig, defaults: &ArmRig) -> usize {
    let mut fixed = replace_point(&mut arm.hand, defaults.hand);
    fixed += replace_point(&mut arm.elbow, defaults.elbow);
    fixed += replace_point(&mut arm.reach.center, defaults.reach.center);
    if !arm.reach.is_valid() {
        arm.reach.radii = defaults.reach.radii;
        fixed += 1;
    }
    fixed
}

fn replace_point(point: &mut Vec2, fallback: Vec2) -> usize {
    if point.is_finite() {
        0
    } else {
        *point = fallback;
        1
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rig: Rig,
    /// Lives per game
    pub lives: u8,
    /// Length of one tick of the external game loop (ms)
    pub tick_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rig: Rig::default(),
            lives: START_LIVES,
            tick_ms: TICK_MS,
        }
    }
}

impl Settings {
    /// Ticks in `seconds` of game time
    pub fn ticks_for_seconds(&self, seconds: u32) -> u32 {
        seconds * 1000 / self.tick_ms.max(1)
    }

    /// Parse settings JSON, sanitizing the rig
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                settings.rig.sanitize();
                if settings.tick_ms == 0 {
                    log::warn!("tick_ms must be positive, using {}", TICK_MS);
                    settings.tick_ms = TICK_MS;
                }
                Some(settings)
            }
            Err(e) => {
                log::warn!("Invalid settings: {}", e);
                None
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        if let Ok(json) = std::fs::read_to_string(path) {
            if let Some(settings) = Self::from_json(&json) {
                log::info!("Loaded settings from {}", path.display());
                return settings;
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
