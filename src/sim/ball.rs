//! Ball entity and per-tick behavior
//!
//! While a ball has queued waypoints its position is dictated by the queue;
//! once the queue drains it flies freely under the pool's gravity.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::trajectory::{Flight, Gravity, advance, launch_velocity};
use crate::consts::{RELEASE_TICKS, SCORE_DIVISOR};

/// Which arm a ball is meant to end up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    /// Either arm may take it
    #[default]
    Cross,
}

/// Scoring tag carried by orbit waypoints; read when the last one drains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchTag {
    /// Bonus added before the multiplier (1 when the arm alternated)
    pub weight: u32,
    /// Urgency multiplier (2 when the paired arm had to step in)
    pub multiplier: u32,
}

/// A pre-committed future position
///
/// `pos: None` is a placeholder: the tick falls back to free flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub pos: Option<Vec2>,
    pub tag: Option<CatchTag>,
}

impl Waypoint {
    pub fn hold(pos: Vec2) -> Self {
        Self {
            pos: Some(pos),
            tag: None,
        }
    }

    pub fn intercept(pos: Vec2) -> Self {
        Self {
            pos: Some(pos),
            tag: None,
        }
    }

    /// Intercept-phase slot whose position is left to the trajectory model
    pub fn placeholder() -> Self {
        Self {
            pos: None,
            tag: None,
        }
    }

    pub fn orbit(pos: Vec2, tag: CatchTag) -> Self {
        Self {
            pos: Some(pos),
            tag: Some(tag),
        }
    }

    /// Position, if present and finite
    #[inline]
    pub fn fixed_pos(&self) -> Option<Vec2> {
        self.pos.filter(|p| p.is_finite())
    }
}

/// Shared pool constants every ball reads during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Apex line for launches
    pub top: f32,
    /// Bottom line of the (scaled) view
    pub bottom: f32,
    /// Balls falling past this line are dropped
    pub ground: f32,
    pub gravity: Gravity,
    /// Logically active balls
    pub count: usize,
    /// Display scale of the current stage
    pub scale: f32,
}

impl Field {
    /// Launch velocity from height `y` with the apex on the top line
    #[inline]
    pub fn launch_velocity(&self, y: f32) -> f32 {
        launch_velocity(y, self.top, self.gravity.half)
    }

    /// Score for a catch released at height `y`
    pub fn catch_score(&self, y: f32, tag: CatchTag) -> u64 {
        let base = ((y - self.top) * self.count as f32 / SCORE_DIVISOR).floor().max(0.0);
        let base = if base.is_finite() { base as u64 } else { 0 };
        base.saturating_add(u64::from(tag.weight))
            .saturating_mul(u64::from(tag.multiplier))
    }
}

/// A ball entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub dx: f32,
    pub dy: f32,
    /// Pending waypoints, consumed one per tick
    pub future: VecDeque<Waypoint>,
    pub side: Side,
}

impl Ball {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a launch from `pos`, holding still for `delay` ticks first
    pub fn setup(&mut self, pos: Vec2, dx: f32, dy: f32, delay: usize) {
        self.pos = pos;
        self.dx = dx;
        self.dy = dy;
        self.future = std::iter::repeat_n(Waypoint::hold(pos), delay).collect();
    }

    /// Replace the waypoint queue; `None` keeps the current one
    pub fn set_future(&mut self, points: Option<Vec<Waypoint>>) {
        if let Some(points) = points {
            self.future = points.into();
        }
    }

    /// Free-falling and not driven by any queue
    #[inline]
    pub fn is_free(&self) -> bool {
        self.future.is_empty()
    }

    pub fn flight(&self) -> Flight {
        Flight {
            x: self.pos.x,
            y: self.pos.y,
            dy: self.dy,
        }
    }

    /// Where free flight puts this ball `steps` ticks from now
    pub fn predict(&self, gravity: Gravity, steps: u32) -> Flight {
        advance(self.flight(), self.dx, gravity, steps)
    }

    /// Advance one tick, returning the event it raised (if any)
    pub fn advance_one_tick(&mut self, field: &Field) -> Option<GameEvent> {
        if let Some(point) = self.future.pop_front() {
            if let Some(pos) = point.fixed_pos() {
                self.pos = pos;
                if self.future.is_empty() {
                    if let Some(tag) = point.tag.filter(|t| t.multiplier > 0) {
                        let score = field.catch_score(pos.y, tag);
                        return Some(GameEvent::Score { score });
                    }
                }
                return None;
            }
        }

        let next = self.predict(field.gravity, 1);
        self.pos = Vec2::new(next.x, next.y);
        self.dy = next.dy;

        // No drop check while rising
        if self.dy < 0.0 {
            return None;
        }
        let past_bottom = field.ground < field.bottom && field.bottom < self.pos.y;
        let past_ground = self.future.is_empty() && field.ground < self.pos.y;
        if past_bottom || past_ground {
            Some(GameEvent::Drop)
        } else {
            None
        }
    }

    /// Throw the ball from where it is toward `target_x`, apex on the top line
    pub fn release_toward(&mut self, target_x: f32, field: &Field) {
        self.dx = (target_x - self.pos.x) * (field.scale / 2.0).max(1.0) / RELEASE_TICKS;
        self.dy = field.launch_velocity(self.pos.y);
    }
}
