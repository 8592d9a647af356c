//! Arm pair and the interception protocol
//!
//! The pair decides which arm goes for a ball, pre-commits the whole
//! catch-and-release maneuver to both the arm and the ball, and keeps at most
//! one arm locked on any ball.

use std::f32::consts::PI;

use glam::Vec2;

use super::arm::{Arm, Pose};
use super::ball::{CatchTag, Side, Waypoint};
use super::pool::BallPool;
use crate::consts::{INTERCEPT_BASE, ORBIT_LEVELS, ORBIT_RX, ORBIT_RY};
use crate::lerp_steps;
use crate::settings::Rig;

pub const RIGHT: usize = 0;
pub const LEFT: usize = 1;

/// Unit half-ellipse from (0, 0) to (1, 0), dipping to `ORBIT_RY`
///
/// Level `i` has `(ORBIT_LEVELS - i) * 4` segments, so longer interception
/// delays get smoother swings.
pub fn orbit_paths() -> [Vec<Vec2>; ORBIT_LEVELS] {
    std::array::from_fn(|level| {
        let segments = (ORBIT_LEVELS - level) * 4;
        let delta = PI / segments as f32;
        (0..=segments)
            .map(|j| {
                let angle = delta * j as f32;
                Vec2::new(ORBIT_RX - ORBIT_RX * angle.cos(), ORBIT_RY * angle.sin())
            })
            .collect()
    })
}

/// Ticks from assignment to interception for `count` active balls
#[inline]
pub fn intercept_delay(count: usize) -> usize {
    INTERCEPT_BASE.saturating_sub(count).clamp(1, ORBIT_LEVELS)
}

/// Both arms plus the shared orbit tables
#[derive(Debug, Clone)]
pub struct ArmPair {
    /// Right arm first
    arms: [Arm; 2],
    orbits: [Vec<Vec2>; ORBIT_LEVELS],
    previous: Option<usize>,
}

impl ArmPair {
    pub fn new(rig: &Rig) -> Self {
        Self {
            arms: [
                Arm::new(Side::Right, &rig.right, rig.hand_offset),
                Arm::new(Side::Left, &rig.left, rig.hand_offset),
            ],
            orbits: orbit_paths(),
            previous: None,
        }
    }

    pub fn arms(&self) -> &[Arm; 2] {
        &self.arms
    }

    pub fn arm(&self, index: usize) -> Option<&Arm> {
        self.arms.get(index)
    }

    pub fn orbit(&self, level: usize) -> Option<&[Vec2]> {
        self.orbits.get(level).map(Vec::as_slice)
    }

    /// Current poses, right arm first
    pub fn poses(&self) -> [Pose; 2] {
        [self.arms[RIGHT].current, self.arms[LEFT].current]
    }

    /// Which arm, if any, is locked on `ball`
    pub fn holder(&self, ball: usize) -> Option<usize> {
        self.arms.iter().position(|arm| arm.lock == Some(ball))
    }

    pub fn setup(&mut self) {
        for arm in &mut self.arms {
            arm.setup();
        }
    }

    /// Advance both arms one tick (right, then left)
    pub fn advance_one_tick(&mut self, pool: &mut BallPool) {
        for index in [RIGHT, LEFT] {
            let partner_home = self.arms[1 - index].home;
            self.arms[index].advance_one_tick(&partner_home, pool);
        }
    }

    /// Send an arm after `ball`; returns whether an arm took it
    ///
    /// Balls left of center go to the right arm, others to the left one. A
    /// busy arm hands over to its partner at double urgency; when both are
    /// busy the ball is left alone.
    pub fn set_arm(&mut self, ball_index: usize, pool: &mut BallPool) -> bool {
        let count = pool.count();
        let gravity = pool.field().gravity;
        let Some(ball) = pool.ball(ball_index) else {
            return false;
        };
        if !ball.is_free() || self.holder(ball_index).is_some() {
            log::debug!("Ball {} is already under control", ball_index);
            return false;
        }

        let mut chosen = if ball.pos.x < 0.0 { RIGHT } else { LEFT };
        let mut multiplier = 1;
        if self.arms[chosen].is_busy() {
            multiplier = 2;
            chosen = 1 - chosen;
            if self.arms[chosen].is_busy() {
                log::debug!("Both arms busy, ball {} left alone", ball_index);
                return false;
            }
        }
        let weight = if self.previous != Some(chosen) {
            self.previous = Some(chosen);
            1
        } else {
            0
        };
        let tag = CatchTag { weight, multiplier };

        let delay = intercept_delay(count);
        let catch = ball.predict(gravity, delay as u32);
        let catch = Vec2::new(catch.x, catch.y);

        // Move to the ball
        let hand = self.arms[chosen].current.hand;
        let first = lerp_steps(hand, catch, delay);
        let start = first.last().copied().unwrap_or(catch);

        // Swing with it toward a third of the way to the partner's home
        let partner_home = self.arms[1 - chosen].home.hand;
        let mx = (partner_home.x - catch.x) / 3.0;
        let my = mx.abs();
        let follow: Vec<Waypoint> = self.orbits[ORBIT_LEVELS - delay]
            .iter()
            .map(|p| Waypoint::orbit(start + Vec2::new(mx * p.x, my * p.y), tag))
            .collect();

        let arm_queue = first
            .iter()
            .map(|p| Waypoint::intercept(*p))
            .chain(follow.iter().copied())
            .collect();
        let ball_queue = std::iter::repeat_n(Waypoint::placeholder(), first.len())
            .chain(follow)
            .collect();

        let arm = &mut self.arms[chosen];
        arm.lock = Some(ball_index);
        arm.set_future(Some(arm_queue));
        if let Some(ball) = pool.ball_mut(ball_index) {
            ball.set_future(Some(ball_queue));
        }
        log::debug!(
            "{:?} arm takes ball {} in {} ticks at ({:.1}, {:.1}), x{}",
            arm.side,
            ball_index,
            delay,
            catch.x,
            catch.y,
            multiplier
        );
        true
    }
}
