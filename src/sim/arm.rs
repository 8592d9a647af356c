//! Robot arm entity
//!
//! An arm replays a queue of hand targets, one per tick, deriving the elbow
//! from its reach ellipse. When the queue drains it lets go of the ball it
//! was carrying.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{Side, Waypoint};
use super::pool::BallPool;
use super::reach::ReachEllipse;
use crate::settings::ArmRig;

/// Hand and elbow joint positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub hand: Vec2,
    pub elbow: Vec2,
}

/// One robot arm
#[derive(Debug, Clone)]
pub struct Arm {
    pub side: Side,
    /// Rest pose
    pub home: Pose,
    pub current: Pose,
    /// Pending hand targets
    pub future: VecDeque<Waypoint>,
    /// Index of the ball this arm is carrying
    pub lock: Option<usize>,
    reach: ReachEllipse,
    hand_offset: Vec2,
}

impl Arm {
    pub fn new(side: Side, rig: &ArmRig, hand_offset: Vec2) -> Self {
        let home = Pose {
            hand: rig.hand,
            elbow: rig.elbow,
        };
        Self {
            side,
            home,
            current: home,
            future: VecDeque::new(),
            lock: None,
            reach: rig.reach,
            hand_offset,
        }
    }

    pub fn reach(&self) -> &ReachEllipse {
        &self.reach
    }

    /// Back to the rest pose, dropping any queue and lock
    pub fn setup(&mut self) {
        self.current = self.home;
        self.future.clear();
        self.lock = None;
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        !self.future.is_empty()
    }

    /// Replace the queue of hand targets; `None` keeps the current one
    pub fn set_future(&mut self, points: Option<Vec<Waypoint>>) {
        if let Some(points) = points {
            self.future = points.into();
        }
    }

    /// Advance one tick
    ///
    /// On the tick the queue drains, the locked ball is thrown toward this
    /// arm's home if it is tagged for this side, else toward `partner_home`.
    pub fn advance_one_tick(&mut self, partner_home: &Pose, pool: &mut BallPool) {
        let Some(point) = self.future.pop_front() else {
            return;
        };
        if let Some(pos) = point.fixed_pos() {
            let hand = pos + self.hand_offset;
            self.current = Pose {
                hand,
                elbow: self.reach.solve_elbow(hand),
            };
        }
        if !self.future.is_empty() {
            return;
        }

        let Some(index) = self.lock.take() else {
            return;
        };
        let field = *pool.field();
        let Some(ball) = pool.ball_mut(index) else {
            log::debug!("{:?} arm lost ball {} before release", self.side, index);
            return;
        };
        let target = if ball.side == self.side {
            self.home.hand
        } else {
            partner_home.hand
        };
        ball.release_toward(target.x, &field);
        log::debug!(
            "{:?} arm released ball {} toward x={:.1} (dx={:.2}, dy={:.2})",
            self.side,
            index,
            target.x,
            ball.dx,
            ball.dy
        );
    }
}
