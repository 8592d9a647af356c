//! Motion orchestrator
//!
//! Owns the ball pool and the arm pair and exposes the handful of operations
//! the external game loop needs. Within a tick every ball advances before any
//! arm does.

use glam::Vec2;

use super::arm::Pose;
use super::arms::ArmPair;
use super::events::{EventHandler, EventKind, GameEvent};
use super::pool::BallPool;
use crate::consts::MAX_DISPLAY_SCALE;
use crate::settings::Rig;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Active ball centers
    pub balls: Vec<Vec2>,
    /// Arm poses, right arm first
    pub arms: [Pose; 2],
}

/// Drawing collaborator; receives read-only frames
pub trait Renderer {
    fn draw(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> Renderer for F {
    fn draw(&mut self, frame: &Frame) {
        (self)(frame)
    }
}

/// Ball pool + arm pair
#[derive(Debug)]
pub struct Motion {
    balls: BallPool,
    arms: ArmPair,
}

impl Motion {
    pub fn new(rig: &Rig) -> Self {
        Self {
            balls: BallPool::new(&rig.view),
            arms: ArmPair::new(rig),
        }
    }

    pub fn balls(&self) -> &BallPool {
        &self.balls
    }

    pub fn arms(&self) -> &ArmPair {
        &self.arms
    }

    /// Start, restart or speed up a round
    ///
    /// - `None`: relaunch the current balls
    /// - `Some(count)` with `speed_up`: next difficulty step with `count` balls
    /// - `Some(count)`: fresh start with `count` balls
    pub fn setup(&mut self, count: Option<usize>, speed_up: bool) {
        match count {
            None => self.balls.setup_restart(),
            Some(count) if speed_up => self.balls.setup_speed(count),
            Some(count) => self.balls.setup_start(count),
        }
        self.arms.setup();
        log::debug!(
            "Round setup: {} balls, stage {}, scale {:.2}",
            self.balls.count(),
            self.balls.stage(),
            self.balls.scale()
        );
    }

    pub fn add_ball(&mut self) {
        self.balls.add_ball();
    }

    /// Advance balls, then arms, then hand the new frame to the renderer
    pub fn advance_one_tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Vec<GameEvent> {
        let events = self.balls.advance_one_tick();
        self.arms.advance_one_tick(&mut self.balls);
        self.draw_current(renderer);
        events
    }

    /// Hand the current frame to the renderer without advancing
    pub fn draw_current<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.draw(&self.frame());
    }

    pub fn frame(&self) -> Frame {
        Frame {
            balls: self.balls.positions(),
            arms: self.arms.poses(),
        }
    }

    /// Send an arm after the most urgent free ball; returns whether one went
    pub fn assign_arm_to_next_ball(&mut self) -> bool {
        match self.balls.first_ball() {
            Some(index) => self.arms.set_arm(index, &mut self.balls),
            None => false,
        }
    }

    /// Stage scale clamped to what the renderer can show
    pub fn display_scale(&self) -> f32 {
        self.balls.scale().clamp(1.0, MAX_DISPLAY_SCALE)
    }

    pub fn register_event(&mut self, kind: EventKind, handler: EventHandler) {
        self.balls.events_mut().register(kind, handler);
    }

    /// Register by event name; empty or unknown names are ignored
    pub fn register_named_event(&mut self, name: &str, handler: EventHandler) -> bool {
        self.balls.events_mut().register_named(name, handler)
    }
}
