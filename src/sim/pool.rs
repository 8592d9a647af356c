//! Ball pool: reusable ball entities, launch parameters and difficulty stage

use glam::Vec2;

use super::ball::{Ball, Field, Side};
use super::events::{EventRegistry, GameEvent};
use super::trajectory::Gravity;
use crate::consts::*;
use crate::settings::ViewBox;
use crate::stage_scale;

/// Fixed-capacity set of balls; the first `count` are active
#[derive(Debug)]
pub struct BallPool {
    /// Unscaled top of the view
    view_top: f32,
    /// Unscaled bottom of the view
    view_bottom: f32,
    field: Field,
    stage: u32,
    balls: Vec<Ball>,
    events: EventRegistry,
}

impl BallPool {
    pub fn new(view: &ViewBox) -> Self {
        let view_top = view.y;
        let view_bottom = view.y + view.height;
        Self {
            view_top,
            view_bottom,
            field: Field {
                top: view_top + TOP_MARGIN,
                bottom: view_bottom,
                ground: view_bottom + GROUND_MARGIN,
                gravity: Gravity::default(),
                count: 0,
                scale: 1.0,
            },
            stage: 0,
            balls: Vec::new(),
            events: EventRegistry::new(),
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn count(&self) -> usize {
        self.field.count
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn scale(&self) -> f32 {
        self.field.scale
    }

    pub fn events_mut(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    /// Active balls
    pub fn active(&self) -> &[Ball] {
        &self.balls[..self.field.count]
    }

    pub fn ball(&self, index: usize) -> Option<&Ball> {
        self.active().get(index)
    }

    pub fn ball_mut(&mut self, index: usize) -> Option<&mut Ball> {
        self.balls[..self.field.count].get_mut(index)
    }

    /// First round: base acceleration, stage 1, launch `count` balls
    pub fn setup_start(&mut self, count: usize) {
        self.field.gravity = Gravity::new(BASE_ACCEL);
        self.set_stage(1);
        self.set_count(count);
        self.set_balls(0, count);
        self.set_directions();
    }

    /// Relaunch the same balls after a drop
    pub fn setup_restart(&mut self) {
        self.set_balls(0, self.field.count);
        self.set_directions();
    }

    /// Speed-up: stronger gravity, next stage, only waiting balls relaunch
    pub fn setup_speed(&mut self, count: usize) {
        self.field.gravity = Gravity::new(self.field.gravity.accel + ACCEL_STEP);
        self.set_stage(self.stage + 1);
        let before = self.field.count;
        self.set_count(count);
        if count > before {
            self.set_balls(before, count - before);
        }

        let launcher = self.launcher_y();
        let dy = self.field.launch_velocity(launcher);
        let ground = self.field.ground;
        for ball in self.balls[..count.min(before)].iter_mut() {
            if !ball.future.is_empty() && ground < ball.pos.y {
                ball.pos.y = launcher;
                ball.dy = dy;
            }
        }
        self.set_directions();
    }

    /// One more ball at the next stage
    pub fn add_ball(&mut self) {
        self.set_stage(self.stage + 1);
        let before = self.field.count;
        self.set_count(before + 1);
        self.set_balls(before, 1);
        self.set_directions();
    }

    /// Advance every active ball one tick, dispatching and returning raised events
    pub fn advance_one_tick(&mut self) -> Vec<GameEvent> {
        let field = self.field;
        let mut raised = Vec::new();
        for ball in self.balls[..field.count].iter_mut() {
            if let Some(event) = ball.advance_one_tick(&field) {
                self.events.emit(&event);
                raised.push(event);
            }
        }
        raised
    }

    /// Most urgent free-falling ball (largest downward velocity)
    pub fn first_ball(&self) -> Option<usize> {
        self.active()
            .iter()
            .enumerate()
            .filter(|(_, ball)| ball.is_free())
            .max_by(|(_, a), (_, b)| a.dy.total_cmp(&b.dy))
            .map(|(index, _)| index)
    }

    /// Current ball positions, in pool order
    pub fn positions(&self) -> Vec<Vec2> {
        self.active().iter().map(|ball| ball.pos).collect()
    }

    fn launcher_y(&self) -> f32 {
        self.field.bottom + LAUNCH_MARGIN
    }

    fn set_stage(&mut self, stage: u32) {
        self.stage = stage;
        let scale = stage_scale(stage);
        self.field.scale = scale;
        self.field.top = self.view_top * scale + TOP_MARGIN;
        self.field.bottom = self.view_bottom * scale.max(1.0);
    }

    fn set_count(&mut self, count: usize) {
        self.field.count = count;
        if self.balls.len() < count {
            self.balls.resize_with(count, Ball::new);
        }
    }

    /// Launch `count` balls from `start`, alternating sides and staggering holds
    fn set_balls(&mut self, start: usize, count: usize) {
        let launcher = self.launcher_y();
        let dx = -1.0 / self.field.scale;
        let dy = self.field.launch_velocity(launcher);
        let mut dir = 1.0;
        for (i, ball) in self.balls[start..start + count].iter_mut().enumerate() {
            ball.setup(
                Vec2::new(LAUNCH_X * dir, launcher),
                dx * dir,
                dy,
                HOLD_TICKS_PER_BALL * i,
            );
            dir = -dir;
        }
    }

    /// Tag each ball with the arm it should end up with
    fn set_directions(&mut self) {
        let count = self.field.count;
        let balls = &mut self.balls[..count];
        if count % 2 == 1 {
            balls.iter_mut().for_each(|ball| ball.side = Side::Cross);
            return;
        }

        let mut rightward = 0usize;
        for ball in balls.iter_mut() {
            ball.side = if ball.dx < 0.0 { Side::Right } else { Side::Left };
            if ball.side == Side::Right {
                rightward += 1;
            }
        }
        let leftward = count - rightward;
        let (from, to, excess) = if rightward > leftward {
            (Side::Right, Side::Left, (rightward - leftward) / 2)
        } else {
            (Side::Left, Side::Right, (leftward - rightward) / 2)
        };
        balls
            .iter_mut()
            .filter(|ball| ball.side == from)
            .take(excess)
            .for_each(|ball| ball.side = to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool() -> BallPool {
        BallPool::new(&ViewBox::default())
    }

    fn side_counts(pool: &BallPool) -> (usize, usize, usize) {
        pool.active().iter().fold((0, 0, 0), |(l, r, c), ball| match ball.side {
            Side::Left => (l + 1, r, c),
            Side::Right => (l, r + 1, c),
            Side::Cross => (l, r, c + 1),
        })
    }

    #[test]
    fn test_setup_start() {
        let mut pool = pool();
        pool.setup_start(3);
        assert_eq!(pool.count(), 3);
        assert_eq!(pool.stage(), 1);
        assert_eq!(pool.scale(), 0.75);
        assert!((pool.field().gravity.accel - BASE_ACCEL).abs() < 1e-6);

        let balls = pool.active();
        assert_eq!(balls[0].pos.x, LAUNCH_X);
        assert_eq!(balls[1].pos.x, -LAUNCH_X);
        assert_eq!(balls[2].pos.x, LAUNCH_X);
        assert!(balls[0].dx < 0.0 && balls[1].dx > 0.0);
        assert_eq!(balls[0].future.len(), 0);
        assert_eq!(balls[1].future.len(), HOLD_TICKS_PER_BALL);
        assert_eq!(balls[2].future.len(), 2 * HOLD_TICKS_PER_BALL);
        assert!(balls.iter().all(|b| b.side == Side::Cross));
    }

    #[test]
    fn test_launch_apex_is_top() {
        let mut pool = pool();
        pool.setup_start(1);
        let ball = &pool.active()[0];
        let half = pool.field().gravity.half;
        let ticks = ((ball.pos.y - pool.field().top) / half).sqrt().round() as u32;
        let apex = ball.predict(pool.field().gravity, ticks);
        assert!((apex.y - pool.field().top).abs() < 0.2);
    }

    #[test]
    fn test_add_ball() {
        let mut pool = pool();
        pool.setup_start(1);
        pool.add_ball();
        assert_eq!(pool.count(), 2);
        assert_eq!(pool.stage(), 2);
        // Newly added ball launches alone with no hold
        let ball = &pool.active()[1];
        assert!(ball.future.is_empty());
        assert_eq!(ball.pos.x, LAUNCH_X);
        let (left, right, cross) = side_counts(&pool);
        assert_eq!(cross, 0);
        assert_eq!(left, 1);
        assert_eq!(right, 1);
    }

    #[test]
    fn test_setup_speed() {
        let mut pool = pool();
        pool.setup_start(4);
        pool.setup_speed(4);
        assert_eq!(pool.stage(), 2);
        assert!((pool.field().gravity.accel - (BASE_ACCEL + ACCEL_STEP)).abs() < 1e-6);
        assert_eq!(pool.count(), 4);
    }

    #[test]
    fn test_setup_speed_relaunches_waiting_balls_below_ground() {
        let mut pool = pool();
        pool.setup_start(2);
        let ground = pool.field().ground;
        {
            let waiting = pool.ball_mut(1).unwrap();
            waiting.pos.y = ground + 50.0;
        }
        pool.setup_speed(2);
        let launcher = pool.field().bottom + LAUNCH_MARGIN;
        let waiting = &pool.active()[1];
        assert_eq!(waiting.pos.y, launcher);
        assert!((waiting.dy - pool.field().launch_velocity(launcher)).abs() < 1e-6);
    }

    #[test]
    fn test_setup_restart_keeps_stage() {
        let mut pool = pool();
        pool.setup_start(2);
        pool.add_ball();
        pool.setup_restart();
        assert_eq!(pool.stage(), 2);
        assert_eq!(pool.count(), 3);
    }

    #[test]
    fn test_first_ball_picks_fastest_free_ball() {
        let mut pool = pool();
        pool.setup_start(3);
        pool.ball_mut(0).unwrap().dy = 2.0;
        let held = pool.ball_mut(1).unwrap();
        held.dy = 9.0; // held balls are not free
        let second = pool.ball_mut(2).unwrap();
        second.future.clear();
        second.dy = 4.0;
        assert_eq!(pool.first_ball(), Some(2));
    }

    #[test]
    fn test_first_ball_ties_take_last() {
        let mut pool = pool();
        pool.setup_start(2);
        pool.ball_mut(1).unwrap().future.clear();
        assert_eq!(pool.first_ball(), Some(1));
    }

    #[test]
    fn test_first_ball_none_when_all_held() {
        let mut pool = pool();
        pool.setup_start(2);
        pool.ball_mut(0).unwrap().setup(Vec2::ZERO, 0.0, 0.0, 5);
        assert_eq!(pool.first_ball(), None);
    }

    /// An uncaught ball keeps raising `Drop` every tick it stays past the
    /// ground line; the session restarts the round on the first one.
    #[test]
    fn test_uncaught_ball_drops_every_tick_past_ground() {
        let mut pool = pool();
        pool.setup_start(1);
        let drops_this_tick = |pool: &mut BallPool| {
            pool.advance_one_tick()
                .iter()
                .filter(|e| **e == GameEvent::Drop)
                .count()
        };

        let mut ticks = 0;
        while drops_this_tick(&mut pool) == 0 {
            ticks += 1;
            assert!(ticks < 1000, "ball never dropped");
        }
        for _ in 0..20 {
            assert_eq!(drops_this_tick(&mut pool), 1);
            let ball = &pool.active()[0];
            assert!(ball.pos.y > pool.field().ground);
            assert!(ball.dy >= 0.0);
        }

        // Restart clears the condition until the ball falls again
        pool.setup_restart();
        assert_eq!(drops_this_tick(&mut pool), 0);
    }

    proptest! {
        #[test]
        fn prop_sides_balanced(start in 1usize..6, added in 0usize..8, speed in proptest::bool::ANY) {
            let mut pool = pool();
            pool.setup_start(start);
            for _ in 0..added {
                pool.add_ball();
            }
            if speed {
                pool.setup_speed(pool.count());
            }
            let (left, right, cross) = side_counts(&pool);
            if pool.count() % 2 == 1 {
                prop_assert_eq!(cross, pool.count());
            } else {
                prop_assert_eq!(cross, 0);
                prop_assert!(left.abs_diff(right) <= 1);
            }
        }
    }
}
