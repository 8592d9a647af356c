//! Game session rules
//!
//! Lives, score, level timing and the idle/demo player, layered over the
//! motion orchestrator. Time is counted in ticks only.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arms::intercept_delay;
use super::events::GameEvent;
use super::motion::{Motion, Renderer};
use crate::settings::Settings;

/// Balls kept on screen after a speed-up
pub const SPEED_UP_BALLS: usize = 5;
/// Idle player waits until the catch point is this far above the arm homes
pub const IDLE_REACH_MARGIN: f32 = 40.0;
/// Chance per tick that the idle player hesitates
pub const IDLE_HESITATION: f64 = 0.25;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a start
    Idle,
    /// Active gameplay
    Running,
    /// Out of lives
    GameOver,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Send an arm after the most urgent ball (click/tap/space)
    pub tap: bool,
    /// Idle/demo mode - the session taps for itself
    pub idle_mode: bool,
}

/// What happened to the session during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Scored(u64),
    LifeLost { remaining: u8 },
    LevelUp { level: u32, speed_up: bool },
    GameOver { score: u64, level: u32 },
}

/// A game from start to game over
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    motion: Motion,
    seed: u64,
    rng: Pcg32,
    phase: SessionPhase,
    lives: u8,
    score: u64,
    best: u64,
    level: u32,
    /// Ticks spent in the current level
    level_ticks: u32,
    time_ticks: u64,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let motion = Motion::new(&settings.rig);
        Self {
            lives: settings.lives,
            settings,
            motion,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Idle,
            score: 0,
            best: 0,
            level: 0,
            level_ticks: 0,
            time_ticks: 0,
        }
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Seed the best score from a stored leaderboard
    pub fn set_best(&mut self, best: u64) {
        self.best = self.best.max(best);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Start a new game with one ball
    pub fn start(&mut self) {
        self.lives = self.settings.lives;
        self.score = 0;
        self.level = 1;
        self.level_ticks = 0;
        self.motion.setup(Some(1), false);
        self.phase = SessionPhase::Running;
        log::info!("Game started with {} lives (seed {})", self.lives, self.seed);
    }

    /// Advance the session by one tick
    pub fn tick<R: Renderer + ?Sized>(&mut self, input: &TickInput, renderer: &mut R) -> Vec<SessionEvent> {
        if self.phase != SessionPhase::Running {
            return Vec::new();
        }
        self.time_ticks += 1;

        if input.tap || (input.idle_mode && self.idle_wants_tap()) {
            self.motion.assign_arm_to_next_ball();
        }

        let mut events = Vec::new();
        let raised = self.motion.advance_one_tick(renderer);
        for event in &raised {
            if let GameEvent::Score { score } = event {
                self.score = self.score.saturating_add(*score);
                self.best = self.best.max(self.score);
                events.push(SessionEvent::Scored(*score));
            }
        }

        if raised.contains(&GameEvent::Drop) {
            events.push(self.lose_life());
            return events;
        }

        self.level_ticks += 1;
        let seconds = self.level.min(5) * 5 + 5;
        if self.level_ticks > self.settings.ticks_for_seconds(seconds) {
            events.push(self.next_level());
        }
        events
    }

    fn lose_life(&mut self) -> SessionEvent {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            log::info!("Ball dropped, {} lives left", self.lives);
            self.motion.setup(None, false);
            return SessionEvent::LifeLost {
                remaining: self.lives,
            };
        }

        self.phase = SessionPhase::GameOver;
        log::info!("Game over: score {} at level {}", self.score, self.level);
        SessionEvent::GameOver {
            score: self.score,
            level: self.level,
        }
    }

    fn next_level(&mut self) -> SessionEvent {
        let level = self.level + 1;
        let speed_up = level > 5 && level % 10 == 5;
        if speed_up {
            self.motion.setup(Some(SPEED_UP_BALLS), true);
            log::info!("Level {}: speed up", level);
        } else {
            self.motion.add_ball();
            log::info!("Level {}", level);
        }
        self.level = level;
        self.level_ticks = 0;
        SessionEvent::LevelUp { level, speed_up }
    }

    /// The most urgent ball is falling into reach of the arms
    fn idle_wants_tap(&mut self) -> bool {
        let balls = self.motion.balls();
        let Some(ball) = balls.first_ball().and_then(|index| balls.ball(index)) else {
            return false;
        };
        if ball.dy <= 0.0 {
            return false;
        }

        let delay = intercept_delay(balls.count()) as u32;
        let catch = ball.predict(balls.field().gravity, delay);
        let rig = &self.settings.rig;
        let line = rig.right.hand.y.min(rig.left.hand.y) - IDLE_REACH_MARGIN;
        catch.y >= line && !self.rng.random_bool(IDLE_HESITATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::motion::Frame;

    fn no_draw() -> impl FnMut(&Frame) {
        |_: &Frame| {}
    }

    fn run_until<F>(session: &mut Session, input: &TickInput, limit: usize, mut done: F) -> Vec<SessionEvent>
    where
        F: FnMut(&SessionEvent) -> bool,
    {
        let mut draw = no_draw();
        let mut all = Vec::new();
        for _ in 0..limit {
            let events = session.tick(input, &mut draw);
            let finished = events.iter().any(&mut done);
            all.extend(events);
            if finished {
                break;
            }
        }
        all
    }

    #[test]
    fn test_idle_session_does_nothing() {
        let mut session = Session::new(Settings::default(), 1);
        let events = session.tick(&TickInput::default(), &mut no_draw());
        assert!(events.is_empty());
        assert_eq!(session.time_ticks(), 0);
    }

    #[test]
    fn test_start() {
        let mut session = Session::new(Settings::default(), 1);
        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.level(), 1);
        assert_eq!(session.motion().balls().count(), 1);
    }

    #[test]
    fn test_drops_cost_lives_until_game_over() {
        let mut session = Session::new(Settings::default(), 1);
        session.start();
        let input = TickInput::default();

        let events = run_until(&mut session, &input, 1000, |e| {
            matches!(e, SessionEvent::LifeLost { .. })
        });
        assert_eq!(events.last(), Some(&SessionEvent::LifeLost { remaining: 2 }));
        // Ball is relaunched from below the bottom line
        let field = *session.motion().balls().field();
        let ball = session.motion().balls().ball(0).unwrap();
        assert!(ball.pos.y < field.ground);
        assert!(ball.dy < 0.0);

        let events = run_until(&mut session, &input, 3000, |e| {
            matches!(e, SessionEvent::GameOver { .. })
        });
        assert_eq!(events.last(), Some(&SessionEvent::GameOver { score: 0, level: 1 }));
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(session.lives(), 0);
        assert!(session.tick(&input, &mut no_draw()).is_empty());
    }

    #[test]
    fn test_tap_catch_scores() {
        let mut session = Session::new(Settings::default(), 1);
        session.start();
        let mut draw = no_draw();
        while session.motion().balls().ball(0).unwrap().dy <= 0.0 {
            session.tick(&TickInput::default(), &mut draw);
        }
        let tap = TickInput {
            tap: true,
            ..Default::default()
        };
        session.tick(&tap, &mut draw);
        assert!(session.motion().arms().holder(0).is_some());

        let events = run_until(&mut session, &TickInput::default(), 100, |e| {
            matches!(e, SessionEvent::Scored(_))
        });
        let scored: u64 = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Scored(s) => Some(*s),
                _ => None,
            })
            .sum();
        assert!(scored > 0);
        assert_eq!(session.score(), scored);
        assert_eq!(session.best(), scored);
    }

    #[test]
    fn test_score_saturates() {
        let mut session = Session::new(Settings::default(), 1);
        session.start();
        session.score = u64::MAX - 1;
        let mut draw = no_draw();
        while session.motion().balls().ball(0).unwrap().dy <= 0.0 {
            session.tick(&TickInput::default(), &mut draw);
        }
        let tap = TickInput {
            tap: true,
            ..Default::default()
        };
        session.tick(&tap, &mut draw);
        let events = run_until(&mut session, &TickInput::default(), 100, |e| {
            matches!(e, SessionEvent::Scored(_))
        });
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Scored(_))));
        assert_eq!(session.score(), u64::MAX);
        assert_eq!(session.best(), u64::MAX);
    }

    #[test]
    fn test_level_up_adds_ball() {
        let settings = Settings {
            tick_ms: 1000,
            ..Default::default()
        };
        let mut session = Session::new(settings, 1);
        session.start();

        // Level 1 lasts 10 seconds = 10 ticks
        let events = run_until(&mut session, &TickInput::default(), 50, |e| {
            matches!(e, SessionEvent::LevelUp { .. })
        });
        assert_eq!(
            events.last(),
            Some(&SessionEvent::LevelUp {
                level: 2,
                speed_up: false
            })
        );
        assert_eq!(session.time_ticks(), 11);
        assert_eq!(session.motion().balls().count(), 2);
        assert_eq!(session.motion().balls().stage(), 2);
    }

    #[test]
    fn test_speed_up_at_level_fifteen() {
        let settings = Settings {
            tick_ms: 30_000,
            ..Default::default()
        };
        let mut session = Session::new(settings, 1);
        session.start();

        let events = run_until(&mut session, &TickInput::default(), 100, |e| {
            matches!(e, SessionEvent::LevelUp { speed_up: true, .. })
        });
        assert_eq!(
            events.last(),
            Some(&SessionEvent::LevelUp {
                level: 15,
                speed_up: true
            })
        );
        let levels = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::LevelUp { .. }))
            .count();
        assert_eq!(levels, 14);
        assert_eq!(session.motion().balls().count(), SPEED_UP_BALLS);
    }

    #[test]
    fn test_idle_mode_is_deterministic() {
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut first = Session::new(Settings::default(), 99999);
        let mut second = Session::new(Settings::default(), 99999);
        first.start();
        second.start();

        let mut draw = no_draw();
        for _ in 0..3000 {
            first.tick(&input, &mut draw);
            second.tick(&input, &mut draw);
        }

        assert_eq!(first.time_ticks(), second.time_ticks());
        assert_eq!(first.score(), second.score());
        assert_eq!(first.lives(), second.lives());
        assert_eq!(first.level(), second.level());
        assert_eq!(first.motion().frame(), second.motion().frame());
    }

    #[test]
    fn test_idle_mode_catches() {
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut session = Session::new(Settings::default(), 7);
        session.start();
        let events = run_until(&mut session, &input, 400, |e| matches!(e, SessionEvent::Scored(_)));
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Scored(_))));
    }
}
