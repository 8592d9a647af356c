//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only, driven by the caller
//! - Seeded RNG only
//! - Stable iteration order (balls by pool index, right arm before left)
//! - No rendering or platform dependencies

pub mod arm;
pub mod arms;
pub mod ball;
pub mod events;
pub mod motion;
pub mod pool;
pub mod reach;
pub mod session;
pub mod trajectory;

pub use arm::{Arm, Pose};
pub use arms::{ArmPair, LEFT, RIGHT, intercept_delay, orbit_paths};
pub use ball::{Ball, CatchTag, Field, Side, Waypoint};
pub use events::{EventHandler, EventKind, EventRegistry, GameEvent};
pub use motion::{Frame, Motion, Renderer};
pub use pool::BallPool;
pub use reach::ReachEllipse;
pub use session::{Session, SessionEvent, SessionPhase, TickInput};
pub use trajectory::{Flight, Gravity, advance, launch_velocity};
