//! Tap Juggle entry point
//!
//! Runs a headless demo game in idle mode and records the result.
//!
//! Usage: `tap-juggle [seed] [settings.json]`

use std::path::Path;

use tap_juggle::sim::{Frame, Session, SessionEvent, TickInput};
use tap_juggle::{BestScore, Settings};

/// Stop a demo that never loses after this many ticks (about an hour of play)
const MAX_TICKS: u64 = 180_000;
const BEST_FILE: &str = "tap-juggle-best.json";

fn main() {
    env_logger::init();
    log::info!("Tap Juggle (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Invalid seed {:?}, using 1", arg);
            1
        }),
        None => 1,
    };
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };

    let best_path = Path::new(BEST_FILE);
    let mut best = BestScore::load(best_path);

    let mut session = Session::new(settings, seed);
    session.set_best(best.highest);
    session.start();
    log::info!("Game initialized with seed: {}", seed);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut frames = 0u64;
    let mut draw = |_: &Frame| frames += 1;
    let mut final_score = None;

    while session.time_ticks() < MAX_TICKS {
        for event in session.tick(&input, &mut draw) {
            match event {
                SessionEvent::LevelUp { level, speed_up: true } => println!("LEVEL {level}: SPEED UP !"),
                SessionEvent::LevelUp { level, .. } => println!("LEVEL {level}"),
                SessionEvent::LifeLost { remaining } => println!("Dropped! {remaining} left"),
                SessionEvent::GameOver { score, level } => final_score = Some((score, level)),
                SessionEvent::Scored(_) => {}
            }
        }
        if final_score.is_some() {
            break;
        }
    }

    let (score, level) = final_score.unwrap_or((session.score(), session.level()));
    println!(
        "\nScore {} at level {} after {} ticks ({} frames), best {}",
        score,
        level,
        session.time_ticks(),
        frames,
        session.best()
    );

    if best.record(score, level, seed) {
        println!("New best score!");
        if let Err(e) = best.save(best_path) {
            log::warn!("Could not save best score: {}", e);
        }
    }
}
