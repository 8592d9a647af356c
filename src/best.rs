//! Best score record
//!
//! One JSON object (`{"highest": ..}`) kept next to the game. The level and
//! seed of the run that set it are stored too, so a demo record can be
//! replayed with `tap-juggle <seed>`.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// The best run so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BestScore {
    pub highest: u64,
    /// Level the record was set at
    pub level: u32,
    /// Session seed that produced it
    pub seed: u64,
}

impl BestScore {
    /// Keep this run if it beats the record; returns whether it did
    pub fn record(&mut self, score: u64, level: u32, seed: u64) -> bool {
        if score <= self.highest {
            return false;
        }
        *self = Self {
            highest: score,
            level,
            seed,
        };
        true
    }

    /// Missing or unreadable files count as no record yet
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No best score at {}, starting at 0", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str::<BestScore>(&json) {
            Ok(best) => {
                log::info!("Best score {} (level {}, seed {})", best.highest, best.level, best.seed);
                best
            }
            Err(e) => {
                log::warn!("Ignoring corrupt best score in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        log::debug!("Best score {} saved to {}", self.highest, path.display());
        Ok(())
    }
}
