//! Game events raised by the simulation
//!
//! At most one handler per event kind. Handlers run synchronously inside the
//! tick that raised the event.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event kinds a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A ball fell past the ground line
    Drop,
    /// A caught ball was released
    Score,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Drop => "drop",
            EventKind::Score => "score",
        }
    }

    /// Parse an event name ("drop" / "score")
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "drop" => Some(EventKind::Drop),
            "score" => Some(EventKind::Score),
            _ => None,
        }
    }
}

/// An event raised during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Drop,
    Score { score: u64 },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Drop => EventKind::Drop,
            GameEvent::Score { .. } => EventKind::Score,
        }
    }
}

/// Event handler callback
pub type EventHandler = Box<dyn FnMut(&GameEvent)>;

/// Dispatch table with one optional handler per event kind
#[derive(Default)]
pub struct EventRegistry {
    drop: Option<EventHandler>,
    score: Option<EventHandler>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the handler for `kind`, replacing any previous one
    pub fn register(&mut self, kind: EventKind, handler: EventHandler) {
        *self.slot(kind) = Some(handler);
    }

    /// Install a handler by event name; empty or unknown names are ignored
    pub fn register_named(&mut self, name: &str, handler: EventHandler) -> bool {
        match EventKind::from_name(name) {
            Some(kind) => {
                self.register(kind, handler);
                true
            }
            None => {
                log::debug!("Ignoring handler for unknown event {:?}", name);
                false
            }
        }
    }

    pub fn has(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Drop => self.drop.is_some(),
            EventKind::Score => self.score.is_some(),
        }
    }

    /// Run the handler registered for this event, if any
    pub fn emit(&mut self, event: &GameEvent) {
        if let Some(handler) = self.slot(event.kind()) {
            handler(event);
        }
    }

    fn slot(&mut self, kind: EventKind) -> &mut Option<EventHandler> {
        match kind {
            EventKind::Drop => &mut self.drop,
            EventKind::Score => &mut self.score,
        }
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("drop", &self.drop.is_some())
            .field("score", &self.score.is_some())
            .finish()
    }
}
