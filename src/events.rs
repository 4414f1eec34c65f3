//! Change notifications fired after a successful commit.
//!
//! A transaction queues [`CellarEvent`]s while it mutates; they are only
//! delivered once the batch has been written, so listeners never see a
//! change that was rolled back. With the `emitter` feature listeners
//! subscribe by event name (`"bottle.moved"`, ...) and receive the event as
//! a JSON string.

use serde::Serialize;

use crate::location::BottleLocation;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum CellarEvent {
    #[serde(rename = "rack.created")]
    RackCreated { rack_id: String },
    #[serde(rename = "rack.renamed")]
    RackRenamed { rack_id: String, name: String },
    #[serde(rename = "rack.deleted")]
    RackDeleted {
        rack_id: String,
        relocated: Vec<String>,
    },
    #[serde(rename = "bottles.added")]
    BottlesAdded {
        wine_id: String,
        bottle_ids: Vec<String>,
    },
    #[serde(rename = "bottle.moved")]
    BottleMoved {
        bottle_id: String,
        from: BottleLocation,
        to: BottleLocation,
    },
    #[serde(rename = "bottle.consumed")]
    BottleConsumed { wine_id: String, bottle_id: String },
    #[serde(rename = "bottle.gifted")]
    BottleGifted {
        wine_id: String,
        bottle_id: String,
        recipient: String,
    },
    #[serde(rename = "wine.saved")]
    WineSaved { wine_id: String },
    #[serde(rename = "wine.deleted")]
    WineDeleted {
        wine_id: String,
        removed_bottles: usize,
    },
    #[serde(rename = "journal.noted")]
    NoteAdded { entry_id: String },
}

impl CellarEvent {
    /// Listener name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            CellarEvent::RackCreated { .. } => "rack.created",
            CellarEvent::RackRenamed { .. } => "rack.renamed",
            CellarEvent::RackDeleted { .. } => "rack.deleted",
            CellarEvent::BottlesAdded { .. } => "bottles.added",
            CellarEvent::BottleMoved { .. } => "bottle.moved",
            CellarEvent::BottleConsumed { .. } => "bottle.consumed",
            CellarEvent::BottleGifted { .. } => "bottle.gifted",
            CellarEvent::WineSaved { .. } => "wine.saved",
            CellarEvent::WineDeleted { .. } => "wine.deleted",
            CellarEvent::NoteAdded { .. } => "journal.noted",
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"event\":\"{}\"}}", self.name()))
    }
}

/// Fans committed events out to registered listeners.
#[cfg(feature = "emitter")]
pub(crate) struct Notifier {
    emitter: std::sync::Mutex<crate::EventEmitter>,
}

#[cfg(feature = "emitter")]
impl Notifier {
    pub(crate) fn new() -> Self {
        Self {
            emitter: std::sync::Mutex::new(crate::EventEmitter::new()),
        }
    }

    pub(crate) fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.on(event, listener);
            }
            Err(_) => tracing::error!(event, "event emitter poisoned; listener dropped"),
        }
    }

    pub(crate) fn deliver(&self, events: &[CellarEvent]) {
        let Ok(mut emitter) = self.emitter.lock() else {
            tracing::error!("event emitter poisoned; dropping {} events", events.len());
            return;
        };
        for event in events {
            emitter.emit(event.name(), event.to_json());
        }
    }
}
