//! Status line projection.
//!
//! Derives the score/health/player-count text for the local ship. When the
//! local ship is missing from the snapshot the sink keeps whatever it showed
//! last.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use arena_shared::world::{LocalIdentity, WorldSnapshot};
use tracing::debug;

/// One of the three status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusField {
    Score,
    Health,
    Players,
}

impl StatusField {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusField::Score => "score",
            StatusField::Health => "health",
            StatusField::Players => "players",
        }
    }
}

/// Display target for status text.
pub trait StatusSink {
    fn set_text(&mut self, field: StatusField, text: &str);
}

/// Lets another thread read the status while the loop owns the sink.
impl<T: StatusSink> StatusSink for Arc<Mutex<T>> {
    fn set_text(&mut self, field: StatusField, text: &str) {
        self.lock()
            .unwrap_or_else(|e| e.into_inner())
            .set_text(field, text);
    }
}

/// Status text for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub score: String,
    pub health: String,
    pub players: String,
}

/// Status text for the local ship, or `None` if it is not in the snapshot.
pub fn project(snapshot: &WorldSnapshot, identity: &LocalIdentity) -> Option<StatusText> {
    let me = snapshot.local_player(identity)?;
    Some(StatusText {
        score: format!("Score: {}", me.score),
        health: format!("Health: {}", me.health.max(0)),
        players: format!("Players: {}", snapshot.player_count()),
    })
}

/// Projects into `sink`. Returns whether anything was written.
pub fn project_into(
    snapshot: &WorldSnapshot,
    identity: &LocalIdentity,
    sink: &mut dyn StatusSink,
) -> bool {
    match project(snapshot, identity) {
        Some(text) => {
            sink.set_text(StatusField::Score, &text.score);
            sink.set_text(StatusField::Health, &text.health);
            sink.set_text(StatusField::Players, &text.players);
            true
        }
        None => false,
    }
}

/// In-memory status fields. Logs a field at debug level when its text changes.
#[derive(Debug, Default, Clone)]
pub struct StatusBoard {
    fields: BTreeMap<StatusField, String>,
}

impl StatusBoard {
    pub fn get(&self, field: StatusField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// All fields joined on one line, in a fixed order.
    pub fn line(&self) -> String {
        self.fields
            .values()
            .cloned()
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl StatusSink for StatusBoard {
    fn set_text(&mut self, field: StatusField, text: &str) {
        if self.get(field) == Some(text) {
            return;
        }
        debug!(field = field.as_str(), text, "Status changed");
        self.fields.insert(field, text.to_string());
    }
}
