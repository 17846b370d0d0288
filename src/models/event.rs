//! Event catalog model.

use serde::{Deserialize, Serialize};

use super::Mode;

/// One entry in the event catalog: a named event, the file reference of its
/// ranking dataset, and the mode it was played under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Display name of the event
    pub name: String,

    /// File reference of the ranking dataset (relative, e.g. "ex/2025_0601.json")
    pub file: String,

    /// Scoring mode of the event
    #[serde(rename = "type")]
    pub mode: Mode,
}

impl EventDescriptor {
    pub fn new(name: impl Into<String>, file: impl Into<String>, mode: Mode) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            mode,
        }
    }
}

/// The ordered list of known events, loaded once at startup.
///
/// Catalog order is oldest-first / newest-last; trend windows are taken from
/// the tail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCatalog {
    events: Vec<EventDescriptor>,
}

impl EventCatalog {
    pub fn new(events: Vec<EventDescriptor>) -> Self {
        Self { events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn all(&self) -> &[EventDescriptor] {
        &self.events
    }

    /// Events of one mode, in catalog order.
    pub fn events_for(&self, mode: Mode) -> Vec<&EventDescriptor> {
        self.events.iter().filter(|e| e.mode == mode).collect()
    }

    /// The most recent event of a mode, if any.
    pub fn latest_for(&self, mode: Mode) -> Option<&EventDescriptor> {
        self.events.iter().rev().find(|e| e.mode == mode)
    }

    /// Look up an event by its file reference.
    pub fn find_by_file(&self, file: &str) -> Option<&EventDescriptor> {
        self.events.iter().find(|e| e.file == file)
    }

    /// The trailing `window` events of a mode in chronological oldest-first
    /// order. Shorter when fewer exist; never padded.
    pub fn trailing_window(&self, mode: Mode, window: usize) -> Vec<&EventDescriptor> {
        let matching = self.events_for(mode);
        let start = matching.len().saturating_sub(window);
        matching[start..].to_vec()
    }
}
