//! Tracks and items
//!
//! A track owns an ordered sequence of items; an item is a time-bounded
//! container of events. The track *name* is the sole identity trusted for
//! cross-file and cross-role matching — indexes are positional only.

use serde::{Deserialize, Serialize};

use crate::model::{Event, Ticks};

/// A time-bounded container of events, owned by exactly one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Start position on the timeline, in ticks.
    pub start: Ticks,
    /// Length in ticks.
    pub length: Ticks,
    /// Optional display name (used by exclusion rules and structure items).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional display color, host-native packed RGB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// Events ordered by offset within the item.
    pub events: Vec<Event>,
}

impl Item {
    /// Create an empty item spanning `[start, start + length)`.
    pub fn new(start: Ticks, length: Ticks) -> Self {
        Item {
            start,
            length,
            name: None,
            color: None,
            events: Vec::new(),
        }
    }

    /// End position on the timeline, in ticks.
    pub fn end(&self) -> Ticks {
        self.start + self.length
    }

    /// The first text event in offset order, if any.
    ///
    /// Structure decoding reads this as the marker name.
    pub fn leading_text(&self) -> Option<&str> {
        self.events
            .iter()
            .filter_map(|ev| match ev {
                Event::Text(t) => Some(t),
                _ => None,
            })
            .min_by_key(|t| t.offset)
            .map(|t| t.text.as_str())
    }

    /// Re-sort events by offset, preserving the order of ties.
    pub fn sort_events(&mut self) {
        self.events.sort_by_key(Event::offset);
    }
}

/// A project or source-file track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Host-reported index, carried as metadata only. The engine
    /// addresses tracks by their position in the snapshot's track list.
    pub index: usize,
    /// Track name; the only identity used for matching.
    pub name: String,
    /// Ordered items.
    pub items: Vec<Item>,
    /// Host selection flag, read-only to the engine.
    #[serde(default)]
    pub selected: bool,
    /// Host visibility flag, read-only to the engine.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Track {
    /// Create an empty track.
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Track {
            index,
            name: name.into(),
            items: Vec::new(),
            selected: false,
            visible: true,
        }
    }

    /// Builder-style helper to attach items.
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }
}
