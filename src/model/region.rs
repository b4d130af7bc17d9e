//! Timeline regions and structure markers
//!
//! Regions belong to the project timeline, independent of tracks. A
//! structure marker is a derived view: the (position, name, color) triple
//! encoded in or decoded from a structure-track item. Markers are never
//! stored; they exist only inside one conversion run.

use serde::{Deserialize, Serialize};

use crate::model::Ticks;

/// A named timeline interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    /// Start position in ticks.
    pub start: Ticks,
    /// End position in ticks; always greater than `start`.
    pub end: Ticks,
    /// Optional display color, host-native packed RGB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

impl Region {
    pub fn new(name: impl Into<String>, start: Ticks, end: Ticks) -> Self {
        Region {
            name: name.into(),
            start,
            end,
            color: None,
        }
    }
}

/// A region boundary decoded from (or about to be encoded into) a
/// structure-track item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureMarker {
    /// Position on the timeline, in ticks.
    pub position: Ticks,
    pub name: String,
    pub color: Option<u32>,
}
