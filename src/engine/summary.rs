//! Operation summaries and accumulated warnings
//!
//! Non-fatal conditions never abort a pipeline; they are collected here and
//! reported once at the end of a successful run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Ticks;

/// A non-fatal condition accumulated during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// A structure item carried no text event to name its marker.
    MarkerWithoutName { position: Ticks },
    /// A marker name collided with an earlier marker and was skipped.
    DuplicateMarkerName { name: String, position: Ticks },
    /// A quantized note now ends past its item's original length.
    NoteExceedsItem {
        track: String,
        item_start: Ticks,
        note_end: Ticks,
        item_length: Ticks,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MarkerWithoutName { position } => {
                write!(f, "structure item at {position} has no name event; skipped")
            }
            Warning::DuplicateMarkerName { name, position } => {
                write!(f, "duplicate marker name `{name}` at {position}; skipped")
            }
            Warning::NoteExceedsItem {
                track,
                item_start,
                note_end,
                item_length,
            } => write!(
                f,
                "track `{track}`: note in item at {item_start} ends at {note_end}, \
                 past item length {item_length}"
            ),
        }
    }
}

impl Warning {
    /// The skipped marker's display name, for summary reporting.
    pub fn marker_name(&self) -> Option<String> {
        match self {
            Warning::DuplicateMarkerName { name, .. } => Some(name.clone()),
            Warning::MarkerWithoutName { position } => {
                Some(format!("(unnamed item at {position})"))
            }
            Warning::NoteExceedsItem { .. } => None,
        }
    }
}

/// Result of [`crate::engine::import_and_replace`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Items written to matched project tracks.
    pub imported_items: usize,
    /// Source items rejected by exclusion rules.
    pub rejected_items: usize,
    /// Project tracks that qualified for matching but found no source
    /// track; left untouched.
    pub unmatched_tracks: Vec<String>,
}

/// Result of [`crate::engine::regions_to_structure`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSummary {
    /// Items created on the structure track.
    pub created_items: usize,
}

/// Result of [`crate::engine::structure_to_regions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSummary {
    /// Regions written to the project timeline.
    pub created_regions: usize,
    /// Display names of markers that failed to decode.
    pub skipped_markers: Vec<String>,
}

/// Result of [`crate::engine::normalize_voice_tracks`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeSummary {
    /// Items rewritten across the selected voice tracks.
    pub normalized_items: usize,
    pub warnings: Vec<Warning>,
}
