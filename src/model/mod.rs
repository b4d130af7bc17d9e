//! MIDI Document Model
//!
//! In-memory representation of tracks, items, events and regions. Every
//! operation reads a fresh snapshot of this model from the host, transforms
//! it, and writes the result back; nothing in the model persists across
//! invocations.

mod event;
mod region;
mod track;

pub use event::{ControlEvent, ControllerKind, Event, NoteEvent, TextEvent};
pub use region::{Region, StructureMarker};
pub use track::{Item, Track};

/// Domain-independent time unit: quarter-note ticks.
pub type Ticks = u64;
