//! MIDI event types
//!
//! Events are a tagged enum over notes, control changes and text payloads.
//! All time values are offsets in ticks relative to the owning item's
//! start, so items can be moved without rewriting their events.

use serde::{Deserialize, Serialize};

use crate::model::Ticks;

// GM control-change numbers for the controller kinds this engine names.
const CC_SUSTAIN: u8 = 64;
const CC_REVERB_SEND: u8 = 91;
const CC_CHORUS_SEND: u8 = 93;
const CC_DELAY_SEND: u8 = 94;

/// Controller kinds recognized by the engine.
///
/// The named variants are the ones the Normalizer cares about; everything
/// else round-trips through [`ControllerKind::Other`] with its raw CC
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerKind {
    Sustain,
    ReverbSend,
    ChorusSend,
    DelaySend,
    Other(u8),
}

impl ControllerKind {
    /// Map a raw MIDI CC number to a controller kind.
    pub fn from_cc(cc: u8) -> Self {
        match cc {
            CC_SUSTAIN => ControllerKind::Sustain,
            CC_REVERB_SEND => ControllerKind::ReverbSend,
            CC_CHORUS_SEND => ControllerKind::ChorusSend,
            CC_DELAY_SEND => ControllerKind::DelaySend,
            other => ControllerKind::Other(other),
        }
    }

    /// The raw MIDI CC number for this kind.
    pub fn cc(&self) -> u8 {
        match self {
            ControllerKind::Sustain => CC_SUSTAIN,
            ControllerKind::ReverbSend => CC_REVERB_SEND,
            ControllerKind::ChorusSend => CC_CHORUS_SEND,
            ControllerKind::DelaySend => CC_DELAY_SEND,
            ControllerKind::Other(cc) => *cc,
        }
    }

    /// True for the ambience send controllers stripped by normalization.
    pub fn is_ambience(&self) -> bool {
        matches!(
            self,
            ControllerKind::ReverbSend | ControllerKind::ChorusSend | ControllerKind::DelaySend
        )
    }
}

/// A note with pitch, velocity, and a start/duration within its item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch (0-127).
    pub pitch: u8,
    /// MIDI velocity (0-127).
    pub velocity: u8,
    /// Start offset within the item, in ticks.
    pub start: Ticks,
    /// Duration in ticks.
    pub duration: Ticks,
}

/// A control-change value at an offset within its item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlEvent {
    pub kind: ControllerKind,
    /// Controller value (0-127).
    pub value: u8,
    /// Offset within the item, in ticks.
    pub offset: Ticks,
}

/// A text payload at an offset within its item.
///
/// Structure items use a text event at offset 0 to carry the region name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEvent {
    pub text: String,
    /// Offset within the item, in ticks.
    pub offset: Ticks,
}

/// An event inside an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Note(NoteEvent),
    Control(ControlEvent),
    Text(TextEvent),
}

impl Event {
    /// The event's offset within its item, in ticks.
    pub fn offset(&self) -> Ticks {
        match self {
            Event::Note(n) => n.start,
            Event::Control(c) => c.offset,
            Event::Text(t) => t.offset,
        }
    }

    /// Convenience constructor for a note event.
    pub fn note(pitch: u8, velocity: u8, start: Ticks, duration: Ticks) -> Self {
        Event::Note(NoteEvent {
            pitch,
            velocity,
            start,
            duration,
        })
    }

    /// Convenience constructor for a control event.
    pub fn control(kind: ControllerKind, value: u8, offset: Ticks) -> Self {
        Event::Control(ControlEvent {
            kind,
            value,
            offset,
        })
    }

    /// Convenience constructor for a text event.
    pub fn text(text: impl Into<String>, offset: Ticks) -> Self {
        Event::Text(TextEvent {
            text: text.into(),
            offset,
        })
    }
}
