//! Normalizer
//!
//! Canonicalizes the items of selected voice tracks in place: strips the
//! ambience send controllers, overwrites every note velocity with the
//! configured default, and snaps note starts and durations to the
//! configured grids. Item boundaries are never altered; a note pushed past
//! its item's length is reported, not clipped.
//!
//! The whole pass is idempotent: every rewritten value is a fixed point of
//! its own rewrite, so applying the normalizer twice equals applying it
//! once.

use serde::{Deserialize, Serialize};

use crate::engine::summary::Warning;
use crate::error::{Result, SyncError};
use crate::model::{ControllerKind, Event, Item, Ticks};

/// Options for one normalization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Name prefix selecting the voice tracks.
    pub prefix: String,
    /// Velocity written onto every note (0-127).
    pub default_velocity: u8,
    /// Grid for note starts, in ticks.
    pub quantize_grid_ticks: Ticks,
    /// Grid for note durations, in ticks.
    pub duration_grid_ticks: Ticks,
    /// Extra CC numbers stripped alongside the ambience sends.
    pub extra_ambience: Vec<u8>,
}

impl NormalizeOptions {
    /// Options with the duration grid equal to the start grid and no
    /// extra stripped controllers.
    pub fn new(prefix: impl Into<String>, default_velocity: u8, grid_ticks: Ticks) -> Self {
        NormalizeOptions {
            prefix: prefix.into(),
            default_velocity,
            quantize_grid_ticks: grid_ticks,
            duration_grid_ticks: grid_ticks,
            extra_ambience: Vec::new(),
        }
    }

    /// Check option ranges.
    ///
    /// Options built through [`crate::config::Config`] are already valid,
    /// but the operation entry point accepts options directly, so it
    /// re-checks them before touching the project.
    pub fn validate(&self) -> Result<()> {
        if self.default_velocity > 127 {
            return Err(SyncError::Config {
                option: "default_velocity".to_string(),
                reason: format!("{} out of range 0-127", self.default_velocity),
            });
        }
        if self.quantize_grid_ticks == 0 {
            return Err(SyncError::Config {
                option: "quantize_grid_ticks".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.duration_grid_ticks == 0 {
            return Err(SyncError::Config {
                option: "duration_grid_ticks".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }

    fn strips(&self, kind: ControllerKind) -> bool {
        kind.is_ambience() || self.extra_ambience.contains(&kind.cc())
    }
}

/// Snap to the nearest grid multiple; ties round toward the later point.
fn snap(value: Ticks, grid: Ticks) -> Ticks {
    ((2 * value + grid) / (2 * grid)) * grid
}

/// Rewrite one item's events in place, returning boundary warnings.
///
/// `track_name` only labels the warnings. The options must have passed
/// [`NormalizeOptions::validate`]; the grid math divides by the grids.
pub fn normalize_item(item: &mut Item, options: &NormalizeOptions, track_name: &str) -> Vec<Warning> {
    // 1. controller stripping
    item.events.retain(|event| match event {
        Event::Control(control) => !options.strips(control.kind),
        _ => true,
    });

    // 2. velocity defaulting and quantization, in original start order
    let mut note_order: Vec<usize> = item
        .events
        .iter()
        .enumerate()
        .filter(|(_, event)| matches!(event, Event::Note(_)))
        .map(|(index, _)| index)
        .collect();
    note_order.sort_by_key(|&index| item.events[index].offset());

    let grid = options.quantize_grid_ticks;
    let mut warnings = Vec::new();
    let mut prev_start: Option<Ticks> = None;
    for index in note_order {
        let Event::Note(note) = &mut item.events[index] else {
            unreachable!("note_order only holds note indices");
        };

        note.velocity = options.default_velocity;

        let mut start = snap(note.start, grid);
        // ordering conflict: push the later note forward grid by grid
        if let Some(prev) = prev_start {
            while start < prev {
                start += grid;
            }
        }
        prev_start = Some(start);
        note.start = start;
        note.duration = snap(note.duration, options.duration_grid_ticks)
            .max(options.duration_grid_ticks);

        let note_end = note.start + note.duration;
        if note_end > item.length {
            warnings.push(Warning::NoteExceedsItem {
                track: track_name.to_string(),
                item_start: item.start,
                note_end,
                item_length: item.length,
            });
        }
    }

    item.sort_events();
    warnings
}
