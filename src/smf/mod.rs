//! Standard MIDI file reading
//!
//! Loads an external SMF (format 0 or 1) into the document model for the
//! import pipeline. Each file track becomes one [`Track`] carrying a single
//! item named after the track, spanning its events; SMF has no item
//! concept, so one item per track is the materialization a DAW import
//! produces.
//!
//! Note pairing keeps a per-(channel, pitch) stack of open note-ons, so
//! overlapping same-pitch notes close in last-on/first-off order. A
//! note-on with velocity zero is treated as a note-off, per common SMF
//! practice.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::{Result, SyncError};
use crate::model::{ControllerKind, Event, Item, Ticks, Track};

/// A parsed external MIDI file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Resolution of the file, in ticks per quarter note.
    pub ticks_per_quarter: u16,
    /// Tracks in declaration order.
    pub tracks: Vec<Track>,
}

/// Read and parse an external MIDI file.
///
/// # Errors
/// * `SourceUnavailable` - the file is missing or unreadable
/// * `MidiParse` - the bytes are not a supported SMF
pub fn read_file(path: &Path) -> Result<SourceFile> {
    let bytes = fs::read(path).map_err(|source| SyncError::SourceUnavailable {
        path: path.display().to_string(),
        source,
    })?;
    read_bytes(&bytes, &path.display().to_string())
}

/// Parse SMF bytes; `label` names the source in errors.
pub fn read_bytes(bytes: &[u8], label: &str) -> Result<SourceFile> {
    let smf = Smf::parse(bytes).map_err(|err| SyncError::MidiParse {
        path: label.to_string(),
        reason: err.to_string(),
    })?;

    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) => tpq.as_int(),
        Timing::Timecode(..) => {
            return Err(SyncError::MidiParse {
                path: label.to_string(),
                reason: "SMPTE timecode timing is not supported".to_string(),
            });
        }
    };

    let mut tracks = Vec::with_capacity(smf.tracks.len());
    for (index, events) in smf.tracks.iter().enumerate() {
        tracks.push(read_track(index, events));
    }

    debug!(
        "parsed {}: {} tracks at {} ticks/quarter",
        label,
        tracks.len(),
        ticks_per_quarter
    );
    Ok(SourceFile {
        ticks_per_quarter,
        tracks,
    })
}

fn read_track(index: usize, events: &[midly::TrackEvent<'_>]) -> Track {
    let mut name: Option<String> = None;
    let mut collected: Vec<Event> = Vec::new();
    // (channel, pitch) -> stack of (start, velocity)
    let mut open_notes: HashMap<(u8, u8), Vec<(Ticks, u8)>> = HashMap::new();
    let mut now: Ticks = 0;
    let mut end: Ticks = 0;

    for event in events {
        now += Ticks::from(event.delta.as_int());
        match event.kind {
            TrackEventKind::Midi { channel, message } => match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                    open_notes
                        .entry((channel.as_int(), key.as_int()))
                        .or_default()
                        .push((now, vel.as_int()));
                }
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    let slot = (channel.as_int(), key.as_int());
                    if let Some((start, velocity)) =
                        open_notes.get_mut(&slot).and_then(Vec::pop)
                    {
                        collected.push(Event::note(
                            slot.1,
                            velocity,
                            start,
                            now.saturating_sub(start).max(1),
                        ));
                        end = end.max(now);
                    } else {
                        warn!("track {index}: note-off for pitch {} with no note-on", slot.1);
                    }
                }
                MidiMessage::Controller { controller, value } => {
                    collected.push(Event::control(
                        ControllerKind::from_cc(controller.as_int()),
                        value.as_int(),
                        now,
                    ));
                    end = end.max(now);
                }
                _ => {}
            },
            TrackEventKind::Meta(meta) => match meta {
                MetaMessage::TrackName(raw) => {
                    if name.is_none() {
                        name = Some(String::from_utf8_lossy(raw).into_owned());
                    }
                }
                MetaMessage::Text(raw) | MetaMessage::Marker(raw) | MetaMessage::Lyric(raw) => {
                    collected.push(Event::text(String::from_utf8_lossy(raw), now));
                    end = end.max(now);
                }
                MetaMessage::EndOfTrack => end = end.max(now),
                _ => {}
            },
            _ => {}
        }
    }

    // Close anything left hanging at the end of the track.
    for ((_, pitch), stack) in open_notes {
        for (start, velocity) in stack {
            warn!("track {index}: note-on for pitch {pitch} never closed, truncating");
            collected.push(Event::note(pitch, velocity, start, end.saturating_sub(start).max(1)));
        }
    }

    let name = name.unwrap_or_else(|| format!("Track {}", index + 1));
    let mut track = Track::new(index, name.clone());
    if !collected.is_empty() {
        let mut item = Item::new(0, end.max(1));
        item.name = Some(name);
        item.events = collected;
        item.sort_events();
        track.items.push(item);
    }
    track
}
