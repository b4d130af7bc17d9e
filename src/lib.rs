//! Scorelink - MIDI Track Synchronization & Normalization Engine
//!
//! Keeps a DAW project's MIDI track content synchronized with an external
//! score/arrangement toolchain. Three pipelines share one document model
//! and one name-prefix addressing convention:
//!
//! 1. **Import** - match project tracks to tracks of an external MIDI file
//!    and replace their content under a filtering policy.
//! 2. **Structure conversion** - map the project's named timeline regions
//!    to and from a designated "structure track" whose items encode region
//!    boundaries and names.
//! 3. **Normalization** - canonicalize voice-track items: strip ambience
//!    controllers, default velocities, quantize timing.
//!
//! # Architecture
//!
//! Every operation runs as one synchronous action: read a full project
//! snapshot through a [`host::HostAdapter`], transform it in memory, then
//! apply a single [`host::WriteBatch`]. Fatal errors abort before any
//! write; non-fatal conditions accumulate into the operation summary.

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod model;
pub mod smf;

pub use config::Config;
pub use engine::{
    import_and_replace, normalize_voice_tracks, regions_to_structure, structure_to_regions,
};
pub use error::{Result, SyncError};
