//! Host Adapter seam
//!
//! The engine never talks to a DAW directly. It reads a full
//! [`ProjectSnapshot`] at the start of an operation, transforms it in
//! memory, and hands the host a [`WriteBatch`] describing every mutation at
//! once. The host applies the batch atomically per track, which is what
//! makes whole-track replacement safe: either a track gets its complete new
//! item list or it keeps its old one.

mod memory;

pub use memory::MemoryHost;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Item, Region, Track};

/// A complete read of the project at the start of an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub tracks: Vec<Track>,
    pub regions: Vec<Region>,
}

impl ProjectSnapshot {
    /// Find a track's position in the snapshot by exact name.
    ///
    /// Write batches address tracks by this position; the snapshot's
    /// stored `Track::index` field is host metadata and is not trusted
    /// for addressing.
    pub fn track_position(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }

    /// Find a track by exact name.
    pub fn track_by_name(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }
}

/// Every mutation of one operation, staged before any write happens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch {
    /// Whole-track item replacements, keyed by the track's position in
    /// the snapshot it was read from.
    pub track_items: Vec<(usize, Vec<Item>)>,
    /// Full replacement of the project's region list, if the operation
    /// touches regions at all.
    pub regions: Option<Vec<Region>>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a whole-track item replacement.
    pub fn replace_track_items(&mut self, track_index: usize, items: Vec<Item>) {
        self.track_items.push((track_index, items));
    }

    /// Stage a full region-list replacement.
    pub fn replace_regions(&mut self, regions: Vec<Region>) {
        self.regions = Some(regions);
    }

    /// True if the batch carries no mutations.
    pub fn is_empty(&self) -> bool {
        self.track_items.is_empty() && self.regions.is_none()
    }
}

/// Project access primitives the engine requires from its host.
///
/// Implementations wrap whatever project-editing capability the DAW
/// exposes; [`MemoryHost`] is the in-process implementation used by the
/// test suite and by embedders that marshal snapshots themselves.
pub trait HostAdapter {
    /// Read a fresh snapshot of every track, item, event and region.
    fn read_project(&self) -> Result<ProjectSnapshot>;

    /// Apply a staged batch, atomically per track.
    ///
    /// Must validate the whole batch before mutating anything; a rejected
    /// batch leaves the project untouched.
    fn apply(&mut self, batch: WriteBatch) -> Result<()>;
}
