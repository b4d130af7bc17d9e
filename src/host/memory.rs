//! In-memory host adapter
//!
//! Holds a project snapshot directly. Used by the test suite and by
//! embedders that load/store project state through their own channel and
//! only need the engine's transformations.

use crate::error::{Result, SyncError};
use crate::host::{HostAdapter, ProjectSnapshot, WriteBatch};

/// A [`HostAdapter`] over an owned in-memory project.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    project: ProjectSnapshot,
}

impl MemoryHost {
    pub fn new(project: ProjectSnapshot) -> Self {
        MemoryHost { project }
    }

    /// Borrow the current project state.
    pub fn project(&self) -> &ProjectSnapshot {
        &self.project
    }

    /// Take the project state out of the host.
    pub fn into_project(self) -> ProjectSnapshot {
        self.project
    }
}

impl HostAdapter for MemoryHost {
    fn read_project(&self) -> Result<ProjectSnapshot> {
        Ok(self.project.clone())
    }

    fn apply(&mut self, batch: WriteBatch) -> Result<()> {
        // Validate the whole batch before touching anything.
        for (index, _) in &batch.track_items {
            if *index >= self.project.tracks.len() {
                return Err(SyncError::HostWrite {
                    reason: format!(
                        "track index {} out of range ({} tracks)",
                        index,
                        self.project.tracks.len()
                    ),
                });
            }
        }

        for (index, items) in batch.track_items {
            self.project.tracks[index].items = items;
        }
        if let Some(regions) = batch.regions {
            self.project.regions = regions;
        }
        Ok(())
    }
}
