//! Error handling for Scorelink
//!
//! Fatal conditions abort an operation before anything is written back to
//! the host project. Non-fatal conditions are *not* errors here: they are
//! collected as [`crate::engine::Warning`] values and reported once, in
//! aggregate, inside the operation summary.

use thiserror::Error;

/// Result type alias for Scorelink operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for Scorelink operations
#[derive(Error, Debug)]
pub enum SyncError {
    // Configuration Errors
    #[error("Invalid configuration option `{option}`: {reason}")]
    Config { option: String, reason: String },

    // Source File Errors
    #[error("Source MIDI file unavailable: {path}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed MIDI file {path}: {reason}")]
    MidiParse { path: String, reason: String },

    // Project Errors
    #[error("Track not found in project: {name}")]
    TrackNotFound { name: String },

    #[error("Host rejected write: {reason}")]
    HostWrite { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::Config { .. } => "CONFIG_ERROR",
            SyncError::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            SyncError::MidiParse { .. } => "MIDI_PARSE_ERROR",
            SyncError::TrackNotFound { .. } => "TRACK_NOT_FOUND",
            SyncError::HostWrite { .. } => "HOST_WRITE_ERROR",
            SyncError::Io(_) => "IO_ERROR",
            SyncError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True if the operation failed before any project mutation.
    ///
    /// Every fatal error is raised during the in-memory transformation
    /// phase, so this holds for all variants except a host write rejection,
    /// and the host guarantees those are atomic per track.
    pub fn aborted_before_write(&self) -> bool {
        !matches!(self, SyncError::HostWrite { .. })
    }
}
