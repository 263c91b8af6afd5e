//! Error types for playback control

use crate::types::Selection;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// A new session was requested from idle with no credit available
    #[error("Insufficient credit to start playback")]
    AdmissionDenied,

    /// The library could not resolve a selection to a file
    #[error("Selection {0} not found in library")]
    NotFound(Selection),

    /// The audio engine failed to load or start a track
    #[error("Audio engine error: {0}")]
    Engine(#[from] EngineError),

    /// Equalizer band index out of range
    #[error("Invalid equalizer band: {0}")]
    InvalidBand(usize),

    /// Unknown equalizer preset name
    #[error("Unknown equalizer preset: {0}")]
    UnknownPreset(String),
}

/// Failure reported by an [`AudioEngine`](crate::AudioEngine) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The file could not be opened or decoded
    #[error("Failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    /// Playback could not be started on the output device
    #[error("Failed to start playback: {0}")]
    Play(String),

    /// No output device is available
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a [`Library`](crate::Library) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// No file exists for the selection
    #[error("Selection {0} not found")]
    NotFound(Selection),
}

impl From<LibraryError> for PlaybackError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::NotFound(selection) => PlaybackError::NotFound(selection),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
