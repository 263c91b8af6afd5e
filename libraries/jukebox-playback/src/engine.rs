//! Collaborator traits
//!
//! The controller never touches an audio device or the filesystem directly.
//! Hosts provide an [`AudioEngine`] (rodio on desktop, a mock in tests) and a
//! [`Library`] that knows where selections live on disk.

use crate::error::{EngineError, LibraryError};
use crate::types::Selection;
use std::path::{Path, PathBuf};

/// Single-file audio output
///
/// Holds at most one loaded file at a time. Implementations may be `!Send`
/// (audio output handles often are); the controller is driven from one thread.
pub trait AudioEngine {
    /// Load a file, replacing whatever was loaded before
    fn load(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Start the loaded file from the beginning
    fn play(&mut self) -> Result<(), EngineError>;

    fn pause(&mut self);

    fn resume(&mut self);

    /// Halt output and unload
    fn stop(&mut self);

    /// Output volume, 0.0-1.0
    fn set_volume(&mut self, volume: f32);

    /// Whether the engine is still producing (or holding paused) audio
    ///
    /// Only consulted while a session is playing, as the end-of-track signal.
    fn is_busy(&self) -> bool;
}

/// Maps selections to audio files
pub trait Library {
    /// Resolve a selection to a playable file
    ///
    /// # Returns
    /// * `Ok(path)` - File exists for this album/track
    /// * `Err(LibraryError::NotFound)` - Unknown album or track index
    fn resolve(&self, selection: Selection) -> Result<PathBuf, LibraryError>;
}
