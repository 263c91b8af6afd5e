//! Jukebox - Playback Control
//!
//! Platform-agnostic playback control for a coin-operated jukebox.
//!
//! This crate provides:
//! - Credit ledger gating new playback sessions
//! - FIFO selection queue
//! - Admission control (a credit per idle → playing transition, free otherwise)
//! - Tick-driven session state machine (Idle, Playing, Paused)
//! - Five-band equalizer model deriving a volume multiplier
//! - Skip-on-failure for unplayable selections
//!
//! # Architecture
//!
//! `jukebox-playback` never touches an audio device or the filesystem:
//! - Audio output is an injected [`AudioEngine`]
//! - File lookup is an injected [`Library`]
//! - No threads, no locks; the host calls [`PlayerController::tick`] once per frame
//!
//! A host sharing the controller between threads wraps the whole controller
//! in a single mutex so enqueue, tick and the other calls stay atomic.
//!
//! # Example: Credit-Gated Playback
//!
//! ```rust
//! use jukebox_playback::{
//!     AudioEngine, EngineError, JukeboxConfig, Library, LibraryError, PlaybackError,
//!     PlayerController, Selection, SessionState,
//! };
//! use std::path::{Path, PathBuf};
//!
//! struct SilentEngine {
//!     busy: bool,
//! }
//!
//! impl AudioEngine for SilentEngine {
//!     fn load(&mut self, _path: &Path) -> Result<(), EngineError> { Ok(()) }
//!     fn play(&mut self) -> Result<(), EngineError> { self.busy = true; Ok(()) }
//!     fn pause(&mut self) {}
//!     fn resume(&mut self) {}
//!     fn stop(&mut self) { self.busy = false; }
//!     fn set_volume(&mut self, _volume: f32) {}
//!     fn is_busy(&self) -> bool { self.busy }
//! }
//!
//! struct Albums;
//!
//! impl Library for Albums {
//!     fn resolve(&self, selection: Selection) -> Result<PathBuf, LibraryError> {
//!         Ok(PathBuf::from(format!("/music/{:02}/{:02}.mp3", selection.album_id, selection.track_index)))
//!     }
//! }
//!
//! let mut player = PlayerController::new(
//!     JukeboxConfig::default(),
//!     Box::new(SilentEngine { busy: false }),
//!     Box::new(Albums),
//! );
//!
//! // No credit, nothing playing: rejected
//! let first = Selection::new(1, 0);
//! assert_eq!(player.enqueue_selection(first), Err(PlaybackError::AdmissionDenied));
//!
//! // One credit starts a session
//! player.add_credit(1);
//! player.enqueue_selection(first).unwrap();
//! assert_eq!(player.session_state(), SessionState::Playing);
//!
//! // Further selections are free while the session lasts
//! player.enqueue_selection(Selection::new(2, 4)).unwrap();
//! assert_eq!(player.credits(), 0);
//!
//! // Host loop
//! player.tick().unwrap();
//! ```
//!
//! # Example: Equalizer
//!
//! ```rust
//! use jukebox_playback::{EqualizerModel, Preset};
//!
//! let mut eq = EqualizerModel::new();
//! assert_eq!(eq.apply(0.5), 0.5);
//!
//! eq.apply_preset(Preset::BassBoost);
//! assert!(eq.multiplier() > 1.0 && eq.multiplier() < 2.0);
//! ```

mod controller;
mod credits;
mod engine;
pub mod equalizer;
mod error;
mod events;
pub mod fader;
mod queue;
mod session;
pub mod types;

// Public exports
pub use controller::PlayerController;
pub use credits::CreditLedger;
pub use engine::{AudioEngine, Library};
pub use equalizer::{EqualizerModel, FrequencyEmphasis, Preset};
pub use error::{EngineError, LibraryError, PlaybackError, Result};
pub use events::PlayerEvent;
pub use fader::VolumeFader;
pub use queue::SelectionQueue;
pub use session::PlaybackSession;
pub use types::{JukeboxConfig, Selection, SessionState};
