//! Playback session state machine
//!
//! ```text
//!            start            pause
//!   Idle ───────────► Playing ─────► Paused
//!    ▲                  │  ▲           │
//!    │      stop        │  └───────────┘
//!    └──────────────────┴─── resume ◄──┘ (stop from either)
//! ```
//!
//! The session state is the only "is playing" signal the controller trusts.
//! `AudioEngine::is_busy` is read solely to detect the end of a track.

use crate::engine::AudioEngine;
use crate::error::EngineError;
use crate::types::{SessionState, Selection};
use std::path::Path;
use tracing::debug;

/// Wraps the audio engine with a three-state lifecycle
pub struct PlaybackSession {
    engine: Box<dyn AudioEngine>,
    state: SessionState,

    /// Selection loaded into the engine while not idle
    current: Option<Selection>,
}

impl PlaybackSession {
    pub fn new(engine: Box<dyn AudioEngine>) -> Self {
        Self {
            engine,
            state: SessionState::Idle,
            current: None,
        }
    }

    /// Load and play a selection
    ///
    /// On failure the engine is halted and the session is left idle, so the
    /// caller can move on to the next queue entry.
    pub fn start(&mut self, selection: Selection, path: &Path) -> Result<(), EngineError> {
        let result = self.engine.load(path).and_then(|()| self.engine.play());

        match result {
            Ok(()) => {
                debug!(%selection, path = %path.display(), "session playing");
                self.state = SessionState::Playing;
                self.current = Some(selection);
                Ok(())
            }
            Err(err) => {
                self.halt();
                Err(err)
            }
        }
    }

    /// Playing → Paused, otherwise no-op
    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        self.engine.pause();
        self.state = SessionState::Paused;
        true
    }

    /// Paused → Playing, otherwise no-op
    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.engine.resume();
        self.state = SessionState::Playing;
        true
    }

    /// Any state → Idle
    ///
    /// Always halts the engine, even when already idle.
    pub fn stop(&mut self) {
        if self.state.is_active() {
            debug!(from = ?self.state, "session stopped");
        }
        self.halt();
    }

    /// End-of-track poll for the host's tick
    ///
    /// True only while playing and the engine has gone quiet. A paused
    /// session never finishes.
    pub fn track_finished(&self) -> bool {
        self.state == SessionState::Playing && !self.engine.is_busy()
    }

    pub fn set_volume(&mut self, volume: f32) {
        // max() discards NaN
        self.engine.set_volume(volume.max(0.0).min(1.0));
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Selection loaded in the engine, `None` when idle
    pub fn current(&self) -> Option<Selection> {
        self.current
    }

    fn halt(&mut self) {
        self.engine.stop();
        self.state = SessionState::Idle;
        self.current = None;
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("state", &self.state)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
