//! Player events
//!
//! The controller buffers events as it works; the host drains them once per
//! command or tick to refresh its display:
//! - Session state changes (idle/playing/paused)
//! - Track starts and natural completions
//! - Queue, credit and volume changes
//! - Selections dropped by the skip-on-failure policy

use crate::types::{Selection, SessionState};
use serde::{Deserialize, Serialize};

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Session state changed
    StateChanged {
        /// The new session state
        state: SessionState,
    },

    /// A selection was loaded and started
    TrackStarted { selection: Selection },

    /// The engine reported the end of a track
    TrackFinished { selection: Selection },

    /// Queue length changed (enqueue, advance, skip-on-failure, clear)
    QueueChanged { length: usize },

    /// Credit balance changed
    CreditsChanged { balance: u32 },

    /// Base or effective volume changed
    VolumeChanged {
        /// Volume requested by the user (0.0-1.0)
        base: f32,
        /// Volume sent to the engine after equalizer compensation
        effective: f32,
    },

    /// A queued selection could not be played and was dropped
    SelectionSkipped {
        selection: Selection,
        /// Human-readable failure
        reason: String,
    },

    /// An operation failed; the controller is still usable
    Error { message: String },
}
