//! Core types for playback control

use crate::equalizer::BAND_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A track requested for playback
///
/// Both fields are opaque to the controller. They are only turned into a file
/// path by the [`Library`](crate::Library) collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Album number as shown on the jukebox
    pub album_id: u32,

    /// Zero-based track position within the album
    pub track_index: u32,
}

impl Selection {
    pub fn new(album_id: u32, track_index: u32) -> Self {
        Self {
            album_id,
            track_index,
        }
    }
}

impl fmt::Display for Selection {
    /// Keypad form: two-digit album, two-digit one-based track (`03-01`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}-{:02}",
            self.album_id,
            u64::from(self.track_index) + 1
        )
    }
}

/// Playback session state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing loaded, the credit gate is closed
    #[default]
    Idle,

    /// Engine is producing audio for the queue head
    Playing,

    /// Paused mid-track (still counts as an active session)
    Paused,
}

impl SessionState {
    /// Playing or paused
    pub fn is_active(self) -> bool {
        self != SessionState::Idle
    }
}

/// Configuration for the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JukeboxConfig {
    /// Base volume before equalizer compensation (0.0-1.0, default: 0.7)
    #[serde(default = "default_base_volume")]
    pub base_volume: f32,

    /// Per-band gains in dB (default: flat)
    #[serde(default)]
    pub equalizer: [f32; BAND_COUNT],

    /// Credits available when the controller is created (default: 0)
    #[serde(default)]
    pub initial_credits: u32,
}

fn default_base_volume() -> f32 {
    0.7
}

impl Default for JukeboxConfig {
    fn default() -> Self {
        Self {
            base_volume: default_base_volume(),
            equalizer: [0.0; BAND_COUNT],
            initial_credits: 0,
        }
    }
}
