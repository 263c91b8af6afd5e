//! Five-band equalizer model
//!
//! The equalizer does not filter audio. It folds the five band gains into a
//! single loudness-compensating volume multiplier using a mid-weighted average:
//!
//! ```text
//! avg        = Σ(gain_i × w_i) / Σ w_i        w = [0.8, 1.2, 1.5, 1.2, 0.8]
//! multiplier = clamp(10^(avg / 20), 0.1, 2.0)
//! ```

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bands
pub const BAND_COUNT: usize = 5;

/// Lowest band gain in dB
pub const MIN_GAIN_DB: f32 = -12.0;

/// Highest band gain in dB
pub const MAX_GAIN_DB: f32 = 12.0;

/// Display labels, lowest band first
pub const BAND_LABELS: [&str; BAND_COUNT] = [
    "60 Hz (Bass)",
    "250 Hz (Low Mid)",
    "1 kHz (Mid)",
    "4 kHz (High Mid)",
    "16 kHz (Treble)",
];

/// Perceptual weights, mid frequencies count most
const BAND_WEIGHTS: [f32; BAND_COUNT] = [0.8, 1.2, 1.5, 1.2, 0.8];

const MIN_MULTIPLIER: f32 = 0.1;
const MAX_MULTIPLIER: f32 = 2.0;

/// Built-in gain curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    Flat,
    BassBoost,
    TrebleBoost,
    Vocal,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Flat,
        Preset::BassBoost,
        Preset::TrebleBoost,
        Preset::Vocal,
    ];

    /// Gain vector in dB
    pub fn gains(self) -> [f32; BAND_COUNT] {
        match self {
            Preset::Flat => [0.0, 0.0, 0.0, 0.0, 0.0],
            Preset::BassBoost => [6.0, 3.0, 0.0, -2.0, -4.0],
            Preset::TrebleBoost => [-4.0, -2.0, 0.0, 3.0, 6.0],
            Preset::Vocal => [-2.0, 4.0, 6.0, 3.0, -1.0],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Flat => "flat",
            Preset::BassBoost => "bass-boost",
            Preset::TrebleBoost => "treble-boost",
            Preset::Vocal => "vocal",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| PlaybackError::UnknownPreset(s.to_string()))
    }
}

/// Coarse bass/mid/treble view of the current gains (dB)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEmphasis {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

/// Equalizer gains plus the derived volume multiplier
#[derive(Debug, Clone)]
pub struct EqualizerModel {
    gains: [f32; BAND_COUNT],

    /// Cached result of the weighted formula
    multiplier: f32,
}

impl EqualizerModel {
    /// Flat equalizer (multiplier 1.0)
    pub fn new() -> Self {
        Self::with_gains([0.0; BAND_COUNT])
    }

    /// Equalizer with initial gains, each clamped to the valid range
    pub fn with_gains(gains: [f32; BAND_COUNT]) -> Self {
        let gains = gains.map(clamp_gain);
        Self {
            gains,
            multiplier: Self::calculate_multiplier(&gains),
        }
    }

    /// Set one band's gain in dB
    ///
    /// The gain is clamped to ±12 dB and the multiplier recomputed.
    pub fn set_band(&mut self, band: usize, gain_db: f32) -> Result<()> {
        let slot = self
            .gains
            .get_mut(band)
            .ok_or(PlaybackError::InvalidBand(band))?;
        *slot = clamp_gain(gain_db);
        self.multiplier = Self::calculate_multiplier(&self.gains);
        Ok(())
    }

    /// Gain of one band, `None` if out of range
    pub fn band(&self, band: usize) -> Option<f32> {
        self.gains.get(band).copied()
    }

    /// All gains, lowest band first
    pub fn bands(&self) -> [f32; BAND_COUNT] {
        self.gains
    }

    /// Replace all gains with a preset curve
    pub fn apply_preset(&mut self, preset: Preset) {
        self.gains = preset.gains();
        self.multiplier = Self::calculate_multiplier(&self.gains);
    }

    /// Back to flat
    pub fn reset(&mut self) {
        self.apply_preset(Preset::Flat);
    }

    /// Volume multiplier derived from the gains (0.1-2.0)
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Scale a base volume, result clamped to 0.0-1.0
    pub fn apply(&self, base_volume: f32) -> f32 {
        (base_volume * self.multiplier).clamp(0.0, 1.0)
    }

    pub fn frequency_emphasis(&self) -> FrequencyEmphasis {
        let [b0, b1, b2, b3, b4] = self.gains;
        FrequencyEmphasis {
            bass: (b0 + b1) / 2.0,
            mid: b2,
            treble: (b3 + b4) / 2.0,
        }
    }

    fn calculate_multiplier(gains: &[f32; BAND_COUNT]) -> f32 {
        let weighted: f32 = gains
            .iter()
            .zip(BAND_WEIGHTS.iter())
            .map(|(gain, weight)| gain * weight)
            .sum();
        let total_weight: f32 = BAND_WEIGHTS.iter().sum();
        let average_db = weighted / total_weight;

        // dB to linear: 10^(dB/20)
        10.0_f32
            .powf(average_db / 20.0)
            .clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    }
}

impl Default for EqualizerModel {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_gain(gain_db: f32) -> f32 {
    if gain_db.is_nan() {
        return 0.0;
    }
    gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
}
