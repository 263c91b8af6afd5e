//! Player controller
//!
//! Composes the credit ledger, selection queue, playback session and
//! equalizer into the single API a host talks to.
//!
//! # Admission control
//!
//! ```text
//! was_idle = queue empty AND session Idle
//!   was_idle  → needs one credit, then starts playback immediately
//!   otherwise → free (Playing or Paused, or entries already waiting)
//! ```
//!
//! Advancing after a track ends never touches the ledger.

use crate::credits::CreditLedger;
use crate::engine::{AudioEngine, Library};
use crate::equalizer::{EqualizerModel, Preset};
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::fader::VolumeFader;
use crate::queue::SelectionQueue;
use crate::session::PlaybackSession;
use crate::types::{JukeboxConfig, Selection, SessionState};
use tracing::{debug, info, warn};

/// Credit-gated jukebox player
pub struct PlayerController {
    ledger: CreditLedger,
    queue: SelectionQueue,
    session: PlaybackSession,
    equalizer: EqualizerModel,
    fader: VolumeFader,
    library: Box<dyn Library>,

    /// User volume before equalizer compensation (0.0-1.0)
    base_volume: f32,

    /// Whether the queue head is the track loaded in the engine
    ///
    /// Cleared by `clear_queue` while a track keeps playing, so the next
    /// advance does not pop an entry that never played.
    head_is_current: bool,

    last_error: Option<PlaybackError>,
    pending_events: Vec<PlayerEvent>,
}

impl PlayerController {
    /// Create controller with injected collaborators
    pub fn new(
        config: JukeboxConfig,
        engine: Box<dyn AudioEngine>,
        library: Box<dyn Library>,
    ) -> Self {
        let mut controller = Self {
            ledger: CreditLedger::new(config.initial_credits),
            queue: SelectionQueue::new(),
            session: PlaybackSession::new(engine),
            equalizer: EqualizerModel::with_gains(config.equalizer),
            fader: VolumeFader::default(),
            library,
            base_volume: clamp_volume(config.base_volume),
            head_is_current: false,
            last_error: None,
            pending_events: Vec::new(),
        };
        controller.session.set_volume(controller.effective_volume());
        controller
    }

    // ===== Admission =====

    /// Request a selection
    ///
    /// From idle this consumes one credit and starts playback at once. While a
    /// session is playing or paused, or entries are already waiting, the
    /// selection is appended for free.
    ///
    /// # Returns
    /// * `Ok(())` - Selection admitted
    /// * `Err(AdmissionDenied)` - Idle with no credit; nothing changed
    /// * `Err(NotFound | Engine)` - Admitted, but every queued entry failed to
    ///   start; the controller is idle with an empty queue
    pub fn enqueue_selection(&mut self, selection: Selection) -> Result<()> {
        let was_idle = self.queue.is_empty() && self.session.state() == SessionState::Idle;

        if was_idle {
            if !self.ledger.use_credit() {
                debug!(%selection, "selection rejected, no credit");
                return Err(self.record_error(PlaybackError::AdmissionDenied));
            }
            info!(%selection, balance = self.ledger.balance(), "credit used");
            self.emit_credits_changed();
        }

        self.queue.enqueue(selection);
        self.emit_queue_changed();
        debug!(%selection, length = self.queue.len(), "selection queued");

        if was_idle {
            let before = self.session.state();
            let result = self.start_head();
            self.sync_state(before);
            return result;
        }

        Ok(())
    }

    // ===== Playback Control =====

    /// Poll the engine for the end of the current track
    ///
    /// Call once per frame. Steps any running fade, then, when the playing
    /// track has ended, advances the queue without consuming a credit.
    pub fn tick(&mut self) -> Result<()> {
        if self.fader.step() {
            self.push_volume();
        }

        if !self.session.track_finished() {
            return Ok(());
        }

        if let Some(selection) = self.session.current() {
            info!(%selection, "track finished");
            self.pending_events
                .push(PlayerEvent::TrackFinished { selection });
        }

        let before = self.session.state();
        let result = self.advance();
        self.sync_state(before);
        result
    }

    /// Start or resume playback
    ///
    /// Resumes when paused. When idle with entries still queued (after
    /// `stop`), restarts the head, which is a new session and costs a credit.
    pub fn play(&mut self) -> Result<()> {
        match self.session.state() {
            SessionState::Playing => Ok(()),
            SessionState::Paused => {
                self.resume();
                Ok(())
            }
            SessionState::Idle => {
                if self.queue.is_empty() {
                    return Ok(());
                }
                if !self.ledger.use_credit() {
                    return Err(self.record_error(PlaybackError::AdmissionDenied));
                }
                info!(balance = self.ledger.balance(), "credit used to restart queue");
                self.emit_credits_changed();

                let result = self.start_head();
                self.sync_state(SessionState::Idle);
                result
            }
        }
    }

    /// Pause playback (only while playing)
    pub fn pause(&mut self) {
        if self.session.pause() {
            self.emit_state_changed(SessionState::Paused);
        }
    }

    /// Resume playback (only while paused)
    pub fn resume(&mut self) {
        if self.session.resume() {
            self.emit_state_changed(SessionState::Playing);
        }
    }

    /// Stop playback
    ///
    /// Halts the engine and returns to idle. The queue is kept; use
    /// `clear_queue` to drop it.
    pub fn stop(&mut self) {
        let before = self.session.state();
        self.session.stop();
        self.sync_state(before);
    }

    /// Skip the current track
    ///
    /// Same as the track ending naturally: free, and unplayable entries are
    /// dropped. No-op when idle.
    pub fn skip(&mut self) -> Result<()> {
        let before = self.session.state();
        if !before.is_active() {
            return Ok(());
        }

        let result = self.advance();
        self.sync_state(before);
        result
    }

    /// Replay the current track from the beginning
    ///
    /// Free, and a no-op when idle. If the track can no longer be started it
    /// is dropped like any other unplayable entry and the next queued entry
    /// starts instead.
    pub fn restart(&mut self) -> Result<()> {
        let Some(current) = self.session.current() else {
            return Ok(());
        };
        let before = self.session.state();

        let result = if self.head_is_current {
            self.start_head()
        } else {
            // Queue was cleared under this track; replay it on its own
            match self.try_start(current) {
                Ok(()) => Ok(()),
                Err(err) if self.queue.is_empty() => {
                    self.report_skipped(current, &err);
                    Err(self.record_error(err))
                }
                Err(err) => {
                    // Fall through to entries queued after the clear
                    self.report_skipped(current, &err);
                    self.start_head()
                }
            }
        };

        self.sync_state(before);
        result
    }

    // ===== Queue Management =====

    /// Drop every queued selection
    ///
    /// Does not stop the current track.
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.head_is_current = false;
        self.emit_queue_changed();
        debug!("queue cleared");
    }

    /// Queued selections, head first
    pub fn queue_snapshot(&self) -> Vec<Selection> {
        self.queue.snapshot()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    // ===== Credits =====

    /// Add credits, returning the new balance
    ///
    /// Adding zero is a no-op and emits no event.
    pub fn add_credit(&mut self, amount: u32) -> u32 {
        let balance = self.ledger.add_credit(amount);
        if amount > 0 {
            info!(amount, balance, "credit added");
            self.emit_credits_changed();
        }
        balance
    }

    /// Current credit balance
    pub fn credits(&self) -> u32 {
        self.ledger.balance()
    }

    // ===== Volume & Equalizer =====

    /// Set base volume (0.0-1.0, clamped)
    pub fn set_base_volume(&mut self, volume: f32) {
        self.base_volume = clamp_volume(volume);
        self.push_volume();
    }

    pub fn base_volume(&self) -> f32 {
        self.base_volume
    }

    /// Volume sent to the engine: base volume scaled by the fader and the
    /// equalizer
    pub fn effective_volume(&self) -> f32 {
        self.equalizer.apply(self.base_volume * self.fader.level())
    }

    /// Fade toward `level` (0.0-1.0) over the following ticks
    ///
    /// `speed` is the change per tick, clamped to 0.01-0.2.
    pub fn fade_to(&mut self, level: f32, speed: f32) {
        self.fader.set_target(level, speed);
        debug!(level = self.fader.target(), speed = self.fader.speed(), "fade started");
    }

    /// Fade to silence
    pub fn fade_out(&mut self, speed: f32) {
        self.fade_to(0.0, speed);
    }

    /// Fade back to full level
    pub fn fade_in(&mut self, speed: f32) {
        self.fade_to(1.0, speed);
    }

    /// Set the fader level at once, cancelling any fade
    pub fn set_fader_level(&mut self, level: f32) {
        self.fader.set_immediate(level);
        self.push_volume();
    }

    pub fn fader(&self) -> &VolumeFader {
        &self.fader
    }

    /// Set one equalizer band in dB (clamped to ±12)
    pub fn set_band(&mut self, band: usize, gain_db: f32) -> Result<()> {
        if let Err(err) = self.equalizer.set_band(band, gain_db) {
            return Err(self.record_error(err));
        }
        self.push_volume();
        Ok(())
    }

    /// Replace all bands with a preset
    pub fn apply_preset(&mut self, preset: Preset) {
        self.equalizer.apply_preset(preset);
        debug!(%preset, multiplier = self.equalizer.multiplier(), "equalizer preset applied");
        self.push_volume();
    }

    pub fn equalizer(&self) -> &EqualizerModel {
        &self.equalizer
    }

    // ===== State Queries =====

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Selection loaded in the engine, if any
    pub fn now_playing(&self) -> Option<Selection> {
        self.session.current()
    }

    /// Most recent error, kept for display
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    // ===== Events =====

    /// Take all buffered events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    /// Drop the finished head and start the next one, or go idle
    fn advance(&mut self) -> Result<()> {
        if self.head_is_current && self.queue.pop_front().is_some() {
            self.emit_queue_changed();
        }
        self.head_is_current = false;

        if self.queue.is_empty() {
            info!("queue finished");
            self.session.stop();
            return Ok(());
        }

        self.start_head()
    }

    /// Start the queue head, dropping entries that fail
    ///
    /// Tries at most as many entries as the queue held on entry. If all of
    /// them fail the session is idle and the last error is returned.
    fn start_head(&mut self) -> Result<()> {
        let attempts = self.queue.len();
        let mut last_error = None;

        for _ in 0..attempts {
            let Some(selection) = self.queue.peek() else {
                break;
            };

            match self.try_start(selection) {
                Ok(()) => {
                    self.head_is_current = true;
                    return Ok(());
                }
                Err(err) => {
                    self.queue.pop_front();
                    self.report_skipped(selection, &err);
                    self.emit_queue_changed();
                    last_error = Some(err);
                }
            }
        }

        self.head_is_current = false;
        self.session.stop();

        match last_error {
            Some(err) => Err(self.record_error(err)),
            None => Ok(()),
        }
    }

    /// Resolve and start one selection
    ///
    /// Any failure leaves the session idle, so the engine never holds a file
    /// that is no longer the queue head.
    fn try_start(&mut self, selection: Selection) -> Result<()> {
        let path = match self.library.resolve(selection) {
            Ok(path) => path,
            Err(err) => {
                self.session.stop();
                return Err(err.into());
            }
        };

        self.session.start(selection, &path)?;
        info!(%selection, path = %path.display(), "now playing");
        self.pending_events
            .push(PlayerEvent::TrackStarted { selection });
        Ok(())
    }

    fn push_volume(&mut self) {
        let effective = self.effective_volume();
        self.session.set_volume(effective);
        self.pending_events.push(PlayerEvent::VolumeChanged {
            base: self.base_volume,
            effective,
        });
    }

    fn report_skipped(&mut self, selection: Selection, err: &PlaybackError) {
        warn!(%selection, error = %err, "dropping unplayable selection");
        self.pending_events.push(PlayerEvent::SelectionSkipped {
            selection,
            reason: err.to_string(),
        });
    }

    fn record_error(&mut self, err: PlaybackError) -> PlaybackError {
        self.pending_events.push(PlayerEvent::Error {
            message: err.to_string(),
        });
        self.last_error = Some(err.clone());
        err
    }

    fn sync_state(&mut self, before: SessionState) {
        let after = self.session.state();
        if after != before {
            self.emit_state_changed(after);
        }
    }

    fn emit_state_changed(&mut self, state: SessionState) {
        self.pending_events.push(PlayerEvent::StateChanged { state });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_credits_changed(&mut self) {
        self.pending_events.push(PlayerEvent::CreditsChanged {
            balance: self.ledger.balance(),
        });
    }
}

fn clamp_volume(volume: f32) -> f32 {
    // max() discards NaN
    volume.max(0.0).min(1.0)
}
