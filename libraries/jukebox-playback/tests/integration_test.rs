//! Integration tests for the player controller
//!
//! These tests drive the public API through realistic jukebox sessions with a
//! scripted audio engine standing in for the real output device.

use jukebox_playback::{
    AudioEngine, EngineError, JukeboxConfig, Library, LibraryError, PlaybackError, PlayerController,
    PlayerEvent, Preset, Selection, SessionState,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

// ===== Test Helpers =====

/// Engine state visible to the test while the controller owns the engine
#[derive(Debug, Default)]
struct EngineProbe {
    loaded: Option<PathBuf>,
    busy: bool,
    volume: f32,
    loads: usize,
    broken: HashSet<PathBuf>,
    refuse_play: bool,
}

struct MockEngine {
    probe: Rc<RefCell<EngineProbe>>,
}

impl AudioEngine for MockEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        let mut probe = self.probe.borrow_mut();
        probe.loads += 1;
        if probe.broken.contains(path) {
            return Err(EngineError::Load {
                path: path.display().to_string(),
                reason: "unsupported format".to_string(),
            });
        }
        probe.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let mut probe = self.probe.borrow_mut();
        if probe.refuse_play {
            return Err(EngineError::Unavailable("no output device".to_string()));
        }
        probe.busy = true;
        Ok(())
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn stop(&mut self) {
        let mut probe = self.probe.borrow_mut();
        probe.busy = false;
        probe.loaded = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.probe.borrow_mut().volume = volume;
    }

    fn is_busy(&self) -> bool {
        self.probe.borrow().busy
    }
}

/// Ten albums of twelve tracks each
struct TestLibrary;

impl Library for TestLibrary {
    fn resolve(&self, selection: Selection) -> Result<PathBuf, LibraryError> {
        if selection.album_id == 0 || selection.album_id > 10 || selection.track_index >= 12 {
            return Err(LibraryError::NotFound(selection));
        }
        Ok(path_of(selection))
    }
}

fn path_of(selection: Selection) -> PathBuf {
    PathBuf::from(format!(
        "/jukebox/{:02}/track{:02}.flac",
        selection.album_id, selection.track_index
    ))
}

fn s(album: u32, track: u32) -> Selection {
    Selection::new(album, track)
}

fn create_player(config: JukeboxConfig) -> (PlayerController, Rc<RefCell<EngineProbe>>) {
    let probe = Rc::new(RefCell::new(EngineProbe::default()));
    let engine = MockEngine {
        probe: Rc::clone(&probe),
    };
    let player = PlayerController::new(config, Box::new(engine), Box::new(TestLibrary));
    (player, probe)
}

fn finish_track(probe: &Rc<RefCell<EngineProbe>>) {
    probe.borrow_mut().busy = false;
}

// ===== Scenarios =====

#[test]
fn scenario_a_no_credit_empty_queue_is_denied() {
    let (mut player, probe) = create_player(JukeboxConfig::default());

    let result = player.enqueue_selection(s(1, 0));

    assert_eq!(result, Err(PlaybackError::AdmissionDenied));
    assert!(player.queue_snapshot().is_empty());
    assert_eq!(player.credits(), 0);
    assert_eq!(player.session_state(), SessionState::Idle);
    assert_eq!(probe.borrow().loads, 0);
}

#[test]
fn scenario_b_credit_starts_session() {
    let (mut player, probe) = create_player(JukeboxConfig::default());
    player.add_credit(1);

    player.enqueue_selection(s(1, 0)).unwrap();

    assert_eq!(player.queue_snapshot(), vec![s(1, 0)]);
    assert_eq!(player.credits(), 0);
    assert_eq!(player.session_state(), SessionState::Playing);
    assert_eq!(probe.borrow().loaded, Some(path_of(s(1, 0))));
}

#[test]
fn scenario_c_track_end_advances_without_credit() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 3,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    player.enqueue_selection(s(2, 5)).unwrap();
    assert_eq!(player.credits(), 2);

    finish_track(&probe);
    player.tick().unwrap();

    assert_eq!(player.queue_snapshot(), vec![s(2, 5)]);
    assert_eq!(player.session_state(), SessionState::Playing);
    assert_eq!(probe.borrow().loaded, Some(path_of(s(2, 5))));
    assert_eq!(player.credits(), 2);
}

#[test]
fn scenario_d_paused_session_admits_for_free() {
    let (mut player, _probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    player.pause();
    assert_eq!(player.credits(), 0);

    player.enqueue_selection(s(7, 3)).unwrap();

    assert_eq!(player.queue_snapshot(), vec![s(1, 0), s(7, 3)]);
    assert_eq!(player.credits(), 0);
    assert_eq!(player.session_state(), SessionState::Paused);
}

#[test]
fn scenario_e_flat_equalizer_is_unity() {
    let (mut player, probe) = create_player(JukeboxConfig::default());
    player.apply_preset(Preset::Flat);
    player.set_base_volume(0.5);

    assert_eq!(player.equalizer().multiplier(), 1.0);
    assert_eq!(player.equalizer().apply(0.5), 0.5);
    assert_eq!(probe.borrow().volume, 0.5);
}

#[test]
fn scenario_f_bass_boost_golden_multiplier() {
    let (mut player, _probe) = create_player(JukeboxConfig::default());
    for (band, gain) in [6.0, 3.0, 0.0, -2.0, -4.0].into_iter().enumerate() {
        player.set_band(band, gain).unwrap();
    }

    let multiplier = player.equalizer().multiplier();
    assert!(multiplier > 0.1 && multiplier < 2.0);
    assert!((multiplier - 1.060_363).abs() < 1e-5);
}

// ===== Invariants =====

#[test]
fn active_session_never_consumes_credit() {
    let (mut player, _probe) = create_player(JukeboxConfig {
        initial_credits: 5,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    assert_eq!(player.credits(), 4);

    for track in 1..6 {
        player.enqueue_selection(s(1, track)).unwrap();
    }
    player.pause();
    for track in 6..10 {
        player.enqueue_selection(s(1, track)).unwrap();
    }

    assert_eq!(player.credits(), 4);
    assert_eq!(player.queue_len(), 10);
}

#[test]
fn advance_on_empty_queue_is_idempotent() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    player.enqueue_selection(s(3, 3)).unwrap();

    finish_track(&probe);
    for _ in 0..5 {
        player.tick().unwrap();
        assert_eq!(player.session_state(), SessionState::Idle);
        assert!(player.queue_snapshot().is_empty());
    }
    assert_eq!(player.last_error(), None);
}

#[test]
fn whole_queue_plays_through_on_one_credit() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    let picks = [s(1, 0), s(4, 2), s(9, 11), s(2, 7)];
    for pick in picks {
        player.enqueue_selection(pick).unwrap();
    }

    let mut played = Vec::new();
    while player.session_state() != SessionState::Idle {
        played.push(player.now_playing().unwrap());
        finish_track(&probe);
        player.tick().unwrap();
    }

    assert_eq!(played, picks.to_vec());
    assert_eq!(player.credits(), 0);
    assert!(player.queue_snapshot().is_empty());
}

// ===== Failure Handling =====

#[test]
fn broken_files_are_skipped_in_order() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    probe.borrow_mut().broken.insert(path_of(s(2, 0)));
    player.enqueue_selection(s(1, 0)).unwrap();
    player.enqueue_selection(s(2, 0)).unwrap();
    player.enqueue_selection(s(11, 0)).unwrap();
    player.enqueue_selection(s(3, 0)).unwrap();
    player.drain_events();

    finish_track(&probe);
    player.tick().unwrap();

    assert_eq!(player.now_playing(), Some(s(3, 0)));
    assert_eq!(player.queue_snapshot(), vec![s(3, 0)]);

    let skipped: Vec<Selection> = player
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            PlayerEvent::SelectionSkipped { selection, .. } => Some(selection),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![s(2, 0), s(11, 0)]);
}

#[test]
fn uniformly_broken_engine_terminates() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    for track in 1..8 {
        player.enqueue_selection(s(1, track)).unwrap();
    }
    probe.borrow_mut().refuse_play = true;
    let loads_before = probe.borrow().loads;

    finish_track(&probe);
    let result = player.tick();

    assert_eq!(
        result,
        Err(PlaybackError::Engine(EngineError::Unavailable(
            "no output device".to_string()
        )))
    );
    assert_eq!(player.session_state(), SessionState::Idle);
    assert!(player.queue_snapshot().is_empty());
    // One attempt per remaining entry, never more
    assert_eq!(probe.borrow().loads - loads_before, 7);
    assert!(player.last_error().is_some());
}

#[test]
fn unknown_first_selection_reports_not_found() {
    let (mut player, _probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });

    let result = player.enqueue_selection(s(42, 0));

    assert_eq!(result, Err(PlaybackError::NotFound(s(42, 0))));
    assert_eq!(player.session_state(), SessionState::Idle);
    assert!(player.queue_snapshot().is_empty());
}

// ===== Host Controls =====

#[test]
fn stop_then_enqueue_waits_for_play() {
    let (mut player, _probe) = create_player(JukeboxConfig {
        initial_credits: 2,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    player.stop();

    // Entries are still waiting, so admission is free but nothing starts
    player.enqueue_selection(s(1, 1)).unwrap();
    assert_eq!(player.session_state(), SessionState::Idle);
    assert_eq!(player.credits(), 1);

    player.play().unwrap();
    assert_eq!(player.now_playing(), Some(s(1, 0)));
    assert_eq!(player.credits(), 0);
}

#[test]
fn clear_queue_then_idle_reopens_gate() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    player.enqueue_selection(s(1, 1)).unwrap();

    player.clear_queue();
    assert_eq!(player.session_state(), SessionState::Playing);

    finish_track(&probe);
    player.tick().unwrap();
    assert_eq!(player.session_state(), SessionState::Idle);

    assert_eq!(
        player.enqueue_selection(s(1, 2)),
        Err(PlaybackError::AdmissionDenied)
    );
}

#[test]
fn restart_of_broken_track_moves_to_next_entry() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    player.enqueue_selection(s(1, 1)).unwrap();
    probe.borrow_mut().broken.insert(path_of(s(1, 0)));

    player.restart().unwrap();

    assert_eq!(player.session_state(), SessionState::Playing);
    assert_eq!(player.now_playing(), Some(s(1, 1)));
    assert_eq!(player.queue_snapshot(), vec![s(1, 1)]);
    assert_eq!(player.credits(), 0);
}

#[test]
fn restart_after_clear_never_strands_free_admissions() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    player.clear_queue();
    player.enqueue_selection(s(2, 0)).unwrap();
    player.enqueue_selection(s(2, 1)).unwrap();
    probe.borrow_mut().broken.insert(path_of(s(1, 0)));

    player.restart().unwrap();

    assert_eq!(player.session_state(), SessionState::Playing);
    assert_eq!(player.now_playing(), Some(s(2, 0)));
    assert_eq!(player.queue_snapshot(), vec![s(2, 0), s(2, 1)]);
    assert_eq!(player.credits(), 0);

    // The rest of the queue still plays for free
    finish_track(&probe);
    player.tick().unwrap();
    assert_eq!(player.now_playing(), Some(s(2, 1)));
    assert_eq!(player.credits(), 0);
}

#[test]
fn fade_out_reaches_silence_over_ticks() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        base_volume: 1.0,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();

    player.fade_out(0.1);
    for _ in 0..12 {
        player.tick().unwrap();
    }

    assert_eq!(probe.borrow().volume, 0.0);
    assert_eq!(player.session_state(), SessionState::Playing);

    player.fade_in(0.2);
    for _ in 0..7 {
        player.tick().unwrap();
    }
    assert_eq!(probe.borrow().volume, 1.0);
}

#[test]
fn state_events_follow_session() {
    let (mut player, probe) = create_player(JukeboxConfig {
        initial_credits: 1,
        ..Default::default()
    });
    player.enqueue_selection(s(1, 0)).unwrap();
    player.pause();
    player.resume();
    finish_track(&probe);
    player.tick().unwrap();

    let states: Vec<SessionState> = player
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            PlayerEvent::StateChanged { state } => Some(state),
            _ => None,
        })
        .collect();

    assert_eq!(
        states,
        vec![
            SessionState::Playing,
            SessionState::Paused,
            SessionState::Playing,
            SessionState::Idle,
        ]
    );
}
