//! Keypad commands typed at the terminal
//!
//! ```text
//! credit [n]          insert coins
//! select <album> <t>  pick a track (track numbers start at 1)
//! pause | resume | play | stop | skip | restart | clear
//! volume <0.0-1.0>    base volume
//! eq <band> <db>      one band, bands 1-5
//! fade in|out|<level> [speed]
//! preset <name>       flat, bass-boost, treble-boost, vocal
//! queue | status | help | quit
//! ```

use crate::error::{AppError, Result};
use jukebox_playback::equalizer::{BAND_COUNT, BAND_LABELS};
use jukebox_playback::fader::DEFAULT_FADE_SPEED;
use jukebox_playback::{PlayerController, Preset, Selection};
use std::fmt::Write;

pub const HELP: &str = "\
commands:
  credit [n]             add n credits (default 1)
  select <album> <track> queue a track, track numbers start at 1
  pause | resume | play  control the current session
  stop                   stop playback, keep the queue
  skip | restart         next queued track / current track from the top
  clear                  empty the queue
  volume <0.0-1.0>       set base volume
  eq <band 1-5> <db>     set one equalizer band (-12..12)
  fade in|out|<0.0-1.0> [speed]
                         fade over the next frames (speed 0.01-0.2)
  preset <name>          flat, bass-boost, treble-boost, vocal
  queue | status         show queue / player state
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Credit(u32),
    Select(Selection),
    Pause,
    Resume,
    Play,
    Stop,
    Skip,
    Restart,
    Clear,
    Volume(f32),
    Eq { band: usize, gain_db: f32 },
    Fade { level: f32, speed: f32 },
    Preset(Preset),
    Queue,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("credit" | "coin", []) => Command::Credit(1),
            ("credit" | "coin", [n]) => Command::Credit(parse_arg(n, "credit count")?),
            ("select" | "s", [album, track]) => {
                let album = parse_arg(album, "album number")?;
                let track: u32 = parse_arg(track, "track number")?;
                if track == 0 {
                    return Err(AppError::Command("track numbers start at 1".to_string()));
                }
                Command::Select(Selection::new(album, track - 1))
            }
            ("pause", []) => Command::Pause,
            ("resume", []) => Command::Resume,
            ("play", []) => Command::Play,
            ("stop", []) => Command::Stop,
            ("skip" | "next", []) => Command::Skip,
            ("restart", []) => Command::Restart,
            ("clear", []) => Command::Clear,
            ("volume" | "vol", [level]) => Command::Volume(parse_arg(level, "volume")?),
            ("eq", [band, gain]) => {
                let band: usize = parse_arg(band, "band")?;
                if band == 0 || band > BAND_COUNT {
                    return Err(AppError::Command(format!(
                        "band must be between 1 and {BAND_COUNT}"
                    )));
                }
                Command::Eq {
                    band: band - 1,
                    gain_db: parse_arg(gain, "gain")?,
                }
            }
            ("fade", [level, rest @ ..]) if rest.len() <= 1 => {
                let level = match level.to_ascii_lowercase().as_str() {
                    "in" => 1.0,
                    "out" => 0.0,
                    _ => parse_arg(level, "fade level")?,
                };
                let speed = match rest {
                    [speed] => parse_arg(speed, "fade speed")?,
                    _ => DEFAULT_FADE_SPEED,
                };
                Command::Fade { level, speed }
            }
            ("preset", words) if !words.is_empty() => {
                let name = words.join(" ");
                Command::Preset(
                    name.parse()
                        .map_err(|e: jukebox_playback::PlaybackError| AppError::Command(e.to_string()))?,
                )
            }
            ("queue" | "q", []) => Command::Queue,
            ("status", []) => Command::Status,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(AppError::Command(format!("unrecognised: {}", line.trim()))),
        };

        Ok(Some(command))
    }

    /// Apply a command to the player, returning the reply for the terminal
    pub fn execute(self, player: &mut PlayerController) -> String {
        let outcome = match self {
            Command::Credit(n) => {
                let balance = player.add_credit(n);
                Ok(format!("Added {n} credit(s) (total: {balance})"))
            }
            Command::Select(selection) => player
                .enqueue_selection(selection)
                .map(|()| format!("Added to queue: {selection}")),
            Command::Pause => {
                player.pause();
                Ok(state_line(player))
            }
            Command::Resume => {
                player.resume();
                Ok(state_line(player))
            }
            Command::Play => player.play().map(|()| state_line(player)),
            Command::Stop => {
                player.stop();
                Ok(state_line(player))
            }
            Command::Skip => player.skip().map(|()| state_line(player)),
            Command::Restart => player.restart().map(|()| state_line(player)),
            Command::Clear => {
                player.clear_queue();
                Ok("Queue cleared".to_string())
            }
            Command::Volume(level) => {
                player.set_base_volume(level);
                Ok(volume_line(player))
            }
            Command::Eq { band, gain_db } => player
                .set_band(band, gain_db)
                .map(|()| volume_line(player)),
            Command::Fade { level, speed } => {
                player.fade_to(level, speed);
                Ok(format!(
                    "Fading to {:.2} at {:.2} per frame",
                    player.fader().target(),
                    player.fader().speed()
                ))
            }
            Command::Preset(preset) => {
                player.apply_preset(preset);
                Ok(format!("Preset {preset}: {}", volume_line(player)))
            }
            Command::Queue => Ok(queue_info(player)),
            Command::Status => Ok(status(player)),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok("Bye".to_string()),
        };

        outcome.unwrap_or_else(|err| err.to_string())
    }
}

fn parse_arg<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| AppError::Command(format!("invalid {what}: {value}")))
}

fn state_line(player: &PlayerController) -> String {
    match player.now_playing() {
        Some(selection) => format!("{:?}: {selection}", player.session_state()),
        None => format!("{:?}", player.session_state()),
    }
}

fn volume_line(player: &PlayerController) -> String {
    format!(
        "volume {:.2} x{:.2} x{:.2} = {:.2}",
        player.base_volume(),
        player.fader().level(),
        player.equalizer().multiplier(),
        player.effective_volume()
    )
}

fn queue_info(player: &PlayerController) -> String {
    let queue = player.queue_snapshot();
    if queue.is_empty() {
        return "Queue is empty".to_string();
    }

    let mut text = format!("Queue ({} songs):", queue.len());
    for (i, selection) in queue.iter().enumerate() {
        let marker = if i == 0 && player.now_playing() == Some(*selection) {
            " [PLAYING]"
        } else {
            ""
        };
        let _ = write!(text, "\n{:2}. {selection}{marker}", i + 1);
    }
    text
}

fn status(player: &PlayerController) -> String {
    let mut text = format!(
        "{} | credits: {} | queued: {} | {}",
        state_line(player),
        player.credits(),
        player.queue_len(),
        volume_line(player)
    );

    for (label, gain) in BAND_LABELS.iter().zip(player.equalizer().bands()) {
        let _ = write!(text, "\n  {label:<18} {gain:+5.1} dB");
    }

    if let Some(err) = player.last_error() {
        let _ = write!(text, "\nlast error: {err}");
    }
    text
}
