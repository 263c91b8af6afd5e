/// Host configuration
use crate::error::{AppError, Result};
use jukebox_playback::JukeboxConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Root holding one numbered directory per album
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,

    /// How often the player polls for the end of a track
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub player: JukeboxConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `jukebox.toml` in the working directory is
    /// used when present. `JUKEBOX_`-prefixed variables override the file,
    /// with `__` separating nested keys (`JUKEBOX_PLAYER__BASE_VOLUME`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from("jukebox.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("JUKEBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(AppError::Config(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.player.base_volume) {
            return Err(AppError::Config(format!(
                "player.base_volume must be within 0.0-1.0, got {}",
                self.player.base_volume
            )));
        }

        Ok(())
    }
}

// Default values
fn default_music_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join("Music")
        .join("JukeBox")
}

fn default_tick_interval_ms() -> u64 {
    // Roughly one poll per display frame at 30 fps
    33
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            music_dir: default_music_dir(),
            tick_interval_ms: default_tick_interval_ms(),
            player: JukeboxConfig::default(),
        }
    }
}
