//! Numbered-directory album library
//!
//! ```text
//! music_dir/
//!   01/  a.mp3 b.flac ...   → album 1, tracks sorted by file name
//!   02/  ...
//!   17/  ...
//! ```

use jukebox_playback::{Library, LibraryError, Selection};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions the audio engine can decode
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["mp3", "flac", "ogg", "wav"];

/// Resolves album numbers to subdirectories of a music root
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    root: PathBuf,
}

impl DirectoryLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory whose name parses to `album_id` (`1`, `01` and `001` all match)
    fn album_dir(&self, album_id: u32) -> Option<PathBuf> {
        fs::read_dir(&self.root)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .find(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.parse::<u32>().ok())
                    == Some(album_id)
            })
    }

    /// Audio files in an album directory, sorted by file name
    pub fn tracks(dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut tracks: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_supported(path))
            .collect();
        tracks.sort();
        tracks
    }
}

impl Library for DirectoryLibrary {
    fn resolve(&self, selection: Selection) -> Result<PathBuf, LibraryError> {
        let dir = self
            .album_dir(selection.album_id)
            .ok_or(LibraryError::NotFound(selection))?;

        let path = Self::tracks(&dir)
            .into_iter()
            .nth(selection.track_index as usize)
            .ok_or(LibraryError::NotFound(selection))?;

        debug!(%selection, path = %path.display(), "selection resolved");
        Ok(path)
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}
