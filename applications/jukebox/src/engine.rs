//! rodio-backed audio engine
//!
//! A fresh `Sink` is created for every track so a stopped sink never has to be
//! reused. `Sink::empty` doubles as the end-of-track signal.

use jukebox_playback::{AudioEngine, EngineError};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub struct RodioEngine {
    // Output stops when the stream is dropped
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,

    /// Decoded file waiting for `play`
    loaded: Option<Decoder<BufReader<File>>>,
    volume: f32,
}

impl RodioEngine {
    /// Open the default output device
    pub fn new() -> Result<Self, EngineError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| EngineError::Unavailable(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            loaded: None,
            volume: 1.0,
        })
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        self.stop();

        let load_error = |reason: String| EngineError::Load {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| load_error(e.to_string()))?;

        debug!(path = %path.display(), "track decoded");
        self.loaded = Some(decoder);
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let source = self
            .loaded
            .take()
            .ok_or_else(|| EngineError::Play("no track loaded".to_string()))?;

        let sink = Sink::try_new(&self.handle).map_err(|e| EngineError::Play(e.to_string()))?;
        sink.set_volume(self.volume);
        sink.append(source);

        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.loaded = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }
}
