use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use thiserror::Error;

use crate::playback::AudioWidget;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to read audio file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no audio output device available")]
    Device(#[from] rodio::StreamError),
    #[error("could not create playback sink")]
    Sink(#[from] rodio::PlayError),
    #[error("unsupported or corrupt audio data")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Plays one audio file through the default output device.
///
/// The whole file is kept in memory so seeking can rebuild the decoder without touching disk.
pub struct RodioWidget {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    track: Arc<[u8]>,
    sink: Sink,
    volume: f32,
}

impl RodioWidget {
    pub fn open(path: &Path, volume: f32) -> Result<Self, AudioError> {
        let bytes = std::fs::read(path).map_err(|source| AudioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let track: Arc<[u8]> = bytes.into();
        let (stream, handle) = OutputStream::try_default()?;
        let volume = volume.clamp(0.0, 1.0);
        let sink = Self::cue(&handle, &track, Duration::ZERO, volume, true)?;
        tracing::info!(path = %path.display(), bytes = track.len(), "audio track loaded");
        Ok(Self {
            _stream: stream,
            handle,
            track,
            sink,
            volume,
        })
    }

    fn cue(
        handle: &OutputStreamHandle,
        track: &Arc<[u8]>,
        offset: Duration,
        volume: f32,
        paused: bool,
    ) -> Result<Sink, AudioError> {
        let sink = Sink::try_new(handle)?;
        sink.set_volume(volume);
        if paused {
            sink.pause();
        }
        let source = Decoder::new(Cursor::new(Arc::clone(track)))?;
        sink.append(source.skip_duration(offset));
        Ok(sink)
    }
}

impl AudioWidget for RodioWidget {
    fn play(&mut self) {
        if self.sink.empty() {
            // The track ran out; start it over rather than playing silence.
            self.seek_to(0.0);
        }
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek_to(&mut self, seconds: f32) {
        let offset = Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or(Duration::ZERO);
        let paused = self.sink.is_paused();
        match Self::cue(&self.handle, &self.track, offset, self.volume, paused) {
            Ok(sink) => self.sink = sink,
            Err(err) => tracing::warn!(%err, seconds, "audio seek failed"),
        }
    }
}

/// Stand-in used when no audio file or output device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentWidget;

impl AudioWidget for SilentWidget {
    fn play(&mut self) {
        tracing::debug!("silent audio: play");
    }

    fn pause(&mut self) {
        tracing::debug!("silent audio: pause");
    }

    fn seek_to(&mut self, seconds: f32) {
        tracing::debug!(seconds, "silent audio: seek");
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Play,
    Pause,
    SeekTo(f32),
}

/// Remembers every command it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingWidget {
    commands: Vec<AudioCommand>,
}

impl RecordingWidget {
    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl AudioWidget for RecordingWidget {
    fn play(&mut self) {
        self.commands.push(AudioCommand::Play);
    }

    fn pause(&mut self) {
        self.commands.push(AudioCommand::Pause);
    }

    fn seek_to(&mut self, seconds: f32) {
        self.commands.push(AudioCommand::SeekTo(seconds));
    }
}

/// Opens `path` with rodio, falling back to [`SilentWidget`] when there is no file or device.
pub fn open_or_silent(path: Option<&Path>, volume: f32) -> Box<dyn AudioWidget> {
    let Some(path) = path else {
        tracing::info!("no audio track configured; running silent");
        return Box::new(SilentWidget);
    };
    match RodioWidget::open(path, volume) {
        Ok(widget) => Box::new(widget),
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "audio unavailable; running silent");
            Box::new(SilentWidget)
        }
    }
}
