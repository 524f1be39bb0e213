use std::fmt;

use crate::error::AudioError;

use super::synth::{Clip, CueKind};

/// An acquired audio output.
pub trait AudioDevice {
    /// Starts playing `clip` for `cue`. Returns once the clip is queued.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::PlaybackFailed`] if the device rejects the clip.
    fn play(&mut self, cue: CueKind, clip: &Clip) -> Result<(), AudioError>;
}

/// Opens an [`AudioDevice`].
///
/// Platforms that block audio until a user gesture only succeed once one
/// has happened, which is why [`AudioEngine`] defers acquisition.
pub trait DeviceProvider {
    /// # Errors
    ///
    /// Returns [`AudioError::AcquisitionFailed`] if no device is available.
    fn acquire(&mut self) -> Result<Box<dyn AudioDevice>, AudioError>;
}

/// A provider that never yields a device, for hosts without audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAudio;

impl DeviceProvider for NoAudio {
    fn acquire(&mut self) -> Result<Box<dyn AudioDevice>, AudioError> {
        Err(AudioError::AcquisitionFailed("audio disabled".into()))
    }
}

enum EngineState {
    /// Waiting for the first user gesture.
    Locked,
    Ready(Box<dyn AudioDevice>),
    /// Acquisition failed; stays silent for the rest of the session.
    Unavailable,
    Released,
}

/// Where an [`AudioEngine`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioStatus {
    Locked,
    Ready,
    Unavailable,
    Released,
}

/// Lazily acquired, failure-tolerant audio output.
///
/// Nothing here ever returns an error to the caller: acquisition and
/// playback failures are logged and the engine carries on silently.
pub struct AudioEngine {
    provider: Box<dyn DeviceProvider>,
    state: EngineState,
    muted: bool,
}

impl fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioEngine")
            .field("status", &self.status())
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioEngine {
    #[must_use]
    pub fn new(provider: Box<dyn DeviceProvider>) -> Self {
        Self {
            provider,
            state: EngineState::Locked,
            muted: false,
        }
    }

    #[must_use]
    pub fn status(&self) -> AudioStatus {
        match self.state {
            EngineState::Locked => AudioStatus::Locked,
            EngineState::Ready(_) => AudioStatus::Ready,
            EngineState::Unavailable => AudioStatus::Unavailable,
            EngineState::Released => AudioStatus::Released,
        }
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Acquires the device on the first user gesture. Later calls, and calls
    /// after a failed attempt, do nothing.
    pub fn unlock(&mut self) {
        if !matches!(self.state, EngineState::Locked) {
            return;
        }
        match self.provider.acquire() {
            Ok(device) => {
                tracing::info!("[audio] output device acquired");
                self.state = EngineState::Ready(device);
            }
            Err(err) => {
                tracing::warn!("[audio] {err}; continuing without sound");
                self.state = EngineState::Unavailable;
            }
        }
    }

    /// Plays `cue` if the device is ready and the engine is not muted.
    ///
    /// Returns whether the cue reached the device.
    pub fn play(&mut self, cue: CueKind) -> bool {
        let EngineState::Ready(device) = &mut self.state else {
            tracing::debug!("[audio] no device, dropping {cue:?}");
            return false;
        };
        if self.muted {
            tracing::debug!("[audio] muted, skipping {cue:?}");
            return false;
        }
        match device.play(cue, &cue.clip()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("[audio] {err}");
                false
            }
        }
    }

    /// Drops the device handle. The engine stays silent afterwards.
    pub fn release(&mut self) {
        if matches!(self.state, EngineState::Ready(_)) {
            tracing::info!("[audio] output device released");
        }
        self.state = EngineState::Released;
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.release();
    }
}
