//! Turns timeline events into side effects.
//!
//! One-shot cues (chimes, text updates) fire exactly once per event; the warp
//! distortion is reported every frame while the band is active.

mod audio;
mod synth;

pub use audio::{AudioDevice, AudioEngine, AudioStatus, DeviceProvider, NoAudio};
pub use synth::{Clip, CueKind, Voice, Waveform, MASTER_GAIN};

#[cfg(test)]
pub(crate) use audio::tests::RecordingProvider;

use crate::icon::IconId;
use crate::timeline::{Frame, TimelineEvent};
use crate::waypoint::Waypoint;

/// Headline shown when the journey completes.
pub const COMPLETE_HEADLINE: &str = "MISSION COMPLETE!";

/// Body text shown when the journey completes.
pub const COMPLETE_BODY: &str =
    "You've explored every stop on the journey. Thanks for flying along!";

/// Text for the host's info panel.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayPayload {
    /// A routine stop.
    Waypoint {
        name: String,
        description: String,
        /// One-based position in the journey.
        ordinal: usize,
        total: usize,
        /// Journey progress when the stop was reached, in `[0, 100]`.
        percent: f64,
    },
    /// The final stop.
    Complete { headline: String, body: String },
}

impl DisplayPayload {
    /// The icon the overlay shows next to this payload.
    #[must_use]
    pub fn icon(&self) -> IconId {
        match self {
            Self::Waypoint { .. } => IconId::Planet,
            Self::Complete { .. } => IconId::Trophy,
        }
    }
}

/// Side effects produced for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CueReport {
    /// Cues triggered this frame, whether or not any sound came out.
    pub cues: Vec<CueKind>,
    /// New info-panel content, if it changed this frame.
    pub display: Option<DisplayPayload>,
    /// Warp distortion for the renderer, in `[0, 1]`; 0 outside the band.
    pub distortion: f64,
}

/// Exactly-once cue firing on top of an [`AudioEngine`].
#[derive(Debug)]
pub struct CueDispatcher {
    audio: AudioEngine,
    distortion_active: bool,
    display: Option<DisplayPayload>,
}

impl CueDispatcher {
    #[must_use]
    pub fn new(audio: AudioEngine) -> Self {
        Self {
            audio,
            distortion_active: false,
            display: None,
        }
    }

    #[must_use]
    pub fn audio(&self) -> &AudioEngine {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioEngine {
        &mut self.audio
    }

    /// The info-panel content last produced.
    #[must_use]
    pub fn current_display(&self) -> Option<&DisplayPayload> {
        self.display.as_ref()
    }

    /// Handles the events of `frame`. `waypoints` is the list the frame's
    /// indices refer to.
    pub fn dispatch(&mut self, frame: &Frame, waypoints: &[Waypoint]) -> CueReport {
        let mut report = CueReport::default();

        for event in &frame.events {
            match *event {
                TimelineEvent::WaypointCrossed { index } => {
                    let Some(waypoint) = waypoints.get(index) else {
                        tracing::warn!("[cue] crossing for unknown waypoint {index}");
                        continue;
                    };
                    self.fire(CueKind::Chime, &mut report);
                    report.display = Some(DisplayPayload::Waypoint {
                        name: waypoint.name().to_string(),
                        description: waypoint.description().to_string(),
                        ordinal: index + 1,
                        total: waypoints.len(),
                        percent: frame.progress * 100.0,
                    });
                }
                TimelineEvent::JourneyComplete { .. } => {
                    self.fire(CueKind::Fanfare, &mut report);
                    report.display = Some(DisplayPayload::Complete {
                        headline: COMPLETE_HEADLINE.to_string(),
                        body: COMPLETE_BODY.to_string(),
                    });
                }
                TimelineEvent::ThresholdEntered => {
                    self.fire(CueKind::WarpSweep, &mut report);
                    self.distortion_active = true;
                }
                TimelineEvent::ThresholdExited => {
                    self.distortion_active = false;
                }
            }
        }

        if let Some(display) = &report.display {
            self.display = Some(display.clone());
        }
        report.distortion = if self.distortion_active {
            frame.threshold_intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        report
    }

    fn fire(&mut self, cue: CueKind, report: &mut CueReport) {
        tracing::debug!("[cue] {cue:?}");
        self.audio.play(cue);
        report.cues.push(cue);
    }

    /// Clears per-session state; the audio device is kept.
    pub fn reset(&mut self) {
        self.distortion_active = false;
        self.display = None;
    }

    /// Releases the audio device.
    pub fn release(&mut self) {
        self.audio.release();
    }
}
