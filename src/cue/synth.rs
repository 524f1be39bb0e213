//! 8-bit style cue synthesis.
//!
//! A [`Clip`] is a small schedule of oscillator voices. Devices may play the
//! schedule natively or render it to PCM with [`Clip::render`].

/// Master gain applied to every clip.
pub const MASTER_GAIN: f64 = 0.3;

/// Gain every envelope decays to by the end of its voice.
const ENVELOPE_FLOOR: f64 = 0.01;

/// Oscillator shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
}

impl Waveform {
    /// Sample at `phase` cycles (only the fractional part matters).
    fn sample(self, phase: f64) -> f64 {
        let frac = phase.fract();
        match self {
            Self::Square => {
                if frac < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Sawtooth => 2.0 * frac - 1.0,
        }
    }
}

/// One scheduled oscillator.
///
/// Frequency and gain both move exponentially from their start to end
/// values over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    /// Offset from the start of the clip, in seconds.
    pub start: f64,
    pub duration: f64,
    pub start_hz: f64,
    pub end_hz: f64,
    pub start_gain: f64,
    pub end_gain: f64,
}

impl Voice {
    /// A fixed-pitch beep decaying from `gain` to near silence.
    #[must_use]
    pub fn beep(waveform: Waveform, hz: f64, start: f64, duration: f64, gain: f64) -> Self {
        Self {
            waveform,
            start,
            duration,
            start_hz: hz,
            end_hz: hz,
            start_gain: gain,
            end_gain: ENVELOPE_FLOOR,
        }
    }

    /// Exponential interpolation from `a` to `b` at fraction `x`.
    fn ramp(a: f64, b: f64, x: f64) -> f64 {
        a * (b / a).powf(x)
    }

    /// How far through the voice `t` is, in `[0, 1]`. A voice without a
    /// positive duration is over as soon as it starts.
    fn fraction(&self, t: f64) -> f64 {
        if self.duration > 0.0 {
            (t / self.duration).clamp(0.0, 1.0)
        } else if t >= 0.0 {
            1.0
        } else {
            0.0
        }
    }

    /// Frequency at `t` seconds into the voice.
    #[must_use]
    pub fn frequency_at(&self, t: f64) -> f64 {
        Self::ramp(self.start_hz, self.end_hz, self.fraction(t))
    }

    /// Envelope gain at `t` seconds into the voice.
    #[must_use]
    pub fn gain_at(&self, t: f64) -> f64 {
        Self::ramp(self.start_gain, self.end_gain, self.fraction(t))
    }

    fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A short scheduled sound.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    voices: Vec<Voice>,
}

impl Clip {
    #[must_use]
    pub fn new(voices: Vec<Voice>) -> Self {
        Self { voices }
    }

    /// Two-tone chime, C5 then E5.
    #[must_use]
    pub fn chime() -> Self {
        Self::new(vec![
            Voice::beep(Waveform::Square, 523.25, 0.0, 0.3, 0.3),
            Voice::beep(Waveform::Square, 659.25, 0.15, 0.2, 0.3),
        ])
    }

    /// Rising C-E-G-C-E arpeggio.
    #[must_use]
    pub fn fanfare() -> Self {
        const NOTES: [f64; 5] = [261.63, 329.63, 392.00, 523.25, 659.25];
        Self::new(
            NOTES
                .iter()
                .zip(0u32..)
                .map(|(&hz, i)| Voice::beep(Waveform::Sawtooth, hz, f64::from(i) * 0.1, 0.15, 0.3))
                .collect(),
        )
    }

    /// Two-second sawtooth glide from 100 Hz to 1 kHz.
    #[must_use]
    pub fn warp_sweep() -> Self {
        Self::new(vec![Voice {
            waveform: Waveform::Sawtooth,
            start: 0.0,
            duration: 2.0,
            start_hz: 100.0,
            end_hz: 1000.0,
            start_gain: 0.2,
            end_gain: ENVELOPE_FLOOR,
        }])
    }

    #[must_use]
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Length of the clip in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.voices.iter().map(Voice::end).fold(0.0, f64::max)
    }

    /// Renders the clip to mono PCM at `sample_rate`, mixed through
    /// [`MASTER_GAIN`] and clamped to `[-1, 1]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = f64::from(sample_rate);
        let total = (self.duration() * rate).round() as usize;
        let mut mix = vec![0.0_f64; total];

        for voice in &self.voices {
            let first = (voice.start * rate).round() as usize;
            let len = (voice.duration * rate).round() as usize;
            let mut phase = 0.0;
            for (n, out) in mix.iter_mut().skip(first).take(len).enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let t = n as f64 / rate;
                *out += voice.waveform.sample(phase) * voice.gain_at(t);
                phase += voice.frequency_at(t) / rate;
            }
        }

        mix.into_iter()
            .map(|s| (s * MASTER_GAIN).clamp(-1.0, 1.0) as f32)
            .collect()
    }
}

/// The cues the dispatcher can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    /// A routine waypoint crossing.
    Chime,
    /// The final waypoint.
    Fanfare,
    /// Entering the warp band.
    WarpSweep,
}

impl CueKind {
    #[must_use]
    pub fn clip(self) -> Clip {
        match self {
            Self::Chime => Clip::chime(),
            Self::Fanfare => Clip::fanfare(),
            Self::WarpSweep => Clip::warp_sweep(),
        }
    }
}
