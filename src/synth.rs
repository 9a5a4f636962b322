//! Sine poly-synth and waveform analyser.
//!
//! This is the audio collaborator behind [`AudioFeedback`](crate::audio::AudioFeedback).
//! [`Synth`] mixes enveloped sine voices; [`Analyser`] keeps the most recent
//! output samples for level measurement.
//!
//! Two backends wrap them:
//!
//! - [`OfflineSynth`] renders on the caller's thread, paced by frame
//!   timestamps. No device required; used in tests and when no output
//!   device is available.
//! - `DeviceSynth` (feature `audio`) streams to the default output device
//!   through rodio and analyses what was actually played.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use crate::audio::{AudioBackend, Note, TEMPO_BPM};

/// Samples kept by the analyser.
pub const ANALYSER_SIZE: usize = 256;

/// Voices beyond this steal the oldest.
const MAX_VOICES: usize = 32;

/// Attack / decay / sustain / release envelope. Times in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    /// Level held after decay, 0..=1.
    pub sustain: f32,
    pub release: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.02,
            decay: 0.3,
            sustain: 0.2,
            release: 1.0,
        }
    }
}

impl Envelope {
    /// Gain `t` seconds after note-on for a note held `hold` seconds.
    pub fn gain(&self, t: f32, hold: f32) -> f32 {
        if t < hold {
            return self.held(t);
        }
        let since_release = t - hold;
        if since_release >= self.release {
            return 0.0;
        }
        self.held(hold) * (1.0 - since_release / self.release)
    }

    fn held(&self, t: f32) -> f32 {
        if t < self.attack {
            t / self.attack
        } else if t < self.attack + self.decay {
            1.0 - (1.0 - self.sustain) * (t - self.attack) / self.decay
        } else {
            self.sustain
        }
    }
}

#[derive(Clone, Debug)]
struct Voice {
    freq: f32,
    velocity: f32,
    hold: f32,
    age: f32,
    phase: f32,
}

/// Polyphonic sine synthesizer.
#[derive(Clone, Debug)]
pub struct Synth {
    sample_rate: u32,
    envelope: Envelope,
    gain: f32,
    voices: Vec<Voice>,
}

impl Synth {
    /// Create a synth with output gain `volume_db` decibels.
    pub fn new(sample_rate: u32, volume_db: f32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            envelope: Envelope::default(),
            gain: 10f32.powf(volume_db / 20.0),
            voices: Vec::with_capacity(MAX_VOICES),
        }
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Linear output gain.
    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Start a note.
    pub fn trigger(&mut self, note: Note) {
        if self.voices.len() >= MAX_VOICES {
            self.voices.remove(0);
        }
        self.voices.push(Voice {
            freq: note.pitch.frequency(),
            velocity: note.velocity,
            hold: note.length.seconds(TEMPO_BPM),
            age: 0.0,
            phase: 0.0,
        });
    }

    /// Render one sample.
    pub fn next_sample(&mut self) -> f32 {
        let dt = 1.0 / self.sample_rate as f32;
        let mut out = 0.0;
        for v in &mut self.voices {
            out += v.phase.sin() * self.envelope.gain(v.age, v.hold) * v.velocity;
            v.phase = (v.phase + TAU * v.freq * dt) % TAU;
            v.age += dt;
        }
        let release = self.envelope.release;
        self.voices.retain(|v| v.age < v.hold + release);
        out * self.gain
    }

    /// Advance time without rendering.
    pub fn skip(&mut self, seconds: f32) {
        for v in &mut self.voices {
            v.phase = (v.phase + TAU * v.freq * seconds) % TAU;
            v.age += seconds;
        }
        let release = self.envelope.release;
        self.voices.retain(|v| v.age < v.hold + release);
    }
}

/// Ring buffer of the most recent samples.
#[derive(Clone, Debug)]
pub struct Analyser {
    size: usize,
    samples: VecDeque<f32>,
}

impl Analyser {
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            samples: VecDeque::from(vec![0.0; size.max(1)]),
        }
    }

    #[inline]
    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.size {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Copy the window, oldest first, into `out`.
    pub fn snapshot(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend(self.samples.iter().copied());
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Default for Analyser {
    fn default() -> Self {
        Self::new(ANALYSER_SIZE)
    }
}

/// Synth rendered on demand from frame timestamps, without an output device.
#[derive(Clone, Debug)]
pub struct OfflineSynth {
    synth: Synth,
    analyser: Analyser,
    last_ms: Option<f64>,
    carry: f64,
}

impl OfflineSynth {
    pub fn new(sample_rate: u32, volume_db: f32) -> Self {
        Self {
            synth: Synth::new(sample_rate, volume_db),
            analyser: Analyser::default(),
            last_ms: None,
            carry: 0.0,
        }
    }

    pub fn synth(&self) -> &Synth {
        &self.synth
    }
}

impl AudioBackend for OfflineSynth {
    fn advance(&mut self, now_ms: f64) {
        let last = *self.last_ms.get_or_insert(now_ms);
        let elapsed_ms = (now_ms - last).max(0.0);
        self.last_ms = Some(now_ms);

        let exact = elapsed_ms * self.synth.sample_rate() as f64 / 1000.0 + self.carry;
        let total = exact.floor();
        self.carry = exact - total;
        let total = total as usize;

        // Only the tail reaches the analyser; skip the rest in one step
        let rendered = total.min(self.analyser.size());
        let skipped = total - rendered;
        if skipped > 0 {
            self.synth
                .skip(skipped as f32 / self.synth.sample_rate() as f32);
        }
        for _ in 0..rendered {
            let s = self.synth.next_sample();
            self.analyser.push(s);
        }
    }

    fn waveform(&self, out: &mut Vec<f32>) {
        self.analyser.snapshot(out);
    }

    fn trigger(&mut self, note: Note) {
        self.synth.trigger(note);
    }
}

#[cfg(feature = "audio")]
pub use device::DeviceSynth;

#[cfg(feature = "audio")]
mod device {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use rodio::{OutputStream, Source};

    use super::{Analyser, Synth};
    use crate::audio::{AudioBackend, Note};
    use crate::error::AudioError;

    const SAMPLE_RATE: u32 = 44_100;
    const CHUNK: usize = 512;

    struct Shared {
        synth: Synth,
        analyser: Analyser,
    }

    /// Endless mono source pulling chunks from the shared synth.
    struct SynthSource {
        shared: Arc<Mutex<Shared>>,
        chunk: Vec<f32>,
        cursor: usize,
    }

    impl SynthSource {
        fn refill(&mut self) {
            self.chunk.clear();
            self.cursor = 0;
            match self.shared.lock() {
                Ok(mut shared) => {
                    for _ in 0..CHUNK {
                        let s = shared.synth.next_sample();
                        shared.analyser.push(s);
                        self.chunk.push(s);
                    }
                }
                Err(_) => self.chunk.resize(CHUNK, 0.0),
            }
        }
    }

    impl Iterator for SynthSource {
        type Item = f32;

        fn next(&mut self) -> Option<f32> {
            if self.cursor >= self.chunk.len() {
                self.refill();
            }
            let s = self.chunk[self.cursor];
            self.cursor += 1;
            Some(s)
        }
    }

    impl Source for SynthSource {
        fn current_frame_len(&self) -> Option<usize> {
            None
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn total_duration(&self) -> Option<Duration> {
            None
        }
    }

    /// Synth streaming to the default output device.
    pub struct DeviceSynth {
        _stream: OutputStream,
        shared: Arc<Mutex<Shared>>,
    }

    impl DeviceSynth {
        /// Open the default output device and start streaming silence.
        pub fn open(volume_db: f32) -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::NoDevice(e.to_string()))?;
            let shared = Arc::new(Mutex::new(Shared {
                synth: Synth::new(SAMPLE_RATE, volume_db),
                analyser: Analyser::default(),
            }));
            let source = SynthSource {
                shared: shared.clone(),
                chunk: Vec::with_capacity(CHUNK),
                cursor: 0,
            };
            handle
                .play_raw(source.convert_samples())
                .map_err(|e| AudioError::Stream(e.to_string()))?;
            tracing::info!("audio output opened at {SAMPLE_RATE} Hz");
            Ok(Self {
                _stream: stream,
                shared,
            })
        }
    }

    impl AudioBackend for DeviceSynth {
        fn waveform(&self, out: &mut Vec<f32>) {
            match self.shared.lock() {
                Ok(shared) => shared.analyser.snapshot(out),
                Err(_) => out.clear(),
            }
        }

        fn trigger(&mut self, note: Note) {
            if let Ok(mut shared) = self.shared.lock() {
                shared.synth.trigger(note);
            }
        }
    }
}
