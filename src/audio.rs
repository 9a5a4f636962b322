//! Audio feedback: a level signal in, notes out.
//!
//! [`AudioFeedback`] is the engine's only view of audio. It reads a waveform
//! snapshot from an [`AudioBackend`] once per frame and reduces it to a
//! scalar level (mean absolute amplitude), and it turns interaction events
//! into debounced, randomly chosen notes.
//!
//! Without a backend it is silent: the level reads 0 and notes are dropped.
//! That is how audio failures degrade.
//!
//! # Example
//!
//! ```ignore
//! use nexus::audio::AudioFeedback;
//! use nexus::synth::OfflineSynth;
//!
//! let mut audio = AudioFeedback::new(Box::new(OfflineSynth::new(44_100, -20.0)), None);
//! audio.play_note(0.0, true);
//! audio.tick(16.0);
//! assert!(audio.level() > 0.0);
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::AudioError;

/// Minimum spacing between unforced notes.
pub const NOTE_DEBOUNCE_MS: f64 = 100.0;

/// Tempo used to turn note lengths into seconds.
pub const TEMPO_BPM: f32 = 120.0;

/// Pitches the feedback picks from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pitch {
    C4,
    D4,
    E4,
    G4,
    A4,
    C5,
    D5,
    E5,
}

impl Pitch {
    pub const ALL: [Pitch; 8] = [
        Pitch::C4,
        Pitch::D4,
        Pitch::E4,
        Pitch::G4,
        Pitch::A4,
        Pitch::C5,
        Pitch::D5,
        Pitch::E5,
    ];

    /// Equal-tempered frequency in Hz (A4 = 440).
    pub fn frequency(self) -> f32 {
        let semitones_from_a4: i32 = match self {
            Pitch::C4 => -9,
            Pitch::D4 => -7,
            Pitch::E4 => -5,
            Pitch::G4 => -2,
            Pitch::A4 => 0,
            Pitch::C5 => 3,
            Pitch::D5 => 5,
            Pitch::E5 => 7,
        };
        440.0 * 2f32.powf(semitones_from_a4 as f32 / 12.0)
    }
}

/// How long a note is held before release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteLength {
    Quarter,
    Eighth,
    Sixteenth,
}

impl NoteLength {
    pub const ALL: [NoteLength; 3] = [NoteLength::Quarter, NoteLength::Eighth, NoteLength::Sixteenth];

    /// Hold time in seconds at `bpm`.
    pub fn seconds(self, bpm: f32) -> f32 {
        let beat = 60.0 / bpm;
        match self {
            NoteLength::Quarter => beat,
            NoteLength::Eighth => beat / 2.0,
            NoteLength::Sixteenth => beat / 4.0,
        }
    }
}

/// A note command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub length: NoteLength,
    /// 0.5..=1.0
    pub velocity: f32,
}

/// A synthesis and analysis collaborator.
pub trait AudioBackend {
    /// Bring the backend up to wall time `now_ms`.
    fn advance(&mut self, _now_ms: f64) {}

    /// Replace `out` with the most recent waveform samples.
    fn waveform(&self, out: &mut Vec<f32>);

    /// Start a note.
    fn trigger(&mut self, note: Note);
}

/// Level signal and note trigger for the engine.
pub struct AudioFeedback {
    backend: Option<Box<dyn AudioBackend>>,
    rng: SmallRng,
    last_note_ms: Option<f64>,
    scratch: Vec<f32>,
    level: f32,
}

impl AudioFeedback {
    /// Feedback driving `backend`. `seed` fixes note selection.
    pub fn new(backend: Box<dyn AudioBackend>, seed: Option<u64>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::silent_seeded(seed)
        }
    }

    /// Feedback with no backend.
    pub fn silent() -> Self {
        Self::silent_seeded(None)
    }

    fn silent_seeded(seed: Option<u64>) -> Self {
        Self {
            backend: None,
            rng: seed.map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64),
            last_note_ms: None,
            scratch: Vec::with_capacity(256),
            level: 0.0,
        }
    }

    /// Use the backend if it started, otherwise log and go silent.
    pub fn from_result(backend: Result<Box<dyn AudioBackend>, AudioError>, seed: Option<u64>) -> Self {
        match backend {
            Ok(backend) => Self::new(backend, seed),
            Err(AudioError::Disabled) => {
                tracing::info!("audio disabled; running silent");
                Self::silent_seeded(seed)
            }
            Err(err) => {
                tracing::warn!("audio unavailable, running silent: {err}");
                Self::silent_seeded(seed)
            }
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Advance the backend and refresh the level from a new snapshot.
    pub fn tick(&mut self, now_ms: f64) {
        let Some(backend) = self.backend.as_mut() else {
            self.level = 0.0;
            return;
        };
        backend.advance(now_ms);
        backend.waveform(&mut self.scratch);
        self.level = mean_abs(&self.scratch);
    }

    /// Mean absolute amplitude of the last snapshot. 0 when silent.
    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Play a random note unless one was played less than
    /// [`NOTE_DEBOUNCE_MS`] ago. `forced` skips the debounce.
    ///
    /// Returns the note that was triggered.
    pub fn play_note(&mut self, now_ms: f64, forced: bool) -> Option<Note> {
        let backend = self.backend.as_mut()?;
        if !forced {
            if let Some(last) = self.last_note_ms {
                if now_ms - last < NOTE_DEBOUNCE_MS {
                    return None;
                }
            }
        }
        self.last_note_ms = Some(now_ms);

        let note = Note {
            pitch: Pitch::ALL[self.rng.gen_range(0..Pitch::ALL.len())],
            length: NoteLength::ALL[self.rng.gen_range(0..NoteLength::ALL.len())],
            velocity: self.rng.gen_range(0.5..=1.0),
        };
        backend.trigger(note);
        Some(note)
    }
}

impl std::fmt::Debug for AudioFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFeedback")
            .field("enabled", &self.is_enabled())
            .field("level", &self.level)
            .field("last_note_ms", &self.last_note_ms)
            .finish()
    }
}

fn mean_abs(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Backend returning a fixed waveform and recording triggered notes.
    struct Recorder {
        wave: Vec<f32>,
        notes: Rc<RefCell<Vec<Note>>>,
    }

    impl AudioBackend for Recorder {
        fn waveform(&self, out: &mut Vec<f32>) {
            out.clear();
            out.extend_from_slice(&self.wave);
        }

        fn trigger(&mut self, note: Note) {
            self.notes.borrow_mut().push(note);
        }
    }

    fn recorder(wave: Vec<f32>) -> (AudioFeedback, Rc<RefCell<Vec<Note>>>) {
        let notes = Rc::new(RefCell::new(Vec::new()));
        let backend = Recorder {
            wave,
            notes: notes.clone(),
        };
        (AudioFeedback::new(Box::new(backend), Some(1)), notes)
    }

    #[test]
    fn test_level_is_mean_absolute_amplitude() {
        let (mut audio, _) = recorder(vec![0.5, -0.5, 0.25, -0.25]);
        assert_eq!(audio.level(), 0.0);
        audio.tick(0.0);
        assert!((audio.level() - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_silent_feedback_is_inert() {
        let mut audio = AudioFeedback::silent();
        audio.tick(10.0);
        assert_eq!(audio.level(), 0.0);
        assert!(audio.play_note(10.0, true).is_none());
        assert!(!audio.is_enabled());
    }

    #[test]
    fn test_failed_backend_goes_silent() {
        let audio = AudioFeedback::from_result(Err(AudioError::NoDevice("none".into())), None);
        assert!(!audio.is_enabled());
    }

    #[test]
    fn test_notes_are_debounced() {
        let (mut audio, notes) = recorder(vec![0.0]);
        assert!(audio.play_note(1_000.0, false).is_some());
        assert!(audio.play_note(1_050.0, false).is_none());
        assert!(audio.play_note(1_099.9, false).is_none());
        assert!(audio.play_note(1_100.0, false).is_some());
        assert_eq!(notes.borrow().len(), 2);
    }

    #[test]
    fn test_forced_notes_skip_debounce() {
        let (mut audio, notes) = recorder(vec![0.0]);
        audio.play_note(0.0, false);
        assert!(audio.play_note(10.0, true).is_some());
        // Forced notes still restart the debounce window
        assert!(audio.play_note(60.0, false).is_none());
        assert_eq!(notes.borrow().len(), 2);
    }

    #[test]
    fn test_note_choices_in_range() {
        let (mut audio, notes) = recorder(vec![0.0]);
        for i in 0..50 {
            audio.play_note(i as f64 * 200.0, false);
        }
        for note in notes.borrow().iter() {
            assert!((0.5..=1.0).contains(&note.velocity));
        }
        assert_eq!(notes.borrow().len(), 50);
    }

    #[test]
    fn test_pitch_frequencies() {
        assert_eq!(Pitch::A4.frequency(), 440.0);
        assert!((Pitch::C4.frequency() - 261.63).abs() < 0.01);
        assert!((Pitch::E5.frequency() - 659.26).abs() < 0.01);
    }

    #[test]
    fn test_note_lengths_at_120_bpm() {
        assert_eq!(NoteLength::Quarter.seconds(TEMPO_BPM), 0.5);
        assert_eq!(NoteLength::Eighth.seconds(TEMPO_BPM), 0.25);
        assert_eq!(NoteLength::Sixteenth.seconds(TEMPO_BPM), 0.125);
    }
}
