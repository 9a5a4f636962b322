//! Hand-gesture input.
//!
//! A [`GestureSource`] delivers at most one hand per video frame as 21
//! normalized landmarks (x and y in 0..=1, y growing downward), or an
//! explicit [`GestureFrame::NoHand`]. [`GestureProvider`] turns those frames
//! into engine interactions:
//!
//! - the palm centre is the mean of landmarks 0, 5, 9, 13 and 17, scaled to
//!   surface pixels
//! - a finger is extended when its tip is above the joint two landmarks
//!   below it
//! - palm movement beyond 5 px bursts particles in proportion to the move
//! - more than two extended fingers places an attractor
//!
//! Camera capture and landmark detection live outside this crate. A recorded
//! session can be replayed with [`ReplayGestures`].

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{movement_burst, PointerSample};
use crate::engine::Interaction;
use crate::error::GestureError;

/// Landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmarks averaged for the palm centre.
pub const PALM_LANDMARKS: [usize; 5] = [0, 5, 9, 13, 17];

/// Fingertips, thumb to little finger.
pub const FINGERTIPS: [usize; 5] = [4, 8, 12, 16, 20];

/// Extended fingers needed before a hand places an attractor.
const ATTRACTOR_FINGERS: usize = 3;

/// Attractor strength per extended finger.
const STRENGTH_PER_FINGER: f32 = 0.5;

/// One detected hand in normalized image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: Vec<Vec2>,
}

impl HandLandmarks {
    /// Validate a landmark set.
    pub fn new(points: Vec<Vec2>) -> Result<Self, GestureError> {
        if points.len() < LANDMARK_COUNT {
            return Err(GestureError::MalformedFrame {
                expected: LANDMARK_COUNT,
                got: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Normalized palm centre.
    pub fn palm(&self) -> Vec2 {
        PALM_LANDMARKS.iter().map(|&i| self.points[i]).sum::<Vec2>() / PALM_LANDMARKS.len() as f32
    }

    /// Extension state per finger, thumb first.
    pub fn fingers(&self) -> [bool; 5] {
        FINGERTIPS.map(|tip| self.points[tip].y < self.points[tip - 2].y)
    }

    pub fn extended_count(&self) -> usize {
        self.fingers().iter().filter(|f| **f).count()
    }
}

/// What the source saw in one video frame.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureFrame {
    NoHand,
    Hand(HandLandmarks),
}

/// A supplier of hand-landmark frames.
pub trait GestureSource {
    /// Next frame if one is ready. `Ok(None)` means no new video frame yet.
    ///
    /// An error means the source is gone for good.
    fn poll(&mut self) -> Result<Option<GestureFrame>, GestureError>;

    /// Human readable name for logs.
    fn name(&self) -> &str {
        "gesture"
    }
}

/// Turns gesture frames into interactions.
pub struct GestureProvider {
    source: Box<dyn GestureSource>,
    sample: PointerSample,
    last_palm: Option<Vec2>,
}

impl GestureProvider {
    pub fn new(source: Box<dyn GestureSource>) -> Self {
        Self {
            source,
            sample: PointerSample::default(),
            last_palm: None,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Latest pointer view of the hand.
    pub fn sample(&self) -> PointerSample {
        self.sample
    }

    /// Pull one frame from the source and interpret it for a surface of
    /// `extent` pixels.
    pub fn poll(&mut self, extent: Vec2) -> Result<Vec<Interaction>, GestureError> {
        match self.source.poll()? {
            Some(frame) => Ok(self.process(&frame, extent)),
            None => Ok(Vec::new()),
        }
    }

    /// Interpret one frame.
    pub fn process(&mut self, frame: &GestureFrame, extent: Vec2) -> Vec<Interaction> {
        let hand = match frame {
            GestureFrame::NoHand => {
                self.sample.active = false;
                self.sample.fingers = 0;
                return Vec::new();
            }
            GestureFrame::Hand(hand) => hand,
        };

        let pos = hand.palm() * extent;
        let fingers = hand.extended_count();
        self.sample = PointerSample {
            pos,
            active: true,
            fingers: fingers as u8,
        };

        let mut out = Vec::new();
        if let Some(last) = self.last_palm.replace(pos) {
            if let Some(burst) = movement_burst(last, pos) {
                out.push(burst);
            }
        }
        if fingers >= ATTRACTOR_FINGERS {
            out.push(Interaction::Attractor {
                pos,
                strength: fingers as f32 * STRENGTH_PER_FINGER,
                note: false,
            });
        }
        out
    }
}

impl std::fmt::Debug for GestureProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureProvider")
            .field("source", &self.source.name())
            .field("sample", &self.sample)
            .finish()
    }
}

/// Recording file layout: one entry per video frame, `null` for no hand.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Recording {
    frames: Vec<Option<Vec<[f32; 2]>>>,
}

/// Plays back recorded gesture frames, one per poll.
///
/// ```json
/// { "frames": [ null, [[0.5, 0.6], [0.52, 0.55], ...] ] }
/// ```
#[derive(Debug, Clone)]
pub struct ReplayGestures {
    frames: VecDeque<GestureFrame>,
    looping: bool,
    all: Vec<GestureFrame>,
}

impl ReplayGestures {
    pub fn new(frames: Vec<GestureFrame>) -> Self {
        Self {
            frames: frames.iter().cloned().collect(),
            looping: false,
            all: frames,
        }
    }

    /// Start over after the last frame instead of ending.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, GestureError> {
        let recording: Recording = serde_json::from_str(json)?;
        let frames = recording
            .frames
            .into_iter()
            .map(|frame| match frame {
                None => Ok(GestureFrame::NoHand),
                Some(points) => {
                    let points = points.into_iter().map(Vec2::from).collect();
                    HandLandmarks::new(points).map(GestureFrame::Hand)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(frames))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GestureError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| GestureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl GestureSource for ReplayGestures {
    fn poll(&mut self) -> Result<Option<GestureFrame>, GestureError> {
        if self.frames.is_empty() && self.looping && !self.all.is_empty() {
            self.frames.extend(self.all.iter().cloned());
        }
        self.frames
            .pop_front()
            .map(Some)
            .ok_or_else(|| GestureError::Unavailable("recording ended".into()))
    }

    fn name(&self) -> &str {
        "replay"
    }
}
