//! # Quantum Nexus
//!
//! A flow-field particle engine with adaptive quality control, driven by
//! pointer or hand-gesture input and reacting to an audio level signal.
//!
//! Particles drift through a time-varying vector field, get pulled by
//! short-lived attractors, leave fading trails and respawn to keep the pool
//! at a particle budget that follows the measured frame rate.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nexus::prelude::*;
//!
//! let mut nexus = Nexus::new(NexusConfig::default(), 800.0, 600.0);
//! nexus.seed_particles();
//!
//! let mut raster = Raster::new(800, 600);
//! let mut audio = AudioFeedback::silent();
//! let clock = Clock::new();
//!
//! loop {
//!     let now = clock.now_ms();
//!     nexus.interact(Interaction::Burst { pos: Vec2::new(400.0, 300.0), count: 10 }, now, &mut audio);
//!     nexus.frame(now, &mut raster, &mut audio);
//!     // hand raster.as_bytes() to a display
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The engine
//!
//! [`Nexus`] owns the [`FlowField`], the particle pool, up to three
//! [`Attractor`]s and the [`QualityController`]. It never reads a clock:
//! every call takes the current time in milliseconds, so the simulation can
//! be stepped deterministically with a fixed seed.
//!
//! ### Surfaces
//!
//! Drawing goes through the [`Surface`] trait. [`Raster`] is a software RGBA8
//! implementation the windowed app uploads to the GPU; [`HeadlessSurface`]
//! only counts calls and is what tests and benchmarks use.
//!
//! ### Input and audio
//!
//! [`InputBridge`] turns gestures or pointer events into [`Interaction`]s.
//! [`AudioFeedback`] supplies the level signal and plays notes; when no
//! audio backend is available it stays silent and the engine keeps running.
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `egui` | [`ui::ControlPanel`] overlay in the window |
//! | `audio` | `synth::DeviceSynth`, sound through the default output device |

pub mod attractor;
pub mod audio;
pub mod burst;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod gpu;
pub mod input;
pub mod particle;
pub mod quality;
pub mod raster;
pub mod surface;
pub mod synth;
pub mod time;
#[cfg(feature = "egui")]
pub mod ui;
pub mod window;

pub use attractor::{Attractor, AttractorSet, MAX_ATTRACTORS};
pub use audio::{AudioBackend, AudioFeedback, Note, NoteLength, Pitch};
pub use burst::{BurstShape, PendingRing, RingSchedule};
pub use config::NexusConfig;
pub use engine::{FrameOutcome, FrameStats, Interaction, Nexus};
pub use error::{AppError, AudioError, ConfigError, GestureError, GpuError};
pub use field::{FlowField, FIELD_RESOLUTION};
pub use glam::Vec2;
pub use input::{
    GestureFrame, GestureSource, HandLandmarks, InputBridge, InputProvider, KeyCode, PointerSample,
    ReplayGestures,
};
pub use particle::{Particle, TrailPoint};
pub use quality::{QualityAdjustment, QualityController};
pub use raster::{Raster, Texel};
pub use surface::{HeadlessSurface, Hsla, Paint, Path, RadialGradient, Rect, Rgba, Stroke, Surface};
pub use synth::{Analyser, OfflineSynth, Synth};
#[cfg(feature = "audio")]
pub use synth::DeviceSynth;
pub use time::{Clock, FrameGate, Interval};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use nexus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::audio::AudioFeedback;
    pub use crate::burst::BurstShape;
    pub use crate::config::NexusConfig;
    pub use crate::engine::{FrameOutcome, Interaction, Nexus};
    pub use crate::input::{GestureSource, InputBridge, ReplayGestures};
    pub use crate::raster::Raster;
    pub use crate::surface::{HeadlessSurface, Surface};
    pub use crate::synth::OfflineSynth;
    pub use crate::time::Clock;
    pub use crate::Vec2;
}
