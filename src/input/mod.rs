//! Input bridge: gestures or pointer, never both.
//!
//! [`InputBridge`] holds one [`InputProvider`], chosen at startup:
//!
//! - [`InputProvider::Gesture`] when a [`GestureSource`] is available
//! - [`InputProvider::Pointer`] otherwise
//!
//! If the gesture source fails at any point the bridge logs the error and
//! switches to the pointer for the rest of the session. Pointer events that
//! arrive while gestures are active are ignored.
//!
//! # Example
//!
//! ```ignore
//! use nexus::input::InputBridge;
//!
//! let mut input = InputBridge::pointer();
//! input.on_pointer_move(Vec2::new(10.0, 10.0));
//! for interaction in input.poll(nexus.size()) {
//!     nexus.interact(interaction, now_ms, &mut audio);
//! }
//! ```

pub mod gesture;
pub mod keys;
pub mod pointer;

use glam::Vec2;
use tracing::{info, warn};

use crate::engine::Interaction;

pub use gesture::{GestureFrame, GestureProvider, GestureSource, HandLandmarks, ReplayGestures};
pub use keys::{Command, KeyCode, Keyboard};
pub use pointer::PointerProvider;

/// Movement below this many pixels between samples is ignored.
pub const MOVE_THRESHOLD: f32 = 5.0;

/// Largest burst a single movement can request.
const MAX_MOVE_BURST: f32 = 10.0;

/// Unified view of the active input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    /// Surface pixels.
    pub pos: Vec2,
    /// A hand is visible, or the cursor is over the surface.
    pub active: bool,
    /// Extended fingers; always 0 for the pointer.
    pub fingers: u8,
}

/// Burst for a move from `from` to `to`, if it was large enough.
///
/// Asks for one particle per 2 px moved, up to 10.
pub(crate) fn movement_burst(from: Vec2, to: Vec2) -> Option<Interaction> {
    let distance = from.distance(to);
    if !(distance > MOVE_THRESHOLD) {
        return None;
    }
    Some(Interaction::Burst {
        pos: to,
        count: (distance / 2.0).min(MAX_MOVE_BURST).ceil() as u32,
    })
}

/// The active input mode.
#[derive(Debug)]
pub enum InputProvider {
    Gesture(GestureProvider),
    Pointer(PointerProvider),
}

/// Single entry point for user input.
#[derive(Debug)]
pub struct InputBridge {
    provider: InputProvider,
}

impl InputBridge {
    /// Pointer-only bridge.
    pub fn pointer() -> Self {
        info!("input: pointer");
        Self {
            provider: InputProvider::Pointer(PointerProvider::new()),
        }
    }

    /// Gesture bridge with pointer fallback.
    pub fn gestures(source: Box<dyn GestureSource>) -> Self {
        info!("input: gestures from {}", source.name());
        Self {
            provider: InputProvider::Gesture(GestureProvider::new(source)),
        }
    }

    /// Gestures when a source is given, pointer otherwise.
    pub fn new(source: Option<Box<dyn GestureSource>>) -> Self {
        match source {
            Some(source) => Self::gestures(source),
            None => Self::pointer(),
        }
    }

    pub fn provider(&self) -> &InputProvider {
        &self.provider
    }

    pub fn is_gesture(&self) -> bool {
        matches!(self.provider, InputProvider::Gesture(_))
    }

    pub fn sample(&self) -> PointerSample {
        match &self.provider {
            InputProvider::Gesture(g) => g.sample(),
            InputProvider::Pointer(p) => p.sample(),
        }
    }

    /// Interactions produced since the last poll, for a surface of `extent`
    /// pixels.
    pub fn poll(&mut self, extent: Vec2) -> Vec<Interaction> {
        match &mut self.provider {
            InputProvider::Gesture(g) => match g.poll(extent) {
                Ok(out) => out,
                Err(err) => {
                    warn!("gesture input lost ({err}); falling back to pointer");
                    self.provider = InputProvider::Pointer(PointerProvider::new());
                    Vec::new()
                }
            },
            InputProvider::Pointer(p) => p.drain(),
        }
    }

    pub fn on_pointer_move(&mut self, pos: Vec2) {
        if let InputProvider::Pointer(p) = &mut self.provider {
            p.on_move(pos);
        }
    }

    pub fn on_pointer_press(&mut self) {
        if let InputProvider::Pointer(p) = &mut self.provider {
            p.on_press();
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if let InputProvider::Pointer(p) = &mut self.provider {
            p.on_leave();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_burst_threshold() {
        assert!(movement_burst(Vec2::ZERO, Vec2::new(5.0, 0.0)).is_none());
        assert_eq!(
            movement_burst(Vec2::ZERO, Vec2::new(7.0, 0.0)),
            Some(Interaction::Burst { pos: Vec2::new(7.0, 0.0), count: 4 })
        );
        assert!(movement_burst(Vec2::ZERO, Vec2::new(f32::NAN, 0.0)).is_none());
    }

    #[test]
    fn test_failed_gestures_fall_back_once() {
        let mut bridge = InputBridge::gestures(Box::new(ReplayGestures::new(vec![GestureFrame::NoHand])));
        assert!(bridge.is_gesture());

        assert!(bridge.poll(Vec2::splat(100.0)).is_empty());
        assert!(bridge.is_gesture());

        // Recording exhausted: source error
        bridge.poll(Vec2::splat(100.0));
        assert!(!bridge.is_gesture());

        bridge.on_pointer_move(Vec2::new(1.0, 1.0));
        bridge.on_pointer_press();
        assert_eq!(bridge.poll(Vec2::splat(100.0)).len(), 1);
        assert!(!bridge.is_gesture());
    }

    #[test]
    fn test_pointer_ignored_in_gesture_mode() {
        let source = ReplayGestures::new(vec![GestureFrame::NoHand]).looping(true);
        let mut bridge = InputBridge::new(Some(Box::new(source)));
        bridge.on_pointer_move(Vec2::new(10.0, 10.0));
        bridge.on_pointer_move(Vec2::new(90.0, 90.0));
        bridge.on_pointer_press();
        assert!(bridge.poll(Vec2::splat(100.0)).is_empty());
        assert!(!bridge.sample().active);
    }

    #[test]
    fn test_gesture_sample_scaled_to_surface() {
        let hand = gesture::tests::hand(Vec2::new(0.25, 0.75), 1);
        let source = ReplayGestures::new(vec![GestureFrame::Hand(hand)]);
        let mut bridge = InputBridge::new(Some(Box::new(source)));
        bridge.poll(Vec2::new(400.0, 200.0));
        let sample = bridge.sample();
        assert_eq!(sample.pos, Vec2::new(100.0, 150.0));
        assert!(sample.active);
        assert_eq!(sample.fingers, 1);
    }
}
