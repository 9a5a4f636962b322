//! Pointer (mouse) input, the fallback when no gesture source is usable.
//!
//! Movement bursts particles like palm movement does; a press places a
//! strength-2 attractor and plays a note. Events are queued as they arrive
//! and handed to the engine on the next poll.

use glam::Vec2;

use super::{movement_burst, PointerSample};
use crate::engine::Interaction;

/// Strength of the attractor placed by a press.
const PRESS_STRENGTH: f32 = 2.0;

#[derive(Debug, Default)]
pub struct PointerProvider {
    sample: PointerSample,
    last: Option<Vec2>,
    pending: Vec<Interaction>,
}

impl PointerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor moved to `pos` (surface pixels).
    pub fn on_move(&mut self, pos: Vec2) {
        if !pos.is_finite() {
            return;
        }
        self.sample.pos = pos;
        self.sample.active = true;
        if let Some(last) = self.last.replace(pos) {
            if let Some(burst) = movement_burst(last, pos) {
                self.pending.push(burst);
            }
        }
    }

    /// Button pressed at the current cursor position.
    pub fn on_press(&mut self) {
        if !self.sample.active {
            return;
        }
        self.pending.push(Interaction::Attractor {
            pos: self.sample.pos,
            strength: PRESS_STRENGTH,
            note: true,
        });
    }

    /// Cursor left the surface. The next move starts a fresh stroke.
    pub fn on_leave(&mut self) {
        self.sample.active = false;
        self.last = None;
    }

    pub fn sample(&self) -> PointerSample {
        self.sample
    }

    /// Take the queued interactions.
    pub fn drain(&mut self) -> Vec<Interaction> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_move_only_positions() {
        let mut p = PointerProvider::new();
        p.on_move(Vec2::new(300.0, 300.0));
        assert!(p.drain().is_empty());
        assert!(p.sample().active);
    }

    #[test]
    fn test_move_burst_scales_with_distance() {
        let mut p = PointerProvider::new();
        p.on_move(Vec2::new(100.0, 100.0));
        p.on_move(Vec2::new(104.0, 100.0));
        p.on_move(Vec2::new(112.0, 100.0));
        p.on_move(Vec2::new(112.0, 200.0));
        let out = p.drain();
        assert_eq!(
            out,
            vec![
                Interaction::Burst { pos: Vec2::new(112.0, 100.0), count: 4 },
                Interaction::Burst { pos: Vec2::new(112.0, 200.0), count: 10 },
            ]
        );
        assert!(p.drain().is_empty());
    }

    #[test]
    fn test_press_places_attractor_with_note() {
        let mut p = PointerProvider::new();
        p.on_press();
        assert!(p.drain().is_empty());

        p.on_move(Vec2::new(10.0, 20.0));
        p.on_press();
        assert_eq!(
            p.drain(),
            vec![Interaction::Attractor { pos: Vec2::new(10.0, 20.0), strength: 2.0, note: true }]
        );
    }

    #[test]
    fn test_leave_resets_stroke() {
        let mut p = PointerProvider::new();
        p.on_move(Vec2::new(0.0, 0.0));
        p.on_leave();
        p.on_move(Vec2::new(500.0, 500.0));
        assert!(p.drain().is_empty());
        assert!(p.sample().active);
    }
}
