//! Keyboard controls.
//!
//! Keys map to [`Command`]s that adjust the engine the same way the control
//! panel sliders do. A held key fires its command once; OS key repeat is
//! ignored.
//!
//! | Key | Command |
//! |-----|---------|
//! | Space | Centred pulse |
//! | A | Toggle auto mode |
//! | Up / Down | Intensity ± 0.05 |
//! | Right / Left | Flow speed ± 0.05 |
//! | `]` / `[` | Complexity ± 0.5 |
//! | Escape | Quit |

use std::collections::HashSet;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::engine::Nexus;

const INTENSITY_STEP: f32 = 0.05;
const FLOW_SPEED_STEP: f32 = 0.05;
const COMPLEXITY_STEP: f32 = 0.5;

/// Keys the host reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A,
    Space,
    Up,
    Down,
    Left,
    Right,
    BracketLeft,
    BracketRight,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyA => KeyCode::A,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::BracketLeft => KeyCode::BracketLeft,
            WinitKeyCode::BracketRight => KeyCode::BracketRight,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// An engine adjustment triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Pulse,
    ToggleAutoMode,
    AdjustIntensity(f32),
    AdjustFlowSpeed(f32),
    AdjustComplexity(f32),
    Quit,
}

impl Command {
    pub fn for_key(key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Space => Some(Command::Pulse),
            KeyCode::A => Some(Command::ToggleAutoMode),
            KeyCode::Up => Some(Command::AdjustIntensity(INTENSITY_STEP)),
            KeyCode::Down => Some(Command::AdjustIntensity(-INTENSITY_STEP)),
            KeyCode::Right => Some(Command::AdjustFlowSpeed(FLOW_SPEED_STEP)),
            KeyCode::Left => Some(Command::AdjustFlowSpeed(-FLOW_SPEED_STEP)),
            KeyCode::BracketRight => Some(Command::AdjustComplexity(COMPLEXITY_STEP)),
            KeyCode::BracketLeft => Some(Command::AdjustComplexity(-COMPLEXITY_STEP)),
            KeyCode::Escape => Some(Command::Quit),
            KeyCode::Other => None,
        }
    }

    /// Apply to the engine. [`Command::Quit`] is left to the host.
    pub fn apply(self, nexus: &mut Nexus) {
        match self {
            Command::Pulse => nexus.pulse(),
            Command::ToggleAutoMode => nexus.set_auto_mode(!nexus.auto_mode()),
            Command::AdjustIntensity(d) => nexus.set_intensity(nexus.intensity() + d),
            Command::AdjustFlowSpeed(d) => nexus.set_flow_speed(nexus.flow_speed() + d),
            Command::AdjustComplexity(d) => nexus.set_complexity(nexus.complexity() + d),
            Command::Quit => {}
        }
    }
}

/// Tracks held keys so repeats don't re-fire commands.
#[derive(Debug, Default)]
pub struct Keyboard {
    held: HashSet<KeyCode>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Returns its command on the initial press only.
    pub fn press(&mut self, key: KeyCode) -> Option<Command> {
        if self.held.insert(key) {
            Command::for_key(key)
        } else {
            None
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<Command> {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return None;
        };
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        let key = KeyCode::from(code);
        match event.state {
            ElementState::Pressed => self.press(key),
            ElementState::Released => {
                self.release(key);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NexusConfig;

    #[test]
    fn test_winit_mapping() {
        assert_eq!(KeyCode::from(WinitKeyCode::Space), KeyCode::Space);
        assert_eq!(KeyCode::from(WinitKeyCode::BracketRight), KeyCode::BracketRight);
        assert!(matches!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::Other));
    }

    #[test]
    fn test_press_fires_once_until_released() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.press(KeyCode::Space), Some(Command::Pulse));
        assert_eq!(kb.press(KeyCode::Space), None);
        assert!(kb.is_held(KeyCode::Space));
        kb.release(KeyCode::Space);
        assert_eq!(kb.press(KeyCode::Space), Some(Command::Pulse));
    }

    #[test]
    fn test_unmapped_keys_do_nothing() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.press(KeyCode::Other), None);
    }

    #[test]
    fn test_commands_adjust_engine() {
        let mut nexus = Nexus::new(NexusConfig::default(), 400.0, 300.0);
        let auto = nexus.auto_mode();

        Command::AdjustIntensity(0.05).apply(&mut nexus);
        assert!((nexus.intensity() - 0.55).abs() < 1e-6);
        Command::AdjustComplexity(-0.5).apply(&mut nexus);
        assert!((nexus.complexity() - 2.5).abs() < 1e-6);
        Command::AdjustFlowSpeed(1.0).apply(&mut nexus);
        assert_eq!(nexus.flow_speed(), 1.0);
        Command::ToggleAutoMode.apply(&mut nexus);
        assert_eq!(nexus.auto_mode(), !auto);
        Command::Pulse.apply(&mut nexus);
        assert_eq!(nexus.pending_rings(), 5);
    }
}
