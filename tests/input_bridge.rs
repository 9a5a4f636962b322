//! Input bridge driving the engine: recorded gestures, pointer fallback.

use nexus::input::{GestureFrame, HandLandmarks, InputBridge, ReplayGestures};
use nexus::prelude::*;

const EXTENT: Vec2 = Vec2::new(640.0, 480.0);

fn config() -> NexusConfig {
    let mut config = NexusConfig::default();
    config.simulation.seed = Some(1);
    config.auto_mode.enabled = false;
    config
}

/// 21 landmarks with the palm at `palm`; fingertips above their joints when
/// extended, below otherwise.
fn hand_points(palm: [f32; 2], extended: usize) -> Vec<[f32; 2]> {
    let mut points = vec![palm; 21];
    for (finger, tip) in [4usize, 8, 12, 16, 20].into_iter().enumerate() {
        let dy = if finger < extended { -0.05 } else { 0.05 };
        points[tip] = [palm[0], palm[1] + dy];
    }
    points
}

fn recording(frames: &[Option<Vec<[f32; 2]>>]) -> String {
    serde_json::json!({ "frames": frames }).to_string()
}

#[test]
fn test_recorded_hand_drives_engine() {
    let json = recording(&[
        Some(hand_points([0.5, 0.5], 0)),
        Some(hand_points([0.5625, 0.5], 0)),
        None,
        Some(hand_points([0.5625, 0.5], 4)),
    ]);
    let replay = ReplayGestures::from_json(&json).unwrap();
    let mut bridge = InputBridge::new(Some(Box::new(replay)));
    let mut nexus = Nexus::new(config(), EXTENT.x, EXTENT.y);
    let mut audio = AudioFeedback::silent();

    // First sighting only positions the hand
    assert!(bridge.poll(EXTENT).is_empty());
    assert!(bridge.sample().active);

    // 40 px to the right: a capped movement burst
    let burst = bridge.poll(EXTENT);
    assert_eq!(
        burst,
        vec![Interaction::Burst { pos: Vec2::new(360.0, 240.0), count: 10 }]
    );
    for interaction in burst {
        nexus.interact(interaction, 0.0, &mut audio);
    }
    assert_eq!(nexus.particles().len(), 10);

    assert!(bridge.poll(EXTENT).is_empty());
    assert!(!bridge.sample().active);

    // Open hand, same place: attractor only
    let open = bridge.poll(EXTENT);
    assert_eq!(open.len(), 1);
    for interaction in open {
        nexus.interact(interaction, 10.0, &mut audio);
    }
    let attractor = nexus.attractors().iter().next().unwrap();
    assert_eq!(attractor.pos, Vec2::new(360.0, 240.0));
    assert_eq!(attractor.strength, 2.0);
    assert_eq!(bridge.sample().fingers, 4);

    // Recording over: pointer takes over
    assert!(bridge.poll(EXTENT).is_empty());
    assert!(!bridge.is_gesture());
    bridge.on_pointer_move(Vec2::new(10.0, 10.0));
    bridge.on_pointer_press();
    let press = bridge.poll(EXTENT);
    assert_eq!(
        press,
        vec![Interaction::Attractor { pos: Vec2::new(10.0, 10.0), strength: 2.0, note: true }]
    );
}

#[test]
fn test_malformed_recording_is_rejected() {
    let json = recording(&[Some(vec![[0.5, 0.5]; 4])]);
    assert!(matches!(
        ReplayGestures::from_json(&json),
        Err(nexus::GestureError::MalformedFrame { expected: 21, got: 4 })
    ));
}

#[test]
fn test_pointer_only_bridge() {
    let mut bridge = InputBridge::new(None);
    assert!(!bridge.is_gesture());

    bridge.on_pointer_move(Vec2::new(100.0, 100.0));
    bridge.on_pointer_move(Vec2::new(100.0, 103.0));
    assert!(bridge.poll(EXTENT).is_empty());

    bridge.on_pointer_move(Vec2::new(100.0, 123.0));
    assert_eq!(
        bridge.poll(EXTENT),
        vec![Interaction::Burst { pos: Vec2::new(100.0, 123.0), count: 10 }]
    );
}

#[test]
fn test_looping_replay_never_falls_back() {
    let hand = HandLandmarks::new(
        hand_points([0.2, 0.2], 1).into_iter().map(Vec2::from).collect(),
    )
    .unwrap();
    let replay = ReplayGestures::new(vec![GestureFrame::Hand(hand), GestureFrame::NoHand]).looping(true);
    let mut bridge = InputBridge::new(Some(Box::new(replay)));
    for _ in 0..20 {
        bridge.poll(EXTENT);
    }
    assert!(bridge.is_gesture());
}
