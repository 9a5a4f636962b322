//! Configuration for a Nexus session.
//!
//! Every section is `#[serde(default)]`, so a JSON file only needs the values
//! it wants to change:
//!
//! ```json
//! {
//!   "simulation": { "particle_count": 250, "seed": 7 },
//!   "controls": { "intensity": 0.8 }
//! }
//! ```
//!
//! Values are checked by [`NexusConfig::validate`] after loading; the engine
//! assumes a validated config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Complete session configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NexusConfig {
    pub simulation: SimulationConfig,
    pub controls: ControlsConfig,
    pub palette: PaletteConfig,
    pub auto_mode: AutoModeConfig,
    pub window: WindowConfig,
    pub audio: AudioConfig,
}

/// Particle budget, frame pacing and spawn limits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial target pool size. Adjusted at runtime by the quality controller.
    pub particle_count: u32,
    /// Lower bound for the adaptive target.
    pub min_particles: u32,
    /// Upper bound for the adaptive target.
    pub max_particles: u32,
    /// Hard cap on live particles; bursts never push the pool past this.
    pub pool_capacity: usize,
    /// Maximum particles added per frame while topping up the pool.
    pub spawn_per_frame: u32,
    /// Soft frame-rate ceiling.
    pub fps_limit: f32,
    /// Flow field cell size in pixels.
    pub field_resolution: f32,
    /// Below this measured FPS the target shrinks.
    pub low_fps: f32,
    /// Above this measured FPS the target grows.
    pub high_fps: f32,
    pub decrease_step: u32,
    pub increase_step: u32,
    /// Length of one FPS sampling window.
    pub sample_window_ms: f64,
    /// Frames between consecutive rings of a ring burst.
    pub ring_delay_frames: u64,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 200,
            min_particles: 100,
            max_particles: 300,
            pool_capacity: 500,
            spawn_per_frame: 5,
            fps_limit: 60.0,
            field_resolution: 20.0,
            low_fps: 30.0,
            high_fps: 55.0,
            decrease_step: 10,
            increase_step: 5,
            sample_window_ms: 1000.0,
            ring_delay_frames: 6,
            seed: None,
        }
    }
}

/// User-tunable motion controls (the slider values).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Flow field force magnitude, 0..=1.
    pub intensity: f32,
    /// Heading irregularity, 0..=10.
    pub complexity: f32,
    /// Flow field evolution speed, 0..=1.
    pub flow_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            complexity: 3.0,
            flow_speed: 0.7,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    /// Starting hue in degrees; cycles at 0.1°/frame.
    pub base_hue: f32,
    /// Swing applied to burst hues around the base hue.
    pub hue_range: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            base_hue: 160.0,
            hue_range: 60.0,
        }
    }
}

/// Periodic attractor placement when nobody is interacting.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutoModeConfig {
    pub enabled: bool,
    pub interval_ms: f64,
    /// Probability of playing a note with each automatic attractor.
    pub note_chance: f32,
}

impl Default for AutoModeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 3000.0,
            note_chance: 0.3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Quantum Nexus".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Synth output gain in decibels.
    pub volume_db: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume_db: -20.0,
        }
    }
}

impl NexusConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.min_particles > sim.max_particles {
            return Err(invalid(
                "simulation.min_particles",
                format!("{} exceeds max_particles {}", sim.min_particles, sim.max_particles),
            ));
        }
        if !(sim.min_particles..=sim.max_particles).contains(&sim.particle_count) {
            return Err(invalid(
                "simulation.particle_count",
                format!(
                    "{} outside [{}, {}]",
                    sim.particle_count, sim.min_particles, sim.max_particles
                ),
            ));
        }
        if sim.pool_capacity < sim.max_particles as usize {
            return Err(invalid(
                "simulation.pool_capacity",
                "must be at least max_particles".into(),
            ));
        }
        if !(sim.fps_limit.is_finite() && sim.fps_limit > 0.0) {
            return Err(invalid("simulation.fps_limit", "must be positive".into()));
        }
        if !(sim.field_resolution.is_finite() && sim.field_resolution >= 1.0) {
            return Err(invalid(
                "simulation.field_resolution",
                "must be at least 1 pixel".into(),
            ));
        }
        if sim.low_fps >= sim.high_fps {
            return Err(invalid(
                "simulation.low_fps",
                "must be below high_fps".into(),
            ));
        }
        if !(sim.sample_window_ms > 0.0) {
            return Err(invalid(
                "simulation.sample_window_ms",
                "must be positive".into(),
            ));
        }
        if !(self.auto_mode.interval_ms > 0.0) {
            return Err(invalid("auto_mode.interval_ms", "must be positive".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be non-zero".into()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        NexusConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = NexusConfig::from_json(
            r#"{ "simulation": { "particle_count": 250, "seed": 7 }, "controls": { "intensity": 0.8 } }"#,
        )
        .unwrap();

        assert_eq!(config.simulation.particle_count, 250);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.max_particles, 300);
        assert_eq!(config.controls.intensity, 0.8);
        assert_eq!(config.controls.flow_speed, 0.7);
        assert!(config.auto_mode.enabled);
    }

    #[test]
    fn test_particle_count_outside_bounds_rejected() {
        let err = NexusConfig::from_json(r#"{ "simulation": { "particle_count": 50 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "simulation.particle_count", .. }
        ));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = NexusConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("nexus-config-{}.json", std::process::id()));
        let mut config = NexusConfig::default();
        config.palette.base_hue = 200.0;
        config.save(&path).unwrap();

        let loaded = NexusConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = NexusConfig::load("/definitely/not/here/nexus.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
