//! The Nexus engine.
//!
//! [`Nexus`] owns every piece of simulation state: the flow field, the
//! particle pool, the attractors, queued burst rings and the adaptive
//! quality controller. Hosts drive it with two calls:
//!
//! - [`Nexus::interact`] for discrete input events
//! - [`Nexus::frame`] once per display refresh
//!
//! Both take an explicit millisecond timestamp, so a test can step the
//! engine with synthetic time.
//!
//! # Frame order
//!
//! 1. Visibility check, then the frame-rate ceiling
//! 2. Advance the frame counter and re-evaluate the flow field
//! 3. Count the frame for the quality controller
//! 4. Fire due burst rings, then auto mode
//! 5. Fade the surface and draw the backdrop
//! 6. Age, draw and cull attractors; advance the base hue
//! 7. Update each particle, apply attractor forces, draw, cull
//! 8. Top the pool up toward the target, a few particles per frame
//!
//! # Example
//!
//! ```ignore
//! use nexus::prelude::*;
//!
//! let mut nexus = Nexus::new(NexusConfig::default(), 800.0, 600.0);
//! nexus.seed_particles();
//!
//! let mut surface = HeadlessSurface::new(800.0, 600.0);
//! let mut audio = AudioFeedback::silent();
//! for i in 0..60 {
//!     nexus.frame(i as f64 * 17.0, &mut surface, &mut audio);
//! }
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::attractor::{Attractor, AttractorSet};
use crate::audio::AudioFeedback;
use crate::burst::{self, BurstShape, RingSchedule};
use crate::config::NexusConfig;
use crate::field::FlowField;
use crate::particle::Particle;
use crate::quality::{QualityAdjustment, QualityController};
use crate::surface::{Hsla, Paint, Path, RadialGradient, Rect, Rgba, Stroke, Surface};
use crate::time::{FrameGate, Interval};

/// Translucent black laid over the surface each frame.
const FADE: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.15);

/// Rays in the audio backdrop.
const RAY_COUNT: usize = 8;

/// Chance that a movement burst also plays a note.
const BURST_NOTE_CHANCE: f32 = 0.3;

/// Strength of the attractor placed by a pulse.
const PULSE_STRENGTH: f32 = 3.0;

/// A discrete input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    /// Movement burst at `pos`; sometimes plays a note.
    Burst { pos: Vec2, count: u32 },
    /// Place an attractor, optionally with a note.
    Attractor { pos: Vec2, strength: f32, note: bool },
    /// Centred ring burst plus a strong attractor.
    Pulse,
    /// A debounced note on its own.
    Note,
}

/// Per-frame statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame counter after this frame.
    pub time: u64,
    pub audio_level: f32,
    pub particles: usize,
    pub attractors: usize,
    pub spawned: usize,
    pub culled: usize,
    pub rings_fired: usize,
    /// Set when this frame closed a quality sampling window.
    pub adjustment: Option<QualityAdjustment>,
}

/// What a call to [`Nexus::frame`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Host not visible; nothing ran.
    Hidden,
    /// Too soon after the previous frame; nothing ran.
    Throttled,
    /// A full frame ran.
    Ran(FrameStats),
}

impl FrameOutcome {
    pub fn ran(&self) -> bool {
        matches!(self, FrameOutcome::Ran(_))
    }

    pub fn stats(&self) -> Option<&FrameStats> {
        match self {
            FrameOutcome::Ran(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Flow-field particle engine.
#[derive(Debug)]
pub struct Nexus {
    field: FlowField,
    particles: Vec<Particle>,
    attractors: AttractorSet,
    rings: RingSchedule,
    quality: QualityController,
    gate: FrameGate,
    auto_timer: Interval,
    rng: SmallRng,

    size: Vec2,
    visible: bool,
    time: u64,
    base_hue: f32,
    hue_range: f32,

    intensity: f32,
    complexity: f32,
    flow_speed: f32,

    auto_mode: bool,
    auto_note_chance: f32,
    pool_capacity: usize,
    spawn_per_frame: usize,
}

impl Nexus {
    /// Create an engine for a `width × height` surface with an empty pool.
    ///
    /// Call [`seed_particles`](Self::seed_particles) to fill it immediately
    /// instead of letting the top-up grow it over the first frames.
    pub fn new(config: NexusConfig, width: f32, height: f32) -> Self {
        let sim = &config.simulation;
        let rng = sim
            .seed
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);

        let mut nexus = Self {
            field: FlowField::new(sim.field_resolution),
            particles: Vec::with_capacity(sim.pool_capacity),
            attractors: AttractorSet::new(),
            rings: RingSchedule::new(sim.ring_delay_frames),
            quality: QualityController::new(sim),
            gate: FrameGate::new(sim.fps_limit),
            auto_timer: Interval::new(config.auto_mode.interval_ms),
            rng,
            size: Vec2::ZERO,
            visible: true,
            time: 0,
            base_hue: config.palette.base_hue,
            hue_range: config.palette.hue_range,
            intensity: config.controls.intensity.clamp(0.0, 1.0),
            complexity: config.controls.complexity.clamp(0.0, 10.0),
            flow_speed: config.controls.flow_speed.clamp(0.0, 1.0),
            auto_mode: config.auto_mode.enabled,
            auto_note_chance: config.auto_mode.note_chance,
            pool_capacity: sim.pool_capacity,
            spawn_per_frame: sim.spawn_per_frame as usize,
        };
        nexus.resize(width, height);
        nexus
    }

    /// Fill the pool up to the current target at random positions.
    pub fn seed_particles(&mut self) -> usize {
        if !self.has_area() {
            return 0;
        }
        let wanted = self.target_particles() as usize;
        let mut added = 0;
        while self.particles.len() < wanted.min(self.pool_capacity) {
            let pos = self.random_position();
            let p = Particle::spawn(pos, &mut self.rng);
            self.particles.push(p);
            added += 1;
        }
        added
    }

    /// Regenerate the flow field for a new surface size.
    ///
    /// Zero, negative or non-finite sizes leave an empty field and suspend
    /// spawning until a valid size arrives. Returns whether the size was
    /// accepted.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if self.field.generate(width, height) {
            self.size = Vec2::new(width, height);
            debug!(
                "flow field {}x{} cells for {width}x{height}",
                self.field.cols(),
                self.field.rows()
            );
            true
        } else {
            warn!("ignoring degenerate surface size {width}x{height}");
            self.size = Vec2::ZERO;
            false
        }
    }

    /// Pause or resume simulation. Hidden frames do no work.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(0.0, 1.0);
    }

    pub fn set_complexity(&mut self, complexity: f32) {
        self.complexity = complexity.clamp(0.0, 10.0);
    }

    pub fn set_flow_speed(&mut self, flow_speed: f32) {
        self.flow_speed = flow_speed.clamp(0.0, 1.0);
    }

    pub fn set_auto_mode(&mut self, enabled: bool) {
        if enabled && !self.auto_mode {
            self.auto_timer.reset();
        }
        self.auto_mode = enabled;
    }

    /// Add an attractor with a random radius. Evicts the oldest beyond three.
    pub fn create_attractor(&mut self, pos: Vec2, strength: f32) {
        let attractor = Attractor::with_random_radius(pos, strength, &mut self.rng);
        self.add_attractor(attractor);
    }

    /// Add a fully specified attractor. Evicts the oldest beyond three.
    pub fn add_attractor(&mut self, attractor: Attractor) {
        if !attractor.pos.is_finite() {
            return;
        }
        if let Some(old) = self.attractors.push(attractor) {
            trace!("evicted attractor at {:?}", old.pos);
        }
    }

    /// Add one particle if the pool has room.
    pub fn add_particle(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.pool_capacity {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Burst of up to `count` particles at `pos`.
    ///
    /// A scatter burst spawns immediately and returns how many particles it
    /// added. A ring burst is queued and returns 0; its rings spawn over the
    /// following frames. Both respect the pool capacity.
    pub fn create_particles_burst(&mut self, pos: Vec2, count: u32, shape: BurstShape) -> usize {
        if !self.has_area() || !pos.is_finite() {
            return 0;
        }
        let count = count.min(shape.cap());
        let hue = burst::burst_hue(self.base_hue, self.time, self.hue_range);
        match shape {
            BurstShape::Scatter => {
                let mut added = 0;
                for _ in 0..count {
                    if self.particles.len() >= self.pool_capacity {
                        break;
                    }
                    let p = burst::scatter_particle(pos, hue, &mut self.rng);
                    self.particles.push(p);
                    added += 1;
                }
                added
            }
            BurstShape::Rings => {
                self.rings.schedule(self.time, pos, count, hue);
                0
            }
        }
    }

    /// Centred ring burst plus a strong attractor.
    pub fn pulse(&mut self) {
        if !self.has_area() {
            return;
        }
        let center = self.size * 0.5;
        self.create_particles_burst(center, BurstShape::Rings.cap(), BurstShape::Rings);
        self.create_attractor(center, PULSE_STRENGTH);
    }

    /// Apply one input event.
    pub fn interact(&mut self, interaction: Interaction, now_ms: f64, audio: &mut AudioFeedback) {
        match interaction {
            Interaction::Burst { pos, count } => {
                self.create_particles_burst(pos, count, BurstShape::Scatter);
                if self.rng.gen::<f32>() < BURST_NOTE_CHANCE {
                    audio.play_note(now_ms, false);
                }
            }
            Interaction::Attractor { pos, strength, note } => {
                self.create_attractor(pos, strength);
                if note {
                    audio.play_note(now_ms, false);
                }
            }
            Interaction::Pulse => self.pulse(),
            Interaction::Note => {
                audio.play_note(now_ms, false);
            }
        }
    }

    /// Run one frame at wall time `now_ms`, drawing into `surface`.
    pub fn frame<S: Surface + ?Sized>(
        &mut self,
        now_ms: f64,
        surface: &mut S,
        audio: &mut AudioFeedback,
    ) -> FrameOutcome {
        if !self.visible {
            return FrameOutcome::Hidden;
        }
        if !self.gate.ready(now_ms) {
            return FrameOutcome::Throttled;
        }

        self.time += 1;
        self.field.update(self.time, self.flow_speed, self.intensity);

        let adjustment = self.quality.record_frame(now_ms);
        if let Some(adj) = adjustment.filter(QualityAdjustment::changed) {
            debug!(
                "quality: {:.0} fps, particle target {} -> {}",
                adj.fps, adj.previous, adj.target
            );
        }

        let rings_fired = self.fire_due_rings(now_ms, audio);
        self.run_auto_mode(now_ms, audio);

        audio.tick(now_ms);
        let audio_level = audio.level();

        surface.fade(FADE);
        self.draw_backdrop(surface, audio_level);

        self.attractors.update_and_draw(surface, self.base_hue);
        self.base_hue = (self.base_hue + 0.1) % 360.0;

        let before = self.particles.len();
        let bounds = self.field.extent();
        let field = &self.field;
        let attractors = &self.attractors;
        let complexity = self.complexity;
        self.particles.retain_mut(|p| {
            if !p.update(field, bounds, audio_level, complexity) {
                return false;
            }
            p.vel += attractors.force_on(p.pos);
            p.draw(&mut *surface);
            true
        });
        let culled = before - self.particles.len();

        let spawned = self.top_up();

        let stats = FrameStats {
            time: self.time,
            audio_level,
            particles: self.particles.len(),
            attractors: self.attractors.len(),
            spawned,
            culled,
            rings_fired,
            adjustment,
        };
        trace!(?stats, "frame");
        FrameOutcome::Ran(stats)
    }

    fn fire_due_rings(&mut self, now_ms: f64, audio: &mut AudioFeedback) -> usize {
        let mut fired = 0;
        while let Some(ring) = self.rings.pop_due(self.time) {
            let mut spawned = 0;
            for i in 0..ring.per_ring {
                if self.particles.len() >= self.pool_capacity {
                    break;
                }
                let p = burst::ring_particle(ring.center, ring.ring, i, ring.per_ring, ring.hue, &mut self.rng);
                self.particles.push(p);
                spawned += 1;
            }
            debug!("ring {} fired: {spawned} particles", ring.ring);
            if ring.plays_note() {
                audio.play_note(now_ms, true);
            }
            fired += 1;
        }
        fired
    }

    fn run_auto_mode(&mut self, now_ms: f64, audio: &mut AudioFeedback) {
        if !self.auto_mode || !self.has_area() || !self.auto_timer.tick(now_ms) {
            return;
        }
        let pos = self.random_position();
        self.create_attractor(pos, 1.0);
        if self.rng.gen::<f32>() < self.auto_note_chance {
            audio.play_note(now_ms, true);
        }
    }

    fn draw_backdrop<S: Surface + ?Sized>(&self, surface: &mut S, audio_level: f32) {
        if !self.has_area() {
            return;
        }
        let center = self.size * 0.5;
        let extent = self.size.min_element();

        let glow = RadialGradient::new(center, extent * 0.4)
            .stop(0.0, Hsla::new(self.base_hue, 100.0, 50.0, 0.1 + audio_level * 0.15))
            .stop(1.0, Rgba::TRANSPARENT);
        surface.fill_rect(Rect::from_size(self.size), &Paint::Radial(glow));

        if audio_level > 0.01 {
            let length = extent * 0.6;
            let spin = self.time as f32 * 0.0001;
            let mut rays = Path::new();
            for i in 0..RAY_COUNT {
                let angle = i as f32 / RAY_COUNT as f32 * std::f32::consts::TAU + spin;
                rays.move_to(center)
                    .line_to(center + Vec2::from_angle(angle) * length);
            }
            let color = Hsla::new(self.base_hue, 100.0, 50.0, 0.03 + audio_level * 0.05);
            surface.stroke_path(&rays, &Stroke::new(color, 1.0 + audio_level * 3.0));
        }
    }

    /// Spawn at most `spawn_per_frame` particles toward the target.
    fn top_up(&mut self) -> usize {
        if !self.has_area() {
            return 0;
        }
        let target = (self.target_particles() as usize).min(self.pool_capacity);
        let missing = target.saturating_sub(self.particles.len());
        let count = missing.min(self.spawn_per_frame);
        for _ in 0..count {
            let pos = self.random_position();
            let hue = self.base_hue + self.rng.gen_range(-15.0..15.0);
            let p = Particle::spawn(pos, &mut self.rng).with_hue(hue);
            self.particles.push(p);
        }
        count
    }

    fn random_position(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(0.0..self.size.x),
            self.rng.gen_range(0.0..self.size.y),
        )
    }

    #[inline]
    fn has_area(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn attractors(&self) -> &AttractorSet {
        &self.attractors
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    /// Current adaptive particle budget.
    pub fn target_particles(&self) -> u32 {
        self.quality.target()
    }

    /// Frame rate measured by the last quality window.
    pub fn fps(&self) -> f32 {
        self.quality.fps()
    }

    pub fn quality(&self) -> &QualityController {
        &self.quality
    }

    /// Rings queued but not yet fired.
    pub fn pending_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Frames executed so far.
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn base_hue(&self) -> f32 {
        self.base_hue
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn complexity(&self) -> f32 {
        self.complexity
    }

    pub fn flow_speed(&self) -> f32 {
        self.flow_speed
    }

    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    pub fn pool_capacity(&self) -> usize {
        self.pool_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    fn config() -> NexusConfig {
        let mut config = NexusConfig::default();
        config.simulation.seed = Some(11);
        config.auto_mode.enabled = false;
        config
    }

    #[test]
    fn test_new_engine_is_empty() {
        let nexus = Nexus::new(config(), 800.0, 600.0);
        assert!(nexus.particles().is_empty());
        assert_eq!(nexus.target_particles(), 200);
        assert_eq!(nexus.field().cols(), 40);
    }

    #[test]
    fn test_seed_fills_to_target() {
        let mut nexus = Nexus::new(config(), 800.0, 600.0);
        assert_eq!(nexus.seed_particles(), 200);
        assert_eq!(nexus.particles().len(), 200);
        assert!(nexus
            .particles()
            .iter()
            .all(|p| p.pos.x >= 0.0 && p.pos.x < 800.0 && p.pos.y >= 0.0 && p.pos.y < 600.0));
    }

    #[test]
    fn test_frame_gate_throttles() {
        let mut nexus = Nexus::new(config(), 200.0, 200.0);
        let mut surface = HeadlessSurface::new(200.0, 200.0);
        let mut audio = AudioFeedback::silent();

        assert!(nexus.frame(0.0, &mut surface, &mut audio).ran());
        assert_eq!(nexus.frame(5.0, &mut surface, &mut audio), FrameOutcome::Throttled);
        assert!(nexus.frame(17.0, &mut surface, &mut audio).ran());
        assert_eq!(nexus.time(), 2);
    }

    #[test]
    fn test_hidden_frames_do_nothing() {
        let mut nexus = Nexus::new(config(), 200.0, 200.0);
        let mut surface = HeadlessSurface::new(200.0, 200.0);
        let mut audio = AudioFeedback::silent();

        nexus.set_visible(false);
        assert_eq!(nexus.frame(0.0, &mut surface, &mut audio), FrameOutcome::Hidden);
        assert_eq!(surface.total(), 0);
        assert_eq!(nexus.time(), 0);

        nexus.set_visible(true);
        assert!(nexus.frame(20.0, &mut surface, &mut audio).ran());
    }

    #[test]
    fn test_top_up_is_rate_limited() {
        let mut nexus = Nexus::new(config(), 400.0, 400.0);
        let mut surface = HeadlessSurface::new(400.0, 400.0);
        let mut audio = AudioFeedback::silent();

        let stats = *nexus.frame(0.0, &mut surface, &mut audio).stats().unwrap();
        assert_eq!(stats.spawned, 5);
        assert_eq!(nexus.particles().len(), 5);

        nexus.frame(20.0, &mut surface, &mut audio);
        assert_eq!(nexus.particles().len(), 10);
    }

    #[test]
    fn test_scatter_burst_respects_capacity() {
        let mut cfg = config();
        cfg.simulation.pool_capacity = 300;
        cfg.simulation.max_particles = 300;
        let mut nexus = Nexus::new(cfg, 400.0, 400.0);
        nexus.seed_particles();
        for _ in 0..3 {
            nexus.create_particles_burst(Vec2::splat(50.0), 30, BurstShape::Scatter);
        }
        assert_eq!(nexus.particles().len(), 290);
        assert_eq!(nexus.create_particles_burst(Vec2::splat(50.0), 30, BurstShape::Scatter), 10);
        assert_eq!(nexus.particles().len(), 300);
        assert_eq!(nexus.create_particles_burst(Vec2::splat(50.0), 30, BurstShape::Scatter), 0);
    }

    #[test]
    fn test_scatter_burst_capped_at_thirty() {
        let mut nexus = Nexus::new(config(), 400.0, 400.0);
        assert_eq!(nexus.create_particles_burst(Vec2::splat(50.0), 100, BurstShape::Scatter), 30);
    }

    #[test]
    fn test_ring_burst_is_staggered() {
        let mut nexus = Nexus::new(config(), 400.0, 400.0);
        let mut surface = HeadlessSurface::new(400.0, 400.0);
        let mut audio = AudioFeedback::silent();

        assert_eq!(nexus.create_particles_burst(Vec2::splat(200.0), 50, BurstShape::Rings), 0);
        assert_eq!(nexus.pending_rings(), 5);

        let stats = *nexus.frame(0.0, &mut surface, &mut audio).stats().unwrap();
        assert_eq!(stats.rings_fired, 1);
        assert_eq!(nexus.pending_rings(), 4);

        let mut fired = 1;
        for i in 1..40 {
            if let Some(stats) = nexus.frame(i as f64 * 20.0, &mut surface, &mut audio).stats() {
                fired += stats.rings_fired;
            }
        }
        assert_eq!(fired, 5);
        assert_eq!(nexus.pending_rings(), 0);
    }

    #[test]
    fn test_degenerate_resize_suspends_spawning() {
        let mut nexus = Nexus::new(config(), 400.0, 400.0);
        let mut surface = HeadlessSurface::new(0.0, 0.0);
        let mut audio = AudioFeedback::silent();

        assert!(!nexus.resize(0.0, 300.0));
        assert!(nexus.field().is_empty());
        assert_eq!(nexus.create_particles_burst(Vec2::splat(5.0), 10, BurstShape::Scatter), 0);
        let stats = *nexus.frame(0.0, &mut surface, &mut audio).stats().unwrap();
        assert_eq!(stats.spawned, 0);

        assert!(!nexus.resize(f32::NAN, 300.0));
        assert!(nexus.resize(400.0, 300.0));
        let stats = *nexus.frame(20.0, &mut surface, &mut audio).stats().unwrap();
        assert_eq!(stats.spawned, 5);
        assert!(nexus.particles().iter().all(|p| p.pos.is_finite()));
    }

    #[test]
    fn test_base_hue_cycles() {
        let mut cfg = config();
        cfg.palette.base_hue = 359.95;
        let mut nexus = Nexus::new(cfg, 100.0, 100.0);
        let mut surface = HeadlessSurface::new(100.0, 100.0);
        let mut audio = AudioFeedback::silent();
        nexus.frame(0.0, &mut surface, &mut audio);
        assert!(nexus.base_hue() < 1.0);
    }

    #[test]
    fn test_auto_mode_places_attractors() {
        let mut cfg = config();
        cfg.auto_mode.enabled = true;
        cfg.auto_mode.interval_ms = 100.0;
        let mut nexus = Nexus::new(cfg, 400.0, 400.0);
        let mut surface = HeadlessSurface::new(400.0, 400.0);
        let mut audio = AudioFeedback::silent();

        nexus.frame(0.0, &mut surface, &mut audio);
        assert!(nexus.attractors().is_empty());
        nexus.frame(100.0, &mut surface, &mut audio);
        assert_eq!(nexus.attractors().len(), 1);

        nexus.set_auto_mode(false);
        nexus.frame(300.0, &mut surface, &mut audio);
        assert_eq!(nexus.attractors().len(), 1);
    }

    #[test]
    fn test_controls_are_clamped() {
        let mut nexus = Nexus::new(config(), 100.0, 100.0);
        nexus.set_intensity(3.0);
        nexus.set_complexity(-1.0);
        nexus.set_flow_speed(0.25);
        assert_eq!(nexus.intensity(), 1.0);
        assert_eq!(nexus.complexity(), 0.0);
        assert_eq!(nexus.flow_speed(), 0.25);
    }

    #[test]
    fn test_pulse_creates_strong_attractor_and_rings() {
        let mut nexus = Nexus::new(config(), 400.0, 200.0);
        nexus.pulse();
        let a = nexus.attractors().iter().next().unwrap();
        assert_eq!(a.pos, Vec2::new(200.0, 100.0));
        assert_eq!(a.strength, 3.0);
        assert_eq!(nexus.pending_rings(), 5);
    }

    #[test]
    fn test_backdrop_rays_only_with_audio() {
        let nexus = Nexus::new(config(), 100.0, 100.0);
        let mut surface = HeadlessSurface::new(100.0, 100.0);
        nexus.draw_backdrop(&mut surface, 0.0);
        assert_eq!((surface.rect_fills, surface.strokes), (1, 0));
        nexus.draw_backdrop(&mut surface, 0.2);
        assert_eq!((surface.rect_fills, surface.strokes), (2, 1));
    }
}
