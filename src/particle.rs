//! Individually simulated particles.
//!
//! A [`Particle`] follows the flow field with an organic heading wobble,
//! reacts to the audio level (hue, size, damping, energy), keeps a short
//! trail of recent positions and wraps toroidally at the surface edges.
//!
//! # Lifecycle
//!
//! - Created by [`Particle::spawn`] with randomized kinematics and lifetime
//! - Advanced once per frame by [`Particle::update`]
//! - Dropped by the engine as soon as `update` returns `false`
//!
//! Alpha stays at 1 until the last 100 frames of life, then fades linearly.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::field::FlowField;
use crate::surface::{Hsla, Paint, Path, RadialGradient, Stroke, Surface};

/// Frames over which alpha fades out at the end of life.
const FADE_FRAMES: f32 = 100.0;

/// Spokes drawn around an energetic particle.
const ENERGY_SPOKES: usize = 6;

/// A recorded trail position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Particle alpha when the point was recorded.
    pub alpha: f32,
}

/// One simulated particle.
///
/// # Fields
///
/// - `pos`, `vel` - position in surface pixels and velocity in pixels/frame
/// - `size`, `original_size` - current (audio-modulated) and base radius
/// - `life`, `max_life` - age in frames and lifetime budget
/// - `hue`, `target_hue` - current hue and the value it eases toward
/// - `energy` - 0..=1, only ever rises; above 0.5 the particle draws spokes
#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub original_size: f32,
    pub life: f32,
    pub max_life: f32,
    pub hue: f32,
    pub target_hue: f32,
    /// HSL lightness in percent.
    pub brightness: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub energy: f32,
    pub phase: f32,
    pub phase_speed: f32,
    pub glow: f32,
    trail: VecDeque<TrailPoint>,
    max_trail: usize,
}

impl Particle {
    /// Create a particle at `pos` with randomized state.
    pub fn spawn(pos: Vec2, rng: &mut impl Rng) -> Self {
        let size = rng.gen_range(1.0..4.0);
        let hue = rng.gen_range(160.0..220.0);
        let max_trail = rng.gen_range(5..15);
        Self {
            pos,
            vel: Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            size,
            original_size: size,
            life: 1.0,
            max_life: rng.gen_range(100.0..200.0),
            hue,
            target_hue: hue,
            brightness: rng.gen_range(70.0..100.0),
            alpha: rng.gen_range(0.5..1.0),
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: rng.gen_range(-0.01..0.01),
            energy: rng.gen_range(0.0..1.0),
            phase: rng.gen_range(0.0..TAU),
            phase_speed: rng.gen_range(-0.025..0.025),
            glow: rng.gen_range(0.0..1.0),
            trail: VecDeque::with_capacity(max_trail + 1),
            max_trail,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_energy(mut self, energy: f32) -> Self {
        self.energy = energy.clamp(0.0, 1.0);
        self
    }

    pub fn with_hue(mut self, hue: f32) -> Self {
        self.hue = hue;
        self
    }

    pub fn with_max_trail(mut self, max_trail: usize) -> Self {
        self.max_trail = max_trail;
        self.trail.truncate(max_trail);
        self
    }

    /// Scale lifetime and size, as ring bursts do.
    pub fn boosted(mut self, life_scale: f32, size_scale: f32) -> Self {
        self.max_life *= life_scale;
        self.size *= size_scale;
        self.original_size *= size_scale;
        self
    }

    /// Recent positions, most recent first.
    pub fn trail(&self) -> &VecDeque<TrailPoint> {
        &self.trail
    }

    #[inline]
    pub fn max_trail(&self) -> usize {
        self.max_trail
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life < self.max_life
    }

    /// Advance one frame. Returns whether the particle is still alive.
    ///
    /// `bounds` is the surface extent used for wrapping; a zero extent
    /// disables wrapping.
    pub fn update(&mut self, field: &FlowField, bounds: Vec2, audio_level: f32, complexity: f32) -> bool {
        self.phase += self.phase_speed;

        let flow = field.sample(self.pos);
        self.vel += flow * (0.2 + audio_level * 0.3);

        let heading = self.vel.y.atan2(self.vel.x)
            + (self.life * 0.1).sin() * complexity * 0.1
            + self.phase.cos() * 0.2;
        let speed = self.vel.length();
        self.vel = Vec2::from_angle(heading) * speed;

        self.vel *= 0.99 - audio_level * 0.1;
        self.pos += self.vel;

        self.trail.push_front(TrailPoint {
            pos: self.pos,
            alpha: self.alpha,
        });
        self.trail.truncate(self.max_trail);

        self.target_hue = 160.0 + (self.life * 0.05).sin() * 20.0 + audio_level * 40.0;
        self.hue += (self.target_hue - self.hue) * 0.1;

        let pulse = 1.0 + 0.3 * self.phase.sin();
        self.size = self.original_size * (1.0 + audio_level * 2.0) * pulse;
        self.energy = (self.energy + audio_level * 0.1).min(1.0);
        self.glow = (self.life * 0.1).sin() * 0.5 + 0.5;

        self.life += 1.0;
        self.rotation += self.rotation_speed + audio_level * 0.1;
        self.alpha = ((self.max_life - self.life) / FADE_FRAMES).clamp(0.0, 1.0);

        self.wrap(bounds);

        self.is_alive()
    }

    fn wrap(&mut self, bounds: Vec2) {
        if !(bounds.x > 0.0 && bounds.y > 0.0) {
            return;
        }
        let before = self.pos;
        if self.pos.x < 0.0 {
            self.pos.x = bounds.x;
        } else if self.pos.x > bounds.x {
            self.pos.x = 0.0;
        }
        if self.pos.y < 0.0 {
            self.pos.y = bounds.y;
        } else if self.pos.y > bounds.y {
            self.pos.y = 0.0;
        }
        if self.pos != before {
            self.trail.clear();
        }
    }

    /// Draw trail, glow, core and (when energetic) spokes.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.draw_trail(surface);

        let glow_radius = self.size * 3.0;
        let glow = RadialGradient::new(self.pos, glow_radius)
            .stop(0.0, self.color(0.0, 0.0, self.alpha * 0.5 * self.glow))
            .stop(1.0, self.color(0.0, 0.0, 0.0));
        surface.fill_circle(self.pos, glow_radius, &Paint::Radial(glow));

        let core_radius = self.size * 2.0;
        let core = RadialGradient::new(self.pos, core_radius)
            .stop(0.0, self.color(0.0, 0.0, self.alpha))
            .stop(0.5, self.color(30.0, -10.0, self.alpha * 0.5))
            .stop(1.0, self.color(60.0, -20.0, 0.0));
        surface.fill_circle(self.pos, core_radius, &Paint::Radial(core));

        if self.energy > 0.5 {
            let reach = self.size * 4.0 * self.energy;
            let mut spokes = Path::new();
            for i in 0..ENERGY_SPOKES {
                let angle = i as f32 * TAU / ENERGY_SPOKES as f32 + self.rotation;
                let length = reach * (0.8 + (self.phase + i as f32).sin() * 0.2);
                spokes
                    .move_to(self.pos)
                    .line_to(self.pos + Vec2::from_angle(angle) * length);
            }
            surface.stroke_path(
                &spokes,
                &Stroke::new(self.color(0.0, 0.0, self.alpha * 0.3), self.size * 0.3),
            );
        }
    }

    /// Smoothed trail: quadratic curves through the midpoints of successive
    /// trail points, thinning and fading toward the tail.
    fn draw_trail<S: Surface + ?Sized>(&self, surface: &mut S) {
        let len = self.trail.len();
        if len < 2 {
            return;
        }
        let mut start = self.trail[0].pos;
        for i in 1..len {
            let prev = self.trail[i - 1].pos;
            let point = self.trail[i];
            let mid = (prev + point.pos) * 0.5;
            let falloff = 1.0 - (i - 1) as f32 / len as f32;

            let mut path = Path::new();
            path.move_to(start).quad_to(prev, mid);
            surface.stroke_path(
                &path,
                &Stroke::new(
                    self.color(0.0, 0.0, point.alpha * 0.3 * falloff),
                    self.size * 0.5 * falloff,
                ),
            );
            start = mid;
        }
    }

    fn color(&self, hue_shift: f32, lightness_shift: f32, alpha: f32) -> Hsla {
        Hsla::new(
            self.hue + hue_shift,
            100.0,
            self.brightness + lightness_shift,
            alpha,
        )
    }
}
