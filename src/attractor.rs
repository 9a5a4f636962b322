//! Transient radial force sources.
//!
//! Attractors are created by discrete interactions (pointer press, open hand,
//! pulse, auto mode), pull particles inside their radius toward the centre
//! and fade out over a fixed number of frames. At most [`MAX_ATTRACTORS`]
//! exist at once; adding another evicts the oldest.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::surface::{Hsla, Paint, RadialGradient, Rect, Rgba, Surface};

/// Maximum number of live attractors.
pub const MAX_ATTRACTORS: usize = 3;

/// Lifetime of an attractor in frames.
pub const ATTRACTOR_LIFETIME: f32 = 100.0;

/// Scales the raw pull before it is added to a particle's velocity.
const FORCE_SCALE: f32 = 0.001;

/// Below this alpha an attractor is not drawn.
const VISIBLE_ALPHA: f32 = 0.05;

/// A time-limited point force.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attractor {
    pub pos: Vec2,
    /// Pull multiplier; negative values repel.
    pub strength: f32,
    pub radius: f32,
    pub life: f32,
    pub max_life: f32,
}

impl Attractor {
    pub fn new(pos: Vec2, strength: f32, radius: f32) -> Self {
        Self {
            pos,
            strength,
            radius,
            life: 0.0,
            max_life: ATTRACTOR_LIFETIME,
        }
    }

    /// Attractor with a random radius in 50..150 px.
    pub fn with_random_radius(pos: Vec2, strength: f32, rng: &mut impl Rng) -> Self {
        Self::new(pos, strength, rng.gen_range(50.0..150.0))
    }

    /// Opacity, falling linearly from 1 to 0 over the lifetime.
    #[inline]
    pub fn alpha(&self) -> f32 {
        (1.0 - self.life / self.max_life).max(0.0)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life < self.max_life
    }

    /// Age one frame. Returns whether it is still alive.
    pub fn update(&mut self) -> bool {
        self.life += 1.0;
        self.is_alive()
    }

    /// Velocity change for a particle at `pos`.
    ///
    /// The offset to the centre is not normalized, so the pull grows with
    /// distance until the `(1 - d/r)` falloff takes over.
    pub fn force_on(&self, pos: Vec2) -> Vec2 {
        if !self.is_alive() {
            return Vec2::ZERO;
        }
        let offset = self.pos - pos;
        let dist_sq = offset.length_squared();
        if dist_sq >= self.radius * self.radius {
            return Vec2::ZERO;
        }
        let force = (1.0 - dist_sq.sqrt() / self.radius) * self.strength;
        offset * force * FORCE_SCALE
    }

    /// Draw the soft halo if it is still visible.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, base_hue: f32) {
        let alpha = self.alpha();
        if alpha <= VISIBLE_ALPHA {
            return;
        }
        let halo = RadialGradient::new(self.pos, self.radius)
            .stop(0.0, Hsla::new(base_hue, 100.0, 50.0, alpha * 0.2))
            .stop(1.0, Rgba::TRANSPARENT);
        surface.fill_rect(Rect::around(self.pos, self.radius), &Paint::Radial(halo));
    }
}

/// FIFO-bounded collection of live attractors.
#[derive(Clone, Debug, Default)]
pub struct AttractorSet {
    items: VecDeque<Attractor>,
}

impl AttractorSet {
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(MAX_ATTRACTORS + 1),
        }
    }

    /// Add an attractor, returning the evicted oldest one if full.
    pub fn push(&mut self, attractor: Attractor) -> Option<Attractor> {
        self.items.push_back(attractor);
        if self.items.len() > MAX_ATTRACTORS {
            self.items.pop_front()
        } else {
            None
        }
    }

    /// Age every attractor, draw the visible ones and drop the expired.
    pub fn update_and_draw<S: Surface + ?Sized>(&mut self, surface: &mut S, base_hue: f32) {
        self.items.retain_mut(|a| {
            let alive = a.update();
            a.draw(surface, base_hue);
            alive
        });
    }

    /// Age every attractor without drawing.
    pub fn update(&mut self) {
        self.items.retain_mut(|a| a.update());
    }

    /// Summed velocity change from every attractor.
    pub fn force_on(&self, pos: Vec2) -> Vec2 {
        self.items.iter().map(|a| a.force_on(pos)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attractor> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    #[test]
    fn test_fifo_eviction() {
        let mut set = AttractorSet::new();
        for i in 0..3 {
            assert!(set.push(Attractor::new(Vec2::splat(i as f32), 1.0, 50.0)).is_none());
        }
        let evicted = set.push(Attractor::new(Vec2::splat(3.0), 1.0, 50.0)).unwrap();
        assert_eq!(evicted.pos, Vec2::splat(0.0));
        assert_eq!(set.len(), MAX_ATTRACTORS);

        let order: Vec<f32> = set.iter().map(|a| a.pos.x).collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_never_exceeds_max() {
        let mut set = AttractorSet::new();
        for i in 0..50 {
            set.push(Attractor::new(Vec2::splat(i as f32), 1.0, 80.0));
            assert!(set.len() <= MAX_ATTRACTORS);
        }
    }

    #[test]
    fn test_force_points_toward_center() {
        let a = Attractor::new(Vec2::new(400.0, 300.0), 1.0, 80.0);
        let f = a.force_on(Vec2::new(420.0, 300.0));
        assert!(f.x < 0.0);
        assert_eq!(f.y, 0.0);
        // (1 - 20/80) * 1 * -20 * 0.001
        assert!((f.x + 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_no_force_outside_radius_or_after_expiry() {
        let mut a = Attractor::new(Vec2::ZERO, 2.0, 50.0);
        assert_eq!(a.force_on(Vec2::new(50.0, 0.0)), Vec2::ZERO);
        assert_ne!(a.force_on(Vec2::new(10.0, 0.0)), Vec2::ZERO);

        a.life = a.max_life;
        assert_eq!(a.force_on(Vec2::new(10.0, 0.0)), Vec2::ZERO);
    }

    #[test]
    fn test_negative_strength_repels() {
        let a = Attractor::new(Vec2::ZERO, -1.0, 50.0);
        assert!(a.force_on(Vec2::new(10.0, 0.0)).x > 0.0);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut set = AttractorSet::new();
        set.push(Attractor::new(Vec2::ZERO, 1.0, 50.0));
        for _ in 0..99 {
            set.update();
        }
        assert_eq!(set.len(), 1);
        set.update();
        assert!(set.is_empty());
    }

    #[test]
    fn test_faded_attractors_are_not_drawn() {
        let mut surface = HeadlessSurface::new(200.0, 200.0);
        let mut set = AttractorSet::new();
        set.push(Attractor::new(Vec2::splat(100.0), 1.0, 50.0));

        set.update_and_draw(&mut surface, 160.0);
        assert_eq!(surface.rect_fills, 1);

        // Alpha drops to 0.05 at life 95
        for _ in 0..94 {
            set.update();
        }
        surface.reset_counts();
        set.update_and_draw(&mut surface, 160.0);
        assert_eq!(surface.rect_fills, 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_random_radius_range() {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let a = Attractor::with_random_radius(Vec2::ZERO, 1.0, &mut rng);
            assert!((50.0..150.0).contains(&a.radius));
        }
    }
}
