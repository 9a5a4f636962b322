//! Particle bursts.
//!
//! Two shapes exist, selected by [`BurstShape`]:
//!
//! - [`BurstShape::Scatter`] spawns every particle at once with random
//!   velocities.
//! - [`BurstShape::Rings`] spreads one request over several frames as
//!   concentric, increasingly fast rings. Rings are queued in a
//!   [`RingSchedule`] and fired by the engine's frame loop, so the whole
//!   expansion is steppable frame by frame.
//!
//! Queued rings are never cancelled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::particle::Particle;

/// Rings per ring burst.
pub const RING_COUNT: u32 = 5;

/// Distance from the centre at which ring particles start.
const RING_START_OFFSET: f32 = 5.0;

/// Burst spawn algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BurstShape {
    /// Instant cloud with random velocities. Capped at 30 particles.
    #[default]
    Scatter,
    /// Five staggered expanding rings. Capped at 50 particles.
    Rings,
}

impl BurstShape {
    /// Largest particle count one request may produce.
    pub fn cap(self) -> u32 {
        match self {
            BurstShape::Scatter => 30,
            BurstShape::Rings => 50,
        }
    }
}

/// Hue shared by one burst: the base hue swung by a slow sine of the frame
/// counter.
pub fn burst_hue(base_hue: f32, time: u64, hue_range: f32) -> f32 {
    base_hue + (time as f32 * 0.01).sin() * hue_range
}

/// A scatter particle: velocity uniform in ±4 px/frame, full energy.
pub fn scatter_particle(center: Vec2, hue: f32, rng: &mut impl Rng) -> Particle {
    let vel = Vec2::new(rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0));
    let hue = hue + rng.gen_range(-10.0..10.0);
    Particle::spawn(center, rng)
        .with_velocity(vel)
        .with_energy(1.0)
        .with_hue(hue)
}

/// Particle `index` of `per_ring` on ring `ring`.
///
/// Starts just off the centre and moves outward at `2 + 0.5·ring` px/frame,
/// plus a small jittered kick. Lives 1.5× longer and is 1.2× larger than a
/// regular particle.
pub fn ring_particle(
    center: Vec2,
    ring: u32,
    index: usize,
    per_ring: usize,
    hue: f32,
    rng: &mut impl Rng,
) -> Particle {
    let angle = index as f32 / per_ring.max(1) as f32 * TAU;
    let speed = 2.0 + ring as f32 * 0.5;
    let dir = Vec2::from_angle(angle);

    let kick_angle = angle + rng.gen_range(-0.1..0.1);
    let kick_speed = speed * rng.gen_range(0.8..1.2);
    let vel = dir * speed + Vec2::from_angle(kick_angle) * kick_speed * 0.3;
    let hue = hue + rng.gen_range(-10.0..10.0);

    let mut p = Particle::spawn(center + dir * RING_START_OFFSET, rng)
        .with_velocity(vel)
        .with_energy(1.0)
        .with_hue(hue)
        .boosted(1.5, 1.2);
    p.target_hue = p.hue;
    p
}

/// One queued ring.
#[derive(Clone, Copy, Debug)]
pub struct PendingRing {
    /// Frame on which the ring spawns.
    pub fire_at: u64,
    /// 0-based ring index; also selects speed.
    pub ring: u32,
    pub center: Vec2,
    pub per_ring: usize,
    pub hue: f32,
    seq: u64,
}

impl PendingRing {
    /// Even rings play a note when they fire.
    pub fn plays_note(&self) -> bool {
        self.ring % 2 == 0
    }
}

impl PartialEq for PendingRing {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for PendingRing {}

impl Ord for PendingRing {
    // Reversed so the max-heap pops the earliest ring first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingRing {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of rings keyed by the frame they fire on.
#[derive(Clone, Debug)]
pub struct RingSchedule {
    queue: BinaryHeap<PendingRing>,
    delay_frames: u64,
    next_seq: u64,
}

impl RingSchedule {
    /// Schedule with `delay_frames` between consecutive rings.
    pub fn new(delay_frames: u64) -> Self {
        Self {
            queue: BinaryHeap::new(),
            delay_frames,
            next_seq: 0,
        }
    }

    /// Queue all rings of one burst requested during frame `frame`.
    ///
    /// Ring 0 fires on the next frame; ring `r` fires `r · delay` frames
    /// after that. `count` is split evenly (rounded down) over the rings.
    pub fn schedule(&mut self, frame: u64, center: Vec2, count: u32, hue: f32) {
        let per_ring = (count / RING_COUNT) as usize;
        for ring in 0..RING_COUNT {
            self.queue.push(PendingRing {
                fire_at: frame + 1 + ring as u64 * self.delay_frames,
                ring,
                center,
                per_ring,
                hue,
                seq: self.next_seq,
            });
            self.next_seq += 1;
        }
    }

    /// Pop the next ring due at or before `frame`.
    pub fn pop_due(&mut self, frame: u64) -> Option<PendingRing> {
        if self.queue.peek()?.fire_at <= frame {
            self.queue.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn delay_frames(&self) -> u64 {
        self.delay_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_caps() {
        assert_eq!(BurstShape::Scatter.cap(), 30);
        assert_eq!(BurstShape::Rings.cap(), 50);
    }

    #[test]
    fn test_scatter_particle() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let p = scatter_particle(Vec2::new(100.0, 100.0), 200.0, &mut rng);
            assert_eq!(p.pos, Vec2::new(100.0, 100.0));
            assert_eq!(p.energy, 1.0);
            assert!(p.vel.x.abs() <= 4.0 && p.vel.y.abs() <= 4.0);
            assert!((190.0..210.0).contains(&p.hue));
        }
    }

    #[test]
    fn test_ring_particle_moves_outward() {
        let mut rng = SmallRng::seed_from_u64(2);
        let center = Vec2::new(50.0, 50.0);
        for i in 0..10 {
            let p = ring_particle(center, 2, i, 10, 180.0, &mut rng);
            let out = p.pos - center;
            assert!((out.length() - 5.0).abs() < 1e-4);
            assert!(p.vel.dot(out) > 0.0);
            assert_eq!(p.energy, 1.0);
            assert!(p.max_life >= 150.0);
        }
    }

    #[test]
    fn test_rings_fire_in_order() {
        let mut sched = RingSchedule::new(6);
        sched.schedule(10, Vec2::ZERO, 50, 0.0);
        assert_eq!(sched.len(), 5);

        assert!(sched.pop_due(10).is_none());
        let first = sched.pop_due(11).unwrap();
        assert_eq!(first.ring, 0);
        assert_eq!(first.per_ring, 10);
        assert!(first.plays_note());
        assert!(sched.pop_due(11).is_none());

        let fired: Vec<u32> = std::iter::from_fn(|| sched.pop_due(100)).map(|r| r.ring).collect();
        assert_eq!(fired, vec![1, 2, 3, 4]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_ring_timing() {
        let mut sched = RingSchedule::new(6);
        sched.schedule(0, Vec2::ZERO, 25, 0.0);
        let mut fired_at = Vec::new();
        for frame in 1..=40 {
            while let Some(r) = sched.pop_due(frame) {
                fired_at.push((r.ring, frame));
            }
        }
        assert_eq!(fired_at, vec![(0, 1), (1, 7), (2, 13), (3, 19), (4, 25)]);
    }

    #[test]
    fn test_overlapping_bursts_interleave_by_frame() {
        let mut sched = RingSchedule::new(6);
        sched.schedule(0, Vec2::ZERO, 50, 0.0);
        sched.schedule(3, Vec2::ONE, 50, 0.0);
        let order: Vec<(u64, Vec2)> = std::iter::from_fn(|| sched.pop_due(u64::MAX))
            .map(|r| (r.fire_at, r.center))
            .collect();
        assert_eq!(order[0], (1, Vec2::ZERO));
        assert_eq!(order[1], (4, Vec2::ONE));
        assert_eq!(order[2], (7, Vec2::ZERO));
        assert!(order.windows(2).all(|w| w[0].0 <= w[1].0));
    }
}
