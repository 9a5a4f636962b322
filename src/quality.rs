//! Adaptive particle budget.
//!
//! [`QualityController`] counts executed frames over a fixed wall-clock window
//! and nudges the target pool size: down when the measured rate is poor, up
//! when there is headroom. The engine only ever spawns toward the target, so
//! the budget converges gradually.

use crate::config::SimulationConfig;

/// Result of closing one sampling window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityAdjustment {
    /// Frames per second measured over the window.
    pub fps: f32,
    /// Target before the adjustment.
    pub previous: u32,
    /// Target after the adjustment.
    pub target: u32,
}

impl QualityAdjustment {
    /// Signed change in target.
    pub fn delta(&self) -> i64 {
        self.target as i64 - self.previous as i64
    }

    pub fn changed(&self) -> bool {
        self.target != self.previous
    }
}

/// Frame-rate driven feedback loop on the particle budget.
#[derive(Clone, Debug)]
pub struct QualityController {
    target: u32,
    min: u32,
    max: u32,
    low_fps: f32,
    high_fps: f32,
    decrease_step: u32,
    increase_step: u32,
    window_ms: f64,
    window_start: Option<f64>,
    frames: u32,
    fps: f32,
}

impl QualityController {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            target: config
                .particle_count
                .clamp(config.min_particles, config.max_particles),
            min: config.min_particles,
            max: config.max_particles,
            low_fps: config.low_fps,
            high_fps: config.high_fps,
            decrease_step: config.decrease_step,
            increase_step: config.increase_step,
            window_ms: config.sample_window_ms,
            window_start: None,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count one executed frame at `now_ms`.
    ///
    /// Returns the adjustment when this frame closes a sampling window. The
    /// window opens at the first recorded frame.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<QualityAdjustment> {
        self.frames += 1;
        let start = *self.window_start.get_or_insert(now_ms);
        let elapsed = now_ms - start;
        if elapsed < self.window_ms {
            return None;
        }

        let fps = (self.frames as f64 * 1000.0 / self.window_ms) as f32;
        self.frames = 0;
        self.window_start = Some(now_ms);
        Some(self.apply_sample(fps))
    }

    /// Adjust the target for a measured frame rate.
    pub fn apply_sample(&mut self, fps: f32) -> QualityAdjustment {
        self.fps = fps;
        let previous = self.target;
        if fps < self.low_fps && self.target > self.min {
            self.target = self.target.saturating_sub(self.decrease_step).max(self.min);
        } else if fps > self.high_fps && self.target < self.max {
            self.target = (self.target + self.increase_step).min(self.max);
        }
        QualityAdjustment {
            fps,
            previous,
            target: self.target,
        }
    }

    /// Current particle budget.
    #[inline]
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Override the budget, clamped to the configured bounds.
    pub fn set_target(&mut self, target: u32) {
        self.target = target.clamp(self.min, self.max);
    }

    /// Rate measured by the last closed window (0 before the first).
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn bounds(&self) -> (u32, u32) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(start: u32) -> QualityController {
        let config = SimulationConfig {
            particle_count: start,
            ..Default::default()
        };
        QualityController::new(&config)
    }

    /// Feed frames at `fps` from `from_ms` for one second, returning the
    /// adjustment that closes the window.
    fn run_second(qc: &mut QualityController, fps: f64, from_ms: f64) -> Option<QualityAdjustment> {
        let step = 1000.0 / fps;
        let frames = fps as usize;
        let times = (0..frames)
            .map(|i| from_ms + i as f64 * step)
            .chain(std::iter::once(from_ms + 1000.0));
        let mut result = None;
        for t in times {
            if let Some(adj) = qc.record_frame(t) {
                result = Some(adj);
            }
        }
        result
    }

    #[test]
    fn test_slow_frames_decrease_by_ten() {
        let mut qc = controller(200);
        let adj = run_second(&mut qc, 20.0, 0.0).unwrap();
        assert!(adj.fps < 30.0);
        assert_eq!(adj.delta(), -10);
        assert_eq!(qc.target(), 190);
    }

    #[test]
    fn test_fast_frames_increase_by_five() {
        let mut qc = controller(200);
        let adj = run_second(&mut qc, 60.0, 0.0).unwrap();
        assert!(adj.fps > 55.0);
        assert_eq!(adj.delta(), 5);
        assert_eq!(qc.target(), 205);
    }

    #[test]
    fn test_target_never_leaves_bounds() {
        let mut qc = controller(105);
        qc.apply_sample(10.0);
        assert_eq!(qc.target(), 100);
        qc.apply_sample(10.0);
        assert_eq!(qc.target(), 100);

        let mut qc = controller(298);
        qc.apply_sample(120.0);
        assert_eq!(qc.target(), 300);
        let adj = qc.apply_sample(120.0);
        assert!(!adj.changed());
    }

    #[test]
    fn test_middle_band_holds_steady() {
        let mut qc = controller(200);
        let adj = qc.apply_sample(45.0);
        assert!(!adj.changed());
        assert_eq!(qc.fps(), 45.0);
    }

    #[test]
    fn test_window_opens_at_first_frame() {
        let mut qc = controller(200);
        assert!(qc.record_frame(5_000.0).is_none());
        assert!(qc.record_frame(5_999.0).is_none());
        assert!(qc.record_frame(6_000.0).is_some());
    }

    #[test]
    fn test_consecutive_windows_do_not_share_frames() {
        let mut qc = controller(200);
        run_second(&mut qc, 60.0, 0.0).unwrap();
        // Second window starts where the first closed
        let adj = run_second(&mut qc, 20.0, 1000.0 + 1000.0 / 20.0).unwrap();
        assert!(adj.fps < 30.0);
        assert_eq!(qc.target(), 195);
    }

    #[test]
    fn test_set_target_clamps() {
        let mut qc = controller(200);
        qc.set_target(1_000);
        assert_eq!(qc.target(), 300);
        qc.set_target(0);
        assert_eq!(qc.target(), 100);
    }
}
