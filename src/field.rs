//! 2D flow field that biases particle motion.
//!
//! The field is a coarse grid of direction vectors, one per `resolution`-sized
//! cell, stored as interleaved `(x, y)` scalars. It carries no memory between
//! frames: [`FlowField::update`] is a pure function of cell offsets and the
//! frame counter that fully overwrites the buffer.
//!
//! # Example
//!
//! ```ignore
//! use nexus::field::FlowField;
//! use glam::Vec2;
//!
//! let mut field = FlowField::new(20.0);
//! field.generate(800.0, 600.0);
//! assert_eq!((field.cols(), field.rows()), (40, 30));
//!
//! field.update(1, 0.7, 0.5);
//! let push = field.sample(Vec2::new(410.0, 300.0));
//! ```

use std::f32::consts::TAU;

use glam::Vec2;

/// Default cell size in pixels.
pub const FIELD_RESOLUTION: f32 = 20.0;

/// Per-cell advance of the noise offsets along each axis.
const OFFSET_STEP: f32 = 0.1;

/// Frame counter scale for the drifting offsets and the global swirl.
const TIME_SCALE: f32 = 0.001;

/// Grid of direction vectors covering the drawing surface.
#[derive(Clone, Debug)]
pub struct FlowField {
    resolution: f32,
    cols: usize,
    rows: usize,
    extent: Vec2,
    data: Vec<f32>,
}

impl FlowField {
    /// Create an empty field with the given cell size.
    ///
    /// Call [`generate`](Self::generate) before sampling; until then every
    /// lookup yields zero.
    pub fn new(resolution: f32) -> Self {
        Self {
            resolution: resolution.max(1.0),
            cols: 0,
            rows: 0,
            extent: Vec2::ZERO,
            data: Vec::new(),
        }
    }

    /// Reallocate the grid for a surface of `width × height` pixels.
    ///
    /// Seeds every cell with a time-independent pattern so the field is
    /// spatially continuous before the first update. Returns `false` and
    /// leaves the field empty when the size is zero, negative or non-finite.
    pub fn generate(&mut self, width: f32, height: f32) -> bool {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            self.cols = 0;
            self.rows = 0;
            self.extent = Vec2::ZERO;
            self.data = Vec::new();
            return false;
        }

        self.cols = (width / self.resolution).floor() as usize;
        self.rows = (height / self.resolution).floor() as usize;
        self.extent = Vec2::new(width, height);
        self.data = vec![0.0; self.cols * self.rows * 2];

        let mut yoff = 0.0f32;
        for row in 0..self.rows {
            let mut xoff = 0.0f32;
            for col in 0..self.cols {
                let angle = xoff.sin() * yoff.cos() * TAU;
                let idx = (row * self.cols + col) * 2;
                self.data[idx] = angle.cos();
                self.data[idx + 1] = angle.sin();
                xoff += OFFSET_STEP;
            }
            yoff += OFFSET_STEP;
        }
        true
    }

    /// Recompute every cell for frame `time`.
    ///
    /// `flow_speed` stretches the noise pattern, `intensity` scales the
    /// stored vectors.
    pub fn update(&mut self, time: u64, flow_speed: f32, intensity: f32) {
        let t = time as f32 * TIME_SCALE;
        let swirl = t.sin() * 0.5;

        let mut yoff = t;
        for row in 0..self.rows {
            let mut xoff = t;
            for col in 0..self.cols {
                let angle = (xoff * flow_speed).sin() * (yoff * flow_speed).cos() * TAU + swirl;
                let idx = (row * self.cols + col) * 2;
                self.data[idx] = angle.cos() * intensity;
                self.data[idx + 1] = angle.sin() * intensity;
                xoff += OFFSET_STEP;
            }
            yoff += OFFSET_STEP;
        }
    }

    /// Vector of the cell containing `pos`, or zero outside the grid.
    #[inline]
    pub fn sample(&self, pos: Vec2) -> Vec2 {
        if !pos.is_finite() || pos.x < 0.0 || pos.y < 0.0 {
            return Vec2::ZERO;
        }
        let col = (pos.x / self.resolution).floor() as usize;
        let row = (pos.y / self.resolution).floor() as usize;
        self.cell(col, row).unwrap_or(Vec2::ZERO)
    }

    /// Vector stored at `(col, row)`.
    pub fn cell(&self, col: usize, row: usize) -> Option<Vec2> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let idx = (row * self.cols + col) * 2;
        Some(Vec2::new(self.data[idx], self.data[idx + 1]))
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Surface size the grid was generated for.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// Number of stored scalars (`cols * rows * 2`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw interleaved `(x, y)` buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl Default for FlowField {
    fn default() -> Self {
        Self::new(FIELD_RESOLUTION)
    }
}
