//! 2D drawing surface abstraction.
//!
//! The engine draws through the [`Surface`] trait only, which exposes the
//! capability set of a canvas-style raster context: rectangle fills, filled
//! arcs, radial gradients, and stroked paths built from lines and quadratic
//! curves. Nothing here depends on a GPU API.
//!
//! Two implementations ship with the crate:
//!
//! | Type | Use |
//! |------|-----|
//! | [`crate::raster::Raster`] | Software RGBA8 raster, presented by the window host |
//! | [`HeadlessSurface`] | Counts operations; tests and benchmarks |

use glam::Vec2;

/// Straight-alpha RGBA colour, each channel in 0.0-1.0.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Interpolate in premultiplied space, like a 2D canvas gradient.
    pub fn lerp_premultiplied(self, other: Rgba, t: f32) -> Rgba {
        let a = self.a + (other.a - self.a) * t;
        if a <= f32::EPSILON {
            return Rgba::TRANSPARENT;
        }
        let mix = |x: f32, y: f32| (x * self.a + (y * other.a - x * self.a) * t) / a;
        Rgba::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b), a)
    }
}

/// CSS-style HSL colour with alpha.
///
/// `h` is in degrees (any value, wrapped), `s` and `l` are percentages
/// (0-100, clamped) and `a` is 0.0-1.0 (clamped).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    pub fn to_rgba(self) -> Rgba {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);
        let a = self.a.clamp(0.0, 1.0);

        if s == 0.0 {
            return Rgba::new(l, l, l, a);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgba::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            a,
        )
    }
}

impl From<Hsla> for Rgba {
    fn from(c: Hsla) -> Self {
        c.to_rgba()
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Square of half-size `radius` centred on `center`.
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    pub fn from_size(size: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            max: size,
        }
    }
}

/// Radial gradient with inner radius 0.
///
/// Stops are `(offset, colour)` pairs with offsets in 0.0-1.0, sorted
/// ascending. Beyond the last stop the last colour is used.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub stops: Vec<(f32, Rgba)>,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            stops: Vec::with_capacity(3),
        }
    }

    pub fn stop(mut self, offset: f32, color: impl Into<Rgba>) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color.into()));
        self
    }

    /// Colour at a point.
    pub fn sample(&self, point: Vec2) -> Rgba {
        let Some(&(first_offset, first)) = self.stops.first() else {
            return Rgba::TRANSPARENT;
        };
        let t = if self.radius > 0.0 {
            (point.distance(self.center) / self.radius).min(1.0)
        } else {
            1.0
        };
        if t <= first_offset {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                let local = if span > 0.0 { (t - o0) / span } else { 1.0 };
                return c0.lerp_premultiplied(c1, local);
            }
        }
        self.stops.last().map(|&(_, c)| c).unwrap_or(first)
    }
}

/// Fill style.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl Paint {
    pub fn sample(&self, point: Vec2) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Radial(g) => g.sample(point),
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::Radial(g)
    }
}

/// One path segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSeg {
    MoveTo(Vec2),
    LineTo(Vec2),
    /// Quadratic curve through a control point to an end point.
    QuadTo(Vec2, Vec2),
}

/// Open path of line and quadratic segments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub segments: Vec<PathSeg>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.segments.push(PathSeg::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.segments.push(PathSeg::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, ctrl: Vec2, end: Vec2) -> &mut Self {
        self.segments.push(PathSeg::QuadTo(ctrl, end));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flatten into polylines, one per sub-path.
    ///
    /// Quadratic curves are split into `curve_steps` straight pieces.
    pub fn flatten(&self, curve_steps: usize) -> Vec<Vec<Vec2>> {
        let steps = curve_steps.max(1);
        let mut lines: Vec<Vec<Vec2>> = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();
        for seg in &self.segments {
            match *seg {
                PathSeg::MoveTo(p) => {
                    if current.len() > 1 {
                        lines.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                PathSeg::LineTo(p) => current.push(p),
                PathSeg::QuadTo(c, end) => {
                    let start = current.last().copied().unwrap_or(c);
                    if current.is_empty() {
                        current.push(start);
                    }
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        let u = 1.0 - t;
                        current.push(start * (u * u) + c * (2.0 * u * t) + end * (t * t));
                    }
                }
            }
        }
        if current.len() > 1 {
            lines.push(current);
        }
        lines
    }
}

/// Stroke style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: impl Into<Rgba>, width: f32) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

/// A 2D raster drawing target.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> Vec2;

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    /// Fill a full circle (a 0..2π arc).
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);

    /// Stroke an open path.
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);

    /// Overwrite the whole surface with a translucent colour.
    ///
    /// With `a < 1` previous frames show through, leaving motion trails.
    fn fade(&mut self, color: Rgba) {
        let size = self.size();
        self.fill_rect(Rect::from_size(size), &Paint::Solid(color));
    }
}

/// Surface that records how many operations of each kind were issued.
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    size: Vec2,
    pub rect_fills: usize,
    pub circle_fills: usize,
    pub strokes: usize,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn total(&self) -> usize {
        self.rect_fills + self.circle_fills + self.strokes
    }

    pub fn reset_counts(&mut self) {
        self.rect_fills = 0;
        self.circle_fills = 0;
        self.strokes = 0;
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, _rect: Rect, _paint: &Paint) {
        self.rect_fills += 1;
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _paint: &Paint) {
        self.circle_fills += 1;
    }

    fn stroke_path(&mut self, _path: &Path, _stroke: &Stroke) {
        self.strokes += 1;
    }
}
