//! Software RGBA8 raster implementing [`Surface`].
//!
//! Pixels are stored row-major as [`Texel`]s and blended source-over with
//! straight alpha. Shapes get a one pixel anti-aliased edge. The raster stays
//! opaque: the destination alpha channel is always 255, which is what the
//! presenter expects when uploading it as an sRGB texture.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::surface::{Paint, Path, Rect, Rgba, Stroke, Surface};

/// Quadratic curves are flattened into this many line pieces.
const CURVE_STEPS: usize = 8;

/// One RGBA8 pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Texel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Texel {
    pub const BLACK: Texel = Texel { r: 0, g: 0, b: 0, a: 255 };
}

/// CPU-side pixel buffer.
#[derive(Clone, Debug)]
pub struct Raster {
    width: u32,
    height: u32,
    texels: Vec<Texel>,
}

impl Raster {
    /// Create an opaque black raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            texels: vec![Texel::BLACK; width as usize * height as usize],
        }
    }

    /// Reallocate to a new size, cleared to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.texels.clear();
        self.texels
            .resize(width as usize * height as usize, Texel::BLACK);
    }

    pub fn clear(&mut self) {
        self.texels.fill(Texel::BLACK);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    /// Raw bytes for texture upload (4 bytes per pixel, row-major).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Texel> {
        if x < self.width && y < self.height {
            Some(self.texels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Clip a float box to pixel bounds. `None` when nothing is visible.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        if !(min.is_finite() && max.is_finite()) || self.width == 0 || self.height == 0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32);
        let y1 = max.y.ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    #[inline]
    fn blend(&mut self, x: u32, y: u32, src: Rgba, coverage: f32) {
        let alpha = (src.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let idx = (y * self.width + x) as usize;
        let dst = self.texels[idx];
        let mix = |s: f32, d: u8| -> u8 {
            let d = d as f32 / 255.0;
            let out = s.clamp(0.0, 1.0) * alpha + d * (1.0 - alpha);
            (out * 255.0 + 0.5) as u8
        };
        self.texels[idx] = Texel {
            r: mix(src.r, dst.r),
            g: mix(src.g, dst.g),
            b: mix(src.b, dst.b),
            a: 255,
        };
    }

    fn stroke_segment(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba) {
        let half = width * 0.5;
        let pad = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(a.min(b) - pad, a.max(b) + pad) else {
            return;
        };
        // Hairlines draw at 1px with reduced coverage instead of vanishing
        let thin = width.min(1.0);
        let reach = half.max(0.5);
        let ab = b - a;
        let len_sq = ab.length_squared();
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = p.distance(a + ab * t);
                let coverage = (reach + 0.5 - d).clamp(0.0, 1.0) * thin;
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}

impl Surface for Raster {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let Some((x0, y0, x1, y1)) = self.clip(rect.min, rect.max) else {
            return;
        };
        match paint {
            Paint::Solid(c) => {
                for y in y0..y1 {
                    for x in x0..x1 {
                        self.blend(x, y, *c, 1.0);
                    }
                }
            }
            Paint::Radial(g) => {
                for y in y0..y1 {
                    for x in x0..x1 {
                        let c = g.sample(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                        self.blend(x, y, c, 1.0);
                    }
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let pad = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(center - pad, center + pad) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, paint.sample(p), coverage);
                }
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        if !(stroke.width.is_finite() && stroke.width > 0.0) || stroke.color.a <= 0.0 {
            return;
        }
        for line in path.flatten(CURVE_STEPS) {
            for pair in line.windows(2) {
                self.stroke_segment(pair[0], pair[1], stroke.width, stroke.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RadialGradient;

    #[test]
    fn test_new_raster_is_opaque_black() {
        let r = Raster::new(4, 3);
        assert_eq!(r.texels().len(), 12);
        assert_eq!(r.as_bytes().len(), 48);
        assert_eq!(r.pixel(3, 2), Some(Texel::BLACK));
        assert_eq!(r.pixel(4, 0), None);
    }

    #[test]
    fn test_solid_rect_blends_source_over() {
        let mut r = Raster::new(4, 4);
        r.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &Paint::Solid(Rgba::new(1.0, 0.0, 0.0, 0.5)));

        let inside = r.pixel(1, 1).unwrap();
        assert_eq!(inside.r, 128);
        assert_eq!(inside.a, 255);
        assert_eq!(r.pixel(3, 3), Some(Texel::BLACK));
    }

    #[test]
    fn test_rect_is_clipped_to_bounds() {
        let mut r = Raster::new(4, 4);
        r.fill_rect(Rect::new(-10.0, -10.0, 100.0, 100.0), &Paint::Solid(Rgba::new(0.0, 1.0, 0.0, 1.0)));
        assert!(r.texels().iter().all(|t| t.g == 255));
    }

    #[test]
    fn test_fade_darkens_gradually() {
        let mut r = Raster::new(2, 2);
        r.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &Paint::Solid(Rgba::new(1.0, 1.0, 1.0, 1.0)));
        r.fade(Rgba::BLACK.with_alpha(0.15));
        let p = r.pixel(0, 0).unwrap();
        assert!(p.r < 255 && p.r > 200);
    }

    #[test]
    fn test_circle_covers_center_not_corner() {
        let mut r = Raster::new(20, 20);
        r.fill_circle(Vec2::new(10.0, 10.0), 4.0, &Paint::Solid(Rgba::new(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(r.pixel(10, 10).unwrap().b, 255);
        assert_eq!(r.pixel(0, 0), Some(Texel::BLACK));
    }

    #[test]
    fn test_radial_gradient_falls_off() {
        let mut r = Raster::new(40, 1);
        let g = RadialGradient::new(Vec2::new(0.0, 0.5), 40.0)
            .stop(0.0, Rgba::new(1.0, 1.0, 1.0, 1.0))
            .stop(1.0, Rgba::new(1.0, 1.0, 1.0, 0.0));
        r.fill_rect(Rect::new(0.0, 0.0, 40.0, 1.0), &Paint::Radial(g));
        let near = r.pixel(0, 0).unwrap().r;
        let far = r.pixel(39, 0).unwrap().r;
        assert!(near > far);
    }

    #[test]
    fn test_stroke_draws_along_line() {
        let mut r = Raster::new(20, 20);
        let mut path = Path::new();
        path.move_to(Vec2::new(2.0, 10.0)).line_to(Vec2::new(18.0, 10.0));
        r.stroke_path(&path, &Stroke::new(Rgba::new(1.0, 1.0, 1.0, 1.0), 2.0));
        assert!(r.pixel(10, 9).unwrap().r > 200);
        assert_eq!(r.pixel(10, 2), Some(Texel::BLACK));
    }

    #[test]
    fn test_degenerate_shapes_are_ignored() {
        let mut r = Raster::new(8, 8);
        let white = Paint::Solid(Rgba::new(1.0, 1.0, 1.0, 1.0));
        r.fill_circle(Vec2::new(f32::NAN, 2.0), 3.0, &white);
        r.fill_circle(Vec2::new(4.0, 4.0), 0.0, &white);
        r.fill_rect(Rect::new(f32::INFINITY, 0.0, 2.0, 2.0), &white);
        assert!(r.texels().iter().all(|t| *t == Texel::BLACK));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut r = Raster::new(2, 2);
        r.resize(5, 4);
        assert_eq!(r.size(), Vec2::new(5.0, 4.0));
        assert_eq!(r.texels().len(), 20);
    }
}
