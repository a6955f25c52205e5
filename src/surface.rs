//! Immediate-mode 2D drawing surface and a software rasterizer behind it.
//!
//! Coordinates are logical units with the origin at the top-left and y
//! pointing down. `PixelCanvas` scales them to physical pixels for
//! high-density displays.

use bevy::color::Srgba;
use bevy::math::{Rect, Vec2};
use rayon::prelude::*;

/// Compositing mode for subsequent draws
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over
    #[default]
    Normal,
    /// Per-channel sum, saturating ("lighter")
    Additive,
}

/// Drawing primitives consumed by the effect renderer
pub trait Surface {
    /// Logical size of the drawable area
    fn size(&self) -> Vec2;
    /// Reset every pixel to fully transparent
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Srgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgba);
    /// Ring centred on `radius`, `width` wide
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Srgba);
    fn fill_ellipse(&mut self, center: Vec2, half_size: Vec2, color: Srgba);
    fn blend_mode(&self) -> BlendMode;
    fn set_blend_mode(&mut self, mode: BlendMode);
}

type Premultiplied = [f32; 4];

const TRANSPARENT: Premultiplied = [0.0; 4];

/// CPU frame buffer implementing `Surface`
/// Stores premultiplied sRGB-encoded colour, blended the way a 2D canvas does
pub struct PixelCanvas {
    logical_size: Vec2,
    scale: f32,
    width: usize,
    height: usize,
    pixels: Vec<Premultiplied>,
    blend: BlendMode,
}

impl PixelCanvas {
    pub fn new(logical_size: Vec2, scale: f32) -> Self {
        let mut canvas = Self {
            logical_size: Vec2::ZERO,
            scale: 1.0,
            width: 0,
            height: 0,
            pixels: Vec::new(),
            blend: BlendMode::Normal,
        };
        canvas.resize(logical_size, scale);
        canvas
    }

    /// Reallocate for a new viewport; contents are discarded
    pub fn resize(&mut self, logical_size: Vec2, scale: f32) {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        self.logical_size = logical_size.max(Vec2::ZERO);
        self.scale = scale;
        self.width = (self.logical_size.x * scale).round() as usize;
        self.height = (self.logical_size.y * scale).round() as usize;
        self.pixels = vec![TRANSPARENT; self.width * self.height];
    }

    /// Physical size in pixels
    pub fn physical_size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// Straight-alpha sRGB colour of one physical pixel
    #[allow(dead_code)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(to_rgba8(self.pixels[y * self.width + x]))
    }

    /// Convert the frame into straight-alpha RGBA8 bytes
    /// Returns false if `dst` does not match the canvas size
    pub fn write_rgba8(&self, dst: &mut [u8]) -> bool {
        if dst.len() != self.pixels.len() * 4 {
            return false;
        }
        let texels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(dst);
        texels
            .par_iter_mut()
            .zip(self.pixels.par_iter())
            .for_each(|(texel, pixel)| *texel = to_rgba8(*pixel));
        true
    }

    /// Fill horizontal spans row by row; `span` maps a logical row centre to
    /// up to two logical x-intervals
    fn fill_rows<F>(&mut self, top: f32, bottom: f32, color: Srgba, span: F)
    where
        F: Fn(f32) -> [Option<(f32, f32)>; 2] + Sync,
    {
        let Some(src) = premultiply(color) else {
            return;
        };
        let (width, scale, mode) = (self.width, self.scale, self.blend);
        let (y0, y1) = pixel_range(top, bottom, scale, self.height);
        if width == 0 || y0 >= y1 {
            return;
        }
        self.pixels[y0 * width..y1 * width]
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(i, row)| {
                let ly = ((y0 + i) as f32 + 0.5) / scale;
                for (left, right) in span(ly).into_iter().flatten() {
                    let (x0, x1) = pixel_range(left, right, scale, width);
                    blend_span(&mut row[x0..x1], src, mode);
                }
            });
    }
}

impl Surface for PixelCanvas {
    fn size(&self) -> Vec2 {
        self.logical_size
    }

    fn clear(&mut self) {
        let width = self.width.max(1);
        self.pixels
            .par_chunks_mut(width)
            .for_each(|row| row.fill(TRANSPARENT));
    }

    fn fill_rect(&mut self, rect: Rect, color: Srgba) {
        if rect.is_empty() {
            return;
        }
        self.fill_rows(rect.min.y, rect.max.y, color, |_| {
            [Some((rect.min.x, rect.max.x)), None]
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgba) {
        self.fill_ellipse(center, Vec2::splat(radius), color);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Srgba) {
        if width <= 0.0 {
            return;
        }
        let outer = radius + width * 0.5;
        let inner = (radius - width * 0.5).max(0.0);
        self.fill_rows(center.y - outer, center.y + outer, color, |y| {
            let dy = y - center.y;
            let Some(o) = half_chord(outer, dy) else {
                return [None, None];
            };
            match half_chord(inner, dy) {
                Some(i) if i > 0.0 => [
                    Some((center.x - o, center.x - i)),
                    Some((center.x + i, center.x + o)),
                ],
                _ => [Some((center.x - o, center.x + o)), None],
            }
        });
    }

    fn fill_ellipse(&mut self, center: Vec2, half_size: Vec2, color: Srgba) {
        if half_size.x <= 0.0 || half_size.y <= 0.0 {
            return;
        }
        self.fill_rows(center.y - half_size.y, center.y + half_size.y, color, |y| {
            let t = (y - center.y) / half_size.y;
            if t.abs() > 1.0 {
                return [None, None];
            }
            let dx = half_size.x * (1.0 - t * t).sqrt();
            [Some((center.x - dx, center.x + dx)), None]
        });
    }

    fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }
}

/// Pixels whose centres lie within `[lo, hi]` logical units, clipped
fn pixel_range(lo: f32, hi: f32, scale: f32, limit: usize) -> (usize, usize) {
    let start = (lo * scale - 0.5).ceil().max(0.0) as usize;
    let end = ((hi * scale - 0.5).floor() + 1.0).max(0.0) as usize;
    (start.min(limit), end.min(limit).max(start.min(limit)))
}

/// Half the chord length of a circle at vertical distance `dy` from its centre
fn half_chord(radius: f32, dy: f32) -> Option<f32> {
    let d = radius * radius - dy * dy;
    (d >= 0.0).then(|| d.sqrt())
}

fn premultiply(color: Srgba) -> Option<Premultiplied> {
    let a = color.alpha.clamp(0.0, 1.0);
    if a <= 0.0 {
        return None;
    }
    Some([
        color.red.clamp(0.0, 1.0) * a,
        color.green.clamp(0.0, 1.0) * a,
        color.blue.clamp(0.0, 1.0) * a,
        a,
    ])
}

#[inline]
fn blend_span(span: &mut [Premultiplied], src: Premultiplied, mode: BlendMode) {
    match mode {
        BlendMode::Normal => {
            let keep = 1.0 - src[3];
            for dst in span {
                for c in 0..4 {
                    dst[c] = src[c] + dst[c] * keep;
                }
            }
        }
        BlendMode::Additive => {
            for dst in span {
                for c in 0..4 {
                    dst[c] = (src[c] + dst[c]).min(1.0);
                }
            }
        }
    }
}

#[inline]
fn to_rgba8(pixel: Premultiplied) -> [u8; 4] {
    let a = pixel[3];
    if a <= 0.0 {
        return [0; 4];
    }
    let channel = |c: f32| ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        channel(pixel[0]),
        channel(pixel[1]),
        channel(pixel[2]),
        (a.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}
