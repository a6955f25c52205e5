// Layered smoke column drawn with additive ellipses
use bevy::color::Alpha;
use bevy::math::Vec2;
use crate::constants::*;
use crate::noise_table::NoiseTable;
use crate::surface::{BlendMode, Surface};

/// Geometry and opacity of one smoke layer at a given time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmokeLayer {
    pub center: Vec2,
    pub half_size: Vec2,
    pub alpha: f32,
}

/// Compute layer `index` of the column at `elapsed_ms` after the blast
/// Layers stack upward from above the origin and breathe horizontally
pub fn smoke_layer(noise: &NoiseTable, elapsed_ms: f32, origin: Vec2, index: usize) -> SmokeLayer {
    let i = index as f32;
    let half_width = SMOKE_BASE_HALF_WIDTH
        + ((elapsed_ms + i * SMOKE_PHASE_STEP_MS) / SMOKE_PERIOD_MS).sin() * SMOKE_WIDTH_SWING;
    let half_height = SMOKE_BASE_HALF_HEIGHT + i * SMOKE_HEIGHT_STEP;
    let y = origin.y - SMOKE_RISE_OFFSET - i * SMOKE_LAYER_STEP;

    let slot = (elapsed_ms / SMOKE_NOISE_RATE_MS + i * SMOKE_NOISE_LAYER_STRIDE) % noise.len() as f32;
    let alpha = SMOKE_MIN_ALPHA + noise.sample(slot) * SMOKE_ALPHA_RANGE;

    SmokeLayer {
        center: Vec2::new(origin.x, y),
        half_size: Vec2::new(half_width, half_height),
        alpha,
    }
}

/// Draw `layers` overlapping smoke ellipses with additive compositing
/// The surface's previous blend mode is restored afterwards
pub fn draw_smoke<S: Surface + ?Sized>(
    surface: &mut S,
    noise: &NoiseTable,
    layers: usize,
    elapsed_ms: f32,
    origin: Vec2,
) {
    let previous = surface.blend_mode();
    surface.set_blend_mode(BlendMode::Additive);

    for index in 0..layers {
        let layer = smoke_layer(noise, elapsed_ms, origin, index);
        surface.fill_ellipse(layer.center, layer.half_size, SMOKE_COLOR.with_alpha(layer.alpha));
    }

    surface.set_blend_mode(previous);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawCommand, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ORIGIN: Vec2 = Vec2::new(600.0, 500.0);

    fn noise() -> NoiseTable {
        NoiseTable::new(&mut StdRng::seed_from_u64(99))
    }

    #[test]
    fn layers_stack_upward_and_grow() {
        let noise = noise();
        let mut last = smoke_layer(&noise, 250.0, ORIGIN, 0);
        assert_eq!(last.center, Vec2::new(600.0, 300.0));
        for i in 1..SMOKE_LAYERS {
            let layer = smoke_layer(&noise, 250.0, ORIGIN, i);
            assert!(layer.center.y < last.center.y);
            assert!(layer.half_size.y > last.half_size.y);
            assert_eq!(layer.center.x, ORIGIN.x);
            last = layer;
        }
    }

    #[test]
    fn opacity_stays_in_low_band() {
        let noise = noise();
        for step in 0..400 {
            let t = step as f32 * 15.0;
            for i in 0..SMOKE_LAYERS {
                let alpha = smoke_layer(&noise, t, ORIGIN, i).alpha;
                assert!((0.06..0.18).contains(&alpha), "alpha {}", alpha);
            }
        }
    }

    #[test]
    fn width_undulates_within_swing() {
        let noise = noise();
        let widths: Vec<f32> = (0..200)
            .map(|step| smoke_layer(&noise, step as f32 * 50.0, ORIGIN, 3).half_size.x)
            .collect();
        assert!(widths.iter().all(|w| (310.0..=390.0).contains(w)));
        let min = widths.iter().cloned().fold(f32::MAX, f32::min);
        let max = widths.iter().cloned().fold(f32::MIN, f32::max);
        assert!(max - min > 60.0);
    }

    #[test]
    fn draws_additively_and_restores_blend_mode() {
        let noise = noise();
        let mut surface = RecordingSurface::new(Vec2::new(1200.0, 800.0));
        draw_smoke(&mut surface, &noise, SMOKE_LAYERS, 1000.0, ORIGIN);

        assert_eq!(surface.commands.first(), Some(&DrawCommand::SetBlend(BlendMode::Additive)));
        assert_eq!(surface.commands.last(), Some(&DrawCommand::SetBlend(BlendMode::Normal)));
        assert_eq!(surface.ellipses().count(), SMOKE_LAYERS);
        assert_eq!(surface.blend_mode(), BlendMode::Normal);
    }
}
