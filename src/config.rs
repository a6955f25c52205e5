// Runtime tuning for the blast effect
use bevy::prelude::*;
use crate::constants::*;

/// Blast effect configuration resource
/// Defaults mirror `constants.rs`; tests shrink timings or counts as needed
#[derive(Resource, Clone, Debug)]
pub struct BlastConfig {
    pub particle_count: usize,
    pub reveal_delay_ms: f64,
    pub effect_duration_ms: f64,
    pub shake_duration_ms: f32,
    pub shake_magnitude: f32,
    /// Effect origin as a fraction of viewport width/height
    pub origin_fraction: Vec2,
    pub smoke_layers: usize,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            particle_count: BURST_PARTICLE_COUNT,
            reveal_delay_ms: REVEAL_MESSAGE_DELAY_MS,
            effect_duration_ms: EFFECT_DURATION_MS,
            shake_duration_ms: SHAKE_DURATION_MS,
            shake_magnitude: SHAKE_MAGNITUDE,
            origin_fraction: Vec2::new(ORIGIN_X_FRACTION, ORIGIN_Y_FRACTION),
            smoke_layers: SMOKE_LAYERS,
        }
    }
}

impl BlastConfig {
    /// Effect origin for a viewport of the given logical size
    pub fn origin(&self, viewport: Vec2) -> Vec2 {
        viewport * self.origin_fraction
    }
}
