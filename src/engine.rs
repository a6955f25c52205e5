//! Blast engine: owns all effect state and renders one frame per `tick`.
//!
//! The engine never schedules itself; a host loop (the Bevy app, or a test)
//! calls `tick` once per display frame with the current time.

use bevy::color::Alpha;
use bevy::log::{debug, info};
use bevy::math::{Rect, Vec2};
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use crate::config::BlastConfig;
use crate::constants::*;
use crate::effect::{EffectSequencer, EffectSignal};
use crate::noise_table::NoiseTable;
use crate::particles::ParticleStore;
use crate::shake::ScreenShake;
use crate::smoke::draw_smoke;
use crate::surface::Surface;

/// What the host must apply after a frame
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Whole-screen translation for this frame
    pub shake_offset: Vec2,
    pub signals: Vec<EffectSignal>,
}

#[derive(Resource)]
pub struct BlastEngine {
    config: BlastConfig,
    rng: StdRng,
    noise: NoiseTable,
    particles: ParticleStore,
    sequencer: EffectSequencer,
    shake: ScreenShake,
}

impl BlastEngine {
    pub fn new(config: BlastConfig, mut rng: StdRng) -> Self {
        let noise = NoiseTable::new(&mut rng);
        let sequencer = EffectSequencer::new(config.reveal_delay_ms, config.effect_duration_ms);
        Self {
            config,
            rng,
            noise,
            particles: ParticleStore::new(),
            sequencer,
            shake: ScreenShake::default(),
        }
    }

    pub fn config(&self) -> &BlastConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.sequencer.is_active()
    }

    #[allow(dead_code)]
    pub fn started_at(&self) -> Option<f64> {
        self.sequencer.started_at()
    }

    #[allow(dead_code)]
    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[allow(dead_code)]
    pub fn is_shaking(&self) -> bool {
        self.shake.is_running()
    }

    /// Start an episode for a viewport of the given logical size
    /// Dropped (returns false) while an episode is already running
    pub fn fire(&mut self, now: f64, viewport: Vec2) -> bool {
        if !self.sequencer.begin(now) {
            debug!("Blast trigger ignored: effect already active");
            return false;
        }

        let origin = self.config.origin(viewport);
        self.particles.clear();
        self.particles.spawn(&mut self.rng, self.config.particle_count, origin, now);
        self.shake.start(now, self.config.shake_duration_ms, self.config.shake_magnitude);

        info!("💥 Blast fired at {:?}: {} particles", origin, self.particles.len());
        true
    }

    /// Advance timers and the shake driver, then redraw the whole surface
    pub fn tick<S: Surface + ?Sized>(&mut self, now: f64, surface: &mut S) -> FrameReport {
        let signals = self.sequencer.poll(now);
        for signal in &signals {
            match signal {
                EffectSignal::RevealMessage => info!("Revealing final message"),
                EffectSignal::Ended => info!("Blast effect finished"),
            }
        }
        let shake_offset = self.shake.step(&mut self.rng, now);

        surface.clear();

        if let Some(started_at) = self.sequencer.started_at() {
            let t = (now - started_at) as f32;
            let origin = self.config.origin(surface.size());

            draw_flash_wash(surface, t);
            draw_shockwave(surface, t, origin);

            self.particles.update(now);
            self.particles.draw(surface);

            draw_smoke(surface, &self.noise, self.config.smoke_layers, t, origin);
        }

        FrameReport { shake_offset, signals }
    }
}

/// Warm full-screen light right after the blast
fn draw_flash_wash<S: Surface + ?Sized>(surface: &mut S, t: f32) {
    if t >= FLASH_WASH_CUTOFF_MS {
        return;
    }
    let alpha = 1.0 - t / FLASH_WASH_FADE_MS;
    let rect = Rect::from_corners(Vec2::ZERO, surface.size());
    surface.fill_rect(rect, FLASH_WASH_COLOR.with_alpha(alpha));
}

/// Expanding ring that thins and fades as it grows
fn draw_shockwave<S: Surface + ?Sized>(surface: &mut S, t: f32, origin: Vec2) {
    if t >= SHOCKWAVE_CUTOFF_MS {
        return;
    }
    let radius = t * SHOCKWAVE_SPEED;
    let width = (SHOCKWAVE_START_WIDTH - t / SHOCKWAVE_WIDTH_DECAY_MS).max(0.0);
    let alpha = 1.0 - t / SHOCKWAVE_CUTOFF_MS;
    surface.stroke_circle(origin, radius, width, SHOCKWAVE_COLOR.with_alpha(alpha));
}
