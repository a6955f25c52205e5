use bevy::color::Srgba;

// Effect sequencing (milliseconds from trigger)
pub const REVEAL_MESSAGE_DELAY_MS: f64 = 3500.0;
pub const EFFECT_DURATION_MS: f64 = 6000.0;

// Effect origin as a fraction of the viewport
pub const ORIGIN_X_FRACTION: f32 = 0.5;
pub const ORIGIN_Y_FRACTION: f32 = 0.65;  // Lower third of the screen

// Particle burst
pub const BURST_PARTICLE_COUNT: usize = 400;
pub const PARTICLE_JITTER_X: f32 = 20.0;
pub const PARTICLE_JITTER_Y: f32 = 10.0;
pub const PARTICLE_VX_RANGE: f32 = 1.5;        // Symmetric band: [-1.5, 1.5]
pub const PARTICLE_VY_MIN: f32 = -7.0;         // Negative y is up
pub const PARTICLE_VY_MAX: f32 = -2.0;
pub const PARTICLE_RADIUS_MIN: f32 = 4.0;
pub const PARTICLE_RADIUS_MAX: f32 = 18.0;
pub const PARTICLE_LIFETIME_MIN_MS: f32 = 1200.0;
pub const PARTICLE_LIFETIME_MAX_MS: f32 = 2800.0;

// Per-frame particle physics
pub const PARTICLE_GRAVITY: f32 = 0.05;
pub const PARTICLE_HORIZONTAL_DAMPING: f32 = 0.98;

// Fire colour at birth; green/blue channels fade with the particle
pub const FIRE_RED: f32 = 255.0;
pub const FIRE_GREEN: f32 = 180.0;
pub const FIRE_BLUE: f32 = 60.0;

// Initial light wash
pub const FLASH_WASH_CUTOFF_MS: f32 = 800.0;
pub const FLASH_WASH_FADE_MS: f32 = 900.0;
pub const FLASH_WASH_COLOR: Srgba = Srgba::rgb(1.0, 200.0 / 255.0, 120.0 / 255.0);

// Shockwave ring
pub const SHOCKWAVE_CUTOFF_MS: f32 = 1500.0;
pub const SHOCKWAVE_SPEED: f32 = 1.6;          // Radius units per millisecond
pub const SHOCKWAVE_START_WIDTH: f32 = 14.0;
pub const SHOCKWAVE_WIDTH_DECAY_MS: f32 = 160.0; // Width shrinks by 1 unit every 160ms
pub const SHOCKWAVE_COLOR: Srgba = Srgba::rgb(1.0, 220.0 / 255.0, 180.0 / 255.0);

// Smoke overlay
pub const SMOKE_LAYERS: usize = 20;
pub const SMOKE_BASE_HALF_WIDTH: f32 = 350.0;
pub const SMOKE_WIDTH_SWING: f32 = 40.0;
pub const SMOKE_PHASE_STEP_MS: f32 = 80.0;
pub const SMOKE_PERIOD_MS: f32 = 600.0;
pub const SMOKE_BASE_HALF_HEIGHT: f32 = 120.0;
pub const SMOKE_HEIGHT_STEP: f32 = 15.0;
pub const SMOKE_RISE_OFFSET: f32 = 200.0;
pub const SMOKE_LAYER_STEP: f32 = 12.0;
pub const SMOKE_NOISE_RATE_MS: f32 = 200.0;    // One noise slot per 200ms
pub const SMOKE_NOISE_LAYER_STRIDE: f32 = 3.0;
pub const SMOKE_MIN_ALPHA: f32 = 0.06;
pub const SMOKE_ALPHA_RANGE: f32 = 0.12;       // Opacity band: 6%..18%
pub const SMOKE_COLOR: Srgba = Srgba::rgb(50.0 / 255.0, 40.0 / 255.0, 30.0 / 255.0);

// Noise table
pub const NOISE_TABLE_SIZE: usize = 256;
pub const NOISE_MAX_VALUE: u8 = 255;

// Screen shake
pub const SHAKE_DURATION_MS: f32 = 1200.0;
pub const SHAKE_MAGNITUDE: f32 = 16.0;

// White flash overlay (UI layer above everything)
pub const FLASH_OVERLAY_HOLD_MS: f32 = 50.0;
pub const FLASH_OVERLAY_FADE_MS: f32 = 700.0;
pub const FLASH_OVERLAY_REMOVE_MS: f32 = 800.0;
pub const FLASH_OVERLAY_Z_INDEX: i32 = 999;

// UI
pub const FINAL_MESSAGE_TEXT: &str = "Boom.";
pub const FINAL_MESSAGE_FONT_SIZE: f32 = 48.0;
pub const DETONATE_BUTTON_LABEL: &str = "DETONATE";
pub const BACKGROUND_COLOR: Srgba = Srgba::rgb(0.04, 0.04, 0.06);
