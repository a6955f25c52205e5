//! Coarse 1-D value noise backed by a fixed lookup table.
//!
//! No interpolation between neighbouring slots: the smoke flicker is meant
//! to step, not glide.

use rand::Rng;
use crate::constants::{NOISE_MAX_VALUE, NOISE_TABLE_SIZE};

/// Precomputed pseudo-random bytes, immutable after construction
#[derive(Clone, Debug)]
pub struct NoiseTable {
    values: [u8; NOISE_TABLE_SIZE],
}

impl NoiseTable {
    /// Fill every slot with an independent uniform value in `0..NOISE_MAX_VALUE`
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values = [0u8; NOISE_TABLE_SIZE];
        for value in values.iter_mut() {
            *value = rng.gen_range(0..NOISE_MAX_VALUE);
        }
        Self { values }
    }

    #[allow(dead_code)]
    pub fn from_values(values: [u8; NOISE_TABLE_SIZE]) -> Self {
        Self { values }
    }

    pub const fn len(&self) -> usize {
        NOISE_TABLE_SIZE
    }

    /// Sample the table at a real-valued position, normalized to [0, 1)
    /// Floors `x` and wraps it into the table, so negative inputs wrap too
    #[inline]
    pub fn sample(&self, x: f32) -> f32 {
        let index = (x.floor() as i64).rem_euclid(NOISE_TABLE_SIZE as i64) as usize;
        self.values[index] as f32 / NOISE_MAX_VALUE as f32
    }
}
