// Full-screen white flash overlay timing
use crate::constants::{FLASH_OVERLAY_FADE_MS, FLASH_OVERLAY_HOLD_MS, FLASH_OVERLAY_REMOVE_MS};

/// Opacity curve of the flash overlay
/// Opaque for a short hold, then eases out; removed shortly after it fades
#[derive(Clone, Copy, Debug)]
pub struct FlashFade {
    pub hold_ms: f32,
    pub fade_ms: f32,
    pub remove_ms: f32,
}

impl Default for FlashFade {
    fn default() -> Self {
        Self {
            hold_ms: FLASH_OVERLAY_HOLD_MS,
            fade_ms: FLASH_OVERLAY_FADE_MS,
            remove_ms: FLASH_OVERLAY_REMOVE_MS,
        }
    }
}

impl FlashFade {
    /// Overlay opacity `elapsed_ms` after it appeared, or `None` once it must go
    pub fn opacity(&self, elapsed_ms: f32) -> Option<f32> {
        if elapsed_ms >= self.remove_ms {
            return None;
        }
        if elapsed_ms <= self.hold_ms {
            return Some(1.0);
        }
        let t = ((elapsed_ms - self.hold_ms) / self.fade_ms).clamp(0.0, 1.0);
        Some(1.0 - ease_out(t))
    }
}

/// CSS `ease-out`: cubic-bezier(0, 0, 0.58, 1)
fn ease_out(t: f32) -> f32 {
    const X2: f32 = 0.58;

    // Solve x(s) = t for the curve parameter s by bisection; x is monotonic
    let bezier = |p1: f32, p2: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    for _ in 0..24 {
        let mid = (lo + hi) * 0.5;
        if bezier(0.0, X2, mid) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bezier(0.0, 1.0, (lo + hi) * 0.5)
}
