// Camera shake with linearly decaying random jitter
use bevy::math::Vec2;
use rand::Rng;

/// Time-bounded shake driver
/// Polled once per frame; yields a fresh random offset until it runs out
#[derive(Clone, Debug, Default)]
pub struct ScreenShake {
    started_at: f64,
    duration_ms: f32,
    magnitude: f32,
    running: bool,
}

impl ScreenShake {
    pub fn start(&mut self, now: f64, duration_ms: f32, magnitude: f32) {
        self.started_at = now;
        self.duration_ms = duration_ms;
        self.magnitude = magnitude;
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Maximum offset per axis `elapsed_ms` after the start
    pub fn intensity(&self, elapsed_ms: f32) -> f32 {
        if self.duration_ms <= 0.0 {
            return 0.0;
        }
        (self.magnitude * (1.0 - elapsed_ms / self.duration_ms)).max(0.0)
    }

    /// Offset to apply this frame; zero once the shake has expired
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, now: f64) -> Vec2 {
        if !self.running {
            return Vec2::ZERO;
        }

        let elapsed = ((now - self.started_at) as f32).max(0.0);
        if elapsed > self.duration_ms {
            self.running = false;
            return Vec2::ZERO;
        }

        let intensity = self.intensity(elapsed);
        Vec2::new(
            rng.gen_range(-intensity..=intensity),
            rng.gen_range(-intensity..=intensity),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started() -> ScreenShake {
        let mut shake = ScreenShake::default();
        shake.start(100.0, 1200.0, 16.0);
        shake
    }

    #[test]
    fn intensity_decays_linearly_to_zero() {
        let shake = started();
        assert_eq!(shake.intensity(0.0), 16.0);
        assert_eq!(shake.intensity(600.0), 8.0);
        assert_eq!(shake.intensity(1200.0), 0.0);
        assert_eq!(shake.intensity(5000.0), 0.0);
    }

    #[test]
    fn offsets_never_exceed_intensity() {
        let mut shake = started();
        let mut rng = StdRng::seed_from_u64(5);
        let mut now = 100.0;
        while shake.is_running() {
            let offset = shake.step(&mut rng, now);
            let bound = shake.intensity((now - 100.0) as f32);
            assert!(offset.x.abs() <= bound && offset.y.abs() <= bound);
            now += 16.0;
        }
        assert!(now > 1300.0);
    }

    #[test]
    fn stops_and_resets_after_duration() {
        let mut shake = started();
        let mut rng = StdRng::seed_from_u64(5);
        assert!(shake.step(&mut rng, 1300.0).abs().max_element() <= 0.0);
        assert!(shake.is_running());

        assert_eq!(shake.step(&mut rng, 1300.5), Vec2::ZERO);
        assert!(!shake.is_running());
        assert_eq!(shake.step(&mut rng, 1310.0), Vec2::ZERO);
    }

    #[test]
    fn idle_driver_yields_neutral_offset() {
        let mut shake = ScreenShake::default();
        assert_eq!(shake.step(&mut StdRng::seed_from_u64(1), 50.0), Vec2::ZERO);
    }

    #[test]
    fn jitter_is_rerolled_each_frame() {
        let mut shake = started();
        let mut rng = StdRng::seed_from_u64(9);
        let a = shake.step(&mut rng, 110.0);
        let b = shake.step(&mut rng, 126.0);
        assert_ne!(a, b);
    }
}
