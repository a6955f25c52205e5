// Fire particle burst: spawning, per-frame physics and drawing
use bevy::color::Srgba;
use bevy::math::Vec2;
use rand::Rng;
use crate::constants::*;
use crate::surface::Surface;

/// A single fire/smoke particle
/// Velocity is in units per frame, timestamps are host milliseconds
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub lifetime_ms: f32,
    pub born_at: f64,
    #[allow(dead_code)]
    pub heat: f32,
    /// 1 at birth, approaching 0 at end of life; refreshed by `update`
    pub fade: f32,
}

impl Particle {
    /// Age in milliseconds at `now`
    #[inline]
    pub fn age(&self, now: f64) -> f32 {
        (now - self.born_at) as f32
    }

    /// 1 - age / lifetime
    #[inline]
    pub fn fade_at(&self, now: f64) -> f32 {
        1.0 - self.age(now) / self.lifetime_ms
    }

    /// Saturated fire hue cooling toward transparent as the particle fades
    pub fn color(&self) -> Srgba {
        Srgba::new(
            FIRE_RED / 255.0,
            (FIRE_GREEN * self.fade).floor() / 255.0,
            (FIRE_BLUE * self.fade).floor() / 255.0,
            self.fade,
        )
    }

    pub fn drawn_radius(&self) -> f32 {
        self.radius * self.fade
    }
}

/// Owns every live particle of the current effect episode
#[derive(Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Append `count` particles bursting upward from around `origin`
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize, origin: Vec2, now: f64) {
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle {
                position: origin + Vec2::new(
                    rng.gen_range(-PARTICLE_JITTER_X..PARTICLE_JITTER_X),
                    rng.gen_range(-PARTICLE_JITTER_Y..PARTICLE_JITTER_Y),
                ),
                velocity: Vec2::new(
                    rng.gen_range(-PARTICLE_VX_RANGE..PARTICLE_VX_RANGE),
                    rng.gen_range(PARTICLE_VY_MIN..PARTICLE_VY_MAX),
                ),
                radius: rng.gen_range(PARTICLE_RADIUS_MIN..PARTICLE_RADIUS_MAX),
                lifetime_ms: rng.gen_range(PARTICLE_LIFETIME_MIN_MS..PARTICLE_LIFETIME_MAX_MS),
                born_at: now,
                heat: 1.0,
                fade: 1.0,
            });
        }
    }

    /// Advance one frame: drop expired particles, integrate the rest
    /// Survivors keep their relative order
    pub fn update(&mut self, now: f64) {
        self.particles.retain_mut(|p| {
            let age = p.age(now);
            if age > p.lifetime_ms {
                return false;
            }

            p.position += p.velocity;
            p.velocity.y += PARTICLE_GRAVITY;
            p.velocity.x *= PARTICLE_HORIZONTAL_DAMPING;
            p.fade = p.fade_at(now);
            true
        });
    }

    /// Draw each live particle as a shrinking, fading disc
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for p in &self.particles {
            surface.fill_circle(p.position, p.drawn_radius(), p.color());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::RecordingSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ORIGIN: Vec2 = Vec2::new(500.0, 400.0);

    fn burst(count: usize, now: f64) -> ParticleStore {
        let mut store = ParticleStore::new();
        store.spawn(&mut StdRng::seed_from_u64(42), count, ORIGIN, now);
        store
    }

    #[test]
    fn spawn_respects_ranges() {
        let store = burst(400, 0.0);
        assert_eq!(store.len(), 400);

        for p in store.iter() {
            let offset = p.position - ORIGIN;
            assert!(offset.x.abs() <= PARTICLE_JITTER_X);
            assert!(offset.y.abs() <= PARTICLE_JITTER_Y);
            assert!(p.velocity.x.abs() <= PARTICLE_VX_RANGE);
            assert!(p.velocity.y >= PARTICLE_VY_MIN && p.velocity.y < PARTICLE_VY_MAX);
            assert!(p.velocity.y < 0.0, "particles must burst upward");
            assert!((PARTICLE_RADIUS_MIN..PARTICLE_RADIUS_MAX).contains(&p.radius));
            assert!((PARTICLE_LIFETIME_MIN_MS..PARTICLE_LIFETIME_MAX_MS).contains(&p.lifetime_ms));
            assert_eq!(p.fade, 1.0);
        }
    }

    #[test]
    fn spawn_appends() {
        let mut store = burst(10, 0.0);
        store.spawn(&mut StdRng::seed_from_u64(1), 5, ORIGIN, 0.0);
        assert_eq!(store.len(), 15);
    }

    #[test]
    fn everything_expires_after_max_lifetime() {
        let mut store = burst(400, 1000.0);
        store.update(1000.0 + PARTICLE_LIFETIME_MAX_MS as f64 + 1.0);
        assert!(store.is_empty());
    }

    #[test]
    fn particle_at_exact_lifetime_survives_one_more_frame() {
        let mut store = burst(1, 0.0);
        let lifetime = store.iter().next().unwrap().lifetime_ms as f64;
        store.update(lifetime);
        assert_eq!(store.len(), 1);
        assert!(store.iter().next().unwrap().fade.abs() < 1e-4);
        store.update(lifetime + 0.5);
        assert!(store.is_empty());
    }

    #[test]
    fn update_applies_gravity_and_damping() {
        let mut store = burst(1, 0.0);
        let before = store.iter().next().unwrap().clone();
        store.update(16.0);
        let after = store.iter().next().unwrap();

        assert_eq!(after.position, before.position + before.velocity);
        assert!((after.velocity.y - (before.velocity.y + PARTICLE_GRAVITY)).abs() < 1e-6);
        assert!((after.velocity.x - before.velocity.x * PARTICLE_HORIZONTAL_DAMPING).abs() < 1e-6);
    }

    #[test]
    fn live_ages_stay_within_lifetime() {
        let mut store = burst(200, 0.0);
        let mut now = 0.0;
        while !store.is_empty() {
            now += 16.0;
            store.update(now);
            for p in store.iter() {
                let age = p.age(now);
                assert!(age >= 0.0 && age <= p.lifetime_ms);
                assert!((0.0..=1.0).contains(&p.fade));
            }
        }
        assert!(now <= PARTICLE_LIFETIME_MAX_MS as f64 + 16.0);
    }

    #[test]
    fn fade_is_non_increasing_over_a_lifetime() {
        let mut store = burst(1, 0.0);
        assert_eq!(store.iter().next().unwrap().fade_at(0.0), 1.0);

        let mut previous = 1.0;
        let mut now = 0.0;
        loop {
            let Some(p) = store.iter().next() else { break };
            assert!(p.fade <= previous);
            previous = p.fade;
            now += 7.0;
            store.update(now);
        }
        assert!(previous < 0.01);
    }

    #[test]
    fn colour_cools_and_radius_shrinks_with_fade() {
        let mut p = burst(1, 0.0).iter().next().unwrap().clone();
        let fresh = p.color();
        assert_eq!(fresh.red, 1.0);
        assert_eq!(fresh.green, 180.0 / 255.0);
        assert_eq!(fresh.blue, 60.0 / 255.0);
        assert_eq!(fresh.alpha, 1.0);
        assert_eq!(p.drawn_radius(), p.radius);

        p.fade = 0.5;
        let half = p.color();
        assert_eq!(half.green, 90.0 / 255.0);
        assert_eq!(half.blue, 30.0 / 255.0);
        assert_eq!(half.alpha, 0.5);
        assert_eq!(p.drawn_radius(), p.radius * 0.5);
    }

    #[test]
    fn draw_emits_one_circle_per_particle() {
        let store = burst(25, 0.0);
        let mut surface = RecordingSurface::new(Vec2::new(1000.0, 800.0));
        store.draw(&mut surface);
        assert_eq!(surface.circles().count(), 25);
    }
}
