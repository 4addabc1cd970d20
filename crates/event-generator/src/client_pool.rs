//! Pre-generated client identifiers used to simulate returning visitors.

use crate::generators::generate_uuid_v4;
use crate::rng::SeededRandom;

/// Default number of pre-generated client ids.
pub const DEFAULT_CLIENT_POOL_SIZE: usize = 1000;

/// Fixed set of client ids, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ClientPool {
    ids: Vec<String>,
}

impl ClientPool {
    /// Generate `size` client ids from the worker's random source.
    pub fn generate(rng: &mut SeededRandom, size: usize) -> Self {
        let ids = (0..size).map(|_| generate_uuid_v4(rng)).collect();
        Self { ids }
    }

    /// A pool with no ids; every draw mints a fresh one.
    pub fn empty() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Resolve a client id: reuse a pooled one with probability
    /// `reuse_probability`, otherwise mint a fresh UUID.
    ///
    /// A zero probability skips the reuse draw entirely; the only draws are
    /// then the ones for the fresh UUID.
    pub fn pick(&self, rng: &mut SeededRandom, reuse_probability: f64) -> String {
        let reuse = reuse_probability > 0.0 && rng.chance(reuse_probability);
        if reuse && !self.ids.is_empty() {
            rng.random_choice(&self.ids).clone()
        } else {
            generate_uuid_v4(rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::is_uuid_v4;
    use std::collections::HashSet;

    #[test]
    fn test_generate_pool() {
        let mut rng = SeededRandom::new(1);
        let pool = ClientPool::generate(&mut rng, 50);

        assert_eq!(pool.ids().len(), 50);
        assert!(pool.ids().iter().all(|id| is_uuid_v4(id)));

        let unique: HashSet<_> = pool.ids().iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_pick_never_reuses_when_probability_zero() {
        let mut rng = SeededRandom::new(8);
        let pool = ClientPool::generate(&mut rng, 10);
        let pooled: HashSet<_> = pool.ids().iter().cloned().collect();

        for _ in 0..200 {
            assert!(!pooled.contains(&pool.pick(&mut rng, 0.0)));
        }
    }

    #[test]
    fn test_pick_without_reuse_draws_only_the_uuid() {
        let pool = ClientPool::empty();
        let mut picked = SeededRandom::new(8);
        let mut direct = SeededRandom::new(8);

        assert_eq!(pool.pick(&mut picked, 0.0), generate_uuid_v4(&mut direct));
        assert_eq!(picked, direct);
    }

    #[test]
    fn test_pick_with_reuse_spends_one_draw_first() {
        let mut rng = SeededRandom::new(8);
        let pool = ClientPool::generate(&mut rng, 10);
        let mut expected = rng.clone();

        let id = pool.pick(&mut rng, 0.7);
        if expected.chance(0.7) {
            assert_eq!(&id, expected.random_choice(pool.ids()));
        } else {
            assert_eq!(id, generate_uuid_v4(&mut expected));
        }
        assert_eq!(rng, expected);
    }

    #[test]
    fn test_pick_always_reuses_when_probability_one() {
        let mut rng = SeededRandom::new(8);
        let pool = ClientPool::generate(&mut rng, 10);
        let pooled: HashSet<_> = pool.ids().iter().cloned().collect();

        for _ in 0..200 {
            assert!(pooled.contains(&pool.pick(&mut rng, 1.0)));
        }
    }

    #[test]
    fn test_empty_pool_mints_fresh() {
        let mut rng = SeededRandom::new(8);
        let pool = ClientPool::empty();
        let id = pool.pick(&mut rng, 1.0);
        assert!(is_uuid_v4(&id));
    }

    #[test]
    fn test_reuse_ratio_close_to_probability() {
        let mut rng = SeededRandom::new(20_240_615);
        let pool = ClientPool::generate(&mut rng, DEFAULT_CLIENT_POOL_SIZE);
        let pooled: HashSet<_> = pool.ids().iter().cloned().collect();

        let draws = 100_000;
        let reused = (0..draws)
            .filter(|_| pooled.contains(&pool.pick(&mut rng, 0.7)))
            .count();

        let ratio = reused as f64 / draws as f64;
        assert!((ratio - 0.7).abs() < 0.01, "reuse ratio {ratio}");
    }
}
