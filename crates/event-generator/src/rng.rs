//! Xorshift32 random source shared by every event generator.

/// Substitute for a zero seed, which is a fixed point of xorshift.
const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

/// 2^32, used to map the 32-bit state onto `[0, 1)`.
const STATE_SPAN: f64 = 4_294_967_296.0;

/// Deterministic xorshift32 generator.
///
/// Two instances created with the same seed yield the same sequence. Each
/// worker owns exactly one instance; it is never shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Create a generator from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 {
            ZERO_SEED_REPLACEMENT
        } else {
            seed
        };
        Self { state }
    }

    /// Seed for worker `worker_id` derived from a run-wide base seed.
    pub fn for_worker(base_seed: u32, worker_id: u32) -> Self {
        Self::new(base_seed.wrapping_add(worker_id))
    }

    /// Advance the state. The update runs on `i32`, so `>> 17` is an
    /// arithmetic shift that carries the sign bit.
    fn step(&mut self) -> u32 {
        let mut s = self.state as i32;
        s ^= s.wrapping_shl(13);
        s ^= s >> 17;
        s ^= s.wrapping_shl(5);
        self.state = s as u32;
        self.state
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.step()) / STATE_SPAN
    }

    /// Uniform integer in `min..=max`.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        (self.next_f64() * span).floor() as i64 + min
    }

    /// Pick one element of a non-empty slice.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    pub fn random_choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = (self.next_f64() * items.len() as f64).floor() as usize;
        &items[idx.min(items.len() - 1)]
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
