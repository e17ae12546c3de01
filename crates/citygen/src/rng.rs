//! Sine-based structural PRNG.
//!
//! Deliberately non-cryptographic and dead simple. Already-built worlds
//! reproduce block-for-block only if this exact sequence is preserved,
//! so the formula is frozen: do not swap in a library RNG here. Decoration randomness (window lit state, flicker)
//! uses `rand` instead and is allowed to vary between runs.

/// Reproducible PRNG: `frac(sin(seed) * 10000)`, seed advancing by 1
/// per draw.
#[derive(Debug, Clone)]
pub struct SineRandom {
    seed: f64,
}

impl Default for SineRandom {
    fn default() -> Self {
        Self::new(42.0)
    }
}

impl SineRandom {
    pub fn new(seed: f64) -> Self {
        Self { seed }
    }

    /// Next value in [0, 1).
    pub fn next(&mut self) -> f64 {
        let x = self.seed.sin() * 10000.0;
        self.seed += 1.0;
        x - x.floor()
    }

    /// Uniform float in [min, max).
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    /// Uniform integer in [min, max], both bounds inclusive.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        (self.next() * (max - min + 1) as f64).floor() as i64 + min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_first_draws() {
        let mut rng = SineRandom::default();
        // Golden values for seed 42, captured at implementation time.
        assert!((rng.next() - 0.7845208436629036).abs() < 1e-12);
        assert!((rng.next() - 0.2525737140167621).abs() < 1e-12);
        assert!((rng.next() - 0.01925105413576489).abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SineRandom::new(7.0);
        let mut b = SineRandom::new(7.0);
        for _ in 0..100 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn next_stays_in_unit_interval() {
        let mut rng = SineRandom::new(-1234.5);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn next_int_respects_inclusive_bounds() {
        let mut rng = SineRandom::new(3.0);
        let mut seen = [false; 5];
        for _ in 0..1_000 {
            let v = rng.next_int(2, 6);
            assert!((2..=6).contains(&v));
            seen[(v - 2) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "all values in [2,6] should occur");
    }

    #[test]
    fn next_float_respects_bounds() {
        let mut rng = SineRandom::new(99.0);
        for _ in 0..1_000 {
            let v = rng.next_float(-3.0, 12.0);
            assert!((-3.0..12.0).contains(&v));
        }
    }
}
