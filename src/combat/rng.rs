//! Fast PRNG for battle resolution. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// 2^-53, maps the top 53 bits of a u64 onto [0, 1).
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// Random source consumed by action selection, targeting and critical checks.
///
/// Every draw goes through [BattleRng::next_f64]; the derived helpers floor
/// `u * n` so a fixed draw maps to a predictable index in tests.
pub trait BattleRng {
    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn gen_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64).floor() as usize).min(len - 1)
    }

    /// Uniform integer draw in `[0, total)` for weighted selection.
    fn gen_weighted(&mut self, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        ((self.next_f64() * f64::from(total)).floor() as u32).min(total - 1)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

impl BattleRng for Rng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * UNIT_SCALE
    }
}

/// Seed from OS entropy, for callers that did not supply one.
pub fn entropy_seed() -> u64 {
    let mut bytes = [0_u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(err) => {
            tracing::warn!(%err, "os entropy unavailable, falling back to clock seed");
            chrono::Utc::now()
                .timestamp_nanos_opt()
                .map_or(0, |nanos| nanos as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl BattleRng for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn splitmix64_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn splitmix64_different_seeds_differ() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn unit_draws_stay_in_half_open_range() {
        let mut rng = Rng::new(99);
        for _ in 0..10_000 {
            let u = rng.next_f64();
            assert!((0.0..1.0).contains(&u), "draw out of range: {u}");
        }
    }

    #[test]
    fn index_and_weighted_draws_floor_the_unit_value() {
        assert_eq!(Fixed(0.0).gen_index(3), 0);
        assert_eq!(Fixed(0.5).gen_index(3), 1);
        assert_eq!(Fixed(0.999).gen_index(3), 2);
        assert_eq!(Fixed(0.7).gen_index(0), 0);

        assert_eq!(Fixed(0.0).gen_weighted(6), 0);
        assert_eq!(Fixed(0.5).gen_weighted(6), 3);
        assert_eq!(Fixed(0.9999).gen_weighted(6), 5);
    }
}
