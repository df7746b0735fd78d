//! Stateless deterministic random draws.
//!
//! Branch-activation decisions must be stable when a bud is revisited
//! across iterations, without storing per-bud generator state. Both
//! functions here are pure: the same seed always produces the same
//! value, so callers key draws by `global_seed + bud_id`.

/// Avalanche-style integer hash (pcg_hash).
///
/// From <https://www.reedbeta.com/blog/hash-functions-for-gpu-rendering/>.
pub fn hash32(seed: u32) -> u32 {
    let state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// A deterministic float in `[min, max]` derived from `seed`.
pub fn random_float(seed: u32, min: f32, max: f32) -> f32 {
    min + (hash32(seed) as f32 / u32::MAX as f32) * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_value() {
        for seed in [0u32, 1, 17, 123_456, u32::MAX] {
            assert_eq!(hash32(seed), hash32(seed));
            assert_eq!(
                random_float(seed, 0.0, 1.0),
                random_float(seed, 0.0, 1.0)
            );
        }
    }

    #[test]
    fn nearby_seeds_give_different_values() {
        assert_ne!(hash32(0), hash32(1));
        assert_ne!(hash32(1), hash32(2));
        assert_ne!(hash32(1000), hash32(1001));
    }

    #[test]
    fn random_float_stays_in_range() {
        for seed in 0..1000u32 {
            let v = random_float(seed, 0.25, 0.75);
            assert!((0.25..=0.75).contains(&v), "seed {seed} gave {v}");
        }
    }
}
