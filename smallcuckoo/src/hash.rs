//! The two slot selectors.
//!
//! Every key has exactly two candidate slots: an even one picked by
//! [`Larson`] and an odd one picked by [`OddHash`]. Keeping the parities
//! apart splits the slot table into two disjoint halves, so a key's two
//! candidates can never coincide.

/// A pure 32-bit hash over a 64-bit key.
pub trait KeyHash {
    fn hash32(key: u64) -> u32;
}

/// Larson's multiplicative string hash over the little-endian key bytes.
///
/// Per-Ake Larson, "Dynamic Hash Tables", CACM 31(4), 1988.
pub struct Larson;

impl KeyHash for Larson {
    #[inline]
    fn hash32(key: u64) -> u32 {
        const M: u32 = 101;
        let h = key
            .to_le_bytes()
            .iter()
            .fold(0xdead_beef_u32, |h, &b| h.wrapping_mul(M).wrapping_add(b as u32));
        h ^ (h >> 16)
    }
}

/// Bob Jenkins' lookup3 `hashword` over the two 32-bit halves of the key.
pub struct Jenkins;

impl KeyHash for Jenkins {
    #[inline]
    fn hash32(key: u64) -> u32 {
        const INITVAL: u32 = 0x5555_5555;
        // two words
        let seed = 0xdead_beef_u32
            .wrapping_add(2 << 2)
            .wrapping_add(INITVAL);
        let mut a = seed.wrapping_add(key as u32);
        let mut b = seed.wrapping_add((key >> 32) as u32);
        let mut c = seed;

        c ^= b;
        c = c.wrapping_sub(b.rotate_left(14));
        a ^= c;
        a = a.wrapping_sub(c.rotate_left(11));
        b ^= a;
        b = b.wrapping_sub(a.rotate_left(25));
        c ^= b;
        c = c.wrapping_sub(b.rotate_left(16));
        a ^= c;
        a = a.wrapping_sub(c.rotate_left(4));
        b ^= a;
        b = b.wrapping_sub(a.rotate_left(14));
        c ^= b;
        c = c.wrapping_sub(b.rotate_left(24));

        c ^ (c >> 16)
    }
}

/// Hardware CRC32C of the key, seeded with all ones.
#[cfg(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    all(target_arch = "aarch64", target_feature = "crc")
))]
pub struct Crc32c;

#[cfg(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    all(target_arch = "aarch64", target_feature = "crc")
))]
impl KeyHash for Crc32c {
    #[inline]
    fn hash32(key: u64) -> u32 {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: this impl only exists when sse4.2 is enabled for the whole build.
        let h = unsafe { core::arch::x86_64::_mm_crc32_u64(u32::MAX as u64, key) as u32 };

        #[cfg(target_arch = "aarch64")]
        // SAFETY: this impl only exists when the crc extension is enabled for the whole build.
        let h = unsafe { core::arch::aarch64::__crc32cd(u32::MAX, key) };

        h ^ (h >> 16)
    }
}

/// The hash behind the odd selector, fixed at build time.
#[cfg(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    all(target_arch = "aarch64", target_feature = "crc")
))]
pub type OddHash = Crc32c;

/// The hash behind the odd selector, fixed at build time.
#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    all(target_arch = "aarch64", target_feature = "crc")
)))]
pub type OddHash = Jenkins;

/// Even slot in `[0, n)` for `key`. `n` must be a power of two, at least 2.
#[inline]
pub fn hash_even(n: usize, key: u64) -> usize {
    debug_assert!(n.is_power_of_two() && n >= 2);
    (Larson::hash32(key) as usize & ((n >> 1) - 1)) << 1
}

/// Odd slot in `[0, n)` for `key`. `n` must be a power of two, at least 2.
#[inline]
pub fn hash_odd(n: usize, key: u64) -> usize {
    debug_assert!(n.is_power_of_two() && n >= 2);
    1 + ((OddHash::hash32(key) as usize & ((n >> 1) - 1)) << 1)
}

/// Which of the two candidate slots to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Even,
    Odd,
}

impl Selector {
    /// Selectors in the order the eviction loop alternates through them.
    pub const ROUND: [Selector; 2] = [Selector::Even, Selector::Odd];

    #[inline]
    pub fn slot(self, n: usize, key: u64) -> usize {
        match self {
            Selector::Even => hash_even(n, key),
            Selector::Odd => hash_odd(n, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const N: usize = 1024;

    fn fnv_hash(key: u64) -> u64 {
        let mut h: u64 = 14695981039346656037;
        for b in key.to_le_bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(1099511628211);
        }
        h
    }

    // Aho, Sethi and Ullman, section 7.6.
    fn hash_quality(buckets: &[u64]) -> f64 {
        let n = buckets.len() as f64;
        let sum: f64 = buckets
            .iter()
            .map(|&b| b as f64 * (b as f64 + 1.0) / 2.0)
            .sum();
        sum / (1.5 * n - 0.5)
    }

    fn assert_quality(keys: impl Iterator<Item = u64> + Clone) {
        let mut even = vec![0u64; N];
        let mut odd = vec![0u64; N];
        for key in keys {
            even[hash_even(N << 1, key) >> 1] += 1;
            odd[hash_odd(N << 1, key) >> 1] += 1;
        }
        for buckets in [&even, &odd] {
            let quality = hash_quality(buckets);
            assert!(quality > 0.5 && quality < 1.05, "quality {quality}");
        }
    }

    #[test]
    fn test_larson_known_value() {
        assert_eq!(Larson::hash32(42), 0x1586_e837);
    }

    #[test]
    fn test_jenkins_known_value() {
        assert_eq!(Jenkins::hash32(42), 0xb299_c9ce);
    }

    #[test]
    fn test_smallest_table() {
        assert_eq!(hash_even(2, 12345), 0);
        assert_eq!(hash_odd(2, 12345), 1);
    }

    #[test]
    fn test_quality_incremental_keys() {
        assert_quality(0..N as u64);
    }

    #[test]
    fn test_quality_scattered_keys() {
        assert_quality((0..N as u64).map(|i| fnv_hash(i * 7919)));
    }

    #[test]
    fn test_candidate_pairs_rarely_collide() {
        let mut pairs = std::collections::HashMap::new();
        for key in 0..N as u64 {
            *pairs
                .entry((hash_even(N << 1, key), hash_odd(N << 1, key)))
                .or_insert(0u32) += 1;
        }
        let shared: u32 = pairs.values().map(|&c| c * (c - 1) / 2).sum();
        assert!(shared < 8, "{shared} key pairs share both candidates");
    }

    #[test]
    fn test_selector_round() {
        assert_eq!(Selector::ROUND[0].slot(64, 9), hash_even(64, 9));
        assert_eq!(Selector::ROUND[1].slot(64, 9), hash_odd(64, 9));
    }

    proptest! {
        #[test]
        fn prop_parity_and_range(key in any::<u64>(), shift in 1u32..24) {
            let n = 1usize << shift;
            let even = hash_even(n, key);
            let odd = hash_odd(n, key);
            prop_assert!(even < n && even % 2 == 0);
            prop_assert!(odd < n && odd % 2 == 1);
        }

        #[test]
        fn prop_deterministic(key in any::<u64>()) {
            prop_assert_eq!(hash_even(4096, key), hash_even(4096, key));
            prop_assert_eq!(hash_odd(4096, key), hash_odd(4096, key));
        }
    }
}
