//! Deterministic jitter
//!
//! Offsets are derived from a hash of the node id and the configured seed, so
//! the same node lands on the same spot in every run.

use crate::core::Point;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(seed: u64, id: &str) -> u64 {
    seed.to_le_bytes()
        .iter()
        .chain(id.as_bytes())
        .fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        })
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Map 53 random bits to `[-1, 1)`
fn unit(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
}

/// Offset of at most `amount` on each axis for the node `id`
pub fn jitter(id: &str, seed: u64, amount: f64) -> Point {
    if amount <= 0.0 || !amount.is_finite() {
        return Point::ORIGIN;
    }
    let mut state = fnv1a(seed, id);
    let dx = unit(splitmix64(&mut state));
    let dy = unit(splitmix64(&mut state));
    Point::new(dx * amount, dy * amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_same_offset() {
        assert_eq!(jitter("pd-1", 0, 2.0), jitter("pd-1", 0, 2.0));
    }

    #[test]
    fn test_seed_and_id_change_offset() {
        assert_ne!(jitter("pd-1", 0, 2.0), jitter("pd-2", 0, 2.0));
        assert_ne!(jitter("pd-1", 0, 2.0), jitter("pd-1", 1, 2.0));
    }

    #[test]
    fn test_offset_is_bounded() {
        for i in 0..200 {
            let p = jitter(&format!("node-{}", i), 7, 3.0);
            assert!(p.x.abs() <= 3.0 && p.y.abs() <= 3.0);
        }
    }

    #[test]
    fn test_zero_amount_is_origin() {
        assert_eq!(jitter("pd-1", 0, 0.0), Point::ORIGIN);
        assert_eq!(jitter("pd-1", 0, f64::NAN), Point::ORIGIN);
    }
}
