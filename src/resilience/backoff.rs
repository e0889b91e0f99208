//! Randomized pacing between wallets.

use rand::Rng;
use std::time::Duration;

/// Uniformly random whole-second delay in `[min_secs, max_secs]`.
///
/// Bounds given in the wrong order are swapped.
pub fn random_delay<R: Rng + ?Sized>(min_secs: u64, max_secs: u64, rng: &mut R) -> Duration {
    let (low, high) = if min_secs <= max_secs {
        (min_secs, max_secs)
    } else {
        (max_secs, min_secs)
    };
    Duration::from_secs(rng.gen_range(low..=high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_delay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let d = random_delay(30, 90, &mut rng);
            assert!(d >= Duration::from_secs(30) && d <= Duration::from_secs(90));
        }
    }

    #[test]
    fn test_degenerate_and_swapped_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_delay(5, 5, &mut rng), Duration::from_secs(5));
        assert_eq!(random_delay(0, 0, &mut rng), Duration::ZERO);

        let d = random_delay(10, 2, &mut rng);
        assert!(d >= Duration::from_secs(2) && d <= Duration::from_secs(10));
    }
}
