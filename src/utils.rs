// Utility functions for DotMerge Core

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::Timestamp;

/// Get current timestamp in milliseconds
pub fn now() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Create a deterministic RNG from a seed string
pub fn seeded_rng(seed: &str) -> ChaCha8Rng {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    ChaCha8Rng::seed_from_u64(hasher.finish())
}

/// RNG seeded from the platform entropy source (crypto.getRandomValues in the browser)
pub fn entropy_rng() -> ChaCha8Rng {
    ChaCha8Rng::from_entropy()
}

/// Fisher-Yates shuffle algorithm
pub fn shuffle_vec<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    let len = items.len();
    if len <= 1 {
        return;
    }

    for i in (1..len).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Format seconds as `m:ss` for the countdown display
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
