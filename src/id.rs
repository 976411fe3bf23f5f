//! Collision-resistant identifier generation.
//!
//! The backing store is keyed by client-chosen IDs, so there is no central
//! auto-increment authority to hand them out. IDs are built from the current
//! time with a random component in the low-order bits.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::models::DatabaseID;

/// The number of low-order bits reserved for the random component.
const RANDOM_BITS: u32 = 20;

/// Produces collision-resistant numeric identifiers for new records.
///
/// Each ID is the epoch-millisecond timestamp shifted left by [RANDOM_BITS],
/// OR'd with a random value occupying those reserved bits. Two calls within
/// the same millisecond collide with probability `1 / 2^20`. Global
/// uniqueness is probabilistic, not guaranteed: callers that need a hard
/// guarantee must verify non-existence in the store before committing and
/// retry generation on collision, as [Authenticator](crate::Authenticator)
/// does for new user IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh identifier.
    pub fn generate(&self) -> DatabaseID {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the unix epoch")
            .as_millis() as i64;
        let random = rand::rng().random_range(0..(1i64 << RANDOM_BITS));

        (millis << RANDOM_BITS) | random
    }
}

#[cfg(test)]
mod id_generator_tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{IdGenerator, RANDOM_BITS};

    #[test]
    fn generated_ids_are_positive() {
        let generator = IdGenerator::new();

        assert!(generator.generate() > 0);
    }

    #[test]
    fn generated_ids_embed_the_current_timestamp() {
        let generator = IdGenerator::new();

        let id = generator.generate();
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;

        let embedded = id >> RANDOM_BITS;
        assert!(
            (millis - embedded).abs() < 1_000,
            "want timestamp component near {millis}, got {embedded}"
        );
    }

    #[test]
    fn generated_ids_increase_across_milliseconds() {
        let generator = IdGenerator::new();

        let first = generator.generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = generator.generate();

        assert!(second > first);
    }
}
