// Seed generator: a short digits-only token handed to the randomizer.

use rand::Rng;

/// Number of characters in a generated seed.
pub const SEED_LENGTH: usize = 6;

const SEED_ALPHABET: &[u8] = b"0123456789";

/// Generate a fresh seed using the thread-local RNG. No uniqueness across
/// runs is attempted; the server is the one validating the format.
pub fn generate_seed() -> String {
    let mut rng = rand::rng();
    (0..SEED_LENGTH)
        .map(|_| SEED_ALPHABET[rng.random_range(0..SEED_ALPHABET.len())] as char)
        .collect()
}
