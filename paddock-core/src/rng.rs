//! Seeded randomness for the comparison layer.
//!
//! The wisdom RNG is the only generator the core owns; everything else lives
//! inside the engine's streams. Seeds are domain-separated from the
//! user-visible seed so unrelated draws never correlate.

use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::engine::PairRng;

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Dedicated generator for wisdom-check seed pairs.
#[derive(Debug, Clone)]
pub struct WisdomRng {
    rng: ChaCha20Rng,
}

impl WisdomRng {
    /// Construct from the user-visible comparison seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"wisdom")),
        }
    }
}

impl PairRng for WisdomRng {
    fn pair(&mut self) -> (u32, u32) {
        (self.rng.next_u32(), self.rng.next_u32())
    }
}
