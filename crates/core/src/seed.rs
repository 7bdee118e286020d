use crate::result::Error;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

const RNG_DOMAIN: &[u8] = b"SHROUD_LAYOUT_RANDOMIZATION";

/// A 256-bit layout randomization seed
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// The 256-bit seed
    inner: [u8; 32],
}

impl Seed {
    /// Generate a new random 256-bit seed
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        Self { inner: seed }
    }

    /// Create from hex string (with or without 0x prefix)
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.len() != 64 {
            return Err(Error::InvalidSeedLength(hex.len()));
        }

        let bytes = hex::decode(hex).map_err(|_| Error::InvalidSeedHex)?;
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes);
        Ok(Self { inner: seed })
    }

    /// Create from an arbitrary text phrase, the way a build passes a
    /// `-frandomize-layout-seed=<string>` style value.
    ///
    /// Any string is accepted; it is hashed down to 256 bits.
    pub fn from_phrase(phrase: &str) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(phrase.as_bytes());
        Self {
            inner: hasher.finalize().into(),
        }
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner))
    }

    /// Create a deterministic RNG for layout randomization.
    /// The same seed always produces the same member order.
    pub fn create_deterministic_rng(&self) -> StdRng {
        self.derive_rng(&[])
    }

    /// Create a deterministic RNG bound to `label` (usually a record name).
    ///
    /// Records of one translation unit draw from independent streams, so
    /// adding or removing a record never perturbs the layout of the others.
    pub fn derive_rng(&self, label: &[u8]) -> StdRng {
        let mut hasher = Sha3_256::new();
        hasher.update(RNG_DOMAIN);
        hasher.update(self.inner);
        hasher.update(label);
        let seed_hash: [u8; 32] = hasher.finalize().into();

        StdRng::from_seed(seed_hash)
    }

    /// Get a hash of this seed for integrity/identification purposes
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(self.inner);
        hasher.finalize().into()
    }

    /// Get the hash as hex string
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash()))
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Seed").field(&self.hash_hex()).finish()
    }
}
