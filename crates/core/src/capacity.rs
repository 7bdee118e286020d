//! Bucket capacity policy.

use crate::result::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Width of one cache line in bits, the default bucket capacity.
///
/// Member widths are measured in bits, so the default groups members into
/// 64-bit chunks. Targets with a different effective line size override it
/// through [`Capacity::new`].
pub const DEFAULT_CACHE_LINE_BITS: u64 = 64;

/// Capacity of a general bucket, in bits. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Capacity(NonZeroU64);

impl Capacity {
    pub fn new(bits: u64) -> Result<Self> {
        NonZeroU64::new(bits).map(Self).ok_or(Error::ZeroCapacity)
    }

    #[inline]
    pub fn bits(self) -> u64 {
        self.0.get()
    }
}

const DEFAULT: NonZeroU64 = match NonZeroU64::new(DEFAULT_CACHE_LINE_BITS) {
    Some(bits) => bits,
    None => panic!("default cache line must be non-zero"),
};

impl Default for Capacity {
    fn default() -> Self {
        Self(DEFAULT)
    }
}

impl TryFrom<u64> for Capacity {
    type Error = Error;

    fn try_from(bits: u64) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<Capacity> for u64 {
    fn from(capacity: Capacity) -> Self {
        capacity.bits()
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.bits())
    }
}
