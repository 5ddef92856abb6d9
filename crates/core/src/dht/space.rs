//! Circular identifier space of `m` bits.
#![warn(missing_docs)]
use serde::Deserialize;
use serde::Serialize;

use super::did::BiasId;
use super::did::Did;
use crate::consts::MAX_IDENTIFIER_BITS;
use crate::error::Error;
use crate::error::Result;

/// The ring `[0, 2^m)` with modular arithmetic on [Did].
///
/// `m` is limited to [MAX_IDENTIFIER_BITS] so that the sum of two reduced
/// values never overflows a `u64`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct IdentifierSpace {
    bits: u32,
    modulus: u64,
}

impl IdentifierSpace {
    /// Create a space of `bits` bits. Rejects `0` and anything above [MAX_IDENTIFIER_BITS].
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_IDENTIFIER_BITS {
            return Err(Error::InvalidIdentifierBits(bits));
        }
        Ok(Self {
            bits,
            modulus: 1u64 << bits,
        })
    }

    /// The `m` of this space.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// `2^m`
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Reduce any integer into the space.
    pub fn wrap(&self, value: u64) -> Did {
        Did::from(value % self.modulus)
    }

    /// Checked conversion, fails if `value >= 2^m`.
    pub fn did(&self, value: u64) -> Result<Did> {
        if value >= self.modulus {
            return Err(Error::IdentifierOutOfRange {
                id: value,
                bits: self.bits,
            });
        }
        Ok(Did::from(value))
    }

    /// `(a + b) mod 2^m`
    pub fn add(&self, a: Did, b: u64) -> Did {
        let a = a.value() % self.modulus;
        let b = b % self.modulus;
        self.wrap(a + b)
    }

    /// `(a - b) mod 2^m`
    pub fn sub(&self, a: Did, b: u64) -> Did {
        let a = a.value() % self.modulus;
        let b = b % self.modulus;
        self.wrap(a + self.modulus - b)
    }

    /// `2^exp`, for `exp <= m`.
    pub fn pow2(&self, exp: u32) -> u64 {
        debug_assert!(exp <= self.bits);
        1u64 << exp
    }

    /// Clockwise distance from `from` to `to`, in `[0, 2^m)`.
    pub fn distance(&self, from: Did, to: Did) -> u64 {
        let from = from.value() % self.modulus;
        let to = to.value() % self.modulus;
        (to + self.modulus - from) % self.modulus
    }

    /// Test x <- [start, end], walking clockwise from `start`.
    /// The interval wraps past zero when `end < start`.
    pub fn in_ring_interval(&self, x: Did, start: Did, end: Did) -> bool {
        self.distance(start, x) <= self.distance(start, end)
    }

    /// Observe `did` from `origin`, see [BiasId].
    pub fn bias(&self, origin: Did, did: Did) -> BiasId {
        BiasId::new(self.modulus, origin, did)
    }
}

impl TryFrom<u32> for IdentifierSpace {
    type Error = Error;
    fn try_from(bits: u32) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<IdentifierSpace> for u32 {
    fn from(space: IdentifierSpace) -> u32 {
        space.bits
    }
}
