#![warn(missing_docs)]

//! This module defines the identifier of peers and keys on a Chord ring.
//!
//! A [Did] is a point of the cyclic group Z/(2^m), where `m` is chosen per
//! simulation and kept by [IdentifierSpace](super::IdentifierSpace). Since a
//! bare integer does not know its modulus, all modular arithmetic goes
//! through the space, and the Did itself only carries the reduced value.
//!
//! ## Bias
//!
//! On a ring there is no global order between two points. What can be told is
//! which of them is reached first when walking clockwise from a third point.
//! [BiasId] fixes that third point (the bias) and orders Dids by their
//! clockwise offset from it. The bias itself is placed at the end of its own
//! frame with offset `2^m`, so every other Did sorts before it. This is the
//! frame a peer uses to look for the successor of one of its finger starts.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Did is an element of the finite ring Z/(2^m).
#[derive(
    Copy, Clone, Default, Eq, Ord, PartialEq, PartialOrd, Debug, Serialize, Deserialize, Hash,
)]
#[serde(transparent)]
pub struct Did(u64);

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Did {
    fn from(v: u64) -> Did {
        Did(v)
    }
}

impl From<Did> for u64 {
    fn from(did: Did) -> u64 {
        did.0
    }
}

impl Did {
    /// Raw value of the Did.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A Did observed from a bias Did on a ring of size `modulus`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct BiasId {
    /// the zero point for determine order of Did.
    bias: Did,
    /// did data without bias.
    did: Did,
    /// size of the ring.
    modulus: u64,
    /// clockwise offset from bias, in `1..=modulus`.
    pos: u64,
}

impl BiasId {
    /// Wrap a Did into BiasId with given bias on a ring of size `modulus`.
    pub fn new(modulus: u64, bias: Did, did: Did) -> BiasId {
        let offset = (did.0 % modulus + modulus - bias.0 % modulus) % modulus;
        let pos = if offset == 0 { modulus } else { offset };
        BiasId {
            bias,
            did,
            modulus,
            pos,
        }
    }

    /// Get the Did back out of the rotated frame.
    pub fn to_did(self) -> Did {
        self.did
    }

    /// Get the bias of this id.
    pub fn bias(&self) -> Did {
        self.bias
    }

    /// Clockwise offset from the bias. The bias itself is at `modulus`.
    pub fn pos(&self) -> u64 {
        self.pos
    }
}

impl PartialOrd for BiasId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BiasId {
    fn cmp(&self, other: &Self) -> Ordering {
        if other.bias != self.bias || other.modulus != self.modulus {
            let bid = BiasId::new(self.modulus, self.bias, other.did);
            self.pos.cmp(&bid.pos)
        } else {
            self.pos.cmp(&other.pos)
        }
    }
}

impl PartialEq<Did> for BiasId {
    fn eq(&self, rhs: &Did) -> bool {
        self.did == *rhs
    }
}

impl From<BiasId> for Did {
    fn from(id: BiasId) -> Did {
        id.to_did()
    }
}
