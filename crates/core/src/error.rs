//! Error of chordsim_core

use crate::dht::Did;

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in chordsim-core.
///
/// Configuration and routing errors abort the construction of a ring. A lookup
/// that cannot find its key is not an error, see [LookupOutcome](crate::dht::LookupOutcome).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("Identifier length must be within 1..=63 bits, got {0}")]
    InvalidIdentifierBits(u32),

    #[error("Peer registry is empty")]
    EmptyRegistry,

    #[error("Peers {first:?} and {second:?} both hash to identifier {id}")]
    HashCollision {
        first: String,
        second: String,
        id: Did,
    },

    #[error("Peer {0:?} is registered twice")]
    DuplicatePeer(String),

    #[error("Peer {0:?} is not registered")]
    UnknownPeer(String),

    #[error("Peer {0:?} is not placed on the ring, build the overlay network first")]
    RingNotBuilt(String),

    #[error("Peer {0:?} has no finger table, build the finger tables first")]
    FingerTableNotBuilt(String),

    #[error("Anchor peer {0:?} is not registered")]
    AnchorNotFound(String),

    #[error("Key {0:?} is generated twice")]
    DuplicateKey(String),

    #[error("Identifier {id} is outside of a {bits} bits identifier space")]
    IdentifierOutOfRange { id: u64, bits: u32 },

    #[error("Successor walk from peer {peer:?} for start {start} did not terminate within one ring traversal")]
    RoutingAnomaly { peer: String, start: Did },

    #[error("Lookup of key {key} missed, last peer reached is {last_peer:?}")]
    LookupMiss { key: Did, last_peer: String },
}
