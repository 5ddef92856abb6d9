//! DHT traits about building the overlay and placing data on it.
#![warn(missing_docs)]
use super::did::Did;
use super::lookup::LookupOutcome;
use crate::error::Result;
use crate::keys::KeyAssignment;
use crate::keys::KeyIndexes;

/// Chord is a distributed hash table (DHT) algorithm that is designed to efficiently
/// distribute data across peer-to-peer network nodes. You may want to browse its
/// [wiki](https://en.wikipedia.org/wiki/Chord_(peer-to-peer)) before you read this.
///
/// Peers are hashed onto a ring of `2^m` ids and linked to their clockwise
/// successor. Each peer then gets a finger table of `m` shortcuts, the `i`th
/// pointing to the first peer at or after `n + 2^(i-1)`. A lookup follows the
/// fingers from a fixed anchor and takes O(log n) hops with high probability.
///
/// The operations are meant to be called in order: overlay first, then
/// finger tables, then lookups. The built structure is read only afterwards.
pub trait Chord {
    /// Hash every peer onto the ring and link it to its successor.
    fn build_overlay_network(&mut self) -> Result<()>;

    /// Build the finger table of every peer. Requires the overlay.
    fn build_finger_table(&mut self) -> Result<()>;

    /// Resolve the peer storing `key`, starting from the anchor peer.
    fn lookup(&self, key: Did) -> Result<LookupOutcome>;
}

/// ChordStorage places data keys on the peers of a built ring.
///
/// A key is owned by the first peer whose id is at or after the key index,
/// wrapping to the smallest id. Each key is stored on exactly one peer.
pub trait ChordStorage: Chord {
    /// Replace the keys known to the protocol.
    fn set_keys(&mut self, keys: KeyIndexes);

    /// Store every known key on its owner.
    fn assign_keys(&mut self) -> Result<&[KeyAssignment]>;

    /// Check that the peer `peer_name` stores `key`.
    fn check_response(&self, key: Did, peer_name: &str) -> bool;
}
