//! Chordsim: a Chord DHT protocol engine, simulated in process.
//! --------------
//! - [Chord](crate::dht::Chord) places peers on a ring of `2^m` identifiers, links each one
//!   to its successor and builds finger tables over that overlay.
//! - [Resolver](crate::dht::Resolver) routes a key from a fixed anchor peer to the peer storing it.
//! - [Keys](crate::keys) are hashed onto the same ring and stored on their owner.
//!
//! # Build order
//!
//! 1. Register peers in a [PeerRegistry](crate::dht::PeerRegistry).
//! 2. `build_overlay_network` hashes every peer name and links successors.
//! 3. `build_finger_table` computes `m` fingers per peer.
//! 4. `assign_keys` stores keys on their owners, then `lookup` resolves them.
//!
//! The ring is read only once built, lookups can run concurrently.
#![doc = include_str!("../README.md")]
pub mod consts;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod keys;
#[cfg(test)]
mod tests;
