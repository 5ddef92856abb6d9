#![warn(missing_docs)]
//! Simulated Chord DHT,
//! ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>
//! With high probability, the number of nodes that must be contacted to find a successor in an N-node network is O(log N).

mod chord;
pub mod did;
/// Finger table and its construction
pub mod finger;
pub mod hasher;
/// Lookup over finger tables
pub mod lookup;
pub mod peer;
pub mod registry;
pub mod ring;
pub mod space;
pub mod types;

pub use chord::ChordProtocol;
pub use did::BiasId;
pub use did::Did;
pub use finger::FingerEntry;
pub use finger::FingerTable;
pub use finger::FingerTableBuilder;
pub use hasher::ConsistentHasher;
pub use hasher::HasherImpl;
pub use hasher::Sha1Hasher;
pub use lookup::LookupMiss;
pub use lookup::LookupOutcome;
pub use lookup::LookupResult;
pub use lookup::MissReason;
pub use lookup::Resolver;
pub use peer::LocalPeer;
pub use peer::Peer;
pub use peer::PeerRef;
pub use registry::MemRegistry;
pub use registry::PeerRegistry;
pub use ring::Ring;
pub use ring::RingBuilder;
pub use space::IdentifierSpace;
pub use types::Chord;
pub use types::ChordStorage;
