//! Peer state and the capability surface the topology layer implements.
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use super::did::Did;
use super::finger::FingerTable;

/// A reference to a peer placed on the ring. Peers are addressed by their
/// unique name, the Did is carried along so routing never has to resolve it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerRef {
    /// Position on the ring.
    pub did: Did,
    /// Unique name of the peer.
    pub name: String,
}

impl PeerRef {
    pub fn new(did: Did, name: impl Into<String>) -> Self {
        Self {
            did,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for PeerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.did)
    }
}

/// What the Chord engine needs from a peer.
///
/// The engine only decorates peers: it assigns the id, the successor and the
/// finger table, and records which keys a peer stores. Creating and removing
/// peers is left to the registry that owns them.
pub trait Peer {
    /// Unique name of the peer.
    fn name(&self) -> &str;
    /// Ring position, `None` until the overlay is built.
    fn id(&self) -> Option<Did>;
    fn set_id(&mut self, id: Did);
    /// The next peer clockwise, `None` until the overlay is built.
    fn successor(&self) -> Option<&PeerRef>;
    fn set_successor(&mut self, successor: PeerRef);
    /// Finger table, `None` until finger tables are built.
    fn routing_table(&self) -> Option<&FingerTable>;
    fn set_routing_table(&mut self, table: FingerTable);
    /// Record that this peer owns `key`.
    fn store(&mut self, key: Did);
    fn contains_key(&self, key: Did) -> bool;
    /// All stored keys, ascending.
    fn data(&self) -> Vec<Did>;
    /// Remember a neighbor. Adding the same neighbor twice has no effect.
    fn add_neighbor(&mut self, neighbor: PeerRef);
    fn neighbors(&self) -> &[PeerRef];
}

/// In-memory [Peer].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalPeer {
    name: String,
    id: Option<Did>,
    successor: Option<PeerRef>,
    neighbors: Vec<PeerRef>,
    finger: Option<FingerTable>,
    data: BTreeSet<Did>,
}

impl LocalPeer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Peer for LocalPeer {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<Did> {
        self.id
    }

    fn set_id(&mut self, id: Did) {
        self.id = Some(id);
    }

    fn successor(&self) -> Option<&PeerRef> {
        self.successor.as_ref()
    }

    fn set_successor(&mut self, successor: PeerRef) {
        self.successor = Some(successor);
    }

    fn routing_table(&self) -> Option<&FingerTable> {
        self.finger.as_ref()
    }

    fn set_routing_table(&mut self, table: FingerTable) {
        self.finger = Some(table);
    }

    fn store(&mut self, key: Did) {
        self.data.insert(key);
    }

    fn contains_key(&self, key: Did) -> bool {
        self.data.contains(&key)
    }

    fn data(&self) -> Vec<Did> {
        self.data.iter().copied().collect()
    }

    fn add_neighbor(&mut self, neighbor: PeerRef) {
        if !self.neighbors.contains(&neighbor) {
            self.neighbors.push(neighbor);
        }
    }

    fn neighbors(&self) -> &[PeerRef] {
        &self.neighbors
    }
}
