//! Name keyed peer registry.
use std::collections::HashMap;

use super::peer::LocalPeer;
use super::peer::Peer;
use crate::error::Error;
use crate::error::Result;

/// The topology the Chord engine works on.
///
/// The engine never inserts or removes peers, it only looks them up and
/// decorates them through [Peer].
pub trait PeerRegistry {
    /// Concrete peer type.
    type Peer: Peer;

    /// Get a peer by its unique name.
    fn by_name(&self, name: &str) -> Option<&Self::Peer>;

    /// Get a mutable peer by its unique name.
    fn by_name_mut(&mut self, name: &str) -> Option<&mut Self::Peer>;

    /// All peers in insertion order.
    fn all(&self) -> Vec<(&str, &Self::Peer)>;

    /// Number of peers.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Names in insertion order.
    fn names(&self) -> Vec<String> {
        self.all().into_iter().map(|(n, _)| n.to_string()).collect()
    }
}

/// Insertion ordered in-memory registry.
#[derive(Debug, Clone)]
pub struct MemRegistry<P = LocalPeer>
where P: Peer
{
    peers: Vec<P>,
    index: HashMap<String, usize>,
}

impl<P> Default for MemRegistry<P>
where P: Peer
{
    fn default() -> Self {
        Self {
            peers: vec![],
            index: HashMap::new(),
        }
    }
}

impl<P> MemRegistry<P>
where P: Peer
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer. Names must be unique.
    pub fn insert(&mut self, peer: P) -> Result<()> {
        let name = peer.name().to_string();
        if self.index.contains_key(&name) {
            return Err(Error::DuplicatePeer(name));
        }
        self.index.insert(name, self.peers.len());
        self.peers.push(peer);
        Ok(())
    }
}

impl MemRegistry<LocalPeer> {
    /// Registry of fresh [LocalPeer]s with the given names.
    pub fn with_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.insert(LocalPeer::new(name))?;
        }
        Ok(registry)
    }
}

impl<P> PeerRegistry for MemRegistry<P>
where P: Peer
{
    type Peer = P;

    fn by_name(&self, name: &str) -> Option<&P> {
        self.index.get(name).map(|i| &self.peers[*i])
    }

    fn by_name_mut(&mut self, name: &str) -> Option<&mut P> {
        match self.index.get(name) {
            Some(i) => self.peers.get_mut(*i),
            None => None,
        }
    }

    fn all(&self) -> Vec<(&str, &P)> {
        self.peers.iter().map(|p| (p.name(), p)).collect()
    }

    fn size(&self) -> usize {
        self.peers.len()
    }
}
