//! Chord protocol engine.
#![warn(missing_docs)]
use super::did::Did;
use super::finger::FingerTableBuilder;
use super::hasher::HasherImpl;
use super::hasher::Sha1Hasher;
use super::lookup::LookupOutcome;
use super::lookup::Resolver;
use super::peer::Peer;
use super::peer::PeerRef;
use super::registry::MemRegistry;
use super::registry::PeerRegistry;
use super::ring::Ring;
use super::ring::RingBuilder;
use super::space::IdentifierSpace;
use super::types::Chord;
use super::types::ChordStorage;
use crate::error::Error;
use crate::error::Result;
use crate::keys;
use crate::keys::Key;
use crate::keys::KeyAssignment;
use crate::keys::KeyIndexes;

/// ChordProtocol owns a peer network and runs the [Chord] algorithm on it.
/// ChordProtocol implemented [ChordStorage] protocol.
///
/// The hashing strategy is injected, so tests can place peers at fixed ids.
pub struct ChordProtocol<R = MemRegistry>
where R: PeerRegistry
{
    space: IdentifierSpace,
    hasher: HasherImpl,
    network: R,
    ring: Option<Ring>,
    keys: KeyIndexes,
    assignments: Vec<KeyAssignment>,
    anchor: Option<String>,
}

impl<R> ChordProtocol<R>
where R: PeerRegistry
{
    /// Protocol over an `m` bits ring, hashing names with SHA-1.
    pub fn new(bits: u32, network: R) -> Result<Self> {
        let space = IdentifierSpace::new(bits)?;
        Ok(Self::new_with_hasher(
            space,
            Box::new(Sha1Hasher::new(space)),
            network,
        ))
    }

    /// Same as new, but with a given hashing strategy.
    pub fn new_with_hasher(space: IdentifierSpace, hasher: HasherImpl, network: R) -> Self {
        Self {
            space,
            hasher,
            network,
            ring: None,
            keys: KeyIndexes::new(),
            assignments: vec![],
            anchor: None,
        }
    }

    /// The identifier space of the ring.
    pub fn space(&self) -> IdentifierSpace {
        self.space
    }

    /// The peer network.
    pub fn network(&self) -> &R {
        &self.network
    }

    /// Mutable access to the peer network. Changes made after building are
    /// not checked, rebuild the overlay and finger tables to account for them.
    pub fn network_mut(&mut self) -> &mut R {
        &mut self.network
    }

    /// The ring, once the overlay is built.
    pub fn ring(&self) -> Option<&Ring> {
        self.ring.as_ref()
    }

    /// Use the peer `name` as anchor for every lookup.
    pub fn set_anchor(&mut self, name: &str) -> Result<()> {
        if self.network.by_name(name).is_none() {
            return Err(Error::AnchorNotFound(name.to_string()));
        }
        self.anchor = Some(name.to_string());
        Ok(())
    }

    /// The anchor peer: the configured one, or the first registered peer.
    pub fn anchor(&self) -> Result<String> {
        match &self.anchor {
            Some(name) => Ok(name.clone()),
            None => self
                .network
                .all()
                .first()
                .map(|(name, _)| name.to_string())
                .ok_or(Error::EmptyRegistry),
        }
    }

    /// Build the overlay network and the finger tables.
    pub fn build(&mut self) -> Result<()> {
        self.build_overlay_network()?;
        self.build_finger_table()
    }

    /// Generate `count` keys named `{prefix}i` and keep them as the known keys.
    pub fn generate_keys(&mut self, prefix: &str, count: usize) -> Result<&KeyIndexes> {
        self.keys = KeyIndexes::generate(&self.space, &self.hasher, prefix, count)?;
        Ok(&self.keys)
    }

    /// Known keys.
    pub fn keys(&self) -> &KeyIndexes {
        &self.keys
    }

    /// Owners of the keys, after [ChordStorage::assign_keys].
    pub fn assignments(&self) -> &[KeyAssignment] {
        &self.assignments
    }

    /// The peer responsible for `key`.
    pub fn find_owner(&self, key: Did) -> Result<&PeerRef> {
        self.built_ring()?.owner(key).ok_or(Error::EmptyRegistry)
    }

    /// A resolver starting from the anchor peer.
    pub fn resolver(&self) -> Result<Resolver<'_, R>> {
        Resolver::new(self.space, &self.network, &self.anchor()?)
    }

    /// Look up every known key, in key order. A miss does not stop the others.
    pub fn lookup_all(&self) -> Result<Vec<(Key, LookupOutcome)>> {
        let resolver = self.resolver()?;
        self.keys
            .iter()
            .map(|key| Ok((key.clone(), resolver.lookup(key.index)?)))
            .collect()
    }

    /// Follow successor links from the first registered peer back to itself.
    /// The first peer is repeated at the end.
    pub fn ring_walk(&self) -> Result<Vec<PeerRef>> {
        let (head_name, head) = self
            .network
            .all()
            .into_iter()
            .next()
            .ok_or(Error::EmptyRegistry)?;
        let head_id = head
            .id()
            .ok_or_else(|| Error::RingNotBuilt(head_name.to_string()))?;
        let head = PeerRef::new(head_id, head_name);

        let mut walk = vec![head.clone()];
        let mut current = head.clone();
        for _ in 0..self.network.size() {
            let next = self
                .network
                .by_name(&current.name)
                .and_then(|p| p.successor())
                .ok_or_else(|| Error::RoutingAnomaly {
                    peer: current.name.clone(),
                    start: head.did,
                })?
                .clone();
            walk.push(next.clone());
            if next.name == head.name {
                return Ok(walk);
            }
            current = next;
        }
        Err(Error::RoutingAnomaly {
            peer: head.name,
            start: head.did,
        })
    }

    fn built_ring(&self) -> Result<&Ring> {
        match &self.ring {
            Some(ring) => Ok(ring),
            None => Err(Error::RingNotBuilt(self.anchor()?)),
        }
    }
}

impl<R> Chord for ChordProtocol<R>
where R: PeerRegistry
{
    fn build_overlay_network(&mut self) -> Result<()> {
        let ring = RingBuilder::new(self.space, &self.hasher).build(&mut self.network)?;
        self.ring = Some(ring);
        Ok(())
    }

    fn build_finger_table(&mut self) -> Result<()> {
        FingerTableBuilder::new(self.space).build(&mut self.network)
    }

    fn lookup(&self, key: Did) -> Result<LookupOutcome> {
        self.resolver()?.lookup(key)
    }
}

impl<R> ChordStorage for ChordProtocol<R>
where R: PeerRegistry
{
    fn set_keys(&mut self, keys: KeyIndexes) {
        self.keys = keys;
    }

    fn assign_keys(&mut self) -> Result<&[KeyAssignment]> {
        let ring = match &self.ring {
            Some(ring) => ring,
            None => return Err(Error::RingNotBuilt(self.anchor()?)),
        };
        self.assignments = keys::assign_keys(ring, &mut self.network, &self.keys)?;
        Ok(&self.assignments)
    }

    fn check_response(&self, key: Did, peer_name: &str) -> bool {
        self.network
            .by_name(peer_name)
            .map(|p| p.contains_key(key))
            .unwrap_or(false)
    }
}
