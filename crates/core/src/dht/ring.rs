//! Overlay construction: place peers on the ring and link successors.
use super::did::Did;
use super::hasher::ConsistentHasher;
use super::peer::Peer;
use super::peer::PeerRef;
use super::registry::PeerRegistry;
use super::space::IdentifierSpace;
use crate::error::Error;
use crate::error::Result;

/// Peers sorted ascending by Did. Each peer's successor is the next one,
/// the last wraps to the first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ring {
    peers: Vec<PeerRef>,
}

impl Ring {
    /// Number of peers on the ring.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Peers in ring order, starting from the smallest Did.
    pub fn peers(&self) -> &[PeerRef] {
        &self.peers
    }

    /// The peer responsible for `key`: the first peer with `did >= key`,
    /// wrapping to the smallest Did when `key` is past the largest one.
    pub fn owner(&self, key: Did) -> Option<&PeerRef> {
        let idx = self.peers.partition_point(|p| p.did < key);
        self.peers.get(idx).or_else(|| self.peers.first())
    }
}

/// Assigns ids to every registered peer and links each one to its successor.
pub struct RingBuilder<'a, H>
where H: ConsistentHasher + ?Sized
{
    space: IdentifierSpace,
    hasher: &'a H,
}

impl<'a, H> RingBuilder<'a, H>
where H: ConsistentHasher + ?Sized
{
    pub fn new(space: IdentifierSpace, hasher: &'a H) -> Self {
        Self { space, hasher }
    }

    /// Build the overlay over `registry`.
    ///
    /// Every peer gets `id = hash(name)` and `successor = next peer by id`.
    /// Two peers hashing to the same id abort the build, no peer is dropped.
    /// Running it again on the same registry reproduces the same ring.
    pub fn build<R>(&self, registry: &mut R) -> Result<Ring>
    where R: PeerRegistry {
        if registry.is_empty() {
            return Err(Error::EmptyRegistry);
        }

        let mut peers = vec![];
        for name in registry.names() {
            let did = self.space.did(self.hasher.hash(&name).value())?;
            peers.push(PeerRef::new(did, name));
        }
        // stable, so colliding peers keep registry order in the error
        peers.sort_by_key(|p| p.did);

        if let Some(w) = peers.windows(2).find(|w| w[0].did == w[1].did) {
            tracing::error!(
                "hash collision between {} and {} at {}",
                w[0].name,
                w[1].name,
                w[0].did
            );
            return Err(Error::HashCollision {
                first: w[0].name.clone(),
                second: w[1].name.clone(),
                id: w[0].did,
            });
        }

        let n = peers.len();
        for (i, current) in peers.iter().enumerate() {
            let successor = peers[(i + 1) % n].clone();
            let peer = registry
                .by_name_mut(&current.name)
                .ok_or_else(|| Error::UnknownPeer(current.name.clone()))?;
            peer.set_id(current.did);
            tracing::debug!("link {} -> {}", current, successor);
            peer.add_neighbor(successor.clone());
            peer.set_successor(successor);
        }

        tracing::info!(
            "placed {} peers on a ring of {} bits",
            n,
            self.space.bits()
        );
        Ok(Ring { peers })
    }
}
