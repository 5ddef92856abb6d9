#![warn(missing_docs)]
use std::ops::Index;

use serde::Deserialize;
use serde::Serialize;

use super::did::Did;
use super::peer::Peer;
use super::peer::PeerRef;
use super::registry::PeerRegistry;
use super::space::IdentifierSpace;
use crate::error::Error;
use crate::error::Result;

/// One routing entry: the interval `[start, interval_end]` on the ring and the
/// first peer responsible for `start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerEntry {
    /// `(n + 2^(i-1)) mod 2^m`
    pub start: Did,
    /// Last id of the interval, inclusive.
    pub interval_end: Did,
    /// First peer at or after `start`.
    pub successor: PeerRef,
}

impl FingerEntry {
    /// Test key <- [start, interval_end] with ring wraparound.
    pub fn covers(&self, space: &IdentifierSpace, key: Did) -> bool {
        space.in_ring_interval(key, self.start, self.interval_end)
    }
}

/// Finger table of Chord DHT.
/// Entry `i` (0 based) covers `[n + 2^i, n + 2^(i+1) - 1]`, the last one
/// closes the ring at `n`, so together they cover every id exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerTable {
    id: Did,
    finger: Vec<FingerEntry>,
}

impl FingerTable {
    /// builder
    pub fn new(id: Did, finger: Vec<FingerEntry>) -> Self {
        Self { id, finger }
    }

    /// Did of the owner of this table.
    pub fn id(&self) -> Did {
        self.id
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.finger.is_empty()
    }

    /// get length of finger
    pub fn len(&self) -> usize {
        self.finger.len()
    }

    /// getter
    pub fn get(&self, index: usize) -> Option<&FingerEntry> {
        self.finger.get(index)
    }

    /// setter, out of range indexes are ignored
    pub fn set(&mut self, index: usize, entry: FingerEntry) {
        if let Some(slot) = self.finger.get_mut(index) {
            *slot = entry;
        }
    }

    /// get finger list
    pub fn list(&self) -> &[FingerEntry] {
        &self.finger
    }

    /// First entry, in index order, whose interval covers `key`.
    pub fn route(&self, space: &IdentifierSpace, key: Did) -> Option<&FingerEntry> {
        self.finger.iter().find(|e| e.covers(space, key))
    }
}

impl Index<usize> for FingerTable {
    type Output = FingerEntry;
    fn index(&self, index: usize) -> &Self::Output {
        &self.finger[index]
    }
}

/// Builds finger tables over an already linked ring.
pub struct FingerTableBuilder {
    space: IdentifierSpace,
}

impl FingerTableBuilder {
    /// Builder for tables of `space.bits()` entries.
    pub fn new(space: IdentifierSpace) -> Self {
        Self { space }
    }

    /// Build and install the finger table of every registered peer.
    pub fn build<R>(&self, registry: &mut R) -> Result<()>
    where R: PeerRegistry {
        for name in registry.names() {
            let table = self.build_for(registry, &name)?;
            registry
                .by_name_mut(&name)
                .ok_or_else(|| Error::UnknownPeer(name.clone()))?
                .set_routing_table(table);
        }
        tracing::info!(
            "built {} finger tables of {} entries",
            registry.size(),
            self.space.bits()
        );
        Ok(())
    }

    /// Compute the finger table of the peer `name`. Only reads the ring.
    pub fn build_for<R>(&self, registry: &R, name: &str) -> Result<FingerTable>
    where R: PeerRegistry {
        let peer = registry
            .by_name(name)
            .ok_or_else(|| Error::UnknownPeer(name.to_string()))?;
        let n = peer.id().ok_or_else(|| Error::RingNotBuilt(name.to_string()))?;
        let m = self.space.bits();

        let mut finger = Vec::with_capacity(m as usize);
        for i in 1..=m {
            let start = self.space.add(n, self.space.pow2(i - 1));
            let raw_end = self.space.add(n, self.space.pow2(i));
            let interval_end = if i == m {
                raw_end
            } else {
                self.space.sub(raw_end, 1)
            };
            let successor = self.find_successor(registry, peer, start)?;
            tracing::debug!(
                "finger {} of {}: [{}, {}] -> {}",
                i,
                name,
                start,
                interval_end,
                successor
            );
            finger.push(FingerEntry {
                start,
                interval_end,
                successor,
            });
        }
        Ok(FingerTable::new(n, finger))
    }

    /// Walk successor links from `origin` until the first peer at or after
    /// `start`, observed from `origin`. `origin` itself comes last in that
    /// frame, so a sound ring always stops within one traversal.
    fn find_successor<R>(&self, registry: &R, origin: &R::Peer, start: Did) -> Result<PeerRef>
    where R: PeerRegistry {
        let anomaly = || Error::RoutingAnomaly {
            peer: origin.name().to_string(),
            start,
        };
        let n = origin
            .id()
            .ok_or_else(|| Error::RingNotBuilt(origin.name().to_string()))?;
        let target = self.space.bias(n, start);

        let mut current = origin
            .successor()
            .ok_or_else(|| Error::RingNotBuilt(origin.name().to_string()))?;
        for _ in 0..registry.size() {
            if self.space.bias(n, current.did) >= target {
                return Ok(current.clone());
            }
            current = match registry.by_name(&current.name).and_then(|p| p.successor()) {
                Some(next) => next,
                None => {
                    tracing::error!("dangling successor link at {}", current);
                    return Err(anomaly());
                }
            };
        }
        tracing::error!(
            "successor walk from {} for {} exceeded {} steps",
            origin.name(),
            start,
            registry.size()
        );
        Err(anomaly())
    }
}
