//! Finger routed lookup.
use serde::Deserialize;
use serde::Serialize;

use super::did::Did;
use super::peer::Peer;
use super::registry::PeerRegistry;
use super::space::IdentifierSpace;
use crate::error::Error;
use crate::error::Result;

/// A lookup that reached the peer storing the key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// The key looked up.
    pub key: Did,
    /// Peers visited, in visit order, without duplicates. Starts with the anchor.
    pub visited: Vec<String>,
    /// Id of the peer storing the key.
    pub peer_id: Did,
    /// Name of the peer storing the key.
    pub peer_name: String,
}

impl LookupResult {
    /// Number of peers looked up, the anchor included.
    pub fn hop_count(&self) -> usize {
        self.visited.len()
    }
}

/// Why a lookup stopped without finding its key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissReason {
    /// The finger table routed the key back to the current peer.
    NoRoute,
    /// More hops than peers, the finger tables send the lookup in circles.
    HopLimit,
}

/// A lookup that stopped before reaching a peer storing the key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupMiss {
    pub key: Did,
    pub visited: Vec<String>,
    /// Last peer reached, the best effort answer.
    pub peer_id: Did,
    pub peer_name: String,
    pub reason: MissReason,
}

/// `Resolver` use this to describe the result of a lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupOutcome {
    /// The key is stored on the last visited peer.
    Found(LookupResult),
    /// Lookup stopped without finding the key.
    Miss(LookupMiss),
}

impl LookupOutcome {
    /// Returns `true` if the outcome is a [LookupOutcome::Found] value.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns `true` if the outcome is a [LookupOutcome::Miss] value.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss(_))
    }

    /// Visited peers, whatever the outcome.
    pub fn visited(&self) -> &[String] {
        match self {
            Self::Found(r) => &r.visited,
            Self::Miss(m) => &m.visited,
        }
    }

    /// Name of the last peer reached.
    pub fn peer_name(&self) -> &str {
        match self {
            Self::Found(r) => &r.peer_name,
            Self::Miss(m) => &m.peer_name,
        }
    }

    pub fn hop_count(&self) -> usize {
        self.visited().len()
    }

    /// Turn a miss into [Error::LookupMiss].
    pub fn into_result(self) -> Result<LookupResult> {
        match self {
            Self::Found(r) => Ok(r),
            Self::Miss(m) => Err(Error::LookupMiss {
                key: m.key,
                last_peer: m.peer_name,
            }),
        }
    }
}

/// Executes lookups from a fixed anchor peer over built finger tables.
///
/// A resolver only reads the registry, several lookups can run at once as
/// long as nobody rebuilds the ring meanwhile.
pub struct Resolver<'a, R>
where R: PeerRegistry
{
    space: IdentifierSpace,
    registry: &'a R,
    anchor: String,
}

impl<'a, R> Resolver<'a, R>
where R: PeerRegistry
{
    /// Resolver starting every lookup at the peer named `anchor`.
    pub fn new(space: IdentifierSpace, registry: &'a R, anchor: &str) -> Result<Self> {
        if registry.by_name(anchor).is_none() {
            return Err(Error::AnchorNotFound(anchor.to_string()));
        }
        Ok(Self {
            space,
            registry,
            anchor: anchor.to_string(),
        })
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Look up `key`.
    ///
    /// At each peer: stop if it stores the key, otherwise jump to the
    /// successor of the first finger whose interval covers the key. The
    /// lookup misses when the finger table points back at the current peer,
    /// or when it takes more hops than there are peers.
    pub fn lookup(&self, key: Did) -> Result<LookupOutcome> {
        let mut current = self.peer(&self.anchor)?;
        let mut visited = vec![self.anchor.clone()];
        let mut hops = 0;

        loop {
            let current_id = current
                .id()
                .ok_or_else(|| Error::RingNotBuilt(current.name().to_string()))?;

            if current.contains_key(key) {
                tracing::debug!("key {} found on {} after {:?}", key, current.name(), visited);
                return Ok(LookupOutcome::Found(LookupResult {
                    key,
                    visited,
                    peer_id: current_id,
                    peer_name: current.name().to_string(),
                }));
            }

            let table = current
                .routing_table()
                .ok_or_else(|| Error::FingerTableNotBuilt(current.name().to_string()))?;
            let next = table
                .route(&self.space, key)
                .map(|e| &e.successor)
                .filter(|s| s.name != current.name());

            let next = match next {
                Some(next) if hops < self.registry.size() => next,
                other => {
                    let reason = match other {
                        None => MissReason::NoRoute,
                        Some(_) => MissReason::HopLimit,
                    };
                    tracing::warn!(
                        "lookup of {} stopped at {} ({:?}), visited {:?}",
                        key,
                        current.name(),
                        reason,
                        visited
                    );
                    return Ok(LookupOutcome::Miss(LookupMiss {
                        key,
                        visited,
                        peer_id: current_id,
                        peer_name: current.name().to_string(),
                        reason,
                    }));
                }
            };

            tracing::debug!("lookup {}: {} -> {}", key, current.name(), next);
            current = self.peer(&next.name)?;
            if !visited.iter().any(|v| v == &next.name) {
                visited.push(next.name.clone());
            }
            hops += 1;
        }
    }

    fn peer(&self, name: &str) -> Result<&'a R::Peer> {
        self.registry
            .by_name(name)
            .ok_or_else(|| Error::UnknownPeer(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dht::finger::FingerEntry;
    use crate::dht::peer::PeerRef;
    use crate::tests::gen_ring;

    #[test]
    fn test_lookup_walks_fingers() {
        let (space, mut registry) = gen_ring(3, &[("A", 1), ("B", 3), ("C", 6)]);
        registry.by_name_mut("C").unwrap().store(Did::from(5));
        registry.by_name_mut("A").unwrap().store(Did::from(7));

        let resolver = Resolver::new(space, &registry, "B").unwrap();
        assert_eq!(resolver.anchor(), "B");

        // B: 5 is in [5, 6] -> C, C stores it
        let found = resolver.lookup(Did::from(5)).unwrap().into_result().unwrap();
        assert_eq!(found.visited, vec!["B", "C"]);
        assert_eq!(found.peer_name, "C");
        assert_eq!(found.peer_id, Did::from(6));
        assert_eq!(found.hop_count(), 2);

        // B: 7 is in [7, 3] -> A, A stores it
        let found = resolver.lookup(Did::from(7)).unwrap();
        assert!(found.is_found());
        assert_eq!(found.visited(), &["B", "A"]);
        assert_eq!(found.peer_name(), "A");
    }

    #[test]
    fn test_lookup_on_anchor() {
        let (space, mut registry) = gen_ring(3, &[("A", 1), ("B", 3), ("C", 6)]);
        registry.by_name_mut("A").unwrap().store(Did::from(0));
        let resolver = Resolver::new(space, &registry, "A").unwrap();
        let found = resolver.lookup(Did::from(0)).unwrap().into_result().unwrap();
        assert_eq!(found.visited, vec!["A"]);
        assert_eq!(found.peer_name, "A");
    }

    #[test]
    fn test_unstored_key_is_a_miss() {
        let (space, registry) = gen_ring(3, &[("A", 1), ("B", 3), ("C", 6)]);
        let resolver = Resolver::new(space, &registry, "A").unwrap();
        // A -> C (owner of 5), nobody stores 5 so C and B keep handing it over
        let outcome = resolver.lookup(Did::from(5)).unwrap();
        assert!(outcome.is_miss());
        match &outcome {
            LookupOutcome::Miss(miss) => {
                assert_eq!(miss.visited, vec!["A", "C", "B"]);
                assert_eq!(miss.peer_name, "C");
                assert_eq!(miss.reason, MissReason::HopLimit);
            }
            LookupOutcome::Found(_) => panic!("expected a miss"),
        }
        assert_eq!(
            outcome.into_result(),
            Err(Error::LookupMiss {
                key: Did::from(5),
                last_peer: "C".to_string()
            })
        );
    }

    #[test]
    fn test_no_route_on_single_peer() {
        let (space, registry) = gen_ring(3, &[("solo", 4)]);
        let resolver = Resolver::new(space, &registry, "solo").unwrap();
        match resolver.lookup(Did::from(2)).unwrap() {
            LookupOutcome::Miss(miss) => {
                assert_eq!(miss.visited, vec!["solo"]);
                assert_eq!(miss.peer_id, Did::from(4));
                assert_eq!(miss.reason, MissReason::NoRoute);
            }
            LookupOutcome::Found(_) => panic!("expected a miss"),
        }
    }

    #[test]
    fn test_cycling_fingers_hit_hop_limit() {
        let (space, mut registry) = gen_ring(3, &[("A", 1), ("B", 3), ("C", 6)]);
        registry.by_name_mut("C").unwrap().store(Did::from(5));
        // A routes 5 to B, B routes 5 back to A
        let mut a = registry.by_name("A").unwrap().routing_table().unwrap().clone();
        a.set(2, FingerEntry {
            start: Did::from(5),
            interval_end: Did::from(1),
            successor: PeerRef::new(Did::from(3), "B"),
        });
        let mut b = registry.by_name("B").unwrap().routing_table().unwrap().clone();
        b.set(1, FingerEntry {
            start: Did::from(5),
            interval_end: Did::from(6),
            successor: PeerRef::new(Did::from(1), "A"),
        });
        registry.by_name_mut("A").unwrap().set_routing_table(a);
        registry.by_name_mut("B").unwrap().set_routing_table(b);

        let resolver = Resolver::new(space, &registry, "A").unwrap();
        match resolver.lookup(Did::from(5)).unwrap() {
            LookupOutcome::Miss(miss) => {
                assert_eq!(miss.reason, MissReason::HopLimit);
                assert_eq!(miss.visited, vec!["A", "B"]);
            }
            LookupOutcome::Found(_) => panic!("expected a miss"),
        }
    }

    #[test]
    fn test_resolver_rejects_unknown_anchor() {
        let (space, registry) = gen_ring(3, &[("A", 1)]);
        assert!(matches!(
            Resolver::new(space, &registry, "Z"),
            Err(Error::AnchorNotFound(_))
        ));
    }
}
