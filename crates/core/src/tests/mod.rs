use std::collections::HashMap;
use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::dht::Chord;
use crate::dht::ChordProtocol;
use crate::dht::ConsistentHasher;
use crate::dht::Did;
use crate::dht::IdentifierSpace;
use crate::dht::MemRegistry;

mod default;

/// Hasher returning preset ids, so tests can lay out a ring by hand.
#[derive(Debug, Clone, Default)]
pub struct FixedHasher {
    ids: HashMap<String, u64>,
}

impl FixedHasher {
    pub fn new<'a, I>(ids: I) -> Self
    where I: IntoIterator<Item = (&'a str, u64)> {
        Self {
            ids: ids.into_iter().map(|(n, id)| (n.to_string(), id)).collect(),
        }
    }
}

impl ConsistentHasher for FixedHasher {
    fn hash(&self, name: &str) -> Did {
        match self.ids.get(name) {
            Some(id) => Did::from(*id),
            None => panic!("no fixed id for {:?}", name),
        }
    }
}

/// Registry of `peers` in the given order, with the overlay and finger tables built.
pub fn gen_ring(bits: u32, peers: &[(&str, u64)]) -> (IdentifierSpace, MemRegistry) {
    let mut chord = gen_protocol(bits, peers);
    chord.build_overlay_network().unwrap();
    chord.build_finger_table().unwrap();
    let space = chord.space();
    (space, chord.network().clone())
}

/// Unbuilt protocol over `peers`, hashed with a [FixedHasher].
pub fn gen_protocol(bits: u32, peers: &[(&str, u64)]) -> ChordProtocol {
    let space = IdentifierSpace::new(bits).unwrap();
    let hasher = FixedHasher::new(peers.iter().copied());
    let network = MemRegistry::with_names(peers.iter().map(|(n, _)| *n)).unwrap();
    ChordProtocol::new_with_hasher(space, Box::new(hasher), network)
}

/// `n` distinct ids of a `bits` wide space, in random order.
pub fn gen_distinct_ids(rng: &mut StdRng, bits: u32, n: usize) -> Vec<u64> {
    let modulus = 1u64 << bits;
    assert!(n as u64 <= modulus, "{} ids do not fit {} bits", n, bits);
    let mut seen = HashSet::new();
    let mut ids = vec![];
    while ids.len() < n {
        let id = rng.gen_range(0..modulus);
        if seen.insert(id) {
            ids.push(id);
        }
    }
    ids
}

/// Built protocol with `n` peers `Node 1..=n` at random distinct ids.
pub fn gen_random_protocol(seed: u64, bits: u32, n: usize) -> ChordProtocol {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (1..=n).map(|i| format!("Node {}", i)).collect();
    let ids = gen_distinct_ids(&mut rng, bits, n);
    let peers: Vec<(&str, u64)> = names.iter().map(|s| s.as_str()).zip(ids).collect();
    let mut chord = gen_protocol(bits, &peers);
    chord.build().unwrap();
    chord
}
