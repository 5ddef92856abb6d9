use std::collections::HashSet;

use crate::dht::Chord;
use crate::dht::ChordProtocol;
use crate::dht::ChordStorage;
use crate::dht::Did;
use crate::dht::FingerEntry;
use crate::dht::LookupOutcome;
use crate::dht::MemRegistry;
use crate::dht::MissReason;
use crate::dht::Peer;
use crate::dht::PeerRef;
use crate::dht::PeerRegistry;
use crate::inspect::ChordInspect;
use crate::keys::KeyIndexes;
use crate::tests::gen_protocol;
use crate::tests::gen_random_protocol;

/// Every id of the space as a key named after it.
fn all_keys(chord: &ChordProtocol) -> KeyIndexes {
    let mut keys = KeyIndexes::new();
    for k in 0..chord.space().modulus() {
        keys.insert(format!("key {}", k), Did::from(k)).unwrap();
    }
    keys
}

/// (bits, peer count) pairs explored by the property tests.
fn shapes() -> Vec<(u32, usize)> {
    let mut shapes = vec![];
    for bits in 1..=8 {
        let modulus = 1usize << bits;
        for n in [1, 2, 3, 5, 8, 13, 32] {
            if n <= modulus {
                shapes.push((bits, n));
            }
        }
    }
    shapes
}

#[test]
fn test_successor_walk_closes_after_n_steps() {
    for (seed, (bits, n)) in shapes().into_iter().enumerate() {
        let chord = gen_random_protocol(seed as u64, bits, n);
        for (name, _) in chord.network().all() {
            let mut current = name.to_string();
            for step in 1..=n {
                current = chord
                    .network()
                    .by_name(&current)
                    .unwrap()
                    .successor()
                    .unwrap()
                    .name
                    .clone();
                if step < n {
                    assert_ne!(current, name, "m={} n={} returned after {} steps", bits, n, step);
                }
            }
            assert_eq!(current, name, "m={} n={}", bits, n);
        }
        assert_eq!(chord.ring_walk().unwrap().len(), n + 1);
    }
}

#[test]
fn test_finger_entries_follow_the_start_formula() {
    for (seed, (bits, n)) in shapes().into_iter().enumerate() {
        let chord = gen_random_protocol(seed as u64 + 1000, bits, n);
        let space = chord.space();
        let ring = chord.ring().unwrap();
        for (name, peer) in chord.network().all() {
            let id = peer.id().unwrap();
            let table = peer.routing_table().unwrap();
            assert_eq!(table.len(), bits as usize);
            for (i, entry) in table.list().iter().enumerate() {
                let expected = (id.value() + (1u64 << i)) % space.modulus();
                assert_eq!(entry.start, Did::from(expected), "finger {} of {}", i, name);
                assert_eq!(
                    &entry.successor,
                    ring.owner(entry.start).unwrap(),
                    "finger {} of {} in m={} n={}",
                    i,
                    name,
                    bits,
                    n
                );
            }
            assert_eq!(table.list().last().unwrap().interval_end, id);
        }
    }
}

#[test]
fn test_every_key_has_exactly_one_owner() {
    for (seed, (bits, n)) in shapes().into_iter().enumerate() {
        let chord = gen_random_protocol(seed as u64 + 2000, bits, n);
        let space = chord.space();
        let peers = chord.ring().unwrap().peers();
        for k in 0..space.modulus() {
            let key = Did::from(k);
            // peer p owns (predecessor(p), p]
            let owners: Vec<&PeerRef> = peers
                .iter()
                .enumerate()
                .filter(|(i, p)| {
                    let pred = &peers[(i + peers.len() - 1) % peers.len()];
                    space.in_ring_interval(key, space.add(pred.did, 1), p.did)
                })
                .map(|(_, p)| p)
                .collect();
            assert_eq!(owners.len(), 1, "key {} in m={} n={}", k, bits, n);
            assert_eq!(owners[0], chord.find_owner(key).unwrap());
        }
    }
}

#[test]
fn test_stored_keys_are_always_found_at_their_owner() {
    for (seed, (bits, n)) in shapes().into_iter().enumerate() {
        let mut chord = gen_random_protocol(seed as u64 + 3000, bits, n);
        let keys = all_keys(&chord);
        chord.set_keys(keys);
        chord.assign_keys().unwrap();

        for (key, outcome) in chord.lookup_all().unwrap() {
            let found = match outcome {
                LookupOutcome::Found(found) => found,
                LookupOutcome::Miss(miss) => {
                    panic!("{} missed in m={} n={}: {:?}", key.name, bits, n, miss)
                }
            };
            let owner = chord.find_owner(key.index).unwrap();
            assert_eq!(found.peer_name, owner.name);
            assert_eq!(found.peer_id, owner.did);
            assert!(chord.check_response(key.index, &found.peer_name));
            assert_eq!(found.visited[0], chord.anchor().unwrap());
            assert!(found.hop_count() <= n);
            let unique: HashSet<&String> = found.visited.iter().collect();
            assert_eq!(unique.len(), found.visited.len());
        }
    }
}

#[test]
fn test_each_key_is_stored_once() {
    let mut chord = gen_random_protocol(42, 6, 13);
    let keys = all_keys(&chord);
    chord.set_keys(keys);
    chord.assign_keys().unwrap();
    let stored: usize = chord
        .network()
        .all()
        .iter()
        .map(|(_, p)| p.data().len())
        .sum();
    assert_eq!(stored, 64);
    assert_eq!(chord.assignments().len(), 64);
}

#[test]
fn test_concrete_three_peer_ring() {
    // m = 3, peers at 1, 3, 6
    let mut chord = gen_protocol(3, &[("Node 1", 1), ("Node 2", 3), ("Node 3", 6)]);
    chord.build().unwrap();
    let mut keys = KeyIndexes::new();
    keys.insert("key 1", Did::from(5)).unwrap();
    keys.insert("key 2", Did::from(7)).unwrap();
    chord.set_keys(keys);
    chord.assign_keys().unwrap();

    let five = chord.lookup(Did::from(5)).unwrap().into_result().unwrap();
    assert_eq!(five.peer_id, Did::from(6));
    assert_eq!(five.visited, vec!["Node 1", "Node 3"]);

    let seven = chord.lookup(Did::from(7)).unwrap().into_result().unwrap();
    assert_eq!(seven.peer_id, Did::from(1));
    assert_eq!(seven.visited, vec!["Node 1"]);
}

#[test]
fn test_single_peer_answers_in_one_hop() {
    let mut chord = gen_protocol(4, &[("solo", 9)]);
    chord.build().unwrap();
    let keys = all_keys(&chord);
    chord.set_keys(keys);
    chord.assign_keys().unwrap();
    for (_, outcome) in chord.lookup_all().unwrap() {
        assert!(outcome.is_found());
        assert_eq!(outcome.visited(), &["solo"]);
        assert_eq!(outcome.hop_count(), 1);
    }
}

#[test]
fn test_self_pointing_finger_is_reported_as_a_miss() {
    let mut chord = gen_protocol(3, &[("A", 1), ("B", 3), ("C", 6)]);
    chord.build().unwrap();
    let mut keys = KeyIndexes::new();
    keys.insert("key 1", Did::from(5)).unwrap();
    keys.insert("key 2", Did::from(2)).unwrap();
    chord.set_keys(keys);
    chord.assign_keys().unwrap();

    let peer = chord.network_mut().by_name_mut("A").unwrap();
    let mut table = peer.routing_table().unwrap().clone();
    table.set(2, FingerEntry {
        start: Did::from(5),
        interval_end: Did::from(1),
        successor: PeerRef::new(Did::from(1), "A"),
    });
    peer.set_routing_table(table);

    let outcomes = chord.lookup_all().unwrap();
    match &outcomes[0].1 {
        LookupOutcome::Miss(miss) => {
            assert_eq!(miss.reason, MissReason::NoRoute);
            assert_eq!(miss.visited, vec!["A"]);
            assert_eq!(miss.peer_name, "A");
        }
        LookupOutcome::Found(found) => panic!("corrupted table found {:?}", found),
    }
    // the other key still resolves
    assert!(outcomes[1].1.is_found());
    assert_eq!(outcomes[1].1.peer_name(), "B");
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut chord = gen_random_protocol(7, 8, 32);
    let keys = all_keys(&chord);
    chord.set_keys(keys);
    chord.assign_keys().unwrap();
    let before = ChordInspect::inspect(&chord).unwrap();

    chord.build().unwrap();
    chord.assign_keys().unwrap();
    let after = ChordInspect::inspect(&chord).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_sha1_ring_end_to_end() {
    let network = MemRegistry::with_names((1..=10).map(|i| format!("Node {}", i))).unwrap();
    let mut chord = ChordProtocol::new(16, network).unwrap();
    chord.build().unwrap();
    chord.generate_keys("key ", 100).unwrap();
    chord.assign_keys().unwrap();

    let outcomes = chord.lookup_all().unwrap();
    assert_eq!(outcomes.len(), 100);
    for (key, outcome) in outcomes {
        let found = outcome.into_result().unwrap();
        assert_eq!(found.peer_name, chord.find_owner(key.index).unwrap().name);
    }
}

#[test]
fn test_concurrent_lookups_agree() {
    let mut chord = gen_random_protocol(99, 8, 32);
    let keys = all_keys(&chord);
    chord.set_keys(keys);
    chord.assign_keys().unwrap();
    let expected = chord.lookup_all().unwrap();

    let chord = &chord;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(move || chord.lookup_all().unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
