//! Serializable snapshots of a built ring.
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::dht::ChordProtocol;
use crate::dht::Peer;
use crate::dht::PeerRegistry;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordInspect {
    pub bits: u32,
    /// Successor walk from the first registered peer, back to it.
    pub ring: Vec<String>,
    pub peers: Vec<PeerInspect>,
    pub keys: Vec<KeyInspect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInspect {
    pub name: String,
    pub did: Option<u64>,
    #[serde(default)]
    pub successor: Option<String>,
    pub neighbors: Vec<String>,
    pub finger_table: Vec<FingerInspect>,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerInspect {
    pub start: u64,
    pub interval_end: u64,
    pub successor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInspect {
    pub name: String,
    pub index: u64,
    #[serde(default)]
    pub owner: Option<String>,
}

impl ChordInspect {
    /// Snapshot `chord`. The overlay must be built.
    pub fn inspect<R>(chord: &ChordProtocol<R>) -> Result<Self>
    where R: PeerRegistry {
        let ring = chord.ring_walk()?.into_iter().map(|p| p.name).collect();
        let peers = chord
            .network()
            .all()
            .into_iter()
            .map(|(_, peer)| PeerInspect::inspect(peer))
            .collect();
        let keys = chord
            .keys()
            .iter()
            .map(|key| KeyInspect {
                name: key.name.clone(),
                index: key.index.value(),
                owner: chord
                    .assignments()
                    .iter()
                    .find(|a| a.key.name == key.name)
                    .map(|a| a.owner.name.clone()),
            })
            .collect();
        Ok(Self {
            bits: chord.space().bits(),
            ring,
            peers,
            keys,
        })
    }

    /// Render the ring as `a --- b --- ... --- a`.
    pub fn ring_line(&self) -> String {
        self.ring.join(" --- ")
    }
}

impl PeerInspect {
    pub fn inspect<P>(peer: &P) -> Self
    where P: Peer {
        let finger_table = peer
            .routing_table()
            .map(|table| {
                table
                    .list()
                    .iter()
                    .map(|e| FingerInspect {
                        start: e.start.value(),
                        interval_end: e.interval_end.value(),
                        successor: e.successor.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: peer.name().to_string(),
            did: peer.id().map(|id| id.value()),
            successor: peer.successor().map(|s| s.name.clone()),
            neighbors: peer.neighbors().iter().map(|n| n.name.clone()).collect(),
            finger_table,
            data: peer.data().into_iter().map(|d| d.value()).collect(),
        }
    }

    /// Finger entries grouped by successor, as `(successor, first, last)` index runs.
    pub fn finger_runs(&self) -> Vec<(&str, u64, u64)> {
        compress_iter(self.finger_table.iter().map(|f| f.successor.as_str()))
    }
}

impl fmt::Display for PeerInspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.did {
            Some(did) => writeln!(f, "{} ({})", self.name, did)?,
            None => writeln!(f, "{} (not placed)", self.name)?,
        }
        if let Some(successor) = &self.successor {
            writeln!(f, "  successor: {}", successor)?;
        }
        for (i, finger) in self.finger_table.iter().enumerate() {
            writeln!(
                f,
                "  finger {}: [{}, {}] -> {}",
                i + 1,
                finger.start,
                finger.interval_end,
                finger.successor
            )?;
        }
        if !self.finger_table.is_empty() {
            let runs: Vec<String> = self
                .finger_runs()
                .into_iter()
                .map(|(successor, first, last)| match first == last {
                    true => format!("{} [{}]", successor, first + 1),
                    false => format!("{} [{}-{}]", successor, first + 1, last + 1),
                })
                .collect();
            writeln!(f, "  routes: {}", runs.join(", "))?;
        }
        let data: Vec<String> = self.data.iter().map(|d| d.to_string()).collect();
        write!(f, "  data: [{}]", data.join(", "))
    }
}

impl fmt::Display for ChordInspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ring ({} bits): {}", self.bits, self.ring_line())?;
        for peer in &self.peers {
            writeln!(f, "{}", peer)?;
        }
        Ok(())
    }
}

/// Collapse consecutive equal items into `(item, first index, last index)`.
pub fn compress_iter<T>(iter: impl Iterator<Item = T>) -> Vec<(T, u64, u64)>
where T: PartialEq {
    let mut result: Vec<(T, u64, u64)> = vec![];
    for (i, x) in iter.enumerate() {
        let i = i as u64;
        if let Some((p, _, end)) = result.last_mut() {
            if *p == x {
                *end = i;
                continue;
            }
        }
        result.push((x, i, i));
    }
    result
}
