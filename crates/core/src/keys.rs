//! Data keys and their placement on the ring.
use serde::Deserialize;
use serde::Serialize;

use crate::dht::ConsistentHasher;
use crate::dht::Did;
use crate::dht::IdentifierSpace;
use crate::dht::Peer;
use crate::dht::PeerRef;
use crate::dht::PeerRegistry;
use crate::dht::Ring;
use crate::error::Error;
use crate::error::Result;

/// A named data key and its index on the ring.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub name: String,
    pub index: Did,
}

/// Keys in generation order. Names are unique, indexes may repeat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyIndexes {
    keys: Vec<Key>,
}

impl KeyIndexes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate `count` keys named `{prefix}1` to `{prefix}{count}`, indexed by `hasher`.
    pub fn generate<H>(
        space: &IdentifierSpace,
        hasher: &H,
        prefix: &str,
        count: usize,
    ) -> Result<Self>
    where
        H: ConsistentHasher + ?Sized,
    {
        let mut keys = Self::new();
        for i in 1..=count {
            let name = format!("{}{}", prefix, i);
            let index = space.did(hasher.hash(&name).value())?;
            keys.insert(name, index)?;
        }
        Ok(keys)
    }

    /// Add a key. A name can only be used once.
    pub fn insert(&mut self, name: impl Into<String>, index: Did) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(Error::DuplicateKey(name));
        }
        self.keys.push(Key { name, index });
        Ok(())
    }

    /// Index of the key `name`.
    pub fn get(&self, name: &str) -> Option<Did> {
        self.keys.iter().find(|k| k.name == name).map(|k| k.index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<'a> IntoIterator for &'a KeyIndexes {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Where a key ended up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAssignment {
    pub key: Key,
    pub owner: PeerRef,
}

/// Store every key on its owner, the first peer at or after the key index.
pub fn assign_keys<R>(ring: &Ring, registry: &mut R, keys: &KeyIndexes) -> Result<Vec<KeyAssignment>>
where R: PeerRegistry {
    let mut assignments = Vec::with_capacity(keys.len());
    for key in keys {
        let owner = ring.owner(key.index).ok_or(Error::EmptyRegistry)?.clone();
        registry
            .by_name_mut(&owner.name)
            .ok_or_else(|| Error::UnknownPeer(owner.name.clone()))?
            .store(key.index);
        tracing::debug!("assign {} ({}) to {}", key.name, key.index, owner);
        assignments.push(KeyAssignment {
            key: key.clone(),
            owner,
        });
    }
    tracing::info!("assigned {} keys to {} peers", keys.len(), ring.len());
    Ok(assignments)
}
