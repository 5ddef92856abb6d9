//! Consistent hashing of names onto the identifier space.
use num_bigint::BigUint;
use sha1::Digest;
use sha1::Sha1;

use super::did::Did;
use super::space::IdentifierSpace;

/// Boxed hashing strategy accepted by [ChordProtocol](super::ChordProtocol).
pub type HasherImpl = Box<dyn ConsistentHasher + Send + Sync>;

/// Deterministic mapping from an arbitrary name to a [Did].
///
/// Implementations must be stable for the lifetime of a run and produce values
/// in `[0, 2^m)` for the space the ring is built on. Ring construction checks
/// the range and rejects anything outside it.
pub trait ConsistentHasher {
    /// Hash `name` to an identifier.
    fn hash(&self, name: &str) -> Did;
}

impl<T> ConsistentHasher for Box<T>
where T: ConsistentHasher + ?Sized
{
    fn hash(&self, name: &str) -> Did {
        (**self).hash(name)
    }
}

impl<T> ConsistentHasher for &T
where T: ConsistentHasher + ?Sized
{
    fn hash(&self, name: &str) -> Did {
        (**self).hash(name)
    }
}

/// SHA-1 of the name, read as a big endian integer and reduced modulo `2^m`.
#[derive(Debug, Clone, Copy)]
pub struct Sha1Hasher {
    space: IdentifierSpace,
}

impl Sha1Hasher {
    /// Hasher producing identifiers of `space`.
    pub fn new(space: IdentifierSpace) -> Self {
        Self { space }
    }
}

impl ConsistentHasher for Sha1Hasher {
    fn hash(&self, name: &str) -> Did {
        let mut hasher = Sha1::new();
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();
        let reduced = BigUint::from_bytes_be(&digest) % BigUint::from(self.space.modulus());
        // reduced < 2^63, at most one digit
        let value = reduced.iter_u64_digits().next().unwrap_or(0);
        Did::from(value)
    }
}
