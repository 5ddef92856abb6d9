//! Constant variables.

/// Widest identifier space, in bits. `2^63 + 2^63` still fits a `u64`.
pub const MAX_IDENTIFIER_BITS: u32 = 63;
/// Identifier length used when nothing else is configured.
pub const DEFAULT_IDENTIFIER_BITS: u32 = 16;
/// Peers are registered as `Node 1`, `Node 2`, ...
pub const DEFAULT_NODE_PREFIX: &str = "Node ";
/// Keys are generated as `key 1`, `key 2`, ...
pub const DEFAULT_KEY_PREFIX: &str = "key ";
