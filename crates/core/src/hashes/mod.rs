//! Digest writers, and the marker traits that keep same-sized digests from being mixed up.
//!
//! A TXID and a sighash are both 32 bytes. Each gets its own newtype so one cannot be passed
//! where the other is expected.

/// Marker traits for digest newtypes
pub mod marked;

/// Double-sha2
pub mod hash256;

/// Tooling for bitcoin-style ripemd160(sha2(x))
pub mod hash160;

pub use hash160::*;
pub use hash256::*;
pub use marked::*;
