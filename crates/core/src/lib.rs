//! # Coinwire Core
//!
//! `coinwire-core` contains the chain-agnostic primitives used by the `coinwire` crate.
//!
//! ## Crate Layout
//!
//! ### Hashes
//!
//! The hashes module provides writers and one-shot functions for Bitcoin's double-sha2
//! (`Hash256`) and `ripemd160(sha2(x))` (`Hash160`), along with the `MarkedDigest` traits used
//! to newtype digests by purpose. E.g. a `TXID` is a marked `Hash256Digest`.
//!
//! #### ByteFormat trait
//!
//! The `ByteFormat` trait is a simple serialization API using `std::io::{Read, Write}`.
//! Implementers define the binary serialization format of the type. Little-endian integers,
//! compact integers, and prefixed vectors are available as provided methods.
//!
//! `ByteFormat` has an associated `Error` type. Most basic types can simply use the provided
//! `SerError`. More complex (de)serialization will want to implement a custom error type to
//! handle (e.g.) invalid transactions. These types must be easily instantiated from a
//! `SerError` or an `std::io::Error`.
//!
//! ### Enc
//!
//! Base58 and base58check helpers, and the 4-byte double-sha2 checksum.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

#[macro_use]
pub mod macros;

pub mod enc;
pub mod hashes;
pub mod ser;

pub use enc::{EncodingError, EncodingResult};
pub use hashes::{
    hash160, hash256, Hash160Digest, Hash160Writer, Hash256Digest, Hash256Writer, MarkedDigest,
    MarkedDigestWriter,
};
pub use ser::{ByteFormat, SerError, SerResult};

#[doc(hidden)]
pub use hex;
#[doc(hidden)]
pub use serde;
