use std::io::Write;

use crate::ser::ByteFormat;

/// A `MarkedDigest` is a newtype wrapping a digest. It exists so that a TXID cannot be passed
/// where a sighash digest is expected, even though both are 32 bytes of double-sha2 output.
pub trait MarkedDigest: Default + Copy + Eq + ByteFormat {
    /// The underlying digest type
    type Digest;

    /// Wrap a digest in the marker
    fn new(hash: Self::Digest) -> Self;

    /// Return a copy of the underlying digest
    fn internal(&self) -> Self::Digest;

    /// Return the digest as a byte vector
    fn bytes(&self) -> Vec<u8>;

    /// Return a copy of the digest with its byte order reversed. Block explorers and RPC
    /// interfaces display digests big-endian.
    fn reversed(&self) -> Self;
}

/// A `MarkedDigestWriter` is a `Write` that produces a digest once all data has been written.
pub trait MarkedDigestWriter<T>: Default + Write {
    /// Consume the writer and produce the digest
    fn finish(self) -> T;

    /// Consume the writer and produce the digest wrapped in a marker
    fn finish_marked<M: MarkedDigest<Digest = T>>(self) -> M {
        MarkedDigest::new(self.finish())
    }
}
