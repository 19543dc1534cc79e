use digest::Digest;
use ripemd::Ripemd160;
use sha2::Sha256;
use std::io::{Result as IOResult, Write};

use crate::hashes::marked::MarkedDigestWriter;

/// The output of Bitcoin's ripemd160(sha2(x)). Used to commit to public keys and scripts.
pub type Hash160Digest = [u8; 20];

/// Exposes a Bitcoin-style Hash160 `Write` interface by wrapping an internal SHA2 instance.
#[derive(Default, Clone)]
pub struct Hash160Writer {
    internal: Sha256,
}

impl Write for Hash160Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl MarkedDigestWriter<Hash160Digest> for Hash160Writer {
    fn finish(self) -> Hash160Digest {
        let first = self.internal.finalize();
        let second = Ripemd160::digest(first);
        let mut digest = Hash160Digest::default();
        digest[..].copy_from_slice(&second[..]);
        digest
    }
}

/// Bitcoin's ripemd160(sha2(x)) of `preimage`
pub fn hash160(preimage: &[u8]) -> Hash160Digest {
    let mut w = Hash160Writer::default();
    w.internal.update(preimage);
    w.finish()
}
