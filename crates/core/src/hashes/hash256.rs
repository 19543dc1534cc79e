use digest::Digest;
use sha2::Sha256;
use std::io::{Result as IOResult, Write};

use crate::hashes::marked::MarkedDigestWriter;

/// The output of Bitcoin's double-sha2
pub type Hash256Digest = [u8; 32];

/// Streams bytes into a double-sha2. Encoders write into it directly, so a transaction can be
/// hashed without first being collected into a buffer.
///
/// ```
/// use std::io::Write;
/// use coinwire_core::hashes::{Hash256Writer, MarkedDigestWriter};
///
/// let mut w = Hash256Writer::default();
/// w.write_all(b"").unwrap();
/// assert_eq!(
///     hex::encode(w.finish()),
///     "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456",
/// );
/// ```
#[derive(Default, Clone)]
pub struct Hash256Writer {
    internal: Sha256,
}

impl Write for Hash256Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl MarkedDigestWriter<Hash256Digest> for Hash256Writer {
    fn finish(self) -> Hash256Digest {
        let first = self.internal.finalize();
        let second = Sha256::digest(first);
        let mut digest = Hash256Digest::default();
        digest[..].copy_from_slice(&second[..]);
        digest
    }
}

/// Bitcoin's double-sha2 of `preimage`
pub fn hash256(preimage: &[u8]) -> Hash256Digest {
    let mut w = Hash256Writer::default();
    w.internal.update(preimage);
    w.finish()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_hashes_a_single_zero_byte() {
        let mut w = Hash256Writer::default();
        w.write_all(&[0]).unwrap();
        w.flush().unwrap();
        let expected = "1406e05881e299367766d313e26c05564ec91bf721d31726bd6e46e60689539a";
        assert_eq!(hex::encode(w.finish()), expected);
        assert_eq!(hex::encode(hash256(&[0])), expected);
    }

    #[test]
    fn it_matches_the_one_shot_function() {
        let mut w = Hash256Writer::default();
        w.write_all(&[0xde, 0xad]).unwrap();
        w.write_all(&[0xbe, 0xef]).unwrap();
        assert_eq!(w.finish(), hash256(&[0xde, 0xad, 0xbe, 0xef]));
    }
}
