//! Contains simplified access to the `base58` encoder/decoder, and the 4-byte double-sha2
//! checksum used by base58check payloads. Also defines common encoder errors.

use thiserror::Error;

use crate::hashes::hash256;

/// The byte-length of a base58check checksum
pub const CHECKSUM_SIZE: usize = 4;

/// Errors that can be returned by address and base58 encoders.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Bubbled up from the base58 decoder
    #[error(transparent)]
    B58Error(#[from] bs58::decode::Error),

    /// The trailing checksum bytes did not match the payload
    #[error("Base58Check checksum mismatch")]
    InvalidChecksum,

    /// Decoded payload had an unexpected length
    #[error("Wrong payload length. Expected {expected} bytes, got {got}.")]
    WrongLength {
        /// The length we expected
        expected: usize,
        /// The length we got
        got: usize,
    },
}

/// Result alias for encoding operations
pub type EncodingResult<T> = Result<T, EncodingError>;

/// Compute the 4-byte checksum of `data`: the first 4 bytes of its double-sha2.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let mut result = [0u8; CHECKSUM_SIZE];
    result.copy_from_slice(&hash256(data)[..CHECKSUM_SIZE]);
    result
}

/// True if the last `CHECKSUM_SIZE` bytes of `data` are the checksum of the bytes preceding
/// them. Always false for inputs too short to carry a checksum.
pub fn verify_checksum(data: &[u8]) -> bool {
    if data.len() < CHECKSUM_SIZE {
        return false;
    }
    let (payload, check) = data.split_at(data.len() - CHECKSUM_SIZE);
    checksum(payload) == check
}

/// Append the checksum of `payload` to a copy of it.
pub fn append_checksum(payload: &[u8]) -> Vec<u8> {
    let mut data = payload.to_vec();
    data.extend_from_slice(&checksum(payload));
    data
}

/// Encode raw bytes as base58. Callers building base58check strings append the checksum first.
pub fn encode_base58(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode a base58 string to raw bytes. The checksum, if any, is left in place.
pub fn decode_base58(s: &str) -> EncodingResult<Vec<u8>> {
    Ok(bs58::decode(s).into_vec()?)
}

/// Encode a payload as base58check: base58 of the payload followed by its checksum.
pub fn encode_base58check(payload: &[u8]) -> String {
    encode_base58(&append_checksum(payload))
}

/// Decode a base58check string, verify and strip its checksum.
pub fn decode_base58check(s: &str) -> EncodingResult<Vec<u8>> {
    let mut data = decode_base58(s)?;
    if !verify_checksum(&data) {
        return Err(EncodingError::InvalidChecksum);
    }
    data.truncate(data.len() - CHECKSUM_SIZE);
    Ok(data)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_computes_checksums() {
        assert_eq!(hex::encode(checksum(&[0u8; 21])), "94a00911");
        assert!(verify_checksum(&append_checksum(&[0u8; 21])));
        assert!(!verify_checksum(&[0u8; 3]));
        assert!(!verify_checksum(&[0u8; 25]));
    }

    #[test]
    fn it_round_trips_base58check() {
        let cases = [
            (
                "1111111111111111111114oLvT2",
                "00".to_owned() + &"00".repeat(20),
            ),
            (
                "1AqE7oGF1EUoJviX1uuYrwpRBdEBTuGhES",
                "006bd80c43aab30543858c15f5ba6ffc60d4bfda61".to_owned(),
            ),
            (
                "3HXNFmJpxjgTVFN35Y9f6Waje5YFsLEQZ2",
                "05adaed320aece75ff13c81c351fb91ea6248f52be".to_owned(),
            ),
        ];
        for case in cases.iter() {
            let payload = decode_base58check(case.0).unwrap();
            assert_eq!(hex::encode(&payload), case.1);
            assert_eq!(encode_base58check(&payload), case.0);
        }
    }

    #[test]
    fn it_rejects_bad_base58check() {
        match decode_base58check("1111111111111111111114oLvT3") {
            Err(EncodingError::InvalidChecksum) => {}
            other => panic!("expected a checksum error, got {:?}", other),
        }
        match decode_base58("0OIl") {
            Err(EncodingError::B58Error(_)) => {}
            other => panic!("expected a base58 error, got {:?}", other),
        }
    }
}
