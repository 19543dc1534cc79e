//! Legacy base58check payment addresses.
//!
//! A `PaymentAddress` is a version byte and a 20-byte hash. Its 25-byte `Payment` form appends
//! a 4-byte checksum, and its text form is the base58 encoding of that payload. Addresses are
//! built by named factories. A factory that cannot produce an address returns an invalid one
//! rather than an error, so `is_valid` must be checked before trusting `version` or `hash`.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use k256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey};
use tracing::debug;

use coinwire_core::{
    enc::{append_checksum, decode_base58, encode_base58, verify_checksum, CHECKSUM_SIZE},
    hashes::{hash160, Hash160Digest},
    EncodingError, EncodingResult,
};

use crate::{
    nets::NetworkParams,
    types::script::{is_public_key, Operation, Script, ScriptType, OP_0},
};

/// The byte-length of a payment payload: version, hash, checksum.
pub const PAYMENT_SIZE: usize = 1 + 20 + CHECKSUM_SIZE;

/// The 25-byte binary form of an address.
pub type Payment = [u8; PAYMENT_SIZE];

/// A versioned 20-byte hash identifying a P2PKH or P2SH destination.
///
/// Equality and hashing consider only the version and hash. Two addresses reached by different
/// factories compare equal if they agree on both.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaymentAddress {
    valid: bool,
    version: u8,
    hash: Hash160Digest,
}

impl PaymentAddress {
    /// An invalid address, with version 0 and a zero hash.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Parse a 25-byte payload. Invalid if the checksum does not match.
    pub fn from_payment(payment: &Payment) -> Self {
        if !verify_checksum(payment) {
            return Self::invalid();
        }
        let mut hash = Hash160Digest::default();
        hash.copy_from_slice(&payment[1..21]);
        Self {
            valid: true,
            version: payment[0],
            hash,
        }
    }

    /// Parse a payload of unchecked length. Invalid unless it is exactly `PAYMENT_SIZE` bytes
    /// with a matching checksum.
    pub fn from_bytes(data: &[u8]) -> Self {
        match <&Payment>::try_from(data) {
            Ok(payment) => Self::from_payment(payment),
            Err(_) => Self::invalid(),
        }
    }

    /// Parse base58 text. Invalid if decoding fails, or the payload is malformed.
    pub fn from_string(encoded: &str) -> Self {
        encoded.parse().unwrap_or_else(|e: EncodingError| {
            debug!(error = %e, address = encoded, "rejected address text");
            Self::invalid()
        })
    }

    /// Wrap a short hash and version byte. Always valid.
    pub fn from_short_hash(hash: Hash160Digest, version: u8) -> Self {
        Self {
            valid: true,
            version,
            hash,
        }
    }

    /// The P2SH address of an arbitrary redeem script. Invalid if the script contains a
    /// truncated push.
    pub fn from_redeem_script(redeem_script: &Script, version: u8) -> Self {
        if !redeem_script.is_well_formed() {
            return Self::invalid();
        }
        Self::from_short_hash(hash160(redeem_script.items()), version)
    }

    /// The address of a public key, hashing its compressed or uncompressed SEC1 encoding.
    pub fn from_public_key(key: &PublicKey, version: u8, compressed: bool) -> Self {
        let point = key.to_encoded_point(compressed);
        Self::from_short_hash(hash160(point.as_bytes()), version)
    }

    /// The address of the public key belonging to `key`.
    pub fn from_secret_key(key: &SecretKey, version: u8, compressed: bool) -> Self {
        Self::from_public_key(&key.public_key(), version, compressed)
    }

    /// Recognize the destination of a script.
    ///
    /// Locking scripts: P2PKH and P2PK yield the key hash with `pkh_version`, and P2SH yields
    /// the script hash with `sh_version`.
    ///
    /// Unlocking scripts: `<sig> <pubkey>` yields the key's address. `OP_0 <sigs...> <redeem>`
    /// yields the P2SH address of the redeem script.
    ///
    /// Anything else is invalid.
    pub fn from_script(script: &Script, params: &NetworkParams) -> Self {
        match script.standard_type() {
            ScriptType::PKH => match script.extract_short_hash() {
                Some(hash) => Self::from_short_hash(hash, params.pkh_version),
                None => Self::invalid(),
            },
            ScriptType::SH => match script.extract_short_hash() {
                Some(hash) => Self::from_short_hash(hash, params.sh_version),
                None => Self::invalid(),
            },
            ScriptType::PK => {
                let key = &script.items()[1..script.len() - 1];
                Self::from_short_hash(hash160(key), params.pkh_version)
            }
            ScriptType::OP_RETURN => Self::invalid(),
            ScriptType::NonStandard => Self::from_unlocking_script(script, params),
        }
    }

    fn from_unlocking_script(script: &Script, params: &NetworkParams) -> Self {
        let ops = match script.ops().collect::<Result<Vec<Operation>, _>>() {
            Ok(ops) => ops,
            Err(_) => return Self::invalid(),
        };
        if ops.len() < 2 || !ops.iter().all(Operation::is_push) {
            return Self::invalid();
        }

        let last = ops[ops.len() - 1].data;
        if ops.len() == 2 && !ops[0].data.is_empty() && is_public_key(last) {
            return Self::from_short_hash(hash160(last), params.pkh_version);
        }
        if ops[0].opcode == OP_0 && !last.is_empty() {
            return Self::from_redeem_script(&Script::from(last), params.sh_version);
        }
        Self::invalid()
    }

    /// The locking script paying to this address. None if the address is invalid, or its
    /// version matches neither of the network's version bytes.
    pub fn to_script(&self, params: &NetworkParams) -> Option<Script> {
        if !self.valid {
            return None;
        }
        if self.version == params.pkh_version {
            Some(Script::p2pkh(&self.hash))
        } else if self.version == params.sh_version {
            Some(Script::p2sh(&self.hash))
        } else {
            None
        }
    }

    /// False if no factory could produce an address from its input.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The version byte
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The 20-byte hash
    pub fn hash(&self) -> &Hash160Digest {
        &self.hash
    }

    /// The 25-byte payload: version, hash, and checksum.
    pub fn payment(&self) -> Payment {
        let mut body = [0u8; PAYMENT_SIZE - CHECKSUM_SIZE];
        body[0] = self.version;
        body[1..].copy_from_slice(&self.hash);

        let mut payment = [0u8; PAYMENT_SIZE];
        payment.copy_from_slice(&append_checksum(&body));
        payment
    }

    /// The base58 text of the payload.
    pub fn encoded(&self) -> String {
        encode_base58(&self.payment())
    }
}

/// Extract the address of a script's destination on the default network. See
/// `PaymentAddress::from_script`.
pub fn extract_address(script: &Script) -> PaymentAddress {
    PaymentAddress::from_script(script, &NetworkParams::default())
}

impl PartialEq for PaymentAddress {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.hash == other.hash
    }
}

impl Eq for PaymentAddress {}

impl Hash for PaymentAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.hash.hash(state);
    }
}

impl std::fmt::Display for PaymentAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encoded())
    }
}

impl FromStr for PaymentAddress {
    type Err = EncodingError;

    fn from_str(s: &str) -> EncodingResult<Self> {
        let data = decode_base58(s)?;
        let payment = <&Payment>::try_from(data.as_slice()).map_err(|_| {
            EncodingError::WrongLength {
                expected: PAYMENT_SIZE,
                got: data.len(),
            }
        })?;
        let address = Self::from_payment(payment);
        if !address.is_valid() {
            return Err(EncodingError::InvalidChecksum);
        }
        Ok(address)
    }
}

impl serde::Serialize for PaymentAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.encoded())
    }
}

impl<'de> serde::Deserialize<'de> for PaymentAddress {
    fn deserialize<D>(deserializer: D) -> Result<PaymentAddress, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        s.parse().map_err(|e: EncodingError| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nets::{MAINNET_PKH_VERSION, MAINNET_SH_VERSION};
    use std::collections::HashSet;

    static G_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    static MULTISIG_1_OF_1: &str =
        "51210279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f8179851ae";
    static GENESIS_PK: &str = "4104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac";

    fn script(s: &str) -> Script {
        Script::new(hex::decode(s).unwrap())
    }

    fn secret_one() -> SecretKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        SecretKey::from_slice(&bytes).unwrap()
    }

    #[test]
    fn it_checksums_the_zero_hash() {
        let address = PaymentAddress::from_short_hash([0u8; 20], MAINNET_PKH_VERSION);
        let payment = address.payment();
        assert_eq!(
            hex::encode(payment),
            "00000000000000000000000000000000000000000094a00911"
        );
        assert_eq!(address.encoded(), "1111111111111111111114oLvT2");
        assert_eq!(PaymentAddress::from_payment(&payment), address);
        assert!(PaymentAddress::from_payment(&payment).is_valid());
    }

    #[test]
    fn it_rejects_any_single_byte_flip() {
        let payment = PaymentAddress::from_short_hash([0u8; 20], MAINNET_PKH_VERSION).payment();
        for i in 0..PAYMENT_SIZE {
            let mut flipped = payment;
            flipped[i] ^= 0x01;
            let address = PaymentAddress::from_payment(&flipped);
            assert!(!address.is_valid(), "{}", i);
            assert_eq!(address.hash(), &[0u8; 20]);
        }
    }

    #[test]
    fn it_parses_and_prints_text() {
        let cases = [
            (
                "1AqE7oGF1EUoJviX1uuYrwpRBdEBTuGhES",
                0x00,
                "6bd80c43aab30543858c15f5ba6ffc60d4bfda61",
            ),
            (
                "3HXNFmJpxjgTVFN35Y9f6Waje5YFsLEQZ2",
                0x05,
                "adaed320aece75ff13c81c351fb91ea6248f52be",
            ),
        ];
        for case in cases.iter() {
            let address = PaymentAddress::from_string(case.0);
            assert!(address.is_valid());
            assert_eq!(address.version(), case.1);
            assert_eq!(hex::encode(address.hash()), case.2);
            assert_eq!(address.encoded(), case.0);
            assert_eq!(address.to_string(), case.0);
            assert_eq!(case.0.parse::<PaymentAddress>().unwrap(), address);
        }
    }

    #[test]
    fn it_rejects_bad_text() {
        assert!(!PaymentAddress::from_string("1111111111111111111114oLvT3").is_valid());
        assert!(!PaymentAddress::from_string("0OIl").is_valid());
        assert!(!PaymentAddress::from_string("").is_valid());
        assert!(!PaymentAddress::from_string("1111111111111111111114oLvT").is_valid());

        match "1111111111111111111114oLvT3".parse::<PaymentAddress>() {
            Err(EncodingError::InvalidChecksum) => {}
            other => panic!("expected a checksum error, got {:?}", other),
        }
        match "11".parse::<PaymentAddress>() {
            Err(EncodingError::WrongLength { expected: 25, got: 2 }) => {}
            other => panic!("expected a length error, got {:?}", other),
        }
        assert!(!PaymentAddress::from_bytes(&[0u8; 24]).is_valid());
    }

    #[test]
    fn it_derives_addresses_from_keys() {
        let secret = secret_one();
        let cases = [
            (MAINNET_PKH_VERSION, true, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"),
            (MAINNET_PKH_VERSION, false, "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm"),
            (NetworkParams::testnet().pkh_version, true, "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r"),
        ];
        for case in cases.iter() {
            let from_secret = PaymentAddress::from_secret_key(&secret, case.0, case.1);
            let from_public = PaymentAddress::from_public_key(&secret.public_key(), case.0, case.1);
            assert!(from_secret.is_valid());
            assert_eq!(from_secret.encoded(), case.2);
            assert_eq!(from_public, from_secret);
        }
        assert_eq!(
            hex::encode(PaymentAddress::from_secret_key(&secret, 0, true).hash()),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn it_derives_p2sh_addresses_from_redeem_scripts() {
        let redeem = script(MULTISIG_1_OF_1);
        let address = PaymentAddress::from_redeem_script(&redeem, MAINNET_SH_VERSION);
        assert_eq!(address.encoded(), "3DicS6C8JZm59RsrgXr56iVHzYdQngiehV");

        let testnet = PaymentAddress::from_redeem_script(&redeem, NetworkParams::testnet().sh_version);
        assert_eq!(testnet.encoded(), "2N5GpVq89v2GRMDWQMfTwifUZCtqaczC6Y7");

        assert!(!PaymentAddress::from_redeem_script(&script("4c05aa"), MAINNET_SH_VERSION).is_valid());
    }

    #[test]
    fn it_extracts_addresses_from_scripts() {
        let mainnet = NetworkParams::mainnet();
        let redeem_push = format!("25{}", MULTISIG_1_OF_1);
        let cases = [
            (script(GENESIS_PK), Some("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa")),
            (
                script(&format!("21{}ac", G_COMPRESSED)),
                Some("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"),
            ),
            (
                script("76a914751e76e8199196d454941c45d1b3a323f1433bd688ac"),
                Some("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"),
            ),
            (
                script("a91483eebb7d79aa1d388e3b0ac65b98ac580c4da01a87"),
                Some("3DicS6C8JZm59RsrgXr56iVHzYdQngiehV"),
            ),
            (
                script(&format!("01aa21{}", G_COMPRESSED)),
                Some("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"),
            ),
            (
                script(&format!("0001aa{}", redeem_push)),
                Some("3DicS6C8JZm59RsrgXr56iVHzYdQngiehV"),
            ),
            (script("6a0401020304"), None),
            (script(MULTISIG_1_OF_1), None),
            (script("01aa4c05aa"), None),
            (script(""), None),
        ];
        for (s, expected) in cases.iter() {
            let address = PaymentAddress::from_script(s, &mainnet);
            match expected {
                Some(text) => {
                    assert!(address.is_valid(), "{}", s);
                    assert_eq!(address.encoded(), *text);
                }
                None => {
                    assert!(!address.is_valid(), "{}", s);
                    assert_eq!(address.hash(), &[0u8; 20]);
                }
            }
        }
    }

    #[test]
    fn it_compares_version_and_hash_only() {
        let text = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
        let from_text = PaymentAddress::from_string(text);
        let from_key = PaymentAddress::from_secret_key(&secret_one(), 0, true);
        let from_script = PaymentAddress::from_script(
            &from_key.to_script(&NetworkParams::mainnet()).unwrap(),
            &NetworkParams::mainnet(),
        );
        assert_eq!(from_text, from_key);
        assert_eq!(from_key, from_script);

        let zero = PaymentAddress::from_short_hash([0u8; 20], 0);
        assert!(zero.is_valid());
        assert!(!PaymentAddress::invalid().is_valid());
        assert_eq!(zero, PaymentAddress::invalid());

        assert_ne!(from_key, PaymentAddress::from_short_hash(*from_key.hash(), 0x6f));

        let set: HashSet<_> = vec![from_text, from_key, from_script, zero].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn it_builds_locking_scripts() {
        let mainnet = NetworkParams::mainnet();
        let pkh = PaymentAddress::from_string("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_eq!(pkh.to_script(&mainnet).unwrap().standard_type(), ScriptType::PKH);

        let sh = PaymentAddress::from_string("3DicS6C8JZm59RsrgXr56iVHzYdQngiehV");
        assert_eq!(sh.to_script(&mainnet).unwrap().standard_type(), ScriptType::SH);

        assert!(sh.to_script(&NetworkParams::testnet()).is_none());
        assert!(PaymentAddress::invalid().to_script(&mainnet).is_none());
    }

    #[test]
    fn it_serializes_as_text_with_serde() {
        let address = PaymentAddress::from_string("3HXNFmJpxjgTVFN35Y9f6Waje5YFsLEQZ2");
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"3HXNFmJpxjgTVFN35Y9f6Waje5YFsLEQZ2\"");
        let back: PaymentAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
        assert!(serde_json::from_str::<PaymentAddress>("\"1111111111111111111114oLvT3\"").is_err());
    }

    #[cfg(not(any(feature = "testnet", feature = "signet")))]
    #[test]
    fn it_extracts_with_the_default_network() {
        let address = extract_address(&script("a91483eebb7d79aa1d388e3b0ac65b98ac580c4da01a87"));
        assert_eq!(address.version(), MAINNET_SH_VERSION);
        assert_eq!(address.encoded(), "3DicS6C8JZm59RsrgXr56iVHzYdQngiehV");
    }
}
