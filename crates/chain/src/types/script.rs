//! Bitcoin Script, treated as an opaque length-prefixed byte vector.
//!
//! We do not handle assembly, disassembly, or Script execution here. A `Script` exposes only
//! what the transaction and address layers need: its operation boundaries, signature-operation
//! accounting, and classification of the standard output patterns.

use coinwire_core::{hashes::Hash160Digest, wrap_prefixed_byte_vector};
use thiserror::Error;

/// Push an empty byte vector. Also the witness-v0 and multisig-dummy marker.
pub const OP_0: u8 = 0x00;
/// The largest direct push opcode. `0x01..=0x4b` push that many bytes.
pub const OP_PUSHBYTES_75: u8 = 0x4b;
/// Push data with a 1-byte length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Push data with a 2-byte LE length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Push data with a 4-byte LE length.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number 1.
pub const OP_1: u8 = 0x51;
/// Push the number 16.
pub const OP_16: u8 = 0x60;
/// Mark the output unspendable.
pub const OP_RETURN: u8 = 0x6a;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Compare the top two stack items.
pub const OP_EQUAL: u8 = 0x87;
/// `OP_EQUAL` then `OP_VERIFY`.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// ripemd160(sha256(x)) of the top stack item.
pub const OP_HASH160: u8 = 0xa9;
/// Check a single signature.
pub const OP_CHECKSIG: u8 = 0xac;
/// `OP_CHECKSIG` then `OP_VERIFY`.
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
/// Check m-of-n signatures.
pub const OP_CHECKMULTISIG: u8 = 0xae;
/// `OP_CHECKMULTISIG` then `OP_VERIFY`.
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

/// The number of signature operations charged for a multisig when its key count is not known.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

wrap_prefixed_byte_vector!(
    /// A Script is a marked Vec<u8> used as the `script_sig` of inputs and the `script_pubkey`
    /// of outputs.
    ///
    /// The empty script (`Script::null()`, also the `Default`) encodes as the single byte 0.
    Script
);

/// Errors encountered while walking a script's operations.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ScriptError {
    /// A push opcode declared more bytes than remain in the script.
    #[error("Truncated push at byte offset {0}")]
    TruncatedPush(usize),
}

/// The locking script templates this crate recognizes.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ScriptType {
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    PKH,
    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    SH,
    /// Pay to Pubkey. Either a 33-byte compressed or 65-byte uncompressed key.
    PK,
    /// Provably unspendable data carrier
    #[allow(non_camel_case_types)]
    OP_RETURN,
    /// Nonstandard or unknown `Script` type.
    NonStandard,
}

/// A single script operation: an opcode and, for push opcodes, the pushed bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Operation<'a> {
    /// The opcode byte
    pub opcode: u8,
    /// The data pushed. Empty for non-push opcodes.
    pub data: &'a [u8],
}

impl<'a> Operation<'a> {
    /// True if the opcode only pushes data (including the small-number opcodes).
    pub fn is_push(&self) -> bool {
        self.opcode <= OP_16
    }

    /// The value pushed by `OP_1` through `OP_16`, if this is one of them.
    pub fn small_int(&self) -> Option<usize> {
        if (OP_1..=OP_16).contains(&self.opcode) {
            Some((self.opcode - OP_1 + 1) as usize)
        } else {
            None
        }
    }
}

/// An iterator over the operations of a script. Yields an error and then stops at the first
/// push that overruns the end of the script.
#[derive(Clone, Debug)]
pub struct Operations<'a> {
    script: &'a [u8],
    offset: usize,
}

impl<'a> Operations<'a> {
    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let bytes = self.script.get(self.offset..end)?;
        self.offset = end;
        Some(bytes)
    }
}

impl<'a> Iterator for Operations<'a> {
    type Item = Result<Operation<'a>, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset;
        let opcode = *self.script.get(start)?;
        self.offset += 1;

        let len = match opcode {
            0x01..=OP_PUSHBYTES_75 => Some(opcode as usize),
            OP_PUSHDATA1 => self.take(1).map(|b| b[0] as usize),
            OP_PUSHDATA2 => self.take(2).map(|b| u16::from_le_bytes([b[0], b[1]]) as usize),
            OP_PUSHDATA4 => self
                .take(4)
                .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize),
            _ => Some(0),
        };

        match len.and_then(|len| self.take(len)) {
            Some(data) => Some(Ok(Operation { opcode, data })),
            None => {
                self.offset = self.script.len();
                Some(Err(ScriptError::TruncatedPush(start)))
            }
        }
    }
}

/// True if `key` has the shape of a SEC1 encoded public key. Does not check the curve.
pub fn is_public_key(key: &[u8]) -> bool {
    match key.len() {
        33 => key[0] == 0x02 || key[0] == 0x03,
        65 => key[0] == 0x04,
        _ => false,
    }
}

impl Script {
    /// Instantiate a standard p2pkh script pubkey from a pubkey hash.
    pub fn p2pkh(hash: &Hash160Digest) -> Self {
        let mut v: Vec<u8> = vec![OP_DUP, OP_HASH160, 0x14];
        v.extend(hash);
        v.extend([OP_EQUALVERIFY, OP_CHECKSIG]);
        v.into()
    }

    /// Instantiate a standard p2sh script pubkey from a script hash.
    pub fn p2sh(hash: &Hash160Digest) -> Self {
        let mut v: Vec<u8> = vec![OP_HASH160, 0x14];
        v.extend(hash);
        v.push(OP_EQUAL);
        v.into()
    }

    /// Iterate over the script's operations.
    pub fn ops(&self) -> Operations<'_> {
        Operations {
            script: self.items(),
            offset: 0,
        }
    }

    /// True if every push in the script is complete.
    pub fn is_well_formed(&self) -> bool {
        self.ops().all(|op| op.is_ok())
    }

    /// The byte length of the script, optionally including its compact-int length prefix.
    pub fn serialized_size(&self, prefix: bool) -> usize {
        if prefix {
            self.len() + self.len_prefix() as usize
        } else {
            self.len()
        }
    }

    /// Count the signature operations in the script. Multisigs count as
    /// `MAX_PUBKEYS_PER_MULTISIG` unless `accurate` is set and the preceding opcode is one of
    /// `OP_1` through `OP_16`. Counting stops at the first truncated push. The count saturates.
    pub fn signature_operations(&self, accurate: bool) -> usize {
        let mut count: usize = 0;
        let mut last: Option<Operation> = None;
        for op in self.ops() {
            let op = match op {
                Ok(op) => op,
                Err(_) => break,
            };
            let cost = match op.opcode {
                OP_CHECKSIG | OP_CHECKSIGVERIFY => 1,
                OP_CHECKMULTISIG | OP_CHECKMULTISIGVERIFY => {
                    match (accurate, last.and_then(|l| l.small_int())) {
                        (true, Some(keys)) => keys,
                        _ => MAX_PUBKEYS_PER_MULTISIG,
                    }
                }
                _ => 0,
            };
            count = count.saturating_add(cost);
            last = Some(op);
        }
        count
    }

    /// Match the script against the recognized templates.
    pub fn standard_type(&self) -> ScriptType {
        let items = self.items();
        match items.len() {
            0x19 if items[0..3] == [OP_DUP, OP_HASH160, 0x14]
                && items[0x17..] == [OP_EQUALVERIFY, OP_CHECKSIG] =>
            {
                ScriptType::PKH
            }
            0x17 if items[0..2] == [OP_HASH160, 0x14] && items[0x16] == OP_EQUAL => {
                ScriptType::SH
            }
            0x23 | 0x43
                if items[0] as usize == items.len() - 2
                    && items[items.len() - 1] == OP_CHECKSIG
                    && is_public_key(&items[1..items.len() - 1]) =>
            {
                ScriptType::PK
            }
            _ if items.first() == Some(&OP_RETURN) => ScriptType::OP_RETURN,
            _ => ScriptType::NonStandard,
        }
    }

    /// The 20-byte hash committed to by a PKH or SH script. None for other types.
    pub fn extract_short_hash(&self) -> Option<Hash160Digest> {
        let offset = match self.standard_type() {
            ScriptType::PKH => 3,
            ScriptType::SH => 2,
            _ => return None,
        };
        let mut hash = Hash160Digest::default();
        hash.copy_from_slice(&self.items()[offset..offset + 20]);
        Some(hash)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.items()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use coinwire_core::ser::ByteFormat;

    static GENESIS_PK: &str = "4104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac";
    static MULTISIG_1_OF_1: &str =
        "51210279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f8179851ae";

    fn script(s: &str) -> Script {
        Script::new(hex::decode(s).unwrap())
    }

    #[test]
    fn it_serializes_and_derializes_scripts() {
        let cases = [
            (
                script("0014758ce550380d964051086798d6546bebdca27a73"),
                "160014758ce550380d964051086798d6546bebdca27a73",
                22,
            ),
            (Script::new(vec![]), "00", 0),
            (Script::null(), "00", 0),
        ];
        for case in cases.iter() {
            let prevout_script = Script::deserialize_hex(case.1).unwrap();
            assert_eq!(case.0.serialize_hex().unwrap(), case.1);
            assert_eq!(case.0.len(), case.2);
            assert_eq!(case.0.serialized_size(false), case.2);
            assert_eq!(case.0.serialized_size(true), case.1.len() / 2);
            assert_eq!(prevout_script, case.0);
        }
    }

    #[test]
    fn it_determines_script_types_accurately() {
        let cases = [
            ("a914e88869b88866281ab166541ad8aafba8f8aba47a87", ScriptType::SH),
            ("a914e88869b88866281ab166541ad8aafba8f8aba47a89", ScriptType::NonStandard),
            ("aa14e88869b88866281ab166541ad8aafba8f8aba47a87", ScriptType::NonStandard),
            ("76a9140e5c3c8d420c7f11e88d76f7b860d471e6517a4488ac", ScriptType::PKH),
            ("76a9140e5c3c8d420c7f11e88d76f7b860d471e6517a4488ad", ScriptType::NonStandard),
            ("77a9140e5c3c8d420c7f11e88d76f7b860d471e6517a4488ac", ScriptType::NonStandard),
            (GENESIS_PK, ScriptType::PK),
            (
                "210279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798ac",
                ScriptType::PK,
            ),
            (
                "210579be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798ac",
                ScriptType::NonStandard,
            ),
            ("6a0401020304", ScriptType::OP_RETURN),
            ("0011223344", ScriptType::NonStandard),
            ("", ScriptType::NonStandard),
        ];
        for (s, t) in cases.iter() {
            assert_eq!(script(s).standard_type(), *t, "{}", s);
        }
    }

    #[test]
    fn it_builds_standard_scripts() {
        let hash = hex::decode("0e5c3c8d420c7f11e88d76f7b860d471e6517a44").unwrap();
        let mut digest = Hash160Digest::default();
        digest.copy_from_slice(&hash);

        let pkh = Script::p2pkh(&digest);
        assert_eq!(pkh, script("76a9140e5c3c8d420c7f11e88d76f7b860d471e6517a4488ac"));
        assert_eq!(pkh.extract_short_hash(), Some(digest));

        let sh = Script::p2sh(&digest);
        assert_eq!(sh, script("a9140e5c3c8d420c7f11e88d76f7b860d471e6517a4487"));
        assert_eq!(sh.extract_short_hash(), Some(digest));

        assert_eq!(script(GENESIS_PK).extract_short_hash(), None);
    }

    #[test]
    fn it_walks_operations() {
        let s = script("004c020102ac4d0100ff");
        let ops: Vec<_> = s.ops().map(|op| op.unwrap()).collect();
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0], Operation { opcode: OP_0, data: &[] });
        assert_eq!(ops[1].data, &[0x01, 0x02]);
        assert_eq!(ops[2].opcode, OP_CHECKSIG);
        assert_eq!(ops[3].data, &[0xff]);
        assert!(s.is_well_formed());

        let truncated = ["05aabb", "4c", "4c05aa", "4d01", "4e01000000"];
        for t in truncated.iter() {
            assert!(!script(t).is_well_formed(), "{}", t);
            assert!(script(t).ops().last().unwrap().is_err());
        }
    }

    #[test]
    fn it_counts_signature_operations() {
        let cases = [
            ("76a9140e5c3c8d420c7f11e88d76f7b860d471e6517a4488ac", 1, 1),
            (MULTISIG_1_OF_1, 20, 1),
            ("60ae", 20, 16),
            ("adaf", 21, 21),
            ("02acac", 0, 0),
            ("ac4c05aa", 1, 1),
            (GENESIS_PK, 1, 1),
            ("", 0, 0),
        ];
        for (s, loose, accurate) in cases.iter() {
            let s = script(s);
            assert_eq!(s.signature_operations(false), *loose);
            assert_eq!(s.signature_operations(true), *accurate);
        }
    }
}
