//! Transaction outputs.

use std::io::{Read, Write};

use coinwire_core::ser::{ByteFormat, SerError, SerResult};

use crate::types::script::{Script, ScriptType};

/// A value in satoshis, locked by a script. On the wire: 8-byte LE value, then the prefixed
/// `script_pubkey`.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq, Default)]
pub struct TxOut {
    /// Satoshis
    pub value: u64,
    /// The locking script
    pub script_pubkey: Script,
}

impl TxOut {
    /// Build an output paying `value` to `script_pubkey`.
    pub fn new<T>(value: u64, script_pubkey: T) -> Self
    where
        T: Into<Script>,
    {
        Self {
            value,
            script_pubkey: script_pubkey.into(),
        }
    }

    /// Classify the locking script.
    pub fn standard_type(&self) -> ScriptType {
        self.script_pubkey.standard_type()
    }
}

impl ByteFormat for TxOut {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        8 + self.script_pubkey.serialized_length()
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> SerResult<Self>
    where
        R: Read,
    {
        let value = Self::read_u64_le(reader)?;
        let script_pubkey = Script::read_from(reader, 0)?;
        Ok(Self {
            value,
            script_pubkey,
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        Ok(Self::write_u64_le(writer, self.value)? + self.script_pubkey.write_to(writer)?)
    }
}

impl std::fmt::Display for TxOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\tvalue = {}", self.value)?;
        writeln!(f, "\tscript = {}", self.script_pubkey)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_encodes_value_then_script() {
        let cases = [
            (TxOut::default(), "000000000000000000", ScriptType::NonStandard),
            (
                TxOut::new(
                    5_000_000_000,
                    hex::decode("a91483eebb7d79aa1d388e3b0ac65b98ac580c4da01a87").unwrap(),
                ),
                "00f2052a0100000017a91483eebb7d79aa1d388e3b0ac65b98ac580c4da01a87",
                ScriptType::SH,
            ),
            (
                TxOut::new(u64::MAX, vec![0x6a]),
                "ffffffffffffffff016a",
                ScriptType::OP_RETURN,
            ),
        ];
        for (output, wire, kind) in cases.iter() {
            assert_eq!(output.serialize_hex().unwrap(), *wire);
            assert_eq!(output.serialized_length() * 2, wire.len());
            assert_eq!(&TxOut::deserialize_hex(wire).unwrap(), output);
            assert_eq!(output.standard_type(), *kind);
        }
    }

    #[test]
    fn it_rejects_short_outputs() {
        assert!(TxOut::deserialize_hex("00f2052a01").is_err());
        assert!(TxOut::deserialize_hex("00f2052a0100000002aa").is_err());
    }
}
