//! Previous-output references and transaction inputs.

use std::io::{Read, Write};

use coinwire_core::{
    hashes::MarkedDigest,
    ser::{ByteFormat, SerError, SerResult},
};

use crate::{
    hashes::TXID,
    types::{consensus::MAX_INPUT_SEQUENCE, script::Script},
};

/// The index used by the null outpoint.
pub const NULL_OUTPOINT_INDEX: u32 = u32::MAX;

/// A reference to output `idx` of the transaction `txid`. The txid is stored in wire (LE) byte
/// order. On the wire: 32-byte txid, then 4-byte LE index.
///
/// The null outpoint, a zero txid with index `NULL_OUTPOINT_INDEX`, is spent only by
/// coinbase transactions. It is also the `Default`.
#[derive(serde::Serialize, serde::Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Outpoint {
    /// The transaction holding the spent output
    pub txid: TXID,
    /// Position of the spent output in that transaction
    pub idx: u32,
}

impl Outpoint {
    /// Reference output `idx` of `txid`.
    pub fn new(txid: TXID, idx: u32) -> Self {
        Self { txid, idx }
    }

    /// The null outpoint.
    pub fn null() -> Self {
        Self::new(TXID::default(), NULL_OUTPOINT_INDEX)
    }

    /// True for the null outpoint only. A zero txid with any other index is not null.
    pub fn is_null(&self) -> bool {
        self.idx == NULL_OUTPOINT_INDEX && self.txid == TXID::default()
    }

    /// Reference an output by its block-explorer (BE) txid.
    pub fn from_explorer_format(txid_be: TXID, idx: u32) -> Self {
        Self::new(txid_be.reversed(), idx)
    }
}

impl Default for Outpoint {
    fn default() -> Self {
        Self::null()
    }
}

impl ByteFormat for Outpoint {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        32 + 4
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> SerResult<Self>
    where
        R: Read,
    {
        let txid = TXID::read_from(reader, 0)?;
        let idx = Self::read_u32_le(reader)?;
        Ok(Self::new(txid, idx))
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        Ok(self.txid.write_to(writer)? + Self::write_u32_le(writer, self.idx)?)
    }
}

impl std::fmt::Display for Outpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.txid, self.idx)
    }
}

/// A transaction input: the outpoint it spends, the unlocking script, and the sequence number.
/// On the wire: outpoint, prefixed `script_sig`, 4-byte LE sequence.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq, Default)]
pub struct TxIn {
    /// The output being spent
    pub outpoint: Outpoint,
    /// The unlocking script
    pub script_sig: Script,
    /// nSequence. `MAX_INPUT_SEQUENCE` marks the input final.
    pub sequence: u32,
}

impl TxIn {
    /// Build an input spending `outpoint`.
    pub fn new<T>(outpoint: Outpoint, script_sig: T, sequence: u32) -> Self
    where
        T: Into<Script>,
    {
        Self {
            outpoint,
            script_sig: script_sig.into(),
            sequence,
        }
    }

    /// True if the sequence number is `MAX_INPUT_SEQUENCE`.
    pub fn is_final(&self) -> bool {
        self.sequence == MAX_INPUT_SEQUENCE
    }
}

impl ByteFormat for TxIn {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        self.outpoint.serialized_length() + self.script_sig.serialized_length() + 4
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> SerResult<Self>
    where
        R: Read,
    {
        let outpoint = Outpoint::read_from(reader, 0)?;
        let script_sig = Script::read_from(reader, 0)?;
        let sequence = Self::read_u32_le(reader)?;
        Ok(Self::new(outpoint, script_sig, sequence))
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut written = self.outpoint.write_to(writer)?;
        written += self.script_sig.write_to(writer)?;
        written += Self::write_u32_le(writer, self.sequence)?;
        Ok(written)
    }
}

impl std::fmt::Display for TxIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\tprevious output = {}", self.outpoint)?;
        writeln!(f, "\tscript = {}", self.script_sig)?;
        writeln!(f, "\tsequence = {}", self.sequence)
    }
}
