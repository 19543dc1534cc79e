//! The legacy Bitcoin `Transaction`: its wire codec, and the memoized identity hash.
//!
//! The TXID is computed lazily on first request, and shared by every reader of the same
//! transaction. Readers probe the slot under a shared lock. The first reader that finds it empty
//! takes an upgradable lock, re-checks, and upgrades to install the digest. Any mutation goes
//! through `&mut self`, which clears the slot without locking.

use std::{
    io::{Error as IOError, Read, Write},
    sync::atomic::{AtomicUsize, Ordering},
};

use parking_lot::{RwLock, RwLockUpgradableReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, trace};

use coinwire_core::{
    hashes::{Hash256Writer, MarkedDigestWriter},
    impl_hex_serde,
    ser::{ByteFormat, SerError},
};

use crate::{
    hashes::{SighashDigest, TXID},
    types::{txin::TxIn, txout::TxOut},
};

/// Errors from decoding or encoding a transaction
#[derive(Debug, Error)]
pub enum TxError {
    /// A field failed to decode
    #[error(transparent)]
    SerError(#[from] SerError),

    /// IOError bubbled up from a `Write` passed to a `ByteFormat::write_to` implementation.
    #[error(transparent)]
    IOError(#[from] IOError),
}

/// Result alias for transaction operations
pub type TxResult<T> = Result<T, TxError>;

/// A legacy Bitcoin transaction.
///
/// `Transaction::default()` is the null transaction: version 0, locktime 0, and no inputs or
/// outputs. Equality compares content only. The hash and sigop caches never participate.
pub struct Transaction {
    pub(crate) version: u32,
    pub(crate) inputs: Vec<TxIn>,
    pub(crate) outputs: Vec<TxOut>,
    pub(crate) locktime: u32,
    hash: RwLock<Option<TXID>>,
    pub(crate) sigops: AtomicUsize,
}

impl Transaction {
    /// Instantiate a new transaction
    pub fn new<I, O>(version: u32, inputs: I, outputs: O, locktime: u32) -> Self
    where
        I: Into<Vec<TxIn>>,
        O: Into<Vec<TxOut>>,
    {
        Self {
            version,
            inputs: inputs.into(),
            outputs: outputs.into(),
            locktime,
            hash: RwLock::new(None),
            sigops: AtomicUsize::new(0),
        }
    }

    /// Deserialize a transaction from a byte slice. Trailing bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> TxResult<Self> {
        Self::read_from(&mut &data[..], 0).map_err(|e| {
            debug!(error = %e, len = data.len(), "rejected transaction bytes");
            e
        })
    }

    /// Replace the contents of `self` with a transaction read from `reader`. On failure `self`
    /// is left as the null transaction.
    pub fn load_from<R>(&mut self, reader: &mut R) -> TxResult<()>
    where
        R: Read,
    {
        match Self::read_from(reader, 0) {
            Ok(tx) => {
                *self = tx;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "rejected transaction stream");
                self.reset();
                Err(e)
            }
        }
    }

    /// Serialize the transaction to a new byte vector.
    ///
    /// # Panics
    ///
    /// If the number of bytes written disagrees with `serialized_length()`. This indicates a
    /// codec bug, not bad input.
    pub fn to_bytes(&self) -> Vec<u8> {
        let expected = self.serialized_length();
        let mut data = Vec::with_capacity(expected);
        self.write_to(&mut data).expect("No IOError from Vec");
        assert_eq!(data.len(), expected, "serialized length mismatch");
        data
    }

    /// The transaction's version number
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The transaction's locktime
    pub fn locktime(&self) -> u32 {
        self.locktime
    }

    /// The transaction's inputs
    pub fn inputs(&self) -> &[TxIn] {
        &self.inputs
    }

    /// The transaction's outputs
    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    /// Set the version number
    pub fn set_version(&mut self, version: u32) {
        self.invalidate();
        self.version = version;
    }

    /// Set the locktime
    pub fn set_locktime(&mut self, locktime: u32) {
        self.invalidate();
        self.locktime = locktime;
    }

    /// Replace the inputs
    pub fn set_inputs<I: Into<Vec<TxIn>>>(&mut self, inputs: I) {
        self.invalidate();
        self.inputs = inputs.into();
    }

    /// Replace the outputs
    pub fn set_outputs<O: Into<Vec<TxOut>>>(&mut self, outputs: O) {
        self.invalidate();
        self.outputs = outputs.into();
    }

    /// Mutable access to the inputs. Clears the caches.
    pub fn inputs_mut(&mut self) -> &mut Vec<TxIn> {
        self.invalidate();
        &mut self.inputs
    }

    /// Mutable access to the outputs. Clears the caches.
    pub fn outputs_mut(&mut self) -> &mut Vec<TxOut> {
        self.invalidate();
        &mut self.outputs
    }

    /// Reset to the null transaction.
    pub fn reset(&mut self) {
        self.invalidate();
        self.version = 0;
        self.locktime = 0;
        self.inputs.clear();
        self.outputs.clear();
    }

    fn invalidate(&mut self) {
        *self.hash.get_mut() = None;
        *self.sigops.get_mut() = 0;
    }

    /// False only for the null transaction.
    pub fn is_valid(&self) -> bool {
        self.version != 0
            || self.locktime != 0
            || !self.inputs.is_empty()
            || !self.outputs.is_empty()
    }

    /// True if the identity hash has been computed and not since invalidated.
    pub fn has_cached_hash(&self) -> bool {
        self.hash.read().is_some()
    }

    /// The double-sha2 of the serialized transaction. Computed once, then served from the cache
    /// until the transaction is mutated.
    pub fn hash(&self) -> TXID {
        if let Some(txid) = *self.hash.read() {
            return txid;
        }

        let guard = self.hash.upgradable_read();
        if let Some(txid) = *guard {
            return txid;
        }

        let mut guard = RwLockUpgradableReadGuard::upgrade(guard);
        let txid = self.compute_hash();
        *guard = Some(txid);

        let _guard = RwLockWriteGuard::downgrade(guard);
        trace!(txid = %txid, "cached transaction hash");
        txid
    }

    fn compute_hash(&self) -> TXID {
        let mut w = Hash256Writer::default();
        self.write_to(&mut w).expect("No IOError from SHA2");
        w.finish_marked()
    }

    /// The double-sha2 of the serialized transaction with the 4-byte LE `sighash_type`
    /// appended. Never cached.
    pub fn hash_with_sighash_type(&self, sighash_type: u32) -> SighashDigest {
        let mut w = Hash256Writer::default();
        self.write_to(&mut w).expect("No IOError from SHA2");
        Self::write_u32_le(&mut w, sighash_type).expect("No IOError from SHA2");
        w.finish_marked()
    }

    /// Clone the transaction, computing the source's hash first so the copy starts with a
    /// populated cache.
    pub fn clone_with_hash(&self) -> Self {
        let txid = self.hash();
        let copy = self.clone();
        *copy.hash.write() = Some(txid);
        copy
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new(0, vec![], vec![], 0)
    }
}

impl Clone for Transaction {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            locktime: self.locktime,
            hash: RwLock::new(*self.hash.read()),
            sigops: AtomicUsize::new(self.sigops.load(Ordering::Relaxed)),
        }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.locktime == other.locktime
            && self.inputs == other.inputs
            && self.outputs == other.outputs
    }
}

impl Eq for Transaction {}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("version", &self.version)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("locktime", &self.locktime)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Transaction:")?;
        writeln!(f, "\tversion = {}", self.version)?;
        writeln!(f, "\tlocktime = {}", self.locktime)?;
        writeln!(f, "Inputs:")?;
        for input in self.inputs.iter() {
            write!(f, "{}", input)?;
        }
        writeln!(f, "Outputs:")?;
        for output in self.outputs.iter() {
            write!(f, "{}", output)?;
        }
        Ok(())
    }
}

impl ByteFormat for Transaction {
    type Error = TxError;

    fn serialized_length(&self) -> usize {
        let mut len = 4; // version
        len += coinwire_core::ser::prefix_byte_len(self.inputs.len() as u64) as usize;
        len += self
            .inputs
            .iter()
            .map(|i| i.serialized_length())
            .sum::<usize>();
        len += coinwire_core::ser::prefix_byte_len(self.outputs.len() as u64) as usize;
        len += self
            .outputs
            .iter()
            .map(|o| o.serialized_length())
            .sum::<usize>();
        len += 4; // locktime
        len
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> TxResult<Self>
    where
        R: Read,
    {
        let version = Self::read_u32_le(reader)?;
        let inputs: Vec<TxIn> = Self::read_prefix_vec(reader)?;
        let outputs: Vec<TxOut> = Self::read_prefix_vec(reader)?;
        let locktime = Self::read_u32_le(reader)?;
        Ok(Self::new(version, inputs, outputs, locktime))
    }

    fn write_to<W>(&self, writer: &mut W) -> TxResult<usize>
    where
        W: Write,
    {
        let mut len = Self::write_u32_le(writer, self.version)?;
        len += Self::write_prefix_vec(writer, &self.inputs)?;
        len += Self::write_prefix_vec(writer, &self.outputs)?;
        len += Self::write_u32_le(writer, self.locktime)?;
        Ok(len)
    }
}

impl_hex_serde!(Transaction);
