//! Consensus predicates over a single `Transaction`. None of these need chain state beyond the
//! block height and time supplied by the caller.
//!
//! Value and sigop totals saturate at their type's maximum rather than wrapping. A saturated
//! total must be treated as "too large" by the caller.

use std::sync::atomic::Ordering;

use crate::types::{tx::Transaction, txin::TxIn};

/// Locktimes below this are block heights. At or above it they are unix timestamps.
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// The shortest permitted coinbase script_sig, in bytes, excluding its length prefix.
pub const MIN_COINBASE_SIZE: usize = 2;

/// The longest permitted coinbase script_sig, in bytes, excluding its length prefix.
pub const MAX_COINBASE_SIZE: usize = 100;

/// The sequence number of a final input. A transaction whose inputs are all final ignores its
/// locktime.
pub const MAX_INPUT_SEQUENCE: u32 = u32::MAX;

impl Transaction {
    /// True if the transaction has exactly one input, and it spends the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].outpoint.is_null()
    }

    /// True if this is a coinbase whose script_sig length is outside
    /// `MIN_COINBASE_SIZE..=MAX_COINBASE_SIZE`.
    pub fn is_invalid_coinbase(&self) -> bool {
        if !self.is_coinbase() {
            return false;
        }
        let size = self.inputs[0].script_sig.serialized_size(false);
        !(MIN_COINBASE_SIZE..=MAX_COINBASE_SIZE).contains(&size)
    }

    /// True if this is not a coinbase, but some input spends the null outpoint anyway.
    pub fn is_invalid_non_coinbase(&self) -> bool {
        !self.is_coinbase() && self.inputs.iter().any(|input| input.outpoint.is_null())
    }

    /// True if the transaction may be included in a block at `block_height` and `block_time`.
    ///
    /// A zero locktime is always final. Otherwise the locktime is compared against the height
    /// or the time, depending on which side of `LOCKTIME_THRESHOLD` it falls. A locktime that has
    /// not yet passed may still be overridden by every input being final.
    pub fn is_final(&self, block_height: u64, block_time: u32) -> bool {
        if self.locktime == 0 {
            return true;
        }

        let passed = if self.locktime < LOCKTIME_THRESHOLD {
            u64::from(self.locktime) < block_height
        } else {
            self.locktime < block_time
        };

        passed || self.inputs.iter().all(TxIn::is_final)
    }

    /// True if the locktime is set, but no input has a sequence that lets it take effect.
    /// Vacuously true for a transaction with a locktime and no inputs.
    pub fn is_locktime_conflict(&self) -> bool {
        self.locktime != 0
            && !self
                .inputs
                .iter()
                .any(|input| input.sequence < MAX_INPUT_SEQUENCE)
    }

    /// The sum of output values, saturating at `u64::MAX`.
    pub fn total_output_value(&self) -> u64 {
        self.outputs
            .iter()
            .fold(0u64, |total, output| total.saturating_add(output.value))
    }

    /// The number of signature operations in all input and output scripts, counting each
    /// multisig as 20. Saturates at `usize::MAX`.
    ///
    /// Non-zero results are cached until the transaction is mutated. A zero count is recomputed
    /// on every call.
    pub fn signature_operations(&self) -> usize {
        let cached = self.sigops.load(Ordering::Relaxed);
        if cached != 0 {
            return cached;
        }

        let inputs = self
            .inputs
            .iter()
            .map(|input| input.script_sig.signature_operations(false));
        let outputs = self
            .outputs
            .iter()
            .map(|output| output.script_pubkey.signature_operations(false));
        let count = inputs.chain(outputs).fold(0usize, usize::saturating_add);

        self.sigops.store(count, Ordering::Relaxed);
        count
    }
}
