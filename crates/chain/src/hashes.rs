//! Digest newtypes for transaction identifiers and signature messages. Both wrap a double-sha2
//! output and keep it in wire (LE) byte order.

use coinwire_core::mark_hash256;

mark_hash256!(
    /// Identifies a transaction: the double-sha2 of its wire encoding
    TXID
);
mark_hash256!(
    /// The message an input's signature commits to: the double-sha2 of the transaction
    /// encoding followed by a 4-byte LE sighash type
    SighashDigest
);
