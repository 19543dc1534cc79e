//! Re-exports of common traits and types.
pub use crate::{
    hashes::{SighashDigest, TXID},
    nets::NetworkParams,
    types::{Outpoint, Script, ScriptType, Transaction, TxError, TxIn, TxOut},
    wallet::{extract_address, Payment, PaymentAddress},
};
pub use coinwire_core::{hashes::MarkedDigest, ser::ByteFormat};
