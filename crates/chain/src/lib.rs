//! Bitcoin transaction wire-format codec, consensus predicates, and payment addresses.
//!
//! The `Transaction` type (de)serializes to the exact legacy wire format, memoizes its TXID
//! behind an upgradeable read lock, and exposes the consensus checks that do not require chain
//! state beyond a block height and time: finality, coinbase legitimacy, and signature-operation
//! accounting.
//!
//! The `PaymentAddress` type derives and parses base58check P2PKH and P2SH addresses from public
//! keys, secret keys, scripts, or text.
//!
//! ```
//! use coinwire::prelude::*;
//!
//! let tx = Transaction::deserialize_hex(
//!     "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000"
//! ).unwrap();
//!
//! assert!(tx.is_coinbase());
//! assert_eq!(
//!     tx.hash().to_be_hex(),
//!     "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
//! );
//!
//! let address = extract_address(&tx.outputs()[0].script_pubkey);
//! assert_eq!(address.encoded(), "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod hashes;
pub mod nets;
pub mod prelude;
pub mod types;
pub mod wallet;

pub use hashes::*;
pub use nets::*;
pub use types::*;
pub use wallet::*;
