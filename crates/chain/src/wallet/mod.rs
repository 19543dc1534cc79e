//! Holds payment address types.

pub mod payment_address;

pub use payment_address::*;
