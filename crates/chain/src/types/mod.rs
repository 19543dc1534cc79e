//! Holds Bitcoin transaction types and their consensus predicates.

pub mod consensus;
pub mod script;
pub mod tx;
pub mod txin;
pub mod txout;

pub use consensus::*;
pub use script::*;
pub use tx::*;
pub use txin::*;
pub use txout::*;
