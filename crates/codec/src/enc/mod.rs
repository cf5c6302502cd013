//! Textual encodings for ledger identifiers.

pub mod bases;

pub use bases::*;
