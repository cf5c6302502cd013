//! Canonical binary transaction codec and value model for XRP-Ledger-style
//! networks.
//!
//! The crate covers the deterministic core of a ledger client: fixed-width
//! identifiers with their hex and Base58Check textual forms, the
//! mantissa/exponent amount model with its exact arithmetic and formatting
//! rules, the field and transaction-schema tables, and the canonical binary
//! serializer whose output feeds signing hashes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod macros;

pub mod binary;
pub mod enc;
pub mod fields;
pub mod hashes;
pub mod ser;
pub mod types;

/// Common traits and types.
pub mod prelude;

pub use binary::{BinaryError, FieldMap, PathHop, SerializedObject, Value};
pub use enc::EncodingError;
pub use ser::{ByteFormat, SerError};
pub use types::{AccountId, Amount, Currency, Hash128, Hash160, Hash256, Seed};
