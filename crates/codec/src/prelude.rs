//! Common traits and types, for glob import.

pub use crate::binary::{
    read_value, write_value, BinaryError, FieldMap, PathHop, SerializedObject, Value,
};
pub use crate::enc::{
    decode_base58check, encode_base58check, EncodingError, EncodingResult, Version,
};
pub use crate::fields::{field, field_by_code, schema, FieldDef, Requirement, TypeCode};
pub use crate::hashes::{hash_prefix, sha512_half, DigestWriter, Sha512HalfWriter};
pub use crate::ser::{ByteFormat, SerError, SerResult};
pub use crate::types::{
    AccountId, Amount, AmountError, AmountValue, Currency, Hash128, Hash160, Hash256, Seed,
};
