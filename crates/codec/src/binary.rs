//! Canonical binary serialization of transactions and ledger objects.
//!
//! Serialization is a single pass: look up the transaction schema, check that
//! every required field is present, sort the present fields by their
//! (type code, field code) pair, and emit a compact header plus type-specific
//! payload for each. The output is independent of insertion order, so two
//! parties assembling the same logical transaction always produce the same
//! bytes, and therefore the same signing hash.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use thiserror::Error;

use crate::enc::EncodingError;
use crate::fields::{self, FieldDef, Requirement, TypeCode};
use crate::hashes::{hash_prefix, sha512_half};
use crate::ser::{read_vl, write_vl, SerError};
use crate::types::amount::{Amount, AmountError, AmountValue};
use crate::types::currency::Currency;
use crate::types::uint::{AccountId, Hash128, Hash160, Hash256};

const NATIVE_FLAG: u64 = 1 << 63;
const SIGN_FLAG: u64 = 1 << 62;
const MANTISSA_MASK: u64 = (1 << 54) - 1;
const NATIVE_MASK: u64 = (1 << 62) - 1;

// path hop component flags
const HOP_ACCOUNT: u8 = 0x01;
const HOP_CURRENCY: u8 = 0x10;
const HOP_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATH_END: u8 = 0x00;

// container end markers: (Object, 1) and (Array, 1)
const OBJECT_END: (u8, u8) = (14, 1);
const ARRAY_END: (u8, u8) = (15, 1);

/// Errors raised while serializing or parsing binary objects.
#[derive(Debug, Error)]
pub enum BinaryError {
    /// Bubbled up from the underlying byte format.
    #[error(transparent)]
    Ser(#[from] SerError),

    /// Bubbled up from amount validation.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Bubbled up from identifier decoding.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Bubbled up from the writer.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// No schema is defined for the named transaction type.
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    /// A field map key is not part of the transaction's schema.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A field header named a (type, field) pair the codec does not know.
    #[error("Unknown field code: type {type_code}, field {field_code}")]
    UnknownFieldCode {
        /// The header's type code.
        type_code: u8,
        /// The header's field code.
        field_code: u8,
    },

    /// A schema-required field was absent from the field map.
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    /// A value's variant did not match its field's wire type.
    #[error("Value does not match wire type {0:?}")]
    TypeMismatch(TypeCode),

    /// A path hop carried flag bits the codec does not know.
    #[error("Invalid path hop flags: {0:#04x}")]
    InvalidPathHop(u8),

    /// A per-field error, annotated with the field that raised it.
    #[error("Field `{field}`: {source}")]
    Field {
        /// The offending field's name.
        field: &'static str,
        /// The underlying error.
        source: Box<BinaryError>,
    },
}

/// One hop of a payment path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathHop {
    /// The account to ripple through.
    pub account: Option<AccountId>,
    /// The currency to convert to.
    pub currency: Option<Currency>,
    /// The issuer of the new currency.
    pub issuer: Option<AccountId>,
}

impl PathHop {
    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.account.is_some() {
            flags |= HOP_ACCOUNT;
        }
        if self.currency.is_some() {
            flags |= HOP_CURRENCY;
        }
        if self.issuer.is_some() {
            flags |= HOP_ISSUER;
        }
        flags
    }
}

/// A wire value, tagged by the variant its field's type code demands.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An 8-bit unsigned integer.
    U8(u8),
    /// A 16-bit unsigned integer.
    U16(u16),
    /// A 32-bit unsigned integer.
    U32(u32),
    /// A 64-bit unsigned integer.
    U64(u64),
    /// A 128-bit hash.
    Hash128(Hash128),
    /// A 160-bit hash.
    Hash160(Hash160),
    /// A 256-bit hash.
    Hash256(Hash256),
    /// A native or issued amount.
    Amount(Amount),
    /// A variable-length byte string.
    Blob(Vec<u8>),
    /// An account identifier.
    Account(AccountId),
    /// A nested object.
    Object(FieldMap),
    /// An array of single-field elements.
    Array(Vec<(String, Value)>),
    /// A set of payment paths.
    PathSet(Vec<Vec<PathHop>>),
    /// A list of 256-bit hashes.
    Vector256(Vec<Hash256>),
}

/// A transaction's fields, keyed by field name. Iteration order is the map's,
/// not the wire's; serialization re-sorts canonically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap(BTreeMap<String, Value>);

impl FieldMap {
    /// An empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Remove a field by name, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// The field names present in the map.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterate over (name, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The number of fields present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no fields are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Write a compact field header. Type and field codes of 15 or less pack into
/// a nibble each; larger codes spill into a following byte.
pub fn write_field_header<W>(
    writer: &mut W,
    type_code: u8,
    field_code: u8,
) -> Result<usize, BinaryError>
where
    W: Write,
{
    let written = match (type_code <= 15, field_code <= 15) {
        (true, true) => writer.write(&[(type_code << 4) | field_code])?,
        (true, false) => writer.write(&[type_code << 4, field_code])?,
        (false, true) => writer.write(&[field_code, type_code])?,
        (false, false) => writer.write(&[0, type_code, field_code])?,
    };
    Ok(written)
}

/// Read a compact field header, returning the (type code, field code) pair.
pub fn read_field_header<R>(reader: &mut R) -> Result<(u8, u8), BinaryError>
where
    R: Read,
{
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    let type_nibble = buf[0] >> 4;
    let field_nibble = buf[0] & 0x0F;
    let next = |reader: &mut R| -> Result<u8, BinaryError> {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        Ok(buf[0])
    };
    match (type_nibble, field_nibble) {
        (0, 0) => {
            let type_code = next(reader)?;
            let field_code = next(reader)?;
            Ok((type_code, field_code))
        }
        (0, field_code) => Ok((next(reader)?, field_code)),
        (type_code, 0) => Ok((type_code, next(reader)?)),
        (type_code, field_code) => Ok((type_code, field_code)),
    }
}

/// Write an amount's wire form: 8 bytes for native, 48 for issued.
///
/// Bit 63 distinguishes issued from native, bit 62 is set for non-negative
/// values. Native amounts keep their magnitude in the low 62 bits; issued
/// amounts pack the biased exponent into bits 54 through 61 and the mantissa
/// below, followed by the 20-byte currency and issuer. An issued zero is the
/// bare discriminant bit.
pub fn write_amount<W>(writer: &mut W, amount: &Amount) -> Result<usize, BinaryError>
where
    W: Write,
{
    match *amount.value() {
        AmountValue::Native(drops) => {
            // The wire field holds only 62 bits of magnitude.
            if drops.unsigned_abs() > NATIVE_MASK {
                return Err(AmountError::NativeOutOfRange.into());
            }
            let mut bits = drops.unsigned_abs();
            if drops >= 0 {
                bits |= SIGN_FLAG;
            }
            writer.write_all(&bits.to_be_bytes())?;
            Ok(8)
        }
        AmountValue::Issued {
            mantissa,
            exponent,
            negative,
        } => {
            let mut bits = NATIVE_FLAG;
            if mantissa != 0 {
                if !negative {
                    bits |= SIGN_FLAG;
                }
                bits |= ((exponent + 97) as u64) << 54;
                bits |= mantissa;
            }
            writer.write_all(&bits.to_be_bytes())?;
            writer.write_all(&amount.currency().to_bytes())?;
            writer.write_all(amount.issuer().as_bytes())?;
            Ok(48)
        }
    }
}

/// Read an amount's wire form, rejecting non-canonical mantissas and
/// exponents.
pub fn read_amount<R>(reader: &mut R) -> Result<Amount, BinaryError>
where
    R: Read,
{
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    let bits = u64::from_be_bytes(buf);
    if bits & NATIVE_FLAG == 0 {
        let magnitude = (bits & NATIVE_MASK) as i64;
        let drops = if bits & SIGN_FLAG == 0 {
            -magnitude
        } else {
            magnitude
        };
        Ok(Amount::from_drops(drops)?)
    } else {
        let mantissa = bits & MANTISSA_MASK;
        let negative = mantissa != 0 && bits & SIGN_FLAG == 0;
        let exponent = ((bits >> 54) & 0xFF) as i32 - 97;
        let mut currency_buf = [0u8; 20];
        reader.read_exact(&mut currency_buf)?;
        let currency = Currency::from_bytes(&currency_buf)?;
        let mut issuer_buf = [0u8; 20];
        reader.read_exact(&mut issuer_buf)?;
        let issuer = AccountId::from_bytes(issuer_buf);
        let exponent = if mantissa == 0 { 0 } else { exponent };
        Ok(Amount::from_canonical_parts(
            mantissa, exponent, negative, currency, issuer,
        )?)
    }
}

/// Write a value as the payload of a field with the given wire type.
pub fn write_value<W>(writer: &mut W, type_code: TypeCode, value: &Value) -> Result<usize, BinaryError>
where
    W: Write,
{
    match (type_code, value) {
        (TypeCode::UInt8, Value::U8(v)) => Ok(writer.write(&[*v])?),
        (TypeCode::UInt16, Value::U16(v)) => Ok(writer.write(&v.to_be_bytes())?),
        (TypeCode::UInt32, Value::U32(v)) => Ok(writer.write(&v.to_be_bytes())?),
        (TypeCode::UInt64, Value::U64(v)) => Ok(writer.write(&v.to_be_bytes())?),
        (TypeCode::Hash128, Value::Hash128(v)) => Ok(writer.write(v.as_bytes())?),
        (TypeCode::Hash160, Value::Hash160(v)) => Ok(writer.write(v.as_bytes())?),
        (TypeCode::Hash256, Value::Hash256(v)) => Ok(writer.write(v.as_bytes())?),
        (TypeCode::Amount, Value::Amount(v)) => write_amount(writer, v),
        (TypeCode::Blob, Value::Blob(v)) => Ok(write_vl(writer, v)?),
        (TypeCode::AccountId, Value::Account(v)) => Ok(write_vl(writer, v.as_bytes())?),
        (TypeCode::Object, Value::Object(map)) => {
            let mut written = write_object_body(writer, map)?;
            written += write_field_header(writer, OBJECT_END.0, OBJECT_END.1)?;
            Ok(written)
        }
        (TypeCode::Array, Value::Array(elements)) => {
            let mut written = 0;
            for (name, element) in elements.iter() {
                let def = fields::field(name)
                    .ok_or_else(|| BinaryError::UnknownField(name.clone()))?;
                written += write_field_header(writer, def.type_code.code(), def.field_code)?;
                written += write_value(writer, def.type_code, element).map_err(|e| {
                    BinaryError::Field {
                        field: def.name,
                        source: Box::new(e),
                    }
                })?;
            }
            written += write_field_header(writer, ARRAY_END.0, ARRAY_END.1)?;
            Ok(written)
        }
        (TypeCode::PathSet, Value::PathSet(paths)) => {
            let mut written = 0;
            for (i, path) in paths.iter().enumerate() {
                if i > 0 {
                    written += writer.write(&[PATH_SEPARATOR])?;
                }
                for hop in path.iter() {
                    written += writer.write(&[hop.flags()])?;
                    if let Some(account) = &hop.account {
                        written += writer.write(account.as_bytes())?;
                    }
                    if let Some(currency) = &hop.currency {
                        written += writer.write(&currency.to_bytes())?;
                    }
                    if let Some(issuer) = &hop.issuer {
                        written += writer.write(issuer.as_bytes())?;
                    }
                }
            }
            written += writer.write(&[PATH_END])?;
            Ok(written)
        }
        (TypeCode::Vector256, Value::Vector256(hashes)) => {
            let mut written = crate::ser::write_vl_prefix(writer, hashes.len() * 32)?;
            for hash in hashes.iter() {
                written += writer.write(hash.as_bytes())?;
            }
            Ok(written)
        }
        (type_code, _) => Err(BinaryError::TypeMismatch(type_code)),
    }
}

/// Read the payload of a field with the given wire type.
pub fn read_value<R>(reader: &mut R, type_code: TypeCode) -> Result<Value, BinaryError>
where
    R: Read,
{
    let exact = |reader: &mut R, width: usize| -> Result<Vec<u8>, BinaryError> {
        let mut buf = vec![0u8; width];
        reader.read_exact(&mut buf)?;
        Ok(buf)
    };
    match type_code {
        TypeCode::UInt8 => Ok(Value::U8(exact(reader, 1)?[0])),
        TypeCode::UInt16 => {
            let buf = exact(reader, 2)?;
            Ok(Value::U16(u16::from_be_bytes([buf[0], buf[1]])))
        }
        TypeCode::UInt32 => {
            let buf = exact(reader, 4)?;
            Ok(Value::U32(u32::from_be_bytes([
                buf[0], buf[1], buf[2], buf[3],
            ])))
        }
        TypeCode::UInt64 => {
            let mut buf = [0u8; 8];
            reader.read_exact(&mut buf)?;
            Ok(Value::U64(u64::from_be_bytes(buf)))
        }
        TypeCode::Hash128 => {
            let mut buf = [0u8; 16];
            reader.read_exact(&mut buf)?;
            Ok(Value::Hash128(Hash128::from_bytes(buf)))
        }
        TypeCode::Hash160 => {
            let mut buf = [0u8; 20];
            reader.read_exact(&mut buf)?;
            Ok(Value::Hash160(Hash160::from_bytes(buf)))
        }
        TypeCode::Hash256 => {
            let mut buf = [0u8; 32];
            reader.read_exact(&mut buf)?;
            Ok(Value::Hash256(Hash256::from_bytes(buf)))
        }
        TypeCode::Amount => Ok(Value::Amount(read_amount(reader)?)),
        TypeCode::Blob => Ok(Value::Blob(read_vl(reader)?)),
        TypeCode::AccountId => {
            let payload = read_vl(reader)?;
            if payload.len() != 20 {
                return Err(SerError::WrongLength {
                    expected: 20,
                    got: payload.len(),
                }
                .into());
            }
            Ok(Value::Account(AccountId::from_be_slice(&payload)))
        }
        TypeCode::Object => {
            let mut map = FieldMap::new();
            loop {
                let (t, f) = read_field_header(reader)?;
                if (t, f) == OBJECT_END {
                    break;
                }
                let def = fields::field_by_code(t, f).ok_or(BinaryError::UnknownFieldCode {
                    type_code: t,
                    field_code: f,
                })?;
                map.insert(def.name, read_value(reader, def.type_code)?);
            }
            Ok(Value::Object(map))
        }
        TypeCode::Array => {
            let mut elements = vec![];
            loop {
                let (t, f) = read_field_header(reader)?;
                if (t, f) == ARRAY_END {
                    break;
                }
                let def = fields::field_by_code(t, f).ok_or(BinaryError::UnknownFieldCode {
                    type_code: t,
                    field_code: f,
                })?;
                elements.push((def.name.to_string(), read_value(reader, def.type_code)?));
            }
            Ok(Value::Array(elements))
        }
        TypeCode::PathSet => {
            let mut paths: Vec<Vec<PathHop>> = vec![];
            let mut current: Vec<PathHop> = vec![];
            loop {
                let mut buf = [0u8; 1];
                reader.read_exact(&mut buf)?;
                match buf[0] {
                    PATH_END => {
                        if !current.is_empty() || !paths.is_empty() {
                            paths.push(current);
                        }
                        break;
                    }
                    PATH_SEPARATOR => {
                        paths.push(std::mem::take(&mut current));
                    }
                    flags => {
                        if flags & !(HOP_ACCOUNT | HOP_CURRENCY | HOP_ISSUER) != 0 {
                            return Err(BinaryError::InvalidPathHop(flags));
                        }
                        let mut hop = PathHop::default();
                        if flags & HOP_ACCOUNT != 0 {
                            let mut buf = [0u8; 20];
                            reader.read_exact(&mut buf)?;
                            hop.account = Some(AccountId::from_bytes(buf));
                        }
                        if flags & HOP_CURRENCY != 0 {
                            let mut buf = [0u8; 20];
                            reader.read_exact(&mut buf)?;
                            hop.currency = Some(Currency::from_bytes(&buf)?);
                        }
                        if flags & HOP_ISSUER != 0 {
                            let mut buf = [0u8; 20];
                            reader.read_exact(&mut buf)?;
                            hop.issuer = Some(AccountId::from_bytes(buf));
                        }
                        current.push(hop);
                    }
                }
            }
            Ok(Value::PathSet(paths))
        }
        TypeCode::Vector256 => {
            let payload = read_vl(reader)?;
            if payload.len() % 32 != 0 {
                return Err(SerError::WrongLength {
                    expected: payload.len() / 32 * 32,
                    got: payload.len(),
                }
                .into());
            }
            let hashes = payload
                .chunks_exact(32)
                .map(Hash256::from_be_slice)
                .collect();
            Ok(Value::Vector256(hashes))
        }
    }
}

fn write_field<W>(writer: &mut W, def: &FieldDef, value: &Value) -> Result<usize, BinaryError>
where
    W: Write,
{
    let mut written = write_field_header(writer, def.type_code.code(), def.field_code)?;
    written += write_value(writer, def.type_code, value)?;
    Ok(written)
}

// Sort the map's fields canonically and emit them. Shared between nested
// objects and schema-less top-level serialization.
fn write_object_body<W>(writer: &mut W, map: &FieldMap) -> Result<usize, BinaryError>
where
    W: Write,
{
    let mut entries: Vec<(&'static FieldDef, &Value)> = vec![];
    for (name, value) in map.iter() {
        let def =
            fields::field(name).ok_or_else(|| BinaryError::UnknownField(name.clone()))?;
        entries.push((def, value));
    }
    entries.sort_by_key(|(def, _)| def.sort_key());
    let mut written = 0;
    for (def, value) in entries {
        written += write_field(writer, def, value).map_err(|e| BinaryError::Field {
            field: def.name,
            source: Box::new(e),
        })?;
    }
    Ok(written)
}

/// A canonically serialized object: the wire bytes of a transaction or ledger
/// entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedObject {
    bytes: Vec<u8>,
}

impl SerializedObject {
    /// Serialize a transaction's field map under the named schema.
    ///
    /// The `TransactionType` field is supplied by the schema; any value under
    /// that name in the map is ignored. Fields outside the schema fail with
    /// `UnknownField`, absent required fields with `MissingField`, and
    /// per-field failures are annotated with the field's name.
    pub fn from_tx(tx_name: &str, tx: &FieldMap) -> Result<Self, BinaryError> {
        let schema = fields::schema(tx_name)
            .ok_or_else(|| BinaryError::UnknownTransactionType(tx_name.to_string()))?;
        for name in tx.keys() {
            if name != "TransactionType" && schema.slot(name).is_none() {
                return Err(BinaryError::UnknownField(name.clone()));
            }
        }
        let tx_type = Value::U16(schema.tx_type);
        let mut entries: Vec<(&'static FieldDef, &Value)> = vec![];
        for slot in schema.fields.iter() {
            if slot.field.name == "TransactionType" {
                entries.push((slot.field, &tx_type));
                continue;
            }
            match tx.get(slot.field.name) {
                Some(value) => entries.push((slot.field, value)),
                None if slot.requirement == Requirement::Required => {
                    return Err(BinaryError::MissingField(slot.field.name));
                }
                None => {}
            }
        }
        entries.sort_by_key(|(def, _)| def.sort_key());
        let mut bytes = vec![];
        for (def, value) in entries {
            write_field(&mut bytes, def, value).map_err(|e| BinaryError::Field {
                field: def.name,
                source: Box::new(e),
            })?;
        }
        Ok(SerializedObject { bytes })
    }

    /// Serialize a field map without a schema: every field the map holds, in
    /// canonical order, with no required-field checks.
    pub fn from_map(map: &FieldMap) -> Result<Self, BinaryError> {
        let mut bytes = vec![];
        write_object_body(&mut bytes, map)?;
        Ok(SerializedObject { bytes })
    }

    /// Wrap raw wire bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        SerializedObject { bytes }
    }

    /// The wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The uppercase hex rendition of the wire bytes.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.bytes)
    }

    /// The hash signed by the transaction's signer: SHA-512-half over the
    /// namespace prefix followed by the wire bytes.
    pub fn signing_hash(&self, prefix: u32) -> Hash256 {
        sha512_half(prefix, &self.bytes)
    }

    /// The identifying hash of a signed transaction.
    pub fn tx_id(&self) -> Hash256 {
        sha512_half(hash_prefix::TX_ID, &self.bytes)
    }

    /// Parse the wire bytes back into a field map. Fails on unknown field
    /// codes and malformed payloads; consumes the whole buffer.
    pub fn parse(&self) -> Result<FieldMap, BinaryError> {
        let mut cursor = Cursor::new(&self.bytes);
        let mut map = FieldMap::new();
        while (cursor.position() as usize) < self.bytes.len() {
            let (t, f) = read_field_header(&mut cursor)?;
            let def = fields::field_by_code(t, f).ok_or(BinaryError::UnknownFieldCode {
                type_code: t,
                field_code: f,
            })?;
            let value = read_value(&mut cursor, def.type_code).map_err(|e| BinaryError::Field {
                field: def.name,
                source: Box::new(e),
            })?;
            map.insert(def.name, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hex_of<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<usize, BinaryError>,
    {
        let mut buf = vec![];
        f(&mut buf).unwrap();
        hex::encode_upper(buf)
    }

    fn account(n: u64) -> AccountId {
        AccountId::from_be_slice(&n.to_be_bytes())
    }

    #[test]
    fn it_packs_field_headers() {
        let cases: &[(u8, u8, &[u8])] = &[
            (6, 1, &[0x61]),
            (2, 20, &[0x20, 0x14]),
            (19, 1, &[0x01, 0x13]),
            (16, 3, &[0x03, 0x10]),
            (16, 16, &[0x00, 0x10, 0x10]),
        ];
        for case in cases.iter() {
            let mut buf = vec![];
            write_field_header(&mut buf, case.0, case.1).unwrap();
            assert_eq!(&buf[..], case.2);
            assert_eq!(
                read_field_header(&mut &buf[..]).unwrap(),
                (case.0, case.1)
            );
        }
    }

    #[test]
    fn it_serializes_integers_big_endian() {
        let cases = [
            (TypeCode::UInt8, Value::U8(0xAB), "AB"),
            (TypeCode::UInt16, Value::U16(123), "007B"),
            (TypeCode::UInt32, Value::U32(123), "0000007B"),
            (TypeCode::UInt64, Value::U64(123), "000000000000007B"),
        ];
        for case in cases.iter() {
            assert_eq!(hex_of(|buf| write_value(buf, case.0, &case.1)), case.2);
        }
    }

    #[test]
    fn it_serializes_native_amounts() {
        let cases = [
            ("1", "4000000000000001"),
            ("-1", "0000000000000001"),
            ("0", "4000000000000000"),
        ];
        for case in cases.iter() {
            let amount = Amount::from_drops(case.0.parse().unwrap()).unwrap();
            let hex = hex_of(|buf| write_amount(buf, &amount));
            assert_eq!(hex, case.1, "case {}", case.0);
            let parsed = read_amount(&mut hex::decode(&hex).unwrap().as_slice()).unwrap();
            assert_eq!(parsed, amount);
        }
    }

    #[test]
    fn it_rejects_native_amounts_beyond_the_wire_width() {
        // 2^62 - 1 drops is the widest magnitude the field can carry.
        let cases = [
            (4_611_686_018_427_387_903_i64, "7FFFFFFFFFFFFFFF"),
            (-4_611_686_018_427_387_903, "3FFFFFFFFFFFFFFF"),
        ];
        for case in cases.iter() {
            let amount = Amount::from_drops(case.0).unwrap();
            let hex = hex_of(|buf| write_amount(buf, &amount));
            assert_eq!(hex, case.1, "case {}", case.0);
            let parsed = read_amount(&mut hex::decode(&hex).unwrap().as_slice()).unwrap();
            assert_eq!(parsed, amount);
        }

        let rejected = [
            4_611_686_018_427_387_904_i64,
            -4_611_686_018_427_387_904,
            5_000_000_000_000_000_000,
        ];
        for drops in rejected.iter() {
            let amount = Amount::from_drops(*drops).unwrap();
            let mut buf = Vec::new();
            assert!(
                matches!(
                    write_amount(&mut buf, &amount),
                    Err(BinaryError::Amount(AmountError::NativeOutOfRange))
                ),
                "case {}",
                drops
            );
        }
    }

    #[test]
    fn it_serializes_issued_amounts() {
        let issuer = "B5F762798A53D543A014CAF8B297CFF8F2F937E8";
        let cases = [
            (
                format!("1/USD/{}", issuer),
                format!(
                    "D4838D7EA4C68000{}{}",
                    "0000000000000000000000005553440000000000", issuer
                ),
            ),
            (
                format!("-1/USD/{}", issuer),
                format!(
                    "94838D7EA4C68000{}{}",
                    "0000000000000000000000005553440000000000", issuer
                ),
            ),
            (
                format!("9999999999999999e80/USD/{}", issuer),
                format!(
                    "EC6386F26FC0FFFF{}{}",
                    "0000000000000000000000005553440000000000", issuer
                ),
            ),
            (
                format!("87654321.12345678/EUR/{}", issuer),
                format!(
                    "D65F241D335BF24E{}{}",
                    "0000000000000000000000004555520000000000", issuer
                ),
            ),
            (
                format!("0/USD/{}", issuer),
                format!(
                    "8000000000000000{}{}",
                    "0000000000000000000000005553440000000000", issuer
                ),
            ),
        ];
        for case in cases.iter() {
            let amount = Amount::parse(&case.0).unwrap();
            let hex = hex_of(|buf| write_amount(buf, &amount));
            assert_eq!(hex, case.1, "case {}", case.0);
            let parsed = read_amount(&mut hex::decode(&hex).unwrap().as_slice()).unwrap();
            assert_eq!(parsed, amount);
        }
    }

    #[test]
    fn it_serializes_historical_issued_xrp() {
        // "XRP" named as an issued code occupies the currency bytes verbatim
        let amount = Amount::parse("1000/XRP/E4FE687C90257D3D2D694C8531CDEECBE84F3367").unwrap();
        let hex = hex_of(|buf| write_amount(buf, &amount));
        assert_eq!(
            hex,
            "D5438D7EA4C680000000000000000000000000005852500000000000E4FE687C90257D3D2D694C8531CDEECBE84F3367"
        );
    }

    #[test]
    fn it_rejects_non_canonical_wire_amounts() {
        // issued bit set, mantissa below 10^15
        let mut bytes = hex::decode(
            "D48000000000000100000000000000000000000055534400000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert!(matches!(
            read_amount(&mut bytes.as_slice()),
            Err(BinaryError::Amount(AmountError::BadValue(_)))
        ));
        // exponent past the canonical maximum
        bytes = hex::decode(
            "EC838D7EA4C6800000000000000000000000000055534400000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert!(matches!(
            read_amount(&mut bytes.as_slice()),
            Err(BinaryError::Amount(AmountError::ExponentOutOfRange(81)))
        ));
    }

    #[test]
    fn it_serializes_accounts_with_a_length_prefix() {
        let account = AccountId::from_hex("B5F762798A53D543A014CAF8B297CFF8F2F937E8").unwrap();
        let hex = hex_of(|buf| {
            write_value(buf, TypeCode::AccountId, &Value::Account(account))
        });
        assert_eq!(hex, "14B5F762798A53D543A014CAF8B297CFF8F2F937E8");
        let parsed =
            read_value(&mut hex::decode(&hex).unwrap().as_slice(), TypeCode::AccountId).unwrap();
        assert_eq!(parsed, Value::Account(account));
    }

    #[test]
    fn it_serializes_objects_sorted_with_an_end_marker() {
        // insertion order differs from canonical order
        let map = FieldMap::new()
            .with("QualityOut", Value::U32(789))
            .with("DestinationTag", Value::U32(123))
            .with("QualityIn", Value::U32(456));
        let hex = hex_of(|buf| write_value(buf, TypeCode::Object, &Value::Object(map.clone())));
        assert_eq!(hex, "2E0000007B2014000001C8201500000315E1");
        let parsed =
            read_value(&mut hex::decode(&hex).unwrap().as_slice(), TypeCode::Object).unwrap();
        assert_eq!(parsed, Value::Object(map));
    }

    #[test]
    fn it_serializes_an_object_with_amounts() {
        let map = FieldMap::new()
            .with(
                "TakerPays",
                Value::Amount(
                    Amount::parse("87654321.12345678/EUR/rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh")
                        .unwrap(),
                ),
            )
            .with("TakerGets", Value::Amount(Amount::from_drops(213).unwrap()))
            .with("Fee", Value::Amount(Amount::from_drops(789).unwrap()));
        let hex = hex_of(|buf| write_value(buf, TypeCode::Object, &Value::Object(map)));
        assert_eq!(
            hex,
            "64D65F241D335BF24E0000000000000000000000004555520000000000B5F762798A53D543A014CAF8B297CFF8F2F937E86540000000000000D5684000000000000315E1"
        );
    }

    #[test]
    fn it_serializes_empty_containers() {
        assert_eq!(
            hex_of(|buf| write_value(buf, TypeCode::Object, &Value::Object(FieldMap::new()))),
            "E1"
        );
        assert_eq!(
            hex_of(|buf| write_value(buf, TypeCode::Array, &Value::Array(vec![]))),
            "F1"
        );
        assert_eq!(
            hex_of(|buf| write_value(buf, TypeCode::PathSet, &Value::PathSet(vec![]))),
            "00"
        );
    }

    #[test]
    fn it_serializes_arrays() {
        let elements = vec![
            (
                "TakerPays".to_string(),
                Value::Amount(Amount::from_drops(123).unwrap()),
            ),
            (
                "TakerGets".to_string(),
                Value::Amount(Amount::from_drops(456).unwrap()),
            ),
            (
                "Fee".to_string(),
                Value::Amount(Amount::from_drops(789).unwrap()),
            ),
        ];
        let hex = hex_of(|buf| write_value(buf, TypeCode::Array, &Value::Array(elements.clone())));
        assert_eq!(hex, "64400000000000007B6540000000000001C8684000000000000315F1");
        let parsed =
            read_value(&mut hex::decode(&hex).unwrap().as_slice(), TypeCode::Array).unwrap();
        match parsed {
            Value::Array(parsed) => {
                assert_eq!(parsed.len(), 3);
                assert_eq!(parsed[0].0, "TakerPays");
                assert_eq!(
                    parsed[0].1,
                    Value::Amount(Amount::from_drops(123).unwrap())
                );
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn it_serializes_path_sets() {
        let paths = vec![
            vec![PathHop {
                account: Some(account(123)),
                currency: Some(Currency::Iso(*b"USD")),
                issuer: Some(account(789)),
            }],
            vec![
                PathHop {
                    account: Some(account(123)),
                    currency: Some(Currency::Iso(*b"BTC")),
                    issuer: Some(account(789)),
                },
                PathHop {
                    account: Some(account(987)),
                    currency: Some(Currency::Iso(*b"EUR")),
                    issuer: Some(account(321)),
                },
            ],
        ];
        let hex = hex_of(|buf| write_value(buf, TypeCode::PathSet, &Value::PathSet(paths.clone())));
        assert_eq!(
            hex,
            "31000000000000000000000000000000000000007B00000000000000000000000055534400000000000000000000000000000000000000000000000315FF31000000000000000000000000000000000000007B000000000000000000000000425443000000000000000000000000000000000000000000000003153100000000000000000000000000000000000003DB0000000000000000000000004555520000000000000000000000000000000000000000000000014100"
        );
        let parsed =
            read_value(&mut hex::decode(&hex).unwrap().as_slice(), TypeCode::PathSet).unwrap();
        assert_eq!(parsed, Value::PathSet(paths));
    }

    #[test]
    fn it_serializes_a_path_through_the_native_currency() {
        let paths = vec![
            vec![PathHop {
                account: Some(account(123)),
                currency: Some(Currency::Iso(*b"USD")),
                issuer: Some(account(789)),
            }],
            vec![
                PathHop {
                    account: None,
                    currency: Some(Currency::Xrp),
                    issuer: None,
                },
                PathHop {
                    account: Some(account(987)),
                    currency: Some(Currency::Iso(*b"EUR")),
                    issuer: Some(account(321)),
                },
            ],
        ];
        let hex = hex_of(|buf| write_value(buf, TypeCode::PathSet, &Value::PathSet(paths.clone())));
        assert_eq!(
            hex,
            "31000000000000000000000000000000000000007B00000000000000000000000055534400000000000000000000000000000000000000000000000315FF1000000000000000000000000000000000000000003100000000000000000000000000000000000003DB0000000000000000000000004555520000000000000000000000000000000000000000000000014100"
        );
        let parsed =
            read_value(&mut hex::decode(&hex).unwrap().as_slice(), TypeCode::PathSet).unwrap();
        assert_eq!(parsed, Value::PathSet(paths));
    }

    #[test]
    fn it_serializes_vector256_fields() {
        let hash =
            Hash256::from_hex("0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap();
        let hex = hex_of(|buf| {
            write_value(buf, TypeCode::Vector256, &Value::Vector256(vec![hash, hash]))
        });
        assert_eq!(
            hex,
            format!("40{}{}", hash.to_hex(), hash.to_hex())
        );
        let parsed =
            read_value(&mut hex::decode(&hex).unwrap().as_slice(), TypeCode::Vector256).unwrap();
        assert_eq!(parsed, Value::Vector256(vec![hash, hash]));
    }

    #[test]
    fn it_rejects_type_mismatches() {
        let mut buf = vec![];
        match write_value(&mut buf, TypeCode::UInt32, &Value::U16(1)) {
            Err(BinaryError::TypeMismatch(TypeCode::UInt32)) => {}
            other => panic!("expected TypeMismatch, got {:?}", other.map(|_| ())),
        }
    }
}
