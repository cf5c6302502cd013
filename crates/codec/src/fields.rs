//! Wire field definitions and transaction schemas.
//!
//! Every serializable field has a (type code, field code) pair. The pair packs
//! into the compact field header, and sorting by it ascending yields the
//! canonical wire order regardless of how callers assembled their field maps.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Wire type codes. The discriminants are fixed by the ledger protocol.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum TypeCode {
    /// 16-bit unsigned integer.
    UInt16 = 1,
    /// 32-bit unsigned integer.
    UInt32 = 2,
    /// 64-bit unsigned integer.
    UInt64 = 3,
    /// 128-bit hash.
    Hash128 = 4,
    /// 256-bit hash.
    Hash256 = 5,
    /// Native or issued amount.
    Amount = 6,
    /// Variable-length byte string.
    Blob = 7,
    /// Length-prefixed account identifier.
    AccountId = 8,
    /// Nested object, terminated by an end marker.
    Object = 14,
    /// Array of fields, terminated by an end marker.
    Array = 15,
    /// 8-bit unsigned integer.
    UInt8 = 16,
    /// 160-bit hash.
    Hash160 = 17,
    /// List of multi-hop payment paths.
    PathSet = 18,
    /// Length-prefixed list of 256-bit hashes.
    Vector256 = 19,
}

impl TypeCode {
    /// The numeric code on the wire.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a type code by its numeric value.
    pub fn from_code(code: u8) -> Option<TypeCode> {
        match code {
            1 => Some(TypeCode::UInt16),
            2 => Some(TypeCode::UInt32),
            3 => Some(TypeCode::UInt64),
            4 => Some(TypeCode::Hash128),
            5 => Some(TypeCode::Hash256),
            6 => Some(TypeCode::Amount),
            7 => Some(TypeCode::Blob),
            8 => Some(TypeCode::AccountId),
            14 => Some(TypeCode::Object),
            15 => Some(TypeCode::Array),
            16 => Some(TypeCode::UInt8),
            17 => Some(TypeCode::Hash160),
            18 => Some(TypeCode::PathSet),
            19 => Some(TypeCode::Vector256),
            _ => None,
        }
    }
}

/// A named wire field.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FieldDef {
    /// The field's name in JSON renditions.
    pub name: &'static str,
    /// The wire type.
    pub type_code: TypeCode,
    /// The field code within the type.
    pub field_code: u8,
}

impl FieldDef {
    /// The canonical sort key: type code first, field code second.
    pub fn sort_key(&self) -> (u8, u8) {
        (self.type_code.code(), self.field_code)
    }
}

macro_rules! fields {
    ($(($name:expr, $ty:ident, $code:expr),)*) => {
        &[ $( FieldDef { name: $name, type_code: TypeCode::$ty, field_code: $code }, )* ]
    };
}

/// Every field the codec knows about.
pub static FIELDS: &[FieldDef] = fields![
    ("CloseResolution", UInt8, 1),
    ("TemplateEntryType", UInt8, 2),
    ("TransactionResult", UInt8, 3),
    ("LedgerEntryType", UInt16, 1),
    ("TransactionType", UInt16, 2),
    ("Flags", UInt32, 2),
    ("SourceTag", UInt32, 3),
    ("Sequence", UInt32, 4),
    ("PreviousTxnLgrSeq", UInt32, 5),
    ("LedgerSequence", UInt32, 6),
    ("CloseTime", UInt32, 7),
    ("ParentCloseTime", UInt32, 8),
    ("SigningTime", UInt32, 9),
    ("Expiration", UInt32, 10),
    ("TransferRate", UInt32, 11),
    ("WalletSize", UInt32, 12),
    ("OwnerCount", UInt32, 13),
    ("DestinationTag", UInt32, 14),
    ("HighQualityIn", UInt32, 16),
    ("HighQualityOut", UInt32, 17),
    ("LowQualityIn", UInt32, 18),
    ("LowQualityOut", UInt32, 19),
    ("QualityIn", UInt32, 20),
    ("QualityOut", UInt32, 21),
    ("StampEscrow", UInt32, 22),
    ("BondAmount", UInt32, 23),
    ("LoadFee", UInt32, 24),
    ("OfferSequence", UInt32, 25),
    ("FirstLedgerSequence", UInt32, 26),
    ("LastLedgerSequence", UInt32, 27),
    ("TransactionIndex", UInt32, 28),
    ("OperationLimit", UInt32, 29),
    ("ReferenceFeeUnits", UInt32, 30),
    ("ReserveBase", UInt32, 31),
    ("ReserveIncrement", UInt32, 32),
    ("IndexNext", UInt64, 1),
    ("IndexPrevious", UInt64, 2),
    ("BookNode", UInt64, 3),
    ("OwnerNode", UInt64, 4),
    ("BaseFee", UInt64, 5),
    ("ExchangeRate", UInt64, 6),
    ("LowNode", UInt64, 7),
    ("HighNode", UInt64, 8),
    ("EmailHash", Hash128, 1),
    ("LedgerHash", Hash256, 1),
    ("ParentHash", Hash256, 2),
    ("TransactionHash", Hash256, 3),
    ("AccountHash", Hash256, 4),
    ("PreviousTxnID", Hash256, 5),
    ("LedgerIndex", Hash256, 6),
    ("WalletLocator", Hash256, 7),
    ("RootIndex", Hash256, 8),
    ("BookDirectory", Hash256, 16),
    ("InvoiceID", Hash256, 17),
    ("Amount", Amount, 1),
    ("Balance", Amount, 2),
    ("LimitAmount", Amount, 3),
    ("TakerPays", Amount, 4),
    ("TakerGets", Amount, 5),
    ("LowLimit", Amount, 6),
    ("HighLimit", Amount, 7),
    ("Fee", Amount, 8),
    ("SendMax", Amount, 9),
    ("PublicKey", Blob, 1),
    ("MessageKey", Blob, 2),
    ("SigningPubKey", Blob, 3),
    ("TxnSignature", Blob, 4),
    ("Generator", Blob, 5),
    ("Signature", Blob, 6),
    ("Domain", Blob, 7),
    ("FundCode", Blob, 8),
    ("RemoveCode", Blob, 9),
    ("ExpireCode", Blob, 10),
    ("CreateCode", Blob, 11),
    ("MemoType", Blob, 12),
    ("MemoData", Blob, 13),
    ("MemoFormat", Blob, 14),
    ("Account", AccountId, 1),
    ("Owner", AccountId, 2),
    ("Destination", AccountId, 3),
    ("Issuer", AccountId, 4),
    ("Target", AccountId, 7),
    ("RegularKey", AccountId, 8),
    ("TransactionMetaData", Object, 2),
    ("CreatedNode", Object, 3),
    ("DeletedNode", Object, 4),
    ("ModifiedNode", Object, 5),
    ("PreviousFields", Object, 6),
    ("FinalFields", Object, 7),
    ("NewFields", Object, 8),
    ("TemplateEntry", Object, 9),
    ("Memo", Object, 10),
    ("SigningAccounts", Array, 2),
    ("TxnSignatures", Array, 3),
    ("Signatures", Array, 4),
    ("Template", Array, 5),
    ("Necessary", Array, 6),
    ("Sufficient", Array, 7),
    ("AffectedNodes", Array, 8),
    ("Memos", Array, 9),
    ("TakerPaysCurrency", Hash160, 1),
    ("TakerPaysIssuer", Hash160, 2),
    ("TakerGetsCurrency", Hash160, 3),
    ("TakerGetsIssuer", Hash160, 4),
    ("Paths", PathSet, 1),
    ("Indexes", Vector256, 1),
    ("Hashes", Vector256, 2),
    ("Features", Vector256, 3),
];

static FIELDS_BY_NAME: Lazy<HashMap<&'static str, &'static FieldDef>> =
    Lazy::new(|| FIELDS.iter().map(|f| (f.name, f)).collect());

static FIELDS_BY_CODE: Lazy<HashMap<(u8, u8), &'static FieldDef>> =
    Lazy::new(|| FIELDS.iter().map(|f| (f.sort_key(), f)).collect());

/// Look up a field definition by name.
pub fn field(name: &str) -> Option<&'static FieldDef> {
    FIELDS_BY_NAME.get(name).copied()
}

/// Look up a field definition by its (type code, field code) pair.
pub fn field_by_code(type_code: u8, field_code: u8) -> Option<&'static FieldDef> {
    FIELDS_BY_CODE.get(&(type_code, field_code)).copied()
}

/// Presence rules for a field within a transaction schema.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Requirement {
    /// Must be present; serialization fails without it.
    Required,
    /// May be omitted.
    Optional,
    /// May be omitted, in which case a protocol default applies.
    Default,
}

/// A field slot within a transaction schema.
#[derive(Debug, Copy, Clone)]
pub struct SchemaField {
    /// The field definition.
    pub field: &'static FieldDef,
    /// Whether the field must be present.
    pub requirement: Requirement,
}

/// The field layout of one transaction type.
#[derive(Debug, Clone)]
pub struct TxSchema {
    /// The transaction type's name.
    pub name: &'static str,
    /// The numeric transaction type.
    pub tx_type: u16,
    /// The fields the transaction may carry.
    pub fields: Vec<SchemaField>,
}

impl TxSchema {
    /// Look up a schema slot by field name.
    pub fn slot(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|s| s.field.name == name)
    }
}

fn schema_field(name: &'static str, requirement: Requirement) -> SchemaField {
    SchemaField {
        field: field(name).unwrap_or_else(|| panic!("unknown field in schema: {}", name)),
        requirement,
    }
}

fn tx_schema(name: &'static str, tx_type: u16, extra: &[(&'static str, Requirement)]) -> TxSchema {
    use Requirement::*;
    // fields common to every transaction
    let mut fields = vec![
        schema_field("TransactionType", Required),
        schema_field("Flags", Default),
        schema_field("SourceTag", Optional),
        schema_field("Account", Required),
        schema_field("Sequence", Required),
        schema_field("Fee", Required),
        schema_field("OperationLimit", Optional),
        schema_field("SigningPubKey", Required),
        schema_field("TxnSignature", Optional),
    ];
    fields.extend(extra.iter().map(|(n, r)| schema_field(n, *r)));
    TxSchema {
        name,
        tx_type,
        fields,
    }
}

/// The transaction schemas, keyed by transaction type name.
pub static SCHEMAS: Lazy<HashMap<&'static str, TxSchema>> = Lazy::new(|| {
    use Requirement::*;
    let schemas = vec![
        tx_schema(
            "Payment",
            0,
            &[
                ("Amount", Required),
                ("Destination", Required),
                ("DestinationTag", Optional),
                ("InvoiceID", Optional),
                ("SendMax", Optional),
                ("Paths", Optional),
            ],
        ),
        tx_schema(
            "AccountSet",
            3,
            &[
                ("EmailHash", Optional),
                ("WalletLocator", Optional),
                ("WalletSize", Optional),
                ("MessageKey", Optional),
                ("Domain", Optional),
                ("TransferRate", Optional),
            ],
        ),
        tx_schema("SetRegularKey", 5, &[("RegularKey", Optional)]),
        tx_schema(
            "OfferCreate",
            7,
            &[
                ("TakerPays", Required),
                ("TakerGets", Required),
                ("Expiration", Optional),
                ("OfferSequence", Optional),
            ],
        ),
        tx_schema("OfferCancel", 8, &[("OfferSequence", Required)]),
        tx_schema(
            "TrustSet",
            20,
            &[
                ("LimitAmount", Optional),
                ("QualityIn", Optional),
                ("QualityOut", Optional),
            ],
        ),
    ];
    schemas.into_iter().map(|s| (s.name, s)).collect()
});

/// Look up a transaction schema by type name.
pub fn schema(name: &str) -> Option<&'static TxSchema> {
    SCHEMAS.get(name)
}
