//! Fixed-width unsigned integers stored as big-endian byte arrays.
//!
//! These are opaque identifiers on the ledger (hashes, account IDs, currency codes),
//! not arithmetic types.

use crate::enc::{
    decode_base58check, encode_base58check, EncodingError, EncodingResult, Version,
};
use crate::wrap_uint;

/// A `W`-byte unsigned integer in big-endian byte order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Uint<const W: usize>([u8; W]);

impl<const W: usize> Default for Uint<W> {
    fn default() -> Self {
        Self([0u8; W])
    }
}

impl<const W: usize> Uint<W> {
    /// The all-zero value.
    pub const ZERO: Uint<W> = Uint([0u8; W]);

    /// Wrap a byte array.
    pub const fn from_bytes(bytes: [u8; W]) -> Self {
        Self(bytes)
    }

    /// Interpret a big-endian slice, left-padding with zeros if it is narrower
    /// than `W` and keeping the low-order `W` bytes if wider.
    pub fn from_be_slice(slice: &[u8]) -> Self {
        let mut buf = [0u8; W];
        if slice.len() >= W {
            buf.copy_from_slice(&slice[slice.len() - W..]);
        } else {
            buf[W - slice.len()..].copy_from_slice(slice);
        }
        Self(buf)
    }

    /// Parse from exactly `2 * W` hex digits.
    pub fn from_hex(s: &str) -> EncodingResult<Self> {
        let decoded = hex::decode(s)?;
        if decoded.len() != W {
            return Err(EncodingError::WrongPayloadLength {
                expected: W,
                got: decoded.len(),
            });
        }
        Ok(Self::from_be_slice(&decoded))
    }

    /// The uppercase hex rendition of the value.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// A reference to the underlying bytes.
    pub const fn as_bytes(&self) -> &[u8; W] {
        &self.0
    }

    /// True if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

wrap_uint!(
    /// A 128-bit hash, e.g. an account's email hash.
    Hash128,
    16
);

wrap_uint!(
    /// A 160-bit hash, e.g. an order book's currency or issuer.
    Hash160,
    20
);

wrap_uint!(
    /// A 256-bit hash, e.g. a transaction, ledger, or index hash.
    Hash256,
    32
);

wrap_uint!(
    /// A 20-byte account identifier, rendered as a Base58Check address
    /// starting with `r`.
    AccountId,
    20
);

impl AccountId {
    /// The address of the all-zero account, a conventional "nobody".
    pub const ACCOUNT_ZERO: &'static str = "rrrrrrrrrrrrrrrrrrrrrhoLvTp";

    /// The address of account one, used as a placeholder issuer.
    pub const ACCOUNT_ONE: &'static str = "rrrrrrrrrrrrrrrrrrrrBZbvji";

    /// The account identifier with the low byte set to one.
    pub const ONE: AccountId = {
        let mut buf = [0u8; 20];
        buf[19] = 1;
        AccountId::from_bytes(buf)
    };

    /// Decode a Base58Check address into an account identifier.
    pub fn from_address(addr: &str) -> EncodingResult<Self> {
        let payload = decode_base58check(Version::AccountId, addr)?;
        if payload.len() != 20 {
            return Err(EncodingError::WrongPayloadLength {
                expected: 20,
                got: payload.len(),
            });
        }
        Ok(Self::from_be_slice(&payload))
    }

    /// Render the identifier as a Base58Check address.
    pub fn to_address(&self) -> String {
        encode_base58check(Version::AccountId, self.as_bytes())
    }

    /// Parse either 40 hex digits or a Base58Check address. A leading `r`
    /// selects the address form, since no 40-digit hex string starts with `r`.
    pub fn parse(s: &str) -> EncodingResult<Self> {
        if s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Self::from_hex(s)
        } else if s.starts_with('r') {
            Self::from_address(s)
        } else {
            Err(EncodingError::UnknownFormat(s.to_string()))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ser::ByteFormat;

    #[test]
    fn it_pads_and_truncates_be_slices() {
        let h = Hash160::from_be_slice(&[1, 2, 3]);
        let mut expected = [0u8; 20];
        expected[17..].copy_from_slice(&[1, 2, 3]);
        assert_eq!(h.as_bytes(), &expected);

        let wide = [0xabu8; 24];
        let h = Hash160::from_be_slice(&wide);
        assert_eq!(h.as_bytes(), &[0xabu8; 20]);
    }

    #[test]
    fn it_requires_exact_width_hex() {
        assert!(Hash256::from_hex(&"00".repeat(32)).is_ok());
        match Hash256::from_hex("0011") {
            Err(EncodingError::WrongPayloadLength { expected: 32, got: 2 }) => {}
            other => panic!("expected WrongPayloadLength, got {:?}", other),
        }
    }

    #[test]
    fn it_round_trips_byte_format() {
        let cases = [
            "F0E0D0C0B0A090807060504030201000F0E0D0C0B0A090807060504030201000",
            "0000000000000000000000000000000000000000000000000000000000000001",
        ];
        for case in cases.iter() {
            let h = Hash256::deserialize_hex(case).unwrap();
            assert_eq!(h.serialize_hex(), *case);
            assert_eq!(h.serialized_length(), 32);
        }
    }

    #[test]
    fn it_renders_the_zero_account_address() {
        assert_eq!(AccountId::ZERO.to_address(), AccountId::ACCOUNT_ZERO);
        assert_eq!(AccountId::ONE.to_address(), AccountId::ACCOUNT_ONE);
        assert_eq!(
            AccountId::from_bytes([0xff; 20]).to_address(),
            "rQLbzfJH5BT1FS9apRLKV3G8dWEA5njaQi"
        );
    }

    #[test]
    fn it_parses_hex_and_address_forms() {
        let from_hex = AccountId::parse(&"00".repeat(20)).unwrap();
        let from_addr = AccountId::parse(AccountId::ACCOUNT_ZERO).unwrap();
        assert_eq!(from_hex, from_addr);
        assert_eq!(from_hex, AccountId::ZERO);

        match AccountId::parse("not an account") {
            Err(EncodingError::UnknownFormat(_)) => {}
            other => panic!("expected UnknownFormat, got {:?}", other),
        }
    }
}
