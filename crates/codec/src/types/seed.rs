//! Family seeds, the 16-byte secrets from which account keypairs are derived.

use crate::enc::{
    decode_base58check, encode_base58check, EncodingError, EncodingResult, Version,
};
use crate::wrap_uint;

wrap_uint!(
    /// A 16-byte family seed, rendered as a Base58Check string starting with `s`.
    Seed,
    16
);

impl Seed {
    /// Decode a Base58Check seed string.
    pub fn from_base58check(s: &str) -> EncodingResult<Self> {
        let payload = decode_base58check(Version::FamilySeed, s)?;
        if payload.len() != 16 {
            return Err(EncodingError::WrongPayloadLength {
                expected: 16,
                got: payload.len(),
            });
        }
        Ok(Self::from_be_slice(&payload))
    }

    /// Render the seed as a Base58Check string.
    pub fn to_base58check(&self) -> String {
        encode_base58check(Version::FamilySeed, self.as_bytes())
    }

    /// Parse either 32 hex digits or a Base58Check seed. A leading `s` selects
    /// the Base58Check form.
    pub fn parse(s: &str) -> EncodingResult<Self> {
        if s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Self::from_hex(s)
        } else if s.starts_with('s') {
            Self::from_base58check(s)
        } else {
            Err(EncodingError::UnknownFormat(s.to_string()))
        }
    }
}
