//! Base58Check encoding with the ledger's alphabet.
//!
//! Payloads are prefixed with a single version byte and suffixed with the first 4
//! bytes of the double SHA-256 of everything preceding the checksum. The alphabet
//! starts with `r`, so encoded account identifiers begin with `r` and family seeds
//! (version 33) with `s`.

use thiserror::Error;

use crate::hashes::hash256;

/// Errors raised while encoding or decoding identifiers.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Bubbled up from the base58 library.
    #[error(transparent)]
    Base58Error(#[from] bs58::decode::Error),

    /// Bubbled up from the hex library.
    #[error(transparent)]
    HexError(#[from] hex::FromHexError),

    /// Base58Check checksum did not match the payload.
    #[error("Invalid Base58Check checksum")]
    BadChecksum,

    /// Decoded version byte did not match the expected version.
    #[error("Wrong version byte. Got {got}. Expected {expected}.")]
    WrongVersion {
        /// The version the caller demanded
        expected: u8,
        /// The version found on the wire
        got: u8,
    },

    /// Decoded string too short to contain a version and checksum.
    #[error("Base58Check string decodes to {0} bytes, need at least 5")]
    TooShort(usize),

    /// Decoded payload had an unexpected width.
    #[error("Wrong payload length. Got {got} bytes. Expected {expected}.")]
    WrongPayloadLength {
        /// The width the type demands
        expected: usize,
        /// The width we got
        got: usize,
    },

    /// Input matched none of the accepted textual formats.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),
}

/// Type alias for encoding errors
pub type EncodingResult<T> = Result<T, EncodingError>;

/// Version bytes distinguishing the kinds of Base58Check-encoded identifiers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Version {
    /// A 20-byte account identifier.
    AccountId = 0,
    /// A versionless payload.
    None = 1,
    /// A node (validator) public key.
    NodePublic = 28,
    /// A node (validator) private key.
    NodePrivate = 32,
    /// A 16-byte family seed.
    FamilySeed = 33,
    /// An account private key.
    AccountPrivate = 34,
    /// An account public key.
    AccountPublic = 35,
    /// A family key generator.
    FamilyGenerator = 41,
}

impl Version {
    /// The version byte prepended to the payload.
    pub const fn byte(self) -> u8 {
        self as u8
    }
}

/// Encode a version byte and payload as a Base58Check string.
pub fn encode_base58check(version: Version, payload: &[u8]) -> String {
    let mut body = Vec::with_capacity(payload.len() + 5);
    body.push(version.byte());
    body.extend_from_slice(payload);
    let checksum = hash256(&[&body]);
    body.extend_from_slice(&checksum[..4]);
    bs58::encode(body)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

/// Decode a Base58Check string, verifying the checksum and the version byte.
/// Returns the payload with version and checksum stripped.
pub fn decode_base58check(version: Version, s: &str) -> EncodingResult<Vec<u8>> {
    let body = bs58::decode(s)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()?;
    if body.len() < 5 {
        return Err(EncodingError::TooShort(body.len()));
    }
    let split = body.len() - 4;
    let checksum = hash256(&[&body[..split]]);
    if checksum[..4] != body[split..] {
        return Err(EncodingError::BadChecksum);
    }
    if body[0] != version.byte() {
        return Err(EncodingError::WrongVersion {
            expected: version.byte(),
            got: body[0],
        });
    }
    Ok(body[1..split].to_vec())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_encodes_and_decodes_known_identifiers() {
        let cases = [
            (Version::AccountId, [0u8; 20].to_vec(), "rrrrrrrrrrrrrrrrrrrrrhoLvTp"),
            (
                Version::AccountId,
                {
                    let mut one = [0u8; 20];
                    one[19] = 1;
                    one.to_vec()
                },
                "rrrrrrrrrrrrrrrrrrrrBZbvji",
            ),
            (Version::AccountId, [0xffu8; 20].to_vec(), "rQLbzfJH5BT1FS9apRLKV3G8dWEA5njaQi"),
            (
                Version::FamilySeed,
                hex::decode("FF1CF838D02B2CF7B45BAC27F5F24F4F").unwrap(),
                "saESc82Vun7Ta5EJRzGJbrXb5HNYk",
            ),
        ];
        for case in cases.iter() {
            assert_eq!(encode_base58check(case.0, &case.1), case.2);
            assert_eq!(decode_base58check(case.0, case.2).unwrap(), case.1);
        }
    }

    #[test]
    fn it_rejects_a_corrupted_checksum() {
        // last character flipped
        match decode_base58check(Version::AccountId, "rrrrrrrrrrrrrrrrrrrrrhoLvTr") {
            Err(EncodingError::BadChecksum) => {}
            other => panic!("expected BadChecksum, got {:?}", other),
        }
    }

    #[test]
    fn it_rejects_the_wrong_version() {
        match decode_base58check(Version::FamilySeed, "rrrrrrrrrrrrrrrrrrrrrhoLvTp") {
            Err(EncodingError::WrongVersion { expected: 33, got: 0 }) => {}
            other => panic!("expected WrongVersion, got {:?}", other),
        }
    }
}
