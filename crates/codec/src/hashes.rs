//! Hashing writers for signing hashes and transaction identifiers.
//!
//! The ledger hashes serialized transactions with SHA-512 truncated to its first 32
//! bytes ("SHA-512-half"), always preceded by a 4-byte namespace prefix. Base58Check
//! checksums use double SHA-256.

use std::io::Write;

use sha2::{Digest, Sha256, Sha512};

use crate::types::Hash256;

/// Four-byte namespace prefixes mixed into ledger hashes ahead of the payload.
pub mod hash_prefix {
    /// Prefix for the hash signed by a transaction's signer.
    pub const SIGN_TX: u32 = 0x5354_5800; // "STX\0"
    /// Prefix for the signing hash on test networks.
    pub const SIGN_TX_TESTNET: u32 = 0x7374_7800; // "stx\0"
    /// Prefix for a signed transaction's identifying hash.
    pub const TX_ID: u32 = 0x5458_4E00; // "TXN\0"
}

/// A `Write`-implementing hasher that outputs a digest when `finish()` is called.
pub trait DigestWriter: Default + Write {
    /// The digest produced by the writer.
    type Output;

    /// Consume the writer, producing the digest.
    fn finish(self) -> Self::Output;
}

/// A `DigestWriter` that accumulates SHA-512 and truncates to the first 32 bytes.
#[derive(Default)]
pub struct Sha512HalfWriter {
    internal: Sha512,
}

impl Write for Sha512HalfWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl DigestWriter for Sha512HalfWriter {
    type Output = Hash256;

    fn finish(self) -> Hash256 {
        let digest = self.internal.finalize();
        let mut buf = [0u8; 32];
        buf.copy_from_slice(&digest[..32]);
        Hash256::from_bytes(buf)
    }
}

/// Compute the SHA-512-half of a namespace prefix followed by a payload.
pub fn sha512_half(prefix: u32, data: &[u8]) -> Hash256 {
    let mut w = Sha512HalfWriter::default();
    w.write_all(&prefix.to_be_bytes())
        .expect("no io error on hasher");
    w.write_all(data).expect("no io error on hasher");
    w.finish()
}

/// Double SHA-256 of the concatenation of the given slices.
pub fn hash256(preimages: &[&[u8]]) -> [u8; 32] {
    let mut first = Sha256::new();
    for preimage in preimages.iter() {
        first.update(preimage);
    }
    let digest = Sha256::digest(first.finalize());
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&digest);
    buf
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_truncates_sha512_to_32_bytes() {
        // sha512("") starts with cf83e1357eefb8bd...
        let mut w = Sha512HalfWriter::default();
        w.write_all(b"").unwrap();
        let digest = w.finish();
        assert_eq!(
            digest.to_hex(),
            "CF83E1357EEFB8BDF1542850D66D8007D620E4050B5715DC83F4A921D36CE9CE"
        );
    }

    #[test]
    fn it_prefixes_the_payload() {
        let direct = sha512_half(hash_prefix::SIGN_TX, b"hello");
        let mut w = Sha512HalfWriter::default();
        w.write_all(&[0x53, 0x54, 0x58, 0x00]).unwrap();
        w.write_all(b"hello").unwrap();
        assert_eq!(direct, w.finish());
    }

    #[test]
    fn it_computes_double_sha256() {
        // hash256("hello") == 9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50
        let digest = hash256(&[b"he", b"llo"]);
        assert_eq!(
            hex::encode(digest),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
    }
}
