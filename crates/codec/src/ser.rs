//! A simple trait for binary (de)serialization using std `Read` and `Write` traits.
//!
//! All multi-byte integers on the ledger wire are big-endian, and variable-length
//! payloads carry a 1, 2, or 3 byte length prefix.

use std::io::{Cursor, Error as IOError, Read, Write};

use hex::FromHexError;
use thiserror::Error;

/// Longest payload representable by a variable-length prefix.
pub const MAX_VL_LENGTH: usize = 918_744;

/// Errors related to serialization of types.
#[derive(Debug, Error)]
pub enum SerError {
    /// IOError bubbled up from a `Write` passed to a `ByteFormat::write_to` implementation.
    #[error(transparent)]
    IOError(#[from] IOError),

    /// `deserialize_hex` encountered an error on its input.
    #[error(transparent)]
    FromHexError(#[from] FromHexError),

    /// Payload too long for the variable-length prefix encoding.
    #[error("Payload length {0} exceeds the variable-length limit of {}", MAX_VL_LENGTH)]
    VlTooLong(usize),

    /// A fixed-width type got a slice of the wrong length.
    #[error("Wrong length. Got {got} bytes. Expected {expected}.")]
    WrongLength {
        /// The width the type demands
        expected: usize,
        /// The width we got
        got: usize,
    },
}

/// Type alias for serialization errors
pub type SerResult<T> = Result<T, SerError>;

/// A simple trait for deserializing from `std::io::Read` and serializing to `std::io::Write`.
///
/// `ByteFormat` is used throughout canonical transaction serialization and signing-hash
/// calculation.
pub trait ByteFormat {
    /// An error type, bubbled up on failed serialization
    type Error: From<SerError> + From<IOError> + std::error::Error;

    /// Returns the byte-length of the serialized data structure.
    fn serialized_length(&self) -> usize;

    /// Deserializes an instance of `Self` from a `std::io::Read`.
    fn read_from<R>(reader: &mut R) -> Result<Self, Self::Error>
    where
        R: Read,
        Self: std::marker::Sized;

    /// Serializes `Self` to a `std::io::Write`. Following `Write` trait conventions, its `Ok`
    /// type is a `usize` denoting the number of bytes written.
    fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
    where
        W: Write;

    /// Decodes a hex string to a vector, deserializes an instance of `Self` from that vector.
    fn deserialize_hex(s: &str) -> Result<Self, Self::Error>
    where
        Self: std::marker::Sized,
    {
        let v: Vec<u8> = hex::decode(s).map_err(SerError::from)?;
        let mut cursor = Cursor::new(v);
        Self::read_from(&mut cursor)
    }

    /// Serializes `self` to a vector, returns the uppercase hex-encoded vector.
    fn serialize_hex(&self) -> String {
        let mut v: Vec<u8> = vec![];
        self.write_to(&mut v)
            .expect("serialization into a vec never fails");
        hex::encode_upper(v)
    }

    /// Convenience function for reading a BE u8
    fn read_u8<R>(reader: &mut R) -> SerResult<u8>
    where
        R: Read,
    {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Convenience function for reading a BE u16
    fn read_u16_be<R>(reader: &mut R) -> SerResult<u16>
    where
        R: Read,
    {
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Convenience function for reading a BE u32
    fn read_u32_be<R>(reader: &mut R) -> SerResult<u32>
    where
        R: Read,
    {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Convenience function for reading a BE u64
    fn read_u64_be<R>(reader: &mut R) -> SerResult<u64>
    where
        R: Read,
    {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }

    /// Convenience function for writing a BE u16
    fn write_u16_be<W>(writer: &mut W, number: u16) -> SerResult<usize>
    where
        W: Write,
    {
        Ok(writer.write(&number.to_be_bytes())?)
    }

    /// Convenience function for writing a BE u32
    fn write_u32_be<W>(writer: &mut W, number: u32) -> SerResult<usize>
    where
        W: Write,
    {
        Ok(writer.write(&number.to_be_bytes())?)
    }

    /// Convenience function for writing a BE u64
    fn write_u64_be<W>(writer: &mut W, number: u64) -> SerResult<usize>
    where
        W: Write,
    {
        Ok(writer.write(&number.to_be_bytes())?)
    }
}

/// Calculates the byte-length of the variable-length prefix encoding `length`.
pub fn vl_prefix_len(length: usize) -> SerResult<usize> {
    match length {
        0..=192 => Ok(1),
        193..=12_480 => Ok(2),
        12_481..=MAX_VL_LENGTH => Ok(3),
        _ => Err(SerError::VlTooLong(length)),
    }
}

/// Write a variable-length prefix describing a payload of `length` bytes.
pub fn write_vl_prefix<W>(writer: &mut W, length: usize) -> SerResult<usize>
where
    W: Write,
{
    match length {
        0..=192 => Ok(writer.write(&[length as u8])?),
        193..=12_480 => {
            let adjusted = length - 193;
            Ok(writer.write(&[193 + (adjusted >> 8) as u8, (adjusted & 0xff) as u8])?)
        }
        12_481..=MAX_VL_LENGTH => {
            let adjusted = length - 12_481;
            Ok(writer.write(&[
                241 + (adjusted >> 16) as u8,
                ((adjusted >> 8) & 0xff) as u8,
                (adjusted & 0xff) as u8,
            ])?)
        }
        _ => Err(SerError::VlTooLong(length)),
    }
}

/// Read a variable-length prefix, returning the payload length it describes.
pub fn read_vl_prefix<R>(reader: &mut R) -> SerResult<usize>
where
    R: Read,
{
    let mut first = [0u8; 1];
    reader.read_exact(&mut first)?;
    match first[0] {
        b1 @ 0..=192 => Ok(b1 as usize),
        b1 @ 193..=240 => {
            let mut buf = [0u8; 1];
            reader.read_exact(&mut buf)?;
            Ok(193 + (((b1 - 193) as usize) << 8) + buf[0] as usize)
        }
        b1 @ 241..=254 => {
            let mut buf = [0u8; 2];
            reader.read_exact(&mut buf)?;
            Ok(12_481
                + (((b1 - 241) as usize) << 16)
                + ((buf[0] as usize) << 8)
                + buf[1] as usize)
        }
        b1 => Err(SerError::VlTooLong(b1 as usize)),
    }
}

/// Write a variable-length prefix followed by the payload itself.
pub fn write_vl<W>(writer: &mut W, payload: &[u8]) -> SerResult<usize>
where
    W: Write,
{
    let mut written = write_vl_prefix(writer, payload.len())?;
    written += writer.write(payload)?;
    Ok(written)
}

/// Read a variable-length prefix and the payload it describes.
pub fn read_vl<R>(reader: &mut R) -> SerResult<Vec<u8>>
where
    R: Read,
{
    let length = read_vl_prefix(reader)?;
    let mut buf = vec![0u8; length];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
