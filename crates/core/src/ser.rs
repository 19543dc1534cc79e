//! Binary wire encoding over `std::io::Read` and `std::io::Write`.
//!
//! Bitcoin-style wire formats are built from a small set of pieces: little-endian fixed-width
//! integers, compact (VarInt) integers, and vectors prefixed by a compact integer count. The
//! `ByteFormat` trait exposes each of these as provided methods so that implementers only
//! describe the order of their fields.

use std::io::{Error as IOError, ErrorKind, Read, Write};

use hex::FromHexError;
use thiserror::Error;

/// Upper bound on the number of items allocated ahead of reading a prefixed vector. The count
/// in the prefix is attacker-controlled, so larger vectors grow as items actually arrive.
const MAX_PREALLOCATION: usize = 1024;

/// Errors related to serialization of types.
#[derive(Debug, Error)]
pub enum SerError {
    /// Attempted to deserialize a VarInt that was not minimally encoded.
    #[error("Attempted to deserialize non-minimal VarInt. Someone is doing something fishy.")]
    NonMinimalVarInt,

    /// A prefixed vector declared more items than this platform can address.
    #[error("Prefixed vector length {0} exceeds addressable memory")]
    VectorTooLong(u64),

    /// IOError bubbled up from a `Read` or `Write` passed to a `ByteFormat` implementation.
    #[error(transparent)]
    IoError(#[from] IOError),

    /// The input to `deserialize_hex` was not valid hex
    #[error(transparent)]
    FromHexError(#[from] FromHexError),
}

/// Result alias for wire encoding
pub type SerResult<T> = Result<T, SerError>;

/// Bytes needed to write `number` as a minimal compact int
pub fn prefix_byte_len(number: u64) -> u8 {
    match number {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x10000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// The marker byte that opens a compact int of total length `number`, if it has one
pub fn first_byte_from_len(number: u8) -> Option<u8> {
    match number {
        3 => Some(0xfd),
        5 => Some(0xfe),
        9 => Some(0xff),
        _ => None,
    }
}

/// Total compact int length implied by its first byte
pub fn prefix_len_from_first_byte(number: u8) -> u8 {
    match number {
        0..=0xfc => 1,
        0xfd => 3,
        0xfe => 5,
        0xff => 9,
    }
}

/// Types with a fixed wire encoding, read from `std::io::Read` and written to `std::io::Write`.
///
/// Hashing goes through this trait too: a value is written straight into a digest writer.
pub trait ByteFormat {
    /// An associated error type
    type Error: From<SerError> + From<IOError> + std::error::Error;

    /// Exact number of bytes `write_to` will produce.
    fn serialized_length(&self) -> usize;

    /// Read one value from `reader`. `limit` caps element counts for collection types and is
    /// ignored elsewhere.
    fn read_from<R>(reader: &mut R, limit: usize) -> Result<Self, Self::Error>
    where
        R: Read,
        Self: std::marker::Sized;

    /// Write the wire encoding to `writer`, returning the number of bytes written.
    fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
    where
        W: Write;

    /// Read a 4-byte LE integer
    fn read_u32_le<R>(reader: &mut R) -> SerResult<u32>
    where
        R: Read,
    {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read an 8-byte LE integer
    fn read_u64_le<R>(reader: &mut R) -> SerResult<u64>
    where
        R: Read,
    {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Write a 4-byte LE integer
    fn write_u32_le<W>(writer: &mut W, number: u32) -> SerResult<usize>
    where
        W: Write,
    {
        writer.write_all(&number.to_le_bytes())?;
        Ok(4)
    }

    /// Write an 8-byte LE integer
    fn write_u64_le<W>(writer: &mut W, number: u64) -> SerResult<usize>
    where
        W: Write,
    {
        writer.write_all(&number.to_le_bytes())?;
        Ok(8)
    }

    /// Read a Bitcoin-style compact integer. Rejects encodings that are longer than necessary.
    ///
    /// ```
    /// use coinwire_core::ser::{ByteFormat, SerError};
    ///
    /// let value = u8::read_compact_int(&mut &[0xfdu8, 0x00, 0x01][..]).unwrap();
    /// assert_eq!(value, 0x100);
    ///
    /// match u8::read_compact_int(&mut &[0xfdu8, 0x10, 0x00][..]) {
    ///     Err(SerError::NonMinimalVarInt) => {}
    ///     _ => panic!("expected a non-minimal VarInt error"),
    /// }
    /// ```
    fn read_compact_int<R>(reader: &mut R) -> SerResult<u64>
    where
        R: Read,
    {
        let mut prefix = [0u8; 1];
        reader.read_exact(&mut prefix)?;
        let prefix_len = prefix_len_from_first_byte(prefix[0]);

        let number = if prefix_len > 1 {
            let mut buf = [0u8; 8];
            reader.read_exact(&mut buf[..prefix_len as usize - 1])?;
            u64::from_le_bytes(buf)
        } else {
            prefix[0] as u64
        };

        if prefix_byte_len(number) < prefix_len {
            return Err(SerError::NonMinimalVarInt);
        }
        Ok(number)
    }

    /// Write a Bitcoin-style compact integer, using the shortest possible encoding.
    fn write_compact_int<W>(writer: &mut W, number: u64) -> SerResult<usize>
    where
        W: Write,
    {
        let prefix_len = prefix_byte_len(number);
        match first_byte_from_len(prefix_len) {
            None => writer.write_all(&[number as u8])?,
            Some(prefix) => {
                let body = number.to_le_bytes();
                writer.write_all(&[prefix])?;
                writer.write_all(&body[..prefix_len as usize - 1])?;
            }
        };
        Ok(prefix_len as usize)
    }

    /// Read a vector of `ByteFormat` items prefixed by a compact integer count. Items are read
    /// one at a time, so a truncated stream fails with an EOF error.
    fn read_prefix_vec<R, I>(reader: &mut R) -> Result<Vec<I>, Self::Error>
    where
        R: Read,
        I: ByteFormat,
        Self::Error: From<I::Error>,
    {
        let ser_err = <Self::Error as From<SerError>>::from;
        let count = Self::read_compact_int(reader).map_err(ser_err)?;
        let count = usize::try_from(count).map_err(|_| ser_err(SerError::VectorTooLong(count)))?;

        let mut items = Vec::with_capacity(count.min(MAX_PREALLOCATION));
        for _ in 0..count {
            items.push(I::read_from(reader, 0)?);
        }
        Ok(items)
    }

    /// Write a vector of `ByteFormat` items, prefixed by a compact integer count.
    fn write_prefix_vec<W, I>(writer: &mut W, items: &[I]) -> Result<usize, Self::Error>
    where
        W: Write,
        I: ByteFormat,
        Self::Error: From<I::Error>,
    {
        let mut written = Self::write_compact_int(writer, items.len() as u64)
            .map_err(<Self::Error as From<SerError>>::from)?;
        for item in items.iter() {
            written += item.write_to(writer)?;
        }
        Ok(written)
    }

    /// Read a byte vector prefixed by a compact integer length.
    fn read_prefix_bytes<R>(reader: &mut R) -> SerResult<Vec<u8>>
    where
        R: Read,
    {
        let len = Self::read_compact_int(reader)?;
        let mut buf = vec![];
        reader.take(len).read_to_end(&mut buf)?;
        if (buf.len() as u64) < len {
            return Err(IOError::from(ErrorKind::UnexpectedEof).into());
        }
        Ok(buf)
    }

    /// Write a byte slice, prefixed by a compact integer length.
    fn write_prefix_bytes<W>(writer: &mut W, bytes: &[u8]) -> SerResult<usize>
    where
        W: Write,
    {
        let written = Self::write_compact_int(writer, bytes.len() as u64)?;
        writer.write_all(bytes)?;
        Ok(written + bytes.len())
    }

    /// Read one value from hex text.
    fn deserialize_hex(s: &str) -> Result<Self, Self::Error>
    where
        Self: std::marker::Sized,
    {
        let v: Vec<u8> = hex::decode(s).map_err(SerError::from)?;
        Self::read_from(&mut v.as_slice(), 0)
    }

    /// Serialize `self` to a new byte vector.
    fn to_vec(&self) -> Result<Vec<u8>, Self::Error> {
        let mut v: Vec<u8> = Vec::with_capacity(self.serialized_length());
        self.write_to(&mut v)?;
        Ok(v)
    }

    /// The wire encoding as lowercase hex
    fn serialize_hex(&self) -> Result<String, Self::Error> {
        Ok(hex::encode(self.to_vec()?))
    }
}

impl ByteFormat for u8 {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        1
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> SerResult<Self>
    where
        R: Read,
        Self: std::marker::Sized,
    {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        writer.write_all(&[*self])?;
        Ok(1)
    }
}
