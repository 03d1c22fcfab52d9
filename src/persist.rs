//! Lossless binary serialization for the structures in this crate.
//!
//! The wire format stores primary data only: side tables that are
//! deterministically derived from it (rank and select indexes) are
//! rebuilt on load. All fields are little-endian.

use std::io;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::errors::{Error, Result};

/// Types that can round-trip through an opaque byte stream.
pub trait Persist: Sized {
    /// Writes the structure to `sink`.
    fn serialize<W: io::Write>(&self, sink: &mut W) -> Result<()>;

    /// Reads a structure back from `source`.
    ///
    /// Fails with `Error::Deserialization` if the input is truncated or
    /// internally inconsistent.
    fn deserialize<R: io::Read>(source: &mut R) -> Result<Self>;
}

pub(crate) fn write_u64<W: io::Write>(sink: &mut W, value: u64) -> Result<()> {
    sink.write_u64::<LittleEndian>(value)?;
    Ok(())
}

pub(crate) fn write_u8<W: io::Write>(sink: &mut W, value: u8) -> Result<()> {
    sink.write_u8(value)?;
    Ok(())
}

pub(crate) fn read_u64<R: io::Read>(source: &mut R) -> Result<u64> {
    source.read_u64::<LittleEndian>().map_err(truncated)
}

pub(crate) fn read_u8<R: io::Read>(source: &mut R) -> Result<u8> {
    source.read_u8().map_err(truncated)
}

/// Any read failure while decoding means the buffer ended early or was
/// never a serialized structure to begin with.
pub(crate) fn truncated(_: io::Error) -> Error {
    Error::Deserialization("truncated input")
}
