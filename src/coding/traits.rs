use crate::errors::Result;
use crate::stream::{BitRead, BitWrite};

/// A universal code lets us encode arbitrary sized integers in a
/// self-delimiting code.
pub trait UniversalCode {
    /// Writes `value` to `sink`.
    fn encode<W: BitWrite>(&self, sink: &mut W, value: u64) -> Result<()>;

    /// Reads a value from `source`.
    ///
    /// `Ok(None)` indicates (benign) EOF; running out of bits in the
    /// middle of a codeword is an error.
    fn decode<R: BitRead>(&self, source: &mut R) -> Result<Option<u64>>;
}
