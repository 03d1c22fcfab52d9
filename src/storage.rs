//! Traits describing how bits and arrays of bits are stored.

use std::fmt;
use std::io;
use std::mem;

use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use num_traits::{PrimInt, ToPrimitive};

/// Types that can be used for `IntVector` and `BitVector` storage.
///
/// Provides size and offset arithmetic relative to the block width,
/// single-block bit manipulation, integer logarithms, and endian-specified
/// block I/O.
pub trait BlockType: PrimInt + fmt::Debug + crate::space_usage::SpaceUsage {
    /// The number of bits in a block.
    #[inline]
    fn nbits() -> usize {
        8 * mem::size_of::<Self>()
    }

    /// Log-base-2 of the number of bits in a block.
    #[inline]
    fn lg_nbits() -> usize {
        Self::nbits().floor_lg()
    }

    /// Returns `index / Self::nbits()`, computed by shifting.
    ///
    /// Converts a bit address into a block address; the caller must know
    /// the result fits in a `usize`.
    #[inline]
    fn div_nbits(index: u64) -> usize {
        (index >> Self::lg_nbits()) as usize
    }

    /// Returns `index / Self::nbits()`, or `None` if the result does not
    /// fit in a `usize`.
    #[inline]
    fn checked_div_nbits(index: u64) -> Option<usize> {
        (index >> Self::lg_nbits()).to_usize()
    }

    /// Returns `index / Self::nbits()` rounded up.
    #[inline]
    fn ceil_div_nbits(index: u64) -> usize {
        Self::div_nbits(index + (Self::nbits() as u64 - 1))
    }

    /// Returns `index % Self::nbits()`, computed by masking.
    #[inline]
    fn mod_nbits(index: u64) -> usize {
        (index & (Self::nbits() as u64 - 1)) as usize
    }

    /// Computes how many bits are in the last block of an array of `len`
    /// bits.
    ///
    /// Like `Self::mod_nbits`, but returns `Self::nbits()` in lieu of 0,
    /// so an empty array has a full last block.
    #[inline]
    fn last_block_bits(len: u64) -> usize {
        let masked = Self::mod_nbits(len);
        if masked == 0 {
            Self::nbits()
        } else {
            masked
        }
    }

    /// The bit mask consisting of `Self::nbits() - element_bits` zeroes
    /// followed by `element_bits` ones.
    ///
    /// # Precondition
    ///
    /// `element_bits <= Self::nbits()`
    fn low_mask(element_bits: usize) -> Self;

    /// The bit mask with only the `bit_index`th bit set.
    ///
    /// Bits are indexed little-endian starting at 0.
    ///
    /// # Precondition
    ///
    /// `bit_index < Self::nbits()`
    #[inline]
    fn nth_mask(bit_index: usize) -> Self {
        Self::one() << bit_index
    }

    /// Extracts the value of the `bit_index`th bit.
    ///
    /// # Panics
    ///
    /// Panics if `bit_index` is out of bounds.
    #[inline]
    fn get_bit(self, bit_index: usize) -> bool {
        assert!(bit_index < Self::nbits(), "Block::get_bit: out of bounds");
        self & Self::nth_mask(bit_index) != Self::zero()
    }

    /// Functionally updates the value of the `bit_index`th bit.
    ///
    /// # Panics
    ///
    /// Panics if `bit_index` is out of bounds.
    #[inline]
    fn with_bit(self, bit_index: usize, bit_value: bool) -> Self {
        assert!(bit_index < Self::nbits(), "Block::with_bit: out of bounds");
        if bit_value {
            self | Self::nth_mask(bit_index)
        } else {
            self & !Self::nth_mask(bit_index)
        }
    }

    /// Extracts `len` bits starting at bit offset `start`.
    ///
    /// # Panics
    ///
    /// Panics if the bit span is out of bounds.
    #[inline]
    fn get_bits(self, start: usize, len: usize) -> Self {
        assert!(
            start + len <= Self::nbits(),
            "Block::get_bits: out of bounds"
        );

        if len == 0 {
            return Self::zero();
        }

        (self >> start) & Self::low_mask(len)
    }

    /// Functionally updates `len` bits to `value` starting at offset
    /// `start`.
    ///
    /// # Panics
    ///
    /// Panics if the bit span is out of bounds.
    #[inline]
    fn with_bits(self, start: usize, len: usize, value: Self) -> Self {
        assert!(
            start + len <= Self::nbits(),
            "Block::with_bits: out of bounds"
        );

        if len == 0 {
            return self;
        }

        let mask = Self::low_mask(len) << start;
        let shifted_value = value << start;

        (self & !mask) | (shifted_value & mask)
    }

    /// Returns the smallest number `n` such that `2.pow(n) >= self`.
    #[inline]
    fn ceil_lg(self) -> usize {
        if self <= Self::one() {
            return 0;
        }
        Self::nbits() - (self - Self::one()).leading_zeros() as usize
    }

    /// Returns the largest number `n` such that `2.pow(n) <= self`.
    #[inline]
    fn floor_lg(self) -> usize {
        if self <= Self::one() {
            return 0;
        }
        Self::nbits() - 1 - self.leading_zeros() as usize
    }

    /// Returns the smallest number `n` such that `n * divisor >= self`.
    #[inline]
    fn ceil_div(self, divisor: Self) -> Self {
        (self + divisor - Self::one()) / divisor
    }

    /// Reads a block with the specified endianness.
    fn read_block<R, T>(source: &mut R) -> io::Result<Self>
    where
        R: io::Read,
        T: ByteOrder;

    /// Writes a block with the specified endianness.
    fn write_block<W, T>(&self, sink: &mut W) -> io::Result<()>
    where
        W: io::Write,
        T: ByteOrder;
}

macro_rules! fn_low_mask {
    ( $ty:ident ) => {
        #[inline]
        fn low_mask(element_bits: usize) -> $ty {
            debug_assert!(element_bits <= Self::nbits());

            // The mask when element_bits is not the word size:
            let a = (1 as $ty).wrapping_shl(element_bits as u32).wrapping_sub(1);

            // Special case for the word size:
            let b = ((element_bits / Self::nbits()) & 1) as $ty * !0;

            a | b
        }
    };
}

impl BlockType for u8 {
    fn read_block<R, T>(source: &mut R) -> io::Result<Self>
    where
        R: io::Read,
        T: ByteOrder,
    {
        source.read_u8()
    }

    fn write_block<W, T>(&self, sink: &mut W) -> io::Result<()>
    where
        W: io::Write,
        T: ByteOrder,
    {
        sink.write_u8(*self)
    }

    fn_low_mask!(u8);
}

macro_rules! impl_block_type {
    ($ty:ident, $read:ident, $write:ident) => {
        impl BlockType for $ty {
            fn read_block<R, T>(source: &mut R) -> io::Result<Self>
            where
                R: io::Read,
                T: ByteOrder,
            {
                source.$read::<T>()
            }

            fn write_block<W, T>(&self, sink: &mut W) -> io::Result<()>
            where
                W: io::Write,
                T: ByteOrder,
            {
                sink.$write::<T>(*self)
            }

            fn_low_mask!($ty);
        }
    };
}

impl_block_type!(u16, read_u16, write_u16);
impl_block_type!(u32, read_u32, write_u32);
impl_block_type!(u64, read_u64, write_u64);

impl BlockType for usize {
    #[cfg(target_pointer_width = "64")]
    fn read_block<R, T>(source: &mut R) -> io::Result<Self>
    where
        R: io::Read,
        T: ByteOrder,
    {
        source.read_u64::<T>().map(|x| x as usize)
    }

    #[cfg(target_pointer_width = "32")]
    fn read_block<R, T>(source: &mut R) -> io::Result<Self>
    where
        R: io::Read,
        T: ByteOrder,
    {
        source.read_u32::<T>().map(|x| x as usize)
    }

    #[cfg(target_pointer_width = "64")]
    fn write_block<W, T>(&self, sink: &mut W) -> io::Result<()>
    where
        W: io::Write,
        T: ByteOrder,
    {
        sink.write_u64::<T>(*self as u64)
    }

    #[cfg(target_pointer_width = "32")]
    fn write_block<W, T>(&self, sink: &mut W) -> io::Result<()>
    where
        W: io::Write,
        T: ByteOrder,
    {
        sink.write_u32::<T>(*self as u32)
    }

    fn_low_mask!(usize);
}

/// The address of a bit, split into a block index and a bit offset within
/// that block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Address {
    /// The index of the block containing the bit in question.
    pub block_index: usize,
    /// The position of the bit in question within its block.
    pub bit_offset: usize,
}

impl Address {
    /// Creates an `Address` for the given bit index for storage in block
    /// type `Block`.
    ///
    /// # Panics
    ///
    /// Panics if `bit_index` divided by the block size doesn't fit in a
    /// `usize`.
    #[inline]
    pub fn new<Block: BlockType>(bit_index: u64) -> Self {
        Address {
            block_index: Block::checked_div_nbits(bit_index)
                .expect("Address::new: index overflow"),
            bit_offset: Block::mod_nbits(bit_index),
        }
    }

    /// Converts an `Address` back into a raw bit index.
    #[inline]
    pub fn bit_index<Block: BlockType>(&self) -> u64 {
        (self.block_index as u64) << Block::lg_nbits() as u64 | self.bit_offset as u64
    }
}
