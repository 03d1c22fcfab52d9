use std::fmt;
use std::io;

use super::traits::*;
use crate::bit_vec::{BitVec, BitVecMut};
use crate::errors::Error;
use crate::persist::{self, Persist};
use crate::space_usage::SpaceUsage;
use crate::storage::BlockType;

/// Uncompressed vector of *k*-bit unsigned integers.
///
/// The element width *k* is determined at vector creation time and can
/// never exceed the number of bits in `Block`. This is the backing store
/// for every side table in the crate: low-bit arrays, rank counters, and
/// select samples all pick the narrowest width that fits their values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IntVector<Block: BlockType = usize> {
    element_bits: usize,
    len: u64,
    data: Vec<Block>,
}

impl<Block: BlockType> IntVector<Block> {
    /// Asserts that `element_bits` is valid.
    fn check_element_bits(element_bits: usize) {
        assert!(
            element_bits != 0,
            "IntVector: cannot have zero-size elements"
        );
        assert!(
            element_bits <= Block::nbits(),
            "IntVector: element size cannot exceed block size"
        );
    }

    fn check_value(&self, value: Block) {
        assert!(
            value <= Block::low_mask(self.element_bits),
            "IntVector: value too large for element size"
        );
    }

    /// Creates a new, empty integer vector with elements of
    /// `element_bits` bits.
    ///
    /// # Panics
    ///
    /// Panics if `element_bits` is zero or exceeds the block size.
    pub fn new(element_bits: usize) -> Self {
        Self::check_element_bits(element_bits);
        IntVector {
            element_bits,
            len: 0,
            data: Vec::new(),
        }
    }

    /// Creates a new, empty integer vector with storage preallocated for
    /// `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `element_bits` is zero or exceeds the block size.
    pub fn with_capacity(element_bits: usize, capacity: u64) -> Self {
        Self::check_element_bits(element_bits);
        let blocks = Block::ceil_div_nbits(capacity * element_bits as u64);
        IntVector {
            element_bits,
            len: 0,
            data: Vec::with_capacity(blocks),
        }
    }

    /// Pushes an element onto the end of the vector.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not fit in the element size.
    pub fn push(&mut self, value: Block) {
        self.check_value(value);

        let needed = Block::ceil_div_nbits((self.len + 1) * self.element_bits as u64);
        while self.data.len() < needed {
            self.data.push(Block::zero());
        }

        let start = self.len * self.element_bits as u64;
        self.data.set_bits(start, self.element_bits, value);
        self.len += 1;
    }

    /// Gets an iterator over the elements of the vector.
    pub fn iter(&self) -> Iter<Block> {
        Iter {
            vec: self,
            index: 0,
        }
    }
}

impl<Block: BlockType> IntVec for IntVector<Block> {
    type Block = Block;

    #[inline]
    fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn element_bits(&self) -> usize {
        self.element_bits
    }

    fn get(&self, index: u64) -> Block {
        assert!(index < self.len, "IntVector::get: out of bounds");
        self.data
            .get_bits(index * self.element_bits as u64, self.element_bits)
    }
}

impl<Block: BlockType> IntVecMut for IntVector<Block> {
    fn set(&mut self, index: u64, value: Block) {
        assert!(index < self.len, "IntVector::set: out of bounds");
        self.check_value(value);
        self.data
            .set_bits(index * self.element_bits as u64, self.element_bits, value);
    }
}

impl<Block: BlockType> fmt::Debug for IntVector<Block> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "IntVector {{ element_bits: {}, elements: {{ ", self.element_bits)?;

        for element in self.iter() {
            write!(formatter, "{:?}, ", element)?;
        }

        write!(formatter, "}} }}")
    }
}

impl<Block: BlockType> SpaceUsage for IntVector<Block> {
    #[inline]
    fn is_stack_only() -> bool {
        false
    }

    #[inline]
    fn heap_bytes(&self) -> usize {
        self.data.heap_bytes()
    }
}

impl<Block: BlockType> Persist for IntVector<Block> {
    fn serialize<W: io::Write>(&self, sink: &mut W) -> crate::errors::Result<()> {
        persist::write_u64(sink, self.element_bits as u64)?;
        persist::write_u64(sink, self.len)?;
        for block in &self.data {
            block.write_block::<_, byteorder::LittleEndian>(sink)?;
        }
        Ok(())
    }

    fn deserialize<R: io::Read>(source: &mut R) -> crate::errors::Result<Self> {
        let element_bits = persist::read_u64(source)? as usize;
        if element_bits == 0 || element_bits > Block::nbits() {
            return Err(Error::Deserialization("bad element size"));
        }

        let len = persist::read_u64(source)?;
        let blocks = len
            .checked_mul(element_bits as u64)
            .and_then(|bits| bits.checked_add(Block::nbits() as u64 - 1))
            .and_then(Block::checked_div_nbits)
            .ok_or(Error::Deserialization("length overflow"))?;

        let mut data = Vec::with_capacity(blocks);
        for _ in 0..blocks {
            data.push(
                Block::read_block::<_, byteorder::LittleEndian>(source)
                    .map_err(persist::truncated)?,
            );
        }

        Ok(IntVector {
            element_bits,
            len,
            data,
        })
    }
}

/// An iterator over the elements of an [`IntVector`](struct.IntVector.html).
#[derive(Clone, Debug)]
pub struct Iter<'a, Block: BlockType + 'a = usize> {
    vec: &'a IntVector<Block>,
    index: u64,
}

impl<'a, Block: BlockType> Iterator for Iter<'a, Block> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.index < self.vec.len() {
            let result = self.vec.get(self.index);
            self.index += 1;
            Some(result)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.vec.len() - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl<'a, Block: BlockType> ExactSizeIterator for Iter<'a, Block> {}

impl<'a, Block: BlockType + 'a> IntoIterator for &'a IntVector<Block> {
    type Item = Block;
    type IntoIter = Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
