use std::fmt;
use std::io;
use std::iter::FromIterator;

use super::traits::*;
use crate::persist::{self, Persist};
use crate::space_usage::SpaceUsage;
use crate::storage::{Address, BlockType};

/// Uncompressed vector of bits.
///
/// The bits are packed into machine words; bits past the logical length
/// in the final block are kept zero, so whole-block population counts by
/// the index structures are always safe.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BitVector<Block: BlockType = usize> {
    data: Vec<Block>,
    len: u64,
}

impl<Block: BlockType> BitVector<Block> {
    /// Creates a new, empty bit vector.
    pub fn new() -> Self {
        BitVector {
            data: Vec::new(),
            len: 0,
        }
    }

    /// Creates a new, empty bit vector with space allocated for
    /// `capacity` bits.
    ///
    /// # Panics
    ///
    /// Panics if the number of blocks required by `capacity` does not
    /// fit in a `usize`.
    pub fn with_capacity(capacity: u64) -> Self {
        let blocks = Block::checked_div_nbits(capacity + Block::nbits() as u64 - 1)
            .expect("BitVector::with_capacity: overflow");
        BitVector {
            data: Vec::with_capacity(blocks),
            len: 0,
        }
    }

    /// Creates a new bit vector of `len` bits initialized to `value`.
    ///
    /// # Panics
    ///
    /// Panics if the number of blocks required by `len` does not fit in
    /// a `usize`.
    pub fn with_fill(len: u64, value: bool) -> Self {
        let blocks = Block::checked_div_nbits(len + Block::nbits() as u64 - 1)
            .expect("BitVector::with_fill: overflow");
        let fill = if value { !Block::zero() } else { Block::zero() };

        let mut result = BitVector {
            data: vec![fill; blocks],
            len,
        };
        result.clear_trailing_bits();
        result
    }

    /// Returns an iterator over the bits of the bit vector.
    pub fn iter(&self) -> Iter<Block> {
        Iter {
            vec: self,
            index: 0,
        }
    }

    /// How many bits the bit vector can hold without reallocating.
    pub fn capacity(&self) -> u64 {
        self.data.capacity() as u64 * Block::nbits() as u64
    }

    /// Zeroes any bits of the last block that lie past `self.len`.
    fn clear_trailing_bits(&mut self) {
        let keep = Block::mod_nbits(self.len);
        if keep != 0 {
            let last = self.data.len() - 1;
            self.data[last] = self.data[last] & Block::low_mask(keep);
        }
    }
}

impl<Block: BlockType> Default for BitVector<Block> {
    fn default() -> Self {
        BitVector::new()
    }
}

impl<Block: BlockType> BitVec for BitVector<Block> {
    type Block = Block;

    #[inline]
    fn bit_len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn block_len(&self) -> usize {
        self.data.len()
    }

    fn get_bit(&self, position: u64) -> bool {
        assert!(position < self.len, "BitVector::get_bit: out of bounds");

        let address = Address::new::<Block>(position);
        self.data[address.block_index].get_bit(address.bit_offset)
    }

    #[inline]
    fn get_block(&self, position: usize) -> Block {
        assert!(
            position < self.data.len(),
            "BitVector::get_block: out of bounds"
        );
        self.data[position]
    }
}

impl<Block: BlockType> BitVecMut for BitVector<Block> {
    fn set_bit(&mut self, position: u64, value: bool) {
        assert!(position < self.len, "BitVector::set_bit: out of bounds");

        let address = Address::new::<Block>(position);
        let old_block = self.data[address.block_index];
        self.data[address.block_index] = old_block.with_bit(address.bit_offset, value);
    }

    fn set_block(&mut self, position: usize, value: Block) {
        assert!(
            position < self.data.len(),
            "BitVector::set_block: out of bounds"
        );
        self.data[position] = value;
        self.clear_trailing_bits();
    }
}

impl<Block: BlockType> BitVecPush for BitVector<Block> {
    fn push_bit(&mut self, value: bool) {
        let capacity = Block::nbits() as u64 * self.data.len() as u64;
        if self.len == capacity {
            self.data.push(Block::zero());
        }

        let old_len = self.len;
        self.len = old_len + 1;
        self.set_bit(old_len, value);
    }

    fn pop_bit(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }

        let result = self.get_bit(self.len - 1);
        // Clear before shrinking so the trailing bits stay zero.
        self.set_bit(self.len - 1, false);
        self.len -= 1;

        if Block::ceil_div_nbits(self.len) < self.data.len() {
            self.data.pop();
        }

        Some(result)
    }

    fn push_block(&mut self, value: Block) {
        self.align_block(false);
        self.data.push(value);
        self.len = Block::nbits() as u64 * self.data.len() as u64;
    }
}

impl<'a, Block: BlockType> BitVec for &'a BitVector<Block> {
    type Block = Block;

    #[inline]
    fn bit_len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn block_len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get_bit(&self, position: u64) -> bool {
        <BitVector<Block> as BitVec>::get_bit(self, position)
    }

    #[inline]
    fn get_block(&self, position: usize) -> Block {
        <BitVector<Block> as BitVec>::get_block(self, position)
    }
}

impl<Block: BlockType> FromIterator<bool> for BitVector<Block> {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut result = BitVector::with_capacity(iter.size_hint().0 as u64);
        for bit in iter {
            result.push_bit(bit);
        }
        result
    }
}

impl<Block: BlockType> fmt::Binary for BitVector<Block> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        for bit in self.iter() {
            formatter.write_str(if bit { "1" } else { "0" })?;
        }

        Ok(())
    }
}

impl<Block: BlockType> SpaceUsage for BitVector<Block> {
    fn is_stack_only() -> bool {
        false
    }

    fn heap_bytes(&self) -> usize {
        self.data.heap_bytes()
    }
}

impl<Block: BlockType> Persist for BitVector<Block> {
    fn serialize<W: io::Write>(&self, sink: &mut W) -> crate::errors::Result<()> {
        persist::write_u64(sink, self.len)?;
        for block in &self.data {
            block.write_block::<_, byteorder::LittleEndian>(sink)?;
        }
        Ok(())
    }

    fn deserialize<R: io::Read>(source: &mut R) -> crate::errors::Result<Self> {
        let len = persist::read_u64(source)?;
        let blocks = len
            .checked_add(Block::nbits() as u64 - 1)
            .and_then(Block::checked_div_nbits)
            .ok_or(crate::errors::Error::Deserialization("length overflow"))?;

        let mut data = Vec::with_capacity(blocks);
        for _ in 0..blocks {
            data.push(Block::read_block::<_, byteorder::LittleEndian>(source).map_err(persist::truncated)?);
        }

        let result = BitVector { data, len };
        let keep = Block::mod_nbits(len);
        if keep != 0 && result.data[blocks - 1].get_bits(keep, Block::nbits() - keep) != Block::zero() {
            return Err(crate::errors::Error::Deserialization(
                "bits set past the vector length",
            ));
        }
        Ok(result)
    }
}

/// Iterator over the bits of a [`BitVector`](struct.BitVector.html).
#[derive(Clone, Debug)]
pub struct Iter<'a, Block: BlockType + 'a = usize> {
    vec: &'a BitVector<Block>,
    index: u64,
}

impl<'a, Block: BlockType> Iterator for Iter<'a, Block> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.index < self.vec.bit_len() {
            let result = self.vec.get_bit(self.index);
            self.index += 1;
            Some(result)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.vec.bit_len() - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl<'a, Block: BlockType> ExactSizeIterator for Iter<'a, Block> {}

impl<'a, Block: BlockType + 'a> IntoIterator for &'a BitVector<Block> {
    type Item = bool;
    type IntoIter = Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::persist::properties;

    macro_rules! assert_bv {
        ($expected:expr, $actual:expr) => {
            assert_eq!($expected, format!("{:b}", $actual))
        };
    }

    #[test]
    fn new() {
        let bit_vector: BitVector = BitVector::new();
        assert_eq!(0, bit_vector.bit_len());
        assert_eq!(0, bit_vector.block_len());
    }

    #[test]
    fn with_fill() {
        let bv0: BitVector = BitVector::with_fill(20, false);
        let bv1: BitVector = BitVector::with_fill(20, true);

        assert_eq!(false, bv0.get_bit(3));
        assert_eq!(true, bv1.get_bit(3));

        assert_bv!("00000000000000000000", bv0);
        assert_bv!("11111111111111111111", bv1);
    }

    #[test]
    fn with_fill_clears_trailing() {
        let bv: BitVector<u8> = BitVector::with_fill(11, true);
        assert_eq!(0b00000111, bv.get_block(1));
    }

    #[test]
    fn push_pop() {
        let mut bit_vector: BitVector = BitVector::new();
        bit_vector.push_bit(true);
        bit_vector.push_bit(false);
        bit_vector.push_bit(false);
        assert_eq!(Some(false), bit_vector.pop_bit());
        assert_eq!(Some(false), bit_vector.pop_bit());
        assert_eq!(Some(true), bit_vector.pop_bit());
        assert_eq!(None, bit_vector.pop_bit());
    }

    #[test]
    fn push_get() {
        let mut bit_vector: BitVector = BitVector::new();
        bit_vector.push_bit(true);
        bit_vector.push_bit(false);
        bit_vector.push_bit(false);
        assert_eq!(3, bit_vector.bit_len());
        assert_eq!(1, bit_vector.block_len());
        assert_eq!(true, bit_vector.get_bit(0));
        assert_eq!(false, bit_vector.get_bit(1));
        assert_eq!(false, bit_vector.get_bit(2));
    }

    #[test]
    #[should_panic]
    fn get_oob() {
        let mut bit_vector: BitVector = BitVector::new();
        bit_vector.push_bit(true);
        bit_vector.get_bit(3);
    }

    #[test]
    fn push_bits_get_block() {
        let mut bit_vector: BitVector = BitVector::new();
        bit_vector.push_bit(true); // 1
        bit_vector.push_bit(true); // 2
        bit_vector.push_bit(false); // (4)
        bit_vector.push_bit(false); // (8)
        bit_vector.push_bit(true); // 16

        assert_eq!(19, bit_vector.get_block(0));
    }

    #[test]
    fn push_block_get_block() {
        let mut bit_vector: BitVector = BitVector::new();
        bit_vector.push_block(358);
        bit_vector.push_block(!0);
        assert_eq!(358, bit_vector.get_block(0));
        assert_eq!(!0, bit_vector.get_block(1));
    }

    #[test]
    #[should_panic]
    fn get_block_oob() {
        let mut bit_vector: BitVector = BitVector::new();
        bit_vector.push_bit(true);
        bit_vector.get_block(3);
    }

    #[test]
    fn push_block_get_bit() {
        let mut bit_vector: BitVector = BitVector::new();
        bit_vector.push_block(0b10101);
        assert_eq!(true, bit_vector.get_bit(0));
        assert_eq!(false, bit_vector.get_bit(1));
        assert_eq!(true, bit_vector.get_bit(2));
        assert_eq!(false, bit_vector.get_bit(3));
        assert_eq!(true, bit_vector.get_bit(4));
        assert_eq!(false, bit_vector.get_bit(5));
    }

    #[test]
    fn set_block_masks_last() {
        let mut bit_vector: BitVector = BitVector::new();

        bit_vector.push_bit(false);
        bit_vector.set_block(0, 0b11);
        assert_eq!(0b01, bit_vector.get_block(0));

        bit_vector.push_bit(false);
        bit_vector.set_block(0, 0b11);
        assert_eq!(0b11, bit_vector.get_block(0));
    }

    #[test]
    fn from_iterator() {
        let bv: BitVector = vec![true, false, true, true, false, true].into_iter().collect();
        assert_bv!("101101", bv);
        assert_eq!(6, bv.bit_len());
    }

    #[test]
    fn set_bits_across_blocks() {
        let mut bv: BitVector<u8> = BitVector::with_fill(16, false);
        bv.set_bits(6, 5, 0b10110);
        assert_eq!(0b10110, bv.get_bits(6, 5));
        assert_eq!(false, bv.get_bit(5));
        assert_eq!(false, bv.get_bit(11));
    }

    #[test]
    fn serialize_round_trip() {
        let bv: BitVector<u64> =
            (0..1000).map(|i| i % 3 == 0 || i % 7 == 0).collect();

        properties::round_trip(&bv, |before, after| assert_eq!(before, after));
        properties::rejects_truncation(&bv);
    }

    #[test]
    fn deserialize_rejects_trailing_garbage() {
        use crate::persist::Persist;

        let mut bv: BitVector<u8> = BitVector::with_fill(4, true);
        bv.len = 3; // forge an inconsistent length

        let mut buffer = Vec::new();
        bv.serialize(&mut buffer).unwrap();
        assert!(BitVector::<u8>::deserialize(&mut &buffer[..]).is_err());
    }
}
