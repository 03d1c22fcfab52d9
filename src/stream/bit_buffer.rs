use crate::bit_vec::{BitVec, BitVecMut, BitVecPush, BitVector};
use crate::errors::{Error, Result};
use crate::stream::{BitRead, BitWrite};

/// A positioned cursor for reading bits from or writing bits to an
/// underlying bit store.
///
/// Reading works over any `BitVec` store, including a borrowed
/// `&BitVector`, so a single frozen bitstream can serve many concurrent
/// readers. Writing requires a growable store.
#[derive(Clone, Debug)]
pub struct BitBuffer<Store: BitVec = BitVector<usize>> {
    data: Store,
    pos: u64,
}

impl<Store: BitVec + Default> BitBuffer<Store> {
    /// Creates a new, empty bit buffer.
    pub fn new() -> Self {
        BitBuffer {
            data: Store::default(),
            pos: 0,
        }
    }
}

impl<Store: BitVec> BitBuffer<Store> {
    /// Creates a new bit buffer for reading from a bit store, positioned
    /// at the start.
    pub fn from(input: Store) -> Self {
        BitBuffer {
            data: input,
            pos: 0,
        }
    }

    /// Creates a new bit buffer for appending to a bit store, positioned
    /// at the end.
    pub fn append(store: Store) -> Self {
        let len = store.bit_len();
        BitBuffer {
            data: store,
            pos: len,
        }
    }

    /// Returns the store underlying the bit buffer.
    #[inline]
    pub fn into_inner(self) -> Store {
        self.data
    }

    /// Gives access to the store underlying the bit buffer.
    #[inline]
    pub fn inner(&self) -> &Store {
        &self.data
    }

    /// The position in the bit buffer where the next read or write will
    /// occur.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Moves the position for the next read or write.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        if position <= self.data.bit_len() {
            self.pos = position;
            Ok(())
        } else {
            Err(Error::oob(position, self.data.bit_len() + 1))
        }
    }
}

impl<Store: BitVec + Default> Default for BitBuffer<Store> {
    fn default() -> Self {
        BitBuffer::new()
    }
}

impl<Store: BitVec> BitRead for BitBuffer<Store> {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.pos < self.data.bit_len() {
            let result = self.data.get_bit(self.pos);
            self.pos += 1;
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }
}

impl<Store: BitVec + BitVecMut + BitVecPush> BitWrite for BitBuffer<Store> {
    fn write_bit(&mut self, value: bool) -> Result<()> {
        while self.pos >= self.data.bit_len() {
            self.data.push_bit(false);
        }

        let pos = self.pos;
        self.data.set_bit(pos, value);
        self.pos = pos + 1;

        Ok(())
    }
}
