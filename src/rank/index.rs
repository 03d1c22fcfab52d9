use std::io;

use num_traits::PrimInt;

use super::{BitRankSupport, RankSupport};
use crate::bit_vec::BitVec;
use crate::int_vec::{IntVec, IntVector};
use crate::persist::Persist;
use crate::space_usage::SpaceUsage;
use crate::storage::BlockType;

/// Two-level rank structure for constant-time rank queries over a bit
/// store.
///
/// A superblock table holds the cumulative 1 count at every superblock
/// boundary; a block table holds, for every machine word, the 1 count
/// since the enclosing superblock. A query adds the two cached counts and
/// a popcount of the partial word below the queried position. Superblocks
/// span lg²(n) bits rounded up to whole words, so the side tables stay a
/// small constant fraction of the store regardless of its contents.
///
/// The store may be owned or borrowed: building over `&BitVector` freezes
/// the vector for the index's lifetime, so no mutation can invalidate the
/// tables.
///
/// Construct with `RankIndex::new`.
#[derive(Clone, Debug)]
pub struct RankIndex<Store: BitVec> {
    bit_store: Store,
    large_block_size: usize,
    large_block_ranks: IntVector<u64>,
    small_block_ranks: IntVector<u64>,
}

impl<Store: BitVec> RankIndex<Store> {
    /// Creates a new rank index for the given bit store.
    ///
    /// Runs in one O(n) pass and cannot fail.
    pub fn new(bits: Store) -> Self {
        let n = bits.bit_len();
        let lg_n = n.ceil_lg().max(1);
        let lg2_n = lg_n * lg_n;

        let small_block_size = Store::Block::nbits();
        let small_per_large = lg2_n.ceil_div(small_block_size).max(1);
        let large_block_size = small_block_size * small_per_large;

        let large_meta_size = (n + 1).ceil_lg().max(1);
        let small_meta_size = (large_block_size as u64 + 1).ceil_lg().max(1);

        let mut large_block_ranks =
            IntVector::with_capacity(large_meta_size, n / large_block_size as u64 + 2);
        let mut small_block_ranks =
            IntVector::with_capacity(small_meta_size, n / small_block_size as u64 + 2);

        let mut current_rank: u64 = 0;
        let mut last_large_rank: u64 = 0;
        let mut small_block_index: usize = 0;

        for i in 0..bits.block_len() {
            if small_block_index == 0 {
                large_block_ranks.push(current_rank);
                last_large_rank = current_rank;
            }

            small_block_ranks.push(current_rank - last_large_rank);

            current_rank += bits.get_block(i).count_ones() as u64;
            small_block_index += 1;

            if small_block_index == small_per_large {
                small_block_index = 0;
            }
        }

        // Entries covering the boundary position n itself.
        if small_block_index == 0 {
            large_block_ranks.push(current_rank);
            last_large_rank = current_rank;
        }
        small_block_ranks.push(current_rank - last_large_rank);

        RankIndex {
            bit_store: bits,
            large_block_size,
            large_block_ranks,
            small_block_ranks,
        }
    }

    /// Borrows a reference to the underlying bit store.
    pub fn inner(&self) -> &Store {
        &self.bit_store
    }

    /// Returns the underlying bit store.
    pub fn into_inner(self) -> Store {
        self.bit_store
    }
}

impl<Store: BitVec> RankSupport for RankIndex<Store> {
    type Over = bool;

    fn rank(&self, position: u64, value: bool) -> u64 {
        if value {
            self.rank1(position)
        } else {
            self.rank0(position)
        }
    }

    fn limit(&self) -> u64 {
        self.bit_store.bit_len()
    }
}

impl<Store: BitVec> BitRankSupport for RankIndex<Store> {
    fn rank1(&self, position: u64) -> u64 {
        assert!(
            position <= self.limit(),
            "RankIndex::rank1: out of bounds"
        );

        let large_rank = self
            .large_block_ranks
            .get(position / self.large_block_size as u64);

        let word = Store::Block::div_nbits(position);
        let offset = Store::Block::mod_nbits(position);

        let small_rank = self.small_block_ranks.get(word as u64);

        let bits_rank = if offset == 0 {
            0
        } else {
            self.bit_store
                .get_block(word)
                .get_bits(0, offset)
                .count_ones() as u64
        };

        large_rank + small_rank + bits_rank
    }
}

impl<Store: BitVec> BitVec for RankIndex<Store> {
    impl_bit_vec_adapter!(Store::Block, bit_store);
}

impl<Store: BitVec + SpaceUsage> SpaceUsage for RankIndex<Store> {
    #[inline]
    fn is_stack_only() -> bool {
        false
    }

    fn heap_bytes(&self) -> usize {
        self.large_block_ranks.heap_bytes()
            + self.small_block_ranks.heap_bytes()
            + self.bit_store.heap_bytes()
    }
}

impl<Store: BitVec + Persist> Persist for RankIndex<Store> {
    fn serialize<W: io::Write>(&self, sink: &mut W) -> crate::errors::Result<()> {
        // The side tables are derived; only the store goes on the wire.
        self.bit_store.serialize(sink)
    }

    fn deserialize<R: io::Read>(source: &mut R) -> crate::errors::Result<Self> {
        Ok(RankIndex::new(Store::deserialize(source)?))
    }
}
