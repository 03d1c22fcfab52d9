use std::io;

use num_traits::{One, PrimInt, Zero};

use super::Select1Support;
use crate::bit_vec::BitVec;
use crate::int_vec::{IntVec, IntVector};
use crate::internal::search::binary_search_function;
use crate::persist::Persist;
use crate::rank::{BitRankSupport, RankSupport};
use crate::space_usage::SpaceUsage;
use crate::storage::BlockType;

/// How many 1 bits each sample bracket covers.
const SAMPLE_STEP: u64 = 512;

/// Brackets spanning at most this many bit positions store explicit
/// offsets; wider brackets fall back to rank bisection.
const DENSE_SPAN_MAX: u64 = 1 << 16;

/// Per-bracket payload: either nothing (a sparse run, answered by rank
/// bisection between the bracketing samples) or the bit-compressed
/// offset of every 1 bit in the bracket relative to its first.
#[derive(Clone, Debug)]
enum Bracket {
    Sparse,
    Dense(IntVector<u64>),
}

/// Position-sampled select structure for constant-time (amortized)
/// select queries over a rank-capable bit store.
///
/// The position of every `SAMPLE_STEP`th 1 bit is sampled. Each bracket
/// between consecutive samples is classified at build time: a dense
/// bracket keeps a compact table of all its 1 positions and answers by
/// direct lookup, while a sparse bracket holds no table and answers by
/// binary search over the store's rank, bounded to the bracket.
///
/// Construct with `SelectIndex::new` over a `RankIndex` (owned or
/// borrowed).
#[derive(Clone, Debug)]
pub struct SelectIndex<Store: BitVec + BitRankSupport> {
    rank_store: Store,
    ones: u64,
    samples: IntVector<u64>,
    brackets: Vec<Bracket>,
}

impl<Store: BitVec + BitRankSupport> SelectIndex<Store> {
    /// Creates a new select index over the given rank-capable store.
    ///
    /// Runs in O(n): one pass to count (via the store's rank) and one
    /// pass to place the 1 bits.
    pub fn new(bits: Store) -> Self {
        let limit = bits.bit_len();
        let ones = bits.rank1(limit);

        let sample_width = (limit + 1).ceil_lg().max(1);
        let mut samples = IntVector::with_capacity(sample_width, ones / SAMPLE_STEP + 1);
        let mut brackets = Vec::with_capacity((ones / SAMPLE_STEP + 1) as usize);

        let mut pending: Vec<u64> = Vec::with_capacity(SAMPLE_STEP as usize);

        for word in 0..bits.block_len() {
            let mut block = bits.get_block(word);
            while block != Store::Block::zero() {
                let offset = block.trailing_zeros() as u64;
                pending.push(Store::Block::nbits() as u64 * word as u64 + offset);
                block = block & (block - Store::Block::one());

                if pending.len() == SAMPLE_STEP as usize {
                    Self::seal_bracket(&mut samples, &mut brackets, &pending);
                    pending.clear();
                }
            }
        }

        if !pending.is_empty() {
            Self::seal_bracket(&mut samples, &mut brackets, &pending);
        }

        SelectIndex {
            rank_store: bits,
            ones,
            samples,
            brackets,
        }
    }

    fn seal_bracket(samples: &mut IntVector<u64>, brackets: &mut Vec<Bracket>, ones: &[u64]) {
        let first = ones[0];
        let span = ones[ones.len() - 1] - first + 1;

        samples.push(first);

        if span <= DENSE_SPAN_MAX {
            let mut offsets = IntVector::with_capacity(span.ceil_lg().max(1), ones.len() as u64);
            for &position in ones {
                offsets.push(position - first);
            }
            brackets.push(Bracket::Dense(offsets));
        } else {
            brackets.push(Bracket::Sparse);
        }
    }

    /// The number of 1 bits in the underlying store.
    pub fn ones(&self) -> u64 {
        self.ones
    }

    /// Borrows a reference to the underlying store.
    pub fn inner(&self) -> &Store {
        &self.rank_store
    }

    /// Returns the underlying store.
    pub fn into_inner(self) -> Store {
        self.rank_store
    }
}

impl<Store: BitVec + BitRankSupport> Select1Support for SelectIndex<Store> {
    fn select1(&self, index: u64) -> Option<u64> {
        if index == 0 || index > self.ones {
            return None;
        }

        let bracket = ((index - 1) / SAMPLE_STEP) as usize;
        let within = (index - 1) % SAMPLE_STEP;
        let first = self.samples.get(bracket as u64);

        match &self.brackets[bracket] {
            Bracket::Dense(offsets) => Some(first + offsets.get(within)),
            Bracket::Sparse => {
                if within == 0 {
                    return Some(first);
                }

                let end = if bracket + 1 < self.brackets.len() {
                    self.samples.get(bracket as u64 + 1)
                } else {
                    self.rank_store.bit_len()
                };

                binary_search_function(first + 1, end, index, |position| {
                    self.rank_store.rank1(position + 1)
                })
            }
        }
    }
}

impl<Store: BitVec + BitRankSupport> BitVec for SelectIndex<Store> {
    impl_bit_vec_adapter!(Store::Block, rank_store);
}

impl<Store: BitVec + BitRankSupport> RankSupport for SelectIndex<Store> {
    impl_rank_support_adapter!(bool, rank_store);
}

impl<Store: BitVec + BitRankSupport> BitRankSupport for SelectIndex<Store> {
    impl_bit_rank_support_adapter!(rank_store);
}

impl<Store: BitVec + BitRankSupport + SpaceUsage> SpaceUsage for SelectIndex<Store> {
    #[inline]
    fn is_stack_only() -> bool {
        false
    }

    fn heap_bytes(&self) -> usize {
        let brackets: usize = self
            .brackets
            .iter()
            .map(|bracket| match bracket {
                Bracket::Sparse => 0,
                Bracket::Dense(offsets) => offsets.heap_bytes(),
            })
            .sum();

        self.rank_store.heap_bytes()
            + self.samples.heap_bytes()
            + self.brackets.capacity() * std::mem::size_of::<Bracket>()
            + brackets
    }
}

impl<Store: BitVec + BitRankSupport + Persist> Persist for SelectIndex<Store> {
    fn serialize<W: io::Write>(&self, sink: &mut W) -> crate::errors::Result<()> {
        // Samples and brackets are derived; only the store goes on the
        // wire.
        self.rank_store.serialize(sink)
    }

    fn deserialize<R: io::Read>(source: &mut R) -> crate::errors::Result<Self> {
        Ok(SelectIndex::new(Store::deserialize(source)?))
    }
}
