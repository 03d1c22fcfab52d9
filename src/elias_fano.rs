//! Quasi-succinct representation of monotone integer sequences.

use std::io;

use crate::bit_vec::{BitVec, BitVecMut, BitVector};
use crate::errors::{Error, Result};
use crate::int_vec::{IntVec, IntVector};
use crate::persist::{self, Persist};
use crate::rank::{BitRankSupport, RankIndex};
use crate::select::{BinSearchSelect, Select0Support, Select1Support, SelectIndex};
use crate::space_usage::SpaceUsage;
use crate::storage::BlockType;

/// A non-decreasing sequence of integers from a bounded universe, stored
/// in near-minimal space with constant-time access.
///
/// Each element is split into a fixed-width low part and a high part.
/// The low parts go into a bit-packed array; the high parts are recorded
/// in unary in a bit vector, one terminator bit per element positioned at
/// `high + index`, with the element's own rank/select indexes layered on
/// top. Everything is private to the set: the high-bit vector is never
/// shared with callers.
///
/// The split width is `l = floor(lg(u / n))` when `u / n >= 2` and 0
/// otherwise, and the high-bit vector has one closing zero for every
/// reachable high value. Both ends of that convention (all information in
/// the high bits, and all in the low bits) are pinned by the test suite.
pub struct EliasFano {
    len: u64,
    universe: u64,
    low_bits: usize,
    low: IntVector<u64>,
    high: SelectIndex<RankIndex<BitVector<u64>>>,
}

/// The low-part width for `len` elements below `universe`.
fn split_width(len: u64, universe: u64) -> usize {
    if len == 0 {
        return 0;
    }

    let ratio = universe / len;
    if ratio >= 2 {
        ratio.floor_lg()
    } else {
        0
    }
}

impl EliasFano {
    /// Builds the set from a non-decreasing slice of elements, each
    /// strictly below `universe`.
    ///
    /// Both preconditions are checked: a descending pair or an element
    /// at or above the universe fails with `Error::InvalidInput` and no
    /// set is built. Duplicate elements are allowed.
    pub fn new(values: &[u64], universe: u64) -> Result<Self> {
        let mut previous = 0;
        for &value in values {
            if value >= universe {
                return Err(Error::InvalidInput("element not below the universe"));
            }
            if value < previous {
                return Err(Error::InvalidInput("sequence must be non-decreasing"));
            }
            previous = value;
        }

        Ok(Self::build(values, universe))
    }

    /// Builds the set from a bit vector marking which universe values
    /// are present.
    ///
    /// The universe is the vector's length; the elements are the
    /// positions of its 1 bits.
    pub fn from_bits(bits: &BitVector<u64>) -> Self {
        let mut values = Vec::new();
        for position in 0..bits.bit_len() {
            if bits.get_bit(position) {
                values.push(position);
            }
        }

        Self::build(&values, bits.bit_len())
    }

    /// Assembles the set. The input must already be validated.
    fn build(values: &[u64], universe: u64) -> Self {
        let len = values.len() as u64;
        let low_bits = split_width(len, universe);

        let mut low = IntVector::with_capacity(low_bits.max(1), len);
        let mut high_bv = if len == 0 {
            BitVector::new()
        } else {
            let max_high = (universe - 1) >> low_bits;
            BitVector::with_fill(len + max_high + 1, false)
        };

        for (index, &value) in values.iter().enumerate() {
            if low_bits > 0 {
                low.push(value & u64::low_mask(low_bits));
            }
            high_bv.set_bit((value >> low_bits) + index as u64, true);
        }

        EliasFano {
            len,
            universe,
            low_bits,
            low,
            high: SelectIndex::new(RankIndex::new(high_bv)),
        }
    }

    /// The number of stored elements.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The exclusive upper bound the elements were drawn from.
    pub fn universe(&self) -> u64 {
        self.universe
    }

    /// The width of the fixed low-bit part, in bits.
    pub fn low_bit_width(&self) -> usize {
        self.low_bits
    }

    /// Returns the `index`th element of the sequence.
    ///
    /// Fails with `Error::IndexOutOfRange` when `index >= self.len()`.
    pub fn access(&self, index: u64) -> Result<u64> {
        if index >= self.len {
            return Err(Error::oob(index, self.len));
        }

        Ok(self.read(index))
    }

    /// Reconstructs element `index`, which must be in bounds.
    fn read(&self, index: u64) -> u64 {
        let position = self
            .high
            .select1(index + 1)
            .expect("EliasFano::read: high bits out of sync");
        let high = position - index;

        let low = if self.low_bits > 0 {
            self.low.get(index)
        } else {
            0
        };

        (high << self.low_bits) | low
    }

    /// The number of stored elements strictly less than `value`.
    ///
    /// Any `value` is a valid argument; the result saturates at
    /// `self.len()` once `value` passes the largest element.
    pub fn rank(&self, value: u64) -> u64 {
        if self.len == 0 || value == 0 {
            return 0;
        }
        if value >= self.universe {
            return self.len;
        }

        let high = value >> self.low_bits;
        let (start, end) = self.bucket(high);

        let low_value = value & u64::low_mask(self.low_bits);

        // The low parts within a bucket are sorted, so bisect for the
        // first one reaching the query's low part.
        let mut lo = start;
        let mut hi = end;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let mid_low = if self.low_bits > 0 { self.low.get(mid) } else { 0 };
            if mid_low < low_value {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        lo
    }

    /// The element index range `[start, end)` holding high part `high`.
    ///
    /// Requires `high <= (universe - 1) >> low_bits` and a non-empty set,
    /// which together guarantee both zero-selects succeed.
    fn bucket(&self, high: u64) -> (u64, u64) {
        let zero_select = BinSearchSelect::new(self.high.inner());

        let start = if high == 0 {
            0
        } else {
            let zero = zero_select
                .select0(high)
                .expect("EliasFano::bucket: missing zero terminator");
            self.high.rank1(zero)
        };

        let zero = zero_select
            .select0(high + 1)
            .expect("EliasFano::bucket: missing zero terminator");
        let end = self.high.rank1(zero);

        (start, end)
    }

    /// The smallest stored element greater than or equal to `value`, or
    /// `None` if every element is smaller.
    pub fn next_geq(&self, value: u64) -> Option<u64> {
        let index = self.rank(value);
        if index < self.len {
            Some(self.read(index))
        } else {
            None
        }
    }

    /// Is `value` one of the stored elements?
    pub fn contains(&self, value: u64) -> bool {
        self.next_geq(value) == Some(value)
    }
}

impl SpaceUsage for EliasFano {
    fn is_stack_only() -> bool {
        false
    }

    fn heap_bytes(&self) -> usize {
        self.low.heap_bytes() + self.high.heap_bytes()
    }
}

impl Persist for EliasFano {
    fn serialize<W: io::Write>(&self, sink: &mut W) -> Result<()> {
        persist::write_u64(sink, self.len)?;
        persist::write_u64(sink, self.universe)?;
        persist::write_u64(sink, self.low_bits as u64)?;
        self.low.serialize(sink)?;
        self.high.inner().inner().serialize(sink)
    }

    fn deserialize<R: io::Read>(source: &mut R) -> Result<Self> {
        let len = persist::read_u64(source)?;
        let universe = persist::read_u64(source)?;
        let low_bits = persist::read_u64(source)? as usize;

        if low_bits >= 64 {
            return Err(Error::Deserialization("bad low-bit width"));
        }

        let low = IntVector::deserialize(source)?;
        let high_bv: BitVector<u64> = BitVector::deserialize(source)?;

        let expected_low_len = if low_bits > 0 { len } else { 0 };
        let expected_high_len = if len == 0 {
            0
        } else {
            len + ((universe - 1) >> low_bits) + 1
        };

        if low.len() != expected_low_len
            || high_bv.bit_len() != expected_high_len
            || (len > 0 && universe == 0)
        {
            return Err(Error::Deserialization("inconsistent lengths"));
        }

        let high = SelectIndex::new(RankIndex::new(high_bv));
        if high.ones() != len {
            return Err(Error::Deserialization("wrong terminator count"));
        }

        Ok(EliasFano {
            len,
            universe,
            low_bits,
            low,
            high,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bit_vec::BitVecPush;
    use quickcheck::quickcheck;

    #[test]
    fn worked_example() {
        let ef = EliasFano::new(&[2, 5, 7, 12], 16).unwrap();

        assert_eq!(4, ef.len());
        assert_eq!(2, ef.low_bit_width());

        assert_eq!(2, ef.access(0).unwrap());
        assert_eq!(5, ef.access(1).unwrap());
        assert_eq!(7, ef.access(2).unwrap());
        assert_eq!(12, ef.access(3).unwrap());
        assert!(ef.access(4).is_err());

        assert_eq!(Some(7), ef.next_geq(6));
        assert_eq!(Some(7), ef.next_geq(7));
        assert_eq!(Some(12), ef.next_geq(8));
        assert_eq!(None, ef.next_geq(13));

        assert!(ef.contains(7));
        assert!(!ef.contains(6));
        assert!(!ef.contains(15));
    }

    #[test]
    fn rank_values() {
        let ef = EliasFano::new(&[2, 5, 7, 12], 16).unwrap();

        assert_eq!(0, ef.rank(0));
        assert_eq!(0, ef.rank(2));
        assert_eq!(1, ef.rank(3));
        assert_eq!(1, ef.rank(5));
        assert_eq!(2, ef.rank(6));
        assert_eq!(2, ef.rank(7));
        assert_eq!(3, ef.rank(8));
        assert_eq!(3, ef.rank(12));
        assert_eq!(4, ef.rank(13));
        assert_eq!(4, ef.rank(255));
    }

    #[test]
    fn duplicates() {
        let ef = EliasFano::new(&[3, 3, 3, 9], 10).unwrap();

        assert_eq!(3, ef.access(0).unwrap());
        assert_eq!(3, ef.access(2).unwrap());
        assert_eq!(0, ef.rank(3));
        assert_eq!(3, ef.rank(4));
        assert_eq!(Some(3), ef.next_geq(1));
        assert!(ef.contains(3));
        assert!(!ef.contains(4));
    }

    #[test]
    fn invalid_input() {
        assert!(EliasFano::new(&[1, 3, 2], 10).is_err());
        assert!(EliasFano::new(&[1, 3, 10], 10).is_err());
        assert!(EliasFano::new(&[10], 10).is_err());
    }

    #[test]
    fn empty() {
        let ef = EliasFano::new(&[], 100).unwrap();

        assert!(ef.is_empty());
        assert!(ef.access(0).is_err());
        assert_eq!(0, ef.rank(50));
        assert_eq!(None, ef.next_geq(0));
        assert!(!ef.contains(0));
    }

    #[test]
    fn all_low_bits() {
        // u <= n forces l = 0: every bit of information lives in the
        // high vector.
        let values = [0, 1, 1, 3];
        let ef = EliasFano::new(&values, 4).unwrap();

        assert_eq!(0, ef.low_bit_width());
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(v, ef.access(i as u64).unwrap());
        }
        assert_eq!(Some(3), ef.next_geq(2));
        assert!(!ef.contains(2));
    }

    #[test]
    fn all_high_bits() {
        // A single element in a huge universe maximizes l.
        let value = 987_654_321;
        let ef = EliasFano::new(&[value], 1 << 40).unwrap();

        assert_eq!(40, ef.low_bit_width());
        assert_eq!(value, ef.access(0).unwrap());
        assert_eq!(Some(value), ef.next_geq(0));
        assert_eq!(Some(value), ef.next_geq(value));
        assert_eq!(None, ef.next_geq(value + 1));
        assert!(ef.contains(value));
    }

    #[test]
    fn power_of_two_boundaries() {
        // Universe exactly a power-of-two multiple of the length, where
        // the split convention is most sensitive.
        for &(n, u) in &[(8u64, 8u64), (8, 16), (8, 17), (16, 16), (4, 64)] {
            let values: Vec<u64> = (0..n).map(|i| i * (u / n)).collect();
            let ef = EliasFano::new(&values, u).unwrap();

            for (i, &v) in values.iter().enumerate() {
                assert_eq!(v, ef.access(i as u64).unwrap(), "n={} u={} i={}", n, u, i);
            }
            for &v in &values {
                assert!(ef.contains(v), "n={} u={} v={}", n, u, v);
            }
            assert_eq!(None, ef.next_geq(u - 1 + 1));
        }
    }

    #[test]
    fn max_universe_element() {
        let ef = EliasFano::new(&[0, 15], 16).unwrap();
        assert!(ef.contains(15));
        assert_eq!(Some(15), ef.next_geq(15));
        assert_eq!(None, ef.next_geq(16));
    }

    #[test]
    fn from_bits_example() {
        let mut bits: BitVector<u64> = BitVector::new();
        for &bit in &[true, false, true, true, false, true] {
            bits.push_bit(bit);
        }

        let ef = EliasFano::from_bits(&bits);

        assert_eq!(4, ef.len());
        assert_eq!(6, ef.universe());
        assert_eq!(0, ef.access(0).unwrap());
        assert_eq!(2, ef.access(1).unwrap());
        assert_eq!(3, ef.access(2).unwrap());
        assert_eq!(5, ef.access(3).unwrap());
        assert!(ef.contains(3));
        assert!(!ef.contains(4));
    }

    #[test]
    fn qc_round_trip() {
        fn prop(mut values: Vec<u64>, slack: u16) -> bool {
            for value in values.iter_mut() {
                *value >>= 16; // keep the high vector a sane size
            }
            values.sort();

            let universe = values.last().map_or(0, |max| max + 1) + slack as u64;
            let ef = EliasFano::new(&values, universe.max(1)).unwrap();

            values
                .iter()
                .enumerate()
                .all(|(i, &v)| ef.access(i as u64).unwrap() == v)
        }

        quickcheck(prop as fn(Vec<u64>, u16) -> bool);
    }

    #[test]
    fn qc_next_geq_matches_scan() {
        fn prop(mut values: Vec<u64>, probe: u64) -> bool {
            for value in values.iter_mut() {
                *value %= 10_000;
            }
            values.sort();
            let probe = probe % 11_000;

            let ef = EliasFano::new(&values, 10_000).unwrap();

            let expected = values.iter().cloned().find(|&v| v >= probe);
            ef.next_geq(probe) == expected
        }

        quickcheck(prop as fn(Vec<u64>, u64) -> bool);
    }

    #[test]
    fn qc_access_non_decreasing() {
        fn prop(mut values: Vec<u64>) -> bool {
            for value in values.iter_mut() {
                *value %= 100_000;
            }
            values.sort();

            let ef = EliasFano::new(&values, 100_000).unwrap();

            let mut previous = 0;
            for i in 0..ef.len() {
                let v = ef.access(i).unwrap();
                if v < previous {
                    return false;
                }
                previous = v;
            }
            true
        }

        quickcheck(prop as fn(Vec<u64>) -> bool);
    }

    #[test]
    fn space_stays_small() {
        use crate::space_usage::SpaceUsage;

        let values: Vec<u64> = (0..10_000).map(|i| i * 31).collect();
        let ef = EliasFano::new(&values, 310_000).unwrap();

        // Plain u64 storage is 80 KB; the set plus its select tables
        // must stay well under half of that.
        assert!(ef.total_bytes() < 40_000);
    }

    #[test]
    fn serialize_round_trip() {
        use crate::persist::properties;

        let values: Vec<u64> = (0..1000).map(|i| i * 7 + i % 3).collect();
        let ef = EliasFano::new(&values, 7100).unwrap();

        properties::round_trip(&ef, |before, after: &EliasFano| {
            assert_eq!(before.len(), after.len());
            assert_eq!(before.universe(), after.universe());
            for i in 0..before.len() {
                assert_eq!(before.access(i).unwrap(), after.access(i).unwrap());
            }
        });
        properties::rejects_truncation(&ef);
    }
}
