//! Variable-length coded integer sequences with sampled random access.

use std::io;

use crate::bit_vec::{BitVec, BitVector};
use crate::coding::{Delta, UniversalCode};
use crate::errors::{Error, Result};
use crate::int_vec::{IntVec, IntVector};
use crate::persist::{self, Persist};
use crate::space_usage::SpaceUsage;
use crate::storage::BlockType;
use crate::stream::{BitBuffer, BitRead};

/// How the elements are mapped to code words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Each element is coded on its own. Works for any sequence.
    Direct,
    /// Each element is coded as its gap from the previous one. Requires
    /// a non-decreasing sequence and wins when the gaps are small.
    Gap,
}

/// An integer sequence stored as one stream of universal code words,
/// with an offset sample every `density` elements to bound the cost of
/// random access.
///
/// An access seeks to the nearest preceding sample and decodes forward,
/// so it costs O(density) code reads; the sample table shrinks as the
/// density grows. Density 1 degenerates to one offset per element and
/// constant-time access. Correctness never depends on the density.
///
/// In gap mode each sample also records the running sum immediately
/// before the sampled element, so decoding restarts mid-sequence.
#[derive(Clone, Debug)]
pub struct SampledVector<Code: UniversalCode = Delta> {
    code: Code,
    mode: Mode,
    len: u64,
    density: usize,
    data: BitVector<u64>,
    offsets: IntVector<u64>,
    sums: IntVector<u64>,
}

impl<Code: UniversalCode> SampledVector<Code> {
    /// Codes each value directly.
    ///
    /// Every value must be below `u64::max_value()` (the code words
    /// carry `value + 1`); `density` must be positive. Violations fail
    /// with `Error::InvalidInput`.
    pub fn with_values(code: Code, values: &[u64], density: usize) -> Result<Self> {
        Self::build(code, values, density, Mode::Direct)
    }

    /// Codes each value as its gap from the previous value.
    ///
    /// Requires a non-decreasing sequence in addition to the
    /// requirements of [`with_values`](#method.with_values).
    pub fn with_gaps(code: Code, values: &[u64], density: usize) -> Result<Self> {
        Self::build(code, values, density, Mode::Gap)
    }

    fn build(code: Code, values: &[u64], density: usize, mode: Mode) -> Result<Self> {
        if density == 0 {
            return Err(Error::InvalidInput("density must be positive"));
        }

        let mut buffer = BitBuffer::<BitVector<u64>>::new();
        let mut raw_offsets = Vec::with_capacity(values.len() / density + 1);
        let mut raw_sums = Vec::new();

        let mut previous = 0;
        for (index, &value) in values.iter().enumerate() {
            if value == u64::max_value() {
                return Err(Error::InvalidInput("value too large for the code"));
            }
            if mode == Mode::Gap && value < previous {
                return Err(Error::InvalidInput("sequence must be non-decreasing"));
            }

            if index % density == 0 {
                raw_offsets.push(buffer.position());
                if mode == Mode::Gap {
                    raw_sums.push(previous);
                }
            }

            let coded = match mode {
                Mode::Direct => value,
                Mode::Gap => value - previous,
            };
            code.encode(&mut buffer, coded + 1)?;

            previous = value;
        }

        let data = buffer.into_inner();

        let offset_width = (data.bit_len() + 1).ceil_lg().max(1);
        let mut offsets = IntVector::with_capacity(offset_width, raw_offsets.len() as u64);
        for &offset in &raw_offsets {
            offsets.push(offset);
        }

        let sum_width = (raw_sums.last().cloned().unwrap_or(0) + 1)
            .ceil_lg()
            .max(1);
        let mut sums = IntVector::with_capacity(sum_width, raw_sums.len() as u64);
        for &sum in &raw_sums {
            sums.push(sum);
        }

        Ok(SampledVector {
            code,
            mode,
            len: values.len() as u64,
            density,
            data,
            offsets,
            sums,
        })
    }

    /// The number of stored elements.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Is the vector empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The sampling density the vector was built with.
    pub fn density(&self) -> usize {
        self.density
    }

    /// How the elements are coded.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the `index`th element of the original sequence.
    ///
    /// Fails with `Error::IndexOutOfRange` when `index >= self.len()`.
    pub fn access(&self, index: u64) -> Result<u64> {
        if index >= self.len {
            return Err(Error::oob(index, self.len));
        }

        let sample = index / self.density as u64;
        let skip = (index % self.density as u64) as usize;

        let mut reader = BitBuffer::from(&self.data);
        reader.seek(self.offsets.get(sample))?;

        match self.mode {
            Mode::Direct => {
                for _ in 0..skip {
                    self.decode_one(&mut reader)?;
                }
                Ok(self.decode_one(&mut reader)? - 1)
            }
            Mode::Gap => {
                let mut running = self.sums.get(sample);
                for _ in 0..=skip {
                    running += self.decode_one(&mut reader)? - 1;
                }
                Ok(running)
            }
        }
    }

    fn decode_one<R: BitRead>(&self, source: &mut R) -> Result<u64> {
        match self.code.decode(source)? {
            Some(value) => Ok(value),
            // The stream ran out where a code word was expected; only a
            // forged structure can get here.
            None => Err(Error::oob(self.len, self.len)),
        }
    }
}

impl<Code: UniversalCode> SpaceUsage for SampledVector<Code> {
    fn is_stack_only() -> bool {
        false
    }

    fn heap_bytes(&self) -> usize {
        self.data.heap_bytes() + self.offsets.heap_bytes() + self.sums.heap_bytes()
    }
}

impl<Code: UniversalCode + Default> Persist for SampledVector<Code> {
    fn serialize<W: io::Write>(&self, sink: &mut W) -> Result<()> {
        persist::write_u8(
            sink,
            match self.mode {
                Mode::Direct => 0,
                Mode::Gap => 1,
            },
        )?;
        persist::write_u64(sink, self.len)?;
        persist::write_u64(sink, self.density as u64)?;
        self.offsets.serialize(sink)?;
        self.sums.serialize(sink)?;
        self.data.serialize(sink)
    }

    fn deserialize<R: io::Read>(source: &mut R) -> Result<Self> {
        let mode = match persist::read_u8(source)? {
            0 => Mode::Direct,
            1 => Mode::Gap,
            _ => return Err(Error::Deserialization("bad coding mode")),
        };
        let len = persist::read_u64(source)?;
        let density = persist::read_u64(source)? as usize;
        if density == 0 {
            return Err(Error::Deserialization("bad density"));
        }

        let offsets: IntVector<u64> = IntVector::deserialize(source)?;
        let sums: IntVector<u64> = IntVector::deserialize(source)?;
        let data: BitVector<u64> = BitVector::deserialize(source)?;

        let samples = if len == 0 {
            0
        } else {
            (len - 1) / density as u64 + 1
        };
        let expected_sums = match mode {
            Mode::Direct => 0,
            Mode::Gap => samples,
        };

        if offsets.len() != samples || sums.len() != expected_sums {
            return Err(Error::Deserialization("inconsistent sample tables"));
        }
        for offset in offsets.iter() {
            if offset > data.bit_len() {
                return Err(Error::Deserialization("sample offset past the stream"));
            }
        }

        Ok(SampledVector {
            code: Code::default(),
            mode,
            len,
            density,
            data,
            offsets,
            sums,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coding::{DELTA, GAMMA};
    use quickcheck::quickcheck;

    const DENSITIES: &[usize] = &[1, 4, 128];

    #[test]
    fn direct_round_trip() {
        let values: Vec<u64> = vec![3, 0, 1_000_000, 7, 7, 42, 0, 58, 12345, 2];

        for &density in DENSITIES {
            let vlc = SampledVector::with_values(DELTA, &values, density).unwrap();

            assert_eq!(values.len() as u64, vlc.len());
            for (i, &v) in values.iter().enumerate() {
                assert_eq!(v, vlc.access(i as u64).unwrap(), "density {}", density);
            }
        }
    }

    #[test]
    fn gap_round_trip() {
        let values: Vec<u64> = (0..500).map(|i| i * i / 7).collect();

        for &density in DENSITIES {
            let enc = SampledVector::with_gaps(DELTA, &values, density).unwrap();

            for (i, &v) in values.iter().enumerate() {
                assert_eq!(v, enc.access(i as u64).unwrap(), "density {}", density);
            }
        }
    }

    #[test]
    fn gamma_code() {
        let values: Vec<u64> = (0..100).map(|i| i % 13).collect();

        let vlc = SampledVector::with_values(GAMMA, &values, 16).unwrap();
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(v, vlc.access(i as u64).unwrap());
        }
    }

    #[test]
    fn empty() {
        let vlc = SampledVector::with_values(DELTA, &[], 8).unwrap();
        assert!(vlc.is_empty());
        assert!(vlc.access(0).is_err());
    }

    #[test]
    fn access_out_of_range() {
        let vlc = SampledVector::with_values(DELTA, &[1, 2, 3], 2).unwrap();

        assert!(vlc.access(3).is_err());
        // The failure leaves the vector usable.
        assert_eq!(2, vlc.access(1).unwrap());
    }

    #[test]
    fn invalid_input() {
        assert!(SampledVector::with_values(DELTA, &[1], 0).is_err());
        assert!(SampledVector::with_gaps(DELTA, &[3, 2], 4).is_err());
        assert!(SampledVector::with_values(DELTA, &[u64::max_value()], 4).is_err());
    }

    #[test]
    fn space_beats_plain_storage() {
        use crate::space_usage::SpaceUsage;

        let values: Vec<u64> = (0..10_000).map(|i| i % 100).collect();
        let vlc = SampledVector::with_values(DELTA, &values, 128).unwrap();

        let plain = values.len() * 8;
        assert!(vlc.total_bytes() < plain / 2);
    }

    #[test]
    fn gap_beats_direct_on_dense_sequences() {
        use crate::space_usage::SpaceUsage;

        let values: Vec<u64> = (0..10_000u64).map(|i| 5_000_000 + i * 3).collect();

        let direct = SampledVector::with_values(DELTA, &values, 128).unwrap();
        let gapped = SampledVector::with_gaps(DELTA, &values, 128).unwrap();

        assert!(gapped.total_bytes() < direct.total_bytes());
    }

    #[test]
    fn qc_direct_matches_input() {
        fn prop(values: Vec<u64>, density: u8) -> bool {
            let density = density as usize % 130 + 1;
            let values: Vec<u64> = values.iter().map(|&v| v >> 1).collect();

            let vlc = SampledVector::with_values(DELTA, &values, density).unwrap();

            values
                .iter()
                .enumerate()
                .all(|(i, &v)| vlc.access(i as u64).unwrap() == v)
        }

        quickcheck(prop as fn(Vec<u64>, u8) -> bool);
    }

    #[test]
    fn qc_gap_matches_input() {
        fn prop(mut values: Vec<u64>, density: u8) -> bool {
            let density = density as usize % 130 + 1;
            for value in values.iter_mut() {
                *value >>= 1;
            }
            values.sort();

            let enc = SampledVector::with_gaps(GAMMA, &values, density).unwrap();

            values
                .iter()
                .enumerate()
                .all(|(i, &v)| enc.access(i as u64).unwrap() == v)
        }

        quickcheck(prop as fn(Vec<u64>, u8) -> bool);
    }

    #[test]
    fn serialize_round_trip() {
        use crate::persist::properties;

        let values: Vec<u64> = (0..300).map(|i| i * 17 % 1000).collect();
        let vlc = SampledVector::with_values(DELTA, &values, 32).unwrap();

        properties::round_trip(&vlc, |before, after: &SampledVector| {
            assert_eq!(before.len(), after.len());
            assert_eq!(before.density(), after.density());
            for i in 0..before.len() {
                assert_eq!(before.access(i).unwrap(), after.access(i).unwrap());
            }
        });
        properties::rejects_truncation(&vlc);
    }

    #[test]
    fn deserialize_rejects_bad_mode() {
        let vlc = SampledVector::with_values(DELTA, &[1, 2, 3], 1).unwrap();

        let mut buffer = Vec::new();
        vlc.serialize(&mut buffer).unwrap();
        buffer[0] = 7;
        assert!(SampledVector::<Delta>::deserialize(&mut &buffer[..]).is_err());
    }
}
