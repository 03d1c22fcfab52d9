use super::{Lift0, Unary, UniversalCode};
use crate::errors::{out_of_bits, Error, Result};
use crate::stream::{BitRead, BitWrite};

/// An Elias code.
///
/// Elias codes do not handle 0.
///
/// An Elias code first encodes the size of the number using some other
/// code, given by the `Header` parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Elias<Header: UniversalCode>(pub Header);

/// An Elias gamma code encodes the header in unary.
pub type Gamma = Elias<Unary>;

/// An instance of `Gamma`.
pub const GAMMA: Gamma = Elias(Unary);

/// An Elias delta code encodes the header using the Elias gamma code.
pub type Delta = Elias<Lift0<Gamma>>;

/// An instance of `Delta`.
pub const DELTA: Delta = Elias(Lift0(GAMMA));

const WORD_BITS: u32 = 64;

impl<Header: UniversalCode> UniversalCode for Elias<Header> {
    fn encode<W: BitWrite>(&self, sink: &mut W, value: u64) -> Result<()> {
        assert!(value != 0, "Elias codes do not handle 0");

        let nbits: u32 = WORD_BITS - 1 - value.leading_zeros();
        self.0.encode(sink, nbits as u64)?;
        sink.write_int(nbits as usize, value)
    }

    fn decode<R: BitRead>(&self, source: &mut R) -> Result<Option<u64>> {
        if let Some(nbits) = self.0.decode(source)? {
            if nbits > WORD_BITS as u64 - 1 {
                return Err(Error::Deserialization("code word too long"));
            }

            if let Some(low_bits) = source.read_int(nbits as usize)? {
                Ok(Some(low_bits | (1 << nbits)))
            } else {
                out_of_bits()
            }
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod test {
    use crate::coding::properties;
    use crate::coding::*;
    use quickcheck::quickcheck;
    use std::collections::VecDeque;

    #[test]
    fn gamma() {
        let mut dv = VecDeque::<bool>::new();

        GAMMA.encode(&mut dv, 2).unwrap();
        GAMMA.encode(&mut dv, 3).unwrap();
        GAMMA.encode(&mut dv, 4).unwrap();

        assert_eq!(Some(2), GAMMA.decode(&mut dv).unwrap());
        assert_eq!(Some(3), GAMMA.decode(&mut dv).unwrap());
        assert_eq!(Some(4), GAMMA.decode(&mut dv).unwrap());
        assert_eq!(None, GAMMA.decode(&mut dv).unwrap());
    }

    #[test]
    fn gamma_code_words() {
        // gamma(1) = 1, gamma(2) = 010, gamma(5) = 00101
        let mut dv = VecDeque::<bool>::new();

        GAMMA.encode(&mut dv, 1).unwrap();
        assert_eq!(vec![true], dv.iter().cloned().collect::<Vec<_>>());
        dv.clear();

        GAMMA.encode(&mut dv, 2).unwrap();
        assert_eq!(
            vec![false, true, false],
            dv.iter().cloned().collect::<Vec<_>>()
        );
        dv.clear();

        GAMMA.encode(&mut dv, 5).unwrap();
        assert_eq!(
            vec![false, false, true, true, false],
            dv.iter().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn delta() {
        let mut dv = VecDeque::<bool>::new();

        DELTA.encode(&mut dv, 2).unwrap();
        DELTA.encode(&mut dv, 3).unwrap();
        DELTA.encode(&mut dv, 38932).unwrap();
        DELTA.encode(&mut dv, 4).unwrap();

        assert_eq!(Some(2), DELTA.decode(&mut dv).unwrap());
        assert_eq!(Some(3), DELTA.decode(&mut dv).unwrap());
        assert_eq!(Some(38932), DELTA.decode(&mut dv).unwrap());
        assert_eq!(Some(4), DELTA.decode(&mut dv).unwrap());
        assert_eq!(None, DELTA.decode(&mut dv).unwrap());
    }

    #[test]
    fn truncated_codeword() {
        let mut dv = VecDeque::<bool>::new();
        GAMMA.encode(&mut dv, 5).unwrap();
        dv.pop_back();

        assert!(GAMMA.decode(&mut dv).is_err());
    }

    #[test]
    fn qc_gamma() {
        fn prop_gamma(v: Vec<u64>) -> bool {
            properties::code_decode(&GAMMA, v)
        }

        quickcheck(prop_gamma as fn(Vec<u64>) -> bool);
    }

    #[test]
    fn qc_delta() {
        fn prop_delta(v: Vec<u64>) -> bool {
            properties::code_decode(&DELTA, v)
        }

        quickcheck(prop_delta as fn(Vec<u64>) -> bool);
    }
}
