use super::UniversalCode;
use crate::errors::Result;
use crate::stream::{BitRead, BitWrite};

/// Lifts any code by adding one to each encoded value, and subtracting
/// one from each decoded value.
///
/// This is useful when the underlying code, like Elias codes, can't
/// handle 0s.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lift0<Code: UniversalCode>(pub Code);

impl<Code: UniversalCode> UniversalCode for Lift0<Code> {
    fn encode<W: BitWrite>(&self, sink: &mut W, value: u64) -> Result<()> {
        self.0.encode(sink, value + 1)
    }

    fn decode<R: BitRead>(&self, source: &mut R) -> Result<Option<u64>> {
        match self.0.decode(source) {
            Ok(Some(n)) => Ok(Some(n - 1)),
            otherwise => otherwise,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::coding::*;
    use std::collections::VecDeque;

    #[test]
    fn lifts_zero() {
        let mut dv = VecDeque::<bool>::new();
        let code = Lift0(GAMMA);

        code.encode(&mut dv, 0).unwrap();
        code.encode(&mut dv, 5).unwrap();

        assert_eq!(Some(0), code.decode(&mut dv).unwrap());
        assert_eq!(Some(5), code.decode(&mut dv).unwrap());
        assert_eq!(None, code.decode(&mut dv).unwrap());
    }
}
