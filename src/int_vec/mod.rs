//! Bit-packed vectors of fixed-width integers.

mod traits;
pub use self::traits::*;

mod int_vector;
pub use self::int_vector::*;
