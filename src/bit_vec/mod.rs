//! Bit vector interfaces and implementations.

mod traits;
pub use self::traits::*;

mod bit_vector;
pub use self::bit_vector::*;
