//! Bit-oriented streams for coding.

mod traits;
pub use self::traits::*;

mod bit_buffer;
pub use self::bit_buffer::*;
