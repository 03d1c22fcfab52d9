//! Universal codes for data compression.
//!
//! A universal code maps any positive integer to a self-delimiting bit
//! string whose length grows with the integer's magnitude, with no prior
//! knowledge of the value's range. These codes feed the sampled vectors
//! in [`sampled`](../sampled/index.html).

mod traits;
pub use self::traits::*;

mod unary;
pub use self::unary::*;

mod elias;
pub use self::elias::*;

mod trans;
pub use self::trans::*;
