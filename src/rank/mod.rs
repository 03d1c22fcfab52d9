//! Support for fast rank queries.

mod traits;
pub use self::traits::*;

mod index;
pub use self::index::*;
