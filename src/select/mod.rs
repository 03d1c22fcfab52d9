//! Support for fast select queries.

mod traits;
pub use self::traits::*;

mod bin_search;
pub use self::bin_search::*;

mod index;
pub use self::index::*;
