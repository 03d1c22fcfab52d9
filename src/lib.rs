//! Succinct data structures for Rust.
//!
//! This library stores large bit sequences and integer sequences in
//! close to their information-theoretic minimum size while still
//! answering queries in near-constant time:
//!
//!   - [bit vectors](bit_vec/struct.BitVector.html) and bit-packed
//!     [integer vectors](int_vec/struct.IntVector.html) with arbitrary
//!     (1- to 64-bit) elements;
//!   - constant-time [rank](rank/struct.RankIndex.html) and
//!     amortized-constant-time [select](select/struct.SelectIndex.html)
//!     indexes over frozen bit vectors;
//!   - [Elias-Fano sets](elias_fano/struct.EliasFano.html) for monotone
//!     integer sequences, with access, rank, and successor queries;
//!   - [sampled vectors](sampled/struct.SampledVector.html) of
//!     gamma/delta [universal codes](coding/index.html) with
//!     density-bounded random access; and
//!   - a [string dictionary](dict/struct.StringDict.html) built from a
//!     sorted word list and a select index.
//!
//! Every structure is built once from an immutable input, after which
//! all queries take `&self`; a built structure can be shared freely
//! across threads.
//!
//! # Examples
//!
//! ```
//! use sdvec::{BitRankSupport, BitVector, RankIndex, Select1Support, SelectIndex};
//!
//! let bits: BitVector<u64> = vec![true, false, true, true, false, true]
//!     .into_iter()
//!     .collect();
//! let index = SelectIndex::new(RankIndex::new(bits));
//!
//! assert_eq!(3, index.rank1(5));       // ones before position 5
//! assert_eq!(Some(3), index.select1(3)); // position of the 3rd one
//! ```
//!
//! ```
//! use sdvec::EliasFano;
//!
//! let ef = EliasFano::new(&[2, 5, 7, 12], 16).unwrap();
//!
//! assert_eq!(5, ef.access(1).unwrap());
//! assert_eq!(Some(7), ef.next_geq(6));
//! assert!(ef.contains(12));
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod internal;

pub mod errors;
pub use crate::errors::{Error, Result};

pub mod storage;

pub mod space_usage;
pub use crate::space_usage::SpaceUsage;

pub mod persist;
pub use crate::persist::Persist;

pub mod bit_vec;
pub use crate::bit_vec::{BitVec, BitVecMut, BitVecPush, BitVector};

pub mod int_vec;
pub use crate::int_vec::{IntVec, IntVecMut, IntVector};

pub mod rank;
pub use crate::rank::{BitRankSupport, RankIndex, RankSupport};

pub mod select;
pub use crate::select::{BinSearchSelect, Select0Support, Select1Support, SelectIndex};

pub mod stream;
pub mod coding;

pub mod elias_fano;
pub use crate::elias_fano::EliasFano;

pub mod sampled;
pub use crate::sampled::{Mode, SampledVector};

pub mod dict;
pub use crate::dict::StringDict;
