//! A static dictionary over a sorted word list.

use std::cmp::Ordering;
use std::io;

use crate::bit_vec::{BitVec, BitVecMut, BitVector};
use crate::errors::{Error, Result};
use crate::persist::{self, Persist};
use crate::rank::RankIndex;
use crate::select::{Select1Support, SelectIndex};
use crate::space_usage::SpaceUsage;

/// A sorted list of words stored as one concatenated string plus a
/// select-indexed bit vector marking where each word starts.
///
/// Word `i` is the slice between the `i+1`th marker and the next one (or
/// the end of the text), so no terminators and no per-word pointers are
/// stored. Lookups binary search the marker-delimited slices.
pub struct StringDict {
    text: String,
    len: u64,
    starts: SelectIndex<RankIndex<BitVector<u64>>>,
}

impl StringDict {
    /// Builds a dictionary from words in non-descending order.
    ///
    /// Fails with `Error::InvalidInput` if the words are unsorted (the
    /// lookup's binary search needs the order) or if any word is empty
    /// (a start marker cannot distinguish an empty word from its
    /// neighbor).
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let mut text = String::new();

        for (index, word) in words.iter().enumerate() {
            let word = word.as_ref();
            if word.is_empty() {
                return Err(Error::InvalidInput("words must be non-empty"));
            }
            if index > 0 && words[index - 1].as_ref() > word {
                return Err(Error::InvalidInput("words must be sorted"));
            }
            text.push_str(word);
        }

        let mut markers: BitVector<u64> = BitVector::with_fill(text.len() as u64, false);
        let mut offset = 0;
        for word in words {
            markers.set_bit(offset, true);
            offset += word.as_ref().len() as u64;
        }

        Ok(StringDict {
            text,
            len: words.len() as u64,
            starts: SelectIndex::new(RankIndex::new(markers)),
        })
    }

    /// The number of words.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Is the dictionary empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the `index`th word, or `None` when `index` is out of
    /// bounds.
    pub fn get(&self, index: u64) -> Option<&str> {
        if index >= self.len {
            return None;
        }

        let start = self
            .starts
            .select1(index + 1)
            .expect("StringDict::get: markers out of sync") as usize;
        let end = if index + 1 < self.len {
            self.starts
                .select1(index + 2)
                .expect("StringDict::get: markers out of sync") as usize
        } else {
            self.text.len()
        };

        Some(&self.text[start..end])
    }

    /// Finds the index of `target`, if present.
    pub fn index_of(&self, target: &str) -> Option<u64> {
        let mut low = 0;
        let mut high = self.len;

        while low < high {
            let middle = low + (high - low) / 2;
            let word = self.get(middle).expect("StringDict::index_of: in bounds");

            match target.cmp(word) {
                Ordering::Equal => return Some(middle),
                Ordering::Less => high = middle,
                Ordering::Greater => low = middle + 1,
            }
        }

        None
    }

    /// Is `target` one of the words?
    pub fn contains(&self, target: &str) -> bool {
        self.index_of(target).is_some()
    }
}

impl SpaceUsage for StringDict {
    fn is_stack_only() -> bool {
        false
    }

    fn heap_bytes(&self) -> usize {
        self.text.heap_bytes() + self.starts.heap_bytes()
    }
}

impl Persist for StringDict {
    fn serialize<W: io::Write>(&self, sink: &mut W) -> Result<()> {
        persist::write_u64(sink, self.text.len() as u64)?;
        sink.write_all(self.text.as_bytes())?;
        self.starts.inner().inner().serialize(sink)
    }

    fn deserialize<R: io::Read>(source: &mut R) -> Result<Self> {
        let text_len = persist::read_u64(source)? as usize;
        let mut bytes = vec![0; text_len];
        source.read_exact(&mut bytes).map_err(persist::truncated)?;
        let text =
            String::from_utf8(bytes).map_err(|_| Error::Deserialization("text is not UTF-8"))?;

        let markers: BitVector<u64> = BitVector::deserialize(source)?;
        if markers.bit_len() != text.len() as u64 {
            return Err(Error::Deserialization("marker length mismatch"));
        }
        if !text.is_empty() && !markers.get_bit(0) {
            return Err(Error::Deserialization("first word has no marker"));
        }

        let starts = SelectIndex::new(RankIndex::new(markers));
        let result = StringDict {
            len: starts.ones(),
            text,
            starts,
        };

        // Word boundaries must cut the text at character boundaries and
        // in sorted order, or lookups would misbehave.
        let mut previous: Option<&str> = None;
        for index in 0..result.len {
            let start = result
                .starts
                .select1(index + 1)
                .expect("StringDict::deserialize: in bounds") as usize;
            if !result.text.is_char_boundary(start) {
                return Err(Error::Deserialization("marker splits a character"));
            }

            let word = result.get(index).expect("StringDict::deserialize: in bounds");
            if previous.map_or(false, |p| p > word) {
                return Err(Error::Deserialization("words are not sorted"));
            }
            previous = Some(word);
        }

        Ok(result)
    }
}
