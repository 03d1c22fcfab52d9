/// Supports selecting for 1 bits.
pub trait Select1Support {
    /// Returns the position of the `index`th 1 bit, counting from 1.
    ///
    /// `select1(j)` is the position whose bit, read left to right from
    /// position 0, is the `j`th to be set. Returns `None` for `index`
    /// 0 and for `index` greater than the number of 1 bits.
    fn select1(&self, index: u64) -> Option<u64>;
}

/// Supports selecting for 0 bits.
pub trait Select0Support {
    /// Returns the position of the `index`th 0 bit, counting from 1.
    ///
    /// Returns `None` for `index` 0 and for `index` greater than the
    /// number of 0 bits.
    fn select0(&self, index: u64) -> Option<u64>;
}
