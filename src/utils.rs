pub trait NumExt {
    /// Returns the base 2 logarithm of the number, rounding up to the next integer.
    fn ilog2_ceil(self) -> Self;
}

impl NumExt for usize {
    #[inline]
    fn ilog2_ceil(self) -> Self {
        match self {
            0 | 1 => 0,
            n => (n - 1).ilog2() as usize + 1,
        }
    }
}
