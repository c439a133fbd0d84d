//! Bit grid module - fixed-width cell bitsets
//!
//! Every supported board fits in 100 cells, so a single `u128` holds one bit per
//! cell. Bit `row * size + col` represents cell `(row, col)`; the row stride is the
//! board size, not the maximum size, so the bits of a board never straddle rows.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use crate::types::MAX_CELLS;

const _: () = assert!(MAX_CELLS <= 128, "board cells must fit the u128 bit grid");

/// A set of board cells packed into a `u128`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitGrid(u128);

impl BitGrid {
    pub const EMPTY: Self = Self(0);

    /// Single-cell grid
    #[inline(always)]
    pub const fn bit(index: usize) -> Self {
        Self(1u128 << index)
    }

    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u128 {
        self.0
    }

    /// Every cell of a `size`x`size` board
    pub const fn full(size: usize) -> Self {
        let cells = size * size;
        if cells >= 128 {
            Self(u128::MAX)
        } else {
            Self((1u128 << cells) - 1)
        }
    }

    /// Every cell of row `row` on a `size`x`size` board
    pub const fn row(size: usize, row: usize) -> Self {
        Self(((1u128 << size) - 1) << (row * size))
    }

    /// Every cell of column `col` on a `size`x`size` board
    pub const fn col(size: usize, col: usize) -> Self {
        let mut bits = 0u128;
        let mut r = 0;
        while r < size {
            bits |= 1u128 << (r * size + col);
            r += 1;
        }
        Self(bits)
    }

    #[inline(always)]
    pub fn contains(self, index: usize) -> bool {
        self.0 & (1u128 << index) != 0
    }

    #[inline(always)]
    pub fn insert(&mut self, index: usize) {
        self.0 |= 1u128 << index;
    }

    #[inline(always)]
    pub fn remove(&mut self, index: usize) {
        self.0 &= !(1u128 << index);
    }

    pub fn set(&mut self, index: usize, on: bool) {
        if on {
            self.insert(index);
        } else {
            self.remove(index);
        }
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether any cell is in both grids
    #[inline(always)]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether every cell of `other` is in `self`
    #[inline(always)]
    pub fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Lowest set cell index
    pub fn first(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }

    #[inline(always)]
    pub fn shift_up(self, n: usize) -> Self {
        Self(self.0 >> n)
    }

    #[inline(always)]
    pub fn shift_down(self, n: usize) -> Self {
        Self(self.0 << n)
    }

    /// Iterate set cell indices in ascending (row-major) order
    pub fn iter(self) -> BitGridIter {
        BitGridIter(self.0)
    }
}

/// Iterator over set cell indices of a [`BitGrid`]
#[derive(Debug, Clone)]
pub struct BitGridIter(u128);

impl Iterator for BitGridIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitGridIter {}

impl BitAnd for BitGrid {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for BitGrid {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Not for BitGrid {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl BitAndAssign for BitGrid {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for BitGrid {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
