//! Board module - manages the game grid
//!
//! The board is an N x N grid (N <= 10) stored as a flat row-major array of
//! [`Cell`]s, mirrored by bit grids that answer the hot queries in O(1):
//!
//! - `collision`: every cell that blocks placement (filled, obstacle, ice)
//! - `clearable`: every cell that counts toward a line (filled, ice; no obstacles)
//! - `row_masks` / `col_masks`: the cells each line needs, obstacles excluded
//!
//! A line is complete when `clearable` covers its mask. Every mutating method keeps
//! the bit grids in sync with the cells before returning.
//!
//! Coordinates: `(row, col)` with row 0 at the top. Placement entry points take
//! `(x, y)` = `(col, row)` as signed values to allow the one-cell edge tolerance.

use arrayvec::ArrayVec;

use crate::bitgrid::BitGrid;
use crate::config::{ConfigError, LevelLayout};
use crate::pieces::{Piece, Shape};
use crate::types::{
    Cell, Color, Coord, MAX_BOARD_SIZE, MAX_CELLS, MAX_PIECE_CELLS, PLACEMENT_TOLERANCE,
};

/// Cells written by one placement
pub type PlacedCells = ArrayVec<Coord, MAX_PIECE_CELLS>;

/// A cell emptied by a line clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearedCell {
    pub row: u8,
    pub col: u8,
    pub color: Color,
    /// Ring distance from the board center; animate lower rings first
    pub ripple: u8,
}

/// Outcome of [`Board::resolve_lines`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearResult {
    /// Completed rows, ascending
    pub rows: ArrayVec<u8, MAX_BOARD_SIZE>,
    /// Completed columns, ascending
    pub cols: ArrayVec<u8, MAX_BOARD_SIZE>,
    /// Cells that became empty, ordered by ripple then row-major
    pub cleared_cells: ArrayVec<ClearedCell, MAX_CELLS>,
    /// Ice cells that lost a layer (`Ice2` -> `Ice1`)
    pub degraded_ice: ArrayVec<Coord, MAX_CELLS>,
    /// Markers collected from cleared cells, row-major
    pub collected_markers: ArrayVec<Coord, MAX_CELLS>,
}

impl ClearResult {
    /// Rows plus columns completed; each line counts on its own
    pub fn line_count(&self) -> u32 {
        (self.rows.len() + self.cols.len()) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// The game board - N x N cells using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    /// Flat array of cells, row-major order (row * size + col)
    cells: [Cell; MAX_CELLS],
    collision: BitGrid,
    clearable: BitGrid,
    obstacles: BitGrid,
    markers: BitGrid,
    row_masks: [BitGrid; MAX_BOARD_SIZE],
    col_masks: [BitGrid; MAX_BOARD_SIZE],
}

impl Board {
    /// Create a new empty `size` x `size` board
    ///
    /// # Panics
    ///
    /// If `size` is 0 or larger than [`MAX_BOARD_SIZE`]. Configs are validated
    /// before a board is built.
    pub fn new(size: usize) -> Self {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&size),
            "board size {size} out of range"
        );
        let mut board = Self {
            size: size as u8,
            cells: [Cell::Empty; MAX_CELLS],
            collision: BitGrid::EMPTY,
            clearable: BitGrid::EMPTY,
            obstacles: BitGrid::EMPTY,
            markers: BitGrid::EMPTY,
            row_masks: [BitGrid::EMPTY; MAX_BOARD_SIZE],
            col_masks: [BitGrid::EMPTY; MAX_BOARD_SIZE],
        };
        board.rebuild_line_masks();
        board
    }

    /// Calculate flat index from (row, col)
    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        let size = self.size as usize;
        if row >= size || col >= size {
            return None;
        }
        Some(row * size + col)
    }

    #[inline(always)]
    fn coord_of(&self, index: usize) -> Coord {
        let size = self.size as usize;
        Coord::new((index / size) as u8, (index % size) as u8)
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Get cell at (row, col); `None` if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col), keeping every mask in sync
    ///
    /// Returns false if out of bounds.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        let Some(idx) = self.index(row, col) else {
            return false;
        };
        let was_obstacle = self.cells[idx] == Cell::Obstacle;
        self.write(idx, cell);
        if was_obstacle != (cell == Cell::Obstacle) {
            self.rebuild_line_masks();
        }
        true
    }

    /// Write a cell and its mask bits; line masks are the caller's concern
    #[inline]
    fn write(&mut self, idx: usize, cell: Cell) {
        self.cells[idx] = cell;
        self.collision.set(idx, cell.blocks_placement());
        self.clearable.set(idx, cell.counts_toward_line());
        self.obstacles.set(idx, cell == Cell::Obstacle);
    }

    fn rebuild_line_masks(&mut self) {
        let size = self.size as usize;
        for i in 0..MAX_BOARD_SIZE {
            if i < size {
                self.row_masks[i] = BitGrid::row(size, i) & !self.obstacles;
                self.col_masks[i] = BitGrid::col(size, i) & !self.obstacles;
            } else {
                self.row_masks[i] = BitGrid::EMPTY;
                self.col_masks[i] = BitGrid::EMPTY;
            }
        }
    }

    /// Recompute every mask from the cells
    pub(crate) fn sync_masks(&mut self) {
        let cells = self.size as usize * self.size as usize;
        self.collision = BitGrid::EMPTY;
        self.clearable = BitGrid::EMPTY;
        self.obstacles = BitGrid::EMPTY;
        for idx in 0..cells {
            let cell = self.cells[idx];
            self.write(idx, cell);
        }
        self.markers &= BitGrid::full(self.size as usize);
        self.rebuild_line_masks();
    }

    /// Whether the bit grids agree with the cells
    pub fn masks_in_sync(&self) -> bool {
        let size = self.size as usize;
        let mut expected = self.clone();
        expected.sync_masks();
        (0..size * size).all(|idx| {
            let cell = self.cells[idx];
            self.collision.contains(idx) == cell.blocks_placement()
                && self.clearable.contains(idx) == cell.counts_toward_line()
        }) && expected.row_masks == self.row_masks
            && expected.col_masks == self.col_masks
            && expected.obstacles == self.obstacles
    }

    pub fn collision_mask(&self) -> BitGrid {
        self.collision
    }

    pub fn clear_mask(&self) -> BitGrid {
        self.clearable
    }

    /// Cells row `row` needs for completion (obstacles excluded)
    pub fn row_mask(&self, row: usize) -> BitGrid {
        self.row_masks[row]
    }

    /// Cells column `col` needs for completion (obstacles excluded)
    pub fn col_mask(&self, col: usize) -> BitGrid {
        self.col_masks[col]
    }

    /// Every free cell
    pub fn empty_mask(&self) -> BitGrid {
        BitGrid::full(self.size as usize) & !self.collision
    }

    /// One row of cells
    pub fn row(&self, row: usize) -> &[Cell] {
        let size = self.size as usize;
        &self.cells[row * size..(row + 1) * size]
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells[..self.size as usize * self.size as usize].chunks(self.size as usize)
    }

    // ------------------------------------------------------------------ markers

    /// Put a marker token on (row, col); returns false if out of bounds
    pub fn add_marker(&mut self, row: usize, col: usize) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.markers.insert(idx);
                true
            }
            None => false,
        }
    }

    pub fn has_marker(&self, row: usize, col: usize) -> bool {
        self.index(row, col)
            .is_some_and(|idx| self.markers.contains(idx))
    }

    /// Uncollected marker positions, row-major
    pub fn markers(&self) -> impl Iterator<Item = Coord> + '_ {
        self.markers.iter().map(|idx| self.coord_of(idx))
    }

    pub fn markers_remaining(&self) -> usize {
        self.markers.count()
    }

    /// Write a level layout onto the board
    pub fn apply_layout(&mut self, layout: &LevelLayout) -> Result<(), ConfigError> {
        let size = self.size as usize;
        let out_of_bounds = |row: u8, col: u8| ConfigError::LayoutOutOfBounds { row, col, size };

        for block in &layout.blocks {
            let idx = self
                .index(block.row as usize, block.col as usize)
                .ok_or_else(|| out_of_bounds(block.row, block.col))?;
            self.write(idx, block.cell);
        }
        for marker in &layout.markers {
            if !self.add_marker(marker.row as usize, marker.col as usize) {
                return Err(out_of_bounds(marker.row, marker.col));
            }
        }
        self.rebuild_line_masks();
        Ok(())
    }

    // ---------------------------------------------------------------- placement

    /// Resolve a requested origin into an in-bounds one
    ///
    /// `x` is the column and `y` the row of the piece's top-left corner. Each axis
    /// may be off the board by at most [`PLACEMENT_TOLERANCE`] cells and is clamped
    /// back; anything further is rejected.
    pub fn clamp_origin(&self, shape: &Shape, x: i32, y: i32) -> Option<(usize, usize)> {
        let size = self.size as i32;
        let col = clamp_axis(x, size - shape.width() as i32)?;
        let row = clamp_axis(y, size - shape.height() as i32)?;
        Some((row, col))
    }

    /// Mask of `piece` with its top-left corner at (row, col)
    ///
    /// The origin must already be in range (see [`Board::clamp_origin`]).
    #[inline]
    pub fn piece_mask(&self, piece: &Piece, row: usize, col: usize) -> BitGrid {
        piece.shape.mask_at(self.size as usize, row, col)
    }

    /// Whether `piece` fits with its top-left corner at column `x`, row `y`
    ///
    /// Read-only: nothing is written.
    pub fn can_place(&self, piece: &Piece, x: i32, y: i32) -> bool {
        match self.clamp_origin(&piece.shape, x, y) {
            Some((row, col)) => self.fits_at(piece, row, col),
            None => false,
        }
    }

    #[inline]
    fn fits_at(&self, piece: &Piece, row: usize, col: usize) -> bool {
        !self.collision.intersects(self.piece_mask(piece, row, col))
    }

    /// Write `piece` at column `x`, row `y` as `Filled(piece.color)`
    ///
    /// Callers validate with [`Board::can_place`] first. Returns the written cells,
    /// row-major; an unplaceable origin writes nothing.
    pub fn place(&mut self, piece: &Piece, x: i32, y: i32) -> PlacedCells {
        let mut placed = ArrayVec::new();
        let Some((row, col)) = self.clamp_origin(&piece.shape, x, y) else {
            debug_assert!(false, "place called with an out-of-range origin");
            return placed;
        };
        let mask = self.piece_mask(piece, row, col);
        debug_assert!(
            !self.collision.intersects(mask),
            "place called on an occupied position"
        );

        // Occupied cells are never overwritten, so a bad call cannot erase obstacles.
        for idx in (mask & !self.collision).iter() {
            self.write(idx, Cell::Filled(piece.color));
            placed.push(self.coord_of(idx));
        }
        placed
    }

    /// Origins (row, col) where `piece` fits, row-major
    pub fn valid_positions<'a>(
        &'a self,
        piece: &'a Piece,
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        let size = self.size as usize;
        let rows = (size + 1).saturating_sub(piece.height());
        let cols = (size + 1).saturating_sub(piece.width());
        (0..rows)
            .flat_map(move |r| (0..cols).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.fits_at(piece, r, c))
    }

    // -------------------------------------------------------------- line clears

    fn is_line_complete(&self, mask: BitGrid) -> bool {
        // An all-obstacle line needs nothing and never completes.
        !mask.is_empty() && self.clearable.contains_all(mask)
    }

    /// Check if a row is complete
    pub fn is_row_complete(&self, row: usize) -> bool {
        row < self.size as usize && self.is_line_complete(self.row_masks[row])
    }

    /// Check if a column is complete
    pub fn is_col_complete(&self, col: usize) -> bool {
        col < self.size as usize && self.is_line_complete(self.col_masks[col])
    }

    /// Clear every complete row and column at once
    ///
    /// Each affected cell is processed once even where a cleared row crosses a
    /// cleared column: `Ice2` becomes `Ice1`, `Filled`/`Ice1` become `Empty` (and
    /// give up any marker on them), obstacles are untouched. With no complete line
    /// the board is left exactly as it was.
    pub fn resolve_lines(&mut self) -> ClearResult {
        let size = self.size as usize;
        let mut result = ClearResult::default();
        let mut affected = BitGrid::EMPTY;

        for i in 0..size {
            if self.is_line_complete(self.row_masks[i]) {
                result.rows.push(i as u8);
                affected |= self.row_masks[i];
            }
            if self.is_line_complete(self.col_masks[i]) {
                result.cols.push(i as u8);
                affected |= self.col_masks[i];
            }
        }
        if affected.is_empty() {
            return result;
        }

        for idx in affected.iter() {
            let coord = self.coord_of(idx);
            match self.cells[idx] {
                Cell::Ice2(color) => {
                    self.write(idx, Cell::Ice1(color));
                    result.degraded_ice.push(coord);
                }
                Cell::Ice1(color) | Cell::Filled(color) => {
                    self.write(idx, Cell::Empty);
                    result.cleared_cells.push(ClearedCell {
                        row: coord.row,
                        col: coord.col,
                        color,
                        ripple: ripple_ring(size, coord),
                    });
                    if self.markers.contains(idx) {
                        self.markers.remove(idx);
                        result.collected_markers.push(coord);
                    }
                }
                Cell::Empty | Cell::Obstacle => {
                    debug_assert!(false, "complete line contains a non-clearable cell");
                }
            }
        }

        result
            .cleared_cells
            .sort_by_key(|c| (c.ripple, c.row, c.col));
        debug_assert!(self.masks_in_sync());
        result
    }

    // ----------------------------------------------------------------- deadlock

    /// Grow `region` by one step in the four directions, staying on the board
    fn neighbors(&self, region: BitGrid) -> BitGrid {
        let size = self.size as usize;
        let first_col = BitGrid::col(size, 0);
        let last_col = BitGrid::col(size, size - 1);
        let east = (region & !last_col).shift_down(1);
        let west = (region & !first_col).shift_up(1);
        let south = region.shift_down(size);
        let north = region.shift_up(size);
        (east | west | south | north) & BitGrid::full(size)
    }

    /// Flood-fill empty regions until one of at least `needed` cells is found
    ///
    /// Returns the size of that region, or of the largest region if none is big
    /// enough.
    fn empty_region_reaching(&self, needed: usize) -> usize {
        let mut remaining = self.empty_mask();
        let mut largest = 0;
        while let Some(seed) = remaining.first() {
            if remaining.count() <= largest {
                break;
            }
            let mut region = BitGrid::bit(seed);
            loop {
                let grown = (region | self.neighbors(region)) & remaining;
                if grown == region {
                    break;
                }
                region = grown;
            }
            largest = largest.max(region.count());
            if largest >= needed {
                break;
            }
            remaining &= !region;
        }
        largest
    }

    /// Size of the largest 4-connected region of empty cells
    pub fn largest_empty_region(&self) -> usize {
        self.empty_region_reaching(usize::MAX)
    }

    /// Whether any of `pieces` fits anywhere
    ///
    /// Fails fast when the largest empty region is smaller than the smallest piece
    /// (pieces are 4-connected, so none could fit); otherwise scans positions and
    /// stops at the first fit.
    pub fn has_any_valid_move<'a, I>(&self, pieces: I) -> bool
    where
        I: IntoIterator<Item = &'a Piece>,
        I::IntoIter: Clone,
    {
        let pieces = pieces.into_iter();
        let Some(smallest) = pieces.clone().map(Piece::cell_count).min() else {
            return false;
        };
        if self.empty_region_reaching(smallest) < smallest {
            return false;
        }
        pieces
            .into_iter()
            .any(|piece| self.valid_positions(piece).next().is_some())
    }

    // --------------------------------------------------------------- statistics

    /// Cells holding a plain `Filled` block; ice and obstacles are not counted
    pub fn filled_count(&self) -> usize {
        self.cells()
            .iter()
            .filter(|c| matches!(c, Cell::Filled(_)))
            .count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.count()
    }

    /// Fraction of the board holding `Filled` cells, in `[0, 1]`
    pub fn density(&self) -> f64 {
        let cells = self.size as usize * self.size as usize;
        self.filled_count() as f64 / cells as f64
    }

    /// No blocks on the board (obstacles and markers do not count)
    pub fn is_empty(&self) -> bool {
        self.clearable.is_empty()
    }

    /// Clear the entire board, including obstacles and markers
    pub fn clear(&mut self) {
        *self = Self::new(self.size as usize);
    }

    /// Raw cells, row-major, `size * size` long
    pub fn cells(&self) -> &[Cell] {
        &self.cells[..self.size as usize * self.size as usize]
    }

    /// Mutable cells for building fixtures; call [`Board::sync_masks`] afterwards
    #[cfg(test)]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        let n = self.size as usize * self.size as usize;
        &mut self.cells[..n]
    }

    /// Create from rows of `'.'` (empty), `'#'` (filled red), `'X'` (obstacle),
    /// `'1'`/`'2'` (ice) and `'*'` (filled with a marker)
    #[cfg(test)]
    pub(crate) fn from_ascii(rows: &[&str]) -> Self {
        let mut board = Self::new(rows.len());
        for (r, line) in rows.iter().enumerate() {
            assert_eq!(line.len(), rows.len());
            for (c, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '.' => Cell::Empty,
                    '#' | '*' => Cell::Filled(Color::Red),
                    'X' => Cell::Obstacle,
                    '1' => Cell::Ice1(Color::Cyan),
                    '2' => Cell::Ice2(Color::Cyan),
                    other => panic!("unexpected fixture char {other:?}"),
                };
                board.set(r, c, cell);
                if ch == '*' {
                    board.add_marker(r, c);
                }
            }
        }
        board
    }
}

/// Clamp one axis into `0..=max`, allowing [`PLACEMENT_TOLERANCE`] cells of slack
fn clamp_axis(value: i32, max: i32) -> Option<usize> {
    if max < 0
        || value < -PLACEMENT_TOLERANCE
        || value > max.saturating_add(PLACEMENT_TOLERANCE)
    {
        return None;
    }
    Some(value.clamp(0, max) as usize)
}

/// Chebyshev ring of a cell around the board center (0 = central ring)
fn ripple_ring(size: usize, coord: Coord) -> u8 {
    let span = size as i32 - 1;
    let dr = (2 * coord.row as i32 - span).abs();
    let dc = (2 * coord.col as i32 - span).abs();
    (dr.max(dc) / 2) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Shape;

    fn piece(pattern: &[&str]) -> Piece {
        Piece::new(Shape::parse(pattern).unwrap(), Color::Green, 1.0)
    }

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(8);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(0, 7), Some(7));
        assert_eq!(board.index(1, 0), Some(8));
        assert_eq!(board.index(7, 7), Some(63));
        assert_eq!(board.index(8, 0), None);
        assert_eq!(board.index(0, 8), None);
    }

    #[test]
    fn test_set_keeps_masks_in_sync() {
        let mut board = Board::new(8);
        board.set(0, 0, Cell::Filled(Color::Red));
        board.set(1, 1, Cell::Obstacle);
        board.set(2, 2, Cell::Ice2(Color::Blue));

        assert!(board.collision_mask().contains(0));
        assert!(board.clear_mask().contains(0));
        assert!(board.collision_mask().contains(9));
        assert!(!board.clear_mask().contains(9));
        assert!(!board.row_mask(1).contains(9));
        assert!(!board.col_mask(1).contains(9));
        assert!(board.masks_in_sync());

        board.set(1, 1, Cell::Empty);
        assert!(board.row_mask(1).contains(9));
        assert!(board.masks_in_sync());
    }

    #[test]
    fn test_clamp_tolerance() {
        let board = Board::new(8);
        let bar = piece(&["###"]);

        assert!(board.can_place(&bar, -1, 0));
        assert!(!board.can_place(&bar, -2, 0));
        assert!(board.can_place(&bar, 6, 7));
        assert!(!board.can_place(&bar, 7, 0));
        assert!(board.can_place(&bar, 0, 8));
        assert!(!board.can_place(&bar, 0, 9));
        assert_eq!(board.clamp_origin(&bar.shape, 6, -1), Some((0, 5)));
    }

    #[test]
    fn test_extreme_coordinates_are_rejected() {
        let mut board = Board::new(8);
        let dot = piece(&["#"]);

        for far in [i32::MIN, i32::MIN + 1, i32::MAX, i32::MAX - 1] {
            assert!(!board.can_place(&dot, far, 0));
            assert!(!board.can_place(&dot, 0, far));
            assert!(!board.can_place(&dot, far, far));
            assert_eq!(board.clamp_origin(&dot.shape, far, 0), None);
            assert_eq!(board.clamp_origin(&dot.shape, 0, far), None);
        }
        assert_eq!(board.valid_positions(&dot).count(), 64);
        board.place(&dot, 0, 0);
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_oversized_piece_never_fits() {
        let board = Board::new(2);
        let bar = piece(&["###"]);
        assert!(!board.can_place(&bar, 0, 0));
        assert_eq!(board.valid_positions(&bar).count(), 0);
    }

    #[test]
    fn test_can_place_is_read_only() {
        let board = Board::from_ascii(&[
            "#.......", "........", "........", "........", "........", "........",
            "........", "........",
        ]);
        let before = board.clone();
        assert!(!board.can_place(&piece(&["##"]), 0, 0));
        assert!(board.can_place(&piece(&["##"]), 1, 0));
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_writes_color_and_returns_cells() {
        let mut board = Board::new(8);
        let corner = piece(&["##", "#."]);
        let placed = board.place(&corner, 2, 3);

        assert_eq!(
            placed.as_slice(),
            &[Coord::new(3, 2), Coord::new(3, 3), Coord::new(4, 2)]
        );
        assert_eq!(board.get(3, 2), Some(Cell::Filled(Color::Green)));
        assert_eq!(board.get(4, 3), Some(Cell::Empty));
        assert_eq!(board.filled_count(), 3);
        assert!(board.masks_in_sync());
    }

    #[test]
    fn test_row_and_column_clear_share_intersection_once() {
        let mut board = Board::from_ascii(&[
            "###2####", "...#....", "...#....", "...#....", "...#....", "...#....",
            "...#....", "...#....",
        ]);
        // Column 3 is complete through its ice cap; row 0 is complete too.
        let result = board.resolve_lines();

        assert_eq!(result.line_count(), 2);
        assert_eq!(result.rows.as_slice(), &[0]);
        assert_eq!(result.cols.as_slice(), &[3]);
        assert_eq!(result.degraded_ice.as_slice(), &[Coord::new(0, 3)]);
        assert_eq!(board.get(0, 3), Some(Cell::Ice1(Color::Cyan)));
        // 7 cells of row 0 + 7 cells of column 3, the shared ice cell not cleared.
        assert_eq!(result.cleared_cells.len(), 14);
        assert!(board.masks_in_sync());
    }

    #[test]
    fn test_cleared_cells_ordered_by_ripple() {
        let mut board = Board::from_ascii(&[
            "........", "........", "........", "########", "........", "........",
            "........", "........",
        ]);
        let result = board.resolve_lines();
        let ripples: Vec<u8> = result.cleared_cells.iter().map(|c| c.ripple).collect();
        let mut sorted = ripples.clone();
        sorted.sort();
        assert_eq!(ripples, sorted);
        assert_eq!(ripples.first(), Some(&0));
        assert_eq!(ripples.last(), Some(&3));
    }

    #[test]
    fn test_markers_collected_only_when_cleared() {
        let mut board = Board::from_ascii(&[
            "*######.", "*.......", "........", "........", "........", "........",
            "........", "........",
        ]);
        assert_eq!(board.markers_remaining(), 2);

        let nothing = board.resolve_lines();
        assert!(nothing.is_empty());
        assert_eq!(board.markers_remaining(), 2);

        board.place(&piece(&["#"]), 7, 0);
        let result = board.resolve_lines();
        assert_eq!(result.collected_markers.as_slice(), &[Coord::new(0, 0)]);
        assert!(!board.has_marker(0, 0));
        assert!(board.has_marker(1, 0));
    }

    #[test]
    fn test_all_obstacle_row_never_completes() {
        let mut board = Board::from_ascii(&["XX", ".."]);
        assert!(!board.is_row_complete(0));
        let result = board.resolve_lines();
        assert!(result.is_empty());
    }

    #[test]
    fn test_largest_empty_region() {
        let board = Board::from_ascii(&[
            "..#.", "..#.", "####", "...#",
        ]);
        assert_eq!(board.largest_empty_region(), 4);

        let full = Board::from_ascii(&["##", "##"]);
        assert_eq!(full.largest_empty_region(), 0);
    }

    #[test]
    fn test_region_does_not_wrap_rows() {
        // Cell (0,3) and (1,0) are adjacent in bit order but not on the board.
        let board = Board::from_ascii(&["###.", ".###", "####", "####"]);
        assert_eq!(board.largest_empty_region(), 1);
    }

    #[test]
    fn test_has_any_valid_move_prunes_small_regions() {
        let board = Board::from_ascii(&["#.#", "###", "#.#"]);
        let domino = piece(&["##"]);
        let single = piece(&["#"]);
        assert!(!board.has_any_valid_move([&domino]));
        assert!(board.has_any_valid_move([&domino, &single]));
        assert!(!board.has_any_valid_move(std::iter::empty::<&Piece>()));
    }

    #[test]
    fn test_density_and_counts() {
        let mut board = Board::from_ascii(&["#X", "2."]);
        assert_eq!(board.filled_count(), 1);
        assert_eq!(board.obstacle_count(), 1);
        assert!((board.density() - 0.25).abs() < f64::EPSILON);
        assert!(!board.is_empty());

        let iced = Board::from_ascii(&["1.", ".2"]);
        assert_eq!(iced.filled_count(), 0);
        assert_eq!(iced.density(), 0.0);
        assert!(!iced.is_empty());

        board.clear();
        assert!(board.is_empty());
        assert_eq!(board.obstacle_count(), 0);
    }

    #[test]
    fn test_cells_mut_then_sync() {
        let mut board = Board::new(4);
        board.cells_mut()[5] = Cell::Obstacle;
        board.sync_masks();
        assert!(board.masks_in_sync());
        assert!(!board.row_mask(1).contains(5));
    }
}
