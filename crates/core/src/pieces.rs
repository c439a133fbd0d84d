//! Pieces module - polyomino shapes and the weighted piece catalog
//!
//! A [`Shape`] is a trimmed boolean matrix stored as one bit row per shape row
//! (bit `c` of `rows[r]` is cell `(r, c)`). Shapes are validated once, at
//! construction; the board trusts them afterwards.
//!
//! The [`PieceCatalog`] holds shapes with spawn weights. Small pieces are common
//! and large ones rare; see [`STANDARD_CATALOG`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitgrid::BitGrid;
use crate::rng::{pick_uniform, pick_weighted};
use crate::types::{Color, MAX_PIECE_SIDE};

/// Reasons a shape matrix is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape has no filled cells")]
    Empty,
    #[error("shape row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("shape is {width}x{height}, larger than {max}x{max}", max = MAX_PIECE_SIDE)]
    TooLarge { width: usize, height: usize },
    #[error("shape has an empty border row or column")]
    EmptyBorder,
    #[error("shape cells are not 4-connected")]
    Disconnected,
    #[error("unexpected character {0:?} in shape pattern (use '#' and '.')")]
    InvalidChar(char),
}

/// Piece shape: a trimmed, 4-connected polyomino of at most 5x5 cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    rows: [u8; MAX_PIECE_SIDE],
    cells: u8,
}

impl Shape {
    /// Build a shape from a `'#'`/`'.'` pattern at compile time
    ///
    /// Panics (at compile time when used in a `const`) on ragged or oversized
    /// patterns. Border trimming and connectivity are checked by [`Shape::validate`].
    pub const fn from_pattern(pattern: &[&str]) -> Shape {
        assert!(
            !pattern.is_empty() && pattern.len() <= MAX_PIECE_SIDE,
            "shape height out of range"
        );
        let height = pattern.len();
        let width = pattern[0].len();
        assert!(width > 0 && width <= MAX_PIECE_SIDE, "shape width out of range");

        let mut rows = [0u8; MAX_PIECE_SIDE];
        let mut cells = 0u8;
        let mut r = 0;
        while r < height {
            let bytes = pattern[r].as_bytes();
            assert!(bytes.len() == width, "ragged shape pattern");
            let mut c = 0;
            while c < width {
                match bytes[c] {
                    b'#' => {
                        rows[r] |= 1 << c;
                        cells += 1;
                    }
                    b'.' => {}
                    _ => panic!("shape patterns use '#' and '.'"),
                }
                c += 1;
            }
            r += 1;
        }

        Shape {
            width: width as u8,
            height: height as u8,
            rows,
            cells,
        }
    }

    /// Build a shape from a row-major boolean matrix
    pub fn from_matrix<R: AsRef<[bool]>>(matrix: &[R]) -> Result<Shape, ShapeError> {
        let height = matrix.len();
        let width = matrix.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ShapeError::Empty);
        }
        if width > MAX_PIECE_SIDE || height > MAX_PIECE_SIDE {
            return Err(ShapeError::TooLarge { width, height });
        }

        let mut rows = [0u8; MAX_PIECE_SIDE];
        let mut cells = 0u8;
        for (r, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ShapeError::Ragged {
                    row: r,
                    expected: width,
                    found: row.len(),
                });
            }
            for (c, &filled) in row.iter().enumerate() {
                if filled {
                    rows[r] |= 1 << c;
                    cells += 1;
                }
            }
        }

        let shape = Shape {
            width: width as u8,
            height: height as u8,
            rows,
            cells,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Parse a `'#'`/`'.'` pattern, e.g. `["##", "#."]`
    pub fn parse<S: AsRef<str>>(pattern: &[S]) -> Result<Shape, ShapeError> {
        let mut matrix = Vec::with_capacity(pattern.len());
        for line in pattern {
            let mut row = Vec::new();
            for ch in line.as_ref().chars() {
                match ch {
                    '#' => row.push(true),
                    '.' => row.push(false),
                    other => return Err(ShapeError::InvalidChar(other)),
                }
            }
            matrix.push(row);
        }
        Self::from_matrix(&matrix)
    }

    /// Check the trimmed-border and connectivity rules
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.cells == 0 {
            return Err(ShapeError::Empty);
        }

        let h = self.height as usize;
        let all_cols = self.rows[..h].iter().fold(0u8, |acc, r| acc | r);
        let left_used = all_cols & 1 != 0;
        let right_used = all_cols & (1 << (self.width - 1)) != 0;
        if self.rows[0] == 0 || self.rows[h - 1] == 0 || !left_used || !right_used {
            return Err(ShapeError::EmptyBorder);
        }

        if self.connected_cells() != self.cells as usize {
            return Err(ShapeError::Disconnected);
        }
        Ok(())
    }

    /// Size of the 4-connected component containing the first cell
    fn connected_cells(&self) -> usize {
        let h = self.height as usize;
        let w = self.width as usize;
        let Some((r0, c0)) = self.cells().next() else {
            return 0;
        };

        let mut seen = [0u8; MAX_PIECE_SIDE];
        let mut stack = vec![(r0, c0)];
        seen[r0] |= 1 << c0;
        let mut count = 0;
        while let Some((r, c)) = stack.pop() {
            count += 1;
            let neighbors = [
                (r.wrapping_sub(1), c),
                (r + 1, c),
                (r, c.wrapping_sub(1)),
                (r, c + 1),
            ];
            for (nr, nc) in neighbors {
                if nr < h && nc < w && self.contains(nr, nc) && seen[nr] & (1 << nc) == 0 {
                    seen[nr] |= 1 << nc;
                    stack.push((nr, nc));
                }
            }
        }
        count
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// Number of filled cells
    pub fn cell_count(&self) -> usize {
        self.cells as usize
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.rows[row] & (1 << col) != 0
    }

    /// Bits of one shape row (bit `c` = column `c`)
    pub fn row_bits(&self, row: usize) -> u8 {
        self.rows[row]
    }

    /// Filled cells as `(row, col)` offsets, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |r| {
            (0..self.width())
                .filter(move |&c| self.rows[r] & (1 << c) != 0)
                .map(move |c| (r, c))
        })
    }

    /// Mask of the shape with its top-left corner at `(row, col)` on a `size` board
    ///
    /// The caller guarantees the shape fits at that origin.
    #[inline]
    pub fn mask_at(&self, size: usize, row: usize, col: usize) -> BitGrid {
        debug_assert!(row + self.height() <= size && col + self.width() <= size);
        let mut bits = 0u128;
        for dr in 0..self.height() {
            bits |= (self.rows[dr] as u128) << ((row + dr) * size + col);
        }
        BitGrid::from_bits(bits)
    }

    /// Render as `'#'`/`'.'` rows
    pub fn to_pattern(&self) -> Vec<String> {
        (0..self.height())
            .map(|r| {
                (0..self.width())
                    .map(|c| if self.contains(r, c) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

/// A piece instance: shape, color and the weight it was drawn with
///
/// Pieces are plain values. Identity is assigned by the hand that holds them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub shape: Shape,
    pub color: Color,
    pub spawn_weight: f64,
}

impl Piece {
    pub fn new(shape: Shape, color: Color, spawn_weight: f64) -> Self {
        Self {
            shape,
            color,
            spawn_weight,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.shape.cell_count()
    }

    pub fn width(&self) -> usize {
        self.shape.width()
    }

    pub fn height(&self) -> usize {
        self.shape.height()
    }
}

/// Catalog construction failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog has no entries")]
    Empty,
    #[error("entry {name:?} has invalid spawn weight {weight}")]
    InvalidWeight { name: String, weight: f64 },
    #[error("entry {name:?} has an invalid shape: {source}")]
    Shape {
        name: String,
        #[source]
        source: ShapeError,
    },
}

/// One catalog shape with its spawn weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub pattern: Vec<String>,
    pub weight: f64,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, pattern: &[&str], weight: f64) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.iter().map(|s| s.to_string()).collect(),
            weight,
        }
    }
}

/// Built-in shape table: `(name, shape, weight)`
///
/// Singles and dominoes dominate; five-cell lines, big corners and the 3x3 block
/// are rare.
pub const STANDARD_CATALOG: &[(&str, Shape, f64)] = &[
    ("single", Shape::from_pattern(&["#"]), 6.0),
    ("domino_h", Shape::from_pattern(&["##"]), 5.0),
    ("domino_v", Shape::from_pattern(&["#", "#"]), 5.0),
    ("line3_h", Shape::from_pattern(&["###"]), 3.0),
    ("line3_v", Shape::from_pattern(&["#", "#", "#"]), 3.0),
    ("corner3_a", Shape::from_pattern(&["##", "#."]), 2.0),
    ("corner3_b", Shape::from_pattern(&["##", ".#"]), 2.0),
    ("corner3_c", Shape::from_pattern(&["#.", "##"]), 2.0),
    ("corner3_d", Shape::from_pattern(&[".#", "##"]), 2.0),
    ("square2", Shape::from_pattern(&["##", "##"]), 2.5),
    ("line4_h", Shape::from_pattern(&["####"]), 1.5),
    ("line4_v", Shape::from_pattern(&["#", "#", "#", "#"]), 1.5),
    ("t_up", Shape::from_pattern(&[".#.", "###"]), 1.0),
    ("t_down", Shape::from_pattern(&["###", ".#."]), 1.0),
    ("t_left", Shape::from_pattern(&[".#", "##", ".#"]), 1.0),
    ("t_right", Shape::from_pattern(&["#.", "##", "#."]), 1.0),
    ("s_h", Shape::from_pattern(&[".##", "##."]), 0.8),
    ("s_v", Shape::from_pattern(&["#.", "##", ".#"]), 0.8),
    ("z_h", Shape::from_pattern(&["##.", ".##"]), 0.8),
    ("z_v", Shape::from_pattern(&[".#", "##", "#."]), 0.8),
    ("l_a", Shape::from_pattern(&["#.", "#.", "##"]), 0.8),
    ("l_b", Shape::from_pattern(&["###", "#.."]), 0.8),
    ("l_c", Shape::from_pattern(&["##", ".#", ".#"]), 0.8),
    ("l_d", Shape::from_pattern(&["..#", "###"]), 0.8),
    ("j_a", Shape::from_pattern(&[".#", ".#", "##"]), 0.8),
    ("j_b", Shape::from_pattern(&["#..", "###"]), 0.8),
    ("j_c", Shape::from_pattern(&["##", "#.", "#."]), 0.8),
    ("j_d", Shape::from_pattern(&["###", "..#"]), 0.8),
    ("rect_h", Shape::from_pattern(&["###", "###"]), 0.6),
    ("rect_v", Shape::from_pattern(&["##", "##", "##"]), 0.6),
    ("line5_h", Shape::from_pattern(&["#####"]), 0.5),
    ("line5_v", Shape::from_pattern(&["#", "#", "#", "#", "#"]), 0.5),
    ("big_corner_a", Shape::from_pattern(&["###", "#..", "#.."]), 0.4),
    ("big_corner_b", Shape::from_pattern(&["###", "..#", "..#"]), 0.4),
    ("big_corner_c", Shape::from_pattern(&["#..", "#..", "###"]), 0.4),
    ("big_corner_d", Shape::from_pattern(&["..#", "..#", "###"]), 0.4),
    ("square3", Shape::from_pattern(&["###", "###", "###"]), 0.3),
];

/// Immutable weighted library of piece shapes
#[derive(Debug, Clone, PartialEq)]
pub struct PieceCatalog {
    names: Vec<String>,
    shapes: Vec<Shape>,
    weights: Vec<f64>,
    total_weight: f64,
}

impl PieceCatalog {
    /// Build a catalog from entries, validating every shape and weight
    pub fn new(entries: &[CatalogEntry]) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            names: Vec::with_capacity(entries.len()),
            shapes: Vec::with_capacity(entries.len()),
            weights: Vec::with_capacity(entries.len()),
            total_weight: 0.0,
        };
        for entry in entries {
            let shape = Shape::parse(&entry.pattern).map_err(|source| CatalogError::Shape {
                name: entry.name.clone(),
                source,
            })?;
            catalog.push(&entry.name, shape, entry.weight)?;
        }
        catalog.finish()
    }

    /// Catalog built from [`STANDARD_CATALOG`]
    pub fn standard() -> Self {
        let mut names = Vec::with_capacity(STANDARD_CATALOG.len());
        let mut shapes = Vec::with_capacity(STANDARD_CATALOG.len());
        let mut weights = Vec::with_capacity(STANDARD_CATALOG.len());
        for &(name, shape, weight) in STANDARD_CATALOG {
            names.push(name.to_string());
            shapes.push(shape);
            weights.push(weight);
        }
        let total_weight = weights.iter().sum();
        Self {
            names,
            shapes,
            weights,
            total_weight,
        }
    }

    fn push(&mut self, name: &str, shape: Shape, weight: f64) -> Result<(), CatalogError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(CatalogError::InvalidWeight {
                name: name.to_string(),
                weight,
            });
        }
        self.names.push(name.to_string());
        self.shapes.push(shape);
        self.weights.push(weight);
        Ok(())
    }

    fn finish(mut self) -> Result<Self, CatalogError> {
        if self.shapes.is_empty() {
            return Err(CatalogError::Empty);
        }
        self.total_weight = self.weights.iter().sum();
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Entries as `(name, shape, weight)`
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Shape, f64)> + '_ {
        self.names
            .iter()
            .zip(&self.shapes)
            .zip(&self.weights)
            .map(|((n, s), w)| (n.as_str(), s, *w))
    }

    /// Index of the entry with this shape, if any
    pub fn position_of(&self, shape: &Shape) -> Option<usize> {
        self.shapes.iter().position(|s| s == shape)
    }

    /// Smallest cell count of any catalog shape
    pub fn min_cell_count(&self) -> usize {
        self.shapes.iter().map(Shape::cell_count).min().unwrap_or(0)
    }

    /// Draw one entry index by weight
    pub fn pick_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        pick_weighted(rng, &self.weights, self.total_weight)
    }

    /// Spawn a fresh piece: weighted shape, uniform color from `palette`
    ///
    /// An empty palette draws from every color.
    pub fn spawn_piece<R: Rng + ?Sized>(&self, rng: &mut R, palette: &[Color]) -> Piece {
        let index = self.pick_index(rng);
        let palette = if palette.is_empty() {
            &Color::ALL[..]
        } else {
            palette
        };
        let color = *pick_uniform(rng, palette);
        Piece::new(self.shapes[index], color, self.weights[index])
    }

    /// Spawn `count` independent pieces
    pub fn spawn_hand<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        palette: &[Color],
        count: usize,
    ) -> Vec<Piece> {
        (0..count).map(|_| self.spawn_piece(rng, palette)).collect()
    }
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;

    #[test]
    fn standard_shapes_are_valid() {
        for (name, shape, weight) in STANDARD_CATALOG {
            assert_eq!(shape.validate(), Ok(()), "shape {name} is invalid");
            assert!(*weight > 0.0, "shape {name} has no weight");
            assert_eq!(Shape::parse(&shape.to_pattern()).as_ref(), Ok(shape));
        }
    }

    #[test]
    fn small_pieces_outweigh_large_pieces() {
        let catalog = PieceCatalog::standard();
        let weight_of = |wanted: &str| {
            catalog
                .entries()
                .find(|(name, _, _)| *name == wanted)
                .map(|(_, _, w)| w)
                .unwrap()
        };
        assert!(weight_of("single") > 5.0 * weight_of("line5_h"));
        assert!(weight_of("domino_h") > 5.0 * weight_of("square3"));
        assert_eq!(catalog.min_cell_count(), 1);
    }

    #[test]
    fn shape_dimensions_and_cells() {
        let l = Shape::parse(&["#.", "#.", "##"]).unwrap();
        assert_eq!(l.width(), 2);
        assert_eq!(l.height(), 3);
        assert_eq!(l.cell_count(), 4);
        assert_eq!(
            l.cells().collect::<Vec<_>>(),
            vec![(0, 0), (1, 0), (2, 0), (2, 1)]
        );
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(Shape::parse(&empty), Err(ShapeError::Empty));
        assert_eq!(Shape::parse(&["..", ".."]), Err(ShapeError::Empty));
        assert_eq!(
            Shape::parse(&["##", "#"]),
            Err(ShapeError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(Shape::parse(&["#.", ".."]), Err(ShapeError::EmptyBorder));
        assert_eq!(Shape::parse(&["#.", ".#"]), Err(ShapeError::Disconnected));
        assert_eq!(
            Shape::parse(&["######"]),
            Err(ShapeError::TooLarge {
                width: 6,
                height: 1
            })
        );
        assert_eq!(Shape::parse(&["#x"]), Err(ShapeError::InvalidChar('x')));
    }

    #[test]
    fn catalog_rejects_bad_entries() {
        assert_eq!(PieceCatalog::new(&[]), Err(CatalogError::Empty));

        let bad_weight = [CatalogEntry::new("dot", &["#"], 0.0)];
        assert!(matches!(
            PieceCatalog::new(&bad_weight),
            Err(CatalogError::InvalidWeight { .. })
        ));

        let bad_shape = [CatalogEntry::new("split", &["#.#"], 1.0)];
        assert!(matches!(
            PieceCatalog::new(&bad_shape),
            Err(CatalogError::Shape {
                source: ShapeError::Disconnected,
                ..
            })
        ));
    }

    #[test]
    fn mask_at_places_rows_with_board_stride() {
        let corner = Shape::parse(&["##", "#."]).unwrap();
        let mask = corner.mask_at(8, 2, 3);
        let cells: Vec<usize> = mask.iter().collect();
        assert_eq!(cells, vec![2 * 8 + 3, 2 * 8 + 4, 3 * 8 + 3]);
    }

    #[test]
    fn spawn_uses_palette_and_is_deterministic() {
        let catalog = PieceCatalog::standard();
        let palette = [Color::Red, Color::Blue];

        let mut a = seeded_rng(5);
        let mut b = seeded_rng(5);
        let hand_a = catalog.spawn_hand(&mut a, &palette, 10);
        let hand_b = catalog.spawn_hand(&mut b, &palette, 10);

        assert_eq!(hand_a, hand_b);
        assert!(hand_a.iter().all(|p| palette.contains(&p.color)));
    }
}
