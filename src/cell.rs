//! Grid cells and bounded neighbourhoods.
//!
//! The lattice is a 2D grid of unit cells addressed by signed `(row, col)`
//! coordinates. Row 0 is the top of the grid, rows grow downwards and columns
//! grow to the right:
//!
//! ```text
//!            (r-1, c)
//! (r, c-1)   (r, c)    (r, c+1)
//!            (r+1, c)
//! ```
//!
//! Any grid-wide search must go through [`SearchBounds`]. The unbounded
//! [`Cell::neighbours`] happily walks off the lattice edge.
//!
//! Coordinates may span the full `i32` range; offsets and box sizes are
//! computed without overflow.

use smallvec::SmallVec;

/// Coordinate type for rows and columns.
pub type CoordinateType = i32;

/// Up to four neighbouring cells, kept inline.
pub type Neighbours = SmallVec<[Cell; 4]>;

/// A unit cell of the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    /// Row index, growing downwards.
    pub row: CoordinateType,
    /// Column index, growing to the right.
    pub col: CoordinateType,
}

impl Cell {
    /// Cell at `(row, col)`.
    pub const fn new(row: CoordinateType, col: CoordinateType) -> Self {
        Self { row, col }
    }

    /// The 4 axis-aligned cells at unit distance: up, down, left, right.
    ///
    /// No bound is applied, so the result may contain negative coordinates.
    /// Steps past `i32::MIN` or `i32::MAX` are left out.
    pub fn neighbours(&self) -> Neighbours {
        let Cell { row, col } = *self;
        [
            row.checked_sub(1).map(|r| Cell::new(r, col)),
            row.checked_add(1).map(|r| Cell::new(r, col)),
            col.checked_sub(1).map(|c| Cell::new(row, c)),
            col.checked_add(1).map(|c| Cell::new(row, c)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Neighbours restricted to the inclusive rectangle `[min, max]`.
    pub fn neighbours_within_box(&self, min: Cell, max: Cell) -> Neighbours {
        SearchBounds::new(min, max).neighbours(*self)
    }

    /// True if `other` is one of the four cardinal neighbours.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        matches!(
            (self.row.abs_diff(other.row), self.col.abs_diff(other.col)),
            (0, 1) | (1, 0)
        )
    }

    /// Component-wise maximum.
    pub fn max_with(&self, other: &Cell) -> Cell {
        Cell::new(self.row.max(other.row), self.col.max(other.col))
    }
}

impl From<(CoordinateType, CoordinateType)> for Cell {
    fn from((row, col): (CoordinateType, CoordinateType)) -> Self {
        Cell::new(row, col)
    }
}

/// Inclusive rectangle of cells that a grid search may visit.
///
/// Also provides the dense row-major numbering used as graph vertex ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    min: Cell,
    max: Cell,
}

impl SearchBounds {
    /// Box spanning `min` to `max` inclusive.
    pub fn new(min: Cell, max: Cell) -> Self {
        Self { min, max }
    }

    /// Bounds from the origin to `furthest` inclusive.
    pub fn from_origin(furthest: Cell) -> Self {
        Self::new(Cell::new(0, 0), furthest)
    }

    /// Top-left corner.
    pub fn min(&self) -> Cell {
        self.min
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Cell {
        self.max
    }

    /// Number of columns covered (0 for an inverted box).
    pub fn width(&self) -> usize {
        span(self.min.col, self.max.col)
    }

    /// Number of rows covered (0 for an inverted box).
    pub fn height(&self) -> usize {
        span(self.min.row, self.max.row)
    }

    /// Number of cells covered, saturating at `usize::MAX`.
    pub fn area(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    /// True if `cell` lies inside the box, edges included.
    pub fn contains(&self, cell: Cell) -> bool {
        (self.min.row..=self.max.row).contains(&cell.row)
            && (self.min.col..=self.max.col).contains(&cell.col)
    }

    /// Neighbours of `cell` that lie inside the box.
    pub fn neighbours(&self, cell: Cell) -> Neighbours {
        cell.neighbours()
            .into_iter()
            .filter(|n| self.contains(*n))
            .collect()
    }

    /// Row-major index of `cell`, or `None` outside the box (or past `usize`).
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let r = span(self.min.row, cell.row) - 1;
        let c = span(self.min.col, cell.col) - 1;
        r.checked_mul(self.width())?.checked_add(c)
    }

    /// Inverse of [`SearchBounds::index_of`].
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        if index >= self.area() {
            return None;
        }
        let w = self.width();
        let row = i64::from(self.min.row).checked_add(i64::try_from(index / w).ok()?)?;
        let col = i64::from(self.min.col).checked_add(i64::try_from(index % w).ok()?)?;
        Some(Cell::new(
            CoordinateType::try_from(row).ok()?,
            CoordinateType::try_from(col).ok()?,
        ))
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.min.row..=self.max.row)
            .flat_map(move |row| (self.min.col..=self.max.col).map(move |col| Cell::new(row, col)))
    }
}

/// Cells in the inclusive range `lo..=hi`, 0 when `hi < lo`.
fn span(lo: CoordinateType, hi: CoordinateType) -> usize {
    usize::try_from(i64::from(hi) - i64::from(lo) + 1).unwrap_or(0)
}
