//! # Fixed Grid
//!
//! Fixed-capacity 2D storage indexed by `(column, row)`.

use crate::error::{GameError, GameResult};

/// Reserves exactly `len` slots and fills them with `f(index)`.
///
/// Reservation is fallible, so running out of memory surfaces as
/// [`GameError::AllocationFailure`] instead of aborting the process.
///
/// # Errors
///
/// Returns `AllocationFailure` if the storage cannot be reserved.
pub fn try_fixed_slice<T>(
    entity: &'static str,
    len: usize,
    mut f: impl FnMut(usize) -> T,
) -> GameResult<Box<[T]>> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(len)
        .map_err(|_| GameError::AllocationFailure { entity, requested: len })?;
    storage.extend((0..len).map(&mut f));
    Ok(storage.into_boxed_slice())
}

/// Column-major grid with dimensions fixed at construction.
///
/// There is no way to insert or remove cells after construction.
/// Callers model removal with an active flag inside `T`.
#[derive(Debug)]
pub struct FixedGrid<T> {
    /// Cells, column by column.
    cells: Box<[T]>,
    /// Number of columns.
    columns: usize,
    /// Number of rows per column.
    rows: usize,
}

impl<T> FixedGrid<T> {
    /// Builds a grid, calling `f(column, row)` for every cell.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLayout` if a dimension is zero and
    /// `AllocationFailure` if the storage cannot be reserved.
    pub fn try_from_fn(
        entity: &'static str,
        columns: usize,
        rows: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> GameResult<Self> {
        if columns == 0 || rows == 0 {
            return Err(GameError::InvalidLayout {
                entity,
                reason: "grid dimensions must be non-zero",
            });
        }
        let len = columns
            .checked_mul(rows)
            .ok_or(GameError::AllocationFailure { entity, requested: usize::MAX })?;
        let cells = try_fixed_slice(entity, len, |i| f(i / rows, i % rows))?;
        Ok(Self { cells, columns, rows })
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: zero-sized grids are rejected at construction.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `(column, row)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is outside the grid. Indices come from the fixed
    /// layout, so this is a programming error.
    #[inline]
    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> &T {
        assert!(
            column < self.columns && row < self.rows,
            "cell ({column}, {row}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        &self.cells[column * self.rows + row]
    }

    /// All cells of one column, top to bottom.
    #[must_use]
    pub fn column(&self, column: usize) -> &[T] {
        let start = column * self.rows;
        &self.cells[start..start + self.rows]
    }

    /// Iterates over `((column, row), cell)`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let rows = self.rows;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i / rows, i % rows), cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_major_layout() {
        let grid = FixedGrid::try_from_fn("test", 3, 2, |c, r| (c, r)).unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(*grid.get(2, 1), (2, 1));
        assert_eq!(grid.column(1), &[(1, 0), (1, 1)]);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = FixedGrid::try_from_fn("aliens", 0, 5, |_, _| 0u8).err();
        assert!(matches!(err, Some(GameError::InvalidLayout { entity: "aliens", .. })));
    }

    #[test]
    fn test_iter_visits_every_cell() {
        let grid = FixedGrid::try_from_fn("test", 2, 2, |c, r| c * 10 + r).unwrap();
        let seen: Vec<_> = grid.iter().map(|(idx, v)| (idx, *v)).collect();
        assert_eq!(seen, vec![((0, 0), 0), ((0, 1), 1), ((1, 0), 10), ((1, 1), 11)]);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_panics() {
        let grid = FixedGrid::try_from_fn("test", 2, 2, |_, _| ()).unwrap();
        let _ = grid.get(2, 0);
    }

    #[test]
    fn test_try_fixed_slice() {
        let slice = try_fixed_slice("bullets", 4, |i| i * 2).unwrap();
        assert_eq!(&*slice, &[0, 2, 4, 6]);
    }
}
