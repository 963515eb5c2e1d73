//! # Bunkers
//!
//! Destructible shelters between the ship and the aliens.

use parking_lot::Mutex;

use crate::constants::{
    BUNKER_CELL_SIZE, BUNKER_POSITION_Y, BUNKER_ROWS, BUNKER_X_CELLS_NUMBER, SCREEN_WIDTH,
};
use crate::geometry::{Coord, Rect};

use super::bullet::Heading;

/// Cell rows of one bunker.
pub type BunkerCells = [[BunkerCell; BUNKER_X_CELLS_NUMBER]; BUNKER_ROWS];

/// One destructible square of a bunker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BunkerCell {
    /// Centre of the cell.
    pub position: Coord,
    /// Edge length.
    pub width: i32,
    /// Whether the cell still stands.
    pub active: bool,
}

impl BunkerCell {
    /// Bounding box of the cell.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::centered(self.position, self.width, self.width)
    }
}

/// Left edge of bunker `index` when `count` bunkers share the screen width.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn bunker_origin(index: usize, count: usize) -> Coord {
    let width = BUNKER_WIDTH;
    let count = count as i32;
    let gap = (SCREEN_WIDTH - count * width) / (count + 1);
    Coord::new(gap + index as i32 * (width + gap), BUNKER_POSITION_Y)
}

/// Full width of a bunker.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const BUNKER_WIDTH: i32 = BUNKER_X_CELLS_NUMBER as i32 * BUNKER_CELL_SIZE;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn fresh_cells(origin: Coord) -> BunkerCells {
    let half = BUNKER_CELL_SIZE / 2;
    let mut cells = [[BunkerCell::default(); BUNKER_X_CELLS_NUMBER]; BUNKER_ROWS];
    for (row, line) in cells.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            *cell = BunkerCell {
                position: Coord::new(
                    origin.x + col as i32 * BUNKER_CELL_SIZE + half,
                    origin.y + row as i32 * BUNKER_CELL_SIZE + half,
                ),
                width: BUNKER_CELL_SIZE,
                // Gap in the centre of the middle row
                active: !(row == 1 && (2..=4).contains(&col)),
            };
        }
    }
    cells
}

/// A bunker: one lock over all of its cells.
#[derive(Debug)]
pub struct Bunker {
    origin: Coord,
    cells: Mutex<BunkerCells>,
}

impl Bunker {
    /// Builds an intact bunker with its top-left corner at `origin`.
    #[must_use]
    pub fn new(origin: Coord) -> Self {
        Self { origin, cells: Mutex::new(fresh_cells(origin)) }
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Coord {
        self.origin
    }

    /// Box around every cell, standing or not.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            BUNKER_WIDTH,
            BUNKER_ROWS as i32 * BUNKER_CELL_SIZE,
        )
    }

    /// Knocks out the standing cell that `rect` reaches first.
    ///
    /// A projectile heading up strikes the lowest overlapping row, one
    /// heading down the highest. Returns `(row, column)` of the cell hit.
    pub fn hit(&self, rect: &Rect, heading: Heading) -> Option<(usize, usize)> {
        if !self.bounds().intersects(rect) {
            return None;
        }
        let mut cells = self.cells.lock();
        let mut candidates = (0..BUNKER_ROWS)
            .flat_map(|row| (0..BUNKER_X_CELLS_NUMBER).map(move |col| (row, col)));
        let struck =
            |&(r, c): &(usize, usize)| cells[r][c].active && cells[r][c].rect().intersects(rect);
        let hit = match heading {
            Heading::Up => candidates.rev().find(struck),
            Heading::Down => candidates.find(struck),
        }?;
        cells[hit.0][hit.1].active = false;
        Some(hit)
    }

    /// Number of standing cells.
    #[must_use]
    pub fn active_cells(&self) -> usize {
        self.cells.lock().iter().flatten().filter(|c| c.active).count()
    }

    /// Restores every cell.
    pub fn reset(&self) {
        *self.cells.lock() = fresh_cells(self.origin);
    }

    /// Copies the cells.
    #[must_use]
    pub fn snapshot(&self) -> BunkerCells {
        *self.cells.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_bunker_has_gap() {
        let bunker = Bunker::new(bunker_origin(0, 5));
        let cells = bunker.snapshot();
        assert_eq!(bunker.active_cells(), 21 - 3);
        assert!(!cells[1][3].active);
        assert!(cells[1][1].active);
        assert!(cells[0][3].active);
    }

    #[test]
    fn test_bunkers_evenly_spaced() {
        let xs: Vec<_> = (0..5).map(|i| bunker_origin(i, 5).x).collect();
        assert_eq!(xs, vec![65, 179, 293, 407, 521]);
        assert!(xs.iter().all(|x| x + BUNKER_WIDTH <= SCREEN_WIDTH));
    }

    #[test]
    fn test_hit_from_below_takes_bottom_row() {
        let bunker = Bunker::new(Coord::new(100, 419));
        // Column 0 spans x 100..107, all three rows
        let shot = Rect::new(102, 419, 2, 21);
        assert_eq!(bunker.hit(&shot, Heading::Up), Some((2, 0)));
        assert_eq!(bunker.hit(&shot, Heading::Down), Some((0, 0)));
        assert_eq!(bunker.hit(&shot, Heading::Up), Some((1, 0)));
        assert_eq!(bunker.hit(&shot, Heading::Up), None);

        bunker.reset();
        assert_eq!(bunker.active_cells(), 18);
    }

    #[test]
    fn test_gap_lets_bullets_through_middle_row() {
        let bunker = Bunker::new(Coord::new(100, 419));
        // Column 3 at x 121..128, middle row only
        let shot = Rect::new(123, 427, 2, 5);
        assert_eq!(bunker.hit(&shot, Heading::Up), None);
    }
}
