//! # Alien Matrix
//!
//! Columns of aliens that sweep sideways and drop at the walls.
//!
//! ## Locking
//!
//! Each alien, each column's bookkeeping and the matrix bookkeeping have
//! their own lock. Operations take them one after another and never hold
//! two at once.

use parking_lot::Mutex;

use crate::constants::{
    ALIEN_ACCELERATION, ALIEN_MAX_X, ALIEN_MIN_X, ALIEN_WIDTH, ALIEN_X_SPEED, ALIEN_Y_SPEED,
    LEVEL_SPEED_INCREASE_FACTOR,
};
use crate::error::GameResult;
use crate::geometry::{Coord, Rect};
use crate::memory::{try_fixed_slice, ActiveSet, FixedGrid};

use super::alien::{home_position, Alien, AlienState, AlienTier};

/// Tolerance for deciding that the extent sits on a bound.
const EDGE_EPSILON: f32 = 1e-3;

/// Horizontal sweep direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepDirection {
    /// Towards `ALIEN_MIN_X`.
    Left,
    /// Towards `ALIEN_MAX_X`.
    Right,
}

impl SweepDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// What one matrix tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatrixStep {
    /// No active aliens, nothing moved.
    Idle,
    /// Every alien moved horizontally by `dx`.
    Shifted {
        /// Signed horizontal shift.
        dx: f32,
    },
    /// The extent sat on a bound: every alien dropped and the sweep reversed.
    Dropped {
        /// Vertical drop.
        dy: f32,
        /// Direction of the next sweep.
        direction: SweepDirection,
    },
}

/// Horizontal base speed on `level` (1-based), before per-kill acceleration.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn level_base_speed(level: u32) -> f32 {
    ALIEN_X_SPEED
        + ALIEN_ACCELERATION * LEVEL_SPEED_INCREASE_FACTOR * level.saturating_sub(1) as f32
}

// =============================================================================
// COLUMN
// =============================================================================

#[derive(Debug)]
struct ColumnBook {
    alive: ActiveSet,
    lowest_active: Option<usize>,
    active: bool,
}

impl ColumnBook {
    fn fresh(rows: usize) -> Self {
        Self {
            alive: ActiveSet::all_active(rows),
            lowest_active: rows.checked_sub(1),
            active: rows > 0,
        }
    }
}

/// Bookkeeping of one column of aliens.
///
/// The aliens themselves live in the matrix grid; the column only tracks
/// which of them are alive and which one may fire.
#[derive(Debug)]
pub struct AlienColumn {
    book: Mutex<ColumnBook>,
}

impl AlienColumn {
    fn new(rows: usize) -> Self {
        Self { book: Mutex::new(ColumnBook::fresh(rows)) }
    }

    /// Row of the lowest living alien, the one allowed to fire.
    #[must_use]
    pub fn lowest_active(&self) -> Option<usize> {
        self.book.lock().lowest_active
    }

    /// Returns true while at least one alien in the column lives.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.book.lock().active
    }

    /// Number of living aliens.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.book.lock().alive.count()
    }

    /// Marks `row` dead. Returns true if this emptied the column.
    fn mark_destroyed(&self, row: usize) -> bool {
        let mut book = self.book.lock();
        if !book.alive.set(row, false) {
            return false;
        }
        book.lowest_active = book.alive.last();
        let was_active = book.active;
        book.active = book.lowest_active.is_some();
        was_active && !book.active
    }

    fn reset(&self, rows: usize) {
        *self.book.lock() = ColumnBook::fresh(rows);
    }
}

// =============================================================================
// MATRIX
// =============================================================================

#[derive(Debug)]
struct MatrixBook {
    active_columns: ActiveSet,
    leftmost: Option<usize>,
    rightmost: Option<usize>,
    direction: SweepDirection,
    destroyed: u32,
    level: u32,
}

impl MatrixBook {
    fn fresh(columns: usize, level: u32) -> Self {
        let active_columns = ActiveSet::all_active(columns);
        Self {
            leftmost: active_columns.first(),
            rightmost: active_columns.last(),
            active_columns,
            direction: SweepDirection::Right,
            destroyed: 0,
            level,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn speed(&self) -> f32 {
        level_base_speed(self.level) + ALIEN_ACCELERATION * self.destroyed as f32
    }
}

/// One alien as seen by a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienView {
    /// Column index.
    pub column: usize,
    /// Row index.
    pub row: usize,
    /// Score tier.
    pub tier: AlienTier,
    /// Position and active flag.
    pub state: AlienState,
}

/// Plain-data copy of the matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixSnapshot {
    /// Every alien, living or not, column by column.
    pub aliens: Vec<AlienView>,
    /// Leftmost column with a living alien.
    pub leftmost: Option<usize>,
    /// Rightmost column with a living alien.
    pub rightmost: Option<usize>,
    /// Current sweep direction.
    pub direction: SweepDirection,
    /// Aliens destroyed this level.
    pub destroyed: u32,
    /// Current horizontal speed.
    pub speed: f32,
}

/// The alien formation.
///
/// Grid dimensions are fixed at construction. Destroying an alien flips its
/// active flag and updates the column and matrix bookkeeping; nothing is ever
/// removed from storage.
#[derive(Debug)]
pub struct AlienMatrix {
    aliens: FixedGrid<Alien>,
    columns: Box<[AlienColumn]>,
    book: Mutex<MatrixBook>,
}

impl AlienMatrix {
    /// Builds a `columns` x `rows` formation on level one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLayout` for a zero dimension and `AllocationFailure`
    /// if storage cannot be reserved.
    pub fn try_new(columns: usize, rows: usize) -> GameResult<Self> {
        let aliens = FixedGrid::try_from_fn("aliens", columns, rows, Alien::new)?;
        let column_books = try_fixed_slice("alien columns", columns, |_| AlienColumn::new(rows))?;
        Ok(Self {
            aliens,
            columns: column_books,
            book: Mutex::new(MatrixBook::fresh(columns, 1)),
        })
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.aliens.columns()
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.aliens.rows()
    }

    /// Alien at `(column, row)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is outside the formation.
    #[inline]
    #[must_use]
    pub fn alien(&self, column: usize, row: usize) -> &Alien {
        self.aliens.get(column, row)
    }

    /// Bookkeeping of `column`.
    ///
    /// # Panics
    ///
    /// Panics if `column` is outside the formation.
    #[inline]
    #[must_use]
    pub fn column(&self, column: usize) -> &AlienColumn {
        &self.columns[column]
    }

    /// Leftmost column with a living alien.
    #[must_use]
    pub fn leftmost(&self) -> Option<usize> {
        self.book.lock().leftmost
    }

    /// Rightmost column with a living alien.
    #[must_use]
    pub fn rightmost(&self) -> Option<usize> {
        self.book.lock().rightmost
    }

    /// Current sweep direction.
    #[must_use]
    pub fn direction(&self) -> SweepDirection {
        self.book.lock().direction
    }

    /// Current horizontal speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.book.lock().speed()
    }

    /// Aliens destroyed since the level started.
    #[must_use]
    pub fn destroyed(&self) -> u32 {
        self.book.lock().destroyed
    }

    /// Returns true once every alien is dead.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.book.lock().leftmost.is_none()
    }

    /// Number of living aliens.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.columns.iter().map(AlienColumn::active_count).sum()
    }

    /// Kills the alien at `(column, row)`.
    ///
    /// Returns its tier if it was alive, `None` if it was already dead.
    ///
    /// # Panics
    ///
    /// Panics if the index is outside the formation.
    pub fn deactivate(&self, column: usize, row: usize) -> Option<AlienTier> {
        let alien = self.aliens.get(column, row);
        if !alien.deactivate() {
            return None;
        }
        let emptied = self.columns[column].mark_destroyed(row);

        let mut book = self.book.lock();
        book.destroyed += 1;
        if emptied {
            book.active_columns.set(column, false);
            book.leftmost = book.active_columns.first();
            book.rightmost = book.active_columns.last();
        }
        Some(alien.tier())
    }

    /// Advances the formation by one tick.
    ///
    /// Shifts every alien by the current speed, clamped so the living extent
    /// ends exactly on the bound. When the extent already sits on the bound
    /// the formation drops by `ALIEN_Y_SPEED` and reverses instead.
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&self) -> MatrixStep {
        let (direction, speed, extent) = {
            let book = self.book.lock();
            (book.direction, book.speed(), book.leftmost.zip(book.rightmost))
        };
        let Some((left, right)) = extent else {
            return MatrixStep::Idle;
        };

        let room = match direction {
            SweepDirection::Right => {
                let right_edge = self.column_x(right) + ALIEN_WIDTH as f32;
                ALIEN_MAX_X as f32 - right_edge
            }
            SweepDirection::Left => self.column_x(left) - ALIEN_MIN_X as f32,
        };

        if room <= EDGE_EPSILON {
            let direction = direction.reversed();
            self.book.lock().direction = direction;
            self.translate_all(0.0, ALIEN_Y_SPEED);
            return MatrixStep::Dropped { dy: ALIEN_Y_SPEED, direction };
        }

        let dx = speed.min(room) * direction.sign();
        self.translate_all(dx, 0.0);
        MatrixStep::Shifted { dx }
    }

    /// Bottom edge of the lowest living alien.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn lowest_edge(&self) -> Option<f32> {
        (0..self.column_count())
            .filter_map(|c| {
                let row = self.columns[c].lowest_active()?;
                Some(self.aliens.get(c, row).snapshot().position.y + ALIEN_WIDTH as f32)
            })
            .reduce(f32::max)
    }

    /// Muzzle of the alien allowed to fire from `column`: bottom centre of
    /// its lowest living alien.
    #[must_use]
    pub fn muzzle(&self, column: usize) -> Option<Coord> {
        let row = self.columns[column].lowest_active()?;
        let state = self.aliens.get(column, row).snapshot();
        if !state.active {
            return None;
        }
        let rect = state.rect();
        Some(Coord::new(rect.x + rect.w / 2, rect.bottom()))
    }

    /// First living alien whose box overlaps `rect`.
    #[must_use]
    pub fn hit_test(&self, rect: &Rect) -> Option<(usize, usize)> {
        self.aliens.iter().find_map(|((c, r), alien)| {
            let state = alien.snapshot();
            (state.active && state.rect().intersects(rect)).then_some((c, r))
        })
    }

    /// Revives every alien at its home position and resets the
    /// bookkeeping for `level`.
    pub fn reset(&self, level: u32) {
        for ((c, r), alien) in self.aliens.iter() {
            alien.respawn(home_position(c, r));
        }
        let rows = self.row_count();
        for column in self.columns.iter() {
            column.reset(rows);
        }
        *self.book.lock() = MatrixBook::fresh(self.column_count(), level);
    }

    /// Copies the formation.
    #[must_use]
    pub fn snapshot(&self) -> MatrixSnapshot {
        let aliens = self
            .aliens
            .iter()
            .map(|((column, row), alien)| AlienView {
                column,
                row,
                tier: alien.tier(),
                state: alien.snapshot(),
            })
            .collect();
        let book = self.book.lock();
        MatrixSnapshot {
            aliens,
            leftmost: book.leftmost,
            rightmost: book.rightmost,
            direction: book.direction,
            destroyed: book.destroyed,
            speed: book.speed(),
        }
    }

    fn column_x(&self, column: usize) -> f32 {
        self.aliens.get(column, 0).snapshot().position.x
    }

    fn translate_all(&self, dx: f32, dy: f32) {
        for (_, alien) in self.aliens.iter() {
            alien.translate(dx, dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ALIENS_PER_COLUMN, ALIENS_PER_ROW};

    fn standard() -> AlienMatrix {
        AlienMatrix::try_new(ALIENS_PER_ROW, ALIENS_PER_COLUMN).unwrap()
    }

    #[test]
    fn test_fresh_matrix() {
        let matrix = standard();
        assert_eq!(matrix.leftmost(), Some(0));
        assert_eq!(matrix.rightmost(), Some(7));
        assert_eq!(matrix.active_count(), 40);
        assert_eq!(matrix.column(3).lowest_active(), Some(4));
        assert_eq!(matrix.direction(), SweepDirection::Right);
    }

    #[test]
    fn test_clearing_first_column_moves_leftmost() {
        let matrix = standard();
        for row in 0..5 {
            assert!(matrix.deactivate(0, row).is_some());
        }
        assert_eq!(matrix.leftmost(), Some(1));
        assert_eq!(matrix.rightmost(), Some(7));
        assert!(!matrix.column(0).is_active());
        assert_eq!(matrix.column(0).lowest_active(), None);
    }

    #[test]
    fn test_clearing_everything_yields_no_extent() {
        let matrix = standard();
        for c in 0..8 {
            for r in 0..5 {
                matrix.deactivate(c, r);
            }
        }
        assert_eq!(matrix.leftmost(), None);
        assert_eq!(matrix.rightmost(), None);
        assert!(matrix.is_cleared());
        assert_eq!(matrix.step(), MatrixStep::Idle);
        // Storage keeps its shape
        assert_eq!(matrix.column_count(), 8);
        assert_eq!(matrix.row_count(), 5);
        assert_eq!(matrix.snapshot().aliens.len(), 40);
    }

    #[test]
    fn test_deactivate_twice_scores_once() {
        let matrix = standard();
        assert_eq!(matrix.deactivate(2, 0), Some(AlienTier::Hard));
        assert_eq!(matrix.deactivate(2, 0), None);
        assert_eq!(matrix.destroyed(), 1);
    }

    #[test]
    fn test_lowest_active_climbs() {
        let matrix = standard();
        matrix.deactivate(4, 4);
        assert_eq!(matrix.column(4).lowest_active(), Some(3));
        matrix.deactivate(4, 1);
        assert_eq!(matrix.column(4).lowest_active(), Some(3));
        assert_eq!(matrix.muzzle(4), Some(Coord::new(307, 220)));
    }

    #[test]
    fn test_sweep_right_then_drop() {
        let matrix = standard();
        let mut last_right = 0.0;
        let mut dropped = None;
        for _ in 0..2_000 {
            match matrix.step() {
                MatrixStep::Shifted { dx } => {
                    assert!(dx > 0.0);
                    last_right = matrix.alien(7, 0).snapshot().position.x + 35.0;
                }
                step @ MatrixStep::Dropped { .. } => {
                    dropped = Some(step);
                    break;
                }
                MatrixStep::Idle => unreachable!(),
            }
        }
        assert!((last_right - 620.0).abs() < 1e-3);
        assert_eq!(
            dropped,
            Some(MatrixStep::Dropped { dy: 5.0, direction: SweepDirection::Left })
        );
        assert_eq!(matrix.direction(), SweepDirection::Left);
        assert_eq!(matrix.alien(0, 0).snapshot().position.y, 55.0);

        match matrix.step() {
            MatrixStep::Shifted { dx } => assert!(dx < 0.0),
            other => panic!("expected shift, got {other:?}"),
        }
    }

    #[test]
    fn test_speed_grows_with_kills_and_level() {
        let matrix = standard();
        assert!((matrix.speed() - 0.3).abs() < 1e-6);
        matrix.deactivate(0, 0);
        matrix.deactivate(0, 1);
        assert!((matrix.speed() - 0.4).abs() < 1e-6);

        matrix.reset(2);
        assert_eq!(matrix.active_count(), 40);
        assert!((matrix.speed() - 0.4).abs() < 1e-6);
        assert!((level_base_speed(3) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hit_test_ignores_dead_aliens() {
        let matrix = standard();
        let shot = Rect::new(60, 60, 2, 5);
        assert_eq!(matrix.hit_test(&shot), Some((0, 0)));
        matrix.deactivate(0, 0);
        assert_eq!(matrix.hit_test(&shot), None);
    }

    #[test]
    fn test_lowest_edge() {
        let matrix = standard();
        assert_eq!(matrix.lowest_edge(), Some(265.0));
        for c in 0..8 {
            matrix.deactivate(c, 4);
        }
        assert_eq!(matrix.lowest_edge(), Some(220.0));
    }
}
