//! # Aliens
//!
//! A single alien and its score tier.

use parking_lot::Mutex;

use crate::constants::{
    ALIEN_EASY, ALIEN_HARD, ALIEN_MIDDLE, ALIEN_PADDING_X, ALIEN_PADDING_Y, ALIEN_START_X,
    ALIEN_START_Y, ALIEN_WIDTH,
};
use crate::geometry::{CoordF, Rect};

/// Score tier of an alien, decided by its row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlienTier {
    /// Bottom rows.
    Easy,
    /// Middle rows.
    Middle,
    /// Top row.
    Hard,
}

impl AlienTier {
    /// Tier of the alien in `row` (0 is the top row).
    ///
    /// The top row is hard, the next two are middle and the rest easy.
    #[must_use]
    pub const fn for_row(row: usize) -> Self {
        match row {
            0 => Self::Hard,
            1 | 2 => Self::Middle,
            _ => Self::Easy,
        }
    }

    /// Points awarded for destroying an alien of this tier.
    #[inline]
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Easy => ALIEN_EASY,
            Self::Middle => ALIEN_MIDDLE,
            Self::Hard => ALIEN_HARD,
        }
    }

    /// Sprite shared by every alien of this tier.
    #[inline]
    #[must_use]
    pub const fn image(self) -> ImageHandle {
        match self {
            Self::Easy => ImageHandle(0),
            Self::Middle => ImageHandle(1),
            Self::Hard => ImageHandle(2),
        }
    }
}

/// Opaque reference to a sprite loaded by the drawing backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// Plain-data view of an alien.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienState {
    /// Top-left corner.
    pub position: CoordF,
    /// Whether the alien is alive.
    pub active: bool,
}

impl AlienState {
    /// Bounding box, rounded to pixels.
    #[must_use]
    pub fn rect(&self) -> Rect {
        let p = self.position.to_pixel();
        Rect::new(p.x, p.y, ALIEN_WIDTH, ALIEN_WIDTH)
    }
}

/// Grid position of the alien at `(column, row)`.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn home_position(column: usize, row: usize) -> CoordF {
    let x = ALIEN_START_X + column as i32 * (ALIEN_WIDTH + ALIEN_PADDING_X);
    let y = ALIEN_START_Y + row as i32 * (ALIEN_WIDTH + ALIEN_PADDING_Y);
    CoordF::new(x as f32, y as f32)
}

/// One alien guarded by its own lock.
#[derive(Debug)]
pub struct Alien {
    tier: AlienTier,
    state: Mutex<AlienState>,
}

impl Alien {
    /// Creates an active alien at its home grid position.
    #[must_use]
    pub fn new(column: usize, row: usize) -> Self {
        Self {
            tier: AlienTier::for_row(row),
            state: Mutex::new(AlienState {
                position: home_position(column, row),
                active: true,
            }),
        }
    }

    /// Score tier.
    #[inline]
    #[must_use]
    pub const fn tier(&self) -> AlienTier {
        self.tier
    }

    /// Copies the current state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> AlienState {
        *self.state.lock()
    }

    /// Kills the alien. Returns true if it was alive.
    pub fn deactivate(&self) -> bool {
        std::mem::replace(&mut self.state.lock().active, false)
    }

    /// Moves the alien by `(dx, dy)`, alive or not.
    pub fn translate(&self, dx: f32, dy: f32) {
        let mut state = self.state.lock();
        state.position.x += dx;
        state.position.y += dy;
    }

    /// Revives the alien at `position`.
    pub fn respawn(&self, position: CoordF) {
        *self.state.lock() = AlienState { position, active: true };
    }
}
