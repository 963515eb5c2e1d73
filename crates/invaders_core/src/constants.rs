//! # Game Constants
//!
//! Screen geometry, entity dimensions and gameplay tuning.
//!
//! Pixel values are screen coordinates with the origin in the top-left corner
//! and y growing downwards.

// =============================================================================
// SCREEN
// =============================================================================

/// Screen width in pixels.
pub const SCREEN_WIDTH: i32 = 640;

/// Screen height in pixels.
pub const SCREEN_HEIGHT: i32 = 480;

/// Generic padding between screen edges and entities.
pub const PADDING: i32 = 10;

/// Screen refresh period in milliseconds (~60 Hz).
pub const SCREEN_PERIOD_MS: u64 = 1000 / 60;

// =============================================================================
// BULLETS
// =============================================================================

/// Bullet height.
pub const BULLET_HEIGHT: i32 = 5;

/// Bullet width.
pub const BULLET_WIDTH: i32 = 2;

/// Player bullet speed (pixels per tick, upwards).
pub const BULLET_SPEED: i32 = 7;

// =============================================================================
// SPACESHIP
// =============================================================================

/// Ship body height.
pub const SHIP_HEIGHT: i32 = 10;

/// Ship body width.
pub const SHIP_WIDTH: i32 = 50;

/// Gun height (sits on top of the body).
pub const GUN_HEIGHT: i32 = 10;

/// Gun width.
pub const GUN_WIDTH: i32 = 10;

/// Ship speed (pixels per tick).
pub const SHIP_SPEED: i32 = 5;

/// Rightmost allowed ship centre.
pub const SHIP_X_MAX: i32 = SCREEN_WIDTH - PADDING - SHIP_WIDTH / 2;

/// Leftmost allowed ship centre.
pub const SHIP_X_MIN: i32 = PADDING + SHIP_WIDTH / 2;

/// Top edge of the ship body.
pub const SHIP_Y_CO: i32 = SCREEN_HEIGHT - PADDING - SHIP_HEIGHT;

/// Player lives besides the first one.
pub const PLAYER_LIVES: u32 = 2;

/// How strongly each level raises the alien base speed.
pub const LEVEL_SPEED_INCREASE_FACTOR: f32 = 2.0;

// =============================================================================
// ALIENS
// =============================================================================

/// Score of an alien in the bottom rows.
pub const ALIEN_EASY: u32 = 10;

/// Score of an alien in the middle rows.
pub const ALIEN_MIDDLE: u32 = 20;

/// Score of an alien in the top row.
pub const ALIEN_HARD: u32 = 30;

/// Number of alien columns.
pub const ALIENS_PER_ROW: usize = 8;

/// Number of aliens in each column.
pub const ALIENS_PER_COLUMN: usize = 5;

/// Alien sprite width and height.
pub const ALIEN_WIDTH: i32 = 35;

/// Horizontal gap between columns.
pub const ALIEN_PADDING_X: i32 = 25;

/// Vertical gap between rows.
pub const ALIEN_PADDING_Y: i32 = 10;

/// Left edge of the first column.
pub const ALIEN_START_X: i32 = 50;

/// Top edge of the first row.
pub const ALIEN_START_Y: i32 = 50;

/// Left sweep bound.
pub const ALIEN_MIN_X: i32 = 20;

/// Right sweep bound.
pub const ALIEN_MAX_X: i32 = SCREEN_WIDTH - ALIEN_MIN_X;

/// Horizontal alien speed on level one (pixels per tick).
pub const ALIEN_X_SPEED: f32 = 0.3;

/// Speed gained per destroyed alien.
pub const ALIEN_ACCELERATION: f32 = 0.05;

/// Drop step when the matrix reverses.
pub const ALIEN_Y_SPEED: f32 = 5.0;

/// Cap on concurrently active alien bullets.
pub const MAX_ACTIVE_ALIEN_BULLETS: usize = 10;

/// Alien bullet speed (pixels per tick, downwards).
pub const ALIEN_BULLET_SPEED: i32 = 3;

/// One in `RAND_SHOOT_CHANCE` per active column per tick.
pub const RAND_SHOOT_CHANCE: u32 = 1000;

// =============================================================================
// BUNKERS
// =============================================================================

/// Number of bunkers.
pub const NUMBER_OF_BUNKERS: usize = 5;

/// Edge length of one bunker cell.
pub const BUNKER_CELL_SIZE: i32 = 7;

/// Cells per bunker row.
pub const BUNKER_X_CELLS_NUMBER: usize = 7;

/// Rows per bunker.
pub const BUNKER_ROWS: usize = 3;

/// Top edge of every bunker.
pub const BUNKER_POSITION_Y: i32 =
    SCREEN_HEIGHT - SHIP_HEIGHT - GUN_HEIGHT - 3 * BUNKER_CELL_SIZE - 2 * PADDING;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_bounds() {
        assert_eq!(SHIP_X_MIN, 35);
        assert_eq!(SHIP_X_MAX, 605);
        assert_eq!(SHIP_Y_CO, 460);
        assert_eq!(ALIEN_MAX_X, 620);
        assert_eq!(BUNKER_POSITION_Y, 419);
    }
}
