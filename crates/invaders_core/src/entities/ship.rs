//! # Spaceship
//!
//! The player's ship.

use parking_lot::Mutex;

use crate::constants::{
    GUN_HEIGHT, GUN_WIDTH, PLAYER_LIVES, SCREEN_WIDTH, SHIP_HEIGHT, SHIP_WIDTH, SHIP_X_MAX,
    SHIP_X_MIN, SHIP_Y_CO,
};
use crate::geometry::{Coord, Rect};

/// Plain-data view of the ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShipState {
    /// `x` is the horizontal centre, `y` the top edge of the body.
    pub position: Coord,
    /// Lives left besides the current one.
    pub lives: u32,
}

impl ShipState {
    /// Bounding box of the body.
    #[must_use]
    pub const fn body(&self) -> Rect {
        Rect::new(self.position.x - SHIP_WIDTH / 2, self.position.y, SHIP_WIDTH, SHIP_HEIGHT)
    }

    /// Bounding box of the gun on top of the body.
    #[must_use]
    pub const fn gun(&self) -> Rect {
        Rect::new(
            self.position.x - GUN_WIDTH / 2,
            self.position.y - GUN_HEIGHT,
            GUN_WIDTH,
            GUN_HEIGHT,
        )
    }

    /// Where a fired bullet starts: the tip of the gun.
    #[must_use]
    pub const fn gun_tip(&self) -> Coord {
        Coord::new(self.position.x, self.position.y - GUN_HEIGHT)
    }

    /// Returns true if `rect` touches the body or the gun.
    #[must_use]
    pub const fn is_hit_by(&self, rect: &Rect) -> bool {
        self.body().intersects(rect) || self.gun().intersects(rect)
    }
}

impl Default for ShipState {
    fn default() -> Self {
        Self {
            position: Coord::new(SCREEN_WIDTH / 2, SHIP_Y_CO),
            lives: PLAYER_LIVES,
        }
    }
}

/// Result of the ship being hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipHit {
    /// A life was lost; this many remain besides the current one.
    LifeLost(u32),
    /// The hit landed with no lives left.
    Destroyed,
}

/// The player's ship guarded by its own lock.
#[derive(Debug, Default)]
pub struct Spaceship {
    state: Mutex<ShipState>,
}

impl Spaceship {
    /// Creates the ship centred in the lower band with full lives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the current state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> ShipState {
        *self.state.lock()
    }

    /// Moves the ship horizontally, clamped to `[SHIP_X_MIN, SHIP_X_MAX]`.
    ///
    /// Returns the new centre.
    pub fn shift(&self, dx: i32) -> i32 {
        let mut state = self.state.lock();
        state.position.x = state.position.x.saturating_add(dx).clamp(SHIP_X_MIN, SHIP_X_MAX);
        state.position.x
    }

    /// Places the ship, clamped to the allowed band.
    pub fn set_x(&self, x: i32) {
        self.state.lock().position.x = x.clamp(SHIP_X_MIN, SHIP_X_MAX);
    }

    /// Registers a hit.
    pub fn hit(&self) -> ShipHit {
        let mut state = self.state.lock();
        match state.lives.checked_sub(1) {
            Some(lives) => {
                state.lives = lives;
                ShipHit::LifeLost(lives)
            }
            None => ShipHit::Destroyed,
        }
    }

    /// Restores the starting position and lives.
    pub fn reset(&self) {
        *self.state.lock() = ShipState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_centered() {
        let ship = Spaceship::new();
        let state = ship.snapshot();
        assert_eq!(state.position, Coord::new(320, SHIP_Y_CO));
        assert_eq!(state.lives, PLAYER_LIVES);
    }

    #[test]
    fn test_shift_clamps_at_walls() {
        let ship = Spaceship::new();
        for _ in 0..500 {
            let x = ship.shift(5);
            assert!((SHIP_X_MIN..=SHIP_X_MAX).contains(&x));
        }
        assert_eq!(ship.snapshot().position.x, SHIP_X_MAX);

        assert_eq!(ship.shift(-10_000), SHIP_X_MIN);
        assert_eq!(ship.shift(i32::MIN), SHIP_X_MIN);
    }

    #[test]
    fn test_hit_counts_down_then_destroys() {
        let ship = Spaceship::new();
        assert_eq!(ship.hit(), ShipHit::LifeLost(1));
        assert_eq!(ship.hit(), ShipHit::LifeLost(0));
        assert_eq!(ship.hit(), ShipHit::Destroyed);
        assert_eq!(ship.snapshot().lives, 0);

        ship.reset();
        assert_eq!(ship.snapshot().lives, PLAYER_LIVES);
    }

    #[test]
    fn test_gun_tip_above_body() {
        let state = ShipState::default();
        assert_eq!(state.gun_tip(), Coord::new(320, SHIP_Y_CO - GUN_HEIGHT));
        assert!(state.is_hit_by(&Rect::new(318, 455, 2, 5)));
        assert!(!state.is_hit_by(&Rect::new(100, 455, 2, 5)));
    }
}
