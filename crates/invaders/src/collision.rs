//! Projectile collisions, resolved by the task that moved the projectile.
//!
//! Locks are taken one at a time: the projectile state is a copy, and every
//! entity is asked in turn.

use invaders_core::constants::{BULLET_HEIGHT, SCREEN_HEIGHT};
use invaders_core::{BulletState, GameObjects, Heading, ShipHit};

/// What a projectile ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// Nothing.
    None,
    /// Left the playfield.
    OffScreen,
    /// Destroyed a bunker cell.
    Bunker {
        /// Bunker index.
        bunker: usize,
        /// Cell row.
        row: usize,
        /// Cell column.
        column: usize,
    },
    /// Destroyed an alien.
    Alien {
        /// Matrix column.
        column: usize,
        /// Matrix row.
        row: usize,
        /// Points scored.
        points: u32,
    },
    /// Hit the ship, which survived with this many extra lives.
    Ship {
        /// Extra lives left.
        lives_left: u32,
    },
    /// Hit the ship with no extra life left.
    GameOver,
}

impl Impact {
    /// Returns true if the projectile must be taken out of flight.
    #[must_use]
    pub const fn stops_projectile(self) -> bool {
        !matches!(self, Self::None)
    }
}

fn bunker_impact(objects: &GameObjects, bullet: &BulletState, heading: Heading) -> Option<Impact> {
    let rect = bullet.rect();
    objects.bunkers().iter().enumerate().find_map(|(bunker, b)| {
        let (row, column) = b.hit(&rect, heading)?;
        tracing::debug!(bunker, row, column, ?heading, "bunker cell destroyed");
        Some(Impact::Bunker { bunker, row, column })
    })
}

/// Checks the player bullet against the playfield, bunkers and aliens.
///
/// Struck aliens and cells are deactivated and points are scored; the
/// caller deactivates the bullet when the impact stops it.
pub fn resolve_player_bullet(objects: &GameObjects, bullet: &BulletState) -> Impact {
    if bullet.position.y + BULLET_HEIGHT < 0 {
        return Impact::OffScreen;
    }
    if let Some(impact) = bunker_impact(objects, bullet, Heading::Up) {
        return impact;
    }

    let aliens = objects.aliens();
    let Some((column, row)) = aliens.hit_test(&bullet.rect()) else {
        return Impact::None;
    };
    // Another projectile may have claimed it since the hit test
    let Some(tier) = aliens.deactivate(column, row) else {
        return Impact::None;
    };
    let points = tier.score();
    let score = objects.score().add(points);
    tracing::debug!(column, row, points, score, "alien destroyed");
    Impact::Alien { column, row, points }
}

/// Checks an alien bullet against the playfield, bunkers and the ship.
///
/// A ship hit costs a life, or ends the game when none is left.
pub fn resolve_alien_bullet(objects: &GameObjects, bullet: &BulletState) -> Impact {
    if bullet.position.y >= SCREEN_HEIGHT {
        return Impact::OffScreen;
    }
    if let Some(impact) = bunker_impact(objects, bullet, Heading::Down) {
        return impact;
    }
    if !objects.ship().snapshot().is_hit_by(&bullet.rect()) {
        return Impact::None;
    }

    match objects.ship().hit() {
        ShipHit::LifeLost(lives_left) => {
            objects.score().set_lives(lives_left);
            tracing::debug!(lives_left, "ship hit");
            Impact::Ship { lives_left }
        }
        ShipHit::Destroyed => {
            if objects.score().game_over() {
                tracing::info!(score = objects.score().snapshot().current, "game over: ship destroyed");
            }
            Impact::GameOver
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_core::constants::{PLAYER_LIVES, SHIP_Y_CO};
    use invaders_core::entities::alien::home_position;
    use invaders_core::{Coord, GameStatus};

    fn bullet(x: i32, y: i32) -> BulletState {
        BulletState { position: Coord::new(x, y), active: true }
    }

    #[test]
    fn test_player_bullet_destroys_alien_and_scores() {
        let objects = GameObjects::try_new().unwrap();
        let home = home_position(0, 0).to_pixel();
        let impact = resolve_player_bullet(&objects, &bullet(home.x + 10, home.y + 10));
        assert_eq!(impact, Impact::Alien { column: 0, row: 0, points: 30 });
        assert_eq!(objects.score().snapshot().current, 30);
        assert!(!objects.aliens().alien(0, 0).snapshot().active);

        // Same spot again: the alien is gone
        let again = resolve_player_bullet(&objects, &bullet(home.x + 10, home.y + 10));
        assert_eq!(again, Impact::None);
    }

    #[test]
    fn test_player_bullet_leaves_top() {
        let objects = GameObjects::try_new().unwrap();
        assert_eq!(resolve_player_bullet(&objects, &bullet(300, -6)), Impact::OffScreen);
        assert!(Impact::OffScreen.stops_projectile());
        assert!(!Impact::None.stops_projectile());
    }

    #[test]
    fn test_player_bullet_chips_bunker() {
        let objects = GameObjects::try_new().unwrap();
        let bounds = objects.bunkers()[0].bounds();
        let before = objects.bunkers()[0].active_cells();
        let impact = resolve_player_bullet(&objects, &bullet(bounds.x + 1, bounds.bottom() - 3));
        assert!(matches!(impact, Impact::Bunker { bunker: 0, .. }));
        assert_eq!(objects.bunkers()[0].active_cells(), before - 1);
    }

    #[test]
    fn test_alien_bullet_costs_lives_then_game() {
        let objects = GameObjects::try_new().unwrap();
        let x = objects.ship().snapshot().position.x;
        let shot = bullet(x, SHIP_Y_CO + 2);

        for expected in (0..PLAYER_LIVES).rev() {
            assert_eq!(resolve_alien_bullet(&objects, &shot), Impact::Ship { lives_left: expected });
        }
        assert_eq!(objects.score().snapshot().lives_left, 0);
        assert_eq!(resolve_alien_bullet(&objects, &shot), Impact::GameOver);
        assert_eq!(objects.score().snapshot().status, GameStatus::GameOver);
    }

    #[test]
    fn test_alien_bullet_misses_ship() {
        let objects = GameObjects::try_new().unwrap();
        assert_eq!(resolve_alien_bullet(&objects, &bullet(10, 200)), Impact::None);
        assert_eq!(resolve_alien_bullet(&objects, &bullet(10, SCREEN_HEIGHT)), Impact::OffScreen);
    }
}
