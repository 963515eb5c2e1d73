//! # Bullets
//!
//! Player and alien projectiles, plus the fixed alien bullet pool.

use parking_lot::Mutex;

use crate::constants::{BULLET_HEIGHT, BULLET_WIDTH};
use crate::error::GameResult;
use crate::geometry::{Coord, Rect};
use crate::memory::try_fixed_slice;

/// Direction a projectile travels in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    /// Towards the top of the screen (player bullets).
    Up,
    /// Towards the bottom of the screen (alien bullets).
    Down,
}

impl Heading {
    /// Vertical sign of the heading.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// Plain-data view of a bullet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulletState {
    /// Nose of the bullet: horizontal centre, top edge.
    pub position: Coord,
    /// Whether the bullet is in flight.
    pub active: bool,
}

impl BulletState {
    /// Bounding box of the bullet.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(
            self.position.x - BULLET_WIDTH / 2,
            self.position.y,
            BULLET_WIDTH,
            BULLET_HEIGHT,
        )
    }
}

/// A single projectile guarded by its own lock.
///
/// Allocated once and recycled through its active flag.
#[derive(Debug, Default)]
pub struct Bullet {
    state: Mutex<BulletState>,
}

impl Bullet {
    /// Creates an inactive bullet at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the current state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> BulletState {
        *self.state.lock()
    }

    /// Returns whether the bullet is in flight.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Launches the bullet from `at` if it is not already in flight.
    ///
    /// Returns true if the bullet was launched.
    pub fn fire(&self, at: Coord) -> bool {
        let mut state = self.state.lock();
        if state.active {
            return false;
        }
        state.position = at;
        state.active = true;
        true
    }

    /// Moves an active bullet `speed` pixels along `heading`.
    ///
    /// Returns the new state, or `None` if the bullet is inactive.
    pub fn advance(&self, heading: Heading, speed: i32) -> Option<BulletState> {
        let mut state = self.state.lock();
        if !state.active {
            return None;
        }
        state.position.y += heading.sign() * speed;
        Some(*state)
    }

    /// Takes the bullet out of flight.
    ///
    /// Returns true if it was active.
    pub fn deactivate(&self) -> bool {
        std::mem::replace(&mut self.state.lock().active, false)
    }
}

/// Fixed pool of alien bullets.
///
/// The pool size is the cap on concurrently active alien bullets:
/// a spawn only succeeds by claiming an inactive slot.
#[derive(Debug)]
pub struct AlienBulletPool {
    bullets: Box<[Bullet]>,
}

impl AlienBulletPool {
    /// Reserves `capacity` inactive bullets.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if the pool cannot be reserved.
    pub fn try_new(capacity: usize) -> GameResult<Self> {
        Ok(Self {
            bullets: try_fixed_slice("alien bullets", capacity, |_| Bullet::new())?,
        })
    }

    /// Pool size.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bullets.len()
    }

    /// Bullets in slot order.
    #[inline]
    #[must_use]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// Claims the first free slot and fires it from `at`.
    ///
    /// Returns the slot index, or `None` when every slot is in flight.
    pub fn try_spawn(&self, at: Coord) -> Option<usize> {
        self.bullets.iter().position(|bullet| bullet.fire(at))
    }

    /// Number of bullets currently in flight.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.bullets.iter().filter(|b| b.is_active()).count()
    }

    /// Takes every bullet out of flight.
    pub fn deactivate_all(&self) {
        for bullet in self.bullets.iter() {
            bullet.deactivate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bullet_is_inactive_at_origin() {
        let bullet = Bullet::new();
        assert_eq!(bullet.snapshot(), BulletState::default());
        assert!(bullet.advance(Heading::Up, 7).is_none());
    }

    #[test]
    fn test_fire_only_when_inactive() {
        let bullet = Bullet::new();
        assert!(bullet.fire(Coord::new(100, 200)));
        assert!(!bullet.fire(Coord::new(5, 5)));
        assert_eq!(bullet.snapshot().position, Coord::new(100, 200));

        assert!(bullet.deactivate());
        assert!(!bullet.deactivate());
        assert!(bullet.fire(Coord::new(5, 5)));
    }

    #[test]
    fn test_player_bullet_travel() {
        let bullet = Bullet::new();
        bullet.fire(Coord::new(295, 470));
        for _ in 0..10 {
            bullet.advance(Heading::Up, 7);
        }
        assert_eq!(bullet.snapshot().position, Coord::new(295, 400));
    }

    #[test]
    fn test_pool_caps_spawns() {
        let pool = AlienBulletPool::try_new(3).unwrap();
        assert_eq!(pool.try_spawn(Coord::new(1, 1)), Some(0));
        assert_eq!(pool.try_spawn(Coord::new(2, 2)), Some(1));
        assert_eq!(pool.try_spawn(Coord::new(3, 3)), Some(2));
        assert_eq!(pool.try_spawn(Coord::new(4, 4)), None);
        assert_eq!(pool.active_count(), 3);

        pool.bullets()[1].deactivate();
        assert_eq!(pool.try_spawn(Coord::new(9, 9)), Some(1));

        pool.deactivate_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.capacity(), 3);
    }

    #[test]
    fn test_rect_centered_on_nose() {
        let state = BulletState { position: Coord::new(10, 20), active: true };
        assert_eq!(state.rect(), Rect::new(9, 20, 2, 5));
    }
}
