//! Alien fire.

use std::sync::Arc;

use invaders_core::{GameObjects, Heading};
use rand::Rng;

use crate::collision::{resolve_alien_bullet, Impact};
use crate::scheduler::PeriodicTask;

/// Moves the alien bullet pool and lets the formation shoot.
///
/// Each tick every column with a living alien fires with probability
/// `1 / shoot_chance`, from the bottom of its lowest alien, while the pool
/// has a free slot.
pub struct AlienBulletTask<R> {
    objects: Arc<GameObjects>,
    rng: R,
    shoot_chance: u32,
    speed: i32,
}

impl<R: Rng + Send + 'static> AlienBulletTask<R> {
    /// Creates the task.
    ///
    /// # Panics
    ///
    /// Panics if `shoot_chance` is zero.
    #[must_use]
    pub fn new(objects: Arc<GameObjects>, rng: R, shoot_chance: u32, speed: i32) -> Self {
        assert!(shoot_chance > 0, "shoot chance must be non-zero");
        Self { objects, rng, shoot_chance, speed }
    }

    /// Moves every bullet in flight. Returns the impacts that stopped one.
    pub fn advance(&self) -> Vec<Impact> {
        let mut impacts = Vec::new();
        for bullet in self.objects.alien_bullets().bullets() {
            let Some(state) = bullet.advance(Heading::Down, self.speed) else {
                continue;
            };
            let impact = resolve_alien_bullet(&self.objects, &state);
            if impact.stops_projectile() {
                bullet.deactivate();
                impacts.push(impact);
            }
        }
        impacts
    }

    /// Rolls the dice for every living column. Returns the shots fired.
    pub fn shoot(&mut self) -> usize {
        let aliens = self.objects.aliens();
        let pool = self.objects.alien_bullets();
        let mut fired = 0;
        for column in 0..aliens.column_count() {
            if !aliens.column(column).is_active() || self.rng.gen_range(0..self.shoot_chance) != 0 {
                continue;
            }
            let Some(muzzle) = aliens.muzzle(column) else {
                continue;
            };
            if pool.try_spawn(muzzle).is_none() {
                break;
            }
            fired += 1;
        }
        fired
    }
}

impl<R: Rng + Send + 'static> PeriodicTask for AlienBulletTask<R> {
    fn tick(&mut self) {
        let objects = Arc::clone(&self.objects);
        let _round = objects.hold_round();
        if !self.objects.score().is_playing() {
            return;
        }
        self.advance();
        self.shoot();
    }
}
