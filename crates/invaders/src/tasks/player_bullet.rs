//! Player bullet flight and firing.

use std::sync::Arc;

use invaders_core::{GameObjects, Heading};

use crate::collision::{resolve_player_bullet, Impact};
use crate::input::Controls;
use crate::scheduler::PeriodicTask;

/// Moves the player bullet up and launches it on request.
pub struct PlayerBulletTask {
    objects: Arc<GameObjects>,
    controls: Arc<Controls>,
    speed: i32,
}

impl PlayerBulletTask {
    /// Creates the task moving `speed` pixels per tick.
    #[must_use]
    pub fn new(objects: Arc<GameObjects>, controls: Arc<Controls>, speed: i32) -> Self {
        Self { objects, controls, speed }
    }

    /// Advances the bullet one step and resolves what it hit.
    pub fn advance(&self) -> Impact {
        let bullet = self.objects.player_bullet();
        let Some(state) = bullet.advance(Heading::Up, self.speed) else {
            return Impact::None;
        };
        let impact = resolve_player_bullet(&self.objects, &state);
        if impact.stops_projectile() {
            bullet.deactivate();
        }
        impact
    }
}

impl PeriodicTask for PlayerBulletTask {
    fn tick(&mut self) {
        let _round = self.objects.hold_round();
        if !self.objects.score().is_playing() {
            return;
        }
        self.advance();
        // A request made while the bullet is in flight is discarded
        if self.controls.take_fire() {
            self.objects.fire_player_bullet();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_core::constants::{BULLET_SPEED, GUN_HEIGHT, SHIP_Y_CO};

    fn task() -> (PlayerBulletTask, Arc<GameObjects>, Arc<Controls>) {
        let objects = Arc::new(GameObjects::try_new().unwrap());
        let controls = Arc::new(Controls::default());
        let task = PlayerBulletTask::new(Arc::clone(&objects), Arc::clone(&controls), BULLET_SPEED);
        (task, objects, controls)
    }

    #[test]
    fn test_fires_from_gun_then_climbs() {
        let (mut task, objects, controls) = task();
        // Between two bunkers and under an alien column, out of reach
        objects.ship().set_x(250);
        controls.press_fire();
        task.tick();

        let state = objects.player_bullet().snapshot();
        assert!(state.active);
        assert_eq!((state.position.x, state.position.y), (250, SHIP_Y_CO - GUN_HEIGHT));

        for _ in 0..10 {
            task.tick();
        }
        let state = objects.player_bullet().snapshot();
        assert_eq!(state.position.y, SHIP_Y_CO - GUN_HEIGHT - 10 * BULLET_SPEED);
    }

    #[test]
    fn test_single_bullet_in_flight() {
        let (mut task, objects, controls) = task();
        controls.press_fire();
        task.tick();
        let first = objects.player_bullet().snapshot();

        controls.press_fire();
        task.tick();
        let second = objects.player_bullet().snapshot();
        assert_eq!(second.position.x, first.position.x);
        assert_eq!(second.position.y, first.position.y - BULLET_SPEED);
        assert!(!controls.take_fire());
    }

    #[test]
    fn test_leaves_top_of_screen() {
        let (mut task, objects, controls) = task();
        // Left of every bunker and alien column
        objects.ship().set_x(0);
        controls.press_fire();
        task.tick();

        let mut last = Impact::None;
        for _ in 0..100 {
            last = task.advance();
            if last.stops_projectile() {
                break;
            }
        }
        assert_eq!(last, Impact::OffScreen);
        assert!(!objects.player_bullet().is_active());
    }
}
