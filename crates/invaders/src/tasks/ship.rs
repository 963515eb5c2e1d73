//! Ship movement.

use std::sync::Arc;

use invaders_core::GameObjects;

use crate::input::Controls;
use crate::scheduler::PeriodicTask;

/// Moves the ship along the current move intent.
pub struct ShipTask {
    objects: Arc<GameObjects>,
    controls: Arc<Controls>,
    speed: i32,
}

impl ShipTask {
    /// Creates the task moving `speed` pixels per tick.
    #[must_use]
    pub fn new(objects: Arc<GameObjects>, controls: Arc<Controls>, speed: i32) -> Self {
        Self { objects, controls, speed }
    }
}

impl PeriodicTask for ShipTask {
    fn tick(&mut self) {
        let _round = self.objects.hold_round();
        if !self.objects.score().is_playing() {
            return;
        }
        let dx = self.controls.direction().sign() * self.speed;
        if dx != 0 {
            self.objects.ship().shift(dx);
        }
    }
}
