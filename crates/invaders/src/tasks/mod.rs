//! # Gameplay Tasks
//!
//! One [`PeriodicTask`](crate::scheduler::PeriodicTask) per moving thing.
//! Each task is the only writer of its entity's motion; collisions caused
//! by a projectile are resolved by the task that moved it.
//!
//! | Task            | Moves                   | Resolves                 |
//! |-----------------|-------------------------|--------------------------|
//! | `ship`          | spaceship               |                          |
//! | `player_bullet` | player bullet           | aliens, bunker cells     |
//! | `alien_matrix`  | formation, level change | invasion reaching bunkers|
//! | `alien_bullets` | alien bullet pool       | ship, bunker cells       |
//!
//! Every tick runs under [`GameObjects::hold_round`](invaders_core::GameObjects::hold_round),
//! so a restart or level change never lands halfway through one.

pub mod alien_bullets;
pub mod alien_matrix;
pub mod player_bullet;
pub mod ship;

pub use alien_bullets::AlienBulletTask;
pub use alien_matrix::{AlienMatrixTask, FormationTick};
pub use player_bullet::PlayerBulletTask;
pub use ship::ShipTask;
