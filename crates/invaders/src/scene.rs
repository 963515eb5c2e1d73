//! # Scene
//!
//! Turns a [`GameSnapshot`] into draw commands, back to front:
//! ship, bullets, aliens, bunkers, then the score board.

use std::sync::Arc;

use invaders_core::constants::{PADDING, SCREEN_HEIGHT, SCREEN_WIDTH};
use invaders_core::{Coord, GameObjects, GameSnapshot, GameStatus, Rect};
use invaders_rendering::command::{TEXT_GLYPH_WIDTH, TEXT_HEIGHT};
use invaders_rendering::{Color, DrawCommand, DrawSubmitter, FrameSource};

use crate::scheduler::TaskControl;

/// Builds the draw list for one frame.
///
/// Inactive entities are skipped.
#[must_use]
pub fn scene_commands(snapshot: &GameSnapshot, paused: bool) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(128);

    let ship = &snapshot.ship;
    commands.push(DrawCommand::filled_box(ship.body(), Color::GREEN));
    commands.push(DrawCommand::filled_box(ship.gun(), Color::GREEN));

    if snapshot.player_bullet.active {
        commands.push(DrawCommand::filled_box(snapshot.player_bullet.rect(), Color::WHITE));
    }
    commands.extend(
        snapshot
            .alien_bullets
            .iter()
            .filter(|bullet| bullet.active)
            .map(|bullet| DrawCommand::filled_box(bullet.rect(), Color::RED)),
    );

    commands.extend(
        snapshot
            .aliens
            .aliens
            .iter()
            .filter(|alien| alien.state.active)
            .map(|alien| DrawCommand::image(alien.state.rect(), alien.tier.image())),
    );

    commands.extend(
        snapshot
            .bunkers
            .iter()
            .flatten()
            .flatten()
            .filter(|cell| cell.active)
            .map(|cell| DrawCommand::filled_box(cell.rect(), Color::GREEN)),
    );

    let score = &snapshot.score;
    let top = PADDING;
    commands.push(DrawCommand::text(
        Coord::new(PADDING, top),
        format!("Score {}", score.current),
        Color::WHITE,
    ));
    commands.push(DrawCommand::text(
        Coord::new(SCREEN_WIDTH / 2 - 6 * TEXT_GLYPH_WIDTH, top),
        format!("High {}", score.high),
        Color::YELLOW,
    ));
    commands.push(DrawCommand::text(
        Coord::new(SCREEN_WIDTH - 20 * TEXT_GLYPH_WIDTH, top),
        format!("Level {}  Lives {}", score.level, score.lives_left),
        Color::AQUA,
    ));

    let banner = match (score.status, paused) {
        (GameStatus::GameOver, _) => Some(("GAME OVER", Color::RED)),
        (GameStatus::Playing, true) => Some(("PAUSED", Color::FUCHSIA)),
        (GameStatus::Playing, false) => None,
    };
    if let Some((text, color)) = banner {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let width = text.len() as i32 * TEXT_GLYPH_WIDTH;
        let at = Coord::new((SCREEN_WIDTH - width) / 2, (SCREEN_HEIGHT - TEXT_HEIGHT) / 2);
        commands.push(DrawCommand::outline(
            Rect::new(at.x - PADDING, at.y - PADDING, width + 2 * PADDING, TEXT_HEIGHT + 2 * PADDING),
            color,
        ));
        commands.push(DrawCommand::text(at, text, color));
    }

    commands
}

/// The game as seen by the frame orchestrator.
pub struct Scene {
    objects: Arc<GameObjects>,
    control: TaskControl,
}

impl Scene {
    /// Creates a scene over `objects`.
    #[must_use]
    pub fn new(objects: Arc<GameObjects>, control: TaskControl) -> Self {
        Self { objects, control }
    }
}

impl FrameSource for Scene {
    fn submit_frame(&mut self, frame: u64, submitter: &DrawSubmitter) {
        let snapshot = self.objects.snapshot();
        for command in scene_commands(&snapshot, self.control.is_paused()) {
            if let Err(error) = submitter.submit(command) {
                // The rest of this frame would be dropped too
                tracing::trace!(frame, %error, "scene submission stopped");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_core::ShutdownSignal;
    use invaders_rendering::{RenderQueue, Shape};

    fn texts(commands: &[DrawCommand]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|command| match &command.shape {
                Shape::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_scene() {
        let objects = GameObjects::try_new().unwrap();
        let commands = scene_commands(&objects.snapshot(), false);

        let images = commands.iter().filter(|c| matches!(c.shape, Shape::Image { .. })).count();
        assert_eq!(images, 40);
        // No bullet is in flight
        assert!(!commands.iter().any(|c| c.color == Color::WHITE && matches!(c.shape, Shape::FilledBox(_))));
        assert_eq!(texts(&commands), ["Score 0", "High 0", "Level 1  Lives 2"]);
    }

    #[test]
    fn test_inactive_entities_not_drawn() {
        let objects = GameObjects::try_new().unwrap();
        objects.aliens().deactivate(0, 0);
        objects.fire_player_bullet();
        let commands = scene_commands(&objects.snapshot(), false);

        let images = commands.iter().filter(|c| matches!(c.shape, Shape::Image { .. })).count();
        assert_eq!(images, 39);
        let bullet = objects.player_bullet().snapshot().rect();
        assert!(commands.contains(&DrawCommand::filled_box(bullet, Color::WHITE)));

        objects.player_bullet().deactivate();
        let commands = scene_commands(&objects.snapshot(), false);
        assert!(!commands.contains(&DrawCommand::filled_box(bullet, Color::WHITE)));
    }

    #[test]
    fn test_banners() {
        let objects = GameObjects::try_new().unwrap();
        assert!(texts(&scene_commands(&objects.snapshot(), true)).contains(&"PAUSED".to_owned()));
        objects.score().game_over();
        let over = texts(&scene_commands(&objects.snapshot(), true));
        assert!(over.contains(&"GAME OVER".to_owned()));
        assert!(!over.contains(&"PAUSED".to_owned()));
    }

    #[test]
    fn test_small_queue_truncates_frame() {
        let objects = Arc::new(GameObjects::try_new().unwrap());
        let mut scene = Scene::new(objects, TaskControl::new(ShutdownSignal::new()));
        let queue = RenderQueue::new(8);
        scene.submit_frame(0, &queue.submitter());
        assert_eq!(queue.pending(), 8);
        assert_eq!(queue.stats().dropped, 1);
    }
}
