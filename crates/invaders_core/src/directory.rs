//! # Game Object Directory
//!
//! The aggregate that owns every entity of one game.
//!
//! `GameObjects` is built once at startup, wrapped in an `Arc` and handed to
//! every task. Tasks reach entities through accessors and mutate them only
//! through the entities' own locked operations.
//!
//! ## Rounds
//!
//! Level changes touch every entity, so they must not interleave with a
//! gameplay tick. Ticks take a shared [`RoundGuard`]; `start_level`,
//! `advance_level` and `restart` take the round exclusively.
//!
//! ```text
//! ship ──────┐
//! bullets ───┼── hold_round() (shared) ──┐
//! formation ─┘                           ├── RwLock<DirectoryState>
//! input: restart() (exclusive) ──────────┘
//! ```

use parking_lot::{RwLock, RwLockReadGuard};

use crate::constants::{
    ALIENS_PER_COLUMN, ALIENS_PER_ROW, MAX_ACTIVE_ALIEN_BULLETS, NUMBER_OF_BUNKERS,
};
use crate::entities::bunker::bunker_origin;
use crate::entities::{
    AlienBulletPool, AlienMatrix, Bullet, BulletState, Bunker, BunkerCells, MatrixSnapshot, Score,
    ScoreState, ShipState, Spaceship,
};
use crate::error::GameResult;
use crate::memory::try_fixed_slice;

/// Sizes of the fixed entity arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Alien columns.
    pub alien_columns: usize,
    /// Aliens per column.
    pub alien_rows: usize,
    /// Number of bunkers.
    pub bunkers: usize,
    /// Size of the alien bullet pool.
    pub alien_bullets: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            alien_columns: ALIENS_PER_ROW,
            alien_rows: ALIENS_PER_COLUMN,
            bunkers: NUMBER_OF_BUNKERS,
            alien_bullets: MAX_ACTIVE_ALIEN_BULLETS,
        }
    }
}

/// Directory-level state, separate from any entity.
#[derive(Debug, Default)]
struct DirectoryState {
    /// Bumped every time a level starts.
    round: u64,
}

/// Shared hold on the current round.
///
/// While any guard lives, no level change can start; a pending level change
/// blocks new guards until it is done.
#[must_use = "the round is only held while the guard lives"]
pub struct RoundGuard<'a> {
    directory: RwLockReadGuard<'a, DirectoryState>,
}

impl RoundGuard<'_> {
    /// Round generation being held.
    #[must_use]
    pub fn round(&self) -> u64 {
        self.directory.round
    }
}

/// Plain-data copy of the whole game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    /// Round generation the copy was taken in.
    pub round: u64,
    /// The ship.
    pub ship: ShipState,
    /// The player bullet.
    pub player_bullet: BulletState,
    /// Alien bullet pool, slot order.
    pub alien_bullets: Vec<BulletState>,
    /// The alien formation.
    pub aliens: MatrixSnapshot,
    /// Bunker cells, bunker order.
    pub bunkers: Vec<BunkerCells>,
    /// Score board.
    pub score: ScoreState,
}

/// Owner of every game entity.
#[derive(Debug)]
pub struct GameObjects {
    ship: Spaceship,
    player_bullet: Bullet,
    alien_bullets: AlienBulletPool,
    aliens: AlienMatrix,
    bunkers: Box<[Bunker]>,
    score: Score,
    directory: RwLock<DirectoryState>,
}

impl GameObjects {
    /// Builds the standard game layout.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if a fixed array cannot be reserved.
    pub fn try_new() -> GameResult<Self> {
        Self::try_with_layout(Layout::default())
    }

    /// Builds a game with custom array sizes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLayout` for an empty alien formation and
    /// `AllocationFailure` if a fixed array cannot be reserved.
    pub fn try_with_layout(layout: Layout) -> GameResult<Self> {
        let aliens = AlienMatrix::try_new(layout.alien_columns, layout.alien_rows)?;
        let alien_bullets = AlienBulletPool::try_new(layout.alien_bullets)?;
        let bunkers = try_fixed_slice("bunkers", layout.bunkers, |i| {
            Bunker::new(bunker_origin(i, layout.bunkers))
        })?;

        tracing::debug!(
            columns = layout.alien_columns,
            rows = layout.alien_rows,
            bunkers = layout.bunkers,
            "game objects created"
        );

        Ok(Self {
            ship: Spaceship::new(),
            player_bullet: Bullet::new(),
            alien_bullets,
            aliens,
            bunkers,
            score: Score::new(),
            directory: RwLock::new(DirectoryState::default()),
        })
    }

    /// The player's ship.
    #[inline]
    #[must_use]
    pub const fn ship(&self) -> &Spaceship {
        &self.ship
    }

    /// The player's bullet.
    #[inline]
    #[must_use]
    pub const fn player_bullet(&self) -> &Bullet {
        &self.player_bullet
    }

    /// The alien bullet pool.
    #[inline]
    #[must_use]
    pub const fn alien_bullets(&self) -> &AlienBulletPool {
        &self.alien_bullets
    }

    /// The alien formation.
    #[inline]
    #[must_use]
    pub const fn aliens(&self) -> &AlienMatrix {
        &self.aliens
    }

    /// The bunkers, left to right.
    #[inline]
    #[must_use]
    pub fn bunkers(&self) -> &[Bunker] {
        &self.bunkers
    }

    /// The score board.
    #[inline]
    #[must_use]
    pub const fn score(&self) -> &Score {
        &self.score
    }

    /// Current round generation.
    #[must_use]
    pub fn round(&self) -> u64 {
        self.directory.read_recursive().round
    }

    /// Holds the current round for one gameplay tick.
    ///
    /// Must not be held across a call to `start_level`, `advance_level` or
    /// `restart` on the same thread.
    pub fn hold_round(&self) -> RoundGuard<'_> {
        RoundGuard { directory: self.directory.read() }
    }

    /// Fires the player bullet from the ship's gun if it is not in flight.
    pub fn fire_player_bullet(&self) -> bool {
        let tip = self.ship.snapshot().gun_tip();
        self.player_bullet.fire(tip)
    }

    /// Starts `level`: revives the formation and clears every bullet.
    ///
    /// Bunkers, ship and score carry over. Waits for every [`RoundGuard`].
    pub fn start_level(&self, level: u32) {
        let mut directory = self.directory.write();
        self.reset_level(&mut directory, level);
    }

    /// Starts the next level if the formation is cleared.
    ///
    /// The check and the level change happen under one exclusive hold, so a
    /// concurrent restart cannot slip in between. Returns the new level.
    pub fn advance_level(&self) -> Option<u32> {
        let mut directory = self.directory.write();
        if !self.aliens.is_cleared() {
            return None;
        }
        let level = self.score.next_level();
        self.reset_level(&mut directory, level);
        Some(level)
    }

    /// Starts a new game from level one, keeping only the high score.
    ///
    /// Waits for every [`RoundGuard`].
    pub fn restart(&self) {
        let mut directory = self.directory.write();
        self.ship.reset();
        for bunker in self.bunkers.iter() {
            bunker.reset();
        }
        self.score.reset();
        self.reset_level(&mut directory, 1);
    }

    fn reset_level(&self, directory: &mut DirectoryState, level: u32) {
        self.aliens.reset(level);
        self.player_bullet.deactivate();
        self.alien_bullets.deactivate_all();
        directory.round += 1;
        tracing::info!(level, round = directory.round, "level started");
    }

    /// Copies every entity, one lock at a time.
    ///
    /// Entities are copied one after another, so the result is consistent
    /// per entity but not across entities.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            round: self.round(),
            ship: self.ship.snapshot(),
            player_bullet: self.player_bullet.snapshot(),
            alien_bullets: self.alien_bullets.bullets().iter().map(Bullet::snapshot).collect(),
            aliens: self.aliens.snapshot(),
            bunkers: self.bunkers.iter().map(Bunker::snapshot).collect(),
            score: self.score.snapshot(),
        }
    }
}
