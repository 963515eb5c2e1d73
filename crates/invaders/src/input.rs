//! # Player Input
//!
//! Input arrives as messages on a bounded channel and is applied by the
//! input task, the only writer of the shared [`Controls`].
//!
//! ```text
//! InputHandle ──> bounded chan ──> InputTask ──> Controls ──> ship / bullet tasks
//!                                      └──────> TaskControl (pause, resume)
//! ```

use std::sync::atomic::{AtomicBool, AtomicI8, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use invaders_core::GameObjects;

use crate::scheduler::{PeriodicTask, TaskControl};

/// Horizontal move intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards x = 0.
    Left,
    /// Towards the right edge.
    Right,
    /// Hold position.
    Stop,
}

impl MoveDirection {
    /// -1, 0 or 1.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
            Self::Stop => 0,
        }
    }

    const fn encode(self) -> i8 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
            Self::Stop => 0,
        }
    }

    const fn decode(raw: i8) -> Self {
        match raw {
            -1 => Self::Left,
            1 => Self::Right,
            _ => Self::Stop,
        }
    }
}

/// Player request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    /// Change the move intent.
    Move(MoveDirection),
    /// Fire once.
    Fire,
    /// Suspend gameplay.
    Pause,
    /// Resume gameplay.
    Resume,
    /// Start a new game.
    Restart,
}

/// Intents read by the gameplay tasks.
#[derive(Debug, Default)]
pub struct Controls {
    direction: AtomicI8,
    fire: AtomicBool,
}

impl Controls {
    /// Current move intent.
    #[must_use]
    pub fn direction(&self) -> MoveDirection {
        MoveDirection::decode(self.direction.load(Ordering::Acquire))
    }

    /// Sets the move intent.
    pub fn set_direction(&self, direction: MoveDirection) {
        self.direction.store(direction.encode(), Ordering::Release);
    }

    /// Latches a fire request.
    pub fn press_fire(&self) {
        self.fire.store(true, Ordering::Release);
    }

    /// Consumes a pending fire request.
    pub fn take_fire(&self) -> bool {
        self.fire.swap(false, Ordering::AcqRel)
    }
}

/// Cloneable sender of player requests.
#[derive(Debug, Clone)]
pub struct InputHandle {
    sender: Sender<InputCommand>,
    control: TaskControl,
}

impl InputHandle {
    /// Sends a command without blocking.
    ///
    /// Returns false if the command was dropped.
    #[inline]
    pub fn send(&self, command: InputCommand) -> bool {
        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                tracing::warn!(?command, "input queue full, command dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Sets the move intent.
    pub fn request_move(&self, direction: MoveDirection) -> bool {
        self.send(InputCommand::Move(direction))
    }

    /// Fires the player bullet if it is not already in flight.
    pub fn request_fire(&self) -> bool {
        self.send(InputCommand::Fire)
    }

    /// Pauses gameplay.
    pub fn pause(&self) -> bool {
        self.send(InputCommand::Pause)
    }

    /// Resumes gameplay.
    pub fn resume(&self) -> bool {
        self.send(InputCommand::Resume)
    }

    /// Starts a new game, keeping the high score.
    pub fn restart(&self) -> bool {
        self.send(InputCommand::Restart)
    }

    /// Stops every task.
    ///
    /// Bypasses the queue so it cannot be dropped.
    pub fn quit(&self) {
        self.control.shutdown().trigger();
    }
}

/// Applies queued commands. Keeps running while paused.
pub struct InputTask {
    receiver: Receiver<InputCommand>,
    controls: Arc<Controls>,
    control: TaskControl,
    objects: Arc<GameObjects>,
}

impl InputTask {
    /// Commands applied per tick at most, leaving the rest for later.
    const BATCH: usize = 32;

    /// Applies one command.
    pub fn apply(&self, command: InputCommand) {
        match command {
            InputCommand::Move(direction) => self.controls.set_direction(direction),
            InputCommand::Fire => self.controls.press_fire(),
            InputCommand::Pause => self.control.pause(),
            InputCommand::Resume => self.control.resume(),
            InputCommand::Restart => {
                self.controls.set_direction(MoveDirection::Stop);
                self.controls.take_fire();
                self.objects.restart();
            }
        }
    }
}

impl PeriodicTask for InputTask {
    fn tick(&mut self) {
        for command in self.receiver.try_iter().take(Self::BATCH) {
            self.apply(command);
        }
    }

    fn pausable(&self) -> bool {
        false
    }
}

/// Creates the input channel.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[must_use]
pub fn input_channel(
    capacity: usize,
    controls: Arc<Controls>,
    control: TaskControl,
    objects: Arc<GameObjects>,
) -> (InputHandle, InputTask) {
    assert!(capacity > 0, "input queue capacity must be non-zero");
    let (sender, receiver) = bounded(capacity);
    let handle = InputHandle { sender, control: control.clone() };
    (handle, InputTask { receiver, controls, control, objects })
}
