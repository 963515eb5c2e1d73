//! # Render Queue
//!
//! Many submitters, one presenter.
//!
//! ```text
//! ┌─────────────┐
//! │ Screen task │──┐
//! └─────────────┘  │   ┌──────────────┐   ┌───────────┐   ┌─────────┐
//! ┌─────────────┐  ├──>│ bounded chan │──>│ Presenter │──>│ Backend │
//! │  Any task   │──┘   └──────────────┘   └───────────┘   └─────────┘
//! └─────────────┘       drop on full       bound thread
//! ```
//!
//! Submitting never blocks: a full queue drops the command and counts it.
//! Only the thread that bound the presenter may drain the queue into a
//! backend and present.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use crate::backend::DrawBackend;
use crate::command::DrawCommand;
use crate::error::{RenderError, RenderResult};
use crate::stats::{FlushReport, QueueStats};

#[derive(Debug, Default)]
struct QueueCounters {
    submitted: AtomicU64,
    dropped: AtomicU64,
    drawn: AtomicU64,
    backend_failures: AtomicU64,
}

/// Owner of the draw-command queue.
#[derive(Debug)]
pub struct RenderQueue {
    sender: Sender<DrawCommand>,
    receiver: Receiver<DrawCommand>,
    presenter: Mutex<Option<ThreadId>>,
    counters: Arc<QueueCounters>,
    capacity: usize,
}

impl RenderQueue {
    /// Creates a queue holding at most `capacity` commands.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "render queue capacity must be non-zero");
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            presenter: Mutex::new(None),
            counters: Arc::new(QueueCounters::default()),
            capacity,
        }
    }

    /// Maximum number of pending commands.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a submitter handle (clone freely across threads).
    #[must_use]
    pub fn submitter(&self) -> DrawSubmitter {
        DrawSubmitter {
            sender: self.sender.clone(),
            counters: Arc::clone(&self.counters),
            capacity: self.capacity,
        }
    }

    /// Makes the calling thread the only thread allowed to present.
    ///
    /// # Errors
    ///
    /// Returns `PresenterAlreadyBound` if a presenter was bound before.
    pub fn bind_presenter(&self) -> RenderResult<Presenter> {
        let mut presenter = self.presenter.lock();
        if presenter.is_some() {
            return Err(RenderError::PresenterAlreadyBound);
        }
        let thread = thread::current().id();
        *presenter = Some(thread);
        tracing::info!(thread = ?thread, "presenter bound");

        Ok(Presenter {
            receiver: self.receiver.clone(),
            thread,
            counters: Arc::clone(&self.counters),
        })
    }

    /// Thread bound as presenter, if any.
    #[must_use]
    pub fn presenter_thread(&self) -> Option<ThreadId> {
        *self.presenter.lock()
    }

    /// Commands waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            drawn: self.counters.drawn.load(Ordering::Relaxed),
            backend_failures: self.counters.backend_failures.load(Ordering::Relaxed),
            pending: self.receiver.len(),
        }
    }
}

/// Handle for submitting draw commands from any thread.
#[derive(Debug, Clone)]
pub struct DrawSubmitter {
    sender: Sender<DrawCommand>,
    counters: Arc<QueueCounters>,
    capacity: usize,
}

impl DrawSubmitter {
    /// Enqueues a command without blocking.
    ///
    /// # Errors
    ///
    /// Returns `DrawSubmissionFailure` if the queue is full (the command is
    /// dropped and counted) and `QueueClosed` if the queue is gone.
    #[inline]
    pub fn submit(&self, command: DrawCommand) -> RenderResult<()> {
        match self.sender.try_send(command) {
            Ok(()) => {
                self.counters.submitted.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                let dropped = self.counters.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    dropped,
                    capacity = self.capacity,
                    "render queue full, command dropped"
                );
                Err(RenderError::DrawSubmissionFailure { capacity: self.capacity })
            }
            Err(TrySendError::Disconnected(_)) => Err(RenderError::QueueClosed),
        }
    }

    /// Number of commands dropped so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer side of the queue, tied to the thread that bound it.
///
/// The token can be moved, but only the bound thread can flush with it.
#[derive(Debug)]
pub struct Presenter {
    receiver: Receiver<DrawCommand>,
    thread: ThreadId,
    counters: Arc<QueueCounters>,
}

impl Presenter {
    /// Thread this presenter is bound to.
    #[inline]
    #[must_use]
    pub const fn thread(&self) -> ThreadId {
        self.thread
    }

    /// Drains every pending command into `backend`, then presents.
    ///
    /// Commands submitted while the flush runs wait for the next one.
    /// Backend failures are counted and absorbed.
    ///
    /// # Errors
    ///
    /// Returns `PresenterViolation` when called off the bound thread.
    pub fn flush<B: DrawBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> RenderResult<FlushReport> {
        if thread::current().id() != self.thread {
            tracing::error!(bound = ?self.thread, "flush attempted off the presenter thread");
            return Err(RenderError::PresenterViolation);
        }

        let mut report = FlushReport::default();
        let pending = self.receiver.len();
        for command in self.receiver.try_iter().take(pending) {
            match backend.draw(&command) {
                Ok(()) => report.drawn += 1,
                Err(error) => {
                    report.failed += 1;
                    tracing::debug!(%error, "draw command failed");
                }
            }
        }

        report.presented = match backend.present() {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "present failed");
                false
            }
        };

        let failures = report.failed as u64 + u64::from(!report.presented);
        self.counters.drawn.fetch_add(report.drawn as u64, Ordering::Relaxed);
        self.counters.backend_failures.fetch_add(failures, Ordering::Relaxed);
        Ok(report)
    }
}
