//! # Run gate: per-run cancellation handle.
//!
//! Every start of an [`Action`](crate::Action) creates a fresh [`RunGate`].
//! The gate is the only path through which a run may reach the action's sinks,
//! and closing it is how a run is cancelled.
//!
//! ## Rules
//! - A gate starts **open** and closes **exactly once** (revoke, terminal event or sink panic).
//! - Sink dispatch checks the open flag and runs the sink **while holding** the gate lock.
//!   [`RunGate::revoke`] never takes the lock; [`RunGate::barrier`] waits for a dispatch in
//!   progress. Revoke followed by barrier guarantees no sink of the run is running or will begin.
//! - The lock is reentrant: a sink may stop its own action from inside the callback.
//! - Closing also cancels the run's [`CancellationToken`], which drops the producer future.
//! - A panicking sink closes the gate, is recorded, and keeps unwinding.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use tokio_util::sync::CancellationToken;

pub(crate) struct RunGate {
    open: AtomicBool,
    sink_panicked: AtomicBool,
    dispatch: ReentrantMutex<()>,
    token: CancellationToken,
}

impl RunGate {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            open: AtomicBool::new(true),
            sink_panicked: AtomicBool::new(false),
            dispatch: ReentrantMutex::new(()),
            token: CancellationToken::new(),
        })
    }

    /// Token observed by the producer and by the driver task.
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        !self.open.load(Ordering::SeqCst)
    }

    /// Returns `true` if a sink dispatched through this gate panicked.
    pub(crate) fn sink_panicked(&self) -> bool {
        self.sink_panicked.load(Ordering::SeqCst)
    }

    /// Runs `f` if the gate is still open. Returns whether `f` ran.
    ///
    /// A panic in `f` closes the gate and is resumed unchanged.
    pub(crate) fn dispatch(&self, f: impl FnOnce()) -> bool {
        let _held = self.dispatch.lock();
        if self.is_closed() {
            return false;
        }
        self.guarded(f);
        true
    }

    /// Closes the gate for a terminal event and runs `f` under the lock.
    ///
    /// Returns `false` (without running `f`) if the run was already closed.
    pub(crate) fn finish(&self, f: impl FnOnce()) -> bool {
        let _held = self.dispatch.lock();
        if !self.open.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.token.cancel();
        self.guarded(f);
        true
    }

    /// Closes the gate without waiting for a sink in progress.
    ///
    /// Returns `true` if this call closed an open gate.
    pub(crate) fn revoke(&self) -> bool {
        let was_open = self.open.swap(false, Ordering::SeqCst);
        self.token.cancel();
        was_open
    }

    /// Waits until no sink of this run is executing on another thread.
    pub(crate) fn barrier(&self) {
        drop(self.dispatch.lock());
    }

    fn guarded(&self, f: impl FnOnce()) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
            self.sink_panicked.store(true, Ordering::SeqCst);
            self.revoke();
            panic::resume_unwind(payload);
        }
    }
}
