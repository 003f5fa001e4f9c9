//! # Producer abstraction.
//!
//! A [`Producer`] describes how to start one run of asynchronous work. Each
//! call to [`Producer::spawn`] returns a **new** future; the action drives it on
//! the tokio runtime and drops it when the run is cancelled.
//!
//! While active a run pushes zero or more values through its [`Emitter`], then
//! resolves exactly once:
//! - `Ok(())` → completion,
//! - `Err(ProducerError)` → failure.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::ProducerError;
use crate::producers::Emitter;

/// Boxed future of one producer run.
pub type BoxProducerFuture = Pin<Box<dyn Future<Output = Result<(), ProducerError>> + Send + 'static>>;

/// # Asynchronous, cancellable source of values.
///
/// Implementors may check `ctx.is_cancelled()` (or [`Emitter::is_closed`]) to
/// stop early, but do not have to: a cancelled run is dropped at its next
/// await point and anything it emits afterwards is discarded.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use fromto::{BoxProducerFuture, Emitter, Producer, ProducerError};
///
/// struct Countdown(u32);
///
/// impl Producer<u32> for Countdown {
///     fn spawn(&self, tx: Emitter<u32>, _ctx: CancellationToken) -> BoxProducerFuture {
///         let from = self.0;
///         Box::pin(async move {
///             for n in (0..=from).rev() {
///                 tx.emit(n);
///             }
///             Ok::<_, ProducerError>(())
///         })
///     }
/// }
/// ```
pub trait Producer<T>: Send + Sync + 'static {
    /// Creates a new run delivering values through `emitter`.
    fn spawn(&self, emitter: Emitter<T>, ctx: CancellationToken) -> BoxProducerFuture;
}

/// Shared handle to a producer.
pub type ProducerRef<T> = Arc<dyn Producer<T>>;
