//! # Function-backed producer (`ProducerFn`)
//!
//! [`ProducerFn`] wraps a closure `F: Fn(Emitter<T>, CancellationToken) -> Fut`,
//! producing a fresh future per start.
//!
//! ## Concurrency semantics
//! - Every [`Producer::spawn`] creates a **new** future owning its own state.
//! - No hidden mutation between runs; shared state must be an explicit `Arc<...>`
//!   captured by the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use fromto::{Emitter, ProducerError, ProducerFn};
//!
//! let p = ProducerFn::arc(|tx: Emitter<&'static str>, ctx: CancellationToken| async move {
//!     if !ctx.is_cancelled() {
//!         tx.emit("hello");
//!     }
//!     Ok::<_, ProducerError>(())
//! });
//! # let _ = p;
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::ProducerError;
use crate::producers::{BoxProducerFuture, Emitter, Producer};

/// Function-backed producer implementation.
#[derive(Debug)]
pub struct ProducerFn<F> {
    f: F,
}

impl<F> ProducerFn<F> {
    /// Creates a new function-backed producer.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the producer behind an `Arc`, ready for
    /// [`ActionBuilder::producer_ref`](crate::ActionBuilder::producer_ref).
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<T, F, Fut> Producer<T> for ProducerFn<F>
where
    F: Fn(Emitter<T>, CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), ProducerError>> + Send + 'static,
{
    fn spawn(&self, emitter: Emitter<T>, ctx: CancellationToken) -> BoxProducerFuture {
        Box::pin((self.f)(emitter, ctx))
    }
}
