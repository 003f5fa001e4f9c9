//! # Stream-backed producer (`StreamProducer`)
//!
//! [`StreamProducer`] adapts a factory of [`futures::Stream`]s. Each start calls
//! the factory for a **fresh** stream, so a producer can be started repeatedly.
//!
//! ## Rules
//! - Every `Ok(item)` is emitted as a value.
//! - The first `Err(e)` ends the run with that error; later items are not polled.
//! - Stream exhaustion ends the run with completion.
//!
//! ## Example
//! ```rust
//! use futures::stream;
//! use fromto::{ProducerError, StreamProducer};
//!
//! let numbers = StreamProducer::new(|| stream::iter([Ok::<_, ProducerError>(1), Ok(2), Ok(3)]));
//! # let _ = numbers;
//! ```

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::ProducerError;
use crate::producers::{BoxProducerFuture, Emitter, Producer};

/// Producer draining a freshly created stream per run.
#[derive(Debug)]
pub struct StreamProducer<F> {
    make: F,
}

impl<F> StreamProducer<F> {
    /// Creates a producer calling `make` on every start.
    pub fn new(make: F) -> Self {
        Self { make }
    }
}

impl<T, F, S> Producer<T> for StreamProducer<F>
where
    T: Send + 'static,
    F: Fn() -> S + Send + Sync + 'static,
    S: Stream<Item = Result<T, ProducerError>> + Send + 'static,
{
    fn spawn(&self, emitter: Emitter<T>, ctx: CancellationToken) -> BoxProducerFuture {
        let stream = (self.make)();
        Box::pin(async move {
            futures::pin_mut!(stream);
            while let Some(item) = stream.next().await {
                if ctx.is_cancelled() {
                    break;
                }
                emitter.emit(item?);
            }
            Ok::<(), ProducerError>(())
        })
    }
}
