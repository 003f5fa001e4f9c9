//! # Producers: the asynchronous work an action wraps.
//!
//! - [`Producer`] - trait for starting one cancellable run
//! - [`ProducerFn`] - closure-backed producer
//! - [`StreamProducer`] - producer draining a fresh [`futures::Stream`] per run
//! - [`Emitter`] - value channel handed to each run
//! - [`ProducerRef`] - shared producer handle (`Arc<dyn Producer<T>>`)

mod emitter;
mod producer;
mod producer_fn;
mod stream;

pub use emitter::Emitter;
pub use producer::{BoxProducerFuture, Producer, ProducerRef};
pub use producer_fn::ProducerFn;
pub use stream::StreamProducer;
