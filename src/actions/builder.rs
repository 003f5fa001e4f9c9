use std::borrow::Cow;
use std::sync::Arc;

use crate::actions::action::Action;
use crate::actions::sinks::Sinks;
use crate::error::{BuildError, ProducerError};
use crate::observers::Observe;
use crate::producers::{Producer, ProducerRef};

/// Builder for an [`Action`].
///
/// Only the producer is mandatory; every sink is optional.
///
/// ## Example
/// ```rust
/// use fromto::{Action, Emitter, ProducerError, ProducerFn};
/// use tokio_util::sync::CancellationToken;
///
/// let action = Action::<u32>::builder("answer")
///     .producer(ProducerFn::new(|tx: Emitter<u32>, _ctx: CancellationToken| async move {
///         tx.emit(42);
///         Ok::<_, ProducerError>(())
///     }))
///     .on_value(|v| assert_eq!(v, 42))
///     .build()
///     .unwrap();
///
/// assert!(!action.is_running());
/// ```
pub struct ActionBuilder<T> {
    name: Cow<'static, str>,
    producer: Option<ProducerRef<T>>,
    sinks: Sinks<T>,
}

impl<T: Send + 'static> ActionBuilder<T> {
    /// Creates a builder for an action named `name`.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            producer: None,
            sinks: Sinks {
                on_value: None,
                on_error: None,
                on_complete: None,
                observers: Vec::new(),
            },
        }
    }

    /// Sets the producer started on every run. Required.
    pub fn producer(self, producer: impl Producer<T>) -> Self {
        self.producer_ref(Arc::new(producer))
    }

    /// Sets an already shared producer. Required unless [`producer`](Self::producer) is used.
    pub fn producer_ref(mut self, producer: ProducerRef<T>) -> Self {
        self.producer = Some(producer);
        self
    }

    /// Sets the sink receiving each produced value.
    pub fn on_value(mut self, sink: impl Fn(T) + Send + Sync + 'static) -> Self {
        self.sinks.on_value = Some(Box::new(sink));
        self
    }

    /// Sets the sink receiving a run's terminal error.
    pub fn on_error(mut self, sink: impl Fn(ProducerError) + Send + Sync + 'static) -> Self {
        self.sinks.on_error = Some(Box::new(sink));
        self
    }

    /// Sets the sink invoked when a run completes normally.
    pub fn on_complete(mut self, sink: impl Fn() + Send + Sync + 'static) -> Self {
        self.sinks.on_complete = Some(Box::new(sink));
        self
    }

    /// Adds an observer notified alongside the sinks. May be called repeatedly.
    pub fn observe(mut self, observer: Arc<dyn Observe<T>>) -> Self {
        self.sinks.observers.push(observer);
        self
    }

    /// Builds the action.
    ///
    /// # Errors
    /// [`BuildError::MissingProducer`] if no producer was set.
    pub fn build(self) -> Result<Arc<Action<T>>, BuildError> {
        let producer = self.producer.ok_or_else(|| BuildError::MissingProducer {
            action: self.name.to_string(),
        })?;
        Ok(Arc::new(Action::new(self.name, producer, self.sinks)))
    }
}
