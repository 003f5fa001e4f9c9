//! Registered sinks and observers of one action.

use std::sync::Arc;

use crate::error::ProducerError;
use crate::observers::Observe;

pub(crate) type ValueSink<T> = Box<dyn Fn(T) + Send + Sync>;
pub(crate) type ErrorSink = Box<dyn Fn(ProducerError) + Send + Sync>;
pub(crate) type CompleteSink = Box<dyn Fn() + Send + Sync>;

/// Everything a run delivers to. Each slot is optional; an absent sink drops
/// the corresponding notification.
///
/// Observers are notified before the sink so they only need a borrow.
pub(crate) struct Sinks<T> {
    pub(crate) on_value: Option<ValueSink<T>>,
    pub(crate) on_error: Option<ErrorSink>,
    pub(crate) on_complete: Option<CompleteSink>,
    pub(crate) observers: Vec<Arc<dyn Observe<T>>>,
}

impl<T: 'static> Sinks<T> {
    pub(crate) fn value(&self, value: T) {
        for observer in &self.observers {
            observer.on_value(&value);
        }
        if let Some(sink) = &self.on_value {
            sink(value);
        }
    }

    pub(crate) fn error(&self, error: ProducerError) {
        for observer in &self.observers {
            observer.on_error(&error);
        }
        if let Some(sink) = &self.on_error {
            sink(error);
        }
    }

    pub(crate) fn complete(&self) {
        for observer in &self.observers {
            observer.on_complete();
        }
        if let Some(sink) = &self.on_complete {
            sink();
        }
    }
}
