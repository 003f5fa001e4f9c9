//! Error types used by actions and their producers.
//!
//! This module defines two error enums:
//!
//! - [`BuildError`]: configuration errors raised while building an [`Action`](crate::Action).
//! - [`ProducerError`]: failures of a single producer run, delivered to the action's error sink.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use std::any::Any;
use std::fmt::Display;

use thiserror::Error;

/// # Errors produced while building an action.
///
/// These are programmer errors: the caller must fix the configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The builder was finalized without a producer.
    #[error("action `{action}` has no producer")]
    MissingProducer {
        /// Name of the action being built.
        action: String,
    },
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fromto::BuildError;
    ///
    /// let err = BuildError::MissingProducer { action: "users".into() };
    /// assert_eq!(err.as_label(), "build_missing_producer");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::MissingProducer { .. } => "build_missing_producer",
        }
    }
}

/// # Errors produced by a producer run.
///
/// A failure terminates the current run of its action. It is handed to the
/// action's error sink and never escalates to the owning group.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProducerError {
    /// The producer reported a failure.
    #[error("producer failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The producer panicked while running.
    #[error("producer panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ProducerError {
    /// Shorthand for [`ProducerError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use fromto::ProducerError;
    ///
    /// let err = ProducerError::fail("connection refused");
    /// assert_eq!(err.to_string(), "producer failed: connection refused");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        ProducerError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProducerError::Fail { .. } => "producer_failed",
            ProducerError::Panicked { .. } => "producer_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProducerError::Fail { error } => format!("error: {error}"),
            ProducerError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Renders a caught panic payload as a [`ProducerError::Panicked`].
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        ProducerError::Panicked {
            info: panic_message(payload),
        }
    }
}

/// Text of a caught panic payload (`&str` and `String` payloads; anything else is "unknown panic").
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
