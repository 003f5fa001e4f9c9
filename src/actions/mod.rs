//! # Actions and their lifecycle contract.
//!
//! This module provides the action-related types:
//! - [`Action`] - cancellable unit of work with its own running flag
//! - [`ActionBuilder`] - builder rejecting actions without a producer
//! - [`Lifecycle`] - object-safe start/stop control used by groups
//! - [`ActionRef`] - shared handle to an action of any value type (`Arc<dyn Lifecycle>`)
//! - [`Notify`] / [`Outcome`] - callbacks an action invokes on its owner

mod action;
mod builder;
mod gate;
mod lifecycle;
mod sinks;

pub use action::Action;
pub use builder::ActionBuilder;
pub use lifecycle::{ActionRef, Lifecycle, Notify, Outcome};

pub(crate) use gate::RunGate;
pub(crate) use sinks::Sinks;
