//! Group events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the group's [`Notify`](crate::Notify) implementation (action
//!   transitions and busy/idle edges), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: [`Group::subscribe`](crate::Group::subscribe) receivers and the
//!   group's subscriber listener (fans out to `SubscriberSet`).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
