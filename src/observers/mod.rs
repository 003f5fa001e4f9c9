//! # Observers: additional per-action listeners.
//!
//! An action has one optional sink per signal kind. Observers add a
//! fan-out layer on top of that:
//! - [`Observe`] - trait for custom observers
//! - [`Broadcast`] - observer republishing [`Signal`]s on a tokio broadcast channel
//!
//! ```text
//! run ── emit(value) ──► gate ──► observer 1 ──► ... ──► observer N ──► on_value sink
//!                                     │
//!                                 Broadcast ──► rx 1, rx 2, ...
//! ```

mod broadcast;
mod observe;

pub use broadcast::{Broadcast, Signal};
pub use observe::Observe;
