//! # Event subscribers for groups.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Group (Notify) ── publish(Event) ──► Bus ──► group listener ──► SubscriberSet
//!                                         │                             │
//!                                         │                  ┌──────────┼──────────┐
//!                                         │                  ▼          ▼          ▼
//!                                         │              LogWriter   Metrics    Custom
//!                                         │
//!                                         └──► Group::subscribe() receivers
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
