//! # Subscriber trait for group events.
//!
//! A [`Subscribe`] implementation sees every [`Event`] its group publishes:
//! action transitions, busy/idle edges and delivery problems of other
//! subscribers.
//!
//! ```text
//! Bus ──► group listener ──► SubscriberSet ──► queue ──► worker ──► on_event()
//! ```
//!
//! A subscriber is never called from the context that produced the event.
//! It has a private worker and a private bounded queue; when that queue is
//! full the event is skipped for this subscriber alone and reported as
//! `EventKind::SubscriberOverflow`.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use async_trait::async_trait;
//! use fromto::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct SpinnerTime {
//!     edges: AtomicU64,
//! }
//!
//! #[async_trait]
//! impl Subscribe for SpinnerTime {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.is_edge() {
//!             self.edges.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "spinner-time"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Asynchronous consumer of group events.
///
/// Panics inside [`on_event`](Subscribe::on_event) are caught by the worker and
/// turned into `EventKind::SubscriberPanicked`; the subscriber keeps receiving
/// later events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Events arrive in publish order.
    async fn on_event(&self, event: &Event);

    /// Name reported in overflow and panic events.
    ///
    /// Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue length for this subscriber (min 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
