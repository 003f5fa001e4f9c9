//! # fromto
//!
//! **fromto** coordinates a group of independently running asynchronous
//! actions on behalf of one consumer (a "view"). The consumer sees a single
//! aggregate busy/idle signal, and stopping the group cancels every in-flight
//! run without late callbacks or duplicate notifications.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Producer A  │   │  Producer B  │   │  Producer C  │
//!     │ (user work)  │   │ (user work)  │   │ (user work)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Action<A>   │   │  Action<B>   │   │  Action<C>   │
//!     │ running flag │   │ running flag │   │ running flag │
//!     │ run gate     │   │ run gate     │   │ run gate     │
//!     │ sinks        │   │ sinks        │   │ sinks        │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ before_start / after_finish (Notify)│
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Group                                                            │
//! │  - aggregate busy = OR(members)   (edge bookkeeping under a lock) │
//! │  - Weak<dyn View>                 (on_busy_changed on edges only) │
//! │  - Bus                            (group events)                  │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        ▼                                              ▼
//!   View::on_busy_changed(bool)             SubscriberSet ─► Subscribe::on_event
//! ```
//!
//! ### Lifecycle
//! ```text
//! Group::start()
//!   ├─► busy already? ─► no-op
//!   └─► for each action (in order):
//!         ├─► cancel previous run (last writer wins)
//!         ├─► before_start ─► idle→busy edge? ─► view(true)
//!         └─► running = true, spawn producer
//!
//! run ends (error | completion)
//!   ├─► sink (on_error | on_complete)
//!   ├─► running = false
//!   └─► after_finish ─► busy→idle edge? ─► view(false)
//!
//! Group::stop()
//!   ├─► every action: close gate, running = false, after_finish
//!   └─► detach view
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Actions**       | Cancellable unit of work with its own running state.         | [`Action`], [`ActionBuilder`], [`Lifecycle`] |
//! | **Producers**     | The async work an action wraps.                              | [`Producer`], [`ProducerFn`], [`StreamProducer`] |
//! | **Groups**        | One busy/idle signal over a fixed set of actions.            | [`Group`], [`View`], [`Config`]             |
//! | **Observers**     | Additional per-action listeners and broadcast fan-out.       | [`Observe`], [`Broadcast`]                  |
//! | **Events**        | Group lifecycle events and subscriber fan-out.               | [`Event`], [`Subscribe`]                    |
//! | **Errors**        | Typed build and producer errors.                             | [`BuildError`], [`ProducerError`]           |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber rendering events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use fromto::{Action, ActionRef, Emitter, Group, ProducerError, ProducerFn, View};
//!
//! struct Screen;
//!
//! impl View for Screen {
//!     fn on_busy_changed(&self, busy: bool) {
//!         println!("spinner visible: {busy}");
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let profile = Action::<String>::builder("profile")
//!         .producer(ProducerFn::new(|tx: Emitter<String>, _ctx: CancellationToken| async move {
//!             tokio::time::sleep(Duration::from_millis(10)).await;
//!             tx.emit("ada".to_string());
//!             Ok::<_, ProducerError>(())
//!         }))
//!         .on_value(|name| println!("hello {name}"))
//!         .on_error(|err| eprintln!("profile failed: {err}"))
//!         .build()?;
//!
//!     let screen = Arc::new(Screen);
//!     let group = Group::new([profile as ActionRef]);
//!     group.attach(&screen).start();
//!
//!     while group.is_loading() {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!     }
//!     group.stop();
//!     Ok(())
//! }
//! ```

mod actions;
mod error;
mod events;
mod groups;
mod observers;
mod producers;
mod subscribers;

// ---- Public re-exports ----

pub use actions::{Action, ActionBuilder, ActionRef, Lifecycle, Notify, Outcome};
pub use error::{BuildError, ProducerError};
pub use events::{Bus, Event, EventKind};
pub use groups::{Config, Group, GroupBuilder, View};
pub use observers::{Broadcast, Observe, Signal};
pub use producers::{BoxProducerFuture, Emitter, Producer, ProducerFn, ProducerRef, StreamProducer};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
