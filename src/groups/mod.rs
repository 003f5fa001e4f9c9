//! # Groups: aggregate busy/idle state for a consumer.
//!
//! - [`Group`] - fixed set of actions with one busy/idle signal
//! - [`GroupBuilder`] - configuration and subscriber wiring
//! - [`Config`] - group settings
//! - [`View`] - consumer capability receiving busy/idle edges
//!
//! ## Wiring
//! ```text
//! GroupBuilder::build()
//!   ├─► Bus (broadcast events)
//!   ├─► subscriber listener: Bus ─► SubscriberSet ─► Subscribe::on_event   (if any)
//!   └─► Group { actions, busy lock, Weak<dyn View> }
//!
//! Group::start ─► Lifecycle::start(notify = group) ─► before_start / after_finish
//!                                                        └─► edges ─► View::on_busy_changed
//! ```

mod builder;
mod config;
mod group;
mod view;

pub use builder::GroupBuilder;
pub use config::Config;
pub use group::Group;
pub use view::View;
