//! # Group: one busy/idle signal over a fixed set of actions.
//!
//! The [`Group`] owns an ordered, fixed list of [`ActionRef`]s and a weak
//! reference to a [`View`]. It starts and stops every member and reports the
//! aggregate state (logical OR of the members' running flags) to the view.
//!
//! ## Edge rule
//! ```text
//! member transitions:   A start   B start   A done   B done    (A start ...)
//! aggregate:            idle→busy  busy      busy    busy→idle
//! view:                 true                          false
//! ```
//! The view sees `true` at most once per idle → busy edge and `false` at most
//! once per busy → idle edge, however many members start or finish in between.
//!
//! ## Rules
//! - Edge bookkeeping (cached `busy` + comparison) is serialized by one reentrant lock.
//! - `start` holds that lock across its check-and-start loop, so members finishing on
//!   other workers are accounted for only after every member has been started.
//! - The lock is reentrant: the view may call back into the group from `on_busy_changed`.
//! - The view is called with no other group lock held.

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{ReentrantMutex, RwLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::actions::{ActionRef, Notify, Outcome};
use crate::events::{Bus, Event, EventKind};
use crate::groups::builder::GroupBuilder;
use crate::groups::view::View;

/// Fixed collection of actions presenting one aggregate busy/idle signal.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use fromto::{Action, ActionRef, Emitter, Group, ProducerError, ProducerFn, View};
/// use tokio_util::sync::CancellationToken;
///
/// struct Spinner;
/// impl View for Spinner {
///     fn on_busy_changed(&self, busy: bool) {
///         println!("loading: {busy}");
///     }
/// }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let users = Action::<Vec<String>>::builder("users")
///         .producer(ProducerFn::new(|tx: Emitter<Vec<String>>, _ctx: CancellationToken| async move {
///             tx.emit(vec!["ada".into(), "grace".into()]);
///             Ok::<_, ProducerError>(())
///         }))
///         .on_value(|users| println!("{} users", users.len()))
///         .build()
///         .unwrap();
///
///     let view = Arc::new(Spinner);
///     let group = Group::new([users.clone() as ActionRef]);
///     group.attach(&view).start();
///     assert!(group.is_loading());
///
///     group.stop();
///     assert!(!group.is_loading());
/// }
/// ```
pub struct Group {
    shared: Arc<Shared>,
    listener: Option<CancellationToken>,
}

/// State shared between the group handle and the runs it started.
pub(crate) struct Shared {
    name: Arc<str>,
    actions: Vec<ActionRef>,
    busy: ReentrantMutex<Cell<bool>>,
    view: RwLock<Option<Weak<dyn View>>>,
    bus: Bus,
}

impl Group {
    /// Creates a group with default [`Config`](crate::Config) and no subscribers.
    pub fn new(actions: impl IntoIterator<Item = ActionRef>) -> Self {
        GroupBuilder::new(actions).build()
    }

    /// Returns a builder for a group over `actions`.
    pub fn builder(actions: impl IntoIterator<Item = ActionRef>) -> GroupBuilder {
        GroupBuilder::new(actions)
    }

    pub(crate) fn from_parts(
        name: Arc<str>,
        actions: Vec<ActionRef>,
        bus: Bus,
        listener: Option<CancellationToken>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                name,
                actions,
                busy: ReentrantMutex::new(Cell::new(false)),
                view: RwLock::new(None),
                bus,
            }),
            listener,
        }
    }

    /// Attaches `view`, replacing any previously attached one.
    ///
    /// The group keeps only a weak reference.
    pub fn attach<V: View>(&self, view: &Arc<V>) -> &Self {
        let weak: Weak<V> = Arc::downgrade(view);
        *self.shared.view.write() = Some(weak as Weak<dyn View>);
        self
    }

    /// Returns `true` if a view is attached and still alive.
    pub fn is_attached(&self) -> bool {
        self.shared
            .view
            .read()
            .as_ref()
            .is_some_and(|view| view.strong_count() > 0)
    }

    /// Starts every member in list order.
    ///
    /// No-op while any member is still running: a batch is never started twice
    /// concurrently. Must be called from within a tokio runtime.
    pub fn start(&self) {
        let _serial = self.shared.busy.lock();
        if self.shared.is_loading() {
            debug!(group = %self.shared.name, "already busy; start ignored");
            return;
        }

        let notify: Arc<dyn Notify> = self.shared.clone();
        for action in &self.shared.actions {
            action.start(Arc::clone(&notify));
        }
    }

    /// Stops every member in list order, then detaches the view.
    ///
    /// Every in-flight run is cancelled before this returns: none of its sinks
    /// fire afterwards. If the group was busy the view receives a single `false`
    /// before being detached.
    #[doc(alias = "detach")]
    pub fn stop(&self) {
        for action in &self.shared.actions {
            action.stop(self.shared.as_ref());
        }
        *self.shared.view.write() = None;
        debug!(group = %self.shared.name, "stopped and detached");
    }

    /// Returns `true` iff any member reports running.
    pub fn is_loading(&self) -> bool {
        self.shared.is_loading()
    }

    /// Returns the members in start order.
    pub fn actions(&self) -> &[ActionRef] {
        &self.shared.actions
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Creates a receiver of this group's events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.cancel();
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.shared.name)
            .field("actions", &self.shared.actions.len())
            .field("loading", &self.is_loading())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Shared {
    fn is_loading(&self) -> bool {
        self.actions.iter().any(|action| action.is_running())
    }

    fn event(&self, kind: EventKind, action: &str) -> Event {
        Event::new(kind)
            .with_group(Arc::clone(&self.name))
            .with_action(action)
    }

    /// Publishes the edge and tells the view. Caller holds the `busy` lock.
    fn signal(&self, busy: bool) {
        debug!(group = %self.name, busy, "busy state changed");
        let kind = if busy {
            EventKind::GroupBusy
        } else {
            EventKind::GroupIdle
        };
        self.bus
            .publish(Event::new(kind).with_group(Arc::clone(&self.name)));

        let view = self.view.read().as_ref().and_then(Weak::upgrade);
        if let Some(view) = view {
            view.on_busy_changed(busy);
        }
    }
}

impl Notify for Shared {
    fn before_start(&self, action: &str) {
        let busy = self.busy.lock();
        self.bus
            .publish(self.event(EventKind::ActionStarting, action));

        if !busy.get() {
            busy.set(true);
            self.signal(true);
        }
    }

    fn after_finish(&self, action: &str, outcome: Outcome) {
        let busy = self.busy.lock();
        match outcome {
            Outcome::Completed => self
                .bus
                .publish(self.event(EventKind::ActionCompleted, action)),
            Outcome::Failed { error } => self
                .bus
                .publish(self.event(EventKind::ActionFailed, action).with_error(error)),
            Outcome::Stopped { in_flight: true } => self
                .bus
                .publish(self.event(EventKind::ActionStopped, action)),
            Outcome::Stopped { in_flight: false } => {}
        }

        if busy.get() && !self.is_loading() {
            busy.set(false);
            self.signal(false);
        }
    }
}
