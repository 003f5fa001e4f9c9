/// Consumer of a group's aggregate busy state, typically a UI layer.
///
/// The group holds the view weakly: attaching never keeps a view alive.
///
/// `on_busy_changed` is called inline, from whichever context caused the edge
/// (the caller of `start`/`stop` or a tokio worker), and must return quickly.
/// It receives `true` once per idle → busy edge and `false` once per
/// busy → idle edge.
///
/// ## Example
/// ```rust
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use fromto::View;
///
/// #[derive(Default)]
/// struct Spinner {
///     visible: AtomicBool,
/// }
///
/// impl View for Spinner {
///     fn on_busy_changed(&self, busy: bool) {
///         self.visible.store(busy, Ordering::SeqCst);
///     }
/// }
/// ```
pub trait View: Send + Sync + 'static {
    /// Called when the group's aggregate state flips.
    fn on_busy_changed(&self, busy: bool);
}
