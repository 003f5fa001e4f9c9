//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fromto::{Notify, Outcome, View};
use parking_lot::Mutex;

/// View recording every busy edge it receives.
#[derive(Default)]
pub struct RecordingView {
    edges: Mutex<Vec<bool>>,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn edges(&self) -> Vec<bool> {
        self.edges.lock().clone()
    }
}

impl View for RecordingView {
    fn on_busy_changed(&self, busy: bool) {
        self.edges.lock().push(busy);
    }
}

/// Lifecycle call recorded by [`RecordingNotify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BeforeStart(String),
    AfterFinish(String, Outcome),
}

/// Owner stand-in recording the callbacks an action makes.
#[derive(Default)]
pub struct RecordingNotify {
    calls: Mutex<Vec<Call>>,
}

impl RecordingNotify {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl Notify for RecordingNotify {
    fn before_start(&self, action: &str) {
        self.calls.lock().push(Call::BeforeStart(action.to_string()));
    }

    fn after_finish(&self, action: &str, outcome: Outcome) {
        self.calls
            .lock()
            .push(Call::AfterFinish(action.to_string(), outcome));
    }
}

/// Polls `cond` until it holds or two seconds pass.
pub async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

/// Awaits `fut` with a two second limit.
pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .expect("timed out")
}

/// Lets spawned runs make progress.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
