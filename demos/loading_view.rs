//! # Example: Loading view
//!
//! A "screen" loads a profile, a friend list and a feed in parallel. The
//! spinner flips on once and off once, the feed fails, and a second batch is
//! stopped halfway through.
//!
//! ```bash
//! RUST_LOG=fromto=debug cargo run --example loading_view --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use fromto::{
    Action, ActionRef, Config, Emitter, Group, LogWriter, ProducerError, ProducerFn, Subscribe,
    View,
};

struct Spinner;

impl View for Spinner {
    fn on_busy_changed(&self, busy: bool) {
        if busy {
            println!("[view] spinner on");
        } else {
            println!("[view] spinner off");
        }
    }
}

/// Action that sleeps `work_ms`, then emits `value` (or fails when `value` is `None`).
fn fetch(name: &'static str, work_ms: u64, value: Option<&'static str>) -> anyhow::Result<ActionRef> {
    let action: ActionRef = Action::<String>::builder(name)
        .producer(ProducerFn::new(move |tx: Emitter<String>, ctx: CancellationToken| async move {
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = tokio::time::sleep(Duration::from_millis(work_ms)) => {}
            }
            match value {
                Some(v) => {
                    tx.emit(v.to_string());
                    Ok(())
                }
                None => Err(ProducerError::fail("upstream returned 503")),
            }
        }))
        .on_value(move |v| println!("[{name}] got {v:?}"))
        .on_error(move |e| println!("[{name}] error: {e}"))
        .on_complete(move || println!("[{name}] done"))
        .build()?;
    Ok(action)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fromto=info")),
        )
        .init();

    let group = Group::builder([
        fetch("profile", 100, Some("ada"))?,
        fetch("friends", 250, Some("grace, linus"))?,
        fetch("feed", 150, None)?,
    ])
    .with_config(Config::named("profile-screen"))
    .with_subscribers(vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>])
    .build();

    let spinner = Arc::new(Spinner);

    println!("-- first batch runs to the end");
    group.attach(&spinner).start();
    group.start(); // ignored: already busy
    while group.is_loading() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    println!("-- second batch is stopped early");
    group.attach(&spinner).start();
    tokio::time::sleep(Duration::from_millis(120)).await;
    group.stop();
    println!("[main] loading after stop: {}", group.is_loading());

    // Give the log subscriber a moment to drain.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
