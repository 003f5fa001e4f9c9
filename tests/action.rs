//! Action lifecycle tests: running flag, terminal events, cancellation and restarts.

mod common;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use common::{eventually, settle, within, Call, RecordingNotify};
use fromto::{
    Action, Broadcast, BuildError, Emitter, Lifecycle, Notify, Outcome, ProducerError, ProducerFn,
    Signal, StreamProducer,
};
use futures::stream;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

#[test]
fn action_without_producer_is_rejected() {
    let err = Action::<i32>::builder("orphan")
        .on_value(|_| {})
        .on_error(|_| {})
        .build()
        .unwrap_err();
    assert_eq!(err.as_label(), "build_missing_producer");
    assert!(matches!(err, BuildError::MissingProducer { action } if action == "orphan"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn completion_delivers_values_then_done() {
    let values = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(AtomicUsize::new(0));
    let errors = Arc::new(AtomicUsize::new(0));

    let action = Action::<i32>::builder("numbers")
        .producer(ProducerFn::new(|tx: Emitter<i32>, _ctx: CancellationToken| async move {
            tx.emit(1);
            tx.emit(2);
            Ok::<_, ProducerError>(())
        }))
        .on_value({
            let values = Arc::clone(&values);
            move |v| values.lock().push(v)
        })
        .on_complete({
            let done = Arc::clone(&done);
            move || {
                done.fetch_add(1, Ordering::SeqCst);
            }
        })
        .on_error({
            let errors = Arc::clone(&errors);
            move |_| {
                errors.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.start(notify.clone());
    assert!(eventually(|| !action.is_running()).await);

    assert_eq!(*values.lock(), vec![1, 2]);
    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
    assert_eq!(
        notify.calls(),
        vec![
            Call::BeforeStart("numbers".into()),
            Call::AfterFinish("numbers".into(), Outcome::Completed),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failure_goes_to_error_sink_only() {
    let (err_tx, mut err_rx) = mpsc::unbounded_channel();
    let done = Arc::new(AtomicUsize::new(0));

    let action = Action::<i32>::builder("broken")
        .producer(ProducerFn::new(|_tx: Emitter<i32>, _ctx: CancellationToken| async move {
            Err::<(), _>(ProducerError::fail("no route to host"))
        }))
        .on_value(|_| panic!("no value expected"))
        .on_complete({
            let done = Arc::clone(&done);
            move || {
                done.fetch_add(1, Ordering::SeqCst);
            }
        })
        .on_error(move |e| {
            let _ = err_tx.send(e);
        })
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.start(notify.clone());

    let err = within(err_rx.recv()).await.unwrap();
    assert_eq!(err, ProducerError::fail("no route to host"));
    assert!(eventually(|| !action.is_running()).await);
    settle().await;

    assert!(err_rx.try_recv().is_err());
    assert_eq!(done.load(Ordering::SeqCst), 0);
    assert_eq!(
        notify.calls().last(),
        Some(&Call::AfterFinish(
            "broken".into(),
            Outcome::Failed {
                error: "producer failed: no route to host".into()
            }
        ))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_sinks_are_tolerated() {
    let action = Action::<i32>::builder("silent")
        .producer(ProducerFn::new(|tx: Emitter<i32>, _ctx: CancellationToken| async move {
            tx.emit(1);
            Err::<(), _>(ProducerError::fail("ignored"))
        }))
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.start(notify.clone());
    assert!(eventually(|| !action.is_running()).await);
    assert_eq!(notify.calls().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_producer_reports_an_error() {
    let (err_tx, mut err_rx) = mpsc::unbounded_channel();

    let action = Action::<i32>::builder("panics")
        .producer(ProducerFn::new(|_tx: Emitter<i32>, _ctx: CancellationToken| async move {
            let missing: Option<i32> = None;
            let _ = missing.expect("value must be present");
            Ok::<_, ProducerError>(())
        }))
        .on_error(move |e| {
            let _ = err_tx.send(e);
        })
        .build()
        .unwrap();

    action.start(RecordingNotify::new());

    let err = within(err_rx.recv()).await.unwrap();
    assert_eq!(err.as_label(), "producer_panicked");
    assert_eq!(
        err,
        ProducerError::Panicked {
            info: "value must be present".into()
        }
    );
    assert!(eventually(|| !action.is_running()).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_cancels_and_discards_late_values() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let (late_tx, late_rx) = oneshot::channel::<bool>();
    let late_tx = Arc::new(Mutex::new(Some(late_tx)));
    let (started_tx, mut started_rx) = mpsc::unbounded_channel::<()>();

    let action = Action::<i32>::builder("slow")
        .producer(ProducerFn::new(move |tx: Emitter<i32>, _ctx: CancellationToken| {
            let late_tx = Arc::clone(&late_tx);
            let started_tx = started_tx.clone();
            async move {
                // A detached task outlives the cancelled run and tries to emit.
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    let delivered = tx.emit(7);
                    if let Some(report) = late_tx.lock().take() {
                        let _ = report.send(delivered);
                    }
                });
                let _ = started_tx.send(());
                std::future::pending::<()>().await;
                Ok::<_, ProducerError>(())
            }
        }))
        .on_value({
            let delivered = Arc::clone(&delivered);
            move |_| {
                delivered.fetch_add(1, Ordering::SeqCst);
            }
        })
        .on_complete(|| panic!("stopped run must not complete"))
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.start(notify.clone());
    within(started_rx.recv()).await.unwrap();
    assert!(action.is_running());

    action.stop(notify.as_ref());
    assert!(!action.is_running());

    assert!(!within(late_rx).await.unwrap(), "late value must be dropped");
    assert_eq!(delivered.load(Ordering::SeqCst), 0);
    assert_eq!(
        notify.calls().last(),
        Some(&Call::AfterFinish(
            "slow".into(),
            Outcome::Stopped { in_flight: true }
        ))
    );
}

#[tokio::test]
async fn stop_on_idle_action_still_reports() {
    let action = Action::<i32>::builder("idle")
        .producer(ProducerFn::new(|_tx: Emitter<i32>, _ctx: CancellationToken| async move {
            Ok::<_, ProducerError>(())
        }))
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.stop(notify.as_ref());
    action.stop(notify.as_ref());
    assert_eq!(
        notify.calls(),
        vec![
            Call::AfterFinish("idle".into(), Outcome::Stopped { in_flight: false }),
            Call::AfterFinish("idle".into(), Outcome::Stopped { in_flight: false }),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn restarting_replaces_the_in_flight_run() {
    let runs = Arc::new(AtomicUsize::new(0));
    let values = Arc::new(Mutex::new(Vec::new()));

    let action = Action::<usize>::builder("restartable")
        .producer(ProducerFn::new({
            let runs = Arc::clone(&runs);
            move |tx: Emitter<usize>, _ctx: CancellationToken| {
                let run = runs.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if run == 1 {
                        std::future::pending::<()>().await;
                    }
                    tx.emit(run);
                    Ok::<_, ProducerError>(())
                }
            }
        }))
        .on_value({
            let values = Arc::clone(&values);
            move |v| values.lock().push(v)
        })
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.start(notify.clone());
    assert!(action.is_running());
    action.start(notify.clone());

    assert!(eventually(|| !action.is_running()).await);
    settle().await;

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(*values.lock(), vec![2]);
    let finishes = notify
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::AfterFinish(..)))
        .count();
    assert_eq!(finishes, 1, "the replaced run reports nothing");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sink_may_stop_its_own_action() {
    let slot: Arc<OnceLock<Arc<Action<u32>>>> = Arc::new(OnceLock::new());
    let owner = RecordingNotify::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let action = Action::<u32>::builder("self-stopping")
        .producer(ProducerFn::new(|tx: Emitter<u32>, _ctx: CancellationToken| async move {
            for n in 0..10 {
                if !tx.emit(n) {
                    break;
                }
                tokio::task::yield_now().await;
            }
            Ok::<_, ProducerError>(())
        }))
        .on_value({
            let slot = Arc::clone(&slot);
            let owner = Arc::clone(&owner);
            let seen = Arc::clone(&seen);
            move |n| {
                seen.lock().push(n);
                if n == 2 {
                    if let Some(me) = slot.get() {
                        me.stop(owner.as_ref());
                    }
                }
            }
        })
        .on_complete(|| panic!("stopped from its sink"))
        .build()
        .unwrap();
    let _ = slot.set(Arc::clone(&action));

    action.start(owner.clone());
    assert!(eventually(|| !action.is_running()).await);
    settle().await;

    assert_eq!(*seen.lock(), vec![0, 1, 2]);
    assert_eq!(
        owner.calls().last(),
        Some(&Call::AfterFinish(
            "self-stopping".into(),
            Outcome::Stopped { in_flight: true }
        ))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stream_producer_drains_then_completes() {
    let values = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<&'static str>();

    let action = Action::<char>::builder("letters")
        .producer(StreamProducer::new(|| {
            stream::iter("abc".chars().map(Ok::<_, ProducerError>).collect::<Vec<_>>())
        }))
        .on_value({
            let values = Arc::clone(&values);
            move |c| values.lock().push(c)
        })
        .on_complete({
            let done_tx = done_tx.clone();
            move || {
                let _ = done_tx.send("complete");
            }
        })
        .on_error(move |_| {
            let _ = done_tx.send("error");
        })
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.start(notify.clone());
    assert_eq!(within(done_rx.recv()).await, Some("complete"));
    assert_eq!(*values.lock(), vec!['a', 'b', 'c']);

    values.lock().clear();
    assert!(eventually(|| !action.is_running()).await);
    action.start(notify.clone());
    assert_eq!(within(done_rx.recv()).await, Some("complete"));
    assert_eq!(*values.lock(), vec!['a', 'b', 'c'], "each start gets a fresh stream");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stream_producer_stops_at_first_error() {
    let values = Arc::new(Mutex::new(Vec::new()));
    let (err_tx, mut err_rx) = mpsc::unbounded_channel();

    let action = Action::<u8>::builder("partial")
        .producer(StreamProducer::new(|| {
            stream::iter(vec![Ok(1u8), Err(ProducerError::fail("corrupt")), Ok(3)])
        }))
        .on_value({
            let values = Arc::clone(&values);
            move |v| values.lock().push(v)
        })
        .on_error(move |e| {
            let _ = err_tx.send(e);
        })
        .build()
        .unwrap();

    action.start(RecordingNotify::new());
    assert_eq!(
        within(err_rx.recv()).await,
        Some(ProducerError::fail("corrupt"))
    );
    assert_eq!(*values.lock(), vec![1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn broadcast_observers_see_values_then_terminal_signal() {
    let fan = Broadcast::<u32>::new(16);
    let mut first = fan.subscribe();
    let mut second = fan.subscribe();
    let sink_values = Arc::new(Mutex::new(Vec::new()));

    let action = Action::<u32>::builder("fanned")
        .producer(ProducerFn::new(|tx: Emitter<u32>, _ctx: CancellationToken| async move {
            tx.emit(10);
            tx.emit(20);
            Ok::<_, ProducerError>(())
        }))
        .observe(fan.clone())
        .on_value({
            let sink_values = Arc::clone(&sink_values);
            move |v| sink_values.lock().push(v)
        })
        .build()
        .unwrap();

    action.start(RecordingNotify::new());

    for rx in [&mut first, &mut second] {
        assert_eq!(within(rx.recv()).await.unwrap(), Signal::Value(10));
        assert_eq!(within(rx.recv()).await.unwrap(), Signal::Value(20));
        assert_eq!(within(rx.recv()).await.unwrap(), Signal::Complete);
    }
    assert_eq!(*sink_values.lock(), vec![10, 20]);
}

#[tokio::test]
async fn notify_is_told_before_the_flag_flips() {
    struct RunningWitness {
        action: OnceLock<Arc<Action<()>>>,
        seen_running: Mutex<Vec<bool>>,
    }

    impl Notify for RunningWitness {
        fn before_start(&self, _action: &str) {
            if let Some(action) = self.action.get() {
                self.seen_running.lock().push(action.is_running());
            }
        }

        fn after_finish(&self, _action: &str, _outcome: Outcome) {
            if let Some(action) = self.action.get() {
                self.seen_running.lock().push(action.is_running());
            }
        }
    }

    let action = Action::<()>::builder("witness")
        .producer(ProducerFn::new(|_tx: Emitter<()>, _ctx: CancellationToken| async move {
            Ok::<_, ProducerError>(())
        }))
        .build()
        .unwrap();

    let witness = Arc::new(RunningWitness {
        action: OnceLock::new(),
        seen_running: Mutex::new(Vec::new()),
    });
    let _ = witness.action.set(Arc::clone(&action));

    action.start(witness.clone());
    assert!(eventually(|| witness.seen_running.lock().len() == 2).await);
    assert_eq!(*witness.seen_running.lock(), vec![false, false]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sink_panic_is_not_reported_as_producer_failure() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let action = Action::<u32>::builder("fragile")
        .producer(ProducerFn::new(|tx: Emitter<u32>, _ctx: CancellationToken| async move {
            tx.emit(1);
            Ok::<_, ProducerError>(())
        }))
        .on_value(|_| panic!("consumer bug in on_value"))
        .on_error({
            let errors = Arc::clone(&errors);
            move |e| errors.lock().push(e)
        })
        .on_complete(|| panic!("run ended by a sink panic must not complete"))
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.start(notify.clone());
    settle().await;

    assert!(errors.lock().is_empty());
    assert_eq!(notify.calls(), vec![Call::BeforeStart("fragile".into())]);

    // The run is over but still held until its owner stops it.
    action.stop(notify.as_ref());
    assert!(!action.is_running());
    assert_eq!(
        notify.calls().last(),
        Some(&Call::AfterFinish(
            "fragile".into(),
            Outcome::Stopped { in_flight: false }
        ))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sink_panic_surfaces_at_the_emit_call() {
    let (report_tx, mut report_rx) = mpsc::unbounded_channel::<(bool, bool)>();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let action = Action::<u32>::builder("fragile")
        .producer(ProducerFn::new(move |tx: Emitter<u32>, _ctx: CancellationToken| {
            let report_tx = report_tx.clone();
            async move {
                let first = panic::catch_unwind(AssertUnwindSafe(|| tx.emit(1)));
                let second = tx.emit(2);
                let _ = report_tx.send((first.is_err(), second));
                Ok::<_, ProducerError>(())
            }
        }))
        .on_value({
            let seen = Arc::clone(&seen);
            move |v| {
                seen.lock().push(v);
                if v == 1 {
                    panic!("consumer bug in on_value");
                }
            }
        })
        .on_error(|e| panic!("sink panics are not producer errors: {e}"))
        .build()
        .unwrap();

    let notify = RecordingNotify::new();
    action.start(notify.clone());

    let (panicked, delivered_after) = within(report_rx.recv()).await.unwrap();
    assert!(panicked, "the sink panic reaches the emitting code");
    assert!(!delivered_after, "the run is closed after a sink panic");
    settle().await;

    assert_eq!(*seen.lock(), vec![1]);
    assert_eq!(notify.calls(), vec![Call::BeforeStart("fragile".into())]);
}
