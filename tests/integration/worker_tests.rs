//! ClassifierWorker against slow and failing pipelines.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use sortbin::app::ports::ImagingPort;
use sortbin::classify::ClassificationResult;
use sortbin::classify::worker::ClassifierWorker;
use sortbin::error::ActuatorError;
use sortbin::fsm::WindowId;

const POLL: Duration = Duration::from_millis(5);
const MAX_POLLS: usize = 400;

/// Pipeline whose every classify blocks until the test releases it.
struct Gated {
    gate: Receiver<Option<ClassificationResult>>,
    calls: Arc<AtomicU32>,
}

impl ImagingPort for Gated {
    fn activate(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn classify(&mut self, _window: WindowId) -> Option<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.recv().ok().flatten()
    }
}

fn gated() -> (ClassifierWorker, Sender<Option<ClassificationResult>>, Arc<AtomicU32>) {
    let (tx, rx) = channel();
    let calls = Arc::new(AtomicU32::new(0));
    let worker = ClassifierWorker::spawn(Gated {
        gate: rx,
        calls: calls.clone(),
    })
    .unwrap();
    (worker, tx, calls)
}

/// Poll `classify(window)` until it yields a result.
fn poll_result(worker: &mut ClassifierWorker, window: WindowId) -> Option<ClassificationResult> {
    for _ in 0..MAX_POLLS {
        if let Some(r) = worker.classify(window) {
            return Some(r);
        }
        std::thread::sleep(POLL);
    }
    None
}

#[test]
fn one_request_in_flight_while_pipeline_is_slow() {
    let (mut worker, tx, calls) = gated();
    worker.activate().unwrap();

    for _ in 0..10 {
        assert_eq!(worker.classify(1), None);
        std::thread::sleep(Duration::from_millis(1));
    }
    let stats = worker.stats();
    assert_eq!(stats.requested, 1);
    assert_eq!(stats.skipped, 9);
    assert!(worker.is_busy());

    tx.send(Some(ClassificationResult::new("PAPER", 0.8))).unwrap();
    let r = poll_result(&mut worker, 1);
    assert_eq!(r.map(|c| c.label.to_string()).as_deref(), Some("PAPER"));
    assert!(calls.load(Ordering::SeqCst) >= 1);

    drop(tx);
    drop(worker);
}

#[test]
fn result_of_closed_window_is_dropped() {
    let (mut worker, tx, _calls) = gated();
    worker.activate().unwrap();
    assert_eq!(worker.classify(1), None);

    // Window 1 closes and window 2 opens while inference is running.
    worker.deactivate().unwrap();
    worker.activate().unwrap();
    tx.send(Some(ClassificationResult::new("PLASTIC", 0.9))).unwrap();

    for _ in 0..MAX_POLLS {
        assert_eq!(worker.classify(2), None, "window 1 result leaked into window 2");
        if worker.stats().stale == 1 {
            break;
        }
        std::thread::sleep(POLL);
    }
    assert_eq!(worker.stats().stale, 1);

    tx.send(Some(ClassificationResult::new("GLASS", 0.7))).unwrap();
    let r = poll_result(&mut worker, 2);
    assert_eq!(r.map(|c| c.label.to_string()).as_deref(), Some("GLASS"));

    drop(tx);
    drop(worker);
}

/// Pipeline that never powers up.
struct Broken;

impl ImagingPort for Broken {
    fn activate(&mut self) -> Result<(), ActuatorError> {
        Err(ActuatorError::ImagingUnavailable)
    }

    fn deactivate(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn classify(&mut self, _window: WindowId) -> Option<ClassificationResult> {
        panic!("classify on a pipeline that failed to activate");
    }
}

#[test]
fn failed_activation_answers_none() {
    let mut worker = ClassifierWorker::spawn(Broken).unwrap();
    worker.activate().unwrap();
    assert_eq!(worker.classify(1), None);

    for _ in 0..MAX_POLLS {
        assert_eq!(worker.classify(1), None);
        if worker.stats().requested >= 2 {
            break;
        }
        std::thread::sleep(POLL);
    }
    assert!(worker.stats().requested >= 2);
}

/// Pipeline whose inference crashes the worker thread.
struct Crashing;

impl ImagingPort for Crashing {
    fn activate(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn classify(&mut self, _window: WindowId) -> Option<ClassificationResult> {
        panic!("inference crashed");
    }
}

#[test]
fn drop_returns_after_worker_thread_died() {
    let mut worker = ClassifierWorker::spawn(Crashing).unwrap();
    worker.activate().unwrap();
    assert_eq!(worker.classify(1), None);
    std::thread::sleep(Duration::from_millis(50));

    // Nobody drains the queue any more: fill it up.
    let mut rejected = false;
    for _ in 0..8 {
        rejected |= worker.deactivate().is_err();
        rejected |= worker.activate().is_err();
    }
    assert!(rejected, "request queue should be full");

    let (done_tx, done_rx) = channel();
    std::thread::spawn(move || {
        drop(worker);
        done_tx.send(()).ok();
    });
    assert!(
        done_rx.recv_timeout(Duration::from_secs(5)).is_ok(),
        "dropping the worker hung"
    );
}
