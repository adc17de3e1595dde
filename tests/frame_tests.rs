//! Frame Scheduling Integration Tests
//!
//! Tests for:
//! - Primitive probing: fixed order, first available wins
//! - Primitive-backed requests: exactly once, never on the caller's stack
//! - Timer fallback: one interval later, exactly once
//! - Process-wide scheduler

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use kinetic::canvas::SurfaceConstructor;
use kinetic::frame::{self, FrameBinding, FramePrimitive, FrameQueue, FrameScheduler, RequestFrameFn};
use kinetic::host::{HeadlessHost, Host};
use kinetic::settings::Settings;

/// A host whose frame primitives are backed by one manually dispatched queue.
struct QueueHost {
    offered: Vec<FramePrimitive>,
    frames: FrameQueue,
}

impl QueueHost {
    fn offering(offered: &[FramePrimitive]) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            offered: offered.to_vec(),
            frames: FrameQueue::new(),
        }
    }
}

impl Host for QueueHost {
    fn name(&self) -> &'static str {
        "queue"
    }

    fn frame_primitive(&self, primitive: FramePrimitive) -> Option<RequestFrameFn> {
        self.offered
            .contains(&primitive)
            .then(|| self.frames.request_fn())
    }

    fn native_surface(&self) -> Option<SurfaceConstructor> {
        None
    }
}

fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    (Arc::clone(&count), count)
}

// ============================================================================
// Probing
// ============================================================================

#[test]
fn unprefixed_primitive_wins() {
    let host = QueueHost::offering(&FramePrimitive::PROBE_ORDER);
    let scheduler = FrameScheduler::setup(&host, &Settings::default()).unwrap();
    assert_eq!(
        scheduler.binding(),
        FrameBinding::Primitive(FramePrimitive::AnimationFrame)
    );
}

#[test]
fn vendor_variant_is_found_when_alone() {
    let host = QueueHost::offering(&[
        FramePrimitive::MsAnimationFrame,
        FramePrimitive::MozAnimationFrame,
    ]);
    let scheduler = FrameScheduler::setup(&host, &Settings::default()).unwrap();
    assert_eq!(
        scheduler.binding(),
        FrameBinding::Primitive(FramePrimitive::MozAnimationFrame)
    );
}

#[test]
fn headless_host_binds_timer() {
    let _ = env_logger::builder().is_test(true).try_init();
    let scheduler = FrameScheduler::setup(&HeadlessHost, &Settings::default()).unwrap();
    assert_eq!(
        scheduler.binding(),
        FrameBinding::Timer(Settings::default().fallback_frame_interval())
    );
}

#[test]
fn probing_can_be_disabled() {
    let host = QueueHost::offering(&FramePrimitive::PROBE_ORDER);
    let settings = Settings {
        probe_frame_primitives: false,
        ..Default::default()
    };
    let scheduler = FrameScheduler::setup(&host, &settings).unwrap();
    assert!(matches!(scheduler.binding(), FrameBinding::Timer(_)));
}

// ============================================================================
// Primitive-backed Requests
// ============================================================================

#[test]
fn primitive_runs_callback_once_after_return() {
    let host = QueueHost::offering(&[FramePrimitive::AnimationFrame]);
    let scheduler = FrameScheduler::setup(&host, &Settings::default()).unwrap();
    let (runs, seen) = counter();

    scheduler.request_frame(move || {
        runs.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(seen.load(Ordering::SeqCst), 0);

    assert_eq!(host.frames.dispatch(), 1);
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    assert_eq!(host.frames.dispatch(), 0);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn primitive_requests_run_in_order() {
    let host = QueueHost::offering(&[FramePrimitive::AnimationFrame]);
    let scheduler = FrameScheduler::setup(&host, &Settings::default()).unwrap();
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    for i in 0..3 {
        let order = Arc::clone(&order);
        scheduler.request_frame(move || order.lock().push(i));
    }
    host.frames.dispatch();

    assert_eq!(*order.lock(), [0, 1, 2]);
}

#[test]
fn panicking_callback_does_not_stop_the_frame() {
    let host = QueueHost::offering(&[FramePrimitive::AnimationFrame]);
    let scheduler = FrameScheduler::setup(&host, &Settings::default()).unwrap();
    let (runs, seen) = counter();

    scheduler.request_frame(|| panic!("callback failure"));
    scheduler.request_frame(move || {
        runs.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(host.frames.dispatch(), 2);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Timer Fallback
// ============================================================================

#[test]
fn timer_runs_callback_once_after_interval() {
    let _ = env_logger::builder().is_test(true).try_init();
    let scheduler = FrameScheduler::setup(&HeadlessHost, &Settings::default()).unwrap();
    let (tx, rx) = mpsc::channel();

    let requested = Instant::now();
    scheduler.request_frame(move || {
        let _ = tx.send(Instant::now());
    });

    let fired = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    let elapsed = fired.duration_since(requested);
    assert!(elapsed >= Duration::from_micros(16_666), "fired after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(1), "fired after {elapsed:?}");

    // The sender was moved into the callback; it is gone once the callback ran.
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn timer_honours_custom_rate() {
    let _ = env_logger::builder().is_test(true).try_init();
    let settings = Settings {
        fallback_frame_rate: 10.0,
        ..Default::default()
    };
    let scheduler = FrameScheduler::setup(&HeadlessHost, &settings).unwrap();
    assert_eq!(
        scheduler.binding(),
        FrameBinding::Timer(Duration::from_millis(100))
    );

    let (tx, rx) = mpsc::channel();
    let requested = Instant::now();
    scheduler.request_frame(move || {
        let _ = tx.send(Instant::now());
    });

    let fired = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(fired.duration_since(requested) >= Duration::from_millis(100));
}

#[test]
fn pending_timer_callbacks_fire_after_scheduler_drop() {
    let _ = env_logger::builder().is_test(true).try_init();
    let scheduler = FrameScheduler::setup(&HeadlessHost, &Settings::default()).unwrap();
    let (tx, rx) = mpsc::channel();

    scheduler.request_frame(move || {
        let _ = tx.send(());
    });
    drop(scheduler);

    assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
}

// ============================================================================
// Process-wide Scheduler
// ============================================================================

#[test]
fn process_wide_request_frame_uses_installed_binding() {
    let _ = env_logger::builder().is_test(true).try_init();
    let binding = frame::setup_request_frame(&HeadlessHost, &Settings::default()).unwrap();
    assert!(matches!(binding, FrameBinding::Timer(_)));

    let (tx, rx) = mpsc::channel();
    frame::request_frame(move || {
        let _ = tx.send(());
    });
    assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
}
