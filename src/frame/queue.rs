use std::sync::Arc;

use parking_lot::Mutex;

use super::{FrameCallback, RequestFrameFn, bind_request_fn, run_callback};

type Waker = Arc<dyn Fn() + Send + Sync>;

/// FIFO of frame callbacks flushed once per frame.
///
/// [`push`](Self::push) queues a callback and pokes the optional waker (for a
/// window, a redraw request). Whoever owns the display tick then calls
/// [`dispatch`](Self::dispatch), which runs everything queued so far.
/// Callbacks queued while a dispatch runs wait for the next one, so an
/// animation loop that re-requests itself from its callback advances one step
/// per frame.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct FrameQueue {
    pending: Arc<Mutex<Vec<FrameCallback>>>,
    waker: Option<Waker>,
}

impl std::fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending.lock().len())
            .field("waker", &self.waker.is_some())
            .finish()
    }
}

impl FrameQueue {
    /// Creates a queue without a waker; frames only advance on explicit
    /// [`dispatch`](Self::dispatch) calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue that calls `waker` every time a callback is queued.
    #[must_use]
    pub fn with_waker(waker: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            pending: Arc::default(),
            waker: Some(Arc::new(waker)),
        }
    }

    pub fn push(&self, callback: FrameCallback) {
        self.pending.lock().push(callback);
        if let Some(waker) = &self.waker {
            waker();
        }
    }

    /// Returns a request function that queues onto this queue.
    #[must_use]
    pub fn request_fn(&self) -> RequestFrameFn {
        let queue = self.clone();
        bind_request_fn(move |callback| queue.push(callback))
    }

    /// Runs every callback queued before this call, in order.
    ///
    /// Returns how many ran.
    pub fn dispatch(&self) -> usize {
        // Release the lock before running: callbacks may queue the next frame.
        let batch = std::mem::take(&mut *self.pending.lock());
        let count = batch.len();
        for callback in batch {
            run_callback(callback);
        }
        count
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}
