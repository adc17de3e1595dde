//! Fixed-rate timer fallback.
//!
//! Used when the host has no frame-sync primitive. Each request fires its
//! callback once, one interval after the request was made.
//!
//! - Native: a dedicated thread holds a deadline heap fed through a `flume`
//!   channel. Dropping the last request function closes the channel; the
//!   thread then fires whatever is still pending and exits.
//! - `wasm32`: the JS global `setTimeout`.

use std::time::Duration;

use super::RequestFrameFn;
use crate::errors::Result;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn fixed_rate_timer(interval: Duration) -> Result<RequestFrameFn> {
    native::spawn(interval)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn fixed_rate_timer(interval: Duration) -> Result<RequestFrameFn> {
    Ok(web::bind(interval))
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cmp::{Ordering, Reverse};
    use std::collections::BinaryHeap;
    use std::thread;
    use std::time::{Duration, Instant};

    use flume::{Receiver, RecvTimeoutError};

    use super::super::{FrameCallback, RequestFrameFn, bind_request_fn, run_callback};
    use crate::errors::Result;

    struct Request {
        deadline: Instant,
        callback: FrameCallback,
    }

    struct Pending {
        deadline: Instant,
        seq: u64,
        callback: FrameCallback,
    }

    impl PartialEq for Pending {
        fn eq(&self, other: &Self) -> bool {
            self.cmp(other) == Ordering::Equal
        }
    }

    impl Eq for Pending {}

    impl PartialOrd for Pending {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Pending {
        fn cmp(&self, other: &Self) -> Ordering {
            (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
        }
    }

    pub(super) fn spawn(interval: Duration) -> Result<RequestFrameFn> {
        let (sender, receiver) = flume::unbounded::<Request>();

        thread::Builder::new()
            .name("kinetic-frame-timer".into())
            .spawn(move || run(&receiver))?;

        log::debug!("frame timer started ({interval:?} interval)");

        Ok(bind_request_fn(move |callback| {
            let request = Request {
                deadline: Instant::now() + interval,
                callback,
            };
            if sender.send(request).is_err() {
                log::error!("frame timer thread is gone; callback dropped");
            }
        }))
    }

    fn run(receiver: &Receiver<Request>) {
        let mut heap: BinaryHeap<Reverse<Pending>> = BinaryHeap::new();
        let mut seq = 0_u64;
        let mut open = true;

        while open || !heap.is_empty() {
            let next_deadline = heap.peek().map(|Reverse(pending)| pending.deadline);

            let received = match (open, next_deadline) {
                (true, Some(deadline)) => match receiver.recv_deadline(deadline) {
                    Ok(request) => Some(request),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => {
                        open = false;
                        None
                    }
                },
                (true, None) => {
                    if let Ok(request) = receiver.recv() {
                        Some(request)
                    } else {
                        open = false;
                        None
                    }
                }
                (false, Some(deadline)) => {
                    thread::sleep(deadline.saturating_duration_since(Instant::now()));
                    None
                }
                (false, None) => None,
            };

            if let Some(Request { deadline, callback }) = received {
                heap.push(Reverse(Pending {
                    deadline,
                    seq,
                    callback,
                }));
                seq += 1;
            }

            let now = Instant::now();
            while heap
                .peek()
                .is_some_and(|Reverse(pending)| pending.deadline <= now)
            {
                if let Some(Reverse(pending)) = heap.pop() {
                    run_callback(pending.callback);
                }
            }
        }

        log::debug!("frame timer stopped");
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::time::Duration;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;

    use super::super::{RequestFrameFn, bind_request_fn, run_callback};

    // Bound on the JS global so it also works where there is no `window`.
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = "setTimeout")]
        fn set_timeout(handler: &JsValue, timeout: f64) -> JsValue;
    }

    pub(super) fn bind(interval: Duration) -> RequestFrameFn {
        let millis = interval.as_secs_f64() * 1000.0;
        bind_request_fn(move |callback| {
            let handler = Closure::once_into_js(move || run_callback(callback));
            set_timeout(&handler, millis);
        })
    }
}
