//! Frame Scheduling
//!
//! [`FrameScheduler`] answers one question: "run this callback at the next
//! convenient repaint". The mechanism is chosen once, when the scheduler is
//! set up against a [`Host`]:
//!
//! 1. The host is probed for a frame-sync primitive, in the fixed order of
//!    [`FramePrimitive::PROBE_ORDER`]. The first one it offers is bound.
//! 2. Otherwise a fixed-rate timer (1000/60 ms by default) is bound. A
//!    headless host always ends up here.
//!
//! The resolved strategy is stored as a bound function value; requesting a
//! frame never re-probes the host.
//!
//! Whichever mechanism is bound, every request runs its callback exactly once
//! and never on the caller's stack frame. Ordering between two requests is
//! whatever the bound mechanism provides (FIFO for all built-in ones). There is
//! no cancellation; callers that need it track it themselves.
//!
//! # Process-wide scheduler
//!
//! [`setup_request_frame`] installs a scheduler for the whole process and
//! [`request_frame`] uses it. If nothing was installed, the first
//! [`request_frame`] call binds against [`default_host`](crate::host::default_host).
//!
//! ```rust,ignore
//! use kinetic::frame;
//!
//! frame::request_frame(|| {
//!     layer.draw();
//! });
//! ```

mod queue;
mod timer;

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use crate::errors::Result;
use crate::host::{self, Host};
use crate::settings::Settings;

pub use queue::FrameQueue;

// ============================================================================
// Callback types
// ============================================================================

/// A callback waiting for the next frame.
#[cfg(not(target_arch = "wasm32"))]
pub type FrameCallback = Box<dyn FnOnce() + Send + 'static>;
/// A callback waiting for the next frame.
#[cfg(target_arch = "wasm32")]
pub type FrameCallback = Box<dyn FnOnce() + 'static>;

/// A bound "request a frame" function.
#[cfg(not(target_arch = "wasm32"))]
pub type RequestFrameFn = std::sync::Arc<dyn Fn(FrameCallback) + Send + Sync>;
/// A bound "request a frame" function.
#[cfg(target_arch = "wasm32")]
pub type RequestFrameFn = std::rc::Rc<dyn Fn(FrameCallback)>;

/// `Send` on native targets, where callbacks may fire on a timer thread.
/// No bound at all on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send> MaybeSend for T {}

/// `Send` on native targets, where callbacks may fire on a timer thread.
/// No bound at all on `wasm32`.
#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSend for T {}

/// Wraps a closure into a [`RequestFrameFn`].
#[cfg(not(target_arch = "wasm32"))]
pub fn bind_request_fn(f: impl Fn(FrameCallback) + Send + Sync + 'static) -> RequestFrameFn {
    std::sync::Arc::new(f)
}

/// Wraps a closure into a [`RequestFrameFn`].
#[cfg(target_arch = "wasm32")]
pub fn bind_request_fn(f: impl Fn(FrameCallback) + 'static) -> RequestFrameFn {
    std::rc::Rc::new(f)
}

/// Runs a frame callback, containing a panic so the rest of the frame still
/// gets its turn.
pub(crate) fn run_callback(callback: FrameCallback) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        log::error!("frame callback panicked");
    }
}

// ============================================================================
// Primitives
// ============================================================================

/// Frame-sync primitives a host may offer, named after the browser APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePrimitive {
    AnimationFrame,
    WebkitAnimationFrame,
    MozAnimationFrame,
    OAnimationFrame,
    MsAnimationFrame,
}

impl FramePrimitive {
    /// The order in which hosts are probed.
    pub const PROBE_ORDER: [Self; 5] = [
        Self::AnimationFrame,
        Self::WebkitAnimationFrame,
        Self::MozAnimationFrame,
        Self::OAnimationFrame,
        Self::MsAnimationFrame,
    ];

    /// The global function name of the primitive.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AnimationFrame => "requestAnimationFrame",
            Self::WebkitAnimationFrame => "webkitRequestAnimationFrame",
            Self::MozAnimationFrame => "mozRequestAnimationFrame",
            Self::OAnimationFrame => "oRequestAnimationFrame",
            Self::MsAnimationFrame => "msRequestAnimationFrame",
        }
    }
}

impl fmt::Display for FramePrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a [`FrameScheduler`] ended up bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBinding {
    /// A display-synchronized primitive of the host.
    Primitive(FramePrimitive),
    /// The fixed-rate timer fallback, with its interval.
    Timer(Duration),
}

// ============================================================================
// Scheduler
// ============================================================================

/// A resolved frame-scheduling strategy.
///
/// Cloning shares the binding.
#[derive(Clone)]
pub struct FrameScheduler {
    request: RequestFrameFn,
    binding: FrameBinding,
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl FrameScheduler {
    /// Probes `host` and binds the first available mechanism.
    ///
    /// # Errors
    ///
    /// Fails only if the timer fallback is needed and its thread cannot be
    /// started.
    pub fn setup(host: &dyn Host, settings: &Settings) -> Result<Self> {
        if settings.probe_frame_primitives {
            for primitive in FramePrimitive::PROBE_ORDER {
                if let Some(request) = host.frame_primitive(primitive) {
                    log::debug!("{}: frames bound to {primitive}", host.name());
                    return Ok(Self {
                        request,
                        binding: FrameBinding::Primitive(primitive),
                    });
                }
            }
        }

        let interval = settings.fallback_frame_interval();
        log::debug!("{}: frames bound to {interval:?} timer", host.name());
        Ok(Self {
            request: timer::fixed_rate_timer(interval)?,
            binding: FrameBinding::Timer(interval),
        })
    }

    /// Schedules `callback` to run once at the next repaint opportunity.
    pub fn request_frame(&self, callback: impl FnOnce() + MaybeSend + 'static) {
        (self.request)(Box::new(callback));
    }

    #[must_use]
    pub fn binding(&self) -> FrameBinding {
        self.binding
    }

    /// The bound request function.
    #[must_use]
    pub fn request_fn(&self) -> RequestFrameFn {
        self.request.clone()
    }
}

// ============================================================================
// Process-wide binding
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
static ACTIVE: parking_lot::RwLock<Option<FrameScheduler>> = parking_lot::const_rwlock(None);

#[cfg(target_arch = "wasm32")]
thread_local! {
    static ACTIVE: std::cell::RefCell<Option<FrameScheduler>> = const { std::cell::RefCell::new(None) };
}

#[cfg(not(target_arch = "wasm32"))]
fn active_request() -> Option<RequestFrameFn> {
    ACTIVE.read().as_ref().map(FrameScheduler::request_fn)
}

#[cfg(target_arch = "wasm32")]
fn active_request() -> Option<RequestFrameFn> {
    ACTIVE.with(|active| active.borrow().as_ref().map(FrameScheduler::request_fn))
}

#[cfg(not(target_arch = "wasm32"))]
fn install(scheduler: FrameScheduler) {
    *ACTIVE.write() = Some(scheduler);
}

#[cfg(target_arch = "wasm32")]
fn install(scheduler: FrameScheduler) {
    ACTIVE.with(|active| *active.borrow_mut() = Some(scheduler));
}

/// Binds the process-wide scheduler against `host`, replacing any previous
/// binding. Callbacks already handed to the previous binding still fire.
///
/// Not meant to be called concurrently.
pub fn setup_request_frame(host: &dyn Host, settings: &Settings) -> Result<FrameBinding> {
    let scheduler = FrameScheduler::setup(host, settings)?;
    let binding = scheduler.binding();
    install(scheduler);
    Ok(binding)
}

/// Installs an already resolved scheduler as the process-wide one.
pub fn install_scheduler(scheduler: &FrameScheduler) {
    install(scheduler.clone());
}

/// Schedules `callback` on the process-wide scheduler.
pub fn request_frame(callback: impl FnOnce() + MaybeSend + 'static) {
    let request = match active_request() {
        Some(request) => request,
        None => {
            let host = host::default_host();
            if let Err(err) = setup_request_frame(host.as_ref(), &Settings::default()) {
                log::error!("could not bind a frame scheduler: {err}");
                return;
            }
            let Some(request) = active_request() else {
                return;
            };
            request
        }
    };
    request(Box::new(callback));
}
