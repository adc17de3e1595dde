//! Hosting Environments
//!
//! A [`Host`] is what the toolkit probes at startup: which frame-sync
//! primitives exist, and whether there is a native surface constructor. The
//! answers are turned into a [`FrameScheduler`](crate::frame::FrameScheduler)
//! and a [`CanvasFactory`](crate::canvas::CanvasFactory) once, then never
//! consulted again.
//!
//! Provided hosts:
//!
//! - [`HeadlessHost`]: no windowing system. Frames fall back to the timer,
//!   canvases are software-backed.
//! - [`winit::WinitHost`] (feature `winit`): a native window. Frames follow
//!   the window's redraw requests.
//! - [`web::WebHost`] (`wasm32`): a browser page.

#[cfg(target_arch = "wasm32")]
pub mod web;
#[cfg(feature = "winit")]
pub mod winit;

use crate::canvas::SurfaceConstructor;
use crate::frame::{FramePrimitive, RequestFrameFn};

/// Capabilities of the environment the toolkit runs in.
pub trait Host {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Returns a request function for `primitive`, if the environment has it.
    fn frame_primitive(&self, primitive: FramePrimitive) -> Option<RequestFrameFn>;

    /// Returns the native surface constructor, or `None` when there is no
    /// windowing system.
    fn native_surface(&self) -> Option<SurfaceConstructor>;
}

/// Environment without a windowing system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl Host for HeadlessHost {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn frame_primitive(&self, _primitive: FramePrimitive) -> Option<RequestFrameFn> {
        None
    }

    fn native_surface(&self) -> Option<SurfaceConstructor> {
        None
    }
}

/// The host the process-wide scheduler and factory bind to when nobody set
/// them up explicitly: the browser page when there is one, otherwise headless.
#[must_use]
pub fn default_host() -> Box<dyn Host> {
    #[cfg(target_arch = "wasm32")]
    if let Some(host) = web::WebHost::from_global() {
        return Box::new(host);
    }
    Box::new(HeadlessHost)
}
