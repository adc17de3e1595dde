//! Winit-based Host
//!
//! Hosts the toolkit in a native [winit](https://crates.io/crates/winit)
//! window.
//!
//! - **Frames**: `requestAnimationFrame` is answered with a [`FrameQueue`]
//!   whose waker calls [`Window::request_redraw`]. The application flushes it
//!   from its `RedrawRequested` handler via [`WinitHost::dispatch_frame`], so
//!   callbacks run once per redraw, on the event loop thread.
//! - **Surfaces**: [`WindowSurface`]s sized after the window's client area.
//!
//! # Usage
//!
//! ```rust,ignore
//! impl ApplicationHandler for Runner {
//!     fn resumed(&mut self, event_loop: &ActiveEventLoop) {
//!         let window = Arc::new(event_loop.create_window(Window::default_attributes())?);
//!         let host = WinitHost::new(window);
//!         self.toolkit = Some(Toolkit::builder().build(&host)?);
//!         self.host = Some(host);
//!     }
//!
//!     fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
//!         if let WindowEvent::RedrawRequested = event
//!             && let Some(host) = &self.host
//!         {
//!             host.dispatch_frame();
//!         }
//!     }
//! }
//! ```

use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

use winit::dpi::PhysicalSize;
pub use winit::window::Window;

use super::Host;
use crate::canvas::{CanvasStyle, Surface, SurfaceConstructor};
use crate::errors::{KineticError, Result};
use crate::frame::{FramePrimitive, FrameQueue, RequestFrameFn};

/// A native window as hosting environment.
#[derive(Debug)]
pub struct WinitHost {
    window: Arc<Window>,
    frames: FrameQueue,
}

impl WinitHost {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        let redraw_target = Arc::clone(&window);
        let frames = FrameQueue::with_waker(move || redraw_target.request_redraw());
        Self { window, frames }
    }

    #[must_use]
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// The queue behind the redraw-driven primitive.
    #[must_use]
    pub fn frames(&self) -> &FrameQueue {
        &self.frames
    }

    /// Runs the callbacks waiting for this frame. Call from
    /// `WindowEvent::RedrawRequested`.
    pub fn dispatch_frame(&self) -> usize {
        self.frames.dispatch()
    }
}

impl Host for WinitHost {
    fn name(&self) -> &'static str {
        "winit"
    }

    fn frame_primitive(&self, primitive: FramePrimitive) -> Option<RequestFrameFn> {
        match primitive {
            FramePrimitive::AnimationFrame => Some(self.frames.request_fn()),
            _ => None,
        }
    }

    fn native_surface(&self) -> Option<SurfaceConstructor> {
        let window = Arc::clone(&self.window);
        Some(Rc::new(move || {
            Ok(Box::new(WindowSurface::new(Arc::clone(&window))) as Box<dyn Surface>)
        }))
    }
}

/// A surface that covers a window's client area.
///
/// Size writes become inner-size requests; the window manager may adjust
/// them, so reads always report the actual inner size.
#[derive(Debug)]
pub struct WindowSurface {
    window: Arc<Window>,
    style: CanvasStyle,
}

impl WindowSurface {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            style: CanvasStyle::new(),
        }
    }

    #[must_use]
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    fn request_size(&self, width: u32, height: u32) {
        if let Some(actual) = self
            .window
            .request_inner_size(PhysicalSize::new(width, height))
        {
            log::debug!(
                "window resized immediately to {}x{}",
                actual.width,
                actual.height
            );
        }
    }
}

impl Surface for WindowSurface {
    fn width(&self) -> u32 {
        self.window.inner_size().width
    }

    fn set_width(&mut self, width: u32) {
        self.request_size(width, self.height());
    }

    fn height(&self) -> u32 {
        self.window.inner_size().height
    }

    fn set_height(&mut self, height: u32) {
        self.request_size(self.width(), height);
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.style.get(name).map(str::to_owned)
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        self.style.set(name, value);
    }

    fn remove_style_property(&mut self, name: &str) -> Option<String> {
        self.style.remove(name)
    }

    fn to_data_url(&self, _mime_type: Option<&str>) -> Result<String> {
        Err(KineticError::Unsupported(
            "window surfaces cannot be read back".into(),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
