//! Toolkit Core Module
//!
//! This module contains [`Toolkit`], the explicit context object that owns
//! everything the process-wide functions in [`frame`](crate::frame) and
//! [`canvas`](crate::canvas) keep globally. It holds no window management
//! logic, so it can be driven by any [`Host`].
//!
//! # Architecture
//!
//! - **Registry**: ids, names, stages and hit colours of the scene graph
//! - **Frames**: the [`FrameScheduler`] resolved against the host
//! - **Canvases**: the [`CanvasFactory`] resolved against the host
//!
//! # Example
//!
//! ```rust,ignore
//! use kinetic::{HeadlessHost, Node, NodeConfig, Toolkit};
//!
//! let toolkit = Toolkit::builder().build(&HeadlessHost)?;
//! let stage = Node::stage(&toolkit, NodeConfig::new().with_id("main"))?;
//!
//! toolkit.request_frame(|| log::info!("tick"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::{self, Canvas, CanvasFactory};
use crate::drag::DragAndDrop;
use crate::errors::Result;
use crate::frame::{self, FrameScheduler, MaybeSend};
use crate::host::Host;
use crate::registry::GlobalRegistry;
use crate::scene::{Node, SharedRegistry};
use crate::settings::Settings;

/// The toolkit context: registry plus the host bindings resolved once at
/// construction.
///
/// # Lifecycle
///
/// 1. Configure with [`Toolkit::builder`]
/// 2. Resolve against a host with [`ToolkitBuilder::build`]
/// 3. Create nodes with [`Node::stage`], [`Node::layer`] and friends
pub struct Toolkit {
    registry: SharedRegistry,
    frames: FrameScheduler,
    canvases: CanvasFactory,
    settings: Settings,
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit")
            .field("registry", &self.registry.borrow())
            .field("frames", &self.frames)
            .field("canvases", &self.canvases)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Toolkit {
    #[must_use]
    pub fn builder() -> ToolkitBuilder {
        ToolkitBuilder::default()
    }

    /// The shared node registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    #[inline]
    #[must_use]
    pub fn canvases(&self) -> &CanvasFactory {
        &self.canvases
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Schedules `callback` to run once at the next repaint opportunity.
    pub fn request_frame(&self, callback: impl FnOnce() + MaybeSend + 'static) {
        self.frames.request_frame(callback);
    }

    /// Creates a surface with this toolkit's factory.
    pub fn create_canvas(&self) -> Result<Canvas> {
        self.canvases.create_canvas()
    }

    /// The stages created with this toolkit, in creation order.
    #[must_use]
    pub fn stages(&self) -> Vec<Node> {
        self.registry.borrow().stages().to_vec()
    }

    /// Resolves `#id` or `.name` across the whole scene graph.
    #[must_use]
    pub fn find(&self, selector: &str) -> Vec<Node> {
        self.registry.borrow().find(selector)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.registry.borrow().is_dragging()
    }

    #[must_use]
    pub fn is_drag_ready(&self) -> bool {
        self.registry.borrow().is_drag_ready()
    }

    /// Makes this toolkit's bindings the ones behind
    /// [`frame::request_frame`] and [`canvas::create_canvas`].
    pub fn install_process_wide(&self) {
        frame::install_scheduler(&self.frames);
        canvas::install_factory(&self.canvases);
    }
}

/// Configures a [`Toolkit`] before it is resolved against a host.
#[derive(Default)]
pub struct ToolkitBuilder {
    settings: Settings,
    drag_and_drop: Option<Rc<dyn DragAndDrop>>,
}

impl ToolkitBuilder {
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Supplies the drag-and-drop capability the registry queries.
    #[must_use]
    pub fn with_drag_and_drop(mut self, drag_and_drop: Rc<dyn DragAndDrop>) -> Self {
        self.drag_and_drop = Some(drag_and_drop);
        self
    }

    /// Probes `host` and builds the toolkit.
    ///
    /// # Errors
    ///
    /// Fails if the frame timer fallback is needed and cannot be started.
    pub fn build(self, host: &dyn Host) -> Result<Toolkit> {
        let frames = FrameScheduler::setup(host, &self.settings)?;
        let canvases = CanvasFactory::setup(host, &self.settings);

        log::info!(
            "toolkit ready on {} host: frames {:?}, canvases {:?}",
            host.name(),
            frames.binding(),
            canvases.mode()
        );

        let registry = GlobalRegistry::new(self.drag_and_drop)
            .with_dbl_click_window(self.settings.dbl_click_window);

        Ok(Toolkit {
            registry: Rc::new(RefCell::new(registry)),
            frames,
            canvases,
            settings: self.settings,
        })
    }
}
