//! Drawable Surfaces
//!
//! Stages and layers draw onto a [`Canvas`] obtained from a
//! [`CanvasFactory`]. The factory is resolved once against a [`Host`]:
//!
//! - **Windowed host**: the host's native surface constructor is called and
//!   its result is returned unmodified as [`Canvas::Native`].
//! - **Headless host**: a [`SoftwareCanvas`] is created and wrapped in a
//!   [`HeadlessCanvas`] adapter, returned as [`Canvas::Headless`].
//!
//! Either way, callers only see the [`Surface`] interface, the fixed set of
//! members the toolkit actually uses.
//!
//! # Backend Access
//!
//! ```rust,ignore
//! let canvas = factory.create_canvas()?;
//! if let Some(headless) = canvas.as_headless() {
//!     let png = headless.encode(ExportFormat::Png)?;
//! }
//! ```

mod headless;
mod software;
mod style;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::errors::Result;
use crate::host::{self, Host};
use crate::settings::Settings;

pub use headless::HeadlessCanvas;
pub use software::{ExportFormat, SoftwareCanvas};
pub use style::CanvasStyle;

/// The members of a drawable surface the toolkit relies on.
pub trait Surface: fmt::Debug {
    /// Width in pixels.
    fn width(&self) -> u32;

    fn set_width(&mut self, width: u32);

    /// Height in pixels.
    fn height(&self) -> u32;

    fn set_height(&mut self, height: u32);

    /// Sets both dimensions.
    fn set_size(&mut self, width: u32, height: u32) {
        self.set_width(width);
        self.set_height(height);
    }

    /// Reads an inline style property.
    fn style_property(&self, name: &str) -> Option<String>;

    fn set_style_property(&mut self, name: &str, value: &str);

    /// Removes an inline style property, returning its previous value.
    fn remove_style_property(&mut self, name: &str) -> Option<String>;

    /// Exports the surface contents as a `data:` URL.
    ///
    /// `mime_type` defaults to `image/png`.
    fn to_data_url(&self, mime_type: Option<&str>) -> Result<String>;

    /// Returns the concrete surface as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Constructs a native surface.
pub type SurfaceConstructor = Rc<dyn Fn() -> Result<Box<dyn Surface>>>;

// ============================================================================
// Canvas
// ============================================================================

/// A surface handle, as returned by [`CanvasFactory::create_canvas`].
#[derive(Debug)]
pub enum Canvas {
    /// The windowed host's own surface, untouched.
    Native(Box<dyn Surface>),
    /// A software canvas behind the headless adapter.
    Headless(HeadlessCanvas),
}

impl Canvas {
    #[must_use]
    pub fn is_headless(&self) -> bool {
        matches!(self, Self::Headless(_))
    }

    #[must_use]
    pub fn as_headless(&self) -> Option<&HeadlessCanvas> {
        match self {
            Self::Headless(canvas) => Some(canvas),
            Self::Native(_) => None,
        }
    }

    pub fn as_headless_mut(&mut self) -> Option<&mut HeadlessCanvas> {
        match self {
            Self::Headless(canvas) => Some(canvas),
            Self::Native(_) => None,
        }
    }

    fn surface(&self) -> &dyn Surface {
        match self {
            Self::Native(surface) => surface.as_ref(),
            Self::Headless(canvas) => canvas,
        }
    }

    fn surface_mut(&mut self) -> &mut dyn Surface {
        match self {
            Self::Native(surface) => surface.as_mut(),
            Self::Headless(canvas) => canvas,
        }
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.surface().width()
    }

    fn set_width(&mut self, width: u32) {
        self.surface_mut().set_width(width);
    }

    fn height(&self) -> u32 {
        self.surface().height()
    }

    fn set_height(&mut self, height: u32) {
        self.surface_mut().set_height(height);
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.surface().style_property(name)
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        self.surface_mut().set_style_property(name, value);
    }

    fn remove_style_property(&mut self, name: &str) -> Option<String> {
        self.surface_mut().remove_style_property(name)
    }

    fn to_data_url(&self, mime_type: Option<&str>) -> Result<String> {
        self.surface().to_data_url(mime_type)
    }

    fn as_any(&self) -> &dyn Any {
        self.surface().as_any()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self.surface_mut().as_any_mut()
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Which kind of canvas a [`CanvasFactory`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasMode {
    Windowed,
    Headless,
}

/// A resolved surface construction strategy.
#[derive(Clone)]
pub struct CanvasFactory {
    create: Rc<dyn Fn() -> Result<Canvas>>,
    mode: CanvasMode,
}

impl fmt::Debug for CanvasFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasFactory")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl CanvasFactory {
    /// Resolves the construction strategy for `host`.
    #[must_use]
    pub fn setup(host: &dyn Host, settings: &Settings) -> Self {
        if let Some(construct) = host.native_surface() {
            log::debug!("{}: canvases are native surfaces", host.name());
            return Self {
                create: Rc::new(move || construct().map(Canvas::Native)),
                mode: CanvasMode::Windowed,
            };
        }

        let (width, height) = (settings.canvas_width, settings.canvas_height);
        log::debug!(
            "{}: canvases are headless ({width}x{height} software)",
            host.name()
        );
        Self {
            create: Rc::new(move || {
                Ok(Canvas::Headless(HeadlessCanvas::new(SoftwareCanvas::new(
                    width, height,
                ))))
            }),
            mode: CanvasMode::Headless,
        }
    }

    /// Creates a new surface.
    pub fn create_canvas(&self) -> Result<Canvas> {
        (self.create)()
    }

    #[must_use]
    pub fn mode(&self) -> CanvasMode {
        self.mode
    }
}

// ============================================================================
// Process-wide factory
// ============================================================================

thread_local! {
    static ACTIVE: RefCell<Option<CanvasFactory>> = const { RefCell::new(None) };
}

/// Resolves the process-wide factory against `host`, replacing any previous
/// one.
pub fn setup_create_canvas(host: &dyn Host, settings: &Settings) -> CanvasMode {
    let factory = CanvasFactory::setup(host, settings);
    let mode = factory.mode();
    ACTIVE.with(|active| *active.borrow_mut() = Some(factory));
    mode
}

/// Installs an already resolved factory as the process-wide one.
pub fn install_factory(factory: &CanvasFactory) {
    ACTIVE.with(|active| *active.borrow_mut() = Some(factory.clone()));
}

/// Creates a surface with the process-wide factory, resolving it against
/// [`default_host`](crate::host::default_host) on first use.
pub fn create_canvas() -> Result<Canvas> {
    let factory = ACTIVE.with(|active| {
        active
            .borrow_mut()
            .get_or_insert_with(|| {
                CanvasFactory::setup(host::default_host().as_ref(), &Settings::default())
            })
            .clone()
    });
    factory.create_canvas()
}
