//! Browser Host
//!
//! Frame primitives are looked up by name on `window`, so whichever of the
//! vendor-prefixed `requestAnimationFrame` variants the browser exposes is
//! found by the normal probe. Surfaces are `<canvas>` elements created on the
//! page's document.

use std::any::Any;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, HtmlCanvasElement, Window};

use super::Host;
use crate::canvas::{Surface, SurfaceConstructor};
use crate::errors::{KineticError, Result};
use crate::frame::{FramePrimitive, RequestFrameFn, bind_request_fn, run_callback};

/// A browser page as hosting environment.
#[derive(Debug, Clone)]
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// Returns `None` if the window has no document.
    #[must_use]
    pub fn new(window: Window) -> Option<Self> {
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// The global `window`, if running in a page.
    #[must_use]
    pub fn from_global() -> Option<Self> {
        web_sys::window().and_then(Self::new)
    }
}

impl Host for WebHost {
    fn name(&self) -> &'static str {
        "web"
    }

    fn frame_primitive(&self, primitive: FramePrimitive) -> Option<RequestFrameFn> {
        let value = Reflect::get(&self.window, &JsValue::from_str(primitive.name())).ok()?;
        let function = value.dyn_into::<Function>().ok()?;
        let window = self.window.clone();

        Some(bind_request_fn(move |callback| {
            let handler = Closure::once_into_js(move |_timestamp: f64| run_callback(callback));
            if let Err(err) = function.call1(&window, &handler) {
                log::error!("{primitive} failed: {err:?}");
            }
        }))
    }

    fn native_surface(&self) -> Option<SurfaceConstructor> {
        let document = self.document.clone();
        Some(Rc::new(move || {
            let element = document.create_element("canvas")?;
            let canvas = element.dyn_into::<HtmlCanvasElement>().map_err(|_| {
                KineticError::SurfaceCreation("created element is not a <canvas>".into())
            })?;
            Ok(Box::new(DomCanvas::new(canvas)) as Box<dyn Surface>)
        }))
    }
}

/// A `<canvas>` element.
#[derive(Debug, Clone)]
pub struct DomCanvas {
    element: HtmlCanvasElement,
}

impl DomCanvas {
    #[must_use]
    pub fn new(element: HtmlCanvasElement) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }
}

impl Surface for DomCanvas {
    fn width(&self) -> u32 {
        self.element.width()
    }

    fn set_width(&mut self, width: u32) {
        self.element.set_width(width);
    }

    fn height(&self) -> u32 {
        self.element.height()
    }

    fn set_height(&mut self, height: u32) {
        self.element.set_height(height);
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.element
            .style()
            .get_property_value(name)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        let _ = self.element.style().set_property(name, value);
    }

    fn remove_style_property(&mut self, name: &str) -> Option<String> {
        self.element
            .style()
            .remove_property(name)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn to_data_url(&self, mime_type: Option<&str>) -> Result<String> {
        let url = match mime_type {
            Some(mime) => self.element.to_data_url_with_type(mime)?,
            None => self.element.to_data_url()?,
        };
        Ok(url)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
