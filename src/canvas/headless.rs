use std::any::Any;

use super::software::{ExportFormat, SoftwareCanvas};
use super::{CanvasStyle, Surface};
use crate::errors::Result;

/// Adapter that gives a [`SoftwareCanvas`] the surface interface native
/// surfaces have.
///
/// Every member of the declared set reads and writes straight through to the
/// wrapped canvas; nothing is cached on the adapter except the inline style,
/// which a headless canvas has no element to hold. Formatting (`Debug`) is the
/// adapter's own.
#[derive(Debug)]
pub struct HeadlessCanvas {
    inner: SoftwareCanvas,
    /// Inline style; starts from the canvas' own style, or empty.
    pub style: CanvasStyle,
}

impl HeadlessCanvas {
    #[must_use]
    pub fn new(inner: SoftwareCanvas) -> Self {
        let style = inner.style().cloned().unwrap_or_default();
        Self { inner, style }
    }

    /// The wrapped implementation.
    #[must_use]
    pub fn inner(&self) -> &SoftwareCanvas {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut SoftwareCanvas {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> SoftwareCanvas {
        self.inner
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.inner.pixel(x, y)
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> bool {
        self.inner.put_pixel(x, y, rgba)
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        self.inner.fill(rgba);
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.inner.as_raw()
    }

    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>> {
        self.inner.encode(format)
    }
}

impl Surface for HeadlessCanvas {
    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn set_width(&mut self, width: u32) {
        self.inner.set_width(width);
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn set_height(&mut self, height: u32) {
        self.inner.set_height(height);
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

    fn to_data_url(&self, mime_type: Option<&str>) -> Result<String> {
        self.inner.to_data_url(mime_type)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
