//! CPU-side canvas used when there is no windowing system.

use std::fmt;
use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use super::CanvasStyle;
use crate::errors::Result;

/// Encodings supported by [`SoftwareCanvas::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Maps a MIME type onto a format. Unknown or missing types fall back to
    /// PNG, the way `HTMLCanvasElement.toDataURL` does.
    #[must_use]
    pub fn from_mime(mime_type: Option<&str>) -> Self {
        match mime_type.map(str::trim) {
            Some(mime) if mime.eq_ignore_ascii_case("image/jpeg") => Self::Jpeg,
            _ => Self::Png,
        }
    }

    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// An RGBA8 pixel buffer with the size semantics of an HTML canvas: assigning
/// either dimension reallocates the buffer and clears it to transparent black,
/// even when the value does not change.
pub struct SoftwareCanvas {
    pixels: RgbaImage,
    style: Option<CanvasStyle>,
}

impl fmt::Debug for SoftwareCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareCanvas")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("style", &self.style)
            .finish()
    }
}

impl SoftwareCanvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            style: None,
        }
    }

    /// Attaches an inline style to the canvas.
    #[must_use]
    pub fn with_style(mut self, style: CanvasStyle) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn style(&self) -> Option<&CanvasStyle> {
        self.style.as_ref()
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn set_width(&mut self, width: u32) {
        self.pixels = RgbaImage::new(width, self.pixels.height());
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn set_height(&mut self, height: u32) {
        self.pixels = RgbaImage::new(self.pixels.width(), height);
    }

    /// The pixel at `(x, y)`, or `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|px| px.0)
    }

    /// Writes one pixel. Returns `false` if `(x, y)` is outside the canvas.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> bool {
        match self.pixels.get_pixel_mut_checked(x, y) {
            Some(px) => {
                *px = Rgba(rgba);
                true
            }
            None => false,
        }
    }

    /// Fills the whole canvas with one colour.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.pixels.pixels_mut() {
            *px = Rgba(rgba);
        }
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.fill([0, 0, 0, 0]);
    }

    /// Raw RGBA8 bytes, row-major.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        match format {
            ExportFormat::Png => self.pixels.write_to(&mut bytes, ImageFormat::Png)?,
            // JPEG has no alpha channel.
            ExportFormat::Jpeg => DynamicImage::ImageRgba8(self.pixels.clone())
                .to_rgb8()
                .write_to(&mut bytes, ImageFormat::Jpeg)?,
        }
        Ok(bytes.into_inner())
    }

    /// Encodes the canvas as a `data:` URL.
    ///
    /// A canvas with no pixels yields `"data:,"`.
    pub fn to_data_url(&self, mime_type: Option<&str>) -> Result<String> {
        if self.pixels.width() == 0 || self.pixels.height() == 0 {
            return Ok("data:,".to_owned());
        }
        let format = ExportFormat::from_mime(mime_type);
        let bytes = self.encode(format)?;
        Ok(format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes)))
    }
}
