//! Toolkit Settings
//!
//! [`Settings`] gathers the few tunables the support layer needs when it
//! resolves its strategies against a host.
//!
//! ```rust,ignore
//! use kinetic::settings::Settings;
//!
//! // Force the timer fallback and render into 640×480 headless canvases.
//! let settings = Settings {
//!     probe_frame_primitives: false,
//!     canvas_width: 640,
//!     canvas_height: 480,
//!     ..Default::default()
//! };
//! ```

use std::time::Duration;

/// Rate used when no frame-sync primitive is available.
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// Configuration for a [`Toolkit`](crate::toolkit::Toolkit).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Frames per second of the fixed-rate timer fallback.
    ///
    /// Non-positive or non-finite values fall back to [`DEFAULT_FRAME_RATE`].
    pub fallback_frame_rate: f64,

    /// Probe the host for frame-sync primitives.
    ///
    /// When `false` the scheduler binds the timer fallback directly, even if
    /// the host offers a display-synchronized primitive.
    pub probe_frame_primitives: bool,

    /// Initial width of headless canvases, in pixels.
    pub canvas_width: u32,

    /// Initial height of headless canvases, in pixels.
    pub canvas_height: u32,

    /// Maximum delay between two clicks that still counts as a double click.
    pub dbl_click_window: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fallback_frame_rate: DEFAULT_FRAME_RATE,
            probe_frame_primitives: true,
            // Same defaults as an HTML <canvas> element.
            canvas_width: 300,
            canvas_height: 150,
            dbl_click_window: Duration::from_millis(400),
        }
    }
}

impl Settings {
    /// Returns the interval of the timer fallback (`1000 / rate` ms).
    #[must_use]
    pub fn fallback_frame_interval(&self) -> Duration {
        let rate = if self.fallback_frame_rate.is_finite() && self.fallback_frame_rate > 0.0 {
            self.fallback_frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };
        Duration::from_secs_f64(1.0 / rate)
    }
}
