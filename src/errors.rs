//! Error Types
//!
//! This module defines the error types used throughout the toolkit.
//!
//! # Overview
//!
//! Registry bookkeeping never fails: undefined ids and names are treated as
//! "absent" and skipped. [`KineticError`] only covers the operations that talk
//! to the hosting environment or validate caller input:
//! - Surface construction and export
//! - Scene hierarchy misuse
//! - Background timer and event loop setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use kinetic::errors::Result;
//!
//! fn snapshot(canvas: &kinetic::canvas::Canvas) -> Result<String> {
//!     canvas.to_data_url(None)
//! }
//! ```

use thiserror::Error;

/// The main error type for the toolkit.
#[derive(Error, Debug)]
pub enum KineticError {
    // ========================================================================
    // Surface Errors
    // ========================================================================
    /// The host failed to construct a drawable surface.
    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    /// The surface does not support the requested operation.
    #[error("Unsupported surface operation: {0}")]
    Unsupported(String),

    /// Encoding the surface contents failed.
    #[error("Image encode error: {0}")]
    ImageEncode(String),

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// A node was attached somewhere it cannot live.
    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    // ========================================================================
    // Platform Errors
    // ========================================================================
    /// I/O error (e.g. spawning the frame timer thread).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    /// WASM-specific error.
    #[cfg(target_arch = "wasm32")]
    #[error("WASM error: {0}")]
    WasmError(String),
}

impl From<image::ImageError> for KineticError {
    fn from(err: image::ImageError) -> Self {
        KineticError::ImageEncode(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for KineticError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        KineticError::WasmError(format!("{value:?}"))
    }
}

/// Alias for `Result<T, KineticError>`.
pub type Result<T> = std::result::Result<T, KineticError>;
