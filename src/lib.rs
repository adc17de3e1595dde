#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod canvas;
pub mod drag;
pub mod errors;
pub mod frame;
pub mod host;
pub mod registry;
pub mod scene;
pub mod settings;
pub mod toolkit;

pub use canvas::{Canvas, CanvasFactory, CanvasMode, HeadlessCanvas, SoftwareCanvas, Surface, create_canvas, setup_create_canvas};
pub use drag::DragAndDrop;
#[cfg(feature = "drag-and-drop")]
pub use drag::DragState;
pub use errors::{KineticError, Result};
pub use frame::{FrameBinding, FramePrimitive, FrameScheduler, request_frame, setup_request_frame};
pub use host::{HeadlessHost, Host, default_host};
pub use registry::{ColorKey, GlobalRegistry, NodeId, Registrable};
pub use scene::{Node, NodeConfig, NodeKind};
pub use settings::Settings;
pub use toolkit::{Toolkit, ToolkitBuilder};
