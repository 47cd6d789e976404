//! Geometry and theme render engine.
//!
//! [`engine::render`] fits a parsed layout onto a [`canvas::Canvas`] and draws
//! one frame. [`session::RenderSession`] adds press handling, layer
//! selection and the dynamic-theme animation loop on top.

pub mod canvas;
pub mod engine;
pub mod geometry;
pub mod session;
pub mod svg;

pub use canvas::{Canvas, DrawCommand, Frame, RecordingCanvas};
pub use engine::{render, Animation, RenderOptions};
pub use geometry::BoundsPolicy;
pub use session::{AnimationState, FrameHandle, FrameScheduler, QueuedScheduler, RenderSession};
pub use svg::SvgCanvas;
