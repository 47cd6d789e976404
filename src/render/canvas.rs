//! Drawing surface seam.
//!
//! The engine builds a complete [`Frame`] of [`DrawCommand`]s and hands it
//! to a [`Canvas`] in one call, so a backend never sees a half-built frame.

use serde::Serialize;

use crate::models::RgbColor;

/// A color with opacity in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    /// Color channels
    pub color: RgbColor,
    /// Opacity
    pub alpha: f64,
}

impl Rgba {
    /// Fully opaque color.
    #[must_use]
    pub const fn opaque(color: RgbColor) -> Self {
        Self { color, alpha: 1.0 }
    }

    /// Color with the given opacity, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_alpha(color: RgbColor, alpha: f64) -> Self {
        Self {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// Soft drop shadow under a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shadow {
    /// Shadow color
    pub color: Rgba,
    /// Blur radius in pixels
    pub blur: f64,
    /// Horizontal offset in pixels
    pub offset_x: f64,
    /// Vertical offset in pixels
    pub offset_y: f64,
}

impl Shadow {
    /// The standard key shadow: black at 10%, blur 4, offset (2, 2).
    #[must_use]
    pub const fn key() -> Self {
        Self {
            color: Rgba {
                color: RgbColor::BLACK,
                alpha: 0.1,
            },
            blur: 4.0,
            offset_x: 2.0,
            offset_y: 2.0,
        }
    }
}

/// Background paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Background {
    /// Flat color
    Solid(RgbColor),
    /// Linear gradient from the top-left to the bottom-right corner
    Gradient(Vec<(f64, RgbColor)>),
}

/// One primitive in a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Fill the whole canvas
    Background(Background),
    /// Rounded rectangle centred at `(cx, cy)` and rotated about that centre
    RoundedRect {
        /// Centre X
        cx: f64,
        /// Centre Y
        cy: f64,
        /// Width
        w: f64,
        /// Height
        h: f64,
        /// Corner radius
        radius: f64,
        /// Rotation in degrees
        rotation: f64,
        /// Body fill
        fill: Rgba,
        /// Outline color
        stroke: Rgba,
        /// Outline width
        stroke_width: f64,
        /// Optional drop shadow
        shadow: Option<Shadow>,
    },
    /// Circle, filled and/or outlined
    Circle {
        /// Centre X
        cx: f64,
        /// Centre Y
        cy: f64,
        /// Radius
        radius: f64,
        /// Fill, if any
        fill: Option<Rgba>,
        /// Outline, if any
        stroke: Option<Rgba>,
        /// Outline width
        stroke_width: f64,
    },
    /// Text centred on `(x, y)` and rotated about it
    Text {
        /// Anchor X
        x: f64,
        /// Anchor Y
        y: f64,
        /// Text content
        text: String,
        /// Font size in pixels
        size: f64,
        /// Rotation in degrees
        rotation: f64,
        /// Text color
        color: Rgba,
    },
}

/// A complete frame. An empty command list is a cleared canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Primitives in paint order
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Creates an empty (cleared) frame.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Returns true if nothing is drawn.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text of every label drawn, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A surface that frames are presented to.
pub trait Canvas {
    /// Drawable size in pixels, `(width, height)`.
    fn size(&self) -> (f64, f64);

    /// Replaces whatever is shown with `frame`.
    fn present(&mut self, frame: Frame);
}

/// Canvas that keeps presented frames in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    frames: Vec<Frame>,
}

impl RecordingCanvas {
    /// Creates a recording canvas of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
        }
    }

    /// The most recently presented frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Every presented frame, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_canvas_keeps_frames() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        assert_eq!(canvas.size(), (100.0, 50.0));
        assert!(canvas.last_frame().is_none());

        canvas.present(Frame::new(100.0, 50.0));
        let mut frame = Frame::new(100.0, 50.0);
        frame.commands.push(DrawCommand::Background(Background::Solid(RgbColor::WHITE)));
        canvas.present(frame);

        assert_eq!(canvas.frame_count(), 2);
        assert!(canvas.frames()[0].is_clear());
        assert!(!canvas.last_frame().unwrap().is_clear());
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(Rgba::with_alpha(RgbColor::BLACK, 1.5).alpha, 1.0);
        assert_eq!(Rgba::with_alpha(RgbColor::BLACK, -0.5).alpha, 0.0);
    }
}
