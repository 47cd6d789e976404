//! Data models for key geometry, keymap layers, themes and press state.
//!
//! This module contains the normalized model shared by the parsers and the
//! render engine. Models are independent of any parsing dialect or backend.

pub mod key_rect;
pub mod keyboard_geometry;
pub mod layer;
pub mod press_state;
pub mod rgb;
pub mod theme;

// Re-export all model types
pub use key_rect::RenderedKeyRect;
pub use keyboard_geometry::KeyGeometry;
pub use layer::{KeymapDocument, Layer};
pub use press_state::PressState;
pub use rgb::RgbColor;
pub use theme::{KeyDecoration, Theme};
