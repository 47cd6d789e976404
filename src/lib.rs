//! KeyViz Library
//!
//! Parses keyboard physical layouts (ZMK devicetree or JSON) and keymaps
//! (ZMK `.keymap` or QMK `keymap.c`) into one model, and draws that model
//! with auto-fit scaling, rotation, themes and live press highlighting.
//!
//! ```
//! use keyviz::parser::{parse_keymap, parse_layout};
//! use keyviz::render::{render, RecordingCanvas, RenderOptions};
//! use keyviz::models::{PressState, Theme};
//!
//! let keys = parse_layout(r#"{"layouts": {"L": {"layout": [{"x": 0, "y": 0}, {"x": 1, "y": 0}]}}}"#);
//! let keymap = parse_keymap("default_layer {\nbindings = <&kp A &trans>;\n};");
//! let labels = &keymap.first().unwrap().keys;
//!
//! let mut canvas = RecordingCanvas::new(400.0, 200.0);
//! let mut press = PressState::new();
//! let rects = render(&mut canvas, &keys, labels, Theme::dark(), &mut press, &RenderOptions::default(), None);
//!
//! assert_eq!(rects[0].label, "A");
//! assert_eq!(rects[1].label, "---");
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod device;
pub mod keycodes;
pub mod models;
pub mod parser;
pub mod render;
