//! Key-code tables shared by the parsers, the event mapper and the device
//! boundary.

pub mod event;
pub mod normalize;
pub mod usage;

pub use event::{map_event, KeyEvent, Modifiers};
pub use normalize::{canonical, is_transparent, normalize, PLACEHOLDER_LABEL, TRANSPARENT_LABEL, TRANSPARENT_TOKEN};
pub use usage::{binding_for_usage, usage_token};
