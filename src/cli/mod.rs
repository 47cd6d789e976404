//! CLI command handlers.
//!
//! Each subcommand is an `Args` struct with an `execute` method returning
//! [`common::CliResult`]; `main` maps errors to process exit codes.

pub mod common;
pub mod config;
pub mod decode;
pub mod inspect;
pub mod layers;
pub mod render;
pub mod themes;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use decode::DecodeArgs;
pub use inspect::InspectArgs;
pub use layers::LayersArgs;
pub use render::RenderArgs;
pub use themes::ThemesArgs;
