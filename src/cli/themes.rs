//! List registered themes.

use clap::Args;

use crate::cli::common::CliResult;
use crate::models::theme::{AUTO_THEME, THEMES};

/// List available themes
#[derive(Args, Debug)]
pub struct ThemesArgs {}

impl ThemesArgs {
    /// Execute the themes command
    pub fn execute(&self) -> CliResult<()> {
        println!("{:<12} follows the OS dark/light preference", AUTO_THEME);
        for theme in &THEMES {
            let note = if theme.dynamic { " (animated)" } else { "" };
            println!(
                "{:<12} background {}  keys {}  pressed {}{}",
                theme.name,
                theme.background.to_hex(),
                theme.normal.to_hex(),
                theme.pressed.to_hex(),
                note
            );
        }
        Ok(())
    }
}
