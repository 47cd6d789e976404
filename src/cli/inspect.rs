//! Print the key geometries parsed from a layout file.

use std::path::PathBuf;

use clap::Args;

use crate::cli::common::{print_json, read_source, CliError, CliResult};
use crate::parser::{parse_layout, LayoutDialect};

/// Inspect a physical layout
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Physical layout file (devicetree or JSON)
    #[arg(long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> CliResult<()> {
        let text = read_source(&self.layout)?;
        let keys = parse_layout(&text);

        if keys.is_empty() {
            return Err(CliError::validation(format!(
                "No keys found in {}",
                self.layout.display()
            )));
        }

        if self.json {
            return print_json(&keys);
        }

        println!("Dialect: {:?}", LayoutDialect::detect(&text));
        println!("Keys: {}", keys.len());
        println!();
        println!(
            "{:>4} {:>7} {:>7} {:>6} {:>6} {:>8} {:>7} {:>7}",
            "#", "x", "y", "w", "h", "r", "rx", "ry"
        );
        for (i, key) in keys.iter().enumerate() {
            println!(
                "{:>4} {:>7.2} {:>7.2} {:>6.2} {:>6.2} {:>8.2} {:>7.2} {:>7.2}",
                i, key.x, key.y, key.w, key.h, key.r, key.rx, key.ry
            );
        }
        Ok(())
    }
}
