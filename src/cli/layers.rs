//! List the layers of a keymap.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::common::{print_json, read_source, CliError, CliResult};
use crate::parser::parse_keymap;

/// List keymap layers
#[derive(Args, Debug)]
pub struct LayersArgs {
    /// Keymap file (ZMK .keymap or QMK keymap.c)
    #[arg(long, value_name = "FILE")]
    pub keymap: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One row of layer output.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LayerSummary {
    /// Layer name
    pub name: String,
    /// Layer label, may be empty
    pub label: String,
    /// Selector text
    pub selector: String,
    /// Number of key slots
    pub key_count: usize,
}

/// Summarizes every layer in `text`, in declaration order.
#[must_use]
pub fn summarize_layers(text: &str) -> Vec<LayerSummary> {
    parse_keymap(text)
        .iter()
        .map(|layer| LayerSummary {
            name: layer.name.clone(),
            label: layer.label.clone(),
            selector: layer.selector_text(),
            key_count: layer.keys.len(),
        })
        .collect()
}

impl LayersArgs {
    /// Execute the layers command
    pub fn execute(&self) -> CliResult<()> {
        let text = read_source(&self.keymap)?;
        let layers = summarize_layers(&text);

        if layers.is_empty() {
            return Err(CliError::validation(format!(
                "No layers found in {}",
                self.keymap.display()
            )));
        }

        if self.json {
            print_json(&layers)?;
        } else {
            for layer in &layers {
                println!("{:<32} {:>4} keys", layer.selector, layer.key_count);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_layers() {
        let text = "default_layer {\nlabel = \"Base\";\nbindings = <&kp A &kp B>;\n};";
        let layers = summarize_layers(text);
        assert_eq!(
            layers,
            vec![LayerSummary {
                name: "default".to_string(),
                label: "Base".to_string(),
                selector: "Base (default)".to_string(),
                key_count: 2,
            }]
        );
    }
}
