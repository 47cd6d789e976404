//! KeyViz - keyboard layout visualizer
//!
//! Renders ZMK and QMK layouts and keymaps to SVG, lists layers, inspects
//! parsed geometry and decodes captured device responses.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyviz::cli::{
    CliResult, ConfigArgs, DecodeArgs, ExitCode, InspectArgs, LayersArgs, RenderArgs,
    ThemesArgs,
};

/// KeyViz - keyboard layout visualizer for ZMK and QMK sources
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a layout and keymap to SVG
    Render(RenderArgs),
    /// List keymap layers
    Layers(LayersArgs),
    /// Print parsed key geometry
    Inspect(InspectArgs),
    /// List available themes
    Themes(ThemesArgs),
    /// Decode a device response hex dump
    Decode(DecodeArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Render(args) => args.execute(),
            Self::Layers(args) => args.execute(),
            Self::Inspect(args) => args.execute(),
            Self::Themes(args) => args.execute(),
            Self::Decode(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = cli.command.execute() {
        eprintln!("Error: {err}");
        std::process::exit(err.code.as_i32());
    }
    std::process::exit(ExitCode::Success.as_i32());
}
