//! Render a layout and keymap to SVG.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use tracing::{info, warn};

use crate::cli::common::{read_source, write_output, CliError, CliResult};
use crate::config::Config;
use crate::keycodes::KeyEvent;
use crate::models::Theme;
use crate::render::session::{phase_at, ANIMATION_CYCLE};
use crate::render::{BoundsPolicy, QueuedScheduler, RenderSession, SvgCanvas};

/// Bounding box policy argument.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsArg {
    /// Fit unrotated key rectangles
    Unrotated,
    /// Fit rotated key corners
    Rotated,
}

impl From<BoundsArg> for BoundsPolicy {
    fn from(arg: BoundsArg) -> Self {
        match arg {
            BoundsArg::Unrotated => Self::Unrotated,
            BoundsArg::Rotated => Self::Rotated,
        }
    }
}

/// Render a layout and keymap to SVG
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Physical layout file (devicetree or JSON)
    #[arg(long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Keymap file (ZMK .keymap or QMK keymap.c)
    #[arg(long, value_name = "FILE")]
    pub keymap: PathBuf,

    /// Layer to draw (defaults to the first layer)
    #[arg(long, value_name = "NAME")]
    pub layer: Option<String>,

    /// Theme name or "auto" (overrides config)
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Canvas width in pixels (overrides config)
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Canvas height in pixels (overrides config)
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Keys to draw as held, by key name (e.g. "a,Shift,Enter")
    #[arg(long, value_name = "KEY,...", value_delimiter = ',')]
    pub pressed: Vec<String>,

    /// Number of animation frames to write for a dynamic theme
    #[arg(long, value_name = "N")]
    pub frames: Option<usize>,

    /// Bounding box policy (overrides config)
    #[arg(long, value_enum)]
    pub bounds: Option<BoundsArg>,

    /// Output SVG file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

/// `out.svg` + 3 -> `out-0003.svg`
pub fn numbered_path(output: &Path, index: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map_or_else(|| "frame".to_string(), |s| s.to_string_lossy().to_string());
    let ext = output
        .extension()
        .map_or_else(|| "svg".to_string(), |e| e.to_string_lossy().to_string());
    output.with_file_name(format!("{stem}-{index:04}.{ext}"))
}

impl RenderArgs {
    fn effective_config(&self) -> CliResult<Config> {
        let mut config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if let Some(theme) = &self.theme {
            config.render.theme.clone_from(theme);
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if let Some(bounds) = self.bounds {
            config.render.bounds = bounds.into();
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        Ok(config)
    }

    /// Execute the render command
    pub fn execute(&self) -> CliResult<()> {
        let config = self.effective_config()?;
        let layout_text = read_source(&self.layout)?;
        let keymap_text = read_source(&self.keymap)?;

        let theme: &'static Theme = config.theme();
        let (width, height) = config.canvas_size();
        let mut session = RenderSession::new(
            SvgCanvas::new(width, height),
            QueuedScheduler::new(),
            config.render_options(),
        );
        session.set_theme(theme);
        session.load(layout_text, keymap_text);

        if session.geometries().is_empty() {
            warn!("No keys found in {}", self.layout.display());
        }

        if let Some(layer) = &self.layer {
            if !session.select_layer(layer) {
                let available: Vec<&str> = session.keymap().names().collect();
                return Err(CliError::validation(format!(
                    "Layer '{}' not found. Available: {}",
                    layer,
                    available.join(", ")
                )));
            }
        }

        for key in &self.pressed {
            session.key_down(&KeyEvent::new(key.trim()));
        }
        session.redraw();

        match self.frames {
            Some(count) if theme.dynamic && count > 0 => {
                let step = ANIMATION_CYCLE.as_secs_f64() / count as f64;
                for index in 0..count {
                    let elapsed = std::time::Duration::from_secs_f64(step * index as f64);
                    let pending = session.scheduler_mut().take_pending();
                    for handle in pending {
                        session.on_frame(handle, elapsed);
                    }
                    let path = numbered_path(&self.output, index);
                    write_output(&path, session.canvas().document())?;
                    info!(
                        "Wrote frame {} (phase {:.2}) to {}",
                        index,
                        phase_at(elapsed),
                        path.display()
                    );
                }
            }
            frames => {
                if frames.is_some() {
                    warn!("Theme '{}' is not animated; writing a single frame", theme.name);
                }
                write_output(&self.output, session.canvas().document())?;
                info!(
                    "Rendered {} keys to {}",
                    session.rects().len(),
                    self.output.display()
                );
            }
        }

        session.shutdown();
        Ok(())
    }
}
