//! Command-line interface definitions and helpers.
//!
//! Flags layer on top of the config file: anything given here wins.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::render_config::{ColorDepth, Level, RenderConfig, DEFAULT_FPS};

/// Parse and validate a frame rate (>= 1 fps)
fn parse_fps(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid frame rate", s))?;
    if fps == 0 {
        return Err("Frame rate must be at least 1 fps".to_string());
    }
    Ok(fps)
}

/// Parse and validate a color depth (positive integer)
fn parse_color_depth(s: &str) -> Result<u32, String> {
    let depth: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid color depth", s))?;
    if depth == 0 {
        return Err("Color depth must be a positive integer (4, 8 or 24)".to_string());
    }
    Ok(depth)
}

/// Play a directory of image frames as ASCII art in the terminal
#[derive(Parser, Debug)]
#[command(name = "termreel")]
#[command(version, about = "Play a directory of image frames as ASCII art in the terminal")]
#[command(after_help = "EXAMPLES:
    # Play extracted frames at 24 fps
    termreel -f 24 ./frames

    # Colored edge rendering with live controls
    termreel -I -c -e -t 0.2 ./frames

    # Pass extra options straight to the rasterizer
    termreel -r '--background=dark --fill' -- ./frames

HOTKEYS (with --interactive):
    1 color    2 edges    3 invert    4 color depth (4/8/24/off)
    5 border   6 flip-x   7 flip-y    8 term-fit   9 term-center   0 term-zoom
    x grayscale   y background (dark/light/off)   f fill   p HUD   s WxH size
    r/R g/G b/B   channel weight down/up
    w/W  width up/down     h/H  height up/down
    Left/Right    fps down/up
    Up/Down       edge threshold up/down
    q             quit")]
pub struct Args {
    /// Directory containing the frame images, played in file-name order
    #[arg(value_name = "FRAME_DIR")]
    pub frame_dir: PathBuf,

    /// Frames per second
    #[arg(short = 'f', long, value_parser = parse_fps)]
    pub fps: Option<u32>,

    /// Render edges only
    #[arg(short = 'e', long)]
    pub edges_only: bool,

    /// Edge detection threshold (0.00-1.00)
    #[arg(short = 't', long, value_name = "THRESHOLD")]
    pub edge_threshold: Option<Level>,

    /// Invert brightness
    #[arg(short = 'i', long)]
    pub invert: bool,

    /// Enable color output
    #[arg(short = 'c', long, overrides_with = "no_color")]
    pub color: bool,

    /// Disable color output
    #[arg(short = 'n', long, overrides_with = "color")]
    pub no_color: bool,

    /// Color depth in bits (4, 8 or 24)
    #[arg(short = 'd', long, value_name = "BITS", value_parser = parse_color_depth)]
    pub color_depth: Option<u32>,

    /// Literal characters to render with, darkest first
    #[arg(short = 'C', long, value_name = "PALETTE")]
    pub chars: Option<String>,

    /// Enable keyboard controls and the status HUD
    #[arg(short = 'I', long)]
    pub interactive: bool,

    /// Extra rasterizer options, appended verbatim (whitespace separated)
    #[arg(short = 'r', long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub raw_options: Option<String>,

    /// Rasterizer executable (default: jp2a)
    #[arg(long, value_name = "PROGRAM")]
    pub rasterizer: Option<String>,

    /// Start with the HUD hidden
    #[arg(long)]
    pub no_hud: bool,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the rasterizer command for the first frame and exit
    #[arg(long)]
    pub print_args: bool,
}

impl Args {
    /// Build the starting render configuration from the config file and flags.
    pub fn render_config(&self, file: &Config) -> RenderConfig {
        let mut config = RenderConfig::new();

        config.set_fps(self.fps.or(file.player.fps).unwrap_or(DEFAULT_FPS));
        config.edges_only = self.edges_only;
        config.set_edge_threshold(self.edge_threshold);
        config.invert = self.invert;
        config.use_color = self.color && !self.no_color;
        config.color_depth = self.color_depth.map(ColorDepth::from_bits);
        config.char_palette = self.chars.clone();
        config.show_hud = file.player.show_hud && !self.no_hud;

        let mut extra = file.rasterizer.extra_options.clone();
        if let Some(raw) = &self.raw_options {
            extra.extend(raw.split_whitespace().map(str::to_string));
        }
        config.set_extra_raw_options(extra);

        config
    }

    pub fn interactive(&self, file: &Config) -> bool {
        self.interactive || file.player.interactive
    }

    pub fn rasterizer_program<'a>(&'a self, file: &'a Config) -> &'a str {
        self.rasterizer
            .as_deref()
            .unwrap_or_else(|| file.rasterizer.program())
    }
}
