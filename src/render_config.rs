//! Render configuration state.
//!
//! `RenderConfig` holds every display option that maps onto a rasterizer
//! directive. All mutation goes through setters that keep the field
//! invariants: levels stay in [0.00, 1.00], geometry never drops below
//! [`MIN_DIMENSION`], fps never drops below 1.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default playback rate.
pub const DEFAULT_FPS: u32 = 30;

/// Edge threshold used when edges-only is enabled without an explicit value.
pub const DEFAULT_EDGE_THRESHOLD: Level = Level(10);

/// Width applied the first time width is adjusted interactively.
pub const DEFAULT_WIDTH: u32 = 80;

/// Height applied the first time height is adjusted interactively.
pub const DEFAULT_HEIGHT: u32 = 24;

/// Floor for both width and height.
pub const MIN_DIMENSION: u32 = 4;

/// Interactive width step (columns per key press).
pub const WIDTH_STEP: u32 = 2;

/// Interactive height step (rows per key press).
pub const HEIGHT_STEP: u32 = 1;

/// A value in [0.00, 1.00] with two-decimal precision.
///
/// Stored as hundredths so that repeated `+0.01` steps never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(u8);

impl Level {
    pub const ZERO: Level = Level(0);
    pub const ONE: Level = Level(100);

    /// Build from hundredths, clamping to 100.
    pub fn from_hundredths(hundredths: u32) -> Self {
        Level(hundredths.min(100) as u8)
    }

    pub fn hundredths(self) -> u8 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    /// One step (0.01) up, absorbing at 1.00.
    pub fn step_up(self) -> Self {
        Level((self.0 + 1).min(100))
    }

    /// One step (0.01) down, absorbing at 0.00.
    pub fn step_down(self) -> Self {
        Level(self.0.saturating_sub(1))
    }

    pub fn step(self, adjust: Adjust) -> Self {
        match adjust {
            Adjust::Increase => self.step_up(),
            Adjust::Decrease => self.step_down(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid number", s))?;
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(format!("value must be between 0.00 and 1.00, got {}", s));
        }
        Ok(Level::from_hundredths((value * 100.0).round() as u32))
    }
}

/// Direction of an interactive adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    Increase,
    Decrease,
}

/// Color depth passed to the rasterizer.
///
/// The interactive cycle only knows the three named depths. A depth given on
/// the command line outside that set is kept as `Other` and resets to unset
/// on the next cycle rather than advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Ansi4,
    Ansi8,
    TrueColor,
    Other(u32),
}

impl ColorDepth {
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            4 => ColorDepth::Ansi4,
            8 => ColorDepth::Ansi8,
            24 => ColorDepth::TrueColor,
            other => ColorDepth::Other(other),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            ColorDepth::Ansi4 => 4,
            ColorDepth::Ansi8 => 8,
            ColorDepth::TrueColor => 24,
            ColorDepth::Other(bits) => bits,
        }
    }

    /// Next value in the cycle unset -> 4 -> 8 -> 24 -> unset.
    pub fn cycle(current: Option<ColorDepth>) -> Option<ColorDepth> {
        match current {
            None => Some(ColorDepth::Ansi4),
            Some(ColorDepth::Ansi4) => Some(ColorDepth::Ansi8),
            Some(ColorDepth::Ansi8) => Some(ColorDepth::TrueColor),
            Some(ColorDepth::TrueColor) => None,
            Some(ColorDepth::Other(_)) => None,
        }
    }
}

/// Terminal background hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

impl Background {
    /// Next value in the cycle unset -> dark -> light -> unset.
    pub fn cycle(current: Option<Background>) -> Option<Background> {
        match current {
            None => Some(Background::Dark),
            Some(Background::Dark) => Some(Background::Light),
            Some(Background::Light) => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Background::Dark => "dark",
            Background::Light => "light",
        }
    }
}

/// Boolean options that can be flipped individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Color,
    EdgesOnly,
    Invert,
    Border,
    FlipX,
    FlipY,
    TermFit,
    TermCenter,
    TermZoom,
    Grayscale,
    Fill,
    Hud,
    ExplicitSize,
}

impl Toggle {
    pub const ALL: [Toggle; 13] = [
        Toggle::Color,
        Toggle::EdgesOnly,
        Toggle::Invert,
        Toggle::Border,
        Toggle::FlipX,
        Toggle::FlipY,
        Toggle::TermFit,
        Toggle::TermCenter,
        Toggle::TermZoom,
        Toggle::Grayscale,
        Toggle::Fill,
        Toggle::Hud,
        Toggle::ExplicitSize,
    ];
}

/// Color channel for luminance weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Every display option forwarded to the rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    fps: u32,
    pub edges_only: bool,
    edge_threshold: Option<Level>,
    pub invert: bool,
    pub border: bool,
    pub flip_x: bool,
    pub flip_y: bool,
    pub term_fit: bool,
    pub term_center: bool,
    pub term_zoom: bool,
    pub grayscale: bool,
    pub fill: bool,
    pub use_color: bool,
    pub color_depth: Option<ColorDepth>,
    pub background: Option<Background>,
    pub char_palette: Option<String>,
    red_weight: Option<Level>,
    green_weight: Option<Level>,
    blue_weight: Option<Level>,
    width: Option<u32>,
    height: Option<u32>,
    pub use_explicit_size: bool,
    pub show_hud: bool,
    extra_raw_options: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            edges_only: false,
            edge_threshold: None,
            invert: false,
            border: false,
            flip_x: false,
            flip_y: false,
            term_fit: false,
            term_center: false,
            term_zoom: false,
            grayscale: false,
            fill: false,
            use_color: false,
            color_depth: None,
            background: None,
            char_palette: None,
            red_weight: None,
            green_weight: None,
            blue_weight: None,
            width: None,
            height: None,
            use_explicit_size: false,
            show_hud: true,
            extra_raw_options: Vec::new(),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state, read by the argument builder and HUD
    /// within one tick.
    pub fn snapshot(&self) -> RenderConfig {
        self.clone()
    }

    // ==================== Frame rate ====================

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Set the frame rate, flooring at 1.
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.max(1);
    }

    pub fn adjust_fps(&mut self, adjust: Adjust) {
        let fps = match adjust {
            Adjust::Increase => self.fps.saturating_add(1),
            Adjust::Decrease => self.fps.saturating_sub(1),
        };
        self.set_fps(fps);
    }

    /// Time between two frames at the current rate.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.fps))
    }

    // ==================== Booleans ====================

    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Color => self.use_color,
            Toggle::EdgesOnly => self.edges_only,
            Toggle::Invert => self.invert,
            Toggle::Border => self.border,
            Toggle::FlipX => self.flip_x,
            Toggle::FlipY => self.flip_y,
            Toggle::TermFit => self.term_fit,
            Toggle::TermCenter => self.term_center,
            Toggle::TermZoom => self.term_zoom,
            Toggle::Grayscale => self.grayscale,
            Toggle::Fill => self.fill,
            Toggle::Hud => self.show_hud,
            Toggle::ExplicitSize => self.use_explicit_size,
        }
    }

    /// Flip one boolean option.
    ///
    /// Turning edges-only on populates the threshold with
    /// [`DEFAULT_EDGE_THRESHOLD`] when none is set.
    pub fn toggle(&mut self, toggle: Toggle) {
        let field = match toggle {
            Toggle::Color => &mut self.use_color,
            Toggle::EdgesOnly => &mut self.edges_only,
            Toggle::Invert => &mut self.invert,
            Toggle::Border => &mut self.border,
            Toggle::FlipX => &mut self.flip_x,
            Toggle::FlipY => &mut self.flip_y,
            Toggle::TermFit => &mut self.term_fit,
            Toggle::TermCenter => &mut self.term_center,
            Toggle::TermZoom => &mut self.term_zoom,
            Toggle::Grayscale => &mut self.grayscale,
            Toggle::Fill => &mut self.fill,
            Toggle::Hud => &mut self.show_hud,
            Toggle::ExplicitSize => &mut self.use_explicit_size,
        };
        *field = !*field;

        if toggle == Toggle::EdgesOnly && self.edges_only && self.edge_threshold.is_none() {
            self.edge_threshold = Some(DEFAULT_EDGE_THRESHOLD);
        }
    }

    // ==================== Cycles ====================

    pub fn cycle_color_depth(&mut self) {
        self.color_depth = ColorDepth::cycle(self.color_depth);
    }

    pub fn cycle_background(&mut self) {
        self.background = Background::cycle(self.background);
    }

    // ==================== Levels ====================

    pub fn edge_threshold(&self) -> Option<Level> {
        self.edge_threshold
    }

    pub fn set_edge_threshold(&mut self, level: Option<Level>) {
        self.edge_threshold = level;
    }

    /// Step the edge threshold by 0.01.
    ///
    /// An unset threshold starts from 0.10 when increasing and 0.00 when
    /// decreasing.
    pub fn adjust_edge_threshold(&mut self, adjust: Adjust) {
        let base = self.edge_threshold.unwrap_or(match adjust {
            Adjust::Increase => DEFAULT_EDGE_THRESHOLD,
            Adjust::Decrease => Level::ZERO,
        });
        self.edge_threshold = Some(base.step(adjust));
    }

    pub fn weight(&self, channel: Channel) -> Option<Level> {
        match channel {
            Channel::Red => self.red_weight,
            Channel::Green => self.green_weight,
            Channel::Blue => self.blue_weight,
        }
    }

    pub fn set_weight(&mut self, channel: Channel, level: Option<Level>) {
        *self.weight_mut(channel) = level;
    }

    /// Step a channel weight by 0.01. Unset counts as 0.00.
    pub fn adjust_weight(&mut self, channel: Channel, adjust: Adjust) {
        let slot = self.weight_mut(channel);
        *slot = Some(slot.unwrap_or(Level::ZERO).step(adjust));
    }

    fn weight_mut(&mut self, channel: Channel) -> &mut Option<Level> {
        match channel {
            Channel::Red => &mut self.red_weight,
            Channel::Green => &mut self.green_weight,
            Channel::Blue => &mut self.blue_weight,
        }
    }

    // ==================== Geometry ====================

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn set_width(&mut self, width: Option<u32>) {
        self.width = width.map(|w| w.max(MIN_DIMENSION));
    }

    pub fn set_height(&mut self, height: Option<u32>) {
        self.height = height.map(|h| h.max(MIN_DIMENSION));
    }

    /// Step width by [`WIDTH_STEP`], starting from [`DEFAULT_WIDTH`] if unset.
    pub fn adjust_width(&mut self, adjust: Adjust) {
        let width = step_dimension(self.width.unwrap_or(DEFAULT_WIDTH), WIDTH_STEP, adjust);
        self.set_width(Some(width));
    }

    /// Step height by [`HEIGHT_STEP`], starting from [`DEFAULT_HEIGHT`] if unset.
    pub fn adjust_height(&mut self, adjust: Adjust) {
        let height = step_dimension(self.height.unwrap_or(DEFAULT_HEIGHT), HEIGHT_STEP, adjust);
        self.set_height(Some(height));
    }

    // ==================== Pass-through ====================

    pub fn extra_raw_options(&self) -> &[String] {
        &self.extra_raw_options
    }

    pub fn set_extra_raw_options(&mut self, options: Vec<String>) {
        self.extra_raw_options = options;
    }
}

fn step_dimension(value: u32, step: u32, adjust: Adjust) -> u32 {
    match adjust {
        Adjust::Increase => value.saturating_add(step),
        Adjust::Decrease => value.saturating_sub(step),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.fps(), 30);
        assert!(config.show_hud);
        assert!(!config.use_color);
        assert_eq!(config.edge_threshold(), None);
        assert_eq!(config.width(), None);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::from_hundredths(10).to_string(), "0.10");
        assert_eq!(Level::from_hundredths(35).to_string(), "0.35");
        assert_eq!(Level::ONE.to_string(), "1.00");
        assert_eq!(Level::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("0.35".parse::<Level>(), Ok(Level::from_hundredths(35)));
        assert_eq!("1".parse::<Level>(), Ok(Level::ONE));
        assert!("1.5".parse::<Level>().is_err());
        assert!("-0.1".parse::<Level>().is_err());
        assert!("abc".parse::<Level>().is_err());
        assert!("NaN".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_from_hundredths_clamps() {
        assert_eq!(Level::from_hundredths(250), Level::ONE);
    }

    #[test]
    fn test_edges_toggle_populates_threshold() {
        let mut config = RenderConfig::default();
        config.toggle(Toggle::EdgesOnly);
        assert!(config.edges_only);
        assert_eq!(config.edge_threshold(), Some(DEFAULT_EDGE_THRESHOLD));
    }

    #[test]
    fn test_edges_toggle_keeps_existing_threshold() {
        let mut config = RenderConfig::default();
        config.set_edge_threshold(Some(Level::from_hundredths(42)));
        config.toggle(Toggle::EdgesOnly);
        assert_eq!(config.edge_threshold(), Some(Level::from_hundredths(42)));
    }

    #[test]
    fn test_edges_toggle_off_keeps_threshold() {
        let mut config = RenderConfig::default();
        config.toggle(Toggle::EdgesOnly);
        config.toggle(Toggle::EdgesOnly);
        assert!(!config.edges_only);
        assert_eq!(config.edge_threshold(), Some(DEFAULT_EDGE_THRESHOLD));
    }

    #[test]
    fn test_color_depth_cycle() {
        let mut config = RenderConfig::default();
        config.cycle_color_depth();
        assert_eq!(config.color_depth, Some(ColorDepth::Ansi4));
        config.cycle_color_depth();
        assert_eq!(config.color_depth, Some(ColorDepth::Ansi8));
        config.cycle_color_depth();
        assert_eq!(config.color_depth, Some(ColorDepth::TrueColor));
        config.cycle_color_depth();
        assert_eq!(config.color_depth, None);
    }

    #[test]
    fn test_color_depth_out_of_cycle_resets() {
        let mut config = RenderConfig::default();
        config.color_depth = Some(ColorDepth::from_bits(16));
        config.cycle_color_depth();
        assert_eq!(config.color_depth, None);
    }

    #[test]
    fn test_background_cycle() {
        let mut config = RenderConfig::default();
        config.cycle_background();
        assert_eq!(config.background, Some(Background::Dark));
        config.cycle_background();
        assert_eq!(config.background, Some(Background::Light));
        config.cycle_background();
        assert_eq!(config.background, None);
    }

    #[test]
    fn test_weight_unset_counts_as_zero() {
        let mut config = RenderConfig::default();
        config.adjust_weight(Channel::Red, Adjust::Increase);
        assert_eq!(config.weight(Channel::Red), Some(Level::from_hundredths(1)));

        config.adjust_weight(Channel::Green, Adjust::Decrease);
        assert_eq!(config.weight(Channel::Green), Some(Level::ZERO));
        assert_eq!(config.weight(Channel::Blue), None);
    }

    #[test]
    fn test_edge_threshold_initial_steps() {
        let mut up = RenderConfig::default();
        up.adjust_edge_threshold(Adjust::Increase);
        assert_eq!(up.edge_threshold(), Some(Level::from_hundredths(11)));

        let mut down = RenderConfig::default();
        down.adjust_edge_threshold(Adjust::Decrease);
        assert_eq!(down.edge_threshold(), Some(Level::ZERO));
    }

    #[test]
    fn test_width_defaults_then_steps() {
        let mut config = RenderConfig::default();
        config.adjust_width(Adjust::Increase);
        assert_eq!(config.width(), Some(82));
        config.adjust_height(Adjust::Decrease);
        assert_eq!(config.height(), Some(23));
    }

    #[test]
    fn test_dimension_floor() {
        let mut config = RenderConfig::default();
        config.set_width(Some(5));
        config.adjust_width(Adjust::Decrease);
        assert_eq!(config.width(), Some(4));
        config.adjust_width(Adjust::Decrease);
        assert_eq!(config.width(), Some(4));
        config.set_height(Some(1));
        assert_eq!(config.height(), Some(4));
    }

    #[test]
    fn test_fps_floor_and_interval() {
        let mut config = RenderConfig::default();
        config.set_fps(0);
        assert_eq!(config.fps(), 1);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        config.set_fps(4);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
    }
}
