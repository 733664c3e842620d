//! Status summary printed under each frame in interactive mode.

use std::io::{self, Write};

use crate::render_config::{Channel, Level, RenderConfig};

/// Three-line summary of every render option.
///
/// Shows: rate/color/edges | geometry toggles | weights, size, palette
#[derive(Debug, Clone, Default)]
pub struct Hud;

impl Hud {
    pub fn new() -> Self {
        Self
    }

    /// Format the three status lines for `config`.
    pub fn lines(&self, config: &RenderConfig) -> [String; 3] {
        let first = format!(
            " fps:{} | [1]color:{} [4]depth:{} | [2]edges:{} [up/dn]thr:{} | [3]invert:{}",
            config.fps(),
            on_off(config.use_color),
            config
                .color_depth
                .map(|d| d.bits().to_string())
                .unwrap_or_else(|| "-".to_string()),
            on_off(config.edges_only),
            level_or(config.edge_threshold(), "-"),
            on_off(config.invert),
        );

        let second = format!(
            " [5]border:{} [6]flipx:{} [7]flipy:{} [8]fit:{} [9]center:{} [0]zoom:{} [x]gray:{} [y]bg:{} [f]fill:{}",
            on_off(config.border),
            on_off(config.flip_x),
            on_off(config.flip_y),
            on_off(config.term_fit),
            on_off(config.term_center),
            on_off(config.term_zoom),
            on_off(config.grayscale),
            config.background.map(|b| b.name()).unwrap_or("-"),
            on_off(config.fill),
        );

        let third = format!(
            " [rgb]weights:{}/{}/{} | [w]{}x[h]{} [s]explicit:{} | chars:{} | extra:{} | [p]hud [q]quit",
            level_or(config.weight(Channel::Red), "auto"),
            level_or(config.weight(Channel::Green), "auto"),
            level_or(config.weight(Channel::Blue), "auto"),
            dimension_or_auto(config.width()),
            dimension_or_auto(config.height()),
            on_off(config.use_explicit_size),
            config.char_palette.as_deref().unwrap_or("default"),
            if config.extra_raw_options().is_empty() {
                "-".to_string()
            } else {
                config.extra_raw_options().join(" ")
            },
        );

        [first, second, third]
    }

    /// Write the summary if the HUD is visible. Lines end in `\r\n` so they
    /// stay aligned while the terminal is in raw mode.
    pub fn paint<W: Write>(&self, out: &mut W, config: &RenderConfig) -> io::Result<()> {
        if !config.show_hud {
            return Ok(());
        }
        for line in self.lines(config) {
            write!(out, "{}\r\n", line)?;
        }
        out.flush()
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn level_or(level: Option<Level>, unset: &str) -> String {
    level.map(|l| l.to_string()).unwrap_or_else(|| unset.to_string())
}

fn dimension_or_auto(value: Option<u32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "auto".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_config::{Background, ColorDepth};

    #[test]
    fn test_default_lines() {
        let lines = Hud::new().lines(&RenderConfig::default());
        assert!(lines[0].contains("fps:30"));
        assert!(lines[0].contains("color:off"));
        assert!(lines[0].contains("thr:-"));
        assert!(lines[1].contains("bg:-"));
        assert!(lines[2].contains("weights:auto/auto/auto"));
        assert!(lines[2].contains("[w]autox[h]auto"));
    }

    #[test]
    fn test_lines_reflect_changes() {
        let mut config = RenderConfig::default();
        config.color_depth = Some(ColorDepth::Ansi8);
        config.background = Some(Background::Dark);
        config.set_weight(Channel::Green, Some(Level::from_hundredths(50)));
        config.set_width(Some(120));
        config.char_palette = Some("@#.".to_string());

        let lines = Hud::new().lines(&config);
        assert!(lines[0].contains("depth:8"));
        assert!(lines[1].contains("bg:dark"));
        assert!(lines[2].contains("weights:auto/0.50/auto"));
        assert!(lines[2].contains("[w]120x[h]auto"));
        assert!(lines[2].contains("chars:@#."));
    }

    #[test]
    fn test_paint_hidden_writes_nothing() {
        let mut config = RenderConfig::default();
        config.show_hud = false;
        let mut buf = Vec::new();
        Hud::new().paint(&mut buf, &config).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_paint_writes_three_lines() {
        let mut buf = Vec::new();
        Hud::new().paint(&mut buf, &RenderConfig::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches("\r\n").count(), 3);
    }
}
