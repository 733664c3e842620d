//! Rasterizer argument construction.
//!
//! Directive order is fixed so the same configuration always yields the
//! same invocation:
//! edges, invert, color, toggles, channel weights, geometry, pass-through.

use crate::render_config::{Channel, RenderConfig, DEFAULT_EDGE_THRESHOLD};

/// Build the rasterizer arguments for `config`, excluding the frame path.
pub fn build_args(config: &RenderConfig) -> Vec<String> {
    let mut args = Vec::new();

    // Edges. A threshold is meaningful on its own, so it is forwarded even
    // with edges-only off.
    if config.edges_only {
        args.push("--edges-only".to_string());
        let threshold = config.edge_threshold().unwrap_or(DEFAULT_EDGE_THRESHOLD);
        args.push(format!("--edge-threshold={}", threshold));
    } else if let Some(threshold) = config.edge_threshold() {
        args.push(format!("--edge-threshold={}", threshold));
    }

    if config.invert {
        args.push("--invert".to_string());
    }

    if config.use_color {
        args.push("--colors".to_string());
    }
    if let Some(depth) = config.color_depth {
        args.push(format!("--color-depth={}", depth.bits()));
    }
    if let Some(palette) = &config.char_palette {
        args.push(format!("--chars={}", palette));
    }

    let flags = [
        (config.border, "--border"),
        (config.flip_x, "--flipx"),
        (config.flip_y, "--flipy"),
        (config.term_fit, "--term-fit"),
        (config.term_center, "--term-center"),
        (config.term_zoom, "--term-zoom"),
        (config.grayscale, "--grayscale"),
    ];
    args.extend(
        flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| flag.to_string()),
    );
    if let Some(background) = config.background {
        args.push(format!("--background={}", background.name()));
    }
    if config.fill {
        args.push("--fill".to_string());
    }

    for (channel, name) in [
        (Channel::Red, "red"),
        (Channel::Green, "green"),
        (Channel::Blue, "blue"),
    ] {
        if let Some(weight) = config.weight(channel) {
            args.push(format!("--{}={}", name, weight));
        }
    }

    match (config.width(), config.height()) {
        (Some(width), Some(height)) if config.use_explicit_size => {
            args.push(format!("--size={}x{}", width, height));
        }
        (width, height) => {
            if let Some(width) = width {
                args.push(format!("--width={}", width));
            }
            if let Some(height) = height {
                args.push(format!("--height={}", height));
            }
        }
    }

    args.extend(config.extra_raw_options().iter().cloned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_config::{Background, ColorDepth, Level, Toggle};

    #[test]
    fn test_default_config_has_no_args() {
        assert!(build_args(&RenderConfig::default()).is_empty());
    }

    #[test]
    fn test_full_order() {
        let mut config = RenderConfig::default();
        config.toggle(Toggle::EdgesOnly);
        config.invert = true;
        config.use_color = true;
        config.color_depth = Some(ColorDepth::TrueColor);
        config.char_palette = Some(" .:#".to_string());
        config.border = true;
        config.grayscale = true;
        config.background = Some(Background::Light);
        config.fill = true;
        config.set_weight(Channel::Blue, Some(Level::from_hundredths(5)));
        config.set_width(Some(100));
        config.set_extra_raw_options(vec!["--verbose".to_string()]);

        assert_eq!(
            build_args(&config),
            vec![
                "--edges-only",
                "--edge-threshold=0.10",
                "--invert",
                "--colors",
                "--color-depth=24",
                "--chars= .:#",
                "--border",
                "--grayscale",
                "--background=light",
                "--fill",
                "--blue=0.05",
                "--width=100",
                "--verbose",
            ]
        );
    }

    #[test]
    fn test_explicit_size_needs_both_dimensions() {
        let mut config = RenderConfig::default();
        config.use_explicit_size = true;
        config.set_height(Some(30));
        assert_eq!(build_args(&config), vec!["--height=30"]);
    }

    #[test]
    fn test_depth_without_color_still_forwarded() {
        let mut config = RenderConfig::default();
        config.color_depth = Some(ColorDepth::from_bits(16));
        assert_eq!(build_args(&config), vec!["--color-depth=16"]);
    }
}
