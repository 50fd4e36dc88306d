//! Colours for the light and dark themes.
//!
//! Everything is looked up through a [`Palette`] built from the current
//! [`Theme`], so a toggle repaints the whole screen on the next frame.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{InlineColor, InlineStyle, LineType};
use crate::theme::Theme;

/// Environment override for 24-bit colour detection (`1`/`0`).
pub const TRUECOLOR_ENV: &str = "HANGEULDOWN_TRUECOLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub border: Color,
    pub accent: Color,
    pub toolbar_bg: Color,
    pub toolbar_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub selection_bg: Color,
    pub gutter: Color,
    pub headings: [Color; 3],
    pub code: Color,
    pub inline_code: Color,
    pub quote: Color,
    pub link: Color,
    pub math: Color,
    pub image: Color,
    pub rule: Color,
    pub dialog_bg: Color,
    pub header_cell_bg: Color,
    pub warn_bg: Color,
    pub error_bg: Color,
}

impl Palette {
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    pub const fn light() -> Self {
        Self {
            bg: Color::Indexed(255),
            fg: Color::Indexed(235),
            dim: Color::Indexed(244),
            border: Color::Indexed(250),
            accent: Color::Indexed(27),
            toolbar_bg: Color::Indexed(253),
            toolbar_fg: Color::Indexed(236),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
            selection_bg: Color::Indexed(153),
            gutter: Color::Indexed(247),
            headings: [Color::Indexed(24), Color::Indexed(22), Color::Indexed(94)],
            code: Color::Indexed(238),
            inline_code: Color::Indexed(124),
            quote: Color::Indexed(25),
            link: Color::Indexed(27),
            math: Color::Indexed(90),
            image: Color::Indexed(133),
            rule: Color::Indexed(248),
            dialog_bg: Color::Indexed(254),
            header_cell_bg: Color::Indexed(189),
            warn_bg: Color::Indexed(222),
            error_bg: Color::Indexed(210),
        }
    }

    pub const fn dark() -> Self {
        Self {
            bg: Color::Indexed(234),
            fg: Color::Indexed(252),
            dim: Color::Indexed(243),
            border: Color::Indexed(240),
            accent: Color::Indexed(75),
            toolbar_bg: Color::Indexed(236),
            toolbar_fg: Color::Indexed(251),
            status_bg: Color::Indexed(237),
            status_fg: Color::Indexed(252),
            selection_bg: Color::Indexed(24),
            gutter: Color::Indexed(240),
            headings: [Color::Cyan, Color::Green, Color::Yellow],
            code: Color::Indexed(245),
            inline_code: Color::LightRed,
            quote: Color::LightBlue,
            link: Color::LightBlue,
            math: Color::LightMagenta,
            image: Color::Magenta,
            rule: Color::Indexed(240),
            dialog_bg: Color::Indexed(236),
            header_cell_bg: Color::Indexed(24),
            warn_bg: Color::Indexed(136),
            error_bg: Color::Indexed(124),
        }
    }

    /// Base style for a whole pane.
    pub fn base(&self) -> Style {
        Style::default().bg(self.bg).fg(self.fg)
    }
}

/// Style for a rendered preview line.
pub fn style_for_line_type(palette: &Palette, line_type: &LineType) -> Style {
    let base = palette.base();
    match line_type {
        LineType::Heading(1) => base
            .fg(palette.headings[0])
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => base.fg(palette.headings[1]).add_modifier(Modifier::BOLD),
        LineType::Heading(_) => base.fg(palette.headings[2]).add_modifier(Modifier::BOLD),
        LineType::CodeBlock => base.fg(palette.code),
        LineType::BlockQuote => base.fg(palette.quote).add_modifier(Modifier::ITALIC),
        LineType::HorizontalRule => base.fg(palette.rule),
        LineType::Image => base.fg(palette.image).add_modifier(Modifier::ITALIC),
        LineType::Math => base.fg(palette.math),
        LineType::Html => base.fg(palette.dim),
        LineType::Table => base.fg(palette.fg),
        LineType::ListItem(_) | LineType::Paragraph | LineType::Empty => base,
    }
}

/// Style for an inline span, layered over its line style.
pub fn style_for_inline(palette: &Palette, base: Style, inline: InlineStyle) -> Style {
    let mut style = base;

    if let Some(fg) = inline.fg {
        style = style.fg(fg_color_for_terminal(fg));
    }
    if let Some(bg) = inline.bg {
        style = style.bg(Color::Rgb(bg.r, bg.g, bg.b));
    }
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link && inline.fg.is_none() {
        style = style.fg(palette.link).add_modifier(Modifier::UNDERLINED);
    }
    if inline.math && inline.fg.is_none() {
        style = style.fg(palette.math);
    }
    if inline.code && inline.fg.is_none() {
        style = style.fg(palette.inline_code);
    }
    style
}

fn fg_color_for_terminal(fg: InlineColor) -> Color {
    if supports_truecolor() {
        Color::Rgb(fg.r, fg.g, fg.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(fg.r, fg.g, fg.b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var(TRUECOLOR_ENV) {
        return matches!(
            force.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    let has = |value: Option<&str>, needles: &[&str]| {
        value.is_some_and(|v| {
            let lower = v.to_ascii_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
    };
    has(colorterm, &["truecolor", "24bit"]) || has(term, &["direct", "truecolor"])
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_are_bold_in_both_themes() {
        for theme in [Theme::Light, Theme::Dark] {
            let palette = Palette::for_theme(theme);
            for level in 1..=6 {
                let style = style_for_line_type(&palette, &LineType::Heading(level));
                assert!(style.add_modifier.contains(Modifier::BOLD));
            }
        }
    }

    #[test]
    fn test_themes_have_distinct_backgrounds() {
        assert_ne!(Palette::light().bg, Palette::dark().bg);
        assert_eq!(Palette::for_theme(Theme::Dark), Palette::dark());
    }

    #[test]
    fn test_line_styles_carry_theme_background() {
        let palette = Palette::dark();
        let style = style_for_line_type(&palette, &LineType::Paragraph);
        assert_eq!(style.bg, Some(palette.bg));
    }

    #[test]
    fn test_math_span_uses_math_colour() {
        let palette = Palette::light();
        let inline = InlineStyle {
            math: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(&palette, palette.base(), inline);
        assert_eq!(style.fg, Some(palette.math));
    }

    #[test]
    fn test_truecolor_detection() {
        assert!(!supports_truecolor_from_env(None, Some("xterm-256color")));
        assert!(supports_truecolor_from_env(Some("truecolor"), None));
        assert!(supports_truecolor_from_env(None, Some("xterm-direct")));
    }

    #[test]
    fn test_fallback_indexed_color() {
        assert_eq!(rgb_to_xterm_256(255, 0, 0), 196);
    }
}
