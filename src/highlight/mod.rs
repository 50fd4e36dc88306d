//! Syntax highlighting for code blocks.
//!
//! Uses syntect with its bundled Sublime Text syntaxes and themes. The
//! colour theme follows the editor's light/dark setting, which is passed in
//! on every call.

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::document::{InlineColor, InlineSpan, InlineStyle};
use crate::theme::Theme;

const DARK_THEMES: &[&str] = &[
    "base16-ocean.dark",
    "base16-eighties.dark",
    "Solarized (dark)",
];

const LIGHT_THEMES: &[&str] = &["InspiredGitHub", "Solarized (light)", "base16-ocean.light"];

/// Highlight `code` as `language`, one span list per source line.
///
/// Unknown or missing languages fall back to uncoloured code spans.
pub fn highlight_code(language: Option<&str>, code: &str, theme: Theme) -> Vec<Vec<InlineSpan>> {
    let _scope = crate::perf::scope("highlight.code");
    let syntax_set = syntax_set();
    let syntax = language
        .and_then(|lang| syntax_set.find_syntax_by_token(lang))
        .or_else(|| language.and_then(|lang| syntax_set.find_syntax_by_name(lang)));

    let Some(syntax) = syntax else {
        return code
            .lines()
            .map(|line| vec![InlineSpan::new(line.to_string(), code_style())])
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, syntect_theme(theme));
    let mut lines = Vec::new();
    for line in code.lines() {
        let ranges = highlighter
            .highlight_line(line, syntax_set)
            .unwrap_or_default();
        let spans = ranges
            .into_iter()
            .map(|(style, text)| {
                let mut inline_style = code_style();
                let fg = InlineColor {
                    r: style.foreground.r,
                    g: style.foreground.g,
                    b: style.foreground.b,
                };
                inline_style.fg = Some(adjust_fg_for_background(fg, theme));
                InlineSpan::new(text.to_string(), inline_style)
            })
            .collect();
        lines.push(spans);
    }
    lines
}

fn code_style() -> InlineStyle {
    InlineStyle {
        code: true,
        ..InlineStyle::default()
    }
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.syntax_set.load_defaults");
        SyntaxSet::load_defaults_newlines()
    })
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.theme.load_defaults");
        ThemeSet::load_defaults()
    })
}

fn syntect_theme(theme: Theme) -> &'static SyntectTheme {
    static DARK: OnceLock<SyntectTheme> = OnceLock::new();
    static LIGHT: OnceLock<SyntectTheme> = OnceLock::new();
    let (cell, preferred) = match theme {
        Theme::Dark => (&DARK, DARK_THEMES),
        Theme::Light => (&LIGHT, LIGHT_THEMES),
    };
    cell.get_or_init(|| pick_theme(theme_set(), preferred))
}

fn pick_theme(theme_set: &ThemeSet, preferred: &[&str]) -> SyntectTheme {
    for name in preferred {
        if let Some(theme) = theme_set.themes.get(*name) {
            return theme.clone();
        }
    }
    theme_set
        .themes
        .values()
        .next()
        .cloned()
        .unwrap_or_default()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
fn adjust_fg_for_background(color: InlineColor, theme: Theme) -> InlineColor {
    match theme {
        Theme::Dark => color,
        Theme::Light => {
            let luma = 0.2126 * f32::from(color.r)
                + 0.7152 * f32::from(color.g)
                + 0.0722 * f32::from(color.b);
            if luma < 155.0 {
                return color;
            }
            let darken = |v: u8| (f32::from(v) * 0.42).round() as u8;
            InlineColor {
                r: darken(color.r),
                g: darken(color.g),
                b: darken(color.b),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_javascript_produces_colored_spans() {
        let code = "console.log('Hello, World!');\nconst x = 1;\n";
        let lines = highlight_code(Some("javascript"), code, Theme::Dark);

        assert_eq!(lines.len(), 2);
        let has_color = lines.iter().flatten().any(|span| span.style().fg.is_some());
        assert!(has_color, "Expected at least one colored span");
    }

    #[test]
    fn test_highlight_unknown_language_falls_back_to_plain() {
        let lines = highlight_code(Some("nope"), "just text", Theme::Light);
        assert_eq!(lines.len(), 1);
        assert!(lines.iter().flatten().all(|span| span.style().fg.is_none()));
        assert!(lines.iter().flatten().all(|span| span.style().code));
    }

    #[test]
    fn test_highlight_does_not_set_background_color() {
        let lines = highlight_code(Some("rust"), "fn main() {}", Theme::Dark);
        assert!(lines.iter().flatten().all(|span| span.style().bg.is_none()));
    }

    #[test]
    fn test_light_and_dark_themes_differ() {
        let code = "fn main() { let x = 1; }";
        let dark = highlight_code(Some("rust"), code, Theme::Dark);
        let light = highlight_code(Some("rust"), code, Theme::Light);
        assert_ne!(dark, light);
    }

    #[test]
    fn test_light_mode_darkens_bright_fg() {
        let bright = InlineColor {
            r: 240,
            g: 230,
            b: 120,
        };
        let adjusted = adjust_fg_for_background(bright, Theme::Light);
        assert!(adjusted.r < bright.r);
        assert!(adjusted.g < bright.g);
        assert_eq!(adjust_fg_for_background(bright, Theme::Dark), bright);
    }
}
