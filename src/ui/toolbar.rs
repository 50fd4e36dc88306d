//! The button row above the panes.
//!
//! Button positions come from [`toolbar_buttons`] for both drawing and
//! mouse hit-testing, so a click always lands on what is drawn.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use crate::theme::ThemeIcons;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    Link,
    Image,
    Table,
    CodeFence,
    Math,
    Footnote,
    Details,
    HorizontalRule,
    Quote,
    Save,
    Open,
    Export,
    Theme,
    Help,
}

const FORMAT_BUTTONS: &[(&str, ToolbarAction)] = &[
    ("B", ToolbarAction::Bold),
    ("I", ToolbarAction::Italic),
    ("S", ToolbarAction::Strikethrough),
    ("`", ToolbarAction::InlineCode),
    ("링크", ToolbarAction::Link),
    ("이미지", ToolbarAction::Image),
    ("표", ToolbarAction::Table),
    ("코드", ToolbarAction::CodeFence),
    ("수식", ToolbarAction::Math),
    ("각주", ToolbarAction::Footnote),
    ("접기", ToolbarAction::Details),
    ("─", ToolbarAction::HorizontalRule),
    ("인용", ToolbarAction::Quote),
];

const FILE_BUTTONS: &[(&str, ToolbarAction)] = &[
    ("저장", ToolbarAction::Save),
    ("열기", ToolbarAction::Open),
    ("HTML", ToolbarAction::Export),
];

pub const SUN_ICON: &str = "☀";
pub const MOON_ICON: &str = "☾";

/// One clickable button and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub label: &'static str,
    pub action: ToolbarAction,
    pub area: Rect,
}

/// Buttons laid out left to right in `area`, one column of gap between
/// them. Buttons that do not fit are left out.
pub fn toolbar_buttons(area: Rect, icons: ThemeIcons) -> Vec<ToolbarButton> {
    let theme_label = if icons.sun_visible {
        SUN_ICON
    } else {
        MOON_ICON
    };
    // `None` is a group gap.
    let items = FORMAT_BUTTONS
        .iter()
        .copied()
        .map(Some)
        .chain([None])
        .chain(FILE_BUTTONS.iter().copied().map(Some))
        .chain([
            Some((theme_label, ToolbarAction::Theme)),
            Some(("?", ToolbarAction::Help)),
        ]);

    let right = area.x.saturating_add(area.width);
    let mut x = area.x.saturating_add(1);
    let mut buttons = Vec::new();
    for item in items {
        let Some((label, action)) = item else {
            x = x.saturating_add(2);
            continue;
        };
        #[allow(clippy::cast_possible_truncation)]
        let width = (label.width() + 2) as u16;
        if x.saturating_add(width) > right {
            break;
        }
        buttons.push(ToolbarButton {
            label,
            action,
            area: Rect::new(x, area.y, width, 1),
        });
        x = x.saturating_add(width + 1);
    }
    buttons
}

/// The action under a mouse position, if any.
pub fn toolbar_hit(area: Rect, icons: ThemeIcons, column: u16, row: u16) -> Option<ToolbarAction> {
    if row != area.y {
        return None;
    }
    toolbar_buttons(area, icons)
        .into_iter()
        .find(|button| column >= button.area.x && column < button.area.x + button.area.width)
        .map(|button| button.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHT: ThemeIcons = ThemeIcons {
        sun_visible: true,
        moon_visible: false,
    };

    #[test]
    fn test_buttons_do_not_overlap() {
        let buttons = toolbar_buttons(Rect::new(0, 0, 200, 1), LIGHT);
        for pair in buttons.windows(2) {
            assert!(pair[0].area.x + pair[0].area.width < pair[1].area.x);
        }
        assert!(buttons.iter().any(|b| b.action == ToolbarAction::Theme));
    }

    #[test]
    fn test_narrow_toolbar_drops_overflowing_buttons() {
        let buttons = toolbar_buttons(Rect::new(0, 0, 20, 1), LIGHT);
        assert!(!buttons.is_empty());
        assert!(buttons.iter().all(|b| b.area.x + b.area.width <= 20));
        assert!(!buttons.iter().any(|b| b.action == ToolbarAction::Save));
    }

    #[test]
    fn test_hit_finds_first_button() {
        let area = Rect::new(0, 0, 120, 1);
        let first = &toolbar_buttons(area, LIGHT)[0];
        assert_eq!(
            toolbar_hit(area, LIGHT, first.area.x, 0),
            Some(ToolbarAction::Bold)
        );
        assert_eq!(toolbar_hit(area, LIGHT, first.area.x, 1), None);
        assert_eq!(toolbar_hit(area, LIGHT, 0, 0), None);
    }

    #[test]
    fn test_theme_button_shows_matching_icon() {
        let dark = ThemeIcons {
            sun_visible: false,
            moon_visible: true,
        };
        let area = Rect::new(0, 0, 200, 1);
        let label = |icons| {
            toolbar_buttons(area, icons)
                .into_iter()
                .find(|b| b.action == ToolbarAction::Theme)
                .map(|b| b.label)
        };
        assert_eq!(label(dark), Some(MOON_ICON));
        assert_eq!(label(LIGHT), Some(SUN_ICON));
    }
}
